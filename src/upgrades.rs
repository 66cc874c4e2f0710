//! Experience, levelling and the upgrade economy.
//!
//! [`UpgradeManager`] owns the exp curve.  [`CATALOG`] lists every upgrade
//! with its tags and availability rule, [`Synergy`] counts tags and fires
//! one bonus per tag, and [`AutoBuildMode`] picks an upgrade without asking.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use rand::seq::SliceRandom;
use rand::Rng;

use crate::constants::{INITIAL_NEXT_EXP, MIN_FIRE_COOLDOWN, SYNERGY_THRESHOLD};
use crate::effect::Effect;

// ── Tags ──────────────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Tag {
    Attack,
    Rapid,
    Survival,
    Summon,
    Utility,
    Mobility,
}

impl Tag {
    pub const ALL: [Tag; 6] = [
        Tag::Attack,
        Tag::Rapid,
        Tag::Survival,
        Tag::Summon,
        Tag::Utility,
        Tag::Mobility,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Tag::Attack => "attack",
            Tag::Rapid => "rapid",
            Tag::Survival => "survival",
            Tag::Summon => "summon",
            Tag::Utility => "utility",
            Tag::Mobility => "mobility",
        }
    }

    pub fn parse(name: &str) -> Option<Tag> {
        Tag::ALL.into_iter().find(|tag| tag.as_str() == name)
    }

    /// One-time bonus granted when the tag reaches the synergy threshold.
    /// Mobility has none.
    pub fn synergy_bonus(self) -> Option<Effect> {
        match self {
            Tag::Attack => Some(Effect::IncreaseAttack),
            Tag::Rapid => Some(Effect::ImproveFireRate),
            Tag::Survival => Some(Effect::IncreaseMaxHealth),
            Tag::Summon => Some(Effect::UpgradeDrone),
            Tag::Utility => Some(Effect::IncreaseMagnetRadius),
            Tag::Mobility => None,
        }
    }

    pub fn synergy_label(self) -> &'static str {
        match self {
            Tag::Attack => "Synergy: Attack",
            Tag::Rapid => "Synergy: Rapid",
            Tag::Survival => "Synergy: Survival",
            Tag::Summon => "Synergy: Summon",
            Tag::Utility => "Synergy: Utility",
            Tag::Mobility => "Synergy: Mobility",
        }
    }

    pub fn synergy_description(self) -> &'static str {
        match self {
            Tag::Attack => "Three attack upgrades (attack +1)",
            Tag::Rapid => "Three rapid upgrades (fire cooldown down)",
            Tag::Survival => "Three survival upgrades (max HP up)",
            Tag::Summon => "Three summon upgrades (drone upgrade)",
            Tag::Utility => "Three utility upgrades (magnet range up)",
            Tag::Mobility => "Three mobility upgrades",
        }
    }
}

// ── Catalog ───────────────────────────────────────────────────────────────────

/// The slice of run state upgrade availability depends on.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct UpgradeContext {
    pub fire_cooldown: f32,
    pub drone_level: Option<u32>,
    pub drone_max_level: bool,
    pub barrier_level: u32,
}

pub struct UpgradeOption {
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub tags: &'static [Tag],
    pub effect: Effect,
    pub available: fn(&UpgradeContext) -> bool,
}

impl fmt::Debug for UpgradeOption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UpgradeOption")
            .field("id", &self.id)
            .field("tags", &self.tags)
            .field("effect", &self.effect)
            .finish()
    }
}

impl PartialEq for UpgradeOption {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

fn always(_: &UpgradeContext) -> bool {
    true
}

fn fire_rate_above_floor(ctx: &UpgradeContext) -> bool {
    ctx.fire_cooldown > MIN_FIRE_COOLDOWN
}

fn no_drone(ctx: &UpgradeContext) -> bool {
    ctx.drone_level.is_none()
}

fn drone_upgradable(ctx: &UpgradeContext) -> bool {
    ctx.drone_level.is_some() && !ctx.drone_max_level
}

fn no_barrier(ctx: &UpgradeContext) -> bool {
    ctx.barrier_level == 0
}

fn has_barrier(ctx: &UpgradeContext) -> bool {
    ctx.barrier_level > 0
}

pub static CATALOG: &[UpgradeOption] = &[
    UpgradeOption {
        id: "attack",
        name: "Power Up",
        description: "Damage +1",
        tags: &[Tag::Attack],
        effect: Effect::IncreaseAttack,
        available: always,
    },
    UpgradeOption {
        id: "fire-rate",
        name: "Fire Rate Up",
        description: "Fire cooldown -0.1s",
        tags: &[Tag::Rapid],
        effect: Effect::ImproveFireRate,
        available: fire_rate_above_floor,
    },
    UpgradeOption {
        id: "projectiles",
        name: "Multishot",
        description: "Extra projectile +1",
        tags: &[Tag::Attack],
        effect: Effect::IncreaseProjectileCount,
        available: always,
    },
    UpgradeOption {
        id: "speed",
        name: "Swift Feet",
        description: "Move speed +10%",
        tags: &[Tag::Mobility],
        effect: Effect::IncreaseSpeed,
        available: always,
    },
    UpgradeOption {
        id: "pickup",
        name: "Long Reach",
        description: "Item pickup range +30",
        tags: &[Tag::Utility],
        effect: Effect::IncreasePickupRadius,
        available: always,
    },
    UpgradeOption {
        id: "magnet",
        name: "Magnet",
        description: "Exp magnet range +40",
        tags: &[Tag::Utility],
        effect: Effect::IncreaseMagnetRadius,
        available: always,
    },
    UpgradeOption {
        id: "exp-drop",
        name: "Scholar",
        description: "Exp dropped +25%",
        tags: &[Tag::Utility],
        effect: Effect::IncreaseExpDrop,
        available: always,
    },
    UpgradeOption {
        id: "health",
        name: "Vitality",
        description: "Max HP +2",
        tags: &[Tag::Survival],
        effect: Effect::IncreaseMaxHealth,
        available: always,
    },
    UpgradeOption {
        id: "drone",
        name: "Drone",
        description: "A drone orbits you and rams enemies",
        tags: &[Tag::Summon],
        effect: Effect::UpgradeDrone,
        available: no_drone,
    },
    UpgradeOption {
        id: "drone-upgrade",
        name: "Drone Tuning",
        description: "Drone speed and damage up",
        tags: &[Tag::Summon],
        effect: Effect::UpgradeDrone,
        available: drone_upgradable,
    },
    UpgradeOption {
        id: "barrier",
        name: "Barrier",
        description: "A field that burns nearby enemies",
        tags: &[Tag::Survival],
        effect: Effect::EnableBarrier,
        available: no_barrier,
    },
    UpgradeOption {
        id: "barrier-range",
        name: "Barrier Range",
        description: "Barrier radius +15",
        tags: &[Tag::Survival, Tag::Utility],
        effect: Effect::UpgradeBarrierRange,
        available: has_barrier,
    },
];

pub fn find_option(id: &str) -> Option<&'static UpgradeOption> {
    CATALOG.iter().find(|option| option.id == id)
}

/// Up to `count` distinct available options in uniformly shuffled order.
pub fn random_choices(
    count: usize,
    ctx: &UpgradeContext,
    rng: &mut impl Rng,
) -> Vec<&'static UpgradeOption> {
    let mut pool: Vec<&'static UpgradeOption> =
        CATALOG.iter().filter(|option| (option.available)(ctx)).collect();
    pool.shuffle(rng);
    pool.truncate(count);
    pool
}

// ── Levelling ─────────────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UpgradeManager {
    pub level: u32,
    pub exp: u32,
    pub next_exp: u32,
}

impl Default for UpgradeManager {
    fn default() -> Self {
        Self { level: 1, exp: 0, next_exp: INITIAL_NEXT_EXP }
    }
}

impl UpgradeManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds exp and performs at most one level-up.  Further pending levels
    /// are taken with [`UpgradeManager::consume_pending_level`] once the
    /// current choice is resolved.
    pub fn add_exp(&mut self, amount: u32) -> bool {
        self.exp = self.exp.saturating_add(amount);
        self.consume_pending_level()
    }

    pub fn has_pending_level(&self) -> bool {
        self.exp >= self.next_exp
    }

    pub fn consume_pending_level(&mut self) -> bool {
        if !self.has_pending_level() {
            return false;
        }
        self.exp -= self.next_exp;
        self.level += 1;
        self.next_exp = next_exp_after(self.next_exp);
        true
    }
}

/// `max(3, floor(current * 1.25) + 1)`, in integer arithmetic.
pub fn next_exp_after(current: u32) -> u32 {
    (current.saturating_mul(5) / 4).saturating_add(1).max(INITIAL_NEXT_EXP)
}

// ── Synergy ───────────────────────────────────────────────────────────────────

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Synergy {
    pub counts: BTreeMap<Tag, u32>,
    pub applied: BTreeSet<Tag>,
}

impl Synergy {
    /// Count `tags` and return those that just reached the threshold for the
    /// first time this run.
    pub fn register(&mut self, tags: &[Tag]) -> Vec<Tag> {
        let mut triggered = Vec::new();
        for &tag in tags {
            let count = self.counts.entry(tag).or_insert(0);
            *count += 1;
            if *count >= SYNERGY_THRESHOLD && self.applied.insert(tag) {
                triggered.push(tag);
            }
        }
        triggered
    }

    pub fn count(&self, tag: Tag) -> u32 {
        self.counts.get(&tag).copied().unwrap_or(0)
    }
}

// ── Auto-build ────────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum AutoBuildMode {
    Attack,
    Survival,
    #[default]
    Balance,
}

impl AutoBuildMode {
    pub fn weight(self, tag: Tag) -> u32 {
        match (self, tag) {
            (AutoBuildMode::Attack, Tag::Attack) => 3,
            (AutoBuildMode::Attack, Tag::Rapid | Tag::Summon) => 2,
            (AutoBuildMode::Survival, Tag::Survival) => 3,
            (AutoBuildMode::Balance, Tag::Utility | Tag::Mobility) => 2,
            _ => 1,
        }
    }

    pub fn score(self, option: &UpgradeOption) -> u32 {
        option.tags.iter().map(|&tag| self.weight(tag)).sum()
    }

    /// Highest-scoring option; the earliest wins ties.
    pub fn select<'a>(self, options: &[&'a UpgradeOption]) -> Option<&'a UpgradeOption> {
        let mut best: Option<(&'a UpgradeOption, u32)> = None;
        for &option in options {
            let score = self.score(option);
            if best.map_or(true, |(_, best_score)| score > best_score) {
                best = Some((option, score));
            }
        }
        best.map(|(option, _)| option)
    }
}
