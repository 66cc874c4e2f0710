//! Boss encounters: stage gates, opt-in challenges and the daily challenge.

use std::f32::consts::TAU;

use tracing::{debug, info, warn};

use super::{GameEvent, Simulation};
use crate::collision::collides;
use crate::constants::{
    CHALLENGE_MAX_PHASE, DAILY_REWARD_CURRENCY, DAILY_REWARD_EXP, STAGE_BOSS_MAX_PHASE,
    STAGE_BOSS_SPRITES,
};
use crate::entities::{Boss, BossConfig, BossProjectile, BossSprite, ExperienceOrb};
use crate::ports::{InputSource, Renderer, SaveStore};
use crate::stage::is_boss_stage;
use crate::vector2::Vector2;

/// Store key remembering the last date the daily challenge was cleared.
pub const DAILY_BOSS_DATE_KEY: &str = "daily_boss_date";

const SPAWN_OFFSET: Vector2 = Vector2::new(200.0, -120.0);
const VOLLEY_DAMAGE: f32 = 2.0;
const RING_DAMAGE: f32 = 1.0;
const BURST_DAMAGE: f32 = 1.0;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum BossDifficulty {
    #[default]
    Normal,
    Hard,
}

impl BossDifficulty {
    pub fn scale(self) -> f32 {
        match self {
            BossDifficulty::Normal => 1.2,
            BossDifficulty::Hard => 1.9,
        }
    }
}

/// Who the current boss is and why it is here.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct BossEncounter {
    /// 1-based phase of the live encounter; 0 when none.
    pub phase: u32,
    pub difficulty: BossDifficulty,
    /// Host-started challenge (regular spawns are suspended).
    pub is_challenge: bool,
    /// Gate boss of the current boss stage.
    pub is_stage_boss: bool,
    /// Date of the running daily challenge, recorded on completion.
    pub daily_date: Option<String>,
    pub sprite: Option<&'static str>,
}

impl BossEncounter {
    pub fn max_phase(&self) -> u32 {
        if self.is_stage_boss {
            STAGE_BOSS_MAX_PHASE
        } else {
            CHALLENGE_MAX_PHASE
        }
    }

    pub fn is_daily(&self) -> bool {
        self.daily_date.is_some()
    }
}

impl<I: InputSource, R: Renderer, S: SaveStore> Simulation<I, R, S> {
    /// Stats for the current phase, positioned relative to the player.
    pub fn boss_config(&self) -> BossConfig {
        let phase = self.encounter.phase.max(1);
        let steps = (phase - 1) as f32;
        let stage = self.stage.stage as f32;
        let critter = self.encounter.is_stage_boss;

        let difficulty_scale = self.encounter.difficulty.scale();
        let phase_scale = 1.0 + steps * 0.6;
        let stage_scale = if critter { 1.0 + stage * 0.04 } else { 1.0 };
        let base_damage = (if difficulty_scale > 1.0 { 4.0 } else { 3.0 }) + phase as f32;

        BossConfig {
            position: self.player.position.add(SPAWN_OFFSET),
            radius: if critter { 70.0 + stage * 1.2 } else { 38.0 + steps * 6.0 },
            speed: (if critter { 70.0 } else { 55.0 + steps * 8.0 }) * stage_scale,
            max_health: (260.0 * difficulty_scale * phase_scale * stage_scale).floor(),
            damage: (base_damage * stage_scale).ceil(),
            projectile_speed: (if critter { 240.0 } else { 210.0 }) * stage_scale,
            attack_interval: (1.3 - steps * 0.18).max(0.55),
            burst_interval: (3.8 - steps * 0.5).max(1.9),
            sprite: match self.encounter.sprite {
                Some(name) if critter => BossSprite::Critter(name),
                _ => BossSprite::Mage,
            },
        }
    }

    /// Replaces any live boss with one for the current phase and clears the
    /// field of regular enemies.
    pub fn spawn_boss(&mut self) {
        let config = self.boss_config();
        debug!(
            phase = self.encounter.phase,
            health = config.max_health,
            stage_boss = self.encounter.is_stage_boss,
            "boss spawned"
        );
        self.boss = Some(Boss::new(config));
        self.enemies.clear();
        self.spawner.spawn_timer = 0.0;
        self.events.push(GameEvent::BossSpawned { phase: self.encounter.phase });
    }

    /// Spawns the gate boss when standing on an uncleared boss stage.
    pub fn ensure_stage_boss(&mut self) {
        if self.encounter.is_challenge || self.boss.is_some() {
            return;
        }
        if !is_boss_stage(self.stage.stage) || self.stage.cleared {
            return;
        }
        let index = (self.stage.stage / 5).saturating_sub(1) as usize;
        self.encounter = BossEncounter {
            phase: 1,
            difficulty: if self.stage.stage >= 20 {
                BossDifficulty::Hard
            } else {
                BossDifficulty::Normal
            },
            is_challenge: false,
            is_stage_boss: true,
            daily_date: None,
            sprite: Some(STAGE_BOSS_SPRITES[index % STAGE_BOSS_SPRITES.len()]),
        };
        self.spawn_boss();
    }

    /// Opt-in multi-phase boss.  Refused while a boss is alive.
    pub fn start_boss_challenge(&mut self, difficulty: BossDifficulty) -> bool {
        if self.boss.is_some() {
            return false;
        }
        self.encounter = BossEncounter {
            phase: 1,
            difficulty,
            is_challenge: true,
            ..BossEncounter::default()
        };
        info!(?difficulty, "boss challenge started");
        self.spawn_boss();
        true
    }

    pub fn cancel_boss_challenge(&mut self) {
        if !self.encounter.is_challenge {
            return;
        }
        self.boss = None;
        self.boss_projectiles.clear();
        self.encounter = BossEncounter::default();
        info!("boss challenge cancelled");
    }

    /// `today` is an ISO date (`YYYY-MM-DD`) supplied by the host.
    pub fn can_start_daily_challenge(&self, today: &str) -> bool {
        match self.store.load_value(DAILY_BOSS_DATE_KEY) {
            Ok(last) => last.as_deref() != Some(today),
            Err(err) => {
                warn!(error = %err, "could not read daily challenge date");
                true
            }
        }
    }

    /// Hard challenge available once per date.  Replaces any live boss.
    pub fn start_daily_challenge(&mut self, today: &str) -> bool {
        if !self.can_start_daily_challenge(today) {
            return false;
        }
        self.boss = None;
        self.boss_projectiles.clear();
        self.encounter = BossEncounter {
            phase: 1,
            difficulty: BossDifficulty::Hard,
            is_challenge: true,
            is_stage_boss: false,
            daily_date: Some(today.to_string()),
            sprite: None,
        };
        info!(date = today, "daily challenge started");
        self.spawn_boss();
        true
    }

    fn complete_daily_challenge(&mut self, date: &str) {
        if let Err(err) = self.store.save_value(DAILY_BOSS_DATE_KEY, date) {
            warn!(error = %err, "could not record daily challenge date");
        }
        self.save_game();
    }

    /// Moves the boss, applies contact damage, fires due volleys and bursts,
    /// and resolves its death into rewards and the next phase.
    pub fn update_boss(&mut self, delta: f32) {
        let target = self.player.position;
        let Some(boss) = self.boss.as_mut() else {
            return;
        };
        boss.update(delta, target);
        let contact = collides(&*boss, &self.player).then_some(boss.damage);

        let phase = self.encounter.phase;
        let origin = boss.position;
        let speed = boss.projectile_speed;
        if boss.can_attack() {
            let aim = boss.aim_direction(target).angle();
            let spread = 0.26 + phase as f32 * 0.08;
            let bonus = if self.encounter.is_stage_boss { 6 } else { 0 };
            let count = 4 + phase * 3 + bonus;
            let start = aim - spread * (count - 1) as f32 / 2.0;
            for i in 0..count {
                let velocity = Vector2::from_angle(start + spread * i as f32).scale(speed);
                self.boss_projectiles.push(BossProjectile::new(origin, velocity, VOLLEY_DAMAGE));
            }
            if self.encounter.is_stage_boss {
                let ring = 10 + self.stage.stage / 2;
                let offset = boss.anim_time * 1.4;
                for i in 0..ring {
                    let angle = TAU * i as f32 / ring as f32 + offset;
                    let velocity = Vector2::from_angle(angle).scale(speed * 0.9);
                    self.boss_projectiles.push(BossProjectile::new(origin, velocity, RING_DAMAGE));
                }
            }
            boss.reset_attack();
        }
        if boss.can_burst() {
            let count = 16 + phase * 6;
            for i in 0..count {
                let angle = TAU * i as f32 / count as f32;
                let velocity = Vector2::from_angle(angle).scale(speed * 0.95);
                self.boss_projectiles.push(BossProjectile::new(origin, velocity, BURST_DAMAGE));
            }
            boss.reset_burst();
        }
        let dead = boss.is_dead();

        if let Some(damage) = contact {
            self.damage_player(damage);
        }
        if dead {
            self.defeat_boss_phase(origin);
        }
    }

    fn defeat_boss_phase(&mut self, position: Vector2) {
        let phase = self.encounter.phase;
        if self.encounter.is_daily() {
            self.add_currency(DAILY_REWARD_CURRENCY);
            self.experience_orbs.push(ExperienceOrb::new(position, DAILY_REWARD_EXP));
        } else {
            self.add_currency(200 * i64::from(phase));
            let exp_scale = 1.0 + self.stage.stage as f32 * 0.1;
            let value = (1000.0 * exp_scale).ceil() as u32;
            self.experience_orbs.push(ExperienceOrb::new(position, value));
        }

        self.boss = None;
        self.boss_projectiles.clear();
        self.events.push(GameEvent::BossPhaseCleared { phase });

        if phase < self.encounter.max_phase() {
            self.encounter.phase += 1;
            self.spawn_boss();
            return;
        }

        let finished = std::mem::take(&mut self.encounter);
        info!(phase, daily = finished.is_daily(), "boss defeated");
        self.events.push(GameEvent::BossDefeated { daily: finished.is_daily() });
        if finished.is_stage_boss {
            self.stage.mark_boss_cleared();
            self.handle_stage_clear();
        }
        if let Some(date) = finished.daily_date {
            self.complete_daily_challenge(&date);
        }
    }
}
