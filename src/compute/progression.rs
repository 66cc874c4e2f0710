//! Exp and upgrade offers, effect dispatch, stage flow, currency and shop.

use tracing::{debug, info};

use super::{GameEvent, Simulation};
use crate::constants::UPGRADE_CHOICE_COUNT;
use crate::drone::Drone;
use crate::effect::Effect;
use crate::entities::Portal;
use crate::ports::{InputSource, Renderer, SaveStore};
use crate::shop::PurchaseOutcome;
use crate::stage::StageDifficulty;
use crate::upgrades::{random_choices, AutoBuildMode, UpgradeContext, UpgradeOption};
use crate::vector2::Vector2;

const PORTAL_OFFSET: Vector2 = Vector2::new(120.0, -80.0);

impl<I: InputSource, R: Renderer, S: SaveStore> Simulation<I, R, S> {
    // ── Experience & offers ───────────────────────────────────────────────────

    pub fn gain_exp(&mut self, amount: u32) {
        self.upgrades.exp = self.upgrades.exp.saturating_add(amount);
        self.resolve_offers();
    }

    pub fn upgrade_context(&self) -> UpgradeContext {
        UpgradeContext {
            fire_cooldown: self.player.fire_cooldown,
            drone_level: self.drone.as_ref().map(|d| d.level),
            drone_max_level: self.drone.as_ref().is_some_and(Drone::is_max_level),
            barrier_level: self.player.barrier_level,
        }
    }

    pub fn draw_upgrade_choices(&mut self) -> Vec<&'static UpgradeOption> {
        let ctx = self.upgrade_context();
        random_choices(UPGRADE_CHOICE_COUNT, &ctx, &mut self.rng)
    }

    /// Turns pending levels and queued stage-clear rewards into offers, one at
    /// a time.  In auto-build mode each offer is resolved on the spot;
    /// otherwise the first offer pauses the run until
    /// [`Simulation::choose_upgrade`].
    pub(crate) fn resolve_offers(&mut self) {
        while self.pending_upgrades.is_empty() {
            if self.upgrades.consume_pending_level() {
                debug!(level = self.upgrades.level, next_exp = self.upgrades.next_exp, "level up");
                self.events.push(GameEvent::LevelUp { level: self.upgrades.level });
            } else if self.bonus_offers > 0 {
                self.bonus_offers -= 1;
            } else {
                return;
            }

            let choices = self.draw_upgrade_choices();
            if self.auto_build {
                if let Some(option) = self.auto_build_mode.select(&choices) {
                    self.apply_upgrade(option);
                }
                continue;
            }
            if !choices.is_empty() {
                self.pending_upgrades = choices;
                self.is_paused = true;
            }
        }
    }

    /// Resolve the pending offer.  Returns `false` if `id` is not on offer.
    pub fn choose_upgrade(&mut self, id: &str) -> bool {
        let Some(option) = self.pending_upgrades.iter().copied().find(|o| o.id == id) else {
            return false;
        };
        self.pending_upgrades.clear();
        self.is_paused = false;
        self.apply_upgrade(option);
        self.resolve_offers();
        true
    }

    /// Applies the option's effect, then counts its tags toward synergies.
    pub fn apply_upgrade(&mut self, option: &'static UpgradeOption) {
        self.apply_effect(option.effect);
        self.events.push(GameEvent::UpgradeApplied { id: option.id });
        for tag in self.synergy.register(option.tags) {
            debug!(tag = tag.as_str(), "synergy triggered");
            if let Some(bonus) = tag.synergy_bonus() {
                self.apply_effect(bonus);
                let id = format!("synergy-{}", tag.as_str());
                self.inventory.add(&id, tag.synergy_label(), tag.synergy_description());
            }
            self.events.push(GameEvent::SynergyTriggered { tag });
        }
    }

    pub fn set_auto_build(&mut self, enabled: bool, mode: AutoBuildMode) {
        self.auto_build = enabled;
        self.auto_build_mode = mode;
    }

    // ── Effects ───────────────────────────────────────────────────────────────

    /// The single place where stat effects are carried out.
    pub fn apply_effect(&mut self, effect: Effect) {
        match effect {
            Effect::IncreaseAttack => self.player.increase_attack(),
            Effect::ImproveFireRate => self.player.improve_fire_rate(),
            Effect::IncreaseSpeed => self.player.increase_speed(),
            Effect::IncreaseProjectileCount => self.player.increase_projectile_count(),
            Effect::IncreasePickupRadius => self.player.increase_pickup_radius(),
            Effect::IncreaseMagnetRadius => self.player.increase_magnet_radius(),
            Effect::IncreaseExpDrop => self.player.increase_exp_drop(),
            Effect::IncreaseMaxHealth => self.player.increase_max_health(),
            Effect::UpgradeDrone => self.upgrade_drone(),
            Effect::EnableBarrier => {
                self.player.enable_barrier();
                self.record_barrier("A field that burns nearby enemies");
            }
            Effect::UpgradeBarrierRange => {
                self.player.increase_barrier_radius();
                self.record_barrier("Barrier radius increased");
            }
        }
    }

    /// Enables the drone at level 1, or levels up the existing one.
    pub fn upgrade_drone(&mut self) {
        match self.drone.as_mut() {
            None => {
                self.drone = Some(Drone::new(self.player.position, &mut self.rng));
                self.inventory.add("drone", "Drone", "Orbits you and rams enemies");
            }
            Some(drone) => {
                drone.upgrade();
                let name = format!("Drone Lv.{}", drone.level);
                self.inventory.set("drone", &name, "Drone speed and damage improved");
            }
        }
    }

    fn record_barrier(&mut self, description: &str) {
        let name = format!("Barrier Lv.{}", self.player.barrier_level);
        self.inventory.set("barrier", &name, description);
    }

    // ── Currency & shop ───────────────────────────────────────────────────────

    /// Adds a signed amount; the balance never drops below zero.  The new
    /// balance is written to the active slot straight away.
    pub fn add_currency(&mut self, amount: i64) {
        self.currency = if amount >= 0 {
            self.currency.saturating_add(amount.unsigned_abs())
        } else {
            self.currency.saturating_sub(amount.unsigned_abs())
        };
        self.store_currency();
    }

    pub fn purchase(&mut self, id: &str) -> PurchaseOutcome {
        let outcome = self.shop.purchase(id, &mut self.currency);
        if let PurchaseOutcome::Purchased(effect) = outcome {
            debug!(item = id, currency = self.currency, "shop purchase");
            self.store_currency();
            self.apply_effect(effect);
        }
        outcome
    }

    // ── Stage flow ────────────────────────────────────────────────────────────

    /// Pushes the current stage's tuning into the spawner and player.
    pub fn apply_stage_settings(&mut self) {
        self.difficulty = StageDifficulty::for_stage(self.stage.stage);
        self.spawner.set_spawn_interval(self.difficulty.spawn_interval);
        self.player.stage_speed_multiplier = self.difficulty.speed_penalty;
    }

    /// Portal, a bonus upgrade offer, fresh shop stock, and a save.
    pub(crate) fn handle_stage_clear(&mut self) {
        info!(stage = self.stage.stage, "stage cleared");
        self.events.push(GameEvent::StageCleared { stage: self.stage.stage });
        self.spawn_portal();
        self.bonus_offers += 1;
        self.resolve_offers();
        self.shop.refresh(true, &mut self.rng);
        self.save_game();
    }

    pub fn spawn_portal(&mut self) {
        if !self.stage.cleared || self.portal.is_some() {
            return;
        }
        self.portal = Some(Portal::new(self.player.position.add(PORTAL_OFFSET)));
    }

    /// Ticks the portal and steps through it on touch.  Touching counts at
    /// `distance <= portal radius + player radius`.
    pub fn update_portal(&mut self, delta: f32) {
        let Some(portal) = self.portal.as_mut() else {
            return;
        };
        portal.pulse += delta;
        let touching = portal.position.distance_to(self.player.position)
            <= portal.radius + self.player.radius;
        if touching {
            self.advance_stage_from_portal();
        }
    }

    /// Requires a cleared stage below the last one.
    pub fn advance_stage_from_portal(&mut self) -> bool {
        if !self.stage.cleared || self.stage.stage >= self.stage.max_stage {
            return false;
        }
        self.stage.advance_stage();
        self.enter_stage();
        self.stage_map_has_update = true;
        true
    }

    /// Jump to any unlocked stage.  Returns `false` for locked stages.
    pub fn transition_to_stage(&mut self, stage: u32) -> bool {
        if stage > self.stage.unlocked_stage {
            return false;
        }
        self.stage.set_stage(stage);
        self.enter_stage();
        true
    }

    fn enter_stage(&mut self) {
        self.reset_stage_state();
        self.apply_stage_settings();
        info!(stage = self.stage.stage, "entered stage");
        self.events.push(GameEvent::StageAdvanced { stage: self.stage.stage });
    }

    /// Clears everything that belongs to the stage being left.
    pub fn reset_stage_state(&mut self) {
        self.enemies.clear();
        self.projectiles.clear();
        self.boss_projectiles.clear();
        self.experience_orbs.clear();
        self.item_drops.clear();
        self.boss = None;
        self.encounter = Default::default();
        self.portal = None;
        self.spawner.spawn_timer = 0.0;
    }
}
