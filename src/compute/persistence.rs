//! Snapshots in and out of the save store, slot selection and autosave.

use std::time::{SystemTime, UNIX_EPOCH};

use tracing::{debug, info, warn};

use super::{Simulation, Skills};
use crate::drone::Drone;
use crate::entities::Player;
use crate::inventory::Inventory;
use crate::ports::{InputSource, Renderer, SaveStore};
use crate::save::{
    BarrierSnapshot, PlayerStatsSnapshot, SaveSnapshot, StageSnapshot, UpgradesSnapshot,
};
use crate::stage::{kills_needed_for, StageManager};
use crate::upgrades::{Synergy, Tag, UpgradeManager};
use crate::vector2::Vector2;

/// Store key holding the currency balance of a slot.  Currency survives a
/// new game in the same slot.
pub fn currency_key(slot: &str) -> String {
    format!("currency_{slot}")
}

impl<I: InputSource, R: Renderer, S: SaveStore> Simulation<I, R, S> {
    // ── Export ────────────────────────────────────────────────────────────────

    pub fn export_save_state(&self) -> SaveSnapshot {
        let updated_at = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .ok()
            .map(|elapsed| elapsed.as_millis() as u64);
        let p = &self.player;
        SaveSnapshot {
            updated_at,
            stage: Some(self.stage.stage),
            level: Some(self.upgrades.level),
            player_profile: self.player_profile.clone(),
            player_stats: Some(PlayerStatsSnapshot {
                attack_power: Some(p.attack_power),
                fire_cooldown: Some(p.fire_cooldown),
                projectile_count: Some(p.projectile_count),
                speed: Some(p.speed),
                pickup_radius: Some(p.pickup_radius),
                magnet_radius: Some(p.magnet_radius),
                orb_pickup_radius: Some(p.orb_pickup_radius),
                exp_multiplier: Some(p.exp_multiplier),
                max_health: Some(p.max_health),
                health: Some(p.health),
            }),
            upgrades: Some(UpgradesSnapshot {
                level: Some(self.upgrades.level),
                exp: Some(self.upgrades.exp),
                next_exp: Some(self.upgrades.next_exp),
            }),
            stage_state: Some(StageSnapshot {
                stage: Some(self.stage.stage),
                unlocked_stage: Some(self.stage.unlocked_stage),
                kills: Some(self.stage.kills),
                kills_needed: Some(self.stage.kills_needed),
                cleared: Some(self.stage.cleared),
            }),
            items: Some(self.inventory.entries().to_vec()),
            drone_level: Some(self.drone.as_ref().map_or(0, |d| d.level)),
            barrier: Some(BarrierSnapshot {
                level: Some(p.barrier_level),
                radius: Some(p.barrier_radius),
                damage: Some(p.barrier_damage),
            }),
            currency: Some(self.currency),
            synergy_counts: Some(
                self.synergy
                    .counts
                    .iter()
                    .map(|(tag, count)| (tag.as_str().to_string(), *count))
                    .collect(),
            ),
            synergy_applied: Some(
                self.synergy.applied.iter().map(|tag| tag.as_str().to_string()).collect(),
            ),
        }
    }

    /// Writes the current run to the active slot.  Without a slot this does
    /// nothing; store failures are logged and dropped.
    pub fn save_game(&mut self) {
        let Some(slot) = self.save_slot.clone() else {
            return;
        };
        let snapshot = self.export_save_state();
        if let Err(err) = self.store.save(&slot, &snapshot) {
            warn!(slot = %slot, error = %err, "save failed");
            return;
        }
        self.store_currency();
        debug!(slot = %slot, stage = self.stage.stage, "game saved");
    }

    // ── Slots ─────────────────────────────────────────────────────────────────

    /// Selects the slot that later saves go to and picks up its currency.
    pub fn set_save_slot(&mut self, slot: &str) {
        if slot.is_empty() {
            return;
        }
        self.save_slot = Some(slot.to_string());
        self.currency = self.load_currency(slot);
    }

    /// Writes the balance under the active slot's currency key.
    pub(crate) fn store_currency(&mut self) {
        let Some(slot) = self.save_slot.as_deref() else {
            return;
        };
        if let Err(err) = self.store.save_value(&currency_key(slot), &self.currency.to_string()) {
            warn!(slot, error = %err, "could not store currency");
        }
    }

    fn load_currency(&self, slot: &str) -> u64 {
        match self.store.load_value(&currency_key(slot)) {
            Ok(Some(text)) => text.trim().parse().unwrap_or(0),
            Ok(None) => 0,
            Err(err) => {
                warn!(slot, error = %err, "could not read currency");
                0
            }
        }
    }

    /// Fresh run in `slot`.  The slot's currency balance is kept.
    pub fn reset_for_new_game(&mut self, slot: &str) {
        self.set_save_slot(slot);
        self.reset_run();
        self.apply_stage_settings();
        info!(slot, "new game");
    }

    /// Loads `slot` from the store.  Returns `false` when the slot is empty
    /// or unreadable; the current run is left untouched in that case.
    pub fn load_slot(&mut self, slot: &str) -> bool {
        match self.store.load(slot) {
            Ok(Some(snapshot)) => {
                self.load_from_save(&snapshot, slot);
                true
            }
            Ok(None) => false,
            Err(err) => {
                warn!(slot, error = %err, "could not load save");
                false
            }
        }
    }

    /// Rebuilds the run from `snapshot`.  Fields the snapshot lacks keep the
    /// value of a fresh run.  A stage saved as cleared gets its portal back.
    pub fn load_from_save(&mut self, snapshot: &SaveSnapshot, slot: &str) {
        self.set_save_slot(slot);
        self.reset_run();

        if let Some(profile) = &snapshot.player_profile {
            self.player_profile = Some(profile.clone());
        }
        self.apply_saved_player_stats(snapshot.player_stats.as_ref());
        if let Some(upgrades) = &snapshot.upgrades {
            self.upgrades.level = upgrades.level.unwrap_or(self.upgrades.level);
            self.upgrades.exp = upgrades.exp.unwrap_or(self.upgrades.exp);
            self.upgrades.next_exp = upgrades.next_exp.unwrap_or(self.upgrades.next_exp).max(1);
        }
        self.apply_saved_stage(snapshot.stage_state.as_ref(), snapshot.stage);
        if let Some(items) = &snapshot.items {
            self.inventory = Inventory::from_entries(items.iter().cloned());
        }
        if let Some(level) = snapshot.drone_level.filter(|&level| level > 0) {
            self.drone = Some(Drone::at_level(level, self.player.position, &mut self.rng));
        }
        if let Some(barrier) = &snapshot.barrier {
            self.player.barrier_level = barrier.level.unwrap_or(0);
            self.player.barrier_radius = barrier.radius.unwrap_or(0.0);
            if let Some(damage) = barrier.damage.filter(|&d| d > 0.0) {
                self.player.barrier_damage = damage;
            }
        }
        self.apply_saved_synergy(snapshot);
        if let Some(currency) = snapshot.currency {
            self.currency = currency;
        }

        self.apply_stage_settings();
        self.spawn_portal();
        info!(
            slot,
            stage = self.stage.stage,
            level = self.upgrades.level,
            "save loaded"
        );
    }

    fn apply_saved_player_stats(&mut self, stats: Option<&PlayerStatsSnapshot>) {
        let p = &mut self.player;
        if let Some(stats) = stats {
            p.attack_power = stats.attack_power.unwrap_or(p.attack_power);
            p.fire_cooldown = stats.fire_cooldown.unwrap_or(p.fire_cooldown);
            p.projectile_count = stats.projectile_count.unwrap_or(p.projectile_count).max(1);
            p.speed = stats.speed.unwrap_or(p.speed);
            p.pickup_radius = stats.pickup_radius.unwrap_or(p.pickup_radius);
            p.magnet_radius = stats.magnet_radius.unwrap_or(p.magnet_radius);
            p.orb_pickup_radius = stats.orb_pickup_radius.unwrap_or(p.orb_pickup_radius);
            p.exp_multiplier = stats.exp_multiplier.unwrap_or(p.exp_multiplier);
            p.max_health = stats.max_health.unwrap_or(p.max_health);
            p.health = stats.health.unwrap_or(p.health).min(p.max_health);
        }
        if p.health <= 0.0 {
            p.health = p.max_health;
        }
    }

    fn apply_saved_stage(&mut self, state: Option<&StageSnapshot>, fallback_stage: Option<u32>) {
        let stage = &mut self.stage;
        let Some(state) = state else {
            if let Some(number) = fallback_stage {
                stage.set_stage(number);
            }
            return;
        };
        stage.stage = state
            .stage
            .or(fallback_stage)
            .unwrap_or(stage.stage)
            .clamp(1, stage.max_stage);
        stage.unlocked_stage = state
            .unlocked_stage
            .unwrap_or(stage.unlocked_stage)
            .clamp(stage.stage, stage.max_stage);
        stage.kills = state.kills.unwrap_or(0);
        stage.kills_needed = state.kills_needed.unwrap_or_else(|| kills_needed_for(stage.stage));
        stage.cleared = state.cleared.unwrap_or(false);
    }

    /// Unknown tag names in old saves are skipped.
    fn apply_saved_synergy(&mut self, snapshot: &SaveSnapshot) {
        if let Some(counts) = &snapshot.synergy_counts {
            self.synergy.counts = counts
                .iter()
                .filter_map(|(name, count)| Tag::parse(name).map(|tag| (tag, *count)))
                .collect();
        }
        if let Some(applied) = &snapshot.synergy_applied {
            self.synergy.applied = applied.iter().filter_map(|name| Tag::parse(name)).collect();
        }
    }

    /// Everything except the collaborators, config, slot, profile, currency
    /// and shop goes back to a fresh run.
    fn reset_run(&mut self) {
        self.player = Player::new(Vector2::ZERO);
        self.upgrades = UpgradeManager::new();
        self.stage = StageManager::new(self.config.max_stage);
        self.synergy = Synergy::default();
        self.inventory = Inventory::new();
        self.skills = Skills::default();
        self.drone = None;
        self.reset_stage_state();
        self.stage_map_has_update = false;
        self.pending_upgrades.clear();
        self.bonus_offers = 0;
        self.is_paused = false;
        self.is_game_over = false;
        self.autosave_timer = 0.0;
        self.events.clear();
    }

    // ── Autosave ──────────────────────────────────────────────────────────────

    /// Counts simulated time and saves every `config.autosave_interval`.
    pub fn update_autosave(&mut self, delta: f32) {
        if self.save_slot.is_none() || self.config.autosave_interval <= 0.0 {
            return;
        }
        self.autosave_timer += delta;
        if self.autosave_timer >= self.config.autosave_interval {
            self.autosave_timer = 0.0;
            self.save_game();
        }
    }
}
