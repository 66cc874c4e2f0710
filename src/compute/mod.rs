//! The per-frame simulation.
//!
//! [`Simulation`] exclusively owns every entity collection and subsystem.
//! The host constructs it with its collaborators (input, renderer, save
//! store), calls [`Simulation::tick`] once per frame followed by
//! [`Simulation::render`], and drains [`Simulation::take_events`].
//!
//! The step functions are split by concern:
//! `combat` (targeting, projectiles, contact, rewards, pickups),
//! `boss` (encounters and boss attacks), `progression` (exp, upgrades,
//! stages, shop), `skills` (keyed abilities) and `persistence` (snapshots).

mod boss;
mod combat;
mod events;
mod persistence;
mod progression;
mod skills;

pub use boss::{BossDifficulty, BossEncounter, DAILY_BOSS_DATE_KEY};
pub use events::GameEvent;
pub use persistence::currency_key;
pub use skills::{RapidFocus, SkillTimer, Skills};

use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::{debug, info};

use crate::config::GameConfig;
use crate::drone::Drone;
use crate::entities::{Boss, BossProjectile, Enemy, ExperienceOrb, ItemDrop, Player, Portal, Projectile};
use crate::inventory::Inventory;
use crate::ports::{InputSource, Renderer, SaveStore};
use crate::save::PlayerProfile;
use crate::shop::Shop;
use crate::spawner::Spawner;
use crate::stage::{stage_theme, StageDifficulty, StageManager};
use crate::upgrades::{AutoBuildMode, Synergy, UpgradeManager, UpgradeOption};
use crate::vector2::Vector2;

pub struct Simulation<I: InputSource, R: Renderer, S: SaveStore> {
    pub config: GameConfig,
    pub input: I,
    pub renderer: R,
    pub store: S,
    pub rng: StdRng,

    // ── Run state ─────────────────────────────────────────────────────────────
    pub player: Player,
    pub stage: StageManager,
    pub spawner: Spawner,
    pub upgrades: UpgradeManager,
    pub synergy: Synergy,
    pub inventory: Inventory,
    pub shop: Shop,
    pub skills: Skills,
    pub currency: u64,

    // ── Entities ──────────────────────────────────────────────────────────────
    pub enemies: Vec<Enemy>,
    pub projectiles: Vec<Projectile>,
    pub boss_projectiles: Vec<BossProjectile>,
    pub experience_orbs: Vec<ExperienceOrb>,
    pub item_drops: Vec<ItemDrop>,
    pub drone: Option<Drone>,
    pub boss: Option<Boss>,
    pub encounter: BossEncounter,
    pub portal: Option<Portal>,

    // ── Flow ──────────────────────────────────────────────────────────────────
    pub difficulty: StageDifficulty,
    pub is_paused: bool,
    pub is_game_over: bool,
    pub auto_build: bool,
    pub auto_build_mode: AutoBuildMode,
    /// Offer awaiting [`Simulation::choose_upgrade`]; non-empty means paused.
    pub pending_upgrades: Vec<&'static UpgradeOption>,
    /// Stage-clear offers queued behind the one currently shown.
    pub bonus_offers: u32,
    pub stage_map_has_update: bool,
    pub save_slot: Option<String>,
    pub player_profile: Option<PlayerProfile>,
    pub autosave_timer: f32,
    pub events: Vec<GameEvent>,
}

impl<I: InputSource, R: Renderer, S: SaveStore> Simulation<I, R, S> {
    /// Seeds from `config.rng_seed`, or from entropy when unset.
    pub fn new(config: GameConfig, input: I, renderer: R, store: S) -> Self {
        let rng = match config.rng_seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self::with_rng(config, input, renderer, store, rng)
    }

    pub fn with_rng(config: GameConfig, input: I, renderer: R, store: S, mut rng: StdRng) -> Self {
        let shop = Shop::new(&mut rng);
        let mut sim = Self {
            player: Player::new(Vector2::ZERO),
            stage: StageManager::new(config.max_stage),
            spawner: Spawner::new(config.viewport_width, config.viewport_height),
            upgrades: UpgradeManager::new(),
            synergy: Synergy::default(),
            inventory: Inventory::new(),
            shop,
            skills: Skills::default(),
            currency: 0,
            enemies: Vec::new(),
            projectiles: Vec::new(),
            boss_projectiles: Vec::new(),
            experience_orbs: Vec::new(),
            item_drops: Vec::new(),
            drone: None,
            boss: None,
            encounter: BossEncounter::default(),
            portal: None,
            difficulty: StageDifficulty::default(),
            is_paused: false,
            is_game_over: false,
            auto_build: false,
            auto_build_mode: AutoBuildMode::default(),
            pending_upgrades: Vec::new(),
            bonus_offers: 0,
            stage_map_has_update: false,
            save_slot: None,
            player_profile: None,
            autosave_timer: 0.0,
            events: Vec::new(),
            config,
            input,
            renderer,
            store,
            rng,
        };
        sim.apply_stage_settings();
        sim
    }

    /// Advance the whole simulation by `delta` seconds, clamped to
    /// `config.max_delta`.  Does nothing while paused or after game over.
    pub fn tick(&mut self, delta: f32) {
        let delta = delta.min(self.config.max_delta).max(0.0);
        if self.is_game_over || self.is_paused {
            return;
        }

        // ── 1. Player & keyed skills ─────────────────────────────────────────
        self.player.update(delta, &self.input);
        self.update_skills(delta);
        self.update_portal(delta);

        // ── 2. Boss gate & regular spawns ────────────────────────────────────
        self.ensure_stage_boss();
        if !self.encounter.is_challenge && self.boss.is_none() && !self.stage.is_boss_stage() {
            let spawned = self.spawner.update(
                delta,
                self.stage.stage,
                self.player.position,
                &self.difficulty,
                &mut self.rng,
            );
            if !spawned.is_empty() {
                debug!(count = spawned.len(), stage = self.stage.stage, "spawned wave");
            }
            self.enemies.extend(spawned);
        }

        // ── 3. Attacks ───────────────────────────────────────────────────────
        self.auto_fire();
        self.update_drone(delta);
        self.update_projectiles(delta);
        self.update_boss(delta);
        self.update_boss_projectiles(delta);

        // ── 4. Contact, deaths & pickups ─────────────────────────────────────
        self.update_enemies(delta);
        self.update_item_drops();
        self.collect_experience(delta);

        self.update_autosave(delta);
    }

    /// Hand the current frame to the renderer.  Entities are lent read-only.
    pub fn render(&mut self) {
        let theme = stage_theme(self.stage.stage);
        let r = &mut self.renderer;
        r.begin_frame(self.player.position, &theme);
        r.draw_pickup_radius(&self.player);
        r.draw_experience(&self.experience_orbs);
        r.draw_item_drops(&self.item_drops);
        r.draw_portal(self.portal.as_ref());
        r.draw_player(&self.player);
        r.draw_drone(self.drone.as_ref());
        r.draw_projectiles(&self.projectiles);
        r.draw_boss_projectiles(&self.boss_projectiles);
        r.draw_boss(self.boss.as_ref());
        r.draw_enemies(&self.enemies);
        if self.difficulty.visibility_radius > 0.0 {
            r.draw_visibility_mask(&self.player, self.difficulty.visibility_radius);
        }
        r.end_frame();
    }

    pub fn take_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Host-driven pause (menus, overlays).  Unpausing is refused while an
    /// upgrade choice is pending.
    pub fn set_paused(&mut self, paused: bool) {
        self.is_paused = paused || !self.pending_upgrades.is_empty();
    }

    pub fn set_viewport(&mut self, width: f32, height: f32) {
        self.config.viewport_width = width;
        self.config.viewport_height = height;
        self.spawner.set_viewport(width, height);
    }

    pub(crate) fn trigger_game_over(&mut self) {
        if self.is_game_over {
            return;
        }
        self.is_game_over = true;
        info!(stage = self.stage.stage, level = self.upgrades.level, "game over");
        self.events.push(GameEvent::GameOver);
    }
}
