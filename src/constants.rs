//! Gameplay tuning constants.

// ── Frame ─────────────────────────────────────────────────────────────────────

/// Largest step the simulation integrates in one tick (seconds).
pub const MAX_DELTA: f32 = 0.05;

// ── Player ────────────────────────────────────────────────────────────────────

pub const PLAYER_RADIUS: f32 = 14.0;
pub const PLAYER_SPEED: f32 = 160.0;
pub const PLAYER_MAX_HEALTH: f32 = 10.0;
pub const PLAYER_FIRE_COOLDOWN: f32 = 1.0;
pub const MIN_FIRE_COOLDOWN: f32 = 0.2;
pub const FIRE_COOLDOWN_STEP: f32 = 0.1;
pub const PICKUP_RADIUS: f32 = 50.0;
pub const ORB_PICKUP_RADIUS: f32 = 16.0;
pub const MAGNET_RADIUS: f32 = 140.0;
/// Grace window after a landed hit (seconds).
pub const INVULNERABLE_DURATION: f32 = 0.6;

pub const BARRIER_BASE_RADIUS: f32 = 70.0;
pub const BARRIER_RADIUS_STEP: f32 = 15.0;
/// Barrier damage per second to each enemy inside it.
pub const BARRIER_DAMAGE: f32 = 0.6;

// ── Projectiles ───────────────────────────────────────────────────────────────

pub const PROJECTILE_SPEED: f32 = 320.0;
pub const PROJECTILE_RADIUS: f32 = 4.0;
/// Lateral gap between parallel autofire shots.
pub const PROJECTILE_SPACING: f32 = 10.0;
pub const BOSS_PROJECTILE_RADIUS: f32 = 8.0;
/// Player shots are culled beyond this multiple of the larger viewport side.
pub const PROJECTILE_RANGE_FACTOR: f32 = 1.2;
pub const BOSS_PROJECTILE_RANGE_FACTOR: f32 = 1.8;

// ── Enemies & rewards ─────────────────────────────────────────────────────────

pub const ENEMY_HIT_FLASH: f32 = 0.12;
pub const ORB_RADIUS: f32 = 7.0;
pub const ITEM_DROP_RADIUS: f32 = 12.0;
pub const ITEM_DROP_CHANCE: f64 = 0.18;
pub const MIN_MAGNET_SPEED: f32 = 120.0;

// ── Spawner ───────────────────────────────────────────────────────────────────

pub const DEFAULT_SPAWN_INTERVAL: f32 = 0.65;
pub const MIN_SPAWN_INTERVAL: f32 = 0.25;
pub const MAX_SPAWN_BATCH: u32 = 6;
/// Distance outside the viewport edge at which enemies appear.
pub const SPAWN_PADDING: f32 = 60.0;

// ── Stages ────────────────────────────────────────────────────────────────────

pub const MAX_STAGE: u32 = 50;
pub const BOSS_STAGE_INTERVAL: u32 = 5;
pub const KILLS_PER_STAGE: u32 = 10;
pub const PORTAL_RADIUS: f32 = 26.0;

// ── Boss ──────────────────────────────────────────────────────────────────────

pub const BOSS_STANDOFF_DISTANCE: f32 = 180.0;
pub const CHALLENGE_MAX_PHASE: u32 = 3;
pub const STAGE_BOSS_MAX_PHASE: u32 = 1;
pub const DAILY_REWARD_CURRENCY: i64 = 4000;
pub const DAILY_REWARD_EXP: u32 = 8000;

pub const STAGE_BOSS_SPRITES: &[&str] = &[
    "spider", "dino", "bunny", "snake", "turtle", "eyeball", "goblin", "beast", "slime",
];

// ── Upgrades ──────────────────────────────────────────────────────────────────

pub const INITIAL_NEXT_EXP: u32 = 3;
pub const UPGRADE_CHOICE_COUNT: usize = 3;
pub const SYNERGY_THRESHOLD: u32 = 3;

// ── Drone ─────────────────────────────────────────────────────────────────────

pub const DRONE_MAX_LEVEL: u32 = 3;
pub const DRONE_ORBIT_RADIUS: f32 = 90.0;
pub const DRONE_RADIUS: f32 = 14.0;

// ── Shop ──────────────────────────────────────────────────────────────────────

pub const SHOP_OFFER_SIZE: usize = 4;
