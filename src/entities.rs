//! Game entity types and their per-frame update rules.
//!
//! Every entity owns its own position; nothing here holds a reference to
//! another entity.  Targets are passed into `update` by value.

use serde::{Deserialize, Serialize};

use crate::collision::Body;
use crate::constants::*;
use crate::effect::Effect;
use crate::ports::InputSource;
use crate::vector2::Vector2;

// ── Player ────────────────────────────────────────────────────────────────────

/// Direction the avatar faces; only used to pick an animation row.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Facing {
    Left,
    Right,
    Up,
    #[default]
    Down,
}

#[derive(Clone, Debug)]
pub struct Player {
    pub position: Vector2,
    pub radius: f32,
    pub speed: f32,
    pub attack_power: f32,
    pub fire_cooldown: f32,
    pub fire_timer: f32,
    pub projectile_count: u32,
    /// Item drops are collected inside this radius.
    pub pickup_radius: f32,
    /// Experience orbs are collected inside this radius...
    pub orb_pickup_radius: f32,
    /// ...and pulled toward the player inside this one.
    pub magnet_radius: f32,
    pub barrier_level: u32,
    pub barrier_radius: f32,
    pub barrier_damage: f32,
    pub exp_multiplier: f32,
    pub max_health: f32,
    pub health: f32,
    pub invulnerable_timer: f32,
    pub facing: Facing,
    pub is_moving: bool,
    pub anim_time: f32,
    pub stage_speed_multiplier: f32,
}

impl Player {
    pub fn new(position: Vector2) -> Self {
        Self {
            position,
            radius: PLAYER_RADIUS,
            speed: PLAYER_SPEED,
            attack_power: 1.0,
            fire_cooldown: PLAYER_FIRE_COOLDOWN,
            fire_timer: 0.0,
            projectile_count: 1,
            pickup_radius: PICKUP_RADIUS,
            orb_pickup_radius: ORB_PICKUP_RADIUS,
            magnet_radius: MAGNET_RADIUS,
            barrier_level: 0,
            barrier_radius: 0.0,
            barrier_damage: BARRIER_DAMAGE,
            exp_multiplier: 1.0,
            max_health: PLAYER_MAX_HEALTH,
            health: PLAYER_MAX_HEALTH,
            invulnerable_timer: 0.0,
            facing: Facing::Down,
            is_moving: false,
            anim_time: 0.0,
            stage_speed_multiplier: 1.0,
        }
    }

    pub fn update(&mut self, delta: f32, input: &impl InputSource) {
        let direction = input.direction();
        self.is_moving = direction.length() > 0.0;
        if self.is_moving {
            self.anim_time += delta;
            self.facing = if direction.x.abs() > direction.y.abs() {
                if direction.x < 0.0 { Facing::Left } else { Facing::Right }
            } else if direction.y < 0.0 {
                Facing::Up
            } else {
                Facing::Down
            };
        }
        let speed = self.effective_speed();
        self.position = self.position.add(direction.scale(speed * delta));

        self.fire_timer = (self.fire_timer - delta).max(0.0);
        self.invulnerable_timer = (self.invulnerable_timer - delta).max(0.0);
    }

    pub fn effective_speed(&self) -> f32 {
        self.speed * self.stage_speed_multiplier
    }

    pub fn can_fire(&self) -> bool {
        self.fire_timer <= 0.0
    }

    pub fn reset_fire_timer(&mut self) {
        self.fire_timer = self.fire_cooldown;
    }

    /// Returns `false` without touching health while the grace window runs.
    pub fn take_damage(&mut self, amount: f32) -> bool {
        if self.invulnerable_timer > 0.0 {
            return false;
        }
        self.health = (self.health - amount).max(0.0);
        self.invulnerable_timer = INVULNERABLE_DURATION;
        true
    }

    pub fn is_dead(&self) -> bool {
        self.health <= 0.0
    }

    // ── Upgrade mutators ──────────────────────────────────────────────────────

    pub fn increase_attack(&mut self) {
        self.attack_power += 1.0;
    }

    pub fn improve_fire_rate(&mut self) {
        self.fire_cooldown = (self.fire_cooldown - FIRE_COOLDOWN_STEP).max(MIN_FIRE_COOLDOWN);
    }

    pub fn increase_speed(&mut self) {
        self.speed *= 1.1;
    }

    pub fn increase_projectile_count(&mut self) {
        self.projectile_count += 1;
    }

    pub fn increase_pickup_radius(&mut self) {
        self.pickup_radius += 30.0;
    }

    pub fn increase_magnet_radius(&mut self) {
        self.magnet_radius += 40.0;
    }

    pub fn increase_exp_drop(&mut self) {
        self.exp_multiplier += 0.25;
    }

    pub fn increase_max_health(&mut self) {
        self.max_health += 2.0;
        self.health = (self.health + 2.0).min(self.max_health);
    }

    /// First call turns the barrier on; later calls widen it.
    pub fn enable_barrier(&mut self) {
        if self.barrier_level == 0 {
            self.barrier_level = 1;
            self.barrier_radius = BARRIER_BASE_RADIUS;
            return;
        }
        self.increase_barrier_radius();
    }

    pub fn increase_barrier_radius(&mut self) {
        if self.barrier_level == 0 {
            self.enable_barrier();
            return;
        }
        self.barrier_level += 1;
        self.barrier_radius += BARRIER_RADIUS_STEP;
    }
}

impl Body for Player {
    fn position(&self) -> Vector2 {
        self.position
    }
    fn radius(&self) -> f32 {
        self.radius
    }
}

// ── Enemies ───────────────────────────────────────────────────────────────────

/// Sprite family; each family has its own base stats in the spawner catalog.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EnemyKind {
    Spider,
    Bunny,
    Beast,
    Snake,
    Goblin,
    Slime,
}

impl EnemyKind {
    pub fn sprite_id(self) -> &'static str {
        match self {
            EnemyKind::Spider => "spider",
            EnemyKind::Bunny => "bunny",
            EnemyKind::Beast => "beast",
            EnemyKind::Snake => "snake",
            EnemyKind::Goblin => "goblin",
            EnemyKind::Slime => "slime",
        }
    }

    pub fn color(self) -> &'static str {
        match self {
            EnemyKind::Spider | EnemyKind::Slime => "#f56565",
            EnemyKind::Bunny => "#f6ad55",
            EnemyKind::Beast => "#68d391",
            EnemyKind::Snake => "#63b3ed",
            EnemyKind::Goblin => "#7f9cf5",
        }
    }
}

#[derive(Clone, Debug)]
pub struct Enemy {
    pub kind: EnemyKind,
    pub position: Vector2,
    pub radius: f32,
    pub speed: f32,
    pub health: f32,
    pub contact_damage: f32,
    /// Currency paid out on death.
    pub reward: u32,
    /// Cosmetic hit flash.
    pub hit_timer: f32,
}

impl Enemy {
    /// Pure pursuit: straight at the target, no steering or avoidance.
    pub fn update(&mut self, delta: f32, target: Vector2) {
        let direction = target.subtract(self.position).normalize();
        self.position = self.position.add(direction.scale(self.speed * delta));
        self.hit_timer = (self.hit_timer - delta).max(0.0);
    }

    pub fn take_damage(&mut self, amount: f32) {
        self.health = (self.health - amount).max(0.0);
        self.hit_timer = ENEMY_HIT_FLASH;
    }

    pub fn is_dead(&self) -> bool {
        self.health <= 0.0
    }
}

impl Body for Enemy {
    fn position(&self) -> Vector2 {
        self.position
    }
    fn radius(&self) -> f32 {
        self.radius
    }
}

// ── Boss ──────────────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BossSprite {
    /// Challenge boss; the renderer picks art by phase.
    Mage,
    /// Stage-gate boss drawn as an oversized critter.
    Critter(&'static str),
}

#[derive(Clone, Debug)]
pub struct BossConfig {
    pub position: Vector2,
    pub radius: f32,
    pub speed: f32,
    pub max_health: f32,
    pub damage: f32,
    pub projectile_speed: f32,
    pub attack_interval: f32,
    pub burst_interval: f32,
    pub sprite: BossSprite,
}

#[derive(Clone, Debug)]
pub struct Boss {
    pub position: Vector2,
    pub radius: f32,
    pub speed: f32,
    pub max_health: f32,
    pub health: f32,
    /// Contact damage.
    pub damage: f32,
    pub projectile_speed: f32,
    pub attack_interval: f32,
    pub burst_interval: f32,
    pub sprite: BossSprite,
    pub anim_time: f32,
    pub attack_timer: f32,
    pub burst_timer: f32,
    pub hit_timer: f32,
}

impl Boss {
    pub fn new(config: BossConfig) -> Self {
        Self {
            position: config.position,
            radius: config.radius,
            speed: config.speed,
            max_health: config.max_health,
            health: config.max_health,
            damage: config.damage,
            projectile_speed: config.projectile_speed,
            attack_interval: config.attack_interval,
            burst_interval: config.burst_interval,
            sprite: config.sprite,
            anim_time: 0.0,
            attack_timer: 0.0,
            burst_timer: 0.0,
            hit_timer: 0.0,
        }
    }

    /// Closes in until it reaches the standoff distance, then holds.
    pub fn update(&mut self, delta: f32, player_position: Vector2) {
        self.anim_time += delta;
        self.attack_timer += delta;
        self.burst_timer += delta;
        self.hit_timer = (self.hit_timer - delta).max(0.0);

        let to_player = player_position.subtract(self.position);
        if to_player.length() > BOSS_STANDOFF_DISTANCE {
            let step = to_player.normalize().scale(self.speed * delta);
            self.position = self.position.add(step);
        }
    }

    pub fn take_damage(&mut self, amount: f32) {
        self.health = (self.health - amount).max(0.0);
        self.hit_timer = ENEMY_HIT_FLASH;
    }

    pub fn is_dead(&self) -> bool {
        self.health <= 0.0
    }

    pub fn can_attack(&self) -> bool {
        self.attack_timer >= self.attack_interval
    }

    pub fn reset_attack(&mut self) {
        self.attack_timer = 0.0;
    }

    pub fn can_burst(&self) -> bool {
        self.burst_timer >= self.burst_interval
    }

    pub fn reset_burst(&mut self) {
        self.burst_timer = 0.0;
    }

    pub fn health_ratio(&self) -> f32 {
        if self.max_health > 0.0 {
            self.health / self.max_health
        } else {
            0.0
        }
    }

    pub fn aim_direction(&self, player_position: Vector2) -> Vector2 {
        player_position.subtract(self.position).normalize()
    }
}

impl Body for Boss {
    fn position(&self) -> Vector2 {
        self.position
    }
    fn radius(&self) -> f32 {
        self.radius
    }
}

// ── Projectiles ───────────────────────────────────────────────────────────────

/// A player shot.  Culled once it strays `max_range` from the origin it is
/// updated against (the player, since the camera follows the player).
#[derive(Clone, Debug)]
pub struct Projectile {
    pub position: Vector2,
    pub velocity: Vector2,
    pub damage: f32,
    pub radius: f32,
    pub is_active: bool,
}

impl Projectile {
    pub fn new(position: Vector2, direction: Vector2, speed: f32, damage: f32) -> Self {
        Self {
            position,
            velocity: direction.normalize().scale(speed),
            damage,
            radius: PROJECTILE_RADIUS,
            is_active: true,
        }
    }

    pub fn update(&mut self, delta: f32, origin: Vector2, max_range: f32) {
        self.position = self.position.add(self.velocity.scale(delta));
        if self.position.distance_to(origin) > max_range {
            self.is_active = false;
        }
    }
}

impl Body for Projectile {
    fn position(&self) -> Vector2 {
        self.position
    }
    fn radius(&self) -> f32 {
        self.radius
    }
}

#[derive(Clone, Debug)]
pub struct BossProjectile {
    pub position: Vector2,
    pub velocity: Vector2,
    pub damage: f32,
    pub radius: f32,
    pub is_active: bool,
}

impl BossProjectile {
    pub fn new(position: Vector2, velocity: Vector2, damage: f32) -> Self {
        Self {
            position,
            velocity,
            damage,
            radius: BOSS_PROJECTILE_RADIUS,
            is_active: true,
        }
    }

    pub fn update(&mut self, delta: f32, origin: Vector2, max_range: f32) {
        self.position = self.position.add(self.velocity.scale(delta));
        if self.position.distance_to(origin) > max_range {
            self.is_active = false;
        }
    }
}

impl Body for BossProjectile {
    fn position(&self) -> Vector2 {
        self.position
    }
    fn radius(&self) -> f32 {
        self.radius
    }
}

// ── Pickups ───────────────────────────────────────────────────────────────────

#[derive(Clone, Debug)]
pub struct ExperienceOrb {
    pub position: Vector2,
    pub radius: f32,
    pub value: u32,
}

impl ExperienceOrb {
    pub fn new(position: Vector2, value: u32) -> Self {
        Self { position, radius: ORB_RADIUS, value }
    }

    pub fn move_toward(&mut self, target: Vector2, speed: f32, delta: f32) {
        let direction = target.subtract(self.position).normalize();
        self.position = self.position.add(direction.scale(speed * delta));
    }
}

impl Body for ExperienceOrb {
    fn position(&self) -> Vector2 {
        self.position
    }
    fn radius(&self) -> f32 {
        self.radius
    }
}

/// Loot that can fall from a dying enemy.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ItemKind {
    Core,
    Reactor,
    Armor,
    DroneChip,
}

impl ItemKind {
    pub const ALL: [ItemKind; 4] = [
        ItemKind::Core,
        ItemKind::Reactor,
        ItemKind::Armor,
        ItemKind::DroneChip,
    ];

    pub fn id(self) -> &'static str {
        match self {
            ItemKind::Core => "core",
            ItemKind::Reactor => "reactor",
            ItemKind::Armor => "armor",
            ItemKind::DroneChip => "drone-chip",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ItemKind::Core => "Core",
            ItemKind::Reactor => "Reactor",
            ItemKind::Armor => "Armor",
            ItemKind::DroneChip => "Drone Chip",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            ItemKind::Core => "Attack +1",
            ItemKind::Reactor => "Fire cooldown -0.1s",
            ItemKind::Armor => "Max HP +2",
            ItemKind::DroneChip => "Drone upgrade +1",
        }
    }

    pub fn effect(self) -> Effect {
        match self {
            ItemKind::Core => Effect::IncreaseAttack,
            ItemKind::Reactor => Effect::ImproveFireRate,
            ItemKind::Armor => Effect::IncreaseMaxHealth,
            ItemKind::DroneChip => Effect::UpgradeDrone,
        }
    }
}

#[derive(Clone, Debug)]
pub struct ItemDrop {
    pub kind: ItemKind,
    pub position: Vector2,
    pub radius: f32,
}

impl ItemDrop {
    pub fn new(kind: ItemKind, position: Vector2) -> Self {
        Self { kind, position, radius: ITEM_DROP_RADIUS }
    }
}

impl Body for ItemDrop {
    fn position(&self) -> Vector2 {
        self.position
    }
    fn radius(&self) -> f32 {
        self.radius
    }
}

/// Exit that appears after a stage is cleared.
#[derive(Clone, Debug)]
pub struct Portal {
    pub position: Vector2,
    pub radius: f32,
    /// Cosmetic animation clock.
    pub pulse: f32,
}

impl Portal {
    pub fn new(position: Vector2) -> Self {
        Self { position, radius: PORTAL_RADIUS, pulse: 0.0 }
    }
}
