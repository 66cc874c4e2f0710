//! Procedural enemy waves.
//!
//! Every call draws from the injected RNG so a seeded generator reproduces a
//! wave exactly.

use rand::Rng;

use crate::constants::{
    DEFAULT_SPAWN_INTERVAL, MAX_SPAWN_BATCH, MIN_SPAWN_INTERVAL, SPAWN_PADDING,
};
use crate::entities::{Enemy, EnemyKind};
use crate::stage::StageDifficulty;
use crate::vector2::Vector2;

/// Base stats for one catalog entry, before difficulty scaling.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EnemyTemplate {
    pub kind: EnemyKind,
    pub radius: f32,
    pub speed: f32,
    pub health: f32,
    pub contact_damage: f32,
    pub reward: u32,
}

/// Enemy types available on `stage`.  Later kinds unlock at stages
/// 3, 5, 7, 9 and 12; base speed grows with the stage.
pub fn catalog(stage: u32) -> Vec<EnemyTemplate> {
    let s = stage as f32;
    let entry = |kind, radius, speed, health, reward| EnemyTemplate {
        kind,
        radius,
        speed,
        health,
        contact_damage: 1.0,
        reward,
    };
    let mut out = vec![entry(EnemyKind::Spider, 22.0, 50.0 + s * 4.0, 1.0, 1)];
    if stage >= 3 {
        out.push(entry(EnemyKind::Bunny, 20.0, 90.0 + s * 6.0, 1.0, 2));
    }
    if stage >= 5 {
        out.push(entry(EnemyKind::Beast, 30.0, 40.0 + s * 2.0, 2.0, 3));
    }
    if stage >= 7 {
        out.push(entry(EnemyKind::Snake, 18.0, 120.0 + s * 5.0, 1.0, 2));
    }
    if stage >= 9 {
        out.push(entry(EnemyKind::Goblin, 22.0, 80.0 + s * 3.0, 1.0, 3));
    }
    if stage >= 12 {
        out.push(entry(EnemyKind::Slime, 19.0, 100.0 + s * 4.0, 1.0, 4));
    }
    out
}

#[derive(Clone, Debug)]
pub struct Spawner {
    pub viewport_width: f32,
    pub viewport_height: f32,
    pub spawn_interval: f32,
    pub spawn_timer: f32,
}

impl Spawner {
    pub fn new(viewport_width: f32, viewport_height: f32) -> Self {
        Self {
            viewport_width,
            viewport_height,
            spawn_interval: DEFAULT_SPAWN_INTERVAL,
            spawn_timer: 0.0,
        }
    }

    pub fn set_viewport(&mut self, width: f32, height: f32) {
        self.viewport_width = width;
        self.viewport_height = height;
    }

    /// Floors at 0.25 s.
    pub fn set_spawn_interval(&mut self, interval: f32) {
        self.spawn_interval = interval.max(MIN_SPAWN_INTERVAL);
    }

    /// Returns a batch of `min(6, 1 + stage / 3)` enemies each time the timer
    /// crosses the interval, otherwise an empty batch.
    pub fn update(
        &mut self,
        delta: f32,
        stage: u32,
        center: Vector2,
        difficulty: &StageDifficulty,
        rng: &mut impl Rng,
    ) -> Vec<Enemy> {
        self.spawn_timer += delta;
        if self.spawn_timer < self.spawn_interval {
            return Vec::new();
        }
        self.spawn_timer = 0.0;
        let count = (1 + stage / 3).min(MAX_SPAWN_BATCH);
        (0..count)
            .map(|_| self.spawn_enemy(stage, center, difficulty, rng))
            .collect()
    }

    pub fn spawn_enemy(
        &self,
        stage: u32,
        center: Vector2,
        difficulty: &StageDifficulty,
        rng: &mut impl Rng,
    ) -> Enemy {
        let position = self.edge_position(center, rng);
        let options = catalog(stage);
        let choice = options[rng.gen_range(0..options.len())];
        Enemy {
            kind: choice.kind,
            position,
            radius: choice.radius,
            speed: choice.speed * difficulty.speed_scale,
            health: ((choice.health + stage as f32 * 0.2) * difficulty.health_scale).ceil(),
            contact_damage: choice.contact_damage,
            reward: (choice.reward as f32 * difficulty.reward_scale).ceil() as u32,
            hit_timer: 0.0,
        }
    }

    /// A point just outside one of the four viewport edges, chosen uniformly.
    fn edge_position(&self, center: Vector2, rng: &mut impl Rng) -> Vector2 {
        let half_w = self.viewport_width / 2.0;
        let half_h = self.viewport_height / 2.0;
        let along = rng.gen::<f32>() * 2.0 - 1.0;
        match rng.gen_range(0..4) {
            0 => Vector2::new(center.x + along * half_w, center.y - half_h - SPAWN_PADDING),
            1 => Vector2::new(center.x + half_w + SPAWN_PADDING, center.y + along * half_h),
            2 => Vector2::new(center.x + along * half_w, center.y + half_h + SPAWN_PADDING),
            _ => Vector2::new(center.x - half_w - SPAWN_PADDING, center.y + along * half_h),
        }
    }
}
