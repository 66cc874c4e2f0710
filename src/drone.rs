//! Orbiting companion that dashes into the nearest hostile.

use std::f32::consts::TAU;

use rand::Rng;

use crate::collision::Body;
use crate::constants::{DRONE_MAX_LEVEL, DRONE_ORBIT_RADIUS, DRONE_RADIUS};
use crate::vector2::Vector2;

const WANDER_PERIOD: f32 = 1.2;
const WANDER_JITTER: f32 = 0.4;
const WANDER_REACH: f32 = 1.4;
const WANDER_DRIFT: f32 = 0.35;
/// Attack is abandoned once the target is this many ranges away.
const LEASH_FACTOR: f32 = 1.5;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DroneMode {
    Orbit,
    Attack,
    Return,
}

#[derive(Clone, Debug)]
pub struct Drone {
    pub level: u32,
    pub position: Vector2,
    pub orbit_radius: f32,
    pub orbit_speed: f32,
    pub attack_power: f32,
    pub attack_speed: f32,
    pub attack_range: f32,
    pub hit_cooldown: f32,
    pub radius: f32,
    pub angle: f32,
    pub attack_timer: f32,
    pub mode: DroneMode,
    pub wander_angle: f32,
    pub wander_timer: f32,
}

impl Drone {
    /// A fresh level-1 drone.
    pub fn new(position: Vector2, rng: &mut impl Rng) -> Self {
        Self::at_level(1, position, rng)
    }

    /// Rebuild a drone of the given level, e.g. from a save.  The per-level
    /// curve here is gentler than repeated [`Drone::upgrade`] calls.
    pub fn at_level(level: u32, position: Vector2, rng: &mut impl Rng) -> Self {
        let level = level.clamp(1, DRONE_MAX_LEVEL);
        let steps = (level - 1) as f32;
        Self {
            level,
            position,
            orbit_radius: DRONE_ORBIT_RADIUS,
            orbit_speed: 2.1 + steps * 0.3,
            attack_power: 1.0 + steps,
            attack_speed: 320.0 + steps * 40.0,
            attack_range: 420.0 + steps * 40.0,
            hit_cooldown: (0.6 - steps * 0.05).max(0.3),
            radius: DRONE_RADIUS,
            angle: 0.0,
            attack_timer: 0.0,
            mode: DroneMode::Orbit,
            wander_angle: rng.gen::<f32>() * TAU,
            wander_timer: 0.0,
        }
    }

    /// Advance one frame.  `target` is the nearest hostile's position and
    /// radius.  Returns `true` on the frame the drone connects; the caller
    /// applies `attack_power` to that target.
    pub fn update(
        &mut self,
        delta: f32,
        player_position: Vector2,
        target: Option<(Vector2, f32)>,
        rng: &mut impl Rng,
    ) -> bool {
        self.attack_timer = (self.attack_timer - delta).max(0.0);
        self.wander_timer += delta;
        if self.wander_timer >= WANDER_PERIOD {
            self.wander_timer = 0.0;
            self.wander_angle += rng.gen_range(-WANDER_JITTER..WANDER_JITTER);
        }

        let orbit_point = player_position.add(Vector2::from_angle(self.angle).scale(self.orbit_radius));
        let wander_point = player_position
            .add(Vector2::from_angle(self.wander_angle).scale(self.orbit_radius * WANDER_REACH));

        if self.mode == DroneMode::Return {
            let to_orbit = orbit_point.subtract(self.position);
            let step = self.attack_speed * delta;
            if to_orbit.length() <= step {
                self.position = orbit_point;
                self.mode = DroneMode::Orbit;
            } else {
                self.position = self.position.add(to_orbit.normalize().scale(step));
            }
            return false;
        }

        if let Some((target_position, target_radius)) = target {
            if self.attack_timer <= 0.0 {
                let to_target = target_position.subtract(self.position);
                let distance = to_target.length();
                if distance <= self.attack_range {
                    self.mode = DroneMode::Attack;
                }
                if self.mode == DroneMode::Attack {
                    self.position = self
                        .position
                        .add(to_target.normalize().scale(self.attack_speed * delta));
                    if distance <= self.radius + target_radius {
                        self.attack_timer = self.hit_cooldown;
                        self.mode = DroneMode::Return;
                        return true;
                    }
                    if distance > self.attack_range * LEASH_FACTOR {
                        self.mode = DroneMode::Return;
                    }
                    return false;
                }
            }
        }

        self.angle += self.orbit_speed * delta;
        let drift = wander_point.subtract(orbit_point).scale(WANDER_DRIFT);
        self.position = orbit_point.add(drift);
        false
    }

    /// No-op at max level.
    pub fn upgrade(&mut self) {
        if self.is_max_level() {
            return;
        }
        self.level += 1;
        self.orbit_speed *= 1.1;
        self.attack_speed *= 1.1;
        self.hit_cooldown = (self.hit_cooldown - 0.1).max(0.25);
        self.attack_power += 1.0;
        self.radius += 2.0;
    }

    pub fn is_max_level(&self) -> bool {
        self.level >= DRONE_MAX_LEVEL
    }
}

impl Body for Drone {
    fn position(&self) -> Vector2 {
        self.position
    }
    fn radius(&self) -> f32 {
        self.radius
    }
}
