//! Keyed abilities: the Space nova and the Q/W/E/R skill row.

use std::f32::consts::TAU;

use super::Simulation;
use crate::entities::Projectile;
use crate::ports::{InputSource, Key, Renderer, SaveStore};
use crate::vector2::Vector2;

const NOVA_COOLDOWN: f32 = 8.0;
const NOVA_SHOTS: u32 = 32;
const NOVA_SPEED: f32 = 420.0;
const NOVA_DAMAGE_FACTOR: f32 = 0.8;

const RAPID_FOCUS_DURATION: f32 = 3.2;
const RAPID_FOCUS_INTERVAL: f32 = 0.12;
const RAPID_FOCUS_SPEED_BOOST: f32 = 1.2;
/// Share of every other cooldown removed by the refresh skill.
const REFRESH_RATIO: f32 = 0.4;

/// Cooldown bookkeeping for one skill.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SkillTimer {
    pub cooldown: f32,
    /// Seconds until ready; 0 means ready.
    pub timer: f32,
    pub locked: bool,
}

impl SkillTimer {
    pub fn new(cooldown: f32) -> Self {
        Self { cooldown, timer: 0.0, locked: false }
    }

    pub fn locked() -> Self {
        Self { cooldown: 0.0, timer: 0.0, locked: true }
    }

    pub fn is_ready(&self) -> bool {
        !self.locked && self.timer <= 0.0
    }

    pub fn tick(&mut self, delta: f32) {
        self.timer = (self.timer - delta).max(0.0);
    }

    pub fn trigger(&mut self) {
        self.timer = self.cooldown;
    }

    fn shorten(&mut self, multiplier: f32) {
        self.timer *= multiplier;
    }
}

/// The timed auto-burst started by the W skill.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct RapidFocus {
    pub active: bool,
    pub timer: f32,
    pub tick: f32,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Skills {
    /// Space.
    pub nova: SkillTimer,
    /// Q: aimed fan of shots.
    pub burst: SkillTimer,
    /// W: starts [`RapidFocus`].
    pub rapid: SkillTimer,
    /// E: cuts the other cooldowns.
    pub refresh: SkillTimer,
    /// R: not unlocked in this build.
    pub reserved: SkillTimer,
    pub rapid_focus: RapidFocus,
}

impl Default for Skills {
    fn default() -> Self {
        Self {
            nova: SkillTimer::new(NOVA_COOLDOWN),
            burst: SkillTimer::new(6.0),
            rapid: SkillTimer::new(12.0),
            refresh: SkillTimer::new(18.0),
            reserved: SkillTimer::locked(),
            rapid_focus: RapidFocus::default(),
        }
    }
}

impl<I: InputSource, R: Renderer, S: SaveStore> Simulation<I, R, S> {
    /// Ticks cooldowns and casts whatever was pressed this frame.
    pub fn update_skills(&mut self, delta: f32) {
        self.skills.nova.tick(delta);
        if self.input.consume_pressed(Key::Space) && self.skills.nova.is_ready() {
            self.cast_nova();
            self.skills.nova.trigger();
        }

        self.update_rapid_focus(delta);
        for timer in [
            &mut self.skills.burst,
            &mut self.skills.rapid,
            &mut self.skills.refresh,
            &mut self.skills.reserved,
        ] {
            timer.tick(delta);
        }

        if self.input.consume_pressed(Key::Q) && self.skills.burst.is_ready() {
            self.cast_focused_burst(22, 0.6, 380.0, 1.1);
            self.skills.burst.trigger();
        }
        if self.input.consume_pressed(Key::W) && self.skills.rapid.is_ready() {
            self.start_rapid_focus();
            self.skills.rapid.trigger();
        }
        if self.input.consume_pressed(Key::E) && self.skills.refresh.is_ready() {
            self.refresh_cooldowns(REFRESH_RATIO);
            self.skills.refresh.trigger();
        }
        // R stays locked; the press is still consumed.
        self.input.consume_pressed(Key::R);
    }

    /// Ring of shots around the player.
    pub fn cast_nova(&mut self) {
        let origin = self.player.position;
        let damage = (self.player.attack_power * NOVA_DAMAGE_FACTOR).max(1.0);
        for i in 0..NOVA_SHOTS {
            let direction = Vector2::from_angle(TAU * i as f32 / NOVA_SHOTS as f32);
            self.projectiles.push(Projectile::new(origin, direction, NOVA_SPEED, damage));
        }
    }

    /// Fan of `count` shots centred on the nearest hostile.  Nothing is fired
    /// without a target.
    pub fn cast_focused_burst(&mut self, count: u32, spread: f32, speed: f32, damage_factor: f32) {
        let origin = self.player.position;
        let Some((target, _)) = self
            .closest_target(origin)
            .and_then(|target| self.target_body(target))
        else {
            return;
        };
        let aim = target.subtract(origin).normalize().angle();
        let start = aim - spread * count.saturating_sub(1) as f32 / 2.0;
        let damage = (self.player.attack_power * damage_factor).max(1.0);
        for i in 0..count {
            let direction = Vector2::from_angle(start + spread * i as f32);
            self.projectiles.push(Projectile::new(origin, direction, speed, damage));
        }
    }

    pub fn start_rapid_focus(&mut self) {
        self.skills.rapid_focus = RapidFocus {
            active: true,
            timer: RAPID_FOCUS_DURATION,
            tick: 0.0,
        };
        self.player.stage_speed_multiplier *= RAPID_FOCUS_SPEED_BOOST;
    }

    fn update_rapid_focus(&mut self, delta: f32) {
        if !self.skills.rapid_focus.active {
            return;
        }
        let focus = &mut self.skills.rapid_focus;
        focus.timer -= delta;
        focus.tick -= delta;
        let fire = focus.tick <= 0.0;
        if fire {
            focus.tick = RAPID_FOCUS_INTERVAL;
        }
        let finished = focus.timer <= 0.0;
        if finished {
            focus.active = false;
        }

        if fire {
            self.cast_focused_burst(8, 0.35, 420.0, 0.75);
        }
        if finished {
            self.player.stage_speed_multiplier = self.difficulty.speed_penalty;
        }
    }

    /// Scales every remaining cooldown except the refresh skill's own.
    pub fn refresh_cooldowns(&mut self, ratio: f32) {
        let multiplier = (1.0 - ratio).clamp(0.0, 1.0);
        self.skills.nova.shorten(multiplier);
        self.skills.burst.shorten(multiplier);
        self.skills.rapid.shorten(multiplier);
        self.skills.reserved.shorten(multiplier);
    }
}
