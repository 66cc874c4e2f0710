//! Targeting, projectiles, contact damage, kill rewards and pickups.

use rand::seq::SliceRandom;
use rand::Rng;
use tracing::debug;

use super::{GameEvent, Simulation};
use crate::collision::{collides, find_closest, Target};
use crate::constants::{
    BOSS_PROJECTILE_RANGE_FACTOR, ITEM_DROP_CHANCE, MIN_MAGNET_SPEED, PROJECTILE_RANGE_FACTOR,
    PROJECTILE_SPACING, PROJECTILE_SPEED,
};
use crate::entities::{Enemy, ExperienceOrb, ItemDrop, ItemKind, Projectile};
use crate::ports::{InputSource, Renderer, SaveStore};
use crate::vector2::Vector2;

impl<I: InputSource, R: Renderer, S: SaveStore> Simulation<I, R, S> {
    // ── Targeting ─────────────────────────────────────────────────────────────

    /// Nearest hostile to `from`; the boss counts as a candidate.
    pub fn closest_target(&self, from: Vector2) -> Option<Target> {
        find_closest(from, &self.enemies, self.boss.as_ref())
    }

    /// Position and radius of a target, if it still exists.
    pub fn target_body(&self, target: Target) -> Option<(Vector2, f32)> {
        match target {
            Target::Enemy(i) => self.enemies.get(i).map(|e| (e.position, e.radius)),
            Target::Boss => self.boss.as_ref().map(|b| (b.position, b.radius)),
        }
    }

    fn projectile_range(&self, factor: f32) -> f32 {
        self.config.viewport_width.max(self.config.viewport_height) * factor
    }

    // ── Autofire ──────────────────────────────────────────────────────────────

    /// Fires `projectile_count` parallel shots at the nearest hostile when the
    /// cooldown allows.  Shots are spaced along the perpendicular of the aim.
    pub fn auto_fire(&mut self) {
        if !self.player.can_fire() {
            return;
        }
        let origin = self.player.position;
        let Some((target, _)) = self
            .closest_target(origin)
            .and_then(|target| self.target_body(target))
        else {
            return;
        };

        let direction = target.subtract(origin).normalize();
        let perpendicular = direction.perpendicular();
        let count = self.player.projectile_count;
        let centre = (count.saturating_sub(1)) as f32 / 2.0;
        for i in 0..count {
            let offset = perpendicular.scale((i as f32 - centre) * PROJECTILE_SPACING);
            self.projectiles.push(Projectile::new(
                origin.add(offset),
                direction,
                PROJECTILE_SPEED,
                self.player.attack_power,
            ));
        }
        self.player.reset_fire_timer();
    }

    // ── Drone ─────────────────────────────────────────────────────────────────

    pub fn update_drone(&mut self, delta: f32) {
        let Some(from) = self.drone.as_ref().map(|d| d.position) else {
            return;
        };
        let target = self.closest_target(from);
        let aim = target.and_then(|t| self.target_body(t));

        let Some(drone) = self.drone.as_mut() else {
            return;
        };
        let hit = drone.update(delta, self.player.position, aim, &mut self.rng);
        if !hit {
            return;
        }
        let power = drone.attack_power;
        match target {
            Some(Target::Enemy(i)) => {
                if let Some(enemy) = self.enemies.get_mut(i) {
                    enemy.take_damage(power);
                }
            }
            Some(Target::Boss) => {
                if let Some(boss) = self.boss.as_mut() {
                    boss.take_damage(power);
                }
            }
            None => {}
        }
    }

    // ── Projectiles ───────────────────────────────────────────────────────────

    /// Moves player shots, culls those out of range, then resolves each shot
    /// against the first thing it overlaps: the boss, else the first enemy in
    /// order.  A shot is spent on its first hit.
    pub fn update_projectiles(&mut self, delta: f32) {
        let origin = self.player.position;
        let max_range = self.projectile_range(PROJECTILE_RANGE_FACTOR);
        for projectile in &mut self.projectiles {
            projectile.update(delta, origin, max_range);
        }
        self.projectiles.retain(|p| p.is_active);

        for projectile in &mut self.projectiles {
            if let Some(boss) = self.boss.as_mut() {
                if collides(&*projectile, &*boss) {
                    boss.take_damage(projectile.damage);
                    projectile.is_active = false;
                    continue;
                }
            }
            if let Some(enemy) = self.enemies.iter_mut().find(|e| collides(&*projectile, &**e)) {
                enemy.take_damage(projectile.damage);
                projectile.is_active = false;
            }
        }
        self.projectiles.retain(|p| p.is_active);
    }

    pub fn update_boss_projectiles(&mut self, delta: f32) {
        if self.boss_projectiles.is_empty() {
            return;
        }
        let origin = self.player.position;
        let max_range = self.projectile_range(BOSS_PROJECTILE_RANGE_FACTOR);
        for projectile in &mut self.boss_projectiles {
            projectile.update(delta, origin, max_range);
        }
        self.boss_projectiles.retain(|p| p.is_active);

        for i in 0..self.boss_projectiles.len() {
            if !collides(&self.boss_projectiles[i], &self.player) {
                continue;
            }
            let damage = self.boss_projectiles[i].damage;
            self.boss_projectiles[i].is_active = false;
            self.damage_player(damage);
        }
        self.boss_projectiles.retain(|p| p.is_active);
    }

    // ── Enemies ───────────────────────────────────────────────────────────────

    /// Moves every enemy toward the player, pays out the dead and lets the
    /// living attempt contact.
    ///
    /// Every live enemy touching the player attempts its contact hit every
    /// frame; the player's grace window decides whether it lands.  Contact
    /// never removes an enemy, so one that was absorbed can hit again once
    /// the window expires.  Dead enemies pay out an orb, currency and maybe an
    /// item, and count toward the stage quota.  The barrier then burns
    /// everything inside it.
    pub fn update_enemies(&mut self, delta: f32) {
        let target = self.player.position;
        let enemies = std::mem::take(&mut self.enemies);
        let mut remaining = Vec::with_capacity(enemies.len());
        for mut enemy in enemies {
            enemy.update(delta, target);
            if enemy.is_dead() {
                self.reward_kill(&enemy);
                continue;
            }
            if collides(&enemy, &self.player) {
                self.damage_player(enemy.contact_damage);
            }
            remaining.push(enemy);
        }
        self.enemies = remaining;

        if self.player.barrier_radius > 0.0 {
            let reach = self.player.barrier_radius;
            let damage = self.player.barrier_damage * delta;
            for enemy in &mut self.enemies {
                if enemy.position.distance_to(target) <= reach + enemy.radius {
                    enemy.take_damage(damage);
                }
            }
        }

        if self.player.is_dead() {
            self.trigger_game_over();
        }
    }

    /// Grace-window gated; returns whether the hit landed.
    pub(crate) fn damage_player(&mut self, amount: f32) -> bool {
        let landed = self.player.take_damage(amount);
        if landed {
            self.events.push(GameEvent::PlayerDamaged {
                amount,
                health: self.player.health,
            });
        }
        landed
    }

    /// Orb of `ceil(2 * expMultiplier * (1 + 0.05 * stage))`, currency equal to
    /// the enemy's reward, an 18% item roll, and a kill for the stage quota.
    pub fn reward_kill(&mut self, enemy: &Enemy) {
        let exp_scale = 1.0 + self.stage.stage as f32 * 0.05;
        let value = (2.0 * self.player.exp_multiplier * exp_scale).ceil() as u32;
        self.experience_orbs.push(ExperienceOrb::new(enemy.position, value));
        self.add_currency(i64::from(enemy.reward.max(1)));
        self.maybe_drop_item(enemy.position);
        self.events.push(GameEvent::EnemyKilled {
            kind: enemy.kind,
            position: enemy.position,
        });
        if self.stage.register_kill() {
            self.handle_stage_clear();
        }
    }

    // ── Pickups ───────────────────────────────────────────────────────────────

    pub fn maybe_drop_item(&mut self, position: Vector2) {
        if !self.rng.gen_bool(ITEM_DROP_CHANCE) {
            return;
        }
        if let Some(&kind) = ItemKind::ALL.choose(&mut self.rng) {
            debug!(item = kind.id(), "item dropped");
            self.item_drops.push(ItemDrop::new(kind, position));
        }
    }

    /// Drops inside `pickup_radius` apply their effect and go to the inventory.
    pub fn update_item_drops(&mut self) {
        if self.item_drops.is_empty() {
            return;
        }
        let origin = self.player.position;
        let reach = self.player.pickup_radius;
        let drops = std::mem::take(&mut self.item_drops);
        let mut remaining = Vec::with_capacity(drops.len());
        for drop in drops {
            if drop.position.distance_to(origin) > reach {
                remaining.push(drop);
                continue;
            }
            let kind = drop.kind;
            self.apply_effect(kind.effect());
            self.inventory.add(kind.id(), kind.label(), kind.description());
            self.events.push(GameEvent::ItemPickup { kind });
        }
        self.item_drops = remaining;
    }

    /// Orbs inside `orb_pickup_radius` are collected; orbs inside
    /// `magnet_radius` drift toward the player, faster the closer they are.
    pub fn collect_experience(&mut self, delta: f32) {
        let origin = self.player.position;
        let pickup = self.player.orb_pickup_radius;
        let magnet = self.player.magnet_radius;
        let orbs = std::mem::take(&mut self.experience_orbs);
        let mut remaining = Vec::with_capacity(orbs.len());
        for mut orb in orbs {
            let distance = orb.position.distance_to(origin);
            if distance <= pickup {
                self.gain_exp(orb.value);
            } else if distance <= magnet {
                let speed = ((magnet - distance) * 4.0).max(MIN_MAGNET_SPEED);
                orb.move_toward(origin, speed, delta);
                remaining.push(orb);
            } else {
                remaining.push(orb);
            }
        }
        self.experience_orbs = remaining;
    }
}
