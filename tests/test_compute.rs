use survivor_shooter::compute::*;
use survivor_shooter::config::GameConfig;
use survivor_shooter::effect::Effect;
use survivor_shooter::entities::*;
use survivor_shooter::ports::{InputSource, Key, MemoryStore, NullRenderer, Renderer, SaveStore, VirtualInput};
use survivor_shooter::shop::PurchaseOutcome;
use survivor_shooter::upgrades::{find_option, AutoBuildMode, Tag};
use survivor_shooter::vector2::Vector2;

use rand::rngs::StdRng;
use rand::SeedableRng;

type Sim = Simulation<VirtualInput, NullRenderer, MemoryStore>;

fn make_sim() -> Sim {
    Simulation::with_rng(
        GameConfig::default(),
        VirtualInput::new(),
        NullRenderer,
        MemoryStore::new(),
        StdRng::seed_from_u64(42),
    )
}

fn enemy_at(x: f32, y: f32) -> Enemy {
    Enemy {
        kind: EnemyKind::Spider,
        position: Vector2::new(x, y),
        radius: 10.0,
        speed: 0.0,
        health: 1.0,
        contact_damage: 1.0,
        reward: 1,
        hit_timer: 0.0,
    }
}

fn close(a: f32, b: f32) -> bool {
    (a - b).abs() < 1e-3
}

fn kill_boss(sim: &mut Sim) {
    if let Some(boss) = sim.boss.as_mut() {
        boss.health = 0.0;
    }
    sim.update_boss(0.0);
}

// ── Contact damage ────────────────────────────────────────────────────────────

#[test]
fn contact_hit_lands_and_enemy_survives() {
    let mut sim = make_sim();
    sim.enemies.push(enemy_at(5.0, 0.0));
    sim.update_enemies(0.0);

    assert_eq!(sim.player.health, 9.0);
    assert!(close(sim.player.invulnerable_timer, 0.6));
    assert_eq!(sim.enemies.len(), 1);

    // Second attempt inside the grace window is absorbed.
    sim.update_enemies(0.0);
    assert_eq!(sim.player.health, 9.0);
    assert_eq!(sim.enemies.len(), 1);
}

#[test]
fn contact_hits_again_after_grace_window() {
    let mut sim = make_sim();
    sim.enemies.push(enemy_at(5.0, 0.0));
    sim.update_enemies(0.0);
    sim.player.invulnerable_timer = 0.0;
    sim.update_enemies(0.0);
    assert_eq!(sim.player.health, 8.0);
}

#[test]
fn dead_enemy_does_not_hit() {
    let mut sim = make_sim();
    let mut enemy = enemy_at(5.0, 0.0);
    enemy.health = 0.0;
    sim.enemies.push(enemy);
    sim.update_enemies(0.0);
    assert_eq!(sim.player.health, 10.0);
    assert!(sim.enemies.is_empty());
}

// ── Kill rewards ──────────────────────────────────────────────────────────────

#[test]
fn kill_pays_orb_currency_and_counts() {
    let mut sim = make_sim();
    let mut enemy = enemy_at(300.0, 0.0);
    enemy.health = 0.0;
    enemy.reward = 3;
    sim.enemies.push(enemy);
    sim.update_enemies(0.0);

    assert_eq!(sim.experience_orbs.len(), 1);
    // ceil(2 * 1.0 * (1 + 0.05 * 1))
    assert_eq!(sim.experience_orbs[0].value, 3);
    assert_eq!(sim.currency, 3);
    assert_eq!(sim.stage.kills, 1);
    assert!(sim
        .take_events()
        .iter()
        .any(|e| matches!(e, GameEvent::EnemyKilled { kind: EnemyKind::Spider, .. })));
}

#[test]
fn stage_zero_kill_pays_base_orb() {
    let mut sim = make_sim();
    sim.stage.stage = 0;
    let mut enemy = enemy_at(300.0, 0.0);
    enemy.health = 0.0;
    enemy.reward = 3;
    sim.enemies.push(enemy);
    sim.update_enemies(0.0);
    // ceil(2 * 1 * 1)
    assert_eq!(sim.experience_orbs[0].value, 2);
    assert_eq!(sim.currency, 3);
}

#[test]
fn drone_rams_nearest_enemy() {
    let mut sim = make_sim();
    sim.apply_effect(Effect::UpgradeDrone);
    let drone = sim.drone.as_ref().map(|d| d.position).unwrap_or(Vector2::ZERO);
    let mut enemy = enemy_at(drone.x + 5.0, drone.y);
    enemy.health = 3.0;
    sim.enemies.push(enemy);
    sim.update_drone(0.01);
    assert_eq!(sim.enemies[0].health, 2.0);
}

#[test]
fn projectile_hits_first_enemy_and_is_spent() {
    let mut sim = make_sim();
    sim.enemies.push(enemy_at(100.0, 0.0));
    sim.projectiles.push(Projectile::new(Vector2::new(100.0, 0.0), Vector2::new(1.0, 0.0), 320.0, 1.0));
    sim.update_projectiles(0.0);
    assert!(sim.projectiles.is_empty());
    assert!(sim.enemies[0].is_dead());
}

#[test]
fn projectile_prefers_boss_over_enemy() {
    let mut sim = make_sim();
    sim.start_boss_challenge(BossDifficulty::Normal);
    let boss_position = sim.boss.as_ref().map(|b| b.position).unwrap_or(Vector2::ZERO);
    let full = sim.boss.as_ref().map(|b| b.health).unwrap_or(0.0);
    let mut enemy = enemy_at(boss_position.x, boss_position.y);
    enemy.health = 5.0;
    sim.enemies.push(enemy);
    sim.projectiles.push(Projectile::new(boss_position, Vector2::new(1.0, 0.0), 320.0, 2.0));
    sim.update_projectiles(0.0);

    assert_eq!(sim.boss.as_ref().map(|b| b.health), Some(full - 2.0));
    assert_eq!(sim.enemies[0].health, 5.0);
}

// ── Autofire ──────────────────────────────────────────────────────────────────

#[test]
fn autofire_spreads_parallel_shots() {
    let mut sim = make_sim();
    sim.player.projectile_count = 3;
    sim.enemies.push(enemy_at(100.0, 0.0));
    sim.auto_fire();

    let mut ys: Vec<f32> = sim.projectiles.iter().map(|p| p.position.y).collect();
    ys.sort_by(|a, b| a.total_cmp(b));
    assert_eq!(ys.len(), 3);
    assert!(close(ys[0], -10.0) && close(ys[1], 0.0) && close(ys[2], 10.0));
    assert!(close(sim.player.fire_timer, sim.player.fire_cooldown));

    // Cooling down.
    sim.auto_fire();
    assert_eq!(sim.projectiles.len(), 3);
}

#[test]
fn autofire_without_target_holds_fire() {
    let mut sim = make_sim();
    sim.auto_fire();
    assert!(sim.projectiles.is_empty());
    assert!(sim.player.can_fire());
}

// ── Upgrades & synergy ────────────────────────────────────────────────────────

#[test]
fn synergy_bonus_fires_once() {
    let mut sim = make_sim();
    let attack = find_option("attack").expect("catalog entry");
    for _ in 0..4 {
        sim.apply_upgrade(attack);
    }
    // 1 base + 4 upgrades + 1 synergy bonus.
    assert_eq!(sim.player.attack_power, 6.0);
    let triggered = sim
        .take_events()
        .into_iter()
        .filter(|e| matches!(e, GameEvent::SynergyTriggered { tag: Tag::Attack }))
        .count();
    assert_eq!(triggered, 1);
    assert_eq!(sim.inventory.count("synergy-attack"), 1);
}

#[test]
fn level_up_pauses_with_three_choices() {
    let mut sim = make_sim();
    sim.gain_exp(3);
    assert_eq!(sim.upgrades.level, 2);
    assert_eq!(sim.pending_upgrades.len(), 3);
    assert!(sim.is_paused);

    // The host cannot unpause past a pending choice.
    sim.set_paused(false);
    assert!(sim.is_paused);

    assert!(!sim.choose_upgrade("not-an-upgrade"));
    let id = sim.pending_upgrades[0].id;
    assert!(sim.choose_upgrade(id));
    assert!(!sim.is_paused);
    assert!(sim.pending_upgrades.is_empty());
}

#[test]
fn one_level_up_per_resolved_choice() {
    let mut sim = make_sim();
    sim.gain_exp(20);
    assert_eq!(sim.upgrades.level, 2);
    let id = sim.pending_upgrades[0].id;
    sim.choose_upgrade(id);
    assert_eq!(sim.upgrades.level, 3);
    assert!(sim.is_paused);
}

#[test]
fn auto_build_resolves_without_pausing() {
    let mut sim = make_sim();
    sim.set_auto_build(true, AutoBuildMode::Attack);
    sim.gain_exp(3);
    assert_eq!(sim.upgrades.level, 2);
    assert!(!sim.is_paused);
    assert!(sim.pending_upgrades.is_empty());
    assert!(sim
        .take_events()
        .iter()
        .any(|e| matches!(e, GameEvent::UpgradeApplied { .. })));
}

#[test]
fn drone_effect_enables_then_levels() {
    let mut sim = make_sim();
    sim.apply_effect(Effect::UpgradeDrone);
    assert_eq!(sim.drone.as_ref().map(|d| d.level), Some(1));
    sim.apply_effect(Effect::UpgradeDrone);
    assert_eq!(sim.drone.as_ref().map(|d| d.level), Some(2));
    let entry = sim.inventory.get("drone").expect("drone entry");
    assert_eq!(entry.name, "Drone Lv.2");
    assert_eq!(entry.count, 1);
}

// ── Pickups ───────────────────────────────────────────────────────────────────

#[test]
fn item_pickup_applies_effect_and_records() {
    let mut sim = make_sim();
    sim.item_drops.push(ItemDrop::new(ItemKind::Core, Vector2::new(10.0, 0.0)));
    sim.item_drops.push(ItemDrop::new(ItemKind::Armor, Vector2::new(400.0, 0.0)));
    sim.update_item_drops();

    assert_eq!(sim.player.attack_power, 2.0);
    assert_eq!(sim.inventory.count("core"), 1);
    assert_eq!(sim.item_drops.len(), 1);
    assert_eq!(sim.item_drops[0].kind, ItemKind::Armor);
}

#[test]
fn orbs_collect_or_drift() {
    let mut sim = make_sim();
    sim.experience_orbs.push(ExperienceOrb::new(Vector2::new(10.0, 0.0), 1));
    sim.experience_orbs.push(ExperienceOrb::new(Vector2::new(100.0, 0.0), 1));
    sim.experience_orbs.push(ExperienceOrb::new(Vector2::new(500.0, 0.0), 1));
    sim.collect_experience(0.1);

    assert_eq!(sim.upgrades.exp, 1);
    assert_eq!(sim.experience_orbs.len(), 2);
    assert!(sim.experience_orbs[0].position.x < 100.0);
    assert_eq!(sim.experience_orbs[1].position.x, 500.0);
}

#[test]
fn barrier_burns_enemies_inside() {
    let mut sim = make_sim();
    sim.apply_effect(Effect::EnableBarrier);
    let mut enemy = enemy_at(50.0, 0.0);
    enemy.health = 5.0;
    sim.enemies.push(enemy);
    sim.update_enemies(1.0);

    assert!(close(sim.enemies[0].health, 4.4));
    assert_eq!(sim.inventory.get("barrier").map(|e| e.name.as_str()), Some("Barrier Lv.1"));
}

// ── Stage flow ────────────────────────────────────────────────────────────────

fn clear_first_stage(sim: &mut Sim) {
    sim.stage.kills = sim.stage.kills_needed - 1;
    let mut enemy = enemy_at(300.0, 0.0);
    enemy.health = 0.0;
    sim.enemies.push(enemy);
    sim.update_enemies(0.0);
}

#[test]
fn stage_clear_opens_portal_offer_and_shop() {
    let mut sim = make_sim();
    clear_first_stage(&mut sim);

    assert!(sim.stage.cleared);
    assert!(sim.portal.is_some());
    assert_eq!(sim.pending_upgrades.len(), 3);
    assert!(sim.is_paused);
    assert!(sim.shop.has_update);
    assert!(sim
        .take_events()
        .contains(&GameEvent::StageCleared { stage: 1 }));
}

#[test]
fn touching_portal_advances_stage() {
    let mut sim = make_sim();
    clear_first_stage(&mut sim);
    let id = sim.pending_upgrades[0].id;
    sim.choose_upgrade(id);

    let portal = sim.portal.as_ref().map(|p| p.position).unwrap_or(Vector2::ZERO);
    sim.player.position = portal;
    sim.update_portal(0.016);

    assert_eq!(sim.stage.stage, 2);
    assert_eq!(sim.stage.unlocked_stage, 2);
    assert!(!sim.stage.cleared);
    assert!(sim.portal.is_none());
    assert!(sim.stage_map_has_update);
}

#[test]
fn portal_refused_before_clear() {
    let mut sim = make_sim();
    assert!(!sim.advance_stage_from_portal());
    assert_eq!(sim.stage.stage, 1);
}

#[test]
fn transition_to_locked_stage_refused() {
    let mut sim = make_sim();
    assert!(!sim.transition_to_stage(3));
    sim.stage.unlocked_stage = 3;
    assert!(sim.transition_to_stage(3));
    assert_eq!(sim.stage.stage, 3);
}

#[test]
fn boss_stage_spawns_gate_boss() {
    let mut sim = make_sim();
    sim.stage.unlocked_stage = 5;
    sim.transition_to_stage(5);
    sim.tick(0.016);

    assert!(sim.boss.is_some());
    assert!(sim.encounter.is_stage_boss);
    assert!(sim.enemies.is_empty());
}

#[test]
fn gate_boss_defeat_clears_stage() {
    let mut sim = make_sim();
    sim.stage.unlocked_stage = 5;
    sim.transition_to_stage(5);
    sim.ensure_stage_boss();
    kill_boss(&mut sim);

    assert!(sim.boss.is_none());
    assert!(sim.stage.cleared);
    assert!(sim.portal.is_some());
    assert_eq!(sim.currency, 200);
    assert!(sim
        .take_events()
        .contains(&GameEvent::BossDefeated { daily: false }));
}

#[test]
fn cleared_boss_stage_spawns_nothing() {
    let mut sim = make_sim();
    sim.stage.unlocked_stage = 5;
    sim.transition_to_stage(5);
    sim.ensure_stage_boss();
    kill_boss(&mut sim);
    let id = sim.pending_upgrades[0].id;
    sim.choose_upgrade(id);
    assert!(!sim.is_paused);

    let interval = sim.spawner.spawn_interval;
    for _ in 0..4 {
        sim.spawner.spawn_timer = interval;
        sim.tick(0.016);
    }
    assert!(sim.boss.is_none());
    assert!(sim.enemies.is_empty());
}

// ── Challenges ────────────────────────────────────────────────────────────────

#[test]
fn challenge_runs_three_phases() {
    let mut sim = make_sim();
    assert!(sim.start_boss_challenge(BossDifficulty::Normal));
    assert!(!sim.start_boss_challenge(BossDifficulty::Hard));

    kill_boss(&mut sim);
    assert_eq!(sim.encounter.phase, 2);
    assert!(sim.boss.is_some());
    assert_eq!(sim.currency, 200);

    kill_boss(&mut sim);
    kill_boss(&mut sim);
    assert!(sim.boss.is_none());
    assert!(!sim.encounter.is_challenge);
    assert_eq!(sim.currency, 200 + 400 + 600);
    assert!(!sim.stage.cleared);
}

#[test]
fn challenge_suppresses_regular_spawns() {
    let mut sim = make_sim();
    sim.player.max_health = 1000.0;
    sim.player.health = 1000.0;
    sim.start_boss_challenge(BossDifficulty::Normal);

    let interval = sim.spawner.spawn_interval;
    for _ in 0..4 {
        sim.spawner.spawn_timer = interval;
        sim.tick(0.016);
    }
    assert!(!sim.is_game_over);
    assert!(sim.encounter.is_challenge);
    assert!(sim.enemies.is_empty());

    sim.cancel_boss_challenge();
    sim.spawner.spawn_timer = interval;
    sim.tick(0.016);
    assert_eq!(sim.enemies.len(), 1);
}

#[test]
fn cancel_challenge_clears_boss() {
    let mut sim = make_sim();
    sim.start_boss_challenge(BossDifficulty::Hard);
    sim.cancel_boss_challenge();
    assert!(sim.boss.is_none());
    assert_eq!(sim.encounter, BossEncounter::default());
}

#[test]
fn daily_challenge_once_per_date() {
    let mut sim = make_sim();
    let today = "2026-10-19";
    assert!(sim.can_start_daily_challenge(today));
    assert!(sim.start_daily_challenge(today));
    assert_eq!(sim.encounter.difficulty, BossDifficulty::Hard);

    for _ in 0..3 {
        kill_boss(&mut sim);
    }
    assert_eq!(sim.currency, 3 * 4000);
    assert_eq!(
        sim.store.load_value(DAILY_BOSS_DATE_KEY).ok().flatten().as_deref(),
        Some(today)
    );
    assert!(!sim.start_daily_challenge(today));
    assert!(sim.can_start_daily_challenge("2026-10-20"));
}

// ── Skills ────────────────────────────────────────────────────────────────────

#[test]
fn nova_fires_ring_then_cools_down() {
    let mut sim = make_sim();
    sim.input.press(Key::Space);
    sim.update_skills(0.0);
    assert_eq!(sim.projectiles.len(), 32);
    assert!(close(sim.skills.nova.timer, 8.0));

    sim.input.press(Key::Space);
    sim.update_skills(0.0);
    assert_eq!(sim.projectiles.len(), 32);
    assert!(!sim.input.consume_pressed(Key::Space));
}

#[test]
fn focused_burst_needs_a_target() {
    let mut sim = make_sim();
    sim.input.press(Key::Q);
    sim.update_skills(0.0);
    assert!(sim.projectiles.is_empty());

    let mut sim = make_sim();
    sim.enemies.push(enemy_at(100.0, 0.0));
    sim.input.press(Key::Q);
    sim.update_skills(0.0);
    assert_eq!(sim.projectiles.len(), 22);
}

#[test]
fn refresh_shortens_other_cooldowns() {
    let mut sim = make_sim();
    sim.skills.nova.trigger();
    sim.input.press(Key::E);
    sim.update_skills(0.0);
    assert!(close(sim.skills.nova.timer, 8.0 * 0.6));
    assert!(close(sim.skills.refresh.timer, 18.0));
}

#[test]
fn rapid_focus_boosts_then_restores_speed() {
    let mut sim = make_sim();
    sim.input.press(Key::W);
    sim.update_skills(0.0);
    assert!(sim.skills.rapid_focus.active);
    assert!(close(sim.player.stage_speed_multiplier, 1.2));

    sim.update_skills(3.3);
    assert!(!sim.skills.rapid_focus.active);
    assert!(close(sim.player.stage_speed_multiplier, 1.0));
}

#[test]
fn reserved_skill_is_locked() {
    let mut sim = make_sim();
    sim.input.press(Key::R);
    sim.update_skills(0.0);
    assert!(!sim.skills.reserved.is_ready());
    assert!(!sim.input.consume_pressed(Key::R));
}

// ── Shop ──────────────────────────────────────────────────────────────────────

#[test]
fn shop_purchase_outcomes() {
    let mut sim = make_sim();
    let item = sim.shop.offers[0].item;
    assert_eq!(sim.purchase(item.id), PurchaseOutcome::InsufficientFunds);

    sim.add_currency(100);
    assert_eq!(sim.purchase(item.id), PurchaseOutcome::Purchased(item.effect));
    assert_eq!(sim.currency, 100 - u64::from(item.cost));
    assert_eq!(sim.purchase(item.id), PurchaseOutcome::SoldOut);
    assert_eq!(sim.purchase("nothing"), PurchaseOutcome::NotOffered);
}

#[test]
fn currency_never_negative() {
    let mut sim = make_sim();
    sim.add_currency(5);
    sim.add_currency(-50);
    assert_eq!(sim.currency, 0);
}

// ── Tick ──────────────────────────────────────────────────────────────────────

#[test]
fn lethal_contact_ends_the_run() {
    let mut sim = make_sim();
    sim.player.health = 1.0;
    sim.enemies.push(enemy_at(5.0, 0.0));
    sim.update_enemies(0.0);
    assert!(sim.is_game_over);
    assert!(sim.take_events().contains(&GameEvent::GameOver));

    let before = sim.player.position;
    sim.input.set_direction(1.0, 0.0);
    sim.tick(0.05);
    assert_eq!(sim.player.position, before);
}

#[test]
fn paused_tick_is_a_no_op() {
    let mut sim = make_sim();
    sim.set_paused(true);
    sim.input.set_direction(1.0, 0.0);
    sim.tick(0.05);
    assert_eq!(sim.player.position, Vector2::ZERO);
}

#[test]
fn tick_clamps_large_delta() {
    let mut sim = make_sim();
    sim.input.set_direction(1.0, 0.0);
    sim.tick(10.0);
    // 160 * 0.05
    assert!(close(sim.player.position.x, 8.0));
}

#[test]
fn negative_max_delta_does_not_panic() {
    let config = GameConfig { max_delta: -1.0, ..GameConfig::default() };
    let mut sim = Simulation::with_rng(
        config,
        VirtualInput::new(),
        NullRenderer,
        MemoryStore::new(),
        StdRng::seed_from_u64(42),
    );
    sim.input.set_direction(1.0, 0.0);
    sim.tick(0.016);
    assert_eq!(sim.player.position.x, 0.0);
}

#[test]
fn take_events_drains_queue() {
    let mut sim = make_sim();
    sim.gain_exp(3);
    assert!(!sim.take_events().is_empty());
    assert!(sim.take_events().is_empty());
}

// ── Rendering ─────────────────────────────────────────────────────────────────

#[derive(Default)]
struct CountingRenderer {
    frames: u32,
    masks: u32,
}

impl Renderer for CountingRenderer {
    fn draw_visibility_mask(&mut self, _player: &Player, _radius: f32) {
        self.masks += 1;
    }

    fn end_frame(&mut self) {
        self.frames += 1;
    }
}

#[test]
fn fog_drawn_only_on_late_stages() {
    let mut sim = Simulation::with_rng(
        GameConfig::default(),
        VirtualInput::new(),
        CountingRenderer::default(),
        MemoryStore::new(),
        StdRng::seed_from_u64(7),
    );
    sim.render();
    assert_eq!(sim.renderer.frames, 1);
    assert_eq!(sim.renderer.masks, 0);

    sim.stage.unlocked_stage = 10;
    sim.transition_to_stage(10);
    sim.render();
    assert_eq!(sim.renderer.frames, 2);
    assert_eq!(sim.renderer.masks, 1);
}
