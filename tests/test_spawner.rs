use survivor_shooter::entities::EnemyKind;
use survivor_shooter::spawner::*;
use survivor_shooter::stage::StageDifficulty;
use survivor_shooter::vector2::Vector2;

use rand::rngs::StdRng;
use rand::SeedableRng;

fn seeded_rng() -> StdRng {
    StdRng::seed_from_u64(42)
}

fn kinds(stage: u32) -> Vec<EnemyKind> {
    catalog(stage).into_iter().map(|t| t.kind).collect()
}

// ── Catalog ───────────────────────────────────────────────────────────────────

#[test]
fn only_spiders_on_stage_one() {
    assert_eq!(kinds(1), vec![EnemyKind::Spider]);
}

#[test]
fn kinds_unlock_with_stage() {
    assert_eq!(kinds(3).len(), 2);
    assert_eq!(kinds(5).len(), 3);
    assert_eq!(kinds(7).len(), 4);
    assert_eq!(kinds(9).len(), 5);
    assert_eq!(kinds(11).len(), 5);
    assert!(kinds(12).contains(&EnemyKind::Slime));
}

#[test]
fn base_speed_grows_with_stage() {
    let early = catalog(1)[0].speed;
    let late = catalog(10)[0].speed;
    assert_eq!(early, 54.0);
    assert_eq!(late, 90.0);
}

// ── Timing ────────────────────────────────────────────────────────────────────

#[test]
fn nothing_before_interval() {
    let mut spawner = Spawner::new(960.0, 540.0);
    let batch = spawner.update(0.1, 1, Vector2::ZERO, &StageDifficulty::default(), &mut seeded_rng());
    assert!(batch.is_empty());
    assert!((spawner.spawn_timer - 0.1).abs() < 1e-6);
}

#[test]
fn batch_size_grows_and_caps() {
    let difficulty = StageDifficulty::default();
    let mut rng = seeded_rng();
    for (stage, expected) in [(1, 1), (3, 2), (9, 4), (15, 6), (40, 6)] {
        let mut spawner = Spawner::new(960.0, 540.0);
        let batch = spawner.update(1.0, stage, Vector2::ZERO, &difficulty, &mut rng);
        assert_eq!(batch.len(), expected, "stage {stage}");
        assert_eq!(spawner.spawn_timer, 0.0);
    }
}

#[test]
fn interval_has_a_floor() {
    let mut spawner = Spawner::new(960.0, 540.0);
    spawner.set_spawn_interval(0.01);
    assert_eq!(spawner.spawn_interval, 0.25);
}

// ── Placement & scaling ───────────────────────────────────────────────────────

#[test]
fn spawns_just_outside_the_viewport() {
    let spawner = Spawner::new(960.0, 540.0);
    let center = Vector2::new(100.0, -50.0);
    let mut rng = seeded_rng();
    for _ in 0..200 {
        let enemy = spawner.spawn_enemy(1, center, &StageDifficulty::default(), &mut rng);
        let dx = (enemy.position.x - center.x).abs();
        let dy = (enemy.position.y - center.y).abs();
        let on_vertical_edge = (dx - 540.0).abs() < 1e-3 && dy <= 270.0 + 1e-3;
        let on_horizontal_edge = (dy - 330.0).abs() < 1e-3 && dx <= 480.0 + 1e-3;
        assert!(on_vertical_edge || on_horizontal_edge, "{:?}", enemy.position);
    }
}

#[test]
fn stats_scale_with_difficulty() {
    let spawner = Spawner::new(960.0, 540.0);
    let difficulty = StageDifficulty::for_stage(10);
    let enemy = spawner.spawn_enemy(1, Vector2::ZERO, &difficulty, &mut seeded_rng());
    // ceil((1 + 0.2) * 1.35)
    assert_eq!(enemy.health, 2.0);
    // ceil(1 * 1.4)
    assert_eq!(enemy.reward, 2);
    assert!((enemy.speed - 54.0 * 1.2).abs() < 1e-3);
}

#[test]
fn seeded_waves_are_reproducible() {
    let difficulty = StageDifficulty::for_stage(12);
    let wave = |seed| {
        let mut spawner = Spawner::new(960.0, 540.0);
        let mut rng = StdRng::seed_from_u64(seed);
        spawner
            .update(1.0, 12, Vector2::ZERO, &difficulty, &mut rng)
            .into_iter()
            .map(|e| (e.kind, e.position))
            .collect::<Vec<_>>()
    };
    assert_eq!(wave(7), wave(7));
    assert_eq!(wave(7).len(), 5);
}
