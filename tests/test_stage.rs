use survivor_shooter::stage::*;

fn close(a: f32, b: f32) -> bool {
    (a - b).abs() < 1e-4
}

// ── StageManager ──────────────────────────────────────────────────────────────

#[test]
fn new_manager_starts_on_stage_one() {
    let stage = StageManager::new(50);
    assert_eq!(stage.stage, 1);
    assert_eq!(stage.unlocked_stage, 1);
    assert_eq!(stage.kills_needed, 10);
    assert!(!stage.cleared);
}

#[test]
fn zero_max_stage_is_raised_to_one() {
    assert_eq!(StageManager::new(0).max_stage, 1);
}

#[test]
fn register_kill_clears_exactly_once() {
    let mut stage = StageManager::new(50);
    let clears = (0..25).filter(|_| stage.register_kill()).count();
    assert_eq!(clears, 1);
    assert!(stage.cleared);
    assert_eq!(stage.kills, 10);
}

#[test]
fn boss_stage_ignores_kills() {
    let mut stage = StageManager::new(50);
    stage.set_stage(5);
    for _ in 0..100 {
        assert!(!stage.register_kill());
    }
    assert!(!stage.cleared);
    stage.mark_boss_cleared();
    assert!(stage.cleared);
}

#[test]
fn advance_resets_quota_and_unlocks() {
    let mut stage = StageManager::new(50);
    stage.kills = 10;
    stage.cleared = true;
    stage.advance_stage();
    assert_eq!(stage.stage, 2);
    assert_eq!(stage.unlocked_stage, 2);
    assert_eq!(stage.kills, 0);
    assert_eq!(stage.kills_needed, 20);
    assert!(!stage.cleared);
}

#[test]
fn advance_stops_at_last_stage() {
    let mut stage = StageManager::new(3);
    stage.set_stage(3);
    stage.cleared = true;
    stage.advance_stage();
    assert_eq!(stage.stage, 3);
    assert!(stage.cleared);
}

#[test]
fn set_stage_clamps_and_keeps_unlock_high_water() {
    let mut stage = StageManager::new(10);
    stage.set_stage(7);
    stage.set_stage(2);
    assert_eq!(stage.stage, 2);
    assert_eq!(stage.unlocked_stage, 7);
    stage.set_stage(99);
    assert_eq!(stage.stage, 10);
    stage.set_stage(0);
    assert_eq!(stage.stage, 1);
}

#[test]
fn boss_stages_are_multiples_of_five() {
    assert!(!is_boss_stage(1));
    assert!(is_boss_stage(5));
    assert!(is_boss_stage(50));
    assert!(!is_boss_stage(49));
    assert_eq!(kills_needed_for(7), 70);
}

// ── Difficulty ────────────────────────────────────────────────────────────────

#[test]
fn difficulty_scales_with_stage() {
    let d = StageDifficulty::for_stage(10);
    assert!(close(d.health_scale, 1.35));
    assert!(close(d.speed_scale, 1.2));
    assert!(close(d.reward_scale, 1.4));
    assert!(close(d.spawn_interval, 0.62));
}

#[test]
fn spawn_interval_floors() {
    assert!(close(StageDifficulty::for_stage(50).spawn_interval, 0.3));
    assert!(close(StageDifficulty::for_stage(200).spawn_interval, 0.28));
}

#[test]
fn speed_penalty_from_stage_fifteen() {
    assert_eq!(StageDifficulty::for_stage(14).speed_penalty, 1.0);
    assert!(close(StageDifficulty::for_stage(15).speed_penalty, 0.94));
    assert!(close(StageDifficulty::for_stage(100).speed_penalty, 0.78));
}

#[test]
fn fog_from_stage_ten() {
    assert_eq!(StageDifficulty::for_stage(9).visibility_radius, 0.0);
    assert!(close(StageDifficulty::for_stage(10).visibility_radius, 380.0));
    assert!(close(StageDifficulty::for_stage(50).visibility_radius, 240.0));
}

// ── Theme ─────────────────────────────────────────────────────────────────────

#[test]
fn theme_changes_every_five_stages() {
    assert_eq!(stage_theme(1).name, "grass");
    assert_eq!(stage_theme(5).name, "grass");
    assert_eq!(stage_theme(6).name, "dusk");
    assert!(stage_theme(1).tint.is_none());
    assert!(stage_theme(6).tint.is_some());
}

#[test]
fn theme_past_table_reuses_last() {
    assert_eq!(stage_theme(50).name, "storm");
    assert_eq!(stage_theme(500).name, "storm");
}
