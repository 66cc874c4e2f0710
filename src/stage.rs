//! Stage progression: kill quotas, boss gates, per-stage tuning and theme.

use crate::constants::{BOSS_STAGE_INTERVAL, KILLS_PER_STAGE, MAX_STAGE};

// ── StageManager ──────────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StageManager {
    pub max_stage: u32,
    pub stage: u32,
    pub unlocked_stage: u32,
    pub kills: u32,
    pub kills_needed: u32,
    pub cleared: bool,
}

impl Default for StageManager {
    fn default() -> Self {
        Self::new(MAX_STAGE)
    }
}

impl StageManager {
    pub fn new(max_stage: u32) -> Self {
        let max_stage = max_stage.max(1);
        Self {
            max_stage,
            stage: 1,
            unlocked_stage: 1,
            kills: 0,
            kills_needed: kills_needed_for(1),
            cleared: false,
        }
    }

    pub fn is_boss_stage(&self) -> bool {
        is_boss_stage(self.stage)
    }

    /// Returns `true` exactly once, on the kill that meets the quota.
    /// Boss stages ignore kills entirely.
    pub fn register_kill(&mut self) -> bool {
        if self.cleared || self.is_boss_stage() {
            return false;
        }
        self.kills += 1;
        if self.kills >= self.kills_needed {
            self.cleared = true;
            return true;
        }
        false
    }

    pub fn mark_boss_cleared(&mut self) {
        self.cleared = true;
    }

    /// No-op on the last stage.
    pub fn advance_stage(&mut self) {
        if self.stage >= self.max_stage {
            return;
        }
        self.enter(self.stage + 1);
    }

    /// Jump straight to `stage`, clamped into `1..=max_stage`.  Locking is
    /// the caller's concern.
    pub fn set_stage(&mut self, stage: u32) {
        self.enter(stage.clamp(1, self.max_stage));
    }

    fn enter(&mut self, stage: u32) {
        self.stage = stage;
        self.unlocked_stage = self.unlocked_stage.max(stage);
        self.kills = 0;
        self.kills_needed = kills_needed_for(stage);
        self.cleared = false;
    }
}

pub fn is_boss_stage(stage: u32) -> bool {
    stage % BOSS_STAGE_INTERVAL == 0
}

pub fn kills_needed_for(stage: u32) -> u32 {
    stage * KILLS_PER_STAGE
}

// ── Difficulty ────────────────────────────────────────────────────────────────

/// Per-stage multipliers handed to the spawner and the player.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct StageDifficulty {
    pub health_scale: f32,
    pub speed_scale: f32,
    pub reward_scale: f32,
    pub spawn_interval: f32,
    /// Multiplier applied to player speed on late stages.
    pub speed_penalty: f32,
    /// Radius of the fog cut-out around the player; 0 disables fog.
    pub visibility_radius: f32,
}

impl Default for StageDifficulty {
    fn default() -> Self {
        Self {
            health_scale: 1.0,
            speed_scale: 1.0,
            reward_scale: 1.0,
            spawn_interval: crate::constants::DEFAULT_SPAWN_INTERVAL,
            speed_penalty: 1.0,
            visibility_radius: 0.0,
        }
    }
}

impl StageDifficulty {
    pub fn for_stage(stage: u32) -> Self {
        let s = stage as f32;
        Self {
            health_scale: 1.0 + s * 0.035,
            speed_scale: 1.0 + s * 0.02,
            reward_scale: 1.0 + s * 0.04,
            spawn_interval: (0.7 - s * 0.008).max(0.28),
            speed_penalty: if stage >= 15 { (1.0 - s * 0.004).max(0.78) } else { 1.0 },
            visibility_radius: if stage >= 10 { (420.0 - s * 4.0).max(240.0) } else { 0.0 },
        }
    }
}

// ── Theme ─────────────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct StageTheme {
    pub name: &'static str,
    /// RGBA overlay tint; the first tier is untinted.
    pub tint: Option<(u8, u8, u8, u8)>,
}

const THEMES: [StageTheme; 10] = [
    StageTheme { name: "grass", tint: None },
    StageTheme { name: "dusk", tint: Some((40, 70, 120, 46)) },
    StageTheme { name: "autumn", tint: Some((120, 80, 40, 51)) },
    StageTheme { name: "frost", tint: Some((200, 220, 255, 46)) },
    StageTheme { name: "swamp", tint: Some((40, 100, 60, 56)) },
    StageTheme { name: "ember", tint: Some((130, 50, 40, 56)) },
    StageTheme { name: "midnight", tint: Some((20, 30, 60, 64)) },
    StageTheme { name: "myst", tint: Some((60, 90, 120, 56)) },
    StageTheme { name: "sand", tint: Some((170, 150, 90, 56)) },
    StageTheme { name: "storm", tint: Some((70, 120, 130, 61)) },
];

/// One theme per block of five stages; stages past the table reuse the last.
pub fn stage_theme(stage: u32) -> StageTheme {
    let tier = (stage.saturating_sub(1) / BOSS_STAGE_INTERVAL) as usize;
    THEMES[tier.min(THEMES.len() - 1)]
}
