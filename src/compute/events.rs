//! Things that happened during a tick, queued for the host.
//!
//! Events are informational only; the simulation never reads them back.

use crate::entities::{EnemyKind, ItemKind};
use crate::upgrades::Tag;
use crate::vector2::Vector2;

#[derive(Clone, Debug, PartialEq)]
pub enum GameEvent {
    EnemyKilled { kind: EnemyKind, position: Vector2 },
    PlayerDamaged { amount: f32, health: f32 },
    LevelUp { level: u32 },
    UpgradeApplied { id: &'static str },
    SynergyTriggered { tag: Tag },
    ItemPickup { kind: ItemKind },
    StageCleared { stage: u32 },
    StageAdvanced { stage: u32 },
    BossSpawned { phase: u32 },
    BossPhaseCleared { phase: u32 },
    BossDefeated { daily: bool },
    GameOver,
}
