//! Plain-data save snapshot.
//!
//! The format has no version.  Every field is optional; on load a missing
//! field keeps whatever the freshly reset run already has, so older or
//! partial saves load without error.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::inventory::InventoryEntry;

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SaveSnapshot {
    /// Milliseconds since the Unix epoch.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stage: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub level: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub player_profile: Option<PlayerProfile>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub player_stats: Option<PlayerStatsSnapshot>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub upgrades: Option<UpgradesSnapshot>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stage_state: Option<StageSnapshot>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub items: Option<Vec<InventoryEntry>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub drone_level: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub barrier: Option<BarrierSnapshot>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub currency: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub synergy_counts: Option<BTreeMap<String, u32>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub synergy_applied: Option<Vec<String>>,
}

/// Cosmetic avatar choice made by the host.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PlayerProfile {
    pub name: String,
    pub sprite: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PlayerStatsSnapshot {
    pub attack_power: Option<f32>,
    pub fire_cooldown: Option<f32>,
    pub projectile_count: Option<u32>,
    pub speed: Option<f32>,
    pub pickup_radius: Option<f32>,
    pub magnet_radius: Option<f32>,
    pub orb_pickup_radius: Option<f32>,
    pub exp_multiplier: Option<f32>,
    pub max_health: Option<f32>,
    pub health: Option<f32>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct UpgradesSnapshot {
    pub level: Option<u32>,
    pub exp: Option<u32>,
    pub next_exp: Option<u32>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct StageSnapshot {
    pub stage: Option<u32>,
    pub unlocked_stage: Option<u32>,
    pub kills: Option<u32>,
    pub kills_needed: Option<u32>,
    pub cleared: Option<bool>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct BarrierSnapshot {
    pub level: Option<u32>,
    pub radius: Option<f32>,
    pub damage: Option<f32>,
}
