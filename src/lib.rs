//! Top-down survivor shooter: a frame-stepped simulation core with
//! pluggable input, rendering and save storage.

pub mod collision;
pub mod compute;
pub mod config;
pub mod constants;
pub mod drone;
pub mod effect;
pub mod entities;
pub mod error;
pub mod inventory;
pub mod ports;
pub mod save;
pub mod shop;
pub mod spawner;
pub mod stage;
pub mod upgrades;
pub mod vector2;
