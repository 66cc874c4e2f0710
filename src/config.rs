//! Runtime configuration loaded from `config/game.toml`.
//!
//! Every field falls back to its compiled default, so a partial file only
//! overrides what it names.  A missing file is not an error.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::{info, warn};

use crate::constants::{MAX_DELTA, MAX_STAGE};
use crate::error::GameResult;

pub const DEFAULT_CONFIG_PATH: &str = "config/game.toml";

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    // ── World ────────────────────────────────────────────────────────────────
    /// World units visible across the screen; drives spawn ring and culling.
    pub viewport_width: f32,
    pub viewport_height: f32,
    pub max_stage: u32,

    // ── Loop ─────────────────────────────────────────────────────────────────
    pub max_delta: f32,
    /// Seconds between autosaves.
    pub autosave_interval: f32,
    /// Fixed seed for reproducible runs; entropy when absent.
    pub rng_seed: Option<u64>,

    // ── Host ─────────────────────────────────────────────────────────────────
    pub save_dir: PathBuf,
    pub log_file: PathBuf,
    pub frame_millis: u64,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            viewport_width: 960.0,
            viewport_height: 540.0,
            max_stage: MAX_STAGE,
            max_delta: MAX_DELTA,
            autosave_interval: 30.0,
            rng_seed: None,
            save_dir: PathBuf::from("saves"),
            log_file: PathBuf::from("survivor_shooter.log"),
            frame_millis: 33,
        }
    }
}

impl GameConfig {
    pub fn from_toml(text: &str) -> GameResult<Self> {
        let mut config: Self = toml::from_str(text)?;
        config.repair();
        Ok(config)
    }

    /// `max_delta` must be a positive finite step.
    fn repair(&mut self) {
        if !(self.max_delta.is_finite() && self.max_delta > 0.0) {
            warn!(max_delta = self.max_delta, "invalid max_delta; using default");
            self.max_delta = MAX_DELTA;
        }
    }

    /// Reads `path`, or returns defaults when the file does not exist.
    /// A file that exists but does not parse is an error.
    pub fn load(path: impl AsRef<Path>) -> GameResult<Self> {
        let path = path.as_ref();
        match fs::read_to_string(path) {
            Ok(text) => {
                let config = Self::from_toml(&text)?;
                info!(path = %path.display(), "loaded game config");
                Ok(config)
            }
            Err(err) if err.kind() == ErrorKind::NotFound => {
                warn!(path = %path.display(), "no config file; using defaults");
                Ok(Self::default())
            }
            Err(err) => Err(err.into()),
        }
    }
}
