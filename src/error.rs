//! Errors raised at the I/O seams (config files and save storage).
//!
//! Gameplay itself never fails: refusals are reported as booleans or outcome
//! enums, and the simulation logs and swallows storage errors.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum GameError {
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    #[error("malformed save data: {0}")]
    Json(#[from] serde_json::Error),

    #[error("malformed config: {0}")]
    Toml(#[from] toml::de::Error),

    /// Slot and key names must be non-empty `[A-Za-z0-9_-]` strings.
    #[error("invalid save slot or key name '{0}'")]
    InvalidSlot(String),
}

pub type GameResult<T> = Result<T, GameError>;
