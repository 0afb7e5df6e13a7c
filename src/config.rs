//! Engine configuration.
//!
//! `Default` carries the built-in balance of the game. Any subset of fields
//! can be overridden from JSON; omitted fields keep their defaults.

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::time::TICKS_PER_SEC;

/// Autosave cadence in ticks: 30 seconds at `TICKS_PER_SEC`.
pub const AUTOSAVE_INTERVAL: u32 = 30 * TICKS_PER_SEC;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Longest wall-clock gap replayed after a suspend, in milliseconds.
    pub max_catch_up_ms: u64,
    /// Ticks between autosave prompts. Zero disables autosave.
    pub autosave_interval_ticks: u32,
    /// Notifications kept before the oldest is dropped.
    pub log_capacity: usize,
    /// Name recorded with the player's identity on first save.
    pub username: String,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            max_catch_up_ms: 12 * 60 * 60 * 1000,
            autosave_interval_ticks: AUTOSAVE_INTERVAL,
            log_capacity: 50,
            username: "baker".into(),
        }
    }
}

impl EngineConfig {
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: EngineConfig = serde_json::from_str(json)?;
        Ok(config.normalized())
    }

    /// Clamp values that would stall the log.
    pub fn normalized(mut self) -> Self {
        self.log_capacity = self.log_capacity.max(1);
        self
    }
}
