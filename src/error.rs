//! Error types shared by the engine and its persistence collaborators.
//!
//! A declined purchase is not an error: `Engine::purchase` reports it by
//! returning `false`. Malformed snapshot fields are not errors either; they
//! fall back to defaults during restore.

use thiserror::Error;

use crate::economy::state::PlayerId;

/// Failure reported by a `SnapshotStore`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    #[error("no snapshot stored for player {0}")]
    NotFound(PlayerId),
    #[error("snapshot store unavailable: {0}")]
    Unavailable(String),
}

/// Failure reported by an engine persistence call. State is unchanged
/// whenever one of these is returned.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineError {
    #[error("could not reach the snapshot store: {message}")]
    PersistenceUnavailable { message: String },
    #[error("no saved game found for player {0}")]
    NotFound(PlayerId),
}

impl From<StoreError> for EngineError {
    fn from(error: StoreError) -> Self {
        match error {
            StoreError::NotFound(id) => EngineError::NotFound(id),
            StoreError::Unavailable(message) => EngineError::PersistenceUnavailable { message },
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid engine config: {0}")]
    Parse(#[from] serde_json::Error),
}
