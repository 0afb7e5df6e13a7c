//! Idle Sourdough Starter: the progression economy engine.
//!
//! The engine owns every counter and timing rule of the game. Presentation,
//! remote persistence and device identity are collaborators reached through
//! the traits in [`persistence`].

pub mod config;
pub mod economy;
pub mod error;
pub mod persistence;
pub mod time;

pub use config::EngineConfig;
pub use economy::state::{EconomyState, Identity, PlayerId, ProducerKind, ResourceKind};
pub use economy::{Engine, Notification, PurchaseKind};
pub use error::{EngineError, StoreError};
