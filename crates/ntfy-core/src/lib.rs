//! Core model for ntfy-manager.
//!
//! Holds the routing configuration (repositories, topics, per-event policy),
//! the JSON config store, the repository registry, CLI settings and the
//! error taxonomy shared by the other crates.

pub mod error;
pub mod formatting;
pub mod models;
pub mod registry;
pub mod settings;
pub mod store;

pub use error::{NtfyError, Result};
pub use models::{Config, EventConfig, Priority, RelayMessage, RelayTime, RepoConfig};
pub use store::ConfigStore;
