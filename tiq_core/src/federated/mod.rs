//! Federated lookups across every configured source.
//!
//! This module provides:
//! - `SourceResult`: one source's normalized answer (success payload or error)
//! - `ResultSet`: every answer for one lookup, in completion order
//! - `FederatedSearch`: engine that fans a lookup out to all sources
//!
//! # Example
//!
//! ```ignore
//! use tiq_core::{build_registry, config::Settings, FederatedSearch};
//!
//! let settings = Settings::from_env();
//! let registry = build_registry(&settings)?;
//! let results = FederatedSearch::new(&registry).search("8.8.8.8").await;
//! ```

mod engine;
mod types;

pub use engine::FederatedSearch;
pub use types::{Outcome, ResultSet, SourceResult, Status, CONFIG_SOURCE};
