// src/lib.rs
pub mod config;
pub mod connectors;
pub mod error;
pub mod federated;

use std::sync::Arc;

use crate::config::Settings;
use crate::error::SourceError;
use crate::federated::SourceResult;
use async_trait::async_trait;

pub use crate::federated::{FederatedSearch, ResultSet, Status};

#[async_trait]
pub trait SourceAdapter: Send + Sync {
    /// Returns the stable lowercase name of the source (e.g. `tool1`).
    fn name(&self) -> &'static str;

    /// Environment variable holding this source's API key.
    fn credential_key(&self) -> &'static str;

    /// Whether the API key was supplied. Checked by the aggregator before any
    /// request is sent.
    fn has_credential(&self) -> bool;

    /// Looks up `indicator` with a single request.
    ///
    /// Never fails: transport, status and decode problems come back as an
    /// error result.
    async fn query(&self, indicator: &str) -> SourceResult;
}

pub struct SourceRegistry {
    sources: Vec<Arc<dyn SourceAdapter>>,
}

impl SourceRegistry {
    pub fn new() -> Self {
        SourceRegistry {
            sources: Vec::new(),
        }
    }

    pub fn register_source(&mut self, source: Arc<dyn SourceAdapter>) {
        self.sources.push(source);
    }

    pub fn sources(&self) -> &[Arc<dyn SourceAdapter>] {
        &self.sources
    }

    /// Credential variables missing across every registered source.
    pub fn missing_credentials(&self) -> Vec<&'static str> {
        self.sources
            .iter()
            .filter(|s| !s.has_credential())
            .map(|s| s.credential_key())
            .collect()
    }
}

impl Default for SourceRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// Builds a registry holding the three built-in sources.
pub fn build_registry(settings: &Settings) -> Result<SourceRegistry, SourceError> {
    let mut registry = SourceRegistry::new();

    registry.register_source(Arc::new(connectors::tool1::Tool1Connector::new(settings)?));
    registry.register_source(Arc::new(connectors::tool2::Tool2Connector::new(settings)?));
    registry.register_source(Arc::new(connectors::tool3::Tool3Connector::new(settings)?));

    Ok(registry)
}
