//! Federated lookup execution engine.
//!
//! Runs every registered source concurrently for one indicator and collects
//! the answers in the order they arrive.

use super::{ResultSet, SourceResult};
use crate::error::SourceError;
use crate::SourceRegistry;
use futures::stream::{FuturesUnordered, StreamExt};
use std::any::Any;
use std::sync::Arc;
use std::time::Instant;
use tokio::task::JoinError;
use tracing::{debug, error};

/// Engine for executing one lookup across all registered sources.
pub struct FederatedSearch<'a> {
    registry: &'a SourceRegistry,
}

impl<'a> FederatedSearch<'a> {
    /// Create a new federated search engine.
    pub fn new(registry: &'a SourceRegistry) -> Self {
        Self { registry }
    }

    /// Query every source for `indicator`.
    ///
    /// Returns one result per source, ordered by completion. If any source is
    /// missing its credential, nothing is sent and the set holds a single
    /// configuration error instead.
    pub async fn search(&self, indicator: &str) -> ResultSet {
        let missing = self.registry.missing_credentials();
        if !missing.is_empty() {
            let err = SourceError::Configuration(missing);
            error!("{}", err);
            return ResultSet::configuration_error(&err);
        }

        let start = Instant::now();
        let sources = self.registry.sources();
        let indicator: Arc<str> = Arc::from(indicator);

        // One task per source; nothing queues behind anything else.
        let mut pending: FuturesUnordered<_> = sources
            .iter()
            .map(|source| {
                let name = source.name();
                let source = Arc::clone(source);
                let indicator = Arc::clone(&indicator);
                let handle = tokio::spawn(async move { source.query(&indicator).await });
                async move { (name, handle.await) }
            })
            .collect();

        debug!(sources = sources.len(), "Dispatched lookups");

        let mut results = ResultSet::with_capacity(sources.len());
        while let Some((name, joined)) = pending.next().await {
            match joined {
                Ok(result) => {
                    debug!(
                        source = name,
                        status = result.status().as_str(),
                        elapsed_ms = start.elapsed().as_millis() as u64,
                        "Source finished"
                    );
                    results.push(result);
                }
                Err(join_err) => {
                    let err = SourceError::Unexpected(describe_join_error(join_err));
                    error!(source = name, error = %err, "Error in {}", name);
                    results.push(SourceResult::error(name, err.to_string()));
                }
            }
        }

        debug!(
            results = results.len(),
            errors = results.error_count(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "Lookup complete"
        );
        results
    }
}

fn describe_join_error(err: JoinError) -> String {
    if err.is_panic() {
        format!("source task panicked: {}", panic_message(err.into_panic()))
    } else {
        err.to_string()
    }
}

fn panic_message(payload: Box<dyn Any + Send>) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{SourceAdapter, Status};
    use async_trait::async_trait;
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    enum Behaviour {
        Answer,
        Fail,
        Panic,
    }

    struct StubSource {
        name: &'static str,
        key: &'static str,
        configured: bool,
        delay: Duration,
        behaviour: Behaviour,
        calls: Arc<AtomicUsize>,
    }

    impl StubSource {
        fn new(name: &'static str, key: &'static str) -> Self {
            Self {
                name,
                key,
                configured: true,
                delay: Duration::ZERO,
                behaviour: Behaviour::Answer,
                calls: Arc::new(AtomicUsize::new(0)),
            }
        }

        fn delay_ms(mut self, ms: u64) -> Self {
            self.delay = Duration::from_millis(ms);
            self
        }

        fn behaviour(mut self, behaviour: Behaviour) -> Self {
            self.behaviour = behaviour;
            self
        }

        fn unconfigured(mut self) -> Self {
            self.configured = false;
            self
        }
    }

    #[async_trait]
    impl SourceAdapter for StubSource {
        fn name(&self) -> &'static str {
            self.name
        }
        fn credential_key(&self) -> &'static str {
            self.key
        }
        fn has_credential(&self) -> bool {
            self.configured
        }
        async fn query(&self, indicator: &str) -> SourceResult {
            self.calls.fetch_add(1, Ordering::SeqCst);
            tokio::time::sleep(self.delay).await;
            match self.behaviour {
                Behaviour::Answer => {
                    SourceResult::success(self.name, json!({ "indicator": indicator }))
                }
                Behaviour::Fail => SourceResult::error(self.name, "HTTP 503"),
                Behaviour::Panic => panic!("{} blew up", self.name),
            }
        }
    }

    fn registry(sources: Vec<StubSource>) -> SourceRegistry {
        let mut registry = SourceRegistry::new();
        for source in sources {
            registry.register_source(Arc::new(source));
        }
        registry
    }

    #[tokio::test]
    async fn every_source_reports_once() {
        let registry = registry(vec![
            StubSource::new("tool1", "TOOL1_API_KEY"),
            StubSource::new("tool2", "TOOL2_API_KEY").behaviour(Behaviour::Fail),
            StubSource::new("tool3", "TOOL3_API_KEY"),
        ]);

        let results = FederatedSearch::new(&registry).search("1.2.3.4").await;

        assert_eq!(results.len(), 3);
        assert_eq!(results.get("tool1").unwrap().status(), Status::Success);
        assert_eq!(results.get("tool2").unwrap().status(), Status::Error);
        assert_eq!(
            results.get("tool3").unwrap().data(),
            Some(&json!({"indicator": "1.2.3.4"}))
        );
    }

    #[tokio::test]
    async fn results_arrive_in_completion_order() {
        let registry = registry(vec![
            StubSource::new("tool1", "TOOL1_API_KEY").delay_ms(150),
            StubSource::new("tool2", "TOOL2_API_KEY").delay_ms(75),
            StubSource::new("tool3", "TOOL3_API_KEY"),
        ]);

        let results = FederatedSearch::new(&registry).search("example.com").await;
        let order: Vec<_> = results.iter().map(|r| r.source()).collect();
        assert_eq!(order, vec!["tool3", "tool2", "tool1"]);
    }

    #[tokio::test]
    async fn sources_run_concurrently() {
        let registry = registry(vec![
            StubSource::new("tool1", "TOOL1_API_KEY").delay_ms(200),
            StubSource::new("tool2", "TOOL2_API_KEY").delay_ms(200),
            StubSource::new("tool3", "TOOL3_API_KEY").delay_ms(200),
        ]);

        let start = Instant::now();
        let results = FederatedSearch::new(&registry).search("example.com").await;
        assert_eq!(results.len(), 3);
        assert!(start.elapsed() < Duration::from_millis(550));
    }

    #[tokio::test]
    async fn missing_credential_short_circuits() {
        let tool1 = StubSource::new("tool1", "TOOL1_API_KEY");
        let calls = Arc::clone(&tool1.calls);
        let registry = registry(vec![
            tool1,
            StubSource::new("tool2", "TOOL2_API_KEY").unconfigured(),
            StubSource::new("tool3", "TOOL3_API_KEY").unconfigured(),
        ]);

        let results = FederatedSearch::new(&registry).search("1.2.3.4").await;

        assert_eq!(results.len(), 1);
        let only = results.iter().next().unwrap();
        assert_eq!(only.source(), "config");
        assert_eq!(
            only.error_message(),
            Some("Missing API keys: TOOL2_API_KEY, TOOL3_API_KEY")
        );
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn panicking_source_keeps_its_slot() {
        let registry = registry(vec![
            StubSource::new("tool1", "TOOL1_API_KEY"),
            StubSource::new("tool2", "TOOL2_API_KEY").behaviour(Behaviour::Panic),
            StubSource::new("tool3", "TOOL3_API_KEY").delay_ms(20),
        ]);

        let results = FederatedSearch::new(&registry).search("1.2.3.4").await;

        assert_eq!(results.len(), 3);
        let lost = results.get("tool2").unwrap();
        assert_eq!(lost.status(), Status::Error);
        let message = lost.error_message().unwrap();
        assert!(message.contains("panicked"), "{}", message);
        assert!(message.contains("tool2 blew up"), "{}", message);
        assert!(results.get("tool1").unwrap().is_success());
        assert!(results.get("tool3").unwrap().is_success());
    }

    #[tokio::test]
    async fn repeated_searches_are_not_cached() {
        let tool1 = StubSource::new("tool1", "TOOL1_API_KEY");
        let calls = Arc::clone(&tool1.calls);
        let registry = registry(vec![tool1]);
        let engine = FederatedSearch::new(&registry);

        engine.search("1.2.3.4").await;
        engine.search("1.2.3.4").await;

        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn panic_payloads_are_rendered() {
        assert_eq!(panic_message(Box::new("static")), "static");
        assert_eq!(panic_message(Box::new(String::from("owned"))), "owned");
        assert_eq!(panic_message(Box::new(7u8)), "unknown panic");
    }
}
