//! Core types for aggregated lookups.

use crate::error::SourceError;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Source name used for the configuration-error result.
pub const CONFIG_SOURCE: &str = "config";

/// Whether a source answered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Success,
    Error,
}

impl Status {
    pub fn as_str(&self) -> &'static str {
        match self {
            Status::Success => "success",
            Status::Error => "error",
        }
    }
}

/// Payload of a result, tagged by `status` on the wire.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum Outcome {
    Success { data: Value },
    Error { error: String },
}

/// A normalized answer from one source.
///
/// Serializes as `{"source": .., "status": "success", "data": ..}` or
/// `{"source": .., "status": "error", "error": ".."}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceResult {
    source: String,
    #[serde(flatten)]
    outcome: Outcome,
}

impl SourceResult {
    pub fn success(source: impl Into<String>, data: Value) -> Self {
        Self {
            source: source.into(),
            outcome: Outcome::Success { data },
        }
    }

    pub fn error(source: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            outcome: Outcome::Error {
                error: error.into(),
            },
        }
    }

    /// Converts an adapter outcome, logging the failure once.
    pub fn from_fetch(source: &str, fetched: Result<Value, SourceError>) -> Self {
        match fetched {
            Ok(data) => Self::success(source, data),
            Err(err) => {
                tracing::error!(
                    source = %source,
                    code = err.code_str(),
                    error = %err,
                    "Error querying {}",
                    source
                );
                Self::error(source, err.to_string())
            }
        }
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn status(&self) -> Status {
        match self.outcome {
            Outcome::Success { .. } => Status::Success,
            Outcome::Error { .. } => Status::Error,
        }
    }

    pub fn outcome(&self) -> &Outcome {
        &self.outcome
    }

    pub fn data(&self) -> Option<&Value> {
        match &self.outcome {
            Outcome::Success { data } => Some(data),
            Outcome::Error { .. } => None,
        }
    }

    pub fn error_message(&self) -> Option<&str> {
        match &self.outcome {
            Outcome::Success { .. } => None,
            Outcome::Error { error } => Some(error),
        }
    }

    pub fn is_success(&self) -> bool {
        self.status() == Status::Success
    }
}

/// All results from one search, in completion order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ResultSet {
    results: Vec<SourceResult>,
}

impl ResultSet {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            results: Vec::with_capacity(capacity),
        }
    }

    /// The single-entry set returned when credentials are missing.
    pub fn configuration_error(err: &SourceError) -> Self {
        Self {
            results: vec![SourceResult::error(CONFIG_SOURCE, err.to_string())],
        }
    }

    pub(crate) fn push(&mut self, result: SourceResult) {
        self.results.push(result);
    }

    pub fn len(&self) -> usize {
        self.results.len()
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, SourceResult> {
        self.results.iter()
    }

    /// Looks a result up by source name. Position carries no meaning.
    pub fn get(&self, source: &str) -> Option<&SourceResult> {
        self.results.iter().find(|r| r.source == source)
    }

    pub fn has_errors(&self) -> bool {
        self.results.iter().any(|r| !r.is_success())
    }

    pub fn error_count(&self) -> usize {
        self.results.iter().filter(|r| !r.is_success()).count()
    }
}

impl<'a> IntoIterator for &'a ResultSet {
    type Item = &'a SourceResult;
    type IntoIter = std::slice::Iter<'a, SourceResult>;

    fn into_iter(self) -> Self::IntoIter {
        self.results.iter()
    }
}

impl FromIterator<SourceResult> for ResultSet {
    fn from_iter<I: IntoIterator<Item = SourceResult>>(iter: I) -> Self {
        Self {
            results: iter.into_iter().collect(),
        }
    }
}
