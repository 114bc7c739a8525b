//! Shared HTTP plumbing for the key-authenticated REST sources.

use crate::config::SourceSettings;
use crate::error::SourceError;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, ACCEPT, AUTHORIZATION};
use reqwest::Client;
use serde_json::Value;
use std::time::Duration;
use url::Url;

const USER_AGENT: &str = concat!("tiq/", env!("CARGO_PKG_VERSION"));

/// Longest body excerpt carried into a protocol error message.
const MAX_ERROR_DETAIL: usize = 200;

/// How a source expects its API key to be presented.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthScheme {
    /// `Authorization: Bearer <key>`
    Bearer,
    /// `<header>: <key>`
    Header(&'static str),
    /// `Authorization: Key <key>`
    Key,
}

impl AuthScheme {
    fn header(&self, key: &str) -> Result<(HeaderName, HeaderValue), SourceError> {
        let (name, value) = match self {
            AuthScheme::Bearer => (AUTHORIZATION, format!("Bearer {}", key)),
            AuthScheme::Key => (AUTHORIZATION, format!("Key {}", key)),
            AuthScheme::Header(name) => (
                HeaderName::from_bytes(name.as_bytes()).map_err(|e| {
                    SourceError::InvalidCredential(format!("bad header name: {}", e))
                })?,
                key.to_string(),
            ),
        };
        let mut value = HeaderValue::from_str(&value)
            .map_err(|e| SourceError::InvalidCredential(e.to_string()))?;
        value.set_sensitive(true);
        Ok((name, value))
    }
}

/// Fixed request shape of one source.
#[derive(Debug, Clone, Copy)]
pub struct Endpoint {
    pub path: &'static str,
    pub query_param: &'static str,
    pub auth: AuthScheme,
}

/// One source's HTTP client. Each source owns its own connection pool.
pub struct RestSource {
    client: Client,
    endpoint: Endpoint,
    base_url: String,
    api_key_var: &'static str,
    api_key: Option<String>,
    timeout: Duration,
}

impl RestSource {
    pub fn new(
        settings: &SourceSettings,
        endpoint: Endpoint,
        timeout: Duration,
    ) -> Result<Self, SourceError> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(timeout)
            .build()
            .map_err(|e| SourceError::Transport(e.to_string()))?;
        Ok(Self {
            client,
            endpoint,
            base_url: settings.base_url.clone(),
            api_key_var: settings.api_key_var,
            api_key: settings.api_key.clone(),
            timeout,
        })
    }

    pub fn api_key_var(&self) -> &'static str {
        self.api_key_var
    }

    pub fn has_api_key(&self) -> bool {
        self.api_key.is_some()
    }

    /// Full request URL for `indicator`, query string included.
    pub fn request_url(&self, indicator: &str) -> Result<Url, SourceError> {
        let raw = format!("{}{}", self.base_url, self.endpoint.path);
        let mut url = Url::parse(&raw).map_err(|e| SourceError::InvalidUrl {
            url: raw.clone(),
            reason: e.to_string(),
        })?;
        url.query_pairs_mut()
            .append_pair(self.endpoint.query_param, indicator);
        Ok(url)
    }

    /// Performs the single GET round trip and decodes a 2xx body as JSON.
    pub async fn get_json(&self, indicator: &str) -> Result<Value, SourceError> {
        let url = self.request_url(indicator)?;
        let key = self
            .api_key
            .as_deref()
            .ok_or_else(|| SourceError::Configuration(vec![self.api_key_var]))?;

        let mut headers = HeaderMap::new();
        let (name, value) = self.endpoint.auth.header(key)?;
        headers.insert(name, value);
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let resp = self
            .client
            .get(url.clone())
            .headers(headers)
            .send()
            .await
            .map_err(|e| SourceError::from_reqwest(e, self.timeout))?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(SourceError::Protocol {
                status: status.as_u16(),
                url: strip_query(&url),
                detail: error_detail(status.canonical_reason(), &body),
            });
        }

        let body = resp
            .bytes()
            .await
            .map_err(|e| SourceError::from_reqwest(e, self.timeout))?;
        serde_json::from_slice(&body).map_err(|e| SourceError::Decode(e.to_string()))
    }
}

/// The indicator is dropped from URLs that end up in messages and logs.
fn strip_query(url: &Url) -> String {
    let mut url = url.clone();
    url.set_query(None);
    url.to_string()
}

fn error_detail(reason: Option<&str>, body: &str) -> String {
    let reason = reason.unwrap_or("Unknown Status");
    let body = body.trim();
    if body.is_empty() {
        return reason.to_string();
    }
    let excerpt: String = body.chars().take(MAX_ERROR_DETAIL).collect();
    if excerpt.len() < body.len() {
        format!("{} - {}...", reason, excerpt)
    } else {
        format!("{} - {}", reason, excerpt)
    }
}
