//! Source credentials and endpoints.
//!
//! `Settings` is built once at startup and handed to every adapter by
//! reference. Nothing here performs I/O besides reading the environment.

use std::time::Duration;
use tracing::warn;

pub const DEFAULT_TIMEOUT_SECS: u64 = 30;
pub const TIMEOUT_ENV: &str = "TIQ_TIMEOUT_SECS";

/// Static description of where a source's settings come from.
#[derive(Debug, Clone, Copy)]
pub struct SourceEnv {
    pub api_key_var: &'static str,
    pub base_url_var: &'static str,
    pub default_base_url: &'static str,
}

pub const TOOL1_ENV: SourceEnv = SourceEnv {
    api_key_var: "TOOL1_API_KEY",
    base_url_var: "TOOL1_BASE_URL",
    default_base_url: "https://api.tool1.com/v1",
};

pub const TOOL2_ENV: SourceEnv = SourceEnv {
    api_key_var: "TOOL2_API_KEY",
    base_url_var: "TOOL2_BASE_URL",
    default_base_url: "https://api.tool2.com/v1",
};

pub const TOOL3_ENV: SourceEnv = SourceEnv {
    api_key_var: "TOOL3_API_KEY",
    base_url_var: "TOOL3_BASE_URL",
    default_base_url: "https://api.tool3.com/v1",
};

/// Credential and base URL for one source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceSettings {
    /// Name of the environment variable the key was read from.
    pub api_key_var: &'static str,
    pub api_key: Option<String>,
    pub base_url: String,
}

impl SourceSettings {
    pub fn new(
        api_key_var: &'static str,
        api_key: Option<String>,
        base_url: impl Into<String>,
    ) -> Self {
        let base_url = base_url.into();
        Self {
            api_key_var,
            // An empty key is as good as no key.
            api_key: api_key.filter(|k| !k.trim().is_empty()),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    fn load<F>(env: &SourceEnv, lookup: &F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let base_url = lookup(env.base_url_var)
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| env.default_base_url.to_string());
        Self::new(env.api_key_var, lookup(env.api_key_var), base_url)
    }

    pub fn has_api_key(&self) -> bool {
        self.api_key.is_some()
    }
}

/// Immutable configuration for one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub tool1: SourceSettings,
    pub tool2: SourceSettings,
    pub tool3: SourceSettings,
    pub timeout: Duration,
}

impl Settings {
    /// Reads settings from the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Reads settings through an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let timeout = match lookup(TIMEOUT_ENV) {
            Some(raw) => match raw.trim().parse::<u64>() {
                Ok(secs) if secs > 0 => Duration::from_secs(secs),
                _ => {
                    warn!(
                        value = %raw,
                        "Ignoring invalid {}, using {}s",
                        TIMEOUT_ENV,
                        DEFAULT_TIMEOUT_SECS
                    );
                    Duration::from_secs(DEFAULT_TIMEOUT_SECS)
                }
            },
            None => Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        };

        Self {
            tool1: SourceSettings::load(&TOOL1_ENV, &lookup),
            tool2: SourceSettings::load(&TOOL2_ENV, &lookup),
            tool3: SourceSettings::load(&TOOL3_ENV, &lookup),
            timeout,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Names of the required key variables that are unset or empty.
    pub fn missing_keys(&self) -> Vec<&'static str> {
        [&self.tool1, &self.tool2, &self.tool3]
            .into_iter()
            .filter(|s| !s.has_api_key())
            .map(|s| s.api_key_var)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_apply_when_only_keys_are_set() {
        let settings = Settings::from_lookup(lookup_from(&[
            ("TOOL1_API_KEY", "k1"),
            ("TOOL2_API_KEY", "k2"),
            ("TOOL3_API_KEY", "k3"),
        ]));

        assert_eq!(settings.tool1.base_url, "https://api.tool1.com/v1");
        assert_eq!(settings.tool2.base_url, "https://api.tool2.com/v1");
        assert_eq!(settings.tool3.base_url, "https://api.tool3.com/v1");
        assert_eq!(settings.timeout, Duration::from_secs(30));
        assert!(settings.missing_keys().is_empty());
    }

    #[test]
    fn empty_and_unset_keys_are_missing() {
        let settings = Settings::from_lookup(lookup_from(&[
            ("TOOL1_API_KEY", "k1"),
            ("TOOL2_API_KEY", ""),
        ]));

        assert_eq!(settings.missing_keys(), vec!["TOOL2_API_KEY", "TOOL3_API_KEY"]);
    }

    #[test]
    fn base_url_override_drops_trailing_slash() {
        let settings = Settings::from_lookup(lookup_from(&[(
            "TOOL2_BASE_URL",
            "http://127.0.0.1:9000/api/",
        )]));
        assert_eq!(settings.tool2.base_url, "http://127.0.0.1:9000/api");
    }

    #[test]
    fn timeout_env_is_honoured_and_bad_values_ignored() {
        let settings = Settings::from_lookup(lookup_from(&[("TIQ_TIMEOUT_SECS", "5")]));
        assert_eq!(settings.timeout, Duration::from_secs(5));

        let settings = Settings::from_lookup(lookup_from(&[("TIQ_TIMEOUT_SECS", "soon")]));
        assert_eq!(settings.timeout, Duration::from_secs(DEFAULT_TIMEOUT_SECS));

        let settings = Settings::from_lookup(lookup_from(&[("TIQ_TIMEOUT_SECS", "0")]));
        assert_eq!(settings.timeout, Duration::from_secs(DEFAULT_TIMEOUT_SECS));
    }
}
