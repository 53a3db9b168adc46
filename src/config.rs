// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Flownav-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Flownav and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Runtime configuration: optional JSON file, then `FLOWNAV_*` environment overrides.

use std::path::{Path, PathBuf};
use std::time::Duration;
use std::{env, fs, io};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::warn;

use crate::backend::ViewFilter;
use crate::bridge::{BridgeError, OriginPolicy, LOCAL_ORIGIN};
use crate::cache::{FileCacheStore, WriteDurability};

const ENV_PREFIX: &str = "FLOWNAV_";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("invalid config {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    /// Leading-edge window for repeated save triggers.
    #[serde(default = "default_debounce_window_ms")]
    pub debounce_window_ms: u64,

    /// `null` waits for the surface forever.
    #[serde(default = "default_request_timeout_ms")]
    pub request_timeout_ms: Option<u64>,

    #[serde(default = "default_cache_dir")]
    pub cache_dir: PathBuf,

    /// Sync cache files and their directory after every write.
    #[serde(default)]
    pub durable_cache_writes: bool,

    /// Regular expressions matched against the whole sender origin.
    #[serde(default = "default_allowed_origins")]
    pub allowed_origins: Vec<String>,

    #[serde(default)]
    pub view_filter: ViewFilter,

    /// Query draft versions of the tree instead of the published one.
    #[serde(default)]
    pub draft: bool,

    #[serde(default = "default_log_filter")]
    pub log_filter: String,

    #[serde(default)]
    pub json_logs: bool,
}

fn default_debounce_window_ms() -> u64 {
    300
}

fn default_request_timeout_ms() -> Option<u64> {
    Some(30_000)
}

fn default_cache_dir() -> PathBuf {
    PathBuf::from(".flownav/cache")
}

fn default_allowed_origins() -> Vec<String> {
    vec![LOCAL_ORIGIN.to_owned()]
}

fn default_log_filter() -> String {
    "info".to_owned()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            debounce_window_ms: default_debounce_window_ms(),
            request_timeout_ms: default_request_timeout_ms(),
            cache_dir: default_cache_dir(),
            durable_cache_writes: false,
            allowed_origins: default_allowed_origins(),
            view_filter: ViewFilter::default(),
            draft: false,
            log_filter: default_log_filter(),
            json_logs: false,
        }
    }
}

impl Config {
    /// Defaults, overlaid by `path` (if given), overlaid by the process environment.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        config.apply_env(|key| env::var(key).ok());
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let raw = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&raw).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Applies `FLOWNAV_*` overrides read through `lookup`; unparsable values are ignored.
    pub fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        let var = |name: &str| lookup(&format!("{ENV_PREFIX}{name}"));

        if let Some(value) = var("DEBOUNCE_WINDOW_MS") {
            match value.parse::<u64>() {
                Ok(ms) => self.debounce_window_ms = ms,
                Err(_) => warn!("Invalid FLOWNAV_DEBOUNCE_WINDOW_MS value: {}", value),
            }
        }

        if let Some(value) = var("REQUEST_TIMEOUT_MS") {
            match value.trim() {
                "" | "none" | "0" => self.request_timeout_ms = None,
                other => match other.parse::<u64>() {
                    Ok(ms) => self.request_timeout_ms = Some(ms),
                    Err(_) => warn!("Invalid FLOWNAV_REQUEST_TIMEOUT_MS value: {}", value),
                },
            }
        }

        if let Some(value) = var("CACHE_DIR") {
            self.cache_dir = PathBuf::from(value);
        }

        if let Some(value) = var("DURABLE_CACHE_WRITES") {
            match parse_flag(&value) {
                Some(flag) => self.durable_cache_writes = flag,
                None => warn!("Invalid FLOWNAV_DURABLE_CACHE_WRITES value: {}", value),
            }
        }

        if let Some(value) = var("ALLOWED_ORIGINS") {
            self.allowed_origins = value
                .split(',')
                .map(str::trim)
                .filter(|origin| !origin.is_empty())
                .map(str::to_owned)
                .collect();
        }

        if let Some(value) = var("VIEW_FILTER") {
            match value.as_str() {
                "pathOnly" | "path-only" => self.view_filter = ViewFilter::PathOnly,
                "everything" => self.view_filter = ViewFilter::Everything,
                _ => warn!("Invalid FLOWNAV_VIEW_FILTER value: {}", value),
            }
        }

        if let Some(value) = var("DRAFT") {
            match parse_flag(&value) {
                Some(flag) => self.draft = flag,
                None => warn!("Invalid FLOWNAV_DRAFT value: {}", value),
            }
        }

        if let Some(value) = var("LOG") {
            self.log_filter = value;
        }

        if let Some(value) = var("JSON_LOGS") {
            match parse_flag(&value) {
                Some(flag) => self.json_logs = flag,
                None => warn!("Invalid FLOWNAV_JSON_LOGS value: {}", value),
            }
        }
    }

    pub fn debounce_window(&self) -> Duration {
        Duration::from_millis(self.debounce_window_ms)
    }

    /// `None` (or `0`) waits for the surface indefinitely.
    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_ms
            .filter(|ms| *ms > 0)
            .map(Duration::from_millis)
    }

    pub fn origin_policy(&self) -> Result<OriginPolicy, BridgeError> {
        OriginPolicy::new(&self.allowed_origins)
    }

    pub fn cache_store(&self) -> FileCacheStore {
        let durability = if self.durable_cache_writes {
            WriteDurability::Durable
        } else {
            WriteDurability::BestEffort
        };
        FileCacheStore::new(self.cache_dir.clone()).with_durability(durability)
    }
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::time::Duration;

    use rstest::rstest;

    use super::Config;
    use crate::backend::ViewFilter;
    use crate::cache::WriteDurability;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars = pairs
            .iter()
            .map(|(k, v)| ((*k).to_owned(), (*v).to_owned()))
            .collect::<HashMap<_, _>>();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn defaults_match_documented_values() {
        let config = Config::default();
        assert_eq!(config.debounce_window(), Duration::from_millis(300));
        assert_eq!(config.request_timeout(), Some(Duration::from_secs(30)));
        assert_eq!(config.allowed_origins, vec!["local".to_owned()]);
        assert!(config.origin_policy().expect("policy").allows("local"));
        assert!(!config.origin_policy().expect("policy").allows("https://elsewhere"));
    }

    #[test]
    fn partial_file_keeps_defaults() {
        let config: Config =
            serde_json::from_str(r#"{"debounceWindowMs": 50, "requestTimeoutMs": null}"#)
                .expect("parse");
        assert_eq!(config.debounce_window_ms, 50);
        assert_eq!(config.request_timeout(), None);
        assert_eq!(config.log_filter, "info");
    }

    #[test]
    fn cache_store_defaults_to_best_effort_writes() {
        let config = Config::default();
        let store = config.cache_store();
        assert_eq!(store.dir(), config.cache_dir.as_path());
        assert_eq!(store.durability(), WriteDurability::BestEffort);
    }

    #[test]
    fn zero_timeout_in_file_disables_it() {
        let config: Config = serde_json::from_str(r#"{"requestTimeoutMs": 0}"#).expect("parse");
        assert_eq!(config.request_timeout(), None);
    }

    #[test]
    fn env_overrides_apply() {
        let mut config = Config::default();
        config.apply_env(env(&[
            ("FLOWNAV_DEBOUNCE_WINDOW_MS", "0"),
            ("FLOWNAV_ALLOWED_ORIGINS", "local, https://editor\\.example\\.com"),
            ("FLOWNAV_VIEW_FILTER", "pathOnly"),
            ("FLOWNAV_DRAFT", "yes"),
            ("FLOWNAV_JSON_LOGS", "1"),
            ("FLOWNAV_DURABLE_CACHE_WRITES", "on"),
        ]));
        assert_eq!(config.debounce_window(), Duration::ZERO);
        assert_eq!(config.allowed_origins.len(), 2);
        assert_eq!(config.view_filter, ViewFilter::PathOnly);
        assert!(config.draft);
        assert!(config.json_logs);
        assert_eq!(config.cache_store().durability(), WriteDurability::Durable);
    }

    #[rstest]
    #[case("none", None)]
    #[case("0", None)]
    #[case("1500", Some(1500))]
    #[case("soon", Some(30_000))]
    fn request_timeout_override(#[case] raw: &str, #[case] expected: Option<u64>) {
        let mut config = Config::default();
        config.apply_env(env(&[("FLOWNAV_REQUEST_TIMEOUT_MS", raw)]));
        assert_eq!(config.request_timeout_ms, expected);
    }

    #[test]
    fn invalid_values_are_ignored() {
        let mut config = Config::default();
        config.apply_env(env(&[
            ("FLOWNAV_DEBOUNCE_WINDOW_MS", "fast"),
            ("FLOWNAV_DRAFT", "maybe"),
            ("FLOWNAV_VIEW_FILTER", "some"),
        ]));
        assert_eq!(config, Config::default());
    }
}
