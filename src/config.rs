//! Settings read once from the process environment before the server starts.

use std::collections::HashSet;

use config::{Config, Environment};
use serde::Deserialize;
use subtle::{Choice, ConstantTimeEq};
use thiserror::Error;

use crate::constants::{DEFAULT_MAX_FILE_SIZE_MB, DEFAULT_PORT, MB_SHIFT};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("API_KEYS not set")]
    ApiKeysNotSet,

    #[error("no valid API keys")]
    NoValidApiKeys,

    #[error("failed to read environment: {0}")]
    Source(#[from] config::ConfigError),
}

/// Raw environment values. The `config` environment source may or may not
/// lowercase variable names, so both spellings are accepted.
#[derive(Debug, Default, Deserialize)]
struct RawSettings {
    #[serde(default, alias = "PORT")]
    port: Option<String>,
    #[serde(default, alias = "MAX_FILE_SIZE_MB")]
    max_file_size_mb: Option<String>,
    #[serde(default, alias = "API_KEYS")]
    api_keys: Option<String>,
    #[serde(default, alias = "CORS_ALLOWED_ORIGINS")]
    cors_allowed_origins: Option<String>,
    #[serde(default, alias = "CORS_ALLOWED_METHODS")]
    cors_allowed_methods: Option<String>,
}

/// Immutable, process-wide service settings.
#[derive(Debug, Clone)]
pub struct Settings {
    pub port: String,
    pub max_upload_bytes: u64,
    pub api_keys: HashSet<String>,
    pub cors_allowed_origins: Vec<String>,
    pub cors_allowed_methods: Vec<String>,
}

impl Settings {
    pub fn new<I, K>(port: &str, max_upload_bytes: u64, api_keys: I) -> Self
    where
        I: IntoIterator<Item = K>,
        K: Into<String>,
    {
        Settings {
            port: port.to_owned(),
            max_upload_bytes,
            api_keys: api_keys.into_iter().map(Into::into).collect(),
            cors_allowed_origins: Vec::new(),
            cors_allowed_methods: Vec::new(),
        }
    }

    /// Reads settings from the process environment.
    pub fn load() -> Result<Self, ConfigError> {
        let config = Config::builder()
            .add_source(Environment::default())
            .build()?;
        Self::from_config(config)
    }

    pub fn from_config(config: Config) -> Result<Self, ConfigError> {
        let raw: RawSettings = config.try_deserialize()?;

        let max_upload_bytes = parse_max_upload_bytes(raw.max_file_size_mb.as_deref());

        let api_keys: HashSet<String> = match non_empty(raw.api_keys) {
            None => return Err(ConfigError::ApiKeysNotSet),
            Some(keys) => split_list(&keys).collect(),
        };
        if api_keys.is_empty() {
            return Err(ConfigError::NoValidApiKeys);
        }

        let cors_allowed_methods = match non_empty(raw.cors_allowed_methods) {
            None => vec!["GET".to_owned()],
            Some(methods) => split_list(&methods).collect(),
        };

        Ok(Settings {
            port: non_empty(raw.port).unwrap_or_else(|| DEFAULT_PORT.to_owned()),
            max_upload_bytes,
            api_keys,
            cors_allowed_origins: raw
                .cors_allowed_origins
                .as_deref()
                .map(|origins| split_list(origins).collect())
                .unwrap_or_default(),
            cors_allowed_methods,
        })
    }

    /// Upload cap in whole megabytes, as shown to clients.
    pub fn max_upload_mb(&self) -> u64 {
        self.max_upload_bytes >> MB_SHIFT
    }

    /// Compares `candidate` against every configured key in constant time.
    pub fn is_valid_key(&self, candidate: &str) -> bool {
        self.api_keys
            .iter()
            .fold(Choice::from(0), |found, key| {
                found | key.as_bytes().ct_eq(candidate.as_bytes())
            })
            .into()
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

/// Splits a comma separated list, dropping blank entries.
fn split_list(value: &str) -> impl Iterator<Item = String> + '_ {
    value
        .split(',')
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .map(str::to_owned)
}

/// Converts `MAX_FILE_SIZE_MB` to bytes. Values that are not a non-negative
/// integer, or that overflow once converted, fall back to the default.
fn parse_max_upload_bytes(value: Option<&str>) -> u64 {
    let default_bytes = DEFAULT_MAX_FILE_SIZE_MB << MB_SHIFT;
    match value {
        None | Some("") => default_bytes,
        Some(value) => match value
            .parse::<u64>()
            .ok()
            .and_then(|mb| mb.checked_mul(1 << MB_SHIFT))
        {
            Some(bytes) => bytes,
            None => {
                log::warn!(
                    "Invalid, negative or too large value for MAX_FILE_SIZE_MB: {:?}, using default: {}",
                    value,
                    DEFAULT_MAX_FILE_SIZE_MB
                );
                default_bytes
            }
        },
    }
}
