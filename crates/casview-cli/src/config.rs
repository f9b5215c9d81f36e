//! `casview.toml` loading.
//!
//! ```toml
//! [validation]
//! release_credential = false
//! reserved_attribute_names = "reject"   # or "prefix"
//!
//! [callback]
//! max_total_connections = 20
//! max_connections_per_host = 2
//! connect_timeout_ms = 5000
//! socket_timeout_ms = 5000
//! pool_wait_timeout_ms = 5000
//! require_https = true
//! accepted_statuses = [200]
//! ```
//!
//! Every key is optional.

use casview_kernel::ValidationPolicy;
use casview_transport::CallbackTransportConfig;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

pub const DEFAULT_CONFIG_PATH: &str = "casview.toml";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read file: {path}: {source}")]
    ReadFile {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid toml at {path}: {source}")]
    ParseToml {
        path: String,
        #[source]
        source: toml::de::Error,
    },

    #[error("invalid config at {path}: {reason}")]
    Invalid { path: String, reason: String },
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CasviewConfig {
    pub validation: ValidationPolicy,
    pub callback: CallbackTransportConfig,
}

impl CasviewConfig {
    /// Parse and validate a config document; `origin` labels errors.
    pub fn from_toml_str(text: &str, origin: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(text).map_err(|source| ConfigError::ParseToml {
            path: origin.to_string(),
            source,
        })?;
        config
            .callback
            .validate()
            .map_err(|e| ConfigError::Invalid {
                path: origin.to_string(),
                reason: e.to_string(),
            })?;
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let origin = path.display().to_string();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::ReadFile {
            path: origin.clone(),
            source,
        })?;
        Self::from_toml_str(&text, &origin)
    }

    /// Load an explicit path, else `casview.toml` when present, else defaults.
    ///
    /// Returns the path the config came from, if any.
    pub fn resolve(explicit: Option<&str>) -> Result<(Self, Option<PathBuf>), ConfigError> {
        if let Some(path) = explicit {
            let path = PathBuf::from(path);
            return Ok((Self::load(&path)?, Some(path)));
        }
        let fallback = PathBuf::from(DEFAULT_CONFIG_PATH);
        if fallback.exists() {
            return Ok((Self::load(&fallback)?, Some(fallback)));
        }
        Ok((Self::default(), None))
    }
}
