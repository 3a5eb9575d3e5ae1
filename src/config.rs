//! Configuration module for pollwatch.
//!
//! Loads the JSON configuration file holding the listen address, the poll
//! interval, and the domain definitions targets refer to.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use serde::Deserialize;
use thiserror::Error;

/// Configuration error types.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("can't read config file {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("can't parse config file {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Listen address for the status server.
#[derive(Debug, Clone, Deserialize)]
pub struct SiteConfig {
    pub host: String,
    pub port: u16,
}

/// A named group of connection defaults shared by one or more targets.
///
/// Targets reference a domain by its `key` and inherit its scheme, host, and
/// default headers. The host lives in the `domain` field of the config file.
#[derive(Debug, Clone, Deserialize)]
pub struct Domain {
    pub key: String,
    pub scheme: String,
    #[serde(rename = "domain")]
    pub host: String,
    #[serde(default)]
    pub headers: HashMap<String, String>,
}

/// Top-level configuration loaded from a JSON file.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub site: SiteConfig,
    pub interval: u64,
    pub domains: Vec<Domain>,
}

impl Config {
    /// Load configuration from the given JSON file.
    ///
    /// Any failure here is fatal at startup; the process never runs with a
    /// partial configuration.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| ConfigError::Read {
            path: path.display().to_string(),
            source: e,
        })?;

        serde_json::from_str(&content).map_err(|e| ConfigError::Parse {
            path: path.display().to_string(),
            source: e,
        })
    }

    /// Build the domain lookup table keyed by domain key.
    pub fn domain_map(&self) -> HashMap<String, Domain> {
        self.domains
            .iter()
            .map(|d| (d.key.clone(), d.clone()))
            .collect()
    }
}
