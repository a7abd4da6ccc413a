//! Application configuration structures.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::{AppError, Result};

/// Root application configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// Document store settings
    #[serde(default)]
    pub store: StoreConfig,

    /// HTTP fetch behavior settings
    #[serde(default)]
    pub fetch: FetchConfig,

    /// RSS feed sources, processed in list order
    #[serde(default)]
    pub feeds: Vec<SourceEntry>,

    /// HTML page sources, processed in list order
    #[serde(default)]
    pub pages: Vec<SourceEntry>,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    /// Load configuration or return default if loading fails.
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        Self::load(&path).unwrap_or_else(|e| {
            log::warn!(
                "Config load failed from {:?}: {}. Using defaults.",
                path.as_ref(),
                e
            );
            Self::default()
        })
    }

    /// Validate configuration values for basic sanity.
    pub fn validate(&self) -> Result<()> {
        if self.fetch.user_agent.trim().is_empty() {
            return Err(AppError::validation("fetch.user_agent is empty"));
        }
        if self.fetch.timeout_secs == 0 {
            return Err(AppError::validation("fetch.timeout_secs must be > 0"));
        }
        if self.store.collection.trim().is_empty() {
            return Err(AppError::validation("store.collection is empty"));
        }
        for entry in self.feeds.iter().chain(self.pages.iter()) {
            entry.validate()?;
        }
        Ok(())
    }
}

/// Document store settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Directory holding the store collections
    #[serde(default = "defaults::store_root")]
    pub root_dir: String,

    /// Collection name for collected updates
    #[serde(default = "defaults::collection")]
    pub collection: String,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            root_dir: defaults::store_root(),
            collection: defaults::collection(),
        }
    }
}

/// HTTP client and fetch behavior settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FetchConfig {
    /// User-Agent header for HTTP requests
    #[serde(default = "defaults::user_agent")]
    pub user_agent: String,

    /// Request timeout in seconds
    #[serde(default = "defaults::timeout")]
    pub timeout_secs: u64,

    /// Delay between sources in milliseconds
    #[serde(default = "defaults::request_delay")]
    pub request_delay_ms: u64,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            user_agent: defaults::user_agent(),
            timeout_secs: defaults::timeout(),
            request_delay_ms: defaults::request_delay(),
        }
    }
}

/// One configured feed or page source.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceEntry {
    /// Human-readable display name, recorded on every collected update
    pub name: String,

    /// Feed or page URL to fetch
    pub url: String,

    /// Default category applied to updates from this source
    #[serde(default = "defaults::category")]
    pub category: String,
}

impl SourceEntry {
    /// Check that the entry has a usable name and a parseable URL.
    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(AppError::validation(format!(
                "source entry for {} has an empty name",
                self.url
            )));
        }
        Url::parse(&self.url)
            .map_err(|e| AppError::validation(format!("source {}: bad url: {}", self.name, e)))?;
        Ok(())
    }
}

/// Default values for configuration fields.
mod defaults {
    pub fn store_root() -> String {
        "storage".to_string()
    }

    pub fn collection() -> String {
        "raw_updates".to_string()
    }

    pub fn user_agent() -> String {
        "Mozilla/5.0 (compatible; lexwatch/0.1)".to_string()
    }

    pub fn timeout() -> u64 {
        30
    }

    pub fn request_delay() -> u64 {
        0
    }

    pub fn category() -> String {
        "General".to_string()
    }
}
