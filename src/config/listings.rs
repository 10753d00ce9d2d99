//! Listing source configuration

use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;

use super::error::ValidationError;

/// Where listings come from and how many a search returns.
#[derive(Debug, Clone, Deserialize)]
pub struct ListingsConfig {
    /// Directory of `*.json` source files
    #[serde(default = "default_sources_dir")]
    pub sources_dir: PathBuf,

    /// Results per search when the request gives no limit
    #[serde(default = "default_limit")]
    pub default_limit: usize,

    /// Upper bound for a requested limit
    #[serde(default = "default_max_limit")]
    pub max_limit: usize,

    /// Reload period; no periodic reload when unset
    pub refresh_interval_secs: Option<u64>,
}

impl ListingsConfig {
    pub fn refresh_interval(&self) -> Option<Duration> {
        self.refresh_interval_secs.map(Duration::from_secs)
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.default_limit == 0 || self.default_limit > self.max_limit {
            return Err(ValidationError::InvalidLimits);
        }
        if self.refresh_interval_secs == Some(0) {
            return Err(ValidationError::InvalidRefreshInterval);
        }
        Ok(())
    }
}

impl Default for ListingsConfig {
    fn default() -> Self {
        Self {
            sources_dir: default_sources_dir(),
            default_limit: default_limit(),
            max_limit: default_max_limit(),
            refresh_interval_secs: None,
        }
    }
}

fn default_sources_dir() -> PathBuf {
    PathBuf::from("data/listings")
}

fn default_limit() -> usize {
    10
}

fn default_max_limit() -> usize {
    50
}
