//! Application configuration module
//!
//! This module provides type-safe configuration loading from environment variables
//! using the `config` and `dotenvy` crates. Configuration is loaded with the
//! `PROPERTY_CONCIERGE` prefix and nested values use double underscores as separators.
//!
//! # Example
//!
//! ```no_run
//! use property_concierge::config::AppConfig;
//!
//! let config = AppConfig::load().expect("Failed to load configuration");
//! config.validate().expect("Invalid configuration");
//!
//! println!("Serving listings from {}", config.listings.sources_dir.display());
//! ```

mod collaborators;
mod error;
mod listings;
mod pricing;
mod server;

pub use collaborators::{CollaboratorsConfig, ExplainerKind};
pub use error::{ConfigError, ValidationError};
pub use listings::ListingsConfig;
pub use pricing::PricingConfig;
pub use server::{Environment, ServerConfig};

use serde::Deserialize;

/// Root application configuration
///
/// Every section has defaults, so an empty environment yields a runnable
/// configuration. Load using [`AppConfig::load()`].
#[derive(Debug, Default, Deserialize)]
pub struct AppConfig {
    /// Server configuration (host, port, environment, logging)
    #[serde(default)]
    pub server: ServerConfig,

    /// Listing sources and result limits
    #[serde(default)]
    pub listings: ListingsConfig,

    /// Currency conversion
    #[serde(default)]
    pub pricing: PricingConfig,

    /// Optional remote classifier and explainer
    #[serde(default)]
    pub collaborators: CollaboratorsConfig,
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// This function:
    /// 1. Loads `.env` file if present (for development)
    /// 2. Reads environment variables with `PROPERTY_CONCIERGE` prefix
    /// 3. Uses `__` (double underscore) to separate nested values
    /// 4. Deserializes into typed configuration structs
    ///
    /// # Environment Variable Format
    ///
    /// - `PROPERTY_CONCIERGE__SERVER__PORT=8080` -> `server.port = 8080`
    /// - `PROPERTY_CONCIERGE__LISTINGS__SOURCES_DIR=...` -> `listings.sources_dir = ...`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if values cannot be parsed into expected types.
    pub fn load() -> Result<Self, ConfigError> {
        // Load .env file if present (development)
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .add_source(
                config::Environment::default()
                    .prefix("PROPERTY_CONCIERGE")
                    .separator("__"),
            )
            .build()?
            .try_deserialize()?;

        Ok(config)
    }

    /// Validate all configuration values
    ///
    /// # Errors
    ///
    /// Returns `ValidationError` for the first invalid section.
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.server.validate()?;
        self.listings.validate()?;
        self.pricing.validate()?;
        self.collaborators.validate()?;
        Ok(())
    }

    /// Check if running in production environment
    pub fn is_production(&self) -> bool {
        self.server.is_production()
    }
}
