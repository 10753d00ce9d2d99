//! Exchange rate configuration

use serde::Deserialize;

use crate::domain::foundation::ExchangeRate;

use super::error::ValidationError;

/// Pesos per UF, fixed for the life of the process.
#[derive(Debug, Clone, Deserialize)]
pub struct PricingConfig {
    #[serde(default = "default_clp_per_uf")]
    pub clp_per_uf: f64,
}

impl PricingConfig {
    pub fn exchange_rate(&self) -> Result<ExchangeRate, ValidationError> {
        ExchangeRate::new(self.clp_per_uf).map_err(|_| ValidationError::InvalidExchangeRate)
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        self.exchange_rate().map(|_| ())
    }
}

impl Default for PricingConfig {
    fn default() -> Self {
        Self {
            clp_per_uf: default_clp_per_uf(),
        }
    }
}

fn default_clp_per_uf() -> f64 {
    38_000.0
}
