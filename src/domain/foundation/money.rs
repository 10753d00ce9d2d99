//! Currencies, amounts and the fixed CLP/UF exchange rate.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

use super::text::normalize_text;

/// The two monetary units listings are priced in.
///
/// CLP is the everyday local currency; UF is the inflation-indexed unit of
/// account used for large transactions. The set is closed: an amount tagged
/// with anything else cannot be compared and is treated as absent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Currency {
    #[serde(rename = "CLP", alias = "clp")]
    Clp,
    #[serde(rename = "UF", alias = "uf")]
    Uf,
}

impl Currency {
    /// Parses a source or collaborator currency tag.
    ///
    /// Accepts "UF", "CLP", "$", "pesos" and a few spellings of those.
    pub fn from_tag(tag: &str) -> Option<Self> {
        match normalize_text(tag).trim_end_matches('.') {
            "uf" | "u.f" | "unidad de fomento" => Some(Currency::Uf),
            "clp" | "$" | "peso" | "pesos" | "clp$" | "$clp" => Some(Currency::Clp),
            _ => None,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            Currency::Clp => "CLP",
            Currency::Uf => "UF",
        }
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// An amount tagged with its currency.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Money {
    pub amount: f64,
    pub currency: Currency,
}

impl Money {
    pub fn new(amount: f64, currency: Currency) -> Self {
        Self { amount, currency }
    }

    pub fn clp(amount: f64) -> Self {
        Self::new(amount, Currency::Clp)
    }

    pub fn uf(amount: f64) -> Self {
        Self::new(amount, Currency::Uf)
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.currency {
            Currency::Clp => write!(f, "${}", self.amount),
            Currency::Uf => write!(f, "{} UF", self.amount),
        }
    }
}

/// Errors constructing an exchange rate.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum ExchangeRateError {
    #[error("exchange rate must be a positive finite number, got {0}")]
    NotPositive(f64),
}

/// Process-wide CLP-per-UF conversion constant.
///
/// Loaded once from configuration at startup and shared read-only.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExchangeRate {
    clp_per_uf: f64,
}

impl ExchangeRate {
    pub fn new(clp_per_uf: f64) -> Result<Self, ExchangeRateError> {
        if !clp_per_uf.is_finite() || clp_per_uf <= 0.0 {
            return Err(ExchangeRateError::NotPositive(clp_per_uf));
        }
        Ok(Self { clp_per_uf })
    }

    pub fn clp_per_uf(&self) -> f64 {
        self.clp_per_uf
    }

    /// Converts an amount into `target`. Same-currency conversion is the
    /// identity, so no rounding is introduced for native comparisons.
    pub fn convert(&self, money: Money, target: Currency) -> f64 {
        match (money.currency, target) {
            (Currency::Uf, Currency::Clp) => money.amount * self.clp_per_uf,
            (Currency::Clp, Currency::Uf) => money.amount / self.clp_per_uf,
            _ => money.amount,
        }
    }
}
