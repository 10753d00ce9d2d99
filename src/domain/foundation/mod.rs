//! Foundation module - Shared domain primitives.
//!
//! Contains the money vocabulary (currencies, amounts, exchange rate) and the
//! text folding every matcher in the domain relies on.

mod money;
mod number;
mod text;

pub use money::{Currency, ExchangeRate, ExchangeRateError, Money};
pub use number::parse_grouped_number;
pub use text::{finite, normalize_key, normalize_text, positive};
