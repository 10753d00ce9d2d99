//! Domain layer containing business logic and domain types.
//!
//! # Module Organization
//!
//! - `foundation` - Shared primitives (currencies, exchange rate, text folding)
//! - `listing` - Source records, field aliasing, price normalization, canonical listings
//! - `search` - Filter queries and the match engine
//! - `conversation` - Slot extraction, dialogue state and the completion policy

pub mod conversation;
pub mod foundation;
pub mod listing;
pub mod search;
