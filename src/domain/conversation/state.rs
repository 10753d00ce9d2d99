//! Conversation state and the merge that folds each turn into it.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{positive, Money};

use super::extractor::Extraction;
use super::slots::SearchSlots;

/// Which side of a price bound an amount is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PriceDirection {
    /// Ceiling ("hasta", "máximo").
    Max,
    /// Floor ("desde", "mínimo").
    Min,
}

/// Everything known about one search conversation.
///
/// The server keeps no sessions: the client sends this back with every
/// turn and receives the updated value in the response.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ConversationState {
    #[serde(default)]
    pub filters: SearchSlots,

    /// An amount the user gave without saying whether it is a ceiling or a
    /// floor. Resolved by a later direction answer.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pending_price: Option<Money>,
}

impl ConversationState {
    pub fn new(filters: SearchSlots, pending_price: Option<Money>) -> Self {
        Self {
            filters,
            pending_price,
        }
    }

    /// Restores client-supplied state, dropping values no extraction could
    /// have produced.
    pub fn restore(filters: SearchSlots, pending_price: Option<Money>) -> Self {
        Self {
            filters: filters.sanitized(),
            pending_price: pending_price.filter(|p| positive(p.amount).is_some()),
        }
    }

    /// Folds one turn's extraction into a new state. `self` is untouched.
    ///
    /// Slot values overlay per key and never clear. For the pending price:
    /// a directed price in this turn clears it; a new undirected amount
    /// replaces it; a bare direction answer turns it into the matching
    /// bound in the pending currency.
    pub fn apply(&self, extraction: &Extraction) -> ConversationState {
        let mut filters = self.filters.merge(&extraction.slots);
        let mut pending_price = self.pending_price;

        if extraction.slots.has_price() {
            pending_price = None;
        } else if let Some(amount) = extraction.ambiguous_price {
            pending_price = Some(amount);
        } else if let (Some(direction), Some(amount)) = (extraction.direction, pending_price) {
            filters.set_price(direction, amount);
            pending_price = None;
        }

        ConversationState {
            filters,
            pending_price,
        }
    }
}
