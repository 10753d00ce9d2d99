//! HTTP DTOs for assistant and listing endpoints.
//!
//! Non-finite floats leave as `null`: serde_json writes NaN and infinities
//! that way, and every response here goes through it.

use serde::{Deserialize, Serialize};

use crate::application::{AssistantReply, SearchOutcome};
use crate::domain::conversation::{AskFor, Clarification, ConversationState, FieldKey, SearchSlots};
use crate::domain::foundation::Money;
use crate::domain::listing::CanonicalListing;

// ════════════════════════════════════════════════════════════════════════════
// Request DTOs
// ════════════════════════════════════════════════════════════════════════════

/// Body of `POST /api/assistant`.
#[derive(Debug, Clone, Deserialize)]
pub struct AssistantRequest {
    pub message: String,

    /// State returned by the previous turn. Absent on the first turn.
    #[serde(default)]
    pub context: Option<ConversationState>,

    #[serde(default)]
    pub limit: Option<usize>,
}

// ════════════════════════════════════════════════════════════════════════════
// Response DTOs
// ════════════════════════════════════════════════════════════════════════════

/// Body of every `POST /api/assistant` response, tagged by `type`.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum AssistantResponse {
    Clarification {
        prompt: String,
        missing_field: AskFor,
        filters: SearchSlots,
        #[serde(skip_serializing_if = "Option::is_none")]
        pending_price: Option<Money>,
    },
    Results {
        filters: SearchSlots,
        count: usize,
        results: Vec<CanonicalListing>,
        #[serde(skip_serializing_if = "Option::is_none")]
        summary: Option<String>,
        #[serde(skip_serializing_if = "Vec::is_empty")]
        missing_fields: Vec<FieldKey>,
    },
    Error {
        message: String,
    },
}

impl AssistantResponse {
    pub fn error(message: impl Into<String>) -> Self {
        Self::Error {
            message: message.into(),
        }
    }
}

impl From<Clarification> for AssistantResponse {
    fn from(clarification: Clarification) -> Self {
        Self::Clarification {
            prompt: clarification.prompt,
            missing_field: clarification.ask_for,
            filters: clarification.state.filters,
            pending_price: clarification.state.pending_price,
        }
    }
}

impl From<SearchOutcome> for AssistantResponse {
    fn from(outcome: SearchOutcome) -> Self {
        Self::Results {
            filters: outcome.state.filters,
            count: outcome.results.len(),
            results: outcome.results,
            summary: outcome.summary,
            missing_fields: outcome.missing_fields,
        }
    }
}

impl From<AssistantReply> for AssistantResponse {
    fn from(reply: AssistantReply) -> Self {
        match reply {
            AssistantReply::Clarification(c) => c.into(),
            AssistantReply::Results(r) => r.into(),
        }
    }
}
