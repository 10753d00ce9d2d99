//! AssistantTurn command handler.
//!
//! One request/response turn of the property assistant: extract slots from
//! the message, merge them into the client-supplied state, then either ask
//! one clarifying question or run the search.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use thiserror::Error;
use tracing::Instrument;
use uuid::Uuid;

use crate::domain::conversation::{
    Clarification, CompletionPolicy, ConversationState, Decision, Extraction, FieldKey,
    PriceDirection, SearchSlots, SlotExtractor, REFORMULATE_PROMPT,
};
use crate::domain::listing::CanonicalListing;
use crate::domain::search::MatchEngine;
use crate::ports::{
    ClassificationRequest, CollaboratorError, ExplanationRequest, IntentClassifier,
    ResultExplainer,
};

/// Longest message accepted, in characters.
pub const MAX_MESSAGE_CHARS: usize = 2_000;

/// Command for one assistant turn.
#[derive(Debug, Clone, Default)]
pub struct AssistantTurnCommand {
    pub message: String,
    /// State returned by the previous turn, as sent back by the client.
    pub context: ConversationState,
    /// Requested result count; clamped to the configured maximum.
    pub limit: Option<usize>,
}

impl AssistantTurnCommand {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            ..Default::default()
        }
    }

    pub fn with_context(mut self, context: ConversationState) -> Self {
        self.context = context;
        self
    }

    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }
}

/// Errors a turn can fail with.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum AssistantError {
    #[error("message too long: {actual} characters exceeds maximum of {max}")]
    MessageTooLong { max: usize, actual: usize },

    #[error("internal error: {0}")]
    Internal(String),
}

/// A finished search.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchOutcome {
    pub state: ConversationState,
    pub results: Vec<CanonicalListing>,
    pub summary: Option<String>,
    /// Optional fields the user could still add.
    pub missing_fields: Vec<FieldKey>,
}

/// Outcome of a turn.
#[derive(Debug, Clone, PartialEq)]
pub enum AssistantReply {
    Clarification(Clarification),
    Results(SearchOutcome),
}

/// Result-count bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResultLimits {
    pub default: usize,
    pub max: usize,
}

impl Default for ResultLimits {
    fn default() -> Self {
        Self {
            default: 10,
            max: 50,
        }
    }
}

impl ResultLimits {
    fn resolve(&self, requested: Option<usize>) -> usize {
        requested.unwrap_or(self.default).clamp(1, self.max.max(1))
    }
}

/// Handler for assistant turns.
pub struct AssistantTurnHandler {
    extractor: SlotExtractor,
    policy: CompletionPolicy,
    engine: MatchEngine,
    classifier: Option<Arc<dyn IntentClassifier>>,
    explainer: Option<Arc<dyn ResultExplainer>>,
    collaborator_timeout: Duration,
    limits: ResultLimits,
}

impl AssistantTurnHandler {
    pub fn new(engine: MatchEngine) -> Self {
        Self {
            extractor: SlotExtractor::new(),
            policy: CompletionPolicy::default(),
            engine,
            classifier: None,
            explainer: None,
            collaborator_timeout: Duration::from_millis(2_500),
            limits: ResultLimits::default(),
        }
    }

    pub fn with_classifier(mut self, classifier: Arc<dyn IntentClassifier>) -> Self {
        self.classifier = Some(classifier);
        self
    }

    pub fn with_explainer(mut self, explainer: Arc<dyn ResultExplainer>) -> Self {
        self.explainer = Some(explainer);
        self
    }

    pub fn with_collaborator_timeout(mut self, timeout: Duration) -> Self {
        self.collaborator_timeout = timeout;
        self
    }

    pub fn with_limits(mut self, limits: ResultLimits) -> Self {
        self.limits = limits;
        self
    }

    pub fn with_policy(mut self, policy: CompletionPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Runs one turn.
    pub async fn handle(&self, cmd: AssistantTurnCommand) -> Result<AssistantReply, AssistantError> {
        let chars = cmd.message.chars().count();
        if chars > MAX_MESSAGE_CHARS {
            return Err(AssistantError::MessageTooLong {
                max: MAX_MESSAGE_CHARS,
                actual: chars,
            });
        }

        let span = tracing::info_span!("assistant_turn", turn_id = %Uuid::new_v4());
        self.run(cmd).instrument(span).await
    }

    async fn run(&self, cmd: AssistantTurnCommand) -> Result<AssistantReply, AssistantError> {
        let prior = ConversationState::restore(cmd.context.filters, cmd.context.pending_price);

        let local = self.extractor.extract(&cmd.message);
        let (remote, classifier_failed) = self.classify(&cmd.message, &prior.filters).await;

        let extraction = combine(local.clone(), remote);
        let state = prior.apply(&extraction);

        match self.policy.decide(&state) {
            Decision::Ask(clarification) => {
                tracing::info!(ask_for = %clarification.ask_for, "asking for clarification");
                if classifier_failed && local.is_empty() {
                    Ok(AssistantReply::Clarification(
                        clarification.with_prompt(REFORMULATE_PROMPT),
                    ))
                } else {
                    Ok(AssistantReply::Clarification(clarification))
                }
            }
            Decision::Search {
                query,
                missing_fields,
            } => {
                let limit = self.limits.resolve(cmd.limit);
                let results = self.engine.search(&query, limit).await;
                tracing::info!(results = results.len(), limit, "search executed");

                let summary = self.explain(&cmd.message, &state.filters, &results).await;
                Ok(AssistantReply::Results(SearchOutcome {
                    state,
                    results,
                    summary,
                    missing_fields,
                }))
            }
        }
    }

    /// Classifier slots, and whether a configured classifier failed.
    async fn classify(&self, message: &str, prior: &SearchSlots) -> (SearchSlots, bool) {
        let Some(classifier) = &self.classifier else {
            return (SearchSlots::new(), false);
        };
        if message.trim().is_empty() {
            return (SearchSlots::new(), false);
        }

        let request = ClassificationRequest::new(message, prior.clone());
        match within(self.collaborator_timeout, classifier.classify(&request)).await {
            Ok(intent) => (intent.validated(self.extractor.gazetteer()), false),
            Err(error) => {
                tracing::warn!(classifier = classifier.name(), %error, "intent classification failed");
                (SearchSlots::new(), true)
            }
        }
    }

    async fn explain(
        &self,
        message: &str,
        filters: &SearchSlots,
        results: &[CanonicalListing],
    ) -> Option<String> {
        let explainer = self.explainer.as_ref()?;
        let request = ExplanationRequest {
            utterance: message.to_string(),
            filters: filters.clone(),
            results: results.to_vec(),
        };
        match within(self.collaborator_timeout, explainer.explain(&request)).await {
            Ok(summary) => Some(summary),
            Err(error) => {
                tracing::warn!(explainer = explainer.name(), %error, "summary omitted");
                None
            }
        }
    }
}

/// Local values override classifier values for the same key. Classifier
/// prices are dropped when the message itself left a direction open, and
/// per direction when the message already bounded it.
fn combine(local: Extraction, mut remote: SearchSlots) -> Extraction {
    let undecided = local.ambiguous_price.is_some() || local.direction.is_some();
    // A local bound owns its direction in both currencies.
    if undecided || local.slots.has_bound(PriceDirection::Max) {
        remote.price_max_uf = None;
        remote.price_max_clp = None;
    }
    if undecided || local.slots.has_bound(PriceDirection::Min) {
        remote.price_min_uf = None;
        remote.price_min_clp = None;
    }
    Extraction {
        slots: remote.merge(&local.slots),
        ..local
    }
}

async fn within<T>(
    budget: Duration,
    call: impl Future<Output = Result<T, CollaboratorError>>,
) -> Result<T, CollaboratorError> {
    tokio::time::timeout(budget, call)
        .await
        .unwrap_or(Err(CollaboratorError::Timeout {
            timeout_ms: budget.as_millis() as u64,
        }))
}
