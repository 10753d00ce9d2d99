//! Result Explainer Port - one-sentence summary of a search.

use async_trait::async_trait;

use super::collaborator::CollaboratorError;
use crate::domain::conversation::SearchSlots;
use crate::domain::listing::CanonicalListing;

/// What the explainer is told about a finished search.
#[derive(Debug, Clone, PartialEq)]
pub struct ExplanationRequest {
    pub utterance: String,
    pub filters: SearchSlots,
    /// Matches returned (after the limit).
    pub results: Vec<CanonicalListing>,
}

/// Port for summarizing search results in natural language.
///
/// A failing explainer never fails the turn: the summary is simply omitted.
#[async_trait]
pub trait ResultExplainer: Send + Sync {
    async fn explain(&self, request: &ExplanationRequest) -> Result<String, CollaboratorError>;

    /// Short name for logs.
    fn name(&self) -> &str;
}
