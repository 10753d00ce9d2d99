//! Intent Classifier Port - optional remote source of slot values.
//!
//! The classifier reads the user's message (and the filters already known)
//! and proposes structured filters. Its answer is validated exactly like a
//! local extraction; locally extracted values win for the same key.
//!
//! # Example
//!
//! ```ignore
//! struct Fixed(ClassifiedIntent);
//!
//! #[async_trait]
//! impl IntentClassifier for Fixed {
//!     async fn classify(&self, _: &ClassificationRequest) -> Result<ClassifiedIntent, CollaboratorError> {
//!         Ok(self.0.clone())
//!     }
//!     fn name(&self) -> &str { "fixed" }
//! }
//! ```

use async_trait::async_trait;

use super::collaborator::CollaboratorError;
use crate::domain::conversation::{ClassifiedIntent, SearchSlots};

/// Input for one classification.
#[derive(Debug, Clone, PartialEq)]
pub struct ClassificationRequest {
    pub utterance: String,
    /// Filters known before this turn.
    pub prior_filters: SearchSlots,
}

impl ClassificationRequest {
    pub fn new(utterance: impl Into<String>, prior_filters: SearchSlots) -> Self {
        Self {
            utterance: utterance.into(),
            prior_filters,
        }
    }
}

/// Port for natural-language intent classification.
#[async_trait]
pub trait IntentClassifier: Send + Sync {
    async fn classify(
        &self,
        request: &ClassificationRequest,
    ) -> Result<ClassifiedIntent, CollaboratorError>;

    /// Short name for logs.
    fn name(&self) -> &str;
}
