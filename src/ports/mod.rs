//! Ports - Interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the domain and the outside world. Adapters implement these ports.
//!
//! ## Listing Ports
//!
//! - `ListingSource` - Enumerates and reads already-structured listing sources
//!
//! ## Collaborator Ports
//!
//! - `IntentClassifier` - Optional remote classification of user messages
//! - `ResultExplainer` - Summary sentence for a finished search
//!
//! Collaborators are optional and never authoritative; both share
//! `CollaboratorError`.

mod collaborator;
mod intent_classifier;
mod listing_source;
mod result_explainer;

pub use collaborator::CollaboratorError;
pub use intent_classifier::{ClassificationRequest, IntentClassifier};
pub use listing_source::{ListingSource, SourceBatch, SourceLoad, SourceReadError};
pub use result_explainer::{ExplanationRequest, ResultExplainer};
