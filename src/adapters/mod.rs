//! Adapters - Implementations of port interfaces.
//!
//! Adapters connect the domain to external systems:
//! - `ai` - Chat-completions intent classifier and result explainers
//! - `http` - axum REST API
//! - `listings` - JSON directory listing source

pub mod ai;
pub mod http;
pub mod listings;

pub use ai::{ChatCompletionClient, ChatCompletionConfig, LlmIntentClassifier, LlmResultExplainer, TemplateExplainer};
pub use http::{api_router, AssistantAppState};
pub use listings::JsonDirectorySource;
