//! AI Collaborator Adapters.
//!
//! Implementations of the IntentClassifier and ResultExplainer ports.
//!
//! ## Available Adapters
//!
//! - `LlmIntentClassifier` - OpenAI-compatible chat-completions classifier
//! - `LlmResultExplainer` - OpenAI-compatible chat-completions summary
//! - `TemplateExplainer` - Local Spanish summary, the default explainer
//! - `ChatCompletionClient` - Shared HTTP client for the LLM adapters

mod chat_client;
mod llm_explainer;
mod llm_intent_classifier;
mod template_explainer;

pub use chat_client::{extract_json, ChatCompletionClient, ChatCompletionConfig};
pub use llm_explainer::LlmResultExplainer;
pub use llm_intent_classifier::LlmIntentClassifier;
pub use template_explainer::TemplateExplainer;
