//! Remote collaborator configuration (intent classifier, result explainer)

use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use std::time::Duration;

use super::error::ValidationError;

/// Which explainer produces result summaries.
#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum ExplainerKind {
    #[default]
    Template,
    Llm,
    None,
}

/// Collaborator configuration
///
/// Both collaborators are optional: without an API key the classifier is
/// off and only the template explainer is available.
#[derive(Debug, Deserialize)]
pub struct CollaboratorsConfig {
    /// Chat-completions API key
    pub api_key: Option<SecretString>,

    #[serde(default = "default_base_url")]
    pub base_url: String,

    #[serde(default = "default_model")]
    pub model: String,

    /// Budget per collaborator call
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,

    #[serde(default)]
    pub classifier_enabled: bool,

    #[serde(default)]
    pub explainer: ExplainerKind,
}

impl CollaboratorsConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// The API key, when one is configured and non-empty.
    pub fn api_key(&self) -> Option<&str> {
        self.api_key
            .as_ref()
            .map(|k| k.expose_secret().as_str())
            .filter(|k| !k.is_empty())
    }

    pub fn needs_api_key(&self) -> bool {
        self.classifier_enabled || self.explainer == ExplainerKind::Llm
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.timeout_ms == 0 || self.timeout_ms > 30_000 {
            return Err(ValidationError::InvalidCollaboratorTimeout);
        }
        if self.needs_api_key() && self.api_key().is_none() {
            return Err(ValidationError::MissingRequired("COLLABORATORS__API_KEY"));
        }
        Ok(())
    }
}

impl Default for CollaboratorsConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: default_base_url(),
            model: default_model(),
            timeout_ms: default_timeout_ms(),
            classifier_enabled: false,
            explainer: ExplainerKind::default(),
        }
    }
}

fn default_base_url() -> String {
    "https://api.openai.com/v1".to_string()
}

fn default_model() -> String {
    "gpt-4o-mini".to_string()
}

fn default_timeout_ms() -> u64 {
    2_500
}
