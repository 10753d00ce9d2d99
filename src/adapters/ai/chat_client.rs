//! Minimal client for OpenAI-compatible chat-completions endpoints.
//!
//! Shared by the LLM intent classifier and the LLM explainer. One request,
//! no retries: callers run under a short turn budget and degrade on error.

use reqwest::{Client, StatusCode};
use secrecy::{ExposeSecret, Secret};
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::ports::CollaboratorError;

/// Connection settings for a chat-completions service.
#[derive(Debug)]
pub struct ChatCompletionConfig {
    api_key: Secret<String>,
    pub model: String,
    pub base_url: String,
    pub timeout: Duration,
    pub temperature: f32,
}

impl ChatCompletionConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: Secret::new(api_key.into()),
            model: "gpt-4o-mini".to_string(),
            base_url: "https://api.openai.com/v1".to_string(),
            timeout: Duration::from_millis(2500),
            temperature: 0.0,
        }
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    fn api_key(&self) -> &str {
        self.api_key.expose_secret()
    }
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: [ChatMessage<'a>; 2],
    temperature: f32,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatReply,
}

#[derive(Debug, Deserialize)]
struct ChatReply {
    #[serde(default)]
    content: Option<String>,
}

/// Sends one system + user exchange and returns the reply text.
pub struct ChatCompletionClient {
    config: ChatCompletionConfig,
    client: Client,
}

impl ChatCompletionClient {
    pub fn new(config: ChatCompletionConfig) -> Result<Self, CollaboratorError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| CollaboratorError::Unavailable(format!("http client: {e}")))?;
        Ok(Self { config, client })
    }

    pub fn model(&self) -> &str {
        &self.config.model
    }

    fn completions_url(&self) -> String {
        format!("{}/chat/completions", self.config.base_url.trim_end_matches('/'))
    }

    pub async fn complete(&self, system: &str, user: &str) -> Result<String, CollaboratorError> {
        let body = ChatRequest {
            model: &self.config.model,
            messages: [
                ChatMessage {
                    role: "system",
                    content: system,
                },
                ChatMessage {
                    role: "user",
                    content: user,
                },
            ],
            temperature: self.config.temperature,
        };

        let response = self
            .client
            .post(self.completions_url())
            .bearer_auth(self.config.api_key())
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    CollaboratorError::Timeout {
                        timeout_ms: self.config.timeout.as_millis() as u64,
                    }
                } else if e.is_connect() {
                    CollaboratorError::network(format!("connection failed: {e}"))
                } else {
                    CollaboratorError::network(e.to_string())
                }
            })?;

        if let Some(error) = status_error(response.status()) {
            return Err(error);
        }

        let parsed: ChatResponse = response
            .json()
            .await
            .map_err(|e| CollaboratorError::parse(format!("chat response: {e}")))?;

        parsed
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .filter(|content| !content.trim().is_empty())
            .ok_or_else(|| CollaboratorError::parse("empty chat response"))
    }
}

fn status_error(status: StatusCode) -> Option<CollaboratorError> {
    (!status.is_success()).then(|| CollaboratorError::Status {
        status: status.as_u16(),
    })
}

/// Locates the JSON object in a model reply: inside a ```json fence if
/// there is one, else the first balanced `{...}`.
pub fn extract_json(reply: &str) -> Option<&str> {
    let trimmed = reply.trim();

    for fence in ["```json", "```JSON", "```"] {
        if let Some(start) = trimmed.find(fence) {
            let body = &trimmed[start + fence.len()..];
            if let Some(end) = body.find("```") {
                let inner = body[..end].trim();
                if inner.starts_with('{') {
                    return Some(inner);
                }
            }
        }
    }

    let start = trimmed.find('{')?;
    balanced_object(&trimmed[start..])
}

fn balanced_object(s: &str) -> Option<&str> {
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escape_next = false;

    for (i, c) in s.char_indices() {
        if escape_next {
            escape_next = false;
            continue;
        }
        match c {
            '\\' if in_string => escape_next = true,
            '"' => in_string = !in_string,
            _ if in_string => {}
            '{' => depth += 1,
            '}' => {
                depth = depth.checked_sub(1)?;
                if depth == 0 {
                    return Some(&s[..=i]);
                }
            }
            _ => {}
        }
    }
    None
}
