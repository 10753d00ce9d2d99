//! LLM Intent Classifier - IntentClassifier over a chat-completions service.

use async_trait::async_trait;
use serde_json::json;

use super::chat_client::{extract_json, ChatCompletionClient};
use crate::domain::conversation::ClassifiedIntent;
use crate::ports::{ClassificationRequest, CollaboratorError, IntentClassifier};

const SYSTEM_PROMPT: &str = r#"Eres un asesor inmobiliario que interpreta búsquedas de propiedades en Chile.
Responde SIEMPRE con un único objeto JSON, sin texto adicional:
{
  "action": "search" | "ask",
  "filters": {
    "operacion": "venta" | "arriendo" | null,
    "comuna": string | null,
    "precio_max": number | null,
    "precio_min": number | null,
    "moneda": "CLP" | "UF" | null,
    "amenities": [string]
  },
  "assumptions": [string],
  "missing_fields": [string],
  "confidence": number
}
Reglas:
- Si el mensaje no menciona la operación, no la inventes.
- "2 MM" o "2 millones" son 2000000 CLP.
- Si no queda claro si un monto es máximo o mínimo, no lo incluyas y anótalo en assumptions.
- Los filtros previos se entregan como contexto; solo informa lo que el mensaje nuevo aporta."#;

/// Classifier backed by a remote language model.
pub struct LlmIntentClassifier {
    client: ChatCompletionClient,
}

impl LlmIntentClassifier {
    pub fn new(client: ChatCompletionClient) -> Self {
        Self { client }
    }

    fn user_message(request: &ClassificationRequest) -> String {
        json!({
            "mensaje": request.utterance,
            "filtros_previos": request.prior_filters,
        })
        .to_string()
    }
}

/// Parses a model reply into a classified intent.
pub(crate) fn parse_intent(reply: &str) -> Result<ClassifiedIntent, CollaboratorError> {
    let body =
        extract_json(reply).ok_or_else(|| CollaboratorError::parse("no JSON object in reply"))?;
    serde_json::from_str(body).map_err(|e| CollaboratorError::parse(e.to_string()))
}

#[async_trait]
impl IntentClassifier for LlmIntentClassifier {
    async fn classify(
        &self,
        request: &ClassificationRequest,
    ) -> Result<ClassifiedIntent, CollaboratorError> {
        let reply = self
            .client
            .complete(SYSTEM_PROMPT, &Self::user_message(request))
            .await?;
        let intent = parse_intent(&reply)?;
        tracing::debug!(
            model = self.client.model(),
            action = intent.action.as_deref().unwrap_or("-"),
            confidence = intent.confidence.unwrap_or_default(),
            "intent classified"
        );
        Ok(intent)
    }

    fn name(&self) -> &str {
        "llm"
    }
}
