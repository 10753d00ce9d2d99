//! LLM Result Explainer - ResultExplainer over a chat-completions service.

use async_trait::async_trait;
use serde_json::json;

use super::chat_client::ChatCompletionClient;
use crate::ports::{CollaboratorError, ExplanationRequest, ResultExplainer};

const SYSTEM_PROMPT: &str = "Eres un asesor inmobiliario. Resume en una o dos frases, en español \
neutro y sin inventar datos, los resultados de búsqueda que recibes en JSON. \
No uses listas ni markdown.";

/// Listings described to the model; the rest are only counted.
const MAX_DESCRIBED: usize = 5;

pub struct LlmResultExplainer {
    client: ChatCompletionClient,
}

impl LlmResultExplainer {
    pub fn new(client: ChatCompletionClient) -> Self {
        Self { client }
    }

    fn user_message(request: &ExplanationRequest) -> String {
        let described: Vec<_> = request
            .results
            .iter()
            .take(MAX_DESCRIBED)
            .map(|listing| {
                json!({
                    "comuna": listing.location.locality,
                    "operacion": listing.operation,
                    "precios": listing.prices,
                    "dormitorios": listing.attributes.bedrooms,
                    "banos": listing.attributes.bathrooms,
                })
            })
            .collect();

        json!({
            "consulta": request.utterance,
            "filtros": request.filters,
            "total": request.results.len(),
            "propiedades": described,
        })
        .to_string()
    }
}

#[async_trait]
impl ResultExplainer for LlmResultExplainer {
    async fn explain(&self, request: &ExplanationRequest) -> Result<String, CollaboratorError> {
        let reply = self
            .client
            .complete(SYSTEM_PROMPT, &Self::user_message(request))
            .await?;
        Ok(reply.trim().to_string())
    }

    fn name(&self) -> &str {
        "llm"
    }
}
