//! HTTP handlers for assistant and listing endpoints.

use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

use crate::application::{
    AssistantError, AssistantTurnCommand, AssistantTurnHandler, GetListingStatusHandler,
    GetListingStatusQuery, ReloadListingsCommand, ReloadListingsHandler,
};
use crate::domain::search::ListingRepository;

use super::dto::{AssistantRequest, AssistantResponse};

// ════════════════════════════════════════════════════════════════════════════
// Handler state
// ════════════════════════════════════════════════════════════════════════════

/// Shared state for the assistant router.
#[derive(Clone)]
pub struct AssistantAppState {
    pub turn_handler: Arc<AssistantTurnHandler>,
    pub repository: Arc<ListingRepository>,
}

impl AssistantAppState {
    pub fn new(turn_handler: Arc<AssistantTurnHandler>, repository: Arc<ListingRepository>) -> Self {
        Self {
            turn_handler,
            repository,
        }
    }

    pub fn reload_handler(&self) -> ReloadListingsHandler {
        ReloadListingsHandler::new(self.repository.clone())
    }

    pub fn status_handler(&self) -> GetListingStatusHandler {
        GetListingStatusHandler::new(self.repository.clone())
    }
}

// ════════════════════════════════════════════════════════════════════════════
// HTTP handlers
// ════════════════════════════════════════════════════════════════════════════

/// POST /api/assistant - One conversational search turn
///
/// Always answers 200 with a tagged body; faults become `{"type": "error"}`.
pub async fn assistant_turn(
    State(state): State<AssistantAppState>,
    payload: Result<Json<AssistantRequest>, JsonRejection>,
) -> Response {
    let req = match payload {
        Ok(Json(req)) => req,
        Err(rejection) => {
            tracing::warn!(error = %rejection, "rejected assistant request body");
            return reply(AssistantResponse::error(format!(
                "Solicitud inválida: {}",
                rejection.body_text()
            )));
        }
    };

    let cmd = AssistantTurnCommand {
        message: req.message,
        context: req.context.unwrap_or_default(),
        limit: req.limit,
    };

    let handler = state.turn_handler.clone();
    let outcome = tokio::spawn(async move { handler.handle(cmd).await })
        .await
        .unwrap_or_else(|e| Err(AssistantError::Internal(e.to_string())));

    match outcome {
        Ok(result) => reply(result.into()),
        Err(e) => handle_assistant_error(e),
    }
}

/// POST /api/listings/reload - Reread every listing source
pub async fn reload_listings(State(state): State<AssistantAppState>) -> Response {
    let status = state.reload_handler().handle(ReloadListingsCommand).await;
    (StatusCode::OK, Json(status)).into_response()
}

/// GET /api/listings/status - Describe the snapshot being served
pub async fn listing_status(State(state): State<AssistantAppState>) -> Response {
    let status = state.status_handler().handle(GetListingStatusQuery).await;
    (StatusCode::OK, Json(status)).into_response()
}

/// GET /health - Liveness probe
pub async fn health() -> &'static str {
    "ok"
}

fn reply(body: AssistantResponse) -> Response {
    (StatusCode::OK, Json(body)).into_response()
}

// ════════════════════════════════════════════════════════════════════════════
// Error handling
// ════════════════════════════════════════════════════════════════════════════

fn handle_assistant_error(error: AssistantError) -> Response {
    match &error {
        AssistantError::MessageTooLong { .. } => {
            tracing::warn!(%error, "assistant turn rejected");
            reply(AssistantResponse::error(format!(
                "El mensaje es demasiado largo. {error}"
            )))
        }
        AssistantError::Internal(_) => {
            tracing::error!(%error, "assistant turn failed");
            reply(AssistantResponse::error(
                "Ocurrió un error inesperado. Intenta nuevamente.",
            ))
        }
    }
}
