//! Route configuration for assistant and listing endpoints.

use axum::routing::{get, post};
use axum::Router;

use super::handlers::{
    assistant_turn, health, listing_status, reload_listings, AssistantAppState,
};

/// Creates the assistant router with all endpoints.
///
/// Routes:
/// - `POST /api/assistant` - One conversational search turn
/// - `POST /api/listings/reload` - Reread every listing source
/// - `GET /api/listings/status` - Snapshot status
/// - `GET /health` - Liveness probe
pub fn assistant_router() -> Router<AssistantAppState> {
    Router::new()
        .route("/api/assistant", post(assistant_turn))
        .route("/api/listings/reload", post(reload_listings))
        .route("/api/listings/status", get(listing_status))
        .route("/health", get(health))
}
