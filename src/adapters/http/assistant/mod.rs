//! HTTP adapter for the property assistant.
//!
//! - `POST /api/assistant` - One conversational search turn
//! - `POST /api/listings/reload` - Reread every listing source
//! - `GET /api/listings/status` - Snapshot status
//! - `GET /health` - Liveness probe

mod dto;
mod handlers;
mod routes;

pub use dto::{AssistantRequest, AssistantResponse};
pub use handlers::AssistantAppState;
pub use routes::assistant_router;
