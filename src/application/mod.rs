//! Application layer - Commands, Queries, and Handlers.
//!
//! This layer orchestrates domain operations and coordinates between ports.
//! Commands (assistant turn, reload) are separated from queries (status).

pub mod handlers;

pub use handlers::{
    // Assistant
    AssistantError, AssistantReply, AssistantTurnCommand, AssistantTurnHandler, ResultLimits,
    SearchOutcome, MAX_MESSAGE_CHARS,
    // Listings
    GetListingStatusHandler, GetListingStatusQuery, ListingStatus, ReloadListingsCommand,
    ReloadListingsHandler, ReloadListingsResult,
};
