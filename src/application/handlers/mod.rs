//! Application handlers.
//!
//! Command and query handlers that orchestrate domain operations.

pub mod assistant;
pub mod listings;

pub use assistant::{
    AssistantError, AssistantReply, AssistantTurnCommand, AssistantTurnHandler, ResultLimits,
    SearchOutcome, MAX_MESSAGE_CHARS,
};
pub use listings::{
    GetListingStatusHandler, GetListingStatusQuery, ListingStatus, ReloadListingsCommand,
    ReloadListingsHandler, ReloadListingsResult,
};
