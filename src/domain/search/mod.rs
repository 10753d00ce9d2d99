//! Search module - filter queries, the listing repository and the match engine.

mod engine;
mod predicates;
mod query;
mod repository;

pub use engine::{search_snapshot, MatchEngine};
pub use predicates::{
    matches, matches_amenities, matches_location, matches_operation, matches_price,
};
pub use query::FilterQuery;
pub use repository::{ListingRepository, ListingSnapshot, SourceFailure, SourceReport};
