//! Match engine - filters the current snapshot with a resolved query.

use std::sync::Arc;

use crate::domain::foundation::ExchangeRate;
use crate::domain::listing::CanonicalListing;

use super::predicates::matches;
use super::query::FilterQuery;
use super::repository::{ListingRepository, ListingSnapshot};

/// Evaluates filter queries against the repository's current snapshot.
///
/// Results keep source-traversal order; there is no ranking.
#[derive(Clone)]
pub struct MatchEngine {
    repository: Arc<ListingRepository>,
    rate: ExchangeRate,
}

impl MatchEngine {
    pub fn new(repository: Arc<ListingRepository>, rate: ExchangeRate) -> Self {
        Self { repository, rate }
    }

    pub fn rate(&self) -> ExchangeRate {
        self.rate
    }

    pub fn repository(&self) -> &Arc<ListingRepository> {
        &self.repository
    }

    /// At most `limit` listings matching every predicate of `query`.
    pub async fn search(&self, query: &FilterQuery, limit: usize) -> Vec<CanonicalListing> {
        let snapshot = self.repository.snapshot().await;
        search_snapshot(&snapshot, query, &self.rate, limit)
    }
}

/// Synchronous scan over one snapshot.
pub fn search_snapshot(
    snapshot: &ListingSnapshot,
    query: &FilterQuery,
    rate: &ExchangeRate,
    limit: usize,
) -> Vec<CanonicalListing> {
    snapshot
        .listings()
        .iter()
        .filter(|listing| matches(listing, query, rate))
        .take(limit)
        .cloned()
        .collect()
}
