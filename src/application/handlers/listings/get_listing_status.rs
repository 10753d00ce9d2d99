//! GetListingStatusHandler - Query handler for the snapshot being served.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::domain::search::{ListingRepository, ListingSnapshot, SourceFailure, SourceReport};

/// Query for the current snapshot status.
#[derive(Debug, Clone, Default)]
pub struct GetListingStatusQuery;

/// What the repository currently serves.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ListingStatus {
    pub listing_count: usize,
    pub sources: Vec<SourceReport>,
    pub failed_sources: Vec<SourceFailure>,
    pub loaded_at: DateTime<Utc>,
}

impl ListingStatus {
    pub fn from_snapshot(snapshot: &ListingSnapshot) -> Self {
        Self {
            listing_count: snapshot.len(),
            sources: snapshot.sources().to_vec(),
            failed_sources: snapshot.failures().to_vec(),
            loaded_at: snapshot.loaded_at(),
        }
    }
}

pub struct GetListingStatusHandler {
    repository: Arc<ListingRepository>,
}

impl GetListingStatusHandler {
    pub fn new(repository: Arc<ListingRepository>) -> Self {
        Self { repository }
    }

    pub async fn handle(&self, _query: GetListingStatusQuery) -> ListingStatus {
        let snapshot = self.repository.snapshot().await;
        ListingStatus::from_snapshot(&snapshot)
    }
}
