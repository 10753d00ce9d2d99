//! Listing repository - the current immutable snapshot of every source.
//!
//! Readers clone the snapshot `Arc` and scan without holding the lock.
//! `reload()` builds a complete replacement off to the side and swaps it in
//! with a single write, so a search never observes a half-loaded set.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::sync::Arc;
use tokio::sync::{Mutex, RwLock};

use crate::domain::listing::{ingest, CanonicalListing, RawListing};
use crate::ports::{ListingSource, SourceBatch};

/// Per-source outcome of the last load.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SourceReport {
    pub source_id: String,
    /// Records that became searchable listings.
    pub listings: usize,
    /// Records rejected by the publication gate or missing an identity.
    pub skipped: usize,
}

/// A source that could not be read at all.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SourceFailure {
    pub source_id: String,
    pub reason: String,
}

/// Everything searchable at one point in time.
#[derive(Debug, Clone, Serialize)]
pub struct ListingSnapshot {
    #[serde(skip)]
    listings: Vec<CanonicalListing>,
    sources: Vec<SourceReport>,
    failures: Vec<SourceFailure>,
    loaded_at: DateTime<Utc>,
}

impl ListingSnapshot {
    /// A snapshot with no sources, used before the first load.
    pub fn empty() -> Self {
        Self {
            listings: Vec::new(),
            sources: Vec::new(),
            failures: Vec::new(),
            loaded_at: Utc::now(),
        }
    }

    /// Snapshot over already-canonical listings, without source reports.
    pub fn from_listings(listings: Vec<CanonicalListing>) -> Self {
        Self {
            listings,
            ..Self::empty()
        }
    }

    /// Listings in source-traversal order.
    pub fn listings(&self) -> &[CanonicalListing] {
        &self.listings
    }

    pub fn sources(&self) -> &[SourceReport] {
        &self.sources
    }

    pub fn failures(&self) -> &[SourceFailure] {
        &self.failures
    }

    pub fn loaded_at(&self) -> DateTime<Utc> {
        self.loaded_at
    }

    pub fn len(&self) -> usize {
        self.listings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.listings.is_empty()
    }

    fn push_batch(&mut self, batch: &SourceBatch) {
        let mut report = SourceReport {
            source_id: batch.source_id.clone(),
            listings: 0,
            skipped: 0,
        };
        for record in &batch.records {
            let raw = RawListing::from_json(record);
            match ingest(&batch.source_id, &raw) {
                Ok(listing) => {
                    self.listings.push(listing);
                    report.listings += 1;
                }
                Err(rejection) => {
                    tracing::trace!(source_id = %batch.source_id, %rejection, "record skipped");
                    report.skipped += 1;
                }
            }
        }
        self.sources.push(report);
    }
}

/// Holds the current snapshot and rebuilds it from a [`ListingSource`].
pub struct ListingRepository {
    source: Arc<dyn ListingSource>,
    snapshot: RwLock<Arc<ListingSnapshot>>,
    reload_guard: Mutex<()>,
}

impl ListingRepository {
    /// Creates a repository with an empty snapshot. Call [`reload`] before
    /// serving searches.
    ///
    /// [`reload`]: ListingRepository::reload
    pub fn new(source: Arc<dyn ListingSource>) -> Self {
        Self::with_snapshot(source, ListingSnapshot::empty())
    }

    pub fn with_snapshot(source: Arc<dyn ListingSource>, snapshot: ListingSnapshot) -> Self {
        Self {
            source,
            snapshot: RwLock::new(Arc::new(snapshot)),
            reload_guard: Mutex::new(()),
        }
    }

    /// The current snapshot. Cheap: clones an `Arc`.
    pub async fn snapshot(&self) -> Arc<ListingSnapshot> {
        Arc::clone(&*self.snapshot.read().await)
    }

    /// Reads every source, rebuilds the snapshot and swaps it in.
    ///
    /// Unreadable sources are skipped and listed in the snapshot's failures.
    /// Concurrent reloads are serialized; searches keep reading the previous
    /// snapshot until the swap.
    pub async fn reload(&self) -> Arc<ListingSnapshot> {
        let _guard = self.reload_guard.lock().await;

        let mut next = ListingSnapshot::empty();
        for load in self.source.load_all().await {
            match load {
                Ok(batch) => next.push_batch(&batch),
                Err(error) => {
                    tracing::warn!(source_id = error.source_id(), %error, "skipping listing source");
                    next.failures.push(SourceFailure {
                        source_id: error.source_id().to_string(),
                        reason: error.to_string(),
                    });
                }
            }
        }
        next.loaded_at = Utc::now();

        tracing::info!(
            origin = %self.source.describe(),
            listings = next.len(),
            sources = next.sources.len(),
            failed_sources = next.failures.len(),
            "listing snapshot reloaded"
        );

        let next = Arc::new(next);
        *self.snapshot.write().await = Arc::clone(&next);
        next
    }
}
