//! ReloadListingsHandler - Command handler for rebuilding the listing snapshot.

use std::sync::Arc;

use crate::domain::search::ListingRepository;

use super::get_listing_status::ListingStatus;

/// Command to reread every listing source.
#[derive(Debug, Clone, Default)]
pub struct ReloadListingsCommand;

/// Result of a reload: the status of the snapshot now being served.
pub type ReloadListingsResult = ListingStatus;

/// Handler for listing reloads.
///
/// A reload never fails as a whole: unreadable sources are reported in the
/// result and the rest are still served.
pub struct ReloadListingsHandler {
    repository: Arc<ListingRepository>,
}

impl ReloadListingsHandler {
    pub fn new(repository: Arc<ListingRepository>) -> Self {
        Self { repository }
    }

    pub async fn handle(&self, _cmd: ReloadListingsCommand) -> ReloadListingsResult {
        let snapshot = self.repository.reload().await;
        ListingStatus::from_snapshot(&snapshot)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::{ListingSource, SourceBatch, SourceLoad, SourceReadError};
    use async_trait::async_trait;
    use serde_json::json;

    // ─────────────────────────────────────────────────────────────────────
    // Mock Implementation
    // ─────────────────────────────────────────────────────────────────────

    struct TwoSources;

    #[async_trait]
    impl ListingSource for TwoSources {
        async fn load_all(&self) -> Vec<SourceLoad> {
            let record = json!({"codigo": "7", "operacion": "venta", "comuna": "Ñuñoa"});
            vec![
                Ok(SourceBatch {
                    source_id: "a".into(),
                    records: vec![record.as_object().cloned().unwrap_or_default()],
                }),
                Err(SourceReadError::NotAnArray {
                    source_id: "b".into(),
                }),
            ]
        }

        fn describe(&self) -> String {
            "two".into()
        }
    }

    #[tokio::test]
    async fn reload_reports_loaded_and_failed_sources() {
        let repository = Arc::new(ListingRepository::new(Arc::new(TwoSources)));
        let handler = ReloadListingsHandler::new(repository.clone());

        let status = handler.handle(ReloadListingsCommand).await;

        assert_eq!(status.listing_count, 1);
        assert_eq!(status.sources.len(), 1);
        assert_eq!(status.failed_sources.len(), 1);
        assert_eq!(status.failed_sources[0].source_id, "b");
        assert_eq!(repository.snapshot().await.len(), 1);
    }
}
