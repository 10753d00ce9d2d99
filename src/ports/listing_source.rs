//! Listing Source Port - where already-structured listing records come from.
//!
//! Sources are produced by an out-of-process ingestion batch (spreadsheet
//! export, enrichment). The core only reads them; it never writes back.

use async_trait::async_trait;
use serde_json::{Map, Value};
use thiserror::Error;

/// Why one source could not be read. Never fatal for a reload: the source
/// is skipped and every other source still loads.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SourceReadError {
    #[error("source '{source_id}' could not be read: {message}")]
    Io { source_id: String, message: String },

    #[error("source '{source_id}' is not valid JSON: {message}")]
    Parse { source_id: String, message: String },

    #[error("source '{source_id}' must contain a JSON array of records")]
    NotAnArray { source_id: String },
}

impl SourceReadError {
    pub fn source_id(&self) -> &str {
        match self {
            SourceReadError::Io { source_id, .. }
            | SourceReadError::Parse { source_id, .. }
            | SourceReadError::NotAnArray { source_id } => source_id,
        }
    }
}

/// Records of one source, in source order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SourceBatch {
    pub source_id: String,
    /// Object records only; non-object array entries are dropped by the
    /// adapter.
    pub records: Vec<Map<String, Value>>,
}

/// Outcome of loading one source.
pub type SourceLoad = Result<SourceBatch, SourceReadError>;

/// Port for enumerating and reading listing sources.
///
/// # Contract
///
/// - One entry per discovered source, in a stable traversal order.
/// - A failing source yields an `Err` entry; it must not abort the others.
#[async_trait]
pub trait ListingSource: Send + Sync {
    /// Load every source.
    async fn load_all(&self) -> Vec<SourceLoad>;

    /// Human-readable location of the sources, for logs.
    fn describe(&self) -> String;
}
