//! JSON directory listing source.
//!
//! Every `*.json` file of one directory is a source; its file stem is the
//! source id. A file holds a JSON array of listing records. Files written by
//! Python exporters may contain bare `NaN` / `Infinity` tokens, which are
//! read as `null`.

use async_trait::async_trait;
use futures::future::join_all;
use serde_json::{Map, Value};
use std::borrow::Cow;
use std::path::{Path, PathBuf};
use tokio::fs;

use crate::ports::{ListingSource, SourceBatch, SourceLoad, SourceReadError};

/// Reads listing sources from a directory of JSON files.
pub struct JsonDirectorySource {
    dir: PathBuf,
}

impl JsonDirectorySource {
    pub fn new(dir: impl AsRef<Path>) -> Self {
        Self {
            dir: dir.as_ref().to_path_buf(),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// `*.json` files, sorted by file name.
    async fn source_files(&self) -> Result<Vec<PathBuf>, SourceReadError> {
        let io_error = |e: std::io::Error| SourceReadError::Io {
            source_id: self.dir.display().to_string(),
            message: e.to_string(),
        };

        let mut entries = fs::read_dir(&self.dir).await.map_err(io_error)?;
        let mut files = Vec::new();
        while let Some(entry) = entries.next_entry().await.map_err(io_error)? {
            let path = entry.path();
            let is_json = path
                .extension()
                .and_then(|ext| ext.to_str())
                .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
            if is_json && path.is_file() {
                files.push(path);
            }
        }
        files.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
        Ok(files)
    }
}

#[async_trait]
impl ListingSource for JsonDirectorySource {
    async fn load_all(&self) -> Vec<SourceLoad> {
        let files = match self.source_files().await {
            Ok(files) => files,
            Err(error) => return vec![Err(error)],
        };
        if files.is_empty() {
            tracing::warn!(dir = %self.dir.display(), "no listing sources found");
        }
        join_all(files.iter().map(|path| load_file(path))).await
    }

    fn describe(&self) -> String {
        self.dir.display().to_string()
    }
}

async fn load_file(path: &Path) -> SourceLoad {
    let source_id = path
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_default();

    let text = fs::read_to_string(path)
        .await
        .map_err(|e| SourceReadError::Io {
            source_id: source_id.clone(),
            message: e.to_string(),
        })?;

    parse_source(source_id, &text)
}

/// Parses one source document into its object records.
pub fn parse_source(source_id: String, text: &str) -> SourceLoad {
    let value: Value =
        serde_json::from_str(&null_non_finite(text)).map_err(|e| SourceReadError::Parse {
            source_id: source_id.clone(),
            message: e.to_string(),
        })?;

    let Value::Array(items) = value else {
        return Err(SourceReadError::NotAnArray { source_id });
    };

    let total = items.len();
    let records: Vec<Map<String, Value>> = items
        .into_iter()
        .filter_map(|item| match item {
            Value::Object(record) => Some(record),
            _ => None,
        })
        .collect();
    if records.len() < total {
        tracing::debug!(
            source_id = %source_id,
            dropped = total - records.len(),
            "non-object entries dropped"
        );
    }

    Ok(SourceBatch { source_id, records })
}

/// Replaces bare `NaN`, `Infinity` and `-Infinity` tokens outside string
/// literals with `null`.
fn null_non_finite(text: &str) -> Cow<'_, str> {
    const TOKENS: [&str; 3] = ["-Infinity", "Infinity", "NaN"];

    if !TOKENS.iter().any(|t| text.contains(t)) {
        return Cow::Borrowed(text);
    }

    let mut out = String::with_capacity(text.len());
    let mut in_string = false;
    let mut escape_next = false;
    let mut rest = text;

    while let Some(c) = rest.chars().next() {
        if in_string {
            if escape_next {
                escape_next = false;
            } else if c == '\\' {
                escape_next = true;
            } else if c == '"' {
                in_string = false;
            }
        } else if c == '"' {
            in_string = true;
        } else if let Some(token) = TOKENS.iter().find(|t| rest.starts_with(*t)) {
            out.push_str("null");
            rest = &rest[token.len()..];
            continue;
        }
        out.push(c);
        rest = &rest[c.len_utf8()..];
    }
    Cow::Owned(out)
}
