//! Bookkeeping metadata cached on a dataset.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Metadata fields for one file, as returned by the bookkeeping service.
pub type FileMetadata = serde_json::Map<String, serde_json::Value>;

/// Per-LFN metadata.
pub type MetadataMap = BTreeMap<String, FileMetadata>;

/// State of the bookkeeping metadata cache.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "state", content = "files", rename_all = "snake_case")]
pub enum BkMetadata {
    /// Partial metadata supplied when the dataset was built, e.g. from a
    /// bookkeeping path query. Still merged with a fresh fetch on first use.
    Seeded(MetadataMap),
    /// Result of a successful fetch (and merge).
    Resolved(MetadataMap),
    /// The last fetch did not produce usable metadata.
    Failed,
}

impl BkMetadata {
    pub fn is_ok(&self) -> bool {
        !matches!(self, BkMetadata::Failed)
    }

    pub fn is_resolved(&self) -> bool {
        matches!(self, BkMetadata::Resolved(_))
    }

    /// Per-file payload; empty for [`BkMetadata::Failed`].
    pub fn files(&self) -> Option<&MetadataMap> {
        match self {
            BkMetadata::Seeded(files) | BkMetadata::Resolved(files) => Some(files),
            BkMetadata::Failed => None,
        }
    }

    /// Metadata for a single LFN.
    pub fn file(&self, lfn: &str) -> Option<&FileMetadata> {
        self.files().and_then(|files| files.get(lfn))
    }
}
