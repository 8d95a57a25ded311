//! Readers that turn a raw portal document into normalized vote records.
//!
//! Each supported portal gets its own submodule with a narrow contract:
//! document text in, `Extraction` out. Markup drift upstream should only
//! ever touch the matching submodule.

pub mod tbs;

use crate::model::VoteRecord;

#[derive(Debug, thiserror::Error)]
pub enum ExtractionError {
    #[error("no embedded results payload found (marker \"{0}\")")]
    PayloadNotFound(String),
    #[error("failed to locate the end of the embedded payload object")]
    UnterminatedPayload,
    #[error("failed to decode embedded payload: {0}")]
    PayloadDecode(#[from] serde_json::Error),
    #[error("no usable vote records in payload ({skipped} malformed entries skipped)")]
    NoRecords { skipped: usize },
}

pub type ExtractionResult<T> = std::result::Result<T, ExtractionError>;

/// Outcome of a successful extraction: the usable records plus a count
/// of malformed entries that were skipped along the way. Callers must
/// surface the count; skips are diagnostics, not silent drops.
#[derive(Debug)]
pub struct Extraction {
    pub records: Vec<VoteRecord>,
    pub skipped: usize,
}
