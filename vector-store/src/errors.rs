//! Error types for the vector store.

use std::path::PathBuf;

use serde::Serialize;
use thiserror::Error;

/// A vector whose length differs from the expected dimensionality.
///
/// Not fatal: the entry is excluded (ranking) or recomputed (reconciliation).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Error)]
#[error("dimension mismatch for {identity}: got {got}, want {want}")]
pub struct DimensionMismatch {
    pub identity: String,
    pub got: usize,
    pub want: usize,
}

/// Fatal store failures. Per-document problems are reported, not raised.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Cache file exists but cannot be read or written.
    #[error("cache io error at {path}: {source}")]
    CacheIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Cache file exists but is not a JSON object of number arrays.
    #[error("cache file {path} is not valid: {source}")]
    CacheParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// Document folder exists but cannot be listed.
    #[error("cannot list document folder {path}: {source}")]
    DocumentDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
