use std::path::PathBuf;

use thiserror::Error;

/// Why a document could not be turned into text.
#[derive(Debug, Error)]
pub enum ExtractError {
    /// The file could not be read at all.
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// No strategy in the chain handles this file type.
    #[error("unsupported document type: {path}")]
    Unsupported { path: PathBuf },

    /// Every applicable strategy failed or produced empty text.
    #[error("unreadable document {path}: {}", attempts.join("; "))]
    Unreadable {
        path: PathBuf,
        /// One `strategy: reason` entry per attempt, in order.
        attempts: Vec<String>,
    },
}

impl ExtractError {
    pub fn path(&self) -> &PathBuf {
        match self {
            ExtractError::Io { path, .. }
            | ExtractError::Unsupported { path }
            | ExtractError::Unreadable { path, .. } => path,
        }
    }
}
