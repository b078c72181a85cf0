//! Extraction strategies.

mod pdf;
mod plain;

use std::path::Path;

use thiserror::Error;

pub use pdf::{LopdfStrategy, PdfExtractStrategy};
pub use plain::PlainTextStrategy;

/// Failure of a single strategy. The chain records it and moves on.
#[derive(Debug, Error)]
pub enum StrategyError {
    #[error("parse error: {0}")]
    Parse(String),

    #[error("parser panicked")]
    Panicked,
}

/// One way of turning document bytes into text.
pub trait TextExtractor: Send + Sync {
    /// Short name used in logs and error reports.
    fn name(&self) -> &'static str;

    /// Lowercase file extensions this strategy handles.
    fn extensions(&self) -> &'static [&'static str];

    fn extract(&self, bytes: &[u8]) -> Result<String, StrategyError>;

    fn supports(&self, path: &Path) -> bool {
        extension_of(path).is_some_and(|ext| self.extensions().contains(&ext.as_str()))
    }
}

/// Lowercased extension of `path`, if any.
pub fn extension_of(path: &Path) -> Option<String> {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
}
