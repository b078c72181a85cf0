//! Ordered fallback over [`TextExtractor`] strategies.

use std::path::Path;

use tracing::{debug, warn};

use crate::{
    DocumentReader,
    error::ExtractError,
    strategies::{LopdfStrategy, PdfExtractStrategy, PlainTextStrategy, TextExtractor},
};

/// Tries each supporting strategy in order; the first non-empty text wins.
pub struct ExtractorChain {
    strategies: Vec<Box<dyn TextExtractor>>,
}

impl ExtractorChain {
    pub fn new(strategies: Vec<Box<dyn TextExtractor>>) -> Self {
        Self { strategies }
    }

    /// `pdf-extract` → `lopdf` for PDFs, plain text for `.txt`/`.md`.
    pub fn standard() -> Self {
        Self::new(vec![
            Box::new(PdfExtractStrategy),
            Box::new(LopdfStrategy),
            Box::new(PlainTextStrategy),
        ])
    }

    /// Whether any strategy handles this path.
    pub fn supports(&self, path: &Path) -> bool {
        self.strategies.iter().any(|s| s.supports(path))
    }

    /// Runs the fallback over already-loaded bytes.
    pub fn extract_first_success(&self, path: &Path, bytes: &[u8]) -> Result<String, ExtractError> {
        let mut attempts = Vec::new();

        for strategy in self.strategies.iter().filter(|s| s.supports(path)) {
            match strategy.extract(bytes) {
                Ok(text) if !text.trim().is_empty() => {
                    debug!(
                        path = %path.display(),
                        strategy = strategy.name(),
                        chars = text.chars().count(),
                        "text extracted"
                    );
                    return Ok(text);
                }
                Ok(_) => attempts.push(format!("{}: no extractable text", strategy.name())),
                Err(e) => {
                    warn!(
                        path = %path.display(),
                        strategy = strategy.name(),
                        error = %e,
                        "extraction strategy failed, trying next"
                    );
                    attempts.push(format!("{}: {e}", strategy.name()));
                }
            }
        }

        if attempts.is_empty() {
            return Err(ExtractError::Unsupported {
                path: path.to_path_buf(),
            });
        }
        Err(ExtractError::Unreadable {
            path: path.to_path_buf(),
            attempts,
        })
    }
}

impl Default for ExtractorChain {
    fn default() -> Self {
        Self::standard()
    }
}

impl DocumentReader for ExtractorChain {
    fn read_text(&self, path: &Path) -> Result<String, ExtractError> {
        if !self.supports(path) {
            return Err(ExtractError::Unsupported {
                path: path.to_path_buf(),
            });
        }
        let bytes = std::fs::read(path).map_err(|source| ExtractError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        self.extract_first_success(path, &bytes)
    }
}
