use std::panic::{self, AssertUnwindSafe};

use super::{StrategyError, TextExtractor};

/// Runs a parser, turning a panic into [`StrategyError::Panicked`].
/// Some PDF parsers panic on malformed fonts or xref tables.
fn guarded<F>(f: F) -> Result<String, StrategyError>
where
    F: FnOnce() -> Result<String, StrategyError>,
{
    panic::catch_unwind(AssertUnwindSafe(f)).unwrap_or(Err(StrategyError::Panicked))
}

/// Primary PDF strategy backed by `pdf-extract` (layout-aware text output).
#[derive(Debug, Default, Clone, Copy)]
pub struct PdfExtractStrategy;

impl TextExtractor for PdfExtractStrategy {
    fn name(&self) -> &'static str {
        "pdf-extract"
    }

    fn extensions(&self) -> &'static [&'static str] {
        &["pdf"]
    }

    fn extract(&self, bytes: &[u8]) -> Result<String, StrategyError> {
        guarded(|| {
            pdf_extract::extract_text_from_mem(bytes)
                .map_err(|e| StrategyError::Parse(e.to_string()))
        })
    }
}

/// Fallback PDF strategy backed by `lopdf` page-by-page extraction.
#[derive(Debug, Default, Clone, Copy)]
pub struct LopdfStrategy;

impl TextExtractor for LopdfStrategy {
    fn name(&self) -> &'static str {
        "lopdf"
    }

    fn extensions(&self) -> &'static [&'static str] {
        &["pdf"]
    }

    fn extract(&self, bytes: &[u8]) -> Result<String, StrategyError> {
        guarded(|| {
            let doc = lopdf::Document::load_mem(bytes)
                .map_err(|e| StrategyError::Parse(e.to_string()))?;
            let mut out = String::new();
            for page in doc.get_pages().keys() {
                // A single broken page should not discard the others.
                if let Ok(text) = doc.extract_text(&[*page]) {
                    if !out.is_empty() {
                        out.push('\n');
                    }
                    out.push_str(&text);
                }
            }
            Ok(out)
        })
    }
}
