//! Document-to-text extraction.
//!
//! A [`DocumentReader`] turns a file into plain text. The default reader is an
//! [`ExtractorChain`]: an ordered list of [`TextExtractor`] strategies where
//! the first one that supports the file and yields non-empty text wins.
//!
//! ```no_run
//! use doc_extract::{DocumentReader, ExtractorChain};
//!
//! let chain = ExtractorChain::standard();
//! let text = chain.read_text(std::path::Path::new("resumes/alice.pdf"))?;
//! # Ok::<(), doc_extract::ExtractError>(())
//! ```
//!
//! Extraction is blocking; async callers should run it on the blocking pool.

pub mod chain;
pub mod error;
pub mod strategies;
pub mod text;

use std::path::Path;

pub use chain::ExtractorChain;
pub use error::ExtractError;
pub use strategies::TextExtractor;
pub use text::truncate_chars;

/// Reads a document and returns its text content.
pub trait DocumentReader: Send + Sync {
    fn read_text(&self, path: &Path) -> Result<String, ExtractError>;
}
