//! Embedding cache for a folder of candidate documents.
//!
//! - [`document`]: discovery of the document set (identity = file name)
//! - [`embed`]: the [`EmbeddingsProvider`] seam and the [`EmbeddingGateway`]
//! - [`cache_file`]: flat JSON persistence (`identity -> vector`)
//! - [`store`]: [`VectorStore::reconcile`], the single-writer reconciliation pass

pub mod cache_file;
pub mod document;
pub mod embed;
pub mod embed_pool;
pub mod errors;
pub mod store;

pub use document::{Document, discover_documents};
pub use embed::{EmbeddingsProvider, gateway::EmbeddingGateway};
pub use errors::{DimensionMismatch, StoreError};
pub use store::{FailedDocument, ReconcileReport, Reconciled, StoreConfig, VectorStore};
