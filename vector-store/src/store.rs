//! Single-writer reconciliation of a document set against the cache file.

use std::{
    collections::{BTreeMap, HashSet},
    path::PathBuf,
    sync::Arc,
    time::Instant,
};

use doc_extract::DocumentReader;
use serde::Serialize;
use tokio::sync::Mutex;
use tracing::{info, instrument, warn};

use crate::{
    cache_file::{self, CacheMap},
    document::Document,
    embed::EmbeddingsProvider,
    embed_pool::{EmbedOutcome, embed_documents},
    errors::{DimensionMismatch, StoreError},
};

/// Static settings for a [`VectorStore`].
#[derive(Debug, Clone)]
pub struct StoreConfig {
    pub cache_path: PathBuf,
    /// Text is truncated to this many characters before embedding.
    pub max_embed_chars: usize,
    /// Maximum embedding requests in flight during one pass.
    pub concurrency: usize,
}

/// A document that got no vector in this pass.
#[derive(Debug, Clone, Serialize)]
pub struct FailedDocument {
    pub identity: String,
    pub reason: String,
}

/// What one reconciliation pass did.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ReconcileReport {
    pub reused: Vec<String>,
    pub embedded: Vec<String>,
    /// Cached entries with a wrong length; recomputed when the document is present.
    pub recomputed: Vec<DimensionMismatch>,
    /// Extraction failures; these documents are skipped.
    pub unreadable: Vec<FailedDocument>,
    /// Provider failures; these documents are retried on the next pass.
    pub failed: Vec<FailedDocument>,
    /// Wrong-length entries of documents no longer present, dropped from the file.
    pub purged: usize,
    /// Valid entries of documents no longer present, kept in the file.
    pub stale_kept: usize,
}

impl ReconcileReport {
    pub fn has_provider_failures(&self) -> bool {
        !self.failed.is_empty()
    }
}

/// Outcome of [`VectorStore::reconcile`].
#[derive(Debug, Clone, Default)]
pub struct Reconciled {
    /// Exactly the current documents that have a valid vector.
    pub vectors: BTreeMap<String, Vec<f32>>,
    pub report: ReconcileReport,
}

/// Embedding cache bound to one JSON file.
///
/// All passes are serialized by an internal lock, so the file has a single
/// writer per process.
pub struct VectorStore {
    cfg: StoreConfig,
    provider: Arc<dyn EmbeddingsProvider>,
    reader: Arc<dyn DocumentReader>,
    write_lock: Mutex<()>,
}

impl VectorStore {
    /// Validates the cache file and builds the store.
    ///
    /// A missing file is a degraded start (empty cache, logged). An unreadable
    /// or malformed file is an error.
    pub fn open(
        cfg: StoreConfig,
        provider: Arc<dyn EmbeddingsProvider>,
        reader: Arc<dyn DocumentReader>,
    ) -> Result<Self, StoreError> {
        match cache_file::load(&cfg.cache_path)? {
            Some(map) => {
                let want = provider.dimension();
                let invalid = map.values().filter(|v| v.len() != want).count();
                info!(
                    path = %cfg.cache_path.display(),
                    entries = map.len(),
                    invalid,
                    "embedding cache opened"
                );
            }
            None => warn!(
                path = %cfg.cache_path.display(),
                "embedding cache not found, starting empty"
            ),
        }

        Ok(Self {
            cfg,
            provider,
            reader,
            write_lock: Mutex::new(()),
        })
    }

    pub fn config(&self) -> &StoreConfig {
        &self.cfg
    }

    pub fn dimension(&self) -> usize {
        self.provider.dimension()
    }

    /// Brings the cache in line with `documents` and returns their vectors.
    ///
    /// Valid cached vectors are reused; misses and wrong-length entries are
    /// extracted and embedded. Stale valid entries stay on disk but are not
    /// returned. The file is rewritten only when something changed.
    #[instrument(skip_all, fields(documents = documents.len()))]
    pub async fn reconcile(&self, documents: &[Document]) -> Result<Reconciled, StoreError> {
        let _guard = self.write_lock.lock().await;
        let started = Instant::now();
        let want = self.provider.dimension();

        let mut cache = cache_file::load(&self.cfg.cache_path)?.unwrap_or_default();
        let mut report = ReconcileReport::default();
        let mut changed = false;

        let mut seen = HashSet::new();
        let current: Vec<&Document> = documents
            .iter()
            .filter(|d| seen.insert(d.identity.as_str()))
            .collect();

        let mut misses = Vec::new();
        for doc in &current {
            match cache.get(&doc.identity) {
                Some(v) if v.len() == want => report.reused.push(doc.identity.clone()),
                Some(v) => {
                    report.recomputed.push(DimensionMismatch {
                        identity: doc.identity.clone(),
                        got: v.len(),
                        want,
                    });
                    misses.push((*doc).clone());
                }
                None => misses.push((*doc).clone()),
            }
        }

        // Every persisted entry must have the expected length.
        let before = cache.len();
        let present: HashSet<&str> = current.iter().map(|d| d.identity.as_str()).collect();
        cache.retain(|_, v| v.len() == want);
        if cache.len() != before {
            changed = true;
            report.purged = before - cache.len() - report.recomputed.len();
        }
        report.stale_kept = cache
            .keys()
            .filter(|k| !present.contains(k.as_str()))
            .count();

        let outcomes = embed_documents(
            misses,
            self.provider.as_ref(),
            Arc::clone(&self.reader),
            self.cfg.max_embed_chars,
            self.cfg.concurrency,
        )
        .await;

        for outcome in outcomes {
            match outcome {
                EmbedOutcome::Embedded { identity, vector } if vector.len() == want => {
                    cache.insert(identity.clone(), vector);
                    report.embedded.push(identity);
                    changed = true;
                }
                EmbedOutcome::Embedded { identity, vector } => {
                    report.failed.push(FailedDocument {
                        reason: DimensionMismatch {
                            identity: identity.clone(),
                            got: vector.len(),
                            want,
                        }
                        .to_string(),
                        identity,
                    });
                }
                EmbedOutcome::Unreadable { identity, error } => {
                    report.unreadable.push(FailedDocument {
                        identity,
                        reason: error.to_string(),
                    });
                }
                EmbedOutcome::Failed { identity, error } => {
                    report.failed.push(FailedDocument {
                        identity,
                        reason: error.to_string(),
                    });
                }
            }
        }
        report.embedded.sort();
        report.unreadable.sort_by(|a, b| a.identity.cmp(&b.identity));
        report.failed.sort_by(|a, b| a.identity.cmp(&b.identity));

        if changed {
            cache_file::save(&self.cfg.cache_path, &cache)?;
        }

        let vectors = select_current(&cache, &current);

        info!(
            returned = vectors.len(),
            reused = report.reused.len(),
            embedded = report.embedded.len(),
            recomputed = report.recomputed.len(),
            unreadable = report.unreadable.len(),
            failed = report.failed.len(),
            stale_kept = report.stale_kept,
            written = changed,
            latency_ms = started.elapsed().as_millis(),
            "reconciliation finished"
        );

        Ok(Reconciled { vectors, report })
    }
}

fn select_current(cache: &CacheMap, current: &[&Document]) -> BTreeMap<String, Vec<f32>> {
    current
        .iter()
        .filter_map(|d| {
            cache
                .get(&d.identity)
                .map(|v| (d.identity.clone(), v.clone()))
        })
        .collect()
}
