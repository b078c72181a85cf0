//! Ranks the document folder against a job description.
//!
//! A [`Matcher`] owns the [`VectorStore`], keeps the last reconciled corpus in
//! memory and answers [`MatchRequest`]s: embed the query, rank every document
//! by cosine similarity, then assess the leading candidates with the LLM.

pub mod api_types;
pub mod cfg;
pub mod error;
pub mod llm;
pub mod prompt;
pub mod rank;
pub mod select;

use std::{collections::BTreeMap, path::PathBuf, sync::Arc, time::Instant};

use ai_llm_service::LlmServiceProfiles;
use doc_extract::{DocumentReader, ExtractorChain, truncate_chars};
use tokio::sync::{Mutex, RwLock};
use tracing::{debug, info, instrument, warn};
use vector_store::{
    Document, EmbeddingGateway, EmbeddingsProvider, ReconcileReport, StoreConfig, VectorStore,
    discover_documents,
};

pub use api_types::{MatchRequest, MatchResponse, RankedCandidate, ScoreBand};
pub use cfg::MatcherConfig;
pub use error::MatchError;
pub use llm::{AssessmentProvider, LlmAssessor};
pub use select::CandidateAssessment;

/// The reconciled document set a query is ranked against.
#[derive(Debug, Default)]
pub struct Corpus {
    pub documents: Vec<Document>,
    pub vectors: BTreeMap<String, Vec<f32>>,
    pub report: ReconcileReport,
}

impl Corpus {
    pub fn paths(&self) -> BTreeMap<String, PathBuf> {
        self.documents
            .iter()
            .map(|d| (d.identity.clone(), d.path.clone()))
            .collect()
    }

    fn same_documents(&self, other: &[Document]) -> bool {
        self.documents.len() == other.len()
            && self
                .documents
                .iter()
                .zip(other)
                .all(|(a, b)| a.identity == b.identity)
    }
}

pub struct Matcher {
    cfg: MatcherConfig,
    store: VectorStore,
    embedder: Arc<dyn EmbeddingsProvider>,
    reader: Arc<dyn DocumentReader>,
    assessor: Arc<dyn AssessmentProvider>,
    corpus: RwLock<Option<Arc<Corpus>>>,
    refresh_lock: Mutex<()>,
}

impl Matcher {
    /// Creates the document folder if needed and opens the cache file.
    pub fn new(
        cfg: MatcherConfig,
        embedder: Arc<dyn EmbeddingsProvider>,
        reader: Arc<dyn DocumentReader>,
        assessor: Arc<dyn AssessmentProvider>,
    ) -> Result<Self, MatchError> {
        std::fs::create_dir_all(&cfg.resume_dir).map_err(|source| MatchError::DocumentDir {
            path: cfg.resume_dir.clone(),
            source,
        })?;

        let store = VectorStore::open(
            StoreConfig {
                cache_path: cfg.cache_path.clone(),
                max_embed_chars: cfg.embed_max_chars,
                concurrency: cfg.embed_concurrency,
            },
            Arc::clone(&embedder),
            Arc::clone(&reader),
        )?;

        Ok(Self {
            cfg,
            store,
            embedder,
            reader,
            assessor,
            corpus: RwLock::new(None),
            refresh_lock: Mutex::new(()),
        })
    }

    /// Production wiring: embeddings and assessments through `svc`, documents
    /// through the standard extractor chain.
    pub fn with_llm(
        cfg: MatcherConfig,
        svc: Arc<LlmServiceProfiles>,
        dim: usize,
    ) -> Result<Self, MatchError> {
        Self::new(
            cfg,
            Arc::new(EmbeddingGateway::new(Arc::clone(&svc), dim)),
            Arc::new(ExtractorChain::standard()),
            Arc::new(LlmAssessor::new(svc)),
        )
    }

    pub fn config(&self) -> &MatcherConfig {
        &self.cfg
    }

    /// Number of documents with a usable vector in the current corpus.
    pub async fn corpus_size(&self) -> usize {
        self.corpus
            .read()
            .await
            .as_ref()
            .map_or(0, |c| c.vectors.len())
    }

    /// Rediscovers the document folder and reconciles it with the cache.
    #[instrument(skip_all, fields(dir = %self.cfg.resume_dir.display()))]
    pub async fn refresh(&self) -> Result<Arc<Corpus>, MatchError> {
        let _guard = self.refresh_lock.lock().await;
        self.refresh_locked().await
    }

    async fn refresh_locked(&self) -> Result<Arc<Corpus>, MatchError> {
        let started = Instant::now();
        let documents = discover_documents(&self.cfg.resume_dir, &self.cfg.extensions)?;
        let reconciled = self.store.reconcile(&documents).await?;

        let report = &reconciled.report;
        info!(
            documents = documents.len(),
            ranked = reconciled.vectors.len(),
            reused = report.reused.len(),
            embedded = report.embedded.len(),
            unreadable = report.unreadable.len(),
            failed = report.failed.len(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "corpus refreshed"
        );

        let corpus = Arc::new(Corpus {
            documents,
            vectors: reconciled.vectors,
            report: reconciled.report,
        });
        *self.corpus.write().await = Some(Arc::clone(&corpus));
        Ok(corpus)
    }

    /// Returns the current corpus, refreshing it first when the folder
    /// contents changed or the last pass had provider failures.
    pub async fn ensure_corpus(&self) -> Result<Arc<Corpus>, MatchError> {
        let documents = discover_documents(&self.cfg.resume_dir, &self.cfg.extensions)?;
        if let Some(c) = self.usable_corpus(&documents).await {
            return Ok(c);
        }

        let _guard = self.refresh_lock.lock().await;
        // Another request may have refreshed while we waited.
        if let Some(c) = self.usable_corpus(&documents).await {
            return Ok(c);
        }
        self.refresh_locked().await
    }

    async fn usable_corpus(&self, documents: &[Document]) -> Option<Arc<Corpus>> {
        let current = self.corpus.read().await;
        let c = current.as_ref()?;
        if c.report.has_provider_failures() {
            debug!("previous pass had provider failures, refreshing");
            return None;
        }
        if !c.same_documents(documents) {
            debug!("document set changed, refreshing");
            return None;
        }
        Some(Arc::clone(c))
    }

    /// Ranks the corpus against `req.description` and, if requested,
    /// assesses the top-K candidates.
    #[instrument(skip_all, fields(top_k = ?req.num_candidates, analysis = req.include_analysis))]
    pub async fn match_query(&self, req: &MatchRequest) -> Result<MatchResponse, MatchError> {
        let query = req.description.trim();
        if query.is_empty() {
            return Err(MatchError::EmptyQuery);
        }

        let corpus = self.ensure_corpus().await?;

        let query_vec = self
            .embedder
            .embed(truncate_chars(query, self.cfg.embed_max_chars))
            .await
            .map_err(|e| {
                warn!(error = %e, "query embedding failed");
                MatchError::QueryEmbedding(e)
            })?;

        let ranking = rank::rank(&query_vec, &corpus.vectors);
        for m in &ranking.excluded {
            warn!(
                identity = %m.identity,
                got = m.got,
                want = m.want,
                "vector excluded from ranking"
            );
        }

        let k = req.num_candidates.unwrap_or(self.cfg.default_top_k);
        let top = select::top_k(&ranking.entries, k);

        let analysis = if req.include_analysis {
            let assessed = select::assess_candidates(
                query,
                top,
                &corpus.paths(),
                Arc::clone(&self.reader),
                self.assessor.as_ref(),
                self.cfg.assess_limits(),
            )
            .await;
            Some(assessed)
        } else {
            None
        };

        info!(
            ranked = ranking.entries.len(),
            shown_top = top.len(),
            "match completed"
        );
        Ok(MatchResponse::build(&ranking, top.len(), analysis, &corpus.report))
    }
}
