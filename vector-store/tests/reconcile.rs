use std::{
    fs,
    path::Path,
    sync::{
        Arc, Mutex,
        atomic::{AtomicUsize, Ordering},
    },
    time::Duration,
};

use ai_llm_service::{AiLlmError, LlmProvider, ProviderError, ProviderErrorKind};
use doc_extract::ExtractorChain;
use vector_store::{
    Document, StoreConfig, StoreError, VectorStore, discover_documents,
    embed::{EmbedFuture, EmbeddingsProvider},
};

const DIM: usize = 3;

/// Deterministic provider: fails on text containing "FAIL", records inputs,
/// tracks the peak number of concurrent calls.
#[derive(Default)]
struct FakeEmbedder {
    calls: AtomicUsize,
    in_flight: AtomicUsize,
    peak: AtomicUsize,
    inputs: Mutex<Vec<String>>,
}

impl EmbeddingsProvider for FakeEmbedder {
    fn embed<'a>(&'a self, text: &'a str) -> EmbedFuture<'a> {
        Box::pin(async move {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
            self.peak.fetch_max(now, Ordering::SeqCst);
            tokio::time::sleep(Duration::from_millis(20)).await;
            self.in_flight.fetch_sub(1, Ordering::SeqCst);
            self.inputs.lock().unwrap().push(text.to_string());

            if text.contains("FAIL") {
                return Err(AiLlmError::from(ProviderError::new(
                    LlmProvider::OpenAI,
                    ProviderErrorKind::Transport("connection reset".into()),
                )));
            }
            let a = text.matches('a').count() as f32;
            Ok(vec![text.chars().count() as f32, a, 1.0])
        })
    }

    fn dimension(&self) -> usize {
        DIM
    }
}

struct Fixture {
    _dir: tempfile::TempDir,
    docs_dir: std::path::PathBuf,
    cache: std::path::PathBuf,
    embedder: Arc<FakeEmbedder>,
}

impl Fixture {
    fn new(files: &[(&str, &str)]) -> Self {
        let dir = tempfile::tempdir().unwrap();
        let docs_dir = dir.path().join("resumes");
        fs::create_dir(&docs_dir).unwrap();
        for (name, body) in files {
            fs::write(docs_dir.join(name), body).unwrap();
        }
        let cache = dir.path().join("cache.json");
        Self {
            _dir: dir,
            docs_dir,
            cache,
            embedder: Arc::new(FakeEmbedder::default()),
        }
    }

    fn store(&self, max_chars: usize, concurrency: usize) -> VectorStore {
        VectorStore::open(
            StoreConfig {
                cache_path: self.cache.clone(),
                max_embed_chars: max_chars,
                concurrency,
            },
            self.embedder.clone(),
            Arc::new(ExtractorChain::standard()),
        )
        .unwrap()
    }

    fn docs(&self) -> Vec<Document> {
        discover_documents(&self.docs_dir, &["txt".into(), "pdf".into()]).unwrap()
    }

    fn calls(&self) -> usize {
        self.embedder.calls.load(Ordering::SeqCst)
    }
}

fn read_cache(path: &Path) -> serde_json::Map<String, serde_json::Value> {
    serde_json::from_str(&fs::read_to_string(path).unwrap()).unwrap()
}

#[tokio::test]
async fn second_pass_is_idempotent() {
    let fx = Fixture::new(&[("alice.txt", "alice rust"), ("bob.txt", "bob go")]);
    let store = fx.store(12_000, 4);

    let first = store.reconcile(&fx.docs()).await.unwrap();
    assert_eq!(first.report.embedded, ["alice.txt", "bob.txt"]);
    assert_eq!(fx.calls(), 2);
    let bytes = fs::read(&fx.cache).unwrap();

    let second = store.reconcile(&fx.docs()).await.unwrap();
    assert_eq!(fx.calls(), 2, "no embedding calls on an unchanged set");
    assert_eq!(second.report.reused, ["alice.txt", "bob.txt"]);
    assert!(second.report.embedded.is_empty());
    assert_eq!(second.vectors, first.vectors);
    assert_eq!(fs::read(&fx.cache).unwrap(), bytes);
}

#[tokio::test]
async fn stale_entries_stay_on_disk_but_are_not_returned() {
    let fx = Fixture::new(&[("alice.txt", "alice"), ("bob.txt", "bob")]);
    let store = fx.store(12_000, 2);
    store.reconcile(&fx.docs()).await.unwrap();

    fs::remove_file(fx.docs_dir.join("bob.txt")).unwrap();
    let out = store.reconcile(&fx.docs()).await.unwrap();

    assert_eq!(out.vectors.keys().collect::<Vec<_>>(), ["alice.txt"]);
    assert_eq!(out.report.stale_kept, 1);
    assert!(read_cache(&fx.cache).contains_key("bob.txt"));
}

#[tokio::test]
async fn wrong_dimension_is_recomputed_or_purged() {
    let fx = Fixture::new(&[("alice.txt", "alice")]);
    fs::write(
        &fx.cache,
        r#"{"alice.txt": [1.0, 2.0], "ghost.txt": [1.0], "old.txt": [0.0, 0.0, 1.0]}"#,
    )
    .unwrap();
    let store = fx.store(12_000, 2);

    let out = store.reconcile(&fx.docs()).await.unwrap();

    assert_eq!(out.report.recomputed.len(), 1);
    assert_eq!(out.report.recomputed[0].identity, "alice.txt");
    assert_eq!(out.report.recomputed[0].got, 2);
    assert_eq!(out.report.purged, 1);
    assert_eq!(out.vectors["alice.txt"].len(), DIM);

    let on_disk = read_cache(&fx.cache);
    assert!(!on_disk.contains_key("ghost.txt"));
    assert!(on_disk.contains_key("old.txt"));
    assert_eq!(on_disk["alice.txt"].as_array().unwrap().len(), DIM);
}

#[tokio::test]
async fn unreadable_documents_are_skipped_and_reported() {
    let fx = Fixture::new(&[
        ("alice.txt", "alice"),
        ("scan.pdf", "%PDF-1.4 garbage without xref"),
    ]);
    let store = fx.store(12_000, 2);

    let out = store.reconcile(&fx.docs()).await.unwrap();

    assert_eq!(out.vectors.len(), 1);
    assert_eq!(out.report.unreadable.len(), 1);
    assert_eq!(out.report.unreadable[0].identity, "scan.pdf");
    assert_eq!(fx.calls(), 1, "no vector is requested for an unreadable document");
    assert!(!read_cache(&fx.cache).contains_key("scan.pdf"));
}

#[tokio::test]
async fn provider_failures_are_retried_next_pass() {
    let fx = Fixture::new(&[("alice.txt", "alice"), ("bob.txt", "FAIL bob")]);
    let store = fx.store(12_000, 2);

    let out = store.reconcile(&fx.docs()).await.unwrap();
    assert!(out.report.has_provider_failures());
    assert_eq!(out.report.failed[0].identity, "bob.txt");
    assert!(!out.vectors.contains_key("bob.txt"));

    fs::write(fx.docs_dir.join("bob.txt"), "bob recovered").unwrap();
    let out = store.reconcile(&fx.docs()).await.unwrap();
    assert_eq!(out.report.embedded, ["bob.txt"]);
    assert_eq!(out.vectors.len(), 2);
}

#[tokio::test]
async fn text_is_truncated_before_embedding() {
    let long = "é".repeat(50);
    let fx = Fixture::new(&[("long.txt", long.as_str())]);
    let store = fx.store(10, 1);

    let out = store.reconcile(&fx.docs()).await.unwrap();
    let inputs = fx.embedder.inputs.lock().unwrap().clone();
    assert_eq!(inputs, ["é".repeat(10)]);
    assert_eq!(out.vectors["long.txt"][0], 10.0);
}

#[tokio::test]
async fn embedding_concurrency_is_bounded() {
    let files: Vec<(String, String)> = (0..8)
        .map(|i| (format!("doc{i}.txt"), format!("text {i}")))
        .collect();
    let refs: Vec<(&str, &str)> = files
        .iter()
        .map(|(n, b)| (n.as_str(), b.as_str()))
        .collect();
    let fx = Fixture::new(&refs);
    let store = fx.store(12_000, 2);

    store.reconcile(&fx.docs()).await.unwrap();
    assert_eq!(fx.calls(), 8);
    assert!(fx.embedder.peak.load(Ordering::SeqCst) <= 2);
}

#[tokio::test]
async fn concurrent_passes_embed_each_key_once() {
    let fx = Fixture::new(&[("alice.txt", "alice"), ("bob.txt", "bob")]);
    let store = Arc::new(fx.store(12_000, 4));
    let docs = fx.docs();

    let (a, b) = tokio::join!(store.reconcile(&docs), store.reconcile(&docs));
    assert_eq!(a.unwrap().vectors, b.unwrap().vectors);
    assert_eq!(fx.calls(), 2);
}

#[tokio::test]
async fn corrupt_cache_fails_open_and_missing_cache_does_not() {
    let fx = Fixture::new(&[]);
    let cfg = StoreConfig {
        cache_path: fx.cache.clone(),
        max_embed_chars: 100,
        concurrency: 1,
    };

    assert!(
        VectorStore::open(cfg.clone(), fx.embedder.clone(), Arc::new(ExtractorChain::standard()))
            .is_ok()
    );

    fs::write(&fx.cache, "[not, an, object").unwrap();
    let err = VectorStore::open(cfg, fx.embedder.clone(), Arc::new(ExtractorChain::standard()))
        .err()
        .unwrap();
    assert!(matches!(err, StoreError::CacheParse { .. }));
}

#[tokio::test]
async fn empty_document_set_writes_nothing() {
    let fx = Fixture::new(&[]);
    let store = fx.store(100, 1);
    let out = store.reconcile(&fx.docs()).await.unwrap();
    assert!(out.vectors.is_empty());
    assert!(!fx.cache.exists());
}
