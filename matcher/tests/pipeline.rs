use std::{
    fs,
    path::PathBuf,
    sync::{
        Arc,
        atomic::{AtomicUsize, Ordering},
    },
};

use ai_llm_service::{AiLlmError, LlmProvider, ProviderError, ProviderErrorKind};
use doc_extract::ExtractorChain;
use matcher::{
    AssessmentProvider, MatchError, MatchRequest, Matcher, MatcherConfig,
    api_types::IssueKind,
    llm::AssessFuture,
};
use vector_store::embed::{EmbedFuture, EmbeddingsProvider};

/// `[#rust, #python, 1]`; fails on text containing "FAIL".
#[derive(Default)]
struct KeywordEmbedder {
    calls: AtomicUsize,
}

impl EmbeddingsProvider for KeywordEmbedder {
    fn embed<'a>(&'a self, text: &'a str) -> EmbedFuture<'a> {
        Box::pin(async move {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if text.contains("FAIL") {
                return Err(AiLlmError::from(ProviderError::new(
                    LlmProvider::OpenAI,
                    ProviderErrorKind::Transport("connection reset".into()),
                )));
            }
            let lower = text.to_lowercase();
            Ok(vec![
                lower.matches("rust").count() as f32,
                lower.matches("python").count() as f32,
                1.0,
            ])
        })
    }

    fn dimension(&self) -> usize {
        3
    }
}

#[derive(Default)]
struct CountingAssessor {
    calls: AtomicUsize,
}

impl AssessmentProvider for CountingAssessor {
    fn assess<'a>(&'a self, _prompt: &'a str) -> AssessFuture<'a> {
        Box::pin(async move {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok("Solid match. 8/10".to_string())
        })
    }
}

struct Fixture {
    _dir: tempfile::TempDir,
    docs: PathBuf,
    embedder: Arc<KeywordEmbedder>,
    assessor: Arc<CountingAssessor>,
    matcher: Matcher,
}

impl Fixture {
    fn new(files: &[(&str, &str)]) -> Self {
        let dir = tempfile::tempdir().unwrap();
        let docs = dir.path().join("resumes");
        fs::create_dir(&docs).unwrap();
        for (name, body) in files {
            fs::write(docs.join(name), body).unwrap();
        }

        let cfg = MatcherConfig {
            resume_dir: docs.clone(),
            extensions: vec!["txt".into()],
            cache_path: dir.path().join("cache.json"),
            ..MatcherConfig::default()
        };
        let embedder = Arc::new(KeywordEmbedder::default());
        let assessor = Arc::new(CountingAssessor::default());
        let matcher = Matcher::new(
            cfg,
            embedder.clone(),
            Arc::new(ExtractorChain::standard()),
            assessor.clone(),
        )
        .unwrap();

        Self {
            _dir: dir,
            docs,
            embedder,
            assessor,
            matcher,
        }
    }

    fn embed_calls(&self) -> usize {
        self.embedder.calls.load(Ordering::SeqCst)
    }
}

fn request(description: &str, k: Option<usize>) -> MatchRequest {
    MatchRequest {
        description: description.into(),
        include_analysis: true,
        num_candidates: k,
    }
}

fn three_candidates() -> Fixture {
    Fixture::new(&[
        ("alice.txt", "Rust engineer, Rust async services"),
        ("bob.txt", "Python developer"),
        ("carol.txt", "Go developer"),
    ])
}

#[tokio::test]
async fn best_candidate_ranks_first_and_is_assessed() {
    let fx = Fixture::new(&[
        ("alice.txt", "Rust engineer, Rust async services"),
        ("bob.txt", "Python developer"),
    ]);

    let resp = fx
        .matcher
        .match_query(&request("Rust engineer", Some(1)))
        .await
        .unwrap();

    let names: Vec<_> = resp
        .ranked_candidates
        .iter()
        .map(|c| c.file_name.as_str())
        .collect();
    assert_eq!(names, ["alice.txt", "bob.txt"]);
    let scores: Vec<_> = resp
        .ranked_candidates
        .iter()
        .map(|c| c.similarity_score)
        .collect();
    assert!(scores[0] > scores[1]);
    assert_eq!(resp.shown_top, 1);

    let analysis = resp.analysis.unwrap();
    assert_eq!(analysis.len(), 1);
    assert_eq!(analysis[0].file_name, "alice.txt");
    assert_eq!(analysis[0].analysis.as_deref(), Some("Solid match. 8/10"));
    assert!(resp.issues.is_empty());
}

#[tokio::test]
async fn top_k_is_clamped_to_the_corpus() {
    let fx = three_candidates();

    let resp = fx
        .matcher
        .match_query(&request("Rust", Some(1000)))
        .await
        .unwrap();
    assert_eq!(resp.shown_top, 3);
    assert_eq!(resp.analysis.unwrap().len(), 3);

    let resp = fx
        .matcher
        .match_query(&request("Rust", Some(0)))
        .await
        .unwrap();
    assert_eq!(resp.shown_top, 0);
    assert_eq!(resp.ranked_candidates.len(), 3);
    assert!(resp.analysis.unwrap().is_empty());
}

#[tokio::test]
async fn default_top_k_applies_when_absent() {
    let fx = three_candidates();
    let resp = fx.matcher.match_query(&request("Rust", None)).await.unwrap();
    // Default is 5, clamped to 3 documents.
    assert_eq!(resp.shown_top, 3);
}

#[tokio::test]
async fn empty_query_is_rejected_before_any_work() {
    let fx = three_candidates();
    let err = fx
        .matcher
        .match_query(&request("  \n\t ", Some(3)))
        .await
        .unwrap_err();
    assert!(matches!(err, MatchError::EmptyQuery));
    assert_eq!(fx.embed_calls(), 0);
}

#[tokio::test]
async fn query_embedding_failure_fails_the_request() {
    let fx = three_candidates();
    let err = fx
        .matcher
        .match_query(&request("FAIL", Some(3)))
        .await
        .unwrap_err();
    assert!(matches!(err, MatchError::QueryEmbedding(_)));
    assert_eq!(fx.assessor.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn analysis_can_be_skipped() {
    let fx = three_candidates();
    let mut req = request("Rust", Some(2));
    req.include_analysis = false;

    let resp = fx.matcher.match_query(&req).await.unwrap();
    assert!(resp.analysis.is_none());
    assert_eq!(resp.shown_top, 2);
    assert_eq!(fx.assessor.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn unchanged_folder_reuses_the_corpus() {
    let fx = three_candidates();
    fx.matcher.refresh().await.unwrap();
    assert_eq!(fx.embed_calls(), 3);
    assert_eq!(fx.matcher.corpus_size().await, 3);

    fx.matcher.match_query(&request("Rust", Some(1))).await.unwrap();
    fx.matcher.match_query(&request("Python", Some(1))).await.unwrap();
    // Only the two queries were embedded.
    assert_eq!(fx.embed_calls(), 5);
}

#[tokio::test]
async fn new_document_is_picked_up_on_next_query() {
    let fx = three_candidates();
    fx.matcher.refresh().await.unwrap();

    fs::write(fx.docs.join("dave.txt"), "Rust systems").unwrap();
    let resp = fx
        .matcher
        .match_query(&request("Rust", Some(1)))
        .await
        .unwrap();

    assert_eq!(resp.ranked_candidates.len(), 4);
    assert_eq!(resp.ranked_candidates[0].file_name, "dave.txt");
    assert_eq!(fx.matcher.corpus_size().await, 4);
}

#[tokio::test]
async fn problem_documents_are_reported_not_ranked() {
    let fx = Fixture::new(&[
        ("alice.txt", "Rust engineer"),
        ("blank.txt", "   \n  "),
        ("flaky.txt", "FAIL to embed"),
    ]);

    let resp = fx
        .matcher
        .match_query(&request("Rust", Some(5)))
        .await
        .unwrap();

    assert_eq!(resp.ranked_candidates.len(), 1);
    let kinds: Vec<_> = resp
        .issues
        .iter()
        .map(|i| (i.file_name.as_str(), i.kind))
        .collect();
    assert_eq!(
        kinds,
        [
            ("blank.txt", IssueKind::Unreadable),
            ("flaky.txt", IssueKind::ProviderError),
        ]
    );

    // Provider failures are retried on the next query.
    let before = fx.embed_calls();
    fx.matcher.match_query(&request("Rust", Some(5))).await.unwrap();
    assert_eq!(fx.embed_calls(), before + 2);
}
