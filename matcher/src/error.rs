use ai_llm_service::AiLlmError;
use thiserror::Error;
use vector_store::StoreError;

/// Errors that abort a whole match request or a corpus refresh.
#[derive(Debug, Error)]
pub enum MatchError {
    /// The job description is empty or whitespace only.
    #[error("query must not be empty")]
    EmptyQuery,

    /// The query could not be embedded, so nothing can be ranked.
    #[error("failed to embed query: {0}")]
    QueryEmbedding(#[source] AiLlmError),

    /// Cache file or document folder failure.
    #[error(transparent)]
    Store(#[from] StoreError),

    /// Invalid environment configuration or provider setup.
    #[error("config error: {0}")]
    Config(#[source] AiLlmError),

    /// The document folder could not be created.
    #[error("cannot create document folder {path}: {source}")]
    DocumentDir {
        path: std::path::PathBuf,
        #[source]
        source: std::io::Error,
    },
}
