use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use matcher::MatchError;
use thiserror::Error;
use tracing::error;
use vector_store::StoreError;

use crate::core::http::response_envelope::ApiResponse;

/// Public application error type.
#[derive(Debug, Error)]
pub enum AppError {
    // --- IO / server ---
    #[error("failed to bind listener on {addr}")]
    Bind {
        addr: String,
        #[source]
        source: std::io::Error,
    },

    #[error("server error")]
    Server(#[source] std::io::Error),

    // --- Request ---
    #[error("bad request: {0}")]
    BadRequest(String),

    // --- Pipeline ---
    #[error(transparent)]
    Match(#[from] MatchError),
}

impl AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Match(MatchError::EmptyQuery) => StatusCode::BAD_REQUEST,
            AppError::Match(MatchError::QueryEmbedding(_)) => StatusCode::BAD_GATEWAY,
            AppError::Match(_) | AppError::Bind { .. } | AppError::Server(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            AppError::Bind { .. } => "BIND_ERROR",
            AppError::Server(_) => "SERVER_ERROR",
            AppError::BadRequest(_) => "BAD_REQUEST",
            AppError::Match(e) => match e {
                MatchError::EmptyQuery => "EMPTY_QUERY",
                MatchError::QueryEmbedding(_) => "PROVIDER_ERROR",
                MatchError::Store(StoreError::CacheIo { .. }) => "CACHE_IO",
                MatchError::Store(StoreError::CacheParse { .. }) => "CACHE_PARSE",
                MatchError::Store(StoreError::DocumentDir { .. })
                | MatchError::DocumentDir { .. } => "DOCUMENT_DIR",
                MatchError::Config(_) => "CONFIG_ERROR",
            },
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            error!(code = self.error_code(), error = %self, "request failed");
        }
        ApiResponse::<()>::error(self.error_code(), self.to_string())
            .into_response_with_status(status)
    }
}

/// Handy result alias used across handlers.
pub type AppResult<T> = Result<T, AppError>;

impl From<JsonRejection> for AppError {
    fn from(err: JsonRejection) -> Self {
        AppError::BadRequest(err.body_text())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pipeline_errors_map_to_status_and_code() {
        let e = AppError::from(MatchError::EmptyQuery);
        assert_eq!(e.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(e.error_code(), "EMPTY_QUERY");

        let e = AppError::from(MatchError::Store(StoreError::CacheIo {
            path: "cache.json".into(),
            source: std::io::Error::other("disk full"),
        }));
        assert_eq!(e.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(e.error_code(), "CACHE_IO");
    }
}
