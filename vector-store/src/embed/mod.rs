use ai_llm_service::AiLlmError;
use std::{future::Future, pin::Pin};

pub mod gateway;

/// Boxed future returned by [`EmbeddingsProvider::embed`].
pub type EmbedFuture<'a> = Pin<Box<dyn Future<Output = Result<Vec<f32>, AiLlmError>> + Send + 'a>>;

/// Provider interface for embedding generation.
///
/// Implementations must return vectors of exactly [`dimension`](Self::dimension)
/// elements or fail; callers never substitute a placeholder vector.
pub trait EmbeddingsProvider: Send + Sync {
    fn embed<'a>(&'a self, text: &'a str) -> EmbedFuture<'a>;

    /// Configured dimensionality of every returned vector.
    fn dimension(&self) -> usize;
}

/// Replaces every line break (`\r\n`, `\n`, `\r`) with a single space.
pub fn normalize_newlines(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '\r' => {
                if chars.peek() == Some(&'\n') {
                    chars.next();
                }
                out.push(' ');
            }
            '\n' => out.push(' '),
            other => out.push(other),
        }
    }
    out
}
