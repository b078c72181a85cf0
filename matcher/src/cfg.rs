//! Matcher configuration (env-driven, with defaults).
//!
//! | Variable | Default |
//! |---|---|
//! | `RESUME_DIR` | `resumes` |
//! | `DOC_EXTENSIONS` | `pdf` |
//! | `EMBED_CACHE` | `resume_embeddings_openai.json` |
//! | `EMBED_MAX_CHARS` | `12000` |
//! | `ASSESS_MAX_CHARS` | `4000` |
//! | `ASSESS_MAX_OUTPUT_CHARS` | `600` |
//! | `EMBED_CONCURRENCY` | `4` |
//! | `ASSESS_CONCURRENCY` | `3` |
//! | `DEFAULT_TOP_K` | `5` |

use std::{collections::HashSet, path::PathBuf};

use ai_llm_service::error_handler::{env_or, env_parse};

use crate::{error::MatchError, select::AssessLimits};

#[derive(Debug, Clone)]
pub struct MatcherConfig {
    pub resume_dir: PathBuf,
    /// Lowercase extensions without the dot.
    pub extensions: Vec<String>,
    pub cache_path: PathBuf,
    pub embed_max_chars: usize,
    pub assess_max_chars: usize,
    pub assess_max_output_chars: usize,
    pub embed_concurrency: usize,
    pub assess_concurrency: usize,
    pub default_top_k: usize,
}

impl Default for MatcherConfig {
    fn default() -> Self {
        Self {
            resume_dir: PathBuf::from("resumes"),
            extensions: vec!["pdf".to_string()],
            cache_path: PathBuf::from("resume_embeddings_openai.json"),
            embed_max_chars: 12_000,
            assess_max_chars: 4_000,
            assess_max_output_chars: 600,
            embed_concurrency: 4,
            assess_concurrency: 3,
            default_top_k: 5,
        }
    }
}

impl MatcherConfig {
    pub fn from_env() -> Result<Self, MatchError> {
        let d = Self::default();
        let usize_var = |name: &'static str, default: usize| {
            env_parse(name, default, "expected non-negative integer").map_err(MatchError::Config)
        };

        Ok(Self {
            resume_dir: PathBuf::from(env_or("RESUME_DIR", "resumes")),
            extensions: parse_extensions(&env_or("DOC_EXTENSIONS", "pdf")),
            cache_path: PathBuf::from(env_or("EMBED_CACHE", "resume_embeddings_openai.json")),
            embed_max_chars: usize_var("EMBED_MAX_CHARS", d.embed_max_chars)?,
            assess_max_chars: usize_var("ASSESS_MAX_CHARS", d.assess_max_chars)?,
            assess_max_output_chars: usize_var(
                "ASSESS_MAX_OUTPUT_CHARS",
                d.assess_max_output_chars,
            )?,
            embed_concurrency: usize_var("EMBED_CONCURRENCY", d.embed_concurrency)?.max(1),
            assess_concurrency: usize_var("ASSESS_CONCURRENCY", d.assess_concurrency)?.max(1),
            default_top_k: usize_var("DEFAULT_TOP_K", d.default_top_k)?,
        })
    }

    pub fn assess_limits(&self) -> AssessLimits {
        AssessLimits {
            max_input_chars: self.assess_max_chars,
            max_output_chars: self.assess_max_output_chars,
            concurrency: self.assess_concurrency,
        }
    }
}

/// `"pdf, .TXT,,md,PDF"` → `["pdf", "txt", "md"]` (first occurrence wins)
pub fn parse_extensions(raw: &str) -> Vec<String> {
    let mut seen = HashSet::new();
    raw.split(',')
        .map(|s| s.trim().trim_start_matches('.').to_ascii_lowercase())
        .filter(|s| !s.is_empty() && seen.insert(s.clone()))
        .collect()
}
