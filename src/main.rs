use std::{env, error::Error, sync::Arc};

use ai_llm_service::{
    LlmServiceProfiles, config::default_config::embedding_dim_from_env, telemetry,
};
use api::AppState;
use matcher::{Matcher, MatcherConfig};
use tracing::{info, warn};

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    let dotenv = dotenvy::dotenv();
    telemetry::init("info");
    if let Err(e) = dotenv {
        warn!(error = %e, ".env not loaded, using process environment");
    }

    let llm = Arc::new(LlmServiceProfiles::from_env()?);
    let (assessment, embedding) = llm.profiles();
    info!(
        provider = ?embedding.provider,
        embedding_model = %embedding.model,
        assessment_model = %assessment.model,
        "llm profiles loaded"
    );

    let cfg = MatcherConfig::from_env()?;
    let matcher = Arc::new(Matcher::with_llm(cfg, Arc::clone(&llm), embedding_dim_from_env()?)?);

    // Cache problems are fatal at startup; per-document failures are only reported.
    let corpus = matcher.refresh().await?;
    info!(
        documents = corpus.documents.len(),
        ranked = corpus.vectors.len(),
        "startup reconciliation done"
    );

    let addr = env::var("API_ADDRESS").unwrap_or_else(|_| {
        let port = env::var("PORT").unwrap_or_else(|_| "5000".into());
        format!("0.0.0.0:{port}")
    });

    api::start(AppState::new(matcher, llm), &addr).await?;
    Ok(())
}
