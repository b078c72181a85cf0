//! Interactive matcher: paste a job description, get the ranked folder.
//!
//! ```text
//! cargo run --bin cv-match-cli -- [TOP_K]
//! ```
//!
//! The description is read from stdin until the first empty line (or EOF).

use std::{env, error::Error, sync::Arc, time::Duration};

use ai_llm_service::{
    LlmServiceProfiles, config::default_config::embedding_dim_from_env, telemetry,
};
use colored::{ColoredString, Colorize};
use indicatif::{ProgressBar, ProgressStyle};
use matcher::{MatchRequest, Matcher, MatcherConfig, RankedCandidate, ScoreBand};
use tokio::io::{AsyncBufReadExt, BufReader};

const DEFAULT_CLI_TOP_K: usize = 3;

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    let _ = dotenvy::dotenv();
    telemetry::init("warn");

    let top_k = match env::args().nth(1) {
        Some(raw) => raw
            .parse::<usize>()
            .map_err(|e| format!("TOP_K must be a non-negative integer, got {raw:?}: {e}"))?,
        None => DEFAULT_CLI_TOP_K,
    };

    let llm = Arc::new(LlmServiceProfiles::from_env()?);
    let matcher = Matcher::with_llm(MatcherConfig::from_env()?, llm, embedding_dim_from_env()?)?;

    let indexing = spinner("indexing resumes...");
    let corpus = matcher.refresh().await?;
    indexing.finish_and_clear();
    println!(
        "{} {} resumes indexed ({} unreadable, {} failed)",
        "✔".green(),
        corpus.vectors.len(),
        corpus.report.unreadable.len(),
        corpus.report.failed.len()
    );

    println!("{}", "Paste the job description, then an empty line:".bold());
    let description = read_description().await?;

    let matching = spinner("matching...");
    let req = MatchRequest {
        description,
        include_analysis: true,
        num_candidates: Some(top_k),
    };
    let result = matcher.match_query(&req).await;
    matching.finish_and_clear();
    let resp = result?;

    if resp.ranked_candidates.is_empty() {
        println!("{}", "No resumes to rank.".yellow());
        return Ok(());
    }

    println!("\n{}", "Ranking".bold().underline());
    for (i, c) in resp.ranked_candidates.iter().enumerate() {
        println!("{:>3}. {}", i + 1, ranked_line(c));
    }

    if let Some(analysis) = resp.analysis.filter(|a| !a.is_empty()) {
        println!("\n{}", format!("Top {} assessment", resp.shown_top).bold().underline());
        for a in analysis {
            println!("\n{}", a.file_name.cyan().bold());
            match (a.analysis, a.error) {
                (Some(text), _) => println!("{text}"),
                (None, Some(err)) => println!("{}", format!("assessment unavailable: {err}").red()),
                (None, None) => {}
            }
        }
    }

    for issue in &resp.issues {
        eprintln!("{} {}: {}", "!".yellow(), issue.file_name, issue.detail);
    }
    Ok(())
}

async fn read_description() -> std::io::Result<String> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut out = Vec::new();
    while let Some(line) = lines.next_line().await? {
        if line.trim().is_empty() {
            if out.is_empty() {
                continue;
            }
            break;
        }
        out.push(line);
    }
    Ok(out.join("\n"))
}

fn ranked_line(c: &RankedCandidate) -> String {
    format!(
        "{} {:<40} {}",
        band_marker(c.band),
        c.file_name,
        format!("{:.3}", c.similarity_score).bold()
    )
}

fn band_marker(band: ScoreBand) -> ColoredString {
    match band {
        ScoreBand::Strong => "🟢 strong".green(),
        ScoreBand::Good => "🟡 good  ".yellow(),
        ScoreBand::Fair => "🟠 fair  ".truecolor(255, 165, 0),
        ScoreBand::Weak => "🔴 weak  ".red(),
    }
}

fn spinner(msg: &'static str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::with_template("{spinner} {msg}") {
        pb.set_style(style.tick_chars("-\\|/ "));
    }
    pb.set_message(msg);
    pb.enable_steady_tick(Duration::from_millis(80));
    pb
}
