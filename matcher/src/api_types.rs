//! Request/response shapes of a match, shared by the HTTP API and the CLI.

use serde::{Deserialize, Serialize};
use vector_store::{FailedDocument, ReconcileReport};

use crate::{rank::Ranking, select::CandidateAssessment};

fn default_true() -> bool {
    true
}

#[derive(Debug, Clone, Deserialize)]
pub struct MatchRequest {
    /// Job description.
    pub description: String,
    #[serde(default = "default_true")]
    pub include_analysis: bool,
    /// Top-K size; the configured default applies when absent.
    #[serde(default)]
    pub num_candidates: Option<usize>,
}

impl MatchRequest {
    pub fn new(description: impl Into<String>) -> Self {
        Self {
            description: description.into(),
            include_analysis: true,
            num_candidates: None,
        }
    }
}

/// Coarse similarity label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ScoreBand {
    Strong,
    Good,
    Fair,
    Weak,
}

impl ScoreBand {
    /// `>= 0.75` strong, `>= 0.55` good, `> 0.35` fair, otherwise weak.
    pub fn from_score(score: f64) -> Self {
        if score >= 0.75 {
            ScoreBand::Strong
        } else if score >= 0.55 {
            ScoreBand::Good
        } else if score > 0.35 {
            ScoreBand::Fair
        } else {
            ScoreBand::Weak
        }
    }
}

/// Rounds to 3 decimals for display.
pub fn round3(score: f64) -> f64 {
    (score * 1000.0).round() / 1000.0
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedCandidate {
    pub file_name: String,
    pub similarity_score: f64,
    pub band: ScoreBand,
}

/// A document that is not part of the ranking, with the reason.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Issue {
    pub file_name: String,
    pub kind: IssueKind,
    pub detail: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum IssueKind {
    Unreadable,
    ProviderError,
    DimensionMismatch,
}

#[derive(Debug, Clone, Serialize)]
pub struct MatchResponse {
    /// Full ranking, best first.
    pub ranked_candidates: Vec<RankedCandidate>,
    /// How many of the leading candidates form the top-K.
    pub shown_top: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub analysis: Option<Vec<CandidateAssessment>>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub issues: Vec<Issue>,
}

impl MatchResponse {
    pub fn build(
        ranking: &Ranking,
        shown_top: usize,
        analysis: Option<Vec<CandidateAssessment>>,
        report: &ReconcileReport,
    ) -> Self {
        let ranked_candidates = ranking
            .entries
            .iter()
            .map(|e| {
                // The band follows the score as displayed.
                let shown = round3(e.score);
                RankedCandidate {
                    file_name: e.identity.clone(),
                    similarity_score: shown,
                    band: ScoreBand::from_score(shown),
                }
            })
            .collect();

        Self {
            ranked_candidates,
            shown_top,
            analysis,
            issues: collect_issues(ranking, report),
        }
    }
}

fn collect_issues(ranking: &Ranking, report: &ReconcileReport) -> Vec<Issue> {
    let failed = |kind: IssueKind| {
        move |f: &FailedDocument| Issue {
            file_name: f.identity.clone(),
            kind,
            detail: f.reason.clone(),
        }
    };

    let mut issues: Vec<Issue> = report
        .unreadable
        .iter()
        .map(failed(IssueKind::Unreadable))
        .chain(report.failed.iter().map(failed(IssueKind::ProviderError)))
        .chain(ranking.excluded.iter().map(|m| Issue {
            file_name: m.identity.clone(),
            kind: IssueKind::DimensionMismatch,
            detail: m.to_string(),
        }))
        .collect();
    issues.sort_by(|a, b| a.file_name.cmp(&b.file_name));
    issues
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rank::RankedEntry;

    #[test]
    fn request_defaults() {
        let r: MatchRequest = serde_json::from_str(r#"{"description": "Rust dev"}"#).unwrap();
        assert!(r.include_analysis);
        assert_eq!(r.num_candidates, None);

        let r: MatchRequest = serde_json::from_str(
            r#"{"description": "x", "include_analysis": false, "num_candidates": 0}"#,
        )
        .unwrap();
        assert!(!r.include_analysis);
        assert_eq!(r.num_candidates, Some(0));

        assert!(
            serde_json::from_str::<MatchRequest>(r#"{"description": "x", "num_candidates": -1}"#)
                .is_err()
        );
    }

    #[test]
    fn bands_follow_thresholds() {
        assert_eq!(ScoreBand::from_score(0.75), ScoreBand::Strong);
        assert_eq!(ScoreBand::from_score(0.7499), ScoreBand::Good);
        assert_eq!(ScoreBand::from_score(0.55), ScoreBand::Good);
        assert_eq!(ScoreBand::from_score(0.36), ScoreBand::Fair);
        assert_eq!(ScoreBand::from_score(0.35), ScoreBand::Weak);
        assert_eq!(ScoreBand::from_score(-0.2), ScoreBand::Weak);
    }

    #[test]
    fn band_agrees_with_displayed_score() {
        let ranking = Ranking {
            entries: vec![
                RankedEntry {
                    identity: "alice.pdf".into(),
                    score: 0.7496,
                },
                RankedEntry {
                    identity: "bob.pdf".into(),
                    score: 0.3504,
                },
            ],
            excluded: vec![],
        };
        let resp = MatchResponse::build(&ranking, 2, None, &ReconcileReport::default());

        let alice = &resp.ranked_candidates[0];
        assert_eq!(alice.similarity_score, 0.75);
        assert_eq!(alice.band, ScoreBand::Strong);

        let bob = &resp.ranked_candidates[1];
        assert_eq!(bob.similarity_score, 0.35);
        assert_eq!(bob.band, ScoreBand::Weak);

        for c in &resp.ranked_candidates {
            assert_eq!(c.band, ScoreBand::from_score(c.similarity_score));
        }
    }

    #[test]
    fn rounding_is_presentation_only() {
        let ranking = Ranking {
            entries: vec![RankedEntry {
                identity: "alice.pdf".into(),
                score: 0.123456,
            }],
            excluded: vec![],
        };
        let resp = MatchResponse::build(&ranking, 1, None, &ReconcileReport::default());
        assert_eq!(resp.ranked_candidates[0].similarity_score, 0.123);
        assert_eq!(ranking.entries[0].score, 0.123456);

        let json = serde_json::to_value(&resp).unwrap();
        assert!(json.get("analysis").is_none());
        assert!(json.get("issues").is_none());
        assert_eq!(json["ranked_candidates"][0]["band"], "weak");
    }
}
