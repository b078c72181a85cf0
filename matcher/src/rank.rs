//! Cosine ranking of cached vectors against a query vector.

use std::{cmp::Ordering, collections::BTreeMap};

use serde::Serialize;
use vector_store::DimensionMismatch;

/// One scored document. `score` is full precision; rounding is a
/// presentation concern.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedEntry {
    pub identity: String,
    pub score: f64,
}

/// Ordered entries plus the corpus members that could not be compared.
#[derive(Debug, Clone, Default)]
pub struct Ranking {
    pub entries: Vec<RankedEntry>,
    pub excluded: Vec<DimensionMismatch>,
}

/// Cosine similarity accumulated in `f64`, clamped to `[-1, 1]`.
///
/// Returns `0.0` when either vector has zero norm or the result is not finite.
/// Slices are compared up to the shorter length; callers check lengths first.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f64 {
    let (mut dot, mut na, mut nb) = (0.0f64, 0.0f64, 0.0f64);
    for (&x, &y) in a.iter().zip(b) {
        let (x, y) = (f64::from(x), f64::from(y));
        dot += x * y;
        na += x * x;
        nb += y * y;
    }
    if na == 0.0 || nb == 0.0 {
        return 0.0;
    }
    let sim = dot / (na * nb).sqrt();
    if sim.is_finite() {
        sim.clamp(-1.0, 1.0)
    } else {
        0.0
    }
}

/// Scores every corpus entry against `query`.
///
/// Order: score descending, then identity ascending. Entries whose length
/// differs from the query are excluded and reported.
pub fn rank(query: &[f32], corpus: &BTreeMap<String, Vec<f32>>) -> Ranking {
    let mut ranking = Ranking::default();

    for (identity, vector) in corpus {
        if vector.len() != query.len() {
            ranking.excluded.push(DimensionMismatch {
                identity: identity.clone(),
                got: vector.len(),
                want: query.len(),
            });
            continue;
        }
        ranking.entries.push(RankedEntry {
            identity: identity.clone(),
            score: cosine_similarity(query, vector),
        });
    }

    ranking.entries.sort_by(|a, b| {
        b.score
            .partial_cmp(&a.score)
            .unwrap_or(Ordering::Equal)
            .then_with(|| a.identity.cmp(&b.identity))
    });
    ranking
}

#[cfg(test)]
mod tests {
    use super::*;

    fn corpus(items: Vec<(&str, Vec<f32>)>) -> BTreeMap<String, Vec<f32>> {
        items
            .into_iter()
            .map(|(k, v)| (k.to_string(), v))
            .collect()
    }

    #[test]
    fn self_similarity_is_one_and_symmetric() {
        let a = [0.3f32, -1.2, 4.5, 0.0];
        let b = [1.0f32, 2.0, -0.5, 3.0];
        assert!((cosine_similarity(&a, &a) - 1.0).abs() < 1e-12);
        assert_eq!(cosine_similarity(&a, &b), cosine_similarity(&b, &a));
    }

    #[test]
    fn zero_norm_is_zero() {
        assert_eq!(cosine_similarity(&[0.0, 0.0], &[1.0, 2.0]), 0.0);
        assert_eq!(cosine_similarity(&[0.0, 0.0], &[0.0, 0.0]), 0.0);
    }

    #[test]
    fn opposite_vectors_score_minus_one() {
        assert_eq!(cosine_similarity(&[1.0, 0.0], &[-2.0, 0.0]), -1.0);
    }

    #[test]
    fn alice_before_bob() {
        let c = corpus(vec![("bob.pdf", vec![0.0, 1.0]), ("alice.pdf", vec![1.0, 0.0])]);
        let r = rank(&[1.0, 0.0], &c);
        assert_eq!(
            r.entries,
            vec![
                RankedEntry {
                    identity: "alice.pdf".into(),
                    score: 1.0,
                },
                RankedEntry {
                    identity: "bob.pdf".into(),
                    score: 0.0,
                },
            ]
        );
    }

    #[test]
    fn ties_break_by_identity() {
        let c = corpus(vec![
            ("carol.pdf", vec![2.0, 0.0]),
            ("alice.pdf", vec![1.0, 0.0]),
            ("bob.pdf", vec![5.0, 0.0]),
        ]);
        let ids: Vec<_> = rank(&[1.0, 0.0], &c)
            .entries
            .into_iter()
            .map(|e| e.identity)
            .collect();
        assert_eq!(ids, ["alice.pdf", "bob.pdf", "carol.pdf"]);
    }

    #[test]
    fn ranking_is_a_permutation_of_comparable_entries() {
        let c = corpus(vec![
            ("a", vec![0.1, 0.9, 0.3]),
            ("b", vec![0.5, 0.5, 0.5]),
            ("c", vec![-1.0, 0.2, 0.0]),
            ("d", vec![0.0, 0.0, 0.0]),
        ]);
        let r = rank(&[0.2, 0.4, 0.6], &c);
        let mut ids: Vec<_> = r.entries.iter().map(|e| e.identity.as_str()).collect();
        assert_eq!(ids.len(), 4);
        ids.sort();
        ids.dedup();
        assert_eq!(ids, ["a", "b", "c", "d"]);
        assert!(r.entries.windows(2).all(|w| w[0].score >= w[1].score));
    }

    #[test]
    fn mismatched_entries_are_excluded_not_fatal() {
        let c = corpus(vec![("short.pdf", vec![1.0]), ("ok.pdf", vec![1.0, 1.0])]);
        let r = rank(&[1.0, 0.0], &c);
        assert_eq!(r.entries.len(), 1);
        assert_eq!(r.entries[0].identity, "ok.pdf");
        assert_eq!(
            r.excluded,
            vec![DimensionMismatch { identity: "short.pdf".into(), got: 1, want: 2 }]
        );
    }

    #[test]
    fn empty_corpus_gives_empty_ranking() {
        let r = rank(&[1.0, 0.0], &BTreeMap::new());
        assert!(r.entries.is_empty() && r.excluded.is_empty());
    }
}
