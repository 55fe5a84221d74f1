//! Textual similarity between candidate problems and a learner's solved problems.
//!
//! The engine depends only on [`TextSimilarityProvider`]. A provider failure never reaches the
//! caller: [`score_candidates`] turns it into "similarity disabled" and every candidate scores 0.0.

pub mod stop_words;
pub mod tfidf;

use thiserror::Error;

use crate::metrics::SIMILARITY_DISABLED_TOTAL;

pub use stop_words::StopWords;
pub use tfidf::{TfidfOptions, TfidfSimilarity};

/// Smallest solved corpus the similarity feature is attempted on.
pub const MIN_SOLVED_DOCUMENTS: usize = 2;

#[derive(Debug, Error)]
pub enum SimilarityError {
    #[error("solved corpus is empty")]
    EmptyCorpus,
    #[error("max_df corresponds to {max_doc_count} documents, fewer than min_df = {min_df}")]
    DocumentFrequencyBounds { max_doc_count: f64, min_df: usize },
    #[error("no terms remain after document frequency pruning")]
    EmptyVocabulary,
    #[error("provider returned {actual} scores for {expected} candidates")]
    ScoreCountMismatch { expected: usize, actual: usize },
}

pub trait TextSimilarityProvider: Send + Sync {
    fn name(&self) -> &'static str;

    /// One score in `[0, 1]` per candidate: the best match against any solved text.
    fn score(&self, solved: &[&str], candidates: &[&str]) -> Result<Vec<f64>, SimilarityError>;
}

/// Provider used when text similarity is switched off.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopSimilarity;

impl TextSimilarityProvider for NoopSimilarity {
    fn name(&self) -> &'static str {
        "noop"
    }

    fn score(&self, _solved: &[&str], candidates: &[&str]) -> Result<Vec<f64>, SimilarityError> {
        Ok(vec![0.0; candidates.len()])
    }
}

/// Scores every candidate, degrading to all zeros when the corpus is too small or the provider
/// fails.
pub fn score_candidates(
    provider: &dyn TextSimilarityProvider,
    solved: &[&str],
    candidates: &[&str],
) -> Vec<f64> {
    if candidates.is_empty() {
        return Vec::new();
    }

    if solved.len() < MIN_SOLVED_DOCUMENTS {
        tracing::debug!(
            "Text similarity disabled: {} solved problems, need {}",
            solved.len(),
            MIN_SOLVED_DOCUMENTS
        );
        SIMILARITY_DISABLED_TOTAL
            .with_label_values(&["corpus_too_small"])
            .inc();
        return vec![0.0; candidates.len()];
    }

    let result = provider.score(solved, candidates).and_then(|scores| {
        if scores.len() == candidates.len() {
            Ok(scores)
        } else {
            Err(SimilarityError::ScoreCountMismatch {
                expected: candidates.len(),
                actual: scores.len(),
            })
        }
    });

    match result {
        Ok(scores) => scores
            .into_iter()
            .map(|s| if s.is_finite() { s.clamp(0.0, 1.0) } else { 0.0 })
            .collect(),
        Err(err) => {
            tracing::debug!(
                "Text similarity disabled for this request ({}): {}",
                provider.name(),
                err
            );
            SIMILARITY_DISABLED_TOTAL
                .with_label_values(&["fit_failed"])
                .inc();
            vec![0.0; candidates.len()]
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FailingProvider;

    impl TextSimilarityProvider for FailingProvider {
        fn name(&self) -> &'static str {
            "failing"
        }

        fn score(&self, _: &[&str], _: &[&str]) -> Result<Vec<f64>, SimilarityError> {
            Err(SimilarityError::EmptyVocabulary)
        }
    }

    struct ShortProvider;

    impl TextSimilarityProvider for ShortProvider {
        fn name(&self) -> &'static str {
            "short"
        }

        fn score(&self, _: &[&str], _: &[&str]) -> Result<Vec<f64>, SimilarityError> {
            Ok(vec![0.9])
        }
    }

    struct ConstantProvider(f64);

    impl TextSimilarityProvider for ConstantProvider {
        fn name(&self) -> &'static str {
            "constant"
        }

        fn score(&self, _: &[&str], candidates: &[&str]) -> Result<Vec<f64>, SimilarityError> {
            Ok(vec![self.0; candidates.len()])
        }
    }

    #[test]
    fn corpus_with_fewer_than_two_documents_scores_zero() {
        let provider = ConstantProvider(0.9);
        assert_eq!(score_candidates(&provider, &[], &["a", "b"]), vec![0.0, 0.0]);
        assert_eq!(
            score_candidates(&provider, &["only one"], &["a", "b"]),
            vec![0.0, 0.0]
        );
        assert_eq!(
            score_candidates(&provider, &["one", "two"], &["a"]),
            vec![0.9]
        );
    }

    #[test]
    fn provider_failure_degrades_to_zero() {
        let scores = score_candidates(&FailingProvider, &["a b", "c d"], &["x", "y", "z"]);
        assert_eq!(scores, vec![0.0; 3]);
    }

    #[test]
    fn mismatched_score_count_degrades_to_zero() {
        let scores = score_candidates(&ShortProvider, &["a b", "c d"], &["x", "y"]);
        assert_eq!(scores, vec![0.0, 0.0]);
    }

    #[test]
    fn scores_are_clamped_into_unit_interval() {
        let scores = score_candidates(&ConstantProvider(1.3), &["a", "b"], &["x"]);
        assert_eq!(scores, vec![1.0]);
        let scores = score_candidates(&ConstantProvider(f64::NAN), &["a", "b"], &["x"]);
        assert_eq!(scores, vec![0.0]);
    }

    #[test]
    fn noop_provider_returns_zero_per_candidate() {
        let scores = NoopSimilarity.score(&["a", "b"], &["x", "y"]).unwrap();
        assert_eq!(scores, vec![0.0, 0.0]);
    }

    #[test]
    fn degenerate_tfidf_corpus_degrades_to_zero() {
        // two documents cannot satisfy min_df = 2 under max_df = 0.8
        let scores = score_candidates(
            &TfidfSimilarity::default(),
            &["квадратное уравнение", "квадратное неравенство"],
            &["квадратное уравнение"],
        );
        assert_eq!(scores, vec![0.0]);
    }
}
