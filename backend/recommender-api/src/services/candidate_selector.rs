use anyhow::Result;

use crate::{metrics::CANDIDATE_POOL_WIDENED_TOTAL, models::CandidateTask, stores::TaskStore};

/// Tasks the learner has never attempted, restricted to `preferred_subjects` when that yields
/// anything, otherwise the whole unsolved pool.
pub async fn select_candidates(
    store: &dyn TaskStore,
    learner_id: i64,
    preferred_subjects: &[String],
) -> Result<Vec<CandidateTask>> {
    if !preferred_subjects.is_empty() {
        let preferred = store
            .fetch_unsolved(learner_id, Some(preferred_subjects))
            .await?;
        if !preferred.is_empty() {
            return Ok(preferred);
        }

        tracing::debug!(
            "No unsolved tasks in preferred subjects {:?} for learner={}, widening pool",
            preferred_subjects,
            learner_id
        );
        CANDIDATE_POOL_WIDENED_TOTAL.inc();
    }

    store.fetch_unsolved(learner_id, None).await
}
