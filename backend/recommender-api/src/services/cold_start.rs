use anyhow::Result;

use crate::{
    models::{DifficultyRange, RankedRecommendation},
    stores::TaskStore,
};

pub const COLD_START_RELEVANCE: f64 = 0.5;
pub const COLD_START_REASON: &str = "popular medium-difficulty task";

/// Recommendations for a learner without history: the most solved tasks of medium difficulty,
/// all carrying a fixed relevance.
pub async fn recommend(
    store: &dyn TaskStore,
    difficulty: DifficultyRange,
    n: usize,
) -> Result<Vec<RankedRecommendation>> {
    let popular = store
        .fetch_popularity_ranked(difficulty, n.saturating_mul(2))
        .await?;

    Ok(popular
        .iter()
        .take(n)
        .map(|entry| {
            RankedRecommendation::from_task(
                &entry.task,
                COLD_START_RELEVANCE,
                COLD_START_REASON.to_string(),
            )
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        models::{AttemptStatus, CandidateTask},
        stores::InMemoryStore,
    };
    use chrono::Utc;

    async fn seeded() -> InMemoryStore {
        let store = InMemoryStore::new();
        for (id, difficulty) in [(1, 1), (2, 2), (3, 3), (4, 4), (5, 3), (6, 2)] {
            store
                .insert_task(CandidateTask {
                    id,
                    subject: "algebra".to_string(),
                    problem: format!("problem {}", id),
                    solution: String::new(),
                    answer: String::new(),
                    difficulty,
                })
                .await;
        }
        let now = Utc::now();
        for learner in [10, 11, 12] {
            store
                .record_attempt(learner, 5, AttemptStatus::Solved, Some(1.0), now)
                .await;
        }
        store
            .record_attempt(10, 3, AttemptStatus::Solved, Some(1.0), now)
            .await;
        store
            .record_attempt(10, 4, AttemptStatus::Solved, Some(1.0), now)
            .await;
        store
    }

    #[tokio::test]
    async fn returns_popular_medium_tasks_with_fixed_score() {
        let store = seeded().await;
        let items = recommend(&store, DifficultyRange::new(2, 3), 3).await.unwrap();

        assert_eq!(items.iter().map(|r| r.id).collect::<Vec<_>>(), vec![5, 3, 2]);
        assert!(items.iter().all(|r| r.relevance_score == COLD_START_RELEVANCE));
        assert!(items.iter().all(|r| r.match_reason == COLD_START_REASON));
    }

    #[tokio::test]
    async fn returns_what_is_available_when_short() {
        let store = seeded().await;
        let items = recommend(&store, DifficultyRange::new(2, 3), 10).await.unwrap();
        assert_eq!(items.len(), 4);
        assert!(items.iter().all(|r| (2.0..=3.0).contains(&r.difficulty)));
    }
}
