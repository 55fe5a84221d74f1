use std::{sync::Arc, time::Instant};

use anyhow::Result;

use crate::{
    config::RecommendationSettings,
    metrics::{record_recommendation, SIMILARITY_DISABLED_TOTAL},
    models::{DifficultyRange, RankedRecommendation},
    stores::{HistoryStore, TaskStore},
};

use super::{
    candidate_selector, cold_start,
    history_analyzer::HistoryProfile,
    ranker,
    similarity::{
        score_candidates, NoopSimilarity, TextSimilarityProvider, TfidfOptions, TfidfSimilarity,
    },
};

/// Picks the next practice tasks for a learner.
///
/// Stateless between calls: every request reads the stores, derives a fresh profile and a fresh
/// similarity space, and returns a computed list. Store failures are returned unchanged.
#[derive(Clone)]
pub struct RecommendationEngine {
    history: Arc<dyn HistoryStore>,
    tasks: Arc<dyn TaskStore>,
    similarity: Arc<dyn TextSimilarityProvider>,
    settings: RecommendationSettings,
}

impl RecommendationEngine {
    pub fn new(
        history: Arc<dyn HistoryStore>,
        tasks: Arc<dyn TaskStore>,
        similarity: Arc<dyn TextSimilarityProvider>,
        settings: RecommendationSettings,
    ) -> Self {
        Self {
            history,
            tasks,
            similarity,
            settings,
        }
    }

    /// Builds the engine with the similarity provider selected by `settings`.
    pub fn from_settings(
        history: Arc<dyn HistoryStore>,
        tasks: Arc<dyn TaskStore>,
        settings: RecommendationSettings,
    ) -> Self {
        let similarity: Arc<dyn TextSimilarityProvider> = if settings.text_similarity_enabled {
            Arc::new(TfidfSimilarity::new(TfidfOptions {
                max_features: settings.vectorizer_max_features,
                min_df: settings.vectorizer_min_df,
                max_df: settings.vectorizer_max_df,
                stop_words: settings.stop_words,
            }))
        } else {
            Arc::new(NoopSimilarity)
        };

        Self::new(history, tasks, similarity, settings)
    }

    pub fn settings(&self) -> &RecommendationSettings {
        &self.settings
    }

    /// Up to `n` recommendations, `n` bounded to `[1, max_count]`.
    pub async fn get_recommendations(
        &self,
        learner_id: i64,
        n: usize,
    ) -> Result<Vec<RankedRecommendation>> {
        let started = Instant::now();
        let n = n.clamp(1, self.settings.max_count.max(1));

        let history = self
            .history
            .fetch_recent_attempts(learner_id, self.settings.history_limit)
            .await?;

        if history.is_empty() {
            tracing::info!(
                "No history for learner={}, serving cold-start recommendations",
                learner_id
            );
            let items = cold_start::recommend(self.tasks.as_ref(), self.cold_start_range(), n).await?;
            record_recommendation("cold_start", started);
            return Ok(items);
        }

        let profile = HistoryProfile::from_history(&history);
        tracing::debug!(
            "Profile for learner={}: subjects={:?}, calibrated_difficulty={:.2}, solved={}",
            learner_id,
            profile.preferred_subjects,
            profile.calibrated_difficulty,
            profile.solved_problems.len()
        );

        let candidates = candidate_selector::select_candidates(
            self.tasks.as_ref(),
            learner_id,
            &profile.preferred_subjects,
        )
        .await?;

        let similarity = if self.settings.text_similarity_enabled {
            let solved: Vec<&str> = profile.solved_problems.iter().map(String::as_str).collect();
            let problems: Vec<&str> = candidates.iter().map(|t| t.problem.as_str()).collect();
            score_candidates(self.similarity.as_ref(), &solved, &problems)
        } else {
            SIMILARITY_DISABLED_TOTAL
                .with_label_values(&["provider_disabled"])
                .inc();
            Vec::new()
        };

        let mut ranked = ranker::rank(&candidates, &profile, &similarity);
        ranked.truncate(n);

        tracing::info!(
            "Ranked {} candidates for learner={}, returning {}",
            candidates.len(),
            learner_id,
            ranked.len()
        );
        record_recommendation("ranked", started);
        Ok(ranked)
    }

    fn cold_start_range(&self) -> DifficultyRange {
        DifficultyRange::new(
            self.settings.cold_start_min_difficulty,
            self.settings.cold_start_max_difficulty,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        models::{AttemptRecord, AttemptStatus, CandidateTask, PopularTask},
        stores::InMemoryStore,
    };
    use async_trait::async_trait;
    use chrono::Utc;

    struct UnavailableStore;

    #[async_trait]
    impl HistoryStore for UnavailableStore {
        async fn fetch_recent_attempts(&self, _: i64, _: usize) -> Result<Vec<AttemptRecord>> {
            Err(anyhow::anyhow!("history store unavailable"))
        }
    }

    #[async_trait]
    impl TaskStore for UnavailableStore {
        async fn fetch_unsolved(
            &self,
            _: i64,
            _: Option<&[String]>,
        ) -> Result<Vec<CandidateTask>> {
            Err(anyhow::anyhow!("task store unavailable"))
        }

        async fn fetch_popularity_ranked(
            &self,
            _: DifficultyRange,
            _: usize,
        ) -> Result<Vec<PopularTask>> {
            Err(anyhow::anyhow!("task store unavailable"))
        }
    }

    fn task(id: i64, subject: &str, difficulty: i32) -> CandidateTask {
        CandidateTask {
            id,
            subject: subject.to_string(),
            problem: format!("{} problem number {}", subject, id),
            solution: String::new(),
            answer: String::new(),
            difficulty,
        }
    }

    #[tokio::test]
    async fn history_store_failure_propagates() {
        let store = Arc::new(UnavailableStore);
        let engine = RecommendationEngine::from_settings(
            store.clone(),
            store,
            RecommendationSettings::default(),
        );
        let err = engine.get_recommendations(1, 5).await.unwrap_err();
        assert!(err.to_string().contains("history store unavailable"));
    }

    #[tokio::test]
    async fn task_store_failure_propagates() {
        let history = Arc::new(InMemoryStore::new());
        history.insert_task(task(1, "algebra", 2)).await;
        history
            .record_attempt(1, 1, AttemptStatus::Solved, Some(1.0), Utc::now())
            .await;

        let engine = RecommendationEngine::from_settings(
            history,
            Arc::new(UnavailableStore),
            RecommendationSettings::default(),
        );
        let err = engine.get_recommendations(1, 5).await.unwrap_err();
        assert!(err.to_string().contains("task store unavailable"));
    }

    #[tokio::test]
    async fn count_is_bounded() {
        let store = Arc::new(InMemoryStore::new());
        for id in 1..=60 {
            store.insert_task(task(id, "algebra", 2)).await;
        }
        let engine =
            RecommendationEngine::from_settings(store.clone(), store, RecommendationSettings::default());

        assert_eq!(engine.get_recommendations(2, 0).await.unwrap().len(), 1);
        // cold start over 60 medium tasks, capped at 50
        assert_eq!(engine.get_recommendations(2, 500).await.unwrap().len(), 50);
    }

    #[tokio::test]
    async fn disabled_similarity_still_ranks() {
        let store = Arc::new(InMemoryStore::new());
        for id in 1..=4 {
            store.insert_task(task(id, "algebra", id as i32)).await;
        }
        store
            .record_attempt(1, 3, AttemptStatus::Solved, Some(1.0), Utc::now())
            .await;

        let settings = RecommendationSettings {
            text_similarity_enabled: false,
            ..RecommendationSettings::default()
        };
        let engine = RecommendationEngine::from_settings(store.clone(), store, settings);
        let items = engine.get_recommendations(1, 3).await.unwrap();

        assert_eq!(items.len(), 3);
        assert!(items.iter().all(|r| r.id != 3));
        // difficulty 2 and 4 tie on distance; task id order breaks it
        assert_eq!(items.iter().map(|r| r.id).collect::<Vec<_>>(), vec![2, 4, 1]);
    }
}
