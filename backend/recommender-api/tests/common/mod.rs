#![allow(dead_code)]

use std::sync::Arc;

use axum::Router;
use chrono::{DateTime, Duration, Utc};
use recommender_api::{
    config::{Config, RecommendationSettings},
    create_router,
    models::{AttemptStatus, CandidateTask},
    services::AppState,
    stores::InMemoryStore,
    RecommendationEngine,
};

pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_max_level(tracing::Level::DEBUG)
        .try_init();
}

pub fn test_config() -> Config {
    Config {
        mongo_uri: "mongodb://localhost:27017".to_string(),
        mongo_database: "recommender_test".to_string(),
        bind_addr: "127.0.0.1:0".to_string(),
        recommendation: RecommendationSettings::default(),
    }
}

pub fn task(id: i64, subject: &str, difficulty: i32, problem: &str) -> CandidateTask {
    CandidateTask {
        id,
        subject: subject.to_string(),
        problem: problem.to_string(),
        solution: format!("solution {}", id),
        answer: format!("answer {}", id),
        difficulty,
    }
}

/// Base instant for seeded attempts; `minutes_ago(n)` orders history deterministically.
pub fn minutes_ago(minutes: i64) -> DateTime<Utc> {
    DateTime::from_timestamp(1_700_000_000, 0).unwrap() - Duration::minutes(minutes)
}

pub async fn seed_attempt(
    store: &InMemoryStore,
    learner_id: i64,
    task_id: i64,
    status: AttemptStatus,
    score: Option<f64>,
    minutes: i64,
) {
    store
        .record_attempt(learner_id, task_id, status, score, minutes_ago(minutes))
        .await;
}

pub fn engine(store: Arc<InMemoryStore>) -> RecommendationEngine {
    RecommendationEngine::from_settings(store.clone(), store, RecommendationSettings::default())
}

pub fn create_test_app(store: Arc<InMemoryStore>) -> Router {
    init_tracing();
    let state = Arc::new(AppState::with_stores(test_config(), store.clone(), store));
    create_router(state)
}
