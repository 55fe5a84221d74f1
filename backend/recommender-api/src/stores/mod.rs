//! Collaborator contracts the recommendation engine reads from.
//!
//! Failures are infrastructure errors and are returned as-is; the engine does not retry them.

pub mod memory;
pub mod mongo;

use anyhow::Result;
use async_trait::async_trait;

use crate::models::{AttemptRecord, CandidateTask, DifficultyRange, PopularTask};

pub use memory::InMemoryStore;
pub use mongo::{MongoHistoryStore, MongoTaskStore};

#[async_trait]
pub trait HistoryStore: Send + Sync {
    /// Most recent attempts of `learner_id`, newest first, joined with task metadata.
    async fn fetch_recent_attempts(&self, learner_id: i64, limit: usize)
        -> Result<Vec<AttemptRecord>>;
}

#[async_trait]
pub trait TaskStore: Send + Sync {
    /// Tasks the learner has never attempted, ordered by task id. When `subjects` is given only
    /// tasks in those subjects are returned.
    async fn fetch_unsolved(
        &self,
        learner_id: i64,
        subjects: Option<&[String]>,
    ) -> Result<Vec<CandidateTask>>;

    /// Tasks within `difficulty` (inclusive), ordered by global solved count descending, then
    /// difficulty ascending, then task id.
    async fn fetch_popularity_ranked(
        &self,
        difficulty: DifficultyRange,
        limit: usize,
    ) -> Result<Vec<PopularTask>>;
}
