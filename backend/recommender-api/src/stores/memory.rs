use std::collections::{HashMap, HashSet};

use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;

use super::{HistoryStore, TaskStore};
use crate::models::{AttemptRecord, AttemptStatus, CandidateTask, DifficultyRange, PopularTask};

#[derive(Debug, Clone)]
struct StoredAttempt {
    learner_id: i64,
    task_id: i64,
    status: AttemptStatus,
    score: Option<f64>,
    timestamp: DateTime<Utc>,
}

#[derive(Debug, Default)]
struct Inner {
    tasks: Vec<CandidateTask>,
    attempts: Vec<StoredAttempt>,
}

/// Process-local task and history store with the same ordering guarantees as the MongoDB one.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    inner: RwLock<Inner>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn insert_task(&self, task: CandidateTask) {
        let mut inner = self.inner.write().await;
        inner.tasks.retain(|existing| existing.id != task.id);
        inner.tasks.push(task);
        inner.tasks.sort_by_key(|t| t.id);
    }

    pub async fn record_attempt(
        &self,
        learner_id: i64,
        task_id: i64,
        status: AttemptStatus,
        score: Option<f64>,
        timestamp: DateTime<Utc>,
    ) {
        self.inner.write().await.attempts.push(StoredAttempt {
            learner_id,
            task_id,
            status,
            score,
            timestamp,
        });
    }

    async fn attempted_by(&self, learner_id: i64) -> HashSet<i64> {
        self.inner
            .read()
            .await
            .attempts
            .iter()
            .filter(|a| a.learner_id == learner_id)
            .map(|a| a.task_id)
            .collect()
    }
}

#[async_trait]
impl HistoryStore for InMemoryStore {
    async fn fetch_recent_attempts(
        &self,
        learner_id: i64,
        limit: usize,
    ) -> Result<Vec<AttemptRecord>> {
        let inner = self.inner.read().await;
        let tasks: HashMap<i64, &CandidateTask> = inner.tasks.iter().map(|t| (t.id, t)).collect();

        let mut attempts: Vec<&StoredAttempt> = inner
            .attempts
            .iter()
            .filter(|a| a.learner_id == learner_id)
            .collect();
        attempts.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));

        // attempts on deleted tasks drop out of the join before the limit applies
        Ok(attempts
            .into_iter()
            .filter_map(|a| {
                tasks.get(&a.task_id).map(|task| AttemptRecord {
                    task_id: a.task_id,
                    status: a.status.clone(),
                    score: a.score,
                    subject: task.subject.clone(),
                    difficulty: task.difficulty,
                    problem: task.problem.clone(),
                    timestamp: a.timestamp,
                })
            })
            .take(limit)
            .collect())
    }
}

#[async_trait]
impl TaskStore for InMemoryStore {
    async fn fetch_unsolved(
        &self,
        learner_id: i64,
        subjects: Option<&[String]>,
    ) -> Result<Vec<CandidateTask>> {
        let attempted = self.attempted_by(learner_id).await;
        let inner = self.inner.read().await;

        Ok(inner
            .tasks
            .iter()
            .filter(|task| !attempted.contains(&task.id))
            .filter(|task| subjects.map_or(true, |s| s.contains(&task.subject)))
            .cloned()
            .collect())
    }

    async fn fetch_popularity_ranked(
        &self,
        difficulty: DifficultyRange,
        limit: usize,
    ) -> Result<Vec<PopularTask>> {
        let inner = self.inner.read().await;
        let mut solved_counts: HashMap<i64, i64> = HashMap::new();
        for attempt in inner.attempts.iter().filter(|a| a.status.is_solved()) {
            *solved_counts.entry(attempt.task_id).or_insert(0) += 1;
        }

        let mut ranked: Vec<PopularTask> = inner
            .tasks
            .iter()
            .filter(|task| difficulty.contains(task.difficulty))
            .map(|task| PopularTask {
                task: task.clone(),
                solved_count: solved_counts.get(&task.id).copied().unwrap_or(0),
            })
            .collect();
        ranked.sort_by(|a, b| {
            b.solved_count
                .cmp(&a.solved_count)
                .then_with(|| a.task.difficulty.cmp(&b.task.difficulty))
                .then_with(|| a.task.id.cmp(&b.task.id))
        });
        ranked.truncate(limit);
        Ok(ranked)
    }
}
