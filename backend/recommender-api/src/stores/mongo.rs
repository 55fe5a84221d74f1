use anyhow::{Context, Result};
use async_trait::async_trait;
use futures::TryStreamExt;
use mongodb::{
    bson::{doc, from_document, Bson, DateTime as BsonDateTime, Document},
    Collection, Database,
};
use serde::Deserialize;

use super::{HistoryStore, TaskStore};
use crate::{
    metrics::track_db_operation,
    models::{AttemptRecord, AttemptStatus, CandidateTask, DifficultyRange, PopularTask},
    utils::time::bson_to_chrono,
};

pub const TASKS_COLLECTION: &str = "tasks";
pub const HISTORY_COLLECTION: &str = "task_history";

/// Row produced by the history aggregation (attempt joined with its task).
#[derive(Debug, Deserialize)]
struct AttemptRow {
    task_id: i64,
    status: String,
    #[serde(default)]
    score: Option<f64>,
    subject: String,
    difficulty: i32,
    #[serde(default)]
    problem: Option<String>,
    timestamp: BsonDateTime,
}

impl From<AttemptRow> for AttemptRecord {
    fn from(row: AttemptRow) -> Self {
        AttemptRecord {
            task_id: row.task_id,
            status: AttemptStatus::parse(&row.status),
            score: row.score,
            subject: row.subject,
            difficulty: row.difficulty,
            problem: row.problem.unwrap_or_default(),
            timestamp: bson_to_chrono(row.timestamp),
        }
    }
}

pub struct MongoHistoryStore {
    mongo: Database,
}

impl MongoHistoryStore {
    pub fn new(mongo: Database) -> Self {
        Self { mongo }
    }

    fn history(&self) -> Collection<Document> {
        self.mongo.collection(HISTORY_COLLECTION)
    }
}

#[async_trait]
impl HistoryStore for MongoHistoryStore {
    async fn fetch_recent_attempts(
        &self,
        learner_id: i64,
        limit: usize,
    ) -> Result<Vec<AttemptRecord>> {
        let pipeline = vec![
            doc! { "$match": { "user_id": learner_id } },
            doc! { "$sort": { "timestamp": -1, "_id": -1 } },
            doc! { "$lookup": {
                "from": TASKS_COLLECTION,
                "localField": "task_id",
                "foreignField": "_id",
                "as": "task"
            } },
            doc! { "$unwind": "$task" },
            doc! { "$limit": limit as i64 },
            doc! { "$project": {
                "_id": 0,
                "task_id": 1,
                "status": 1,
                "score": 1,
                "timestamp": 1,
                "subject": "$task.subject",
                "difficulty": "$task.difficulty",
                "problem": "$task.problem"
            } },
        ];

        track_db_operation("aggregate", HISTORY_COLLECTION, async {
            let documents: Vec<Document> = self
                .history()
                .aggregate(pipeline)
                .await
                .context("Failed to query learner history")?
                .try_collect()
                .await
                .context("Learner history cursor failure")?;

            documents
                .into_iter()
                .map(|document| {
                    from_document::<AttemptRow>(document)
                        .map(AttemptRecord::from)
                        .context("Malformed learner history row")
                })
                .collect()
        })
        .await
    }
}

pub struct MongoTaskStore {
    mongo: Database,
}

impl MongoTaskStore {
    pub fn new(mongo: Database) -> Self {
        Self { mongo }
    }

    fn tasks(&self) -> Collection<CandidateTask> {
        self.mongo.collection(TASKS_COLLECTION)
    }

    async fn attempted_task_ids(&self, learner_id: i64) -> Result<Vec<Bson>> {
        track_db_operation("distinct", HISTORY_COLLECTION, async {
            self.mongo
                .collection::<Document>(HISTORY_COLLECTION)
                .distinct("task_id", doc! { "user_id": learner_id })
                .await
                .context("Failed to load attempted task ids")
        })
        .await
    }
}

#[async_trait]
impl TaskStore for MongoTaskStore {
    async fn fetch_unsolved(
        &self,
        learner_id: i64,
        subjects: Option<&[String]>,
    ) -> Result<Vec<CandidateTask>> {
        let attempted = self.attempted_task_ids(learner_id).await?;

        let mut filter = doc! { "_id": { "$nin": attempted } };
        if let Some(subjects) = subjects {
            filter.insert("subject", doc! { "$in": subjects.to_vec() });
        }

        track_db_operation("find", TASKS_COLLECTION, async {
            self.tasks()
                .find(filter)
                .sort(doc! { "_id": 1 })
                .await
                .context("Failed to query unsolved tasks")?
                .try_collect::<Vec<CandidateTask>>()
                .await
                .context("Unsolved tasks cursor failure")
        })
        .await
    }

    async fn fetch_popularity_ranked(
        &self,
        difficulty: DifficultyRange,
        limit: usize,
    ) -> Result<Vec<PopularTask>> {
        let pipeline = vec![
            doc! { "$match": { "difficulty": { "$gte": difficulty.min, "$lte": difficulty.max } } },
            doc! { "$lookup": {
                "from": HISTORY_COLLECTION,
                "let": { "task_id": "$_id" },
                "pipeline": [
                    { "$match": { "$expr": { "$and": [
                        { "$eq": ["$task_id", "$$task_id"] },
                        { "$eq": ["$status", "solved"] }
                    ] } } },
                    { "$count": "count" }
                ],
                "as": "solved"
            } },
            doc! { "$addFields": {
                "solved_count": { "$ifNull": [{ "$arrayElemAt": ["$solved.count", 0] }, 0] }
            } },
            doc! { "$project": { "solved": 0 } },
            doc! { "$sort": { "solved_count": -1, "difficulty": 1, "_id": 1 } },
            doc! { "$limit": limit as i64 },
        ];

        track_db_operation("aggregate", TASKS_COLLECTION, async {
            let documents: Vec<Document> = self
                .mongo
                .collection::<Document>(TASKS_COLLECTION)
                .aggregate(pipeline)
                .await
                .context("Failed to query popular tasks")?
                .try_collect()
                .await
                .context("Popular tasks cursor failure")?;

            documents
                .into_iter()
                .map(|document| {
                    from_document::<PopularTask>(document).context("Malformed popular task row")
                })
                .collect()
        })
        .await
    }
}
