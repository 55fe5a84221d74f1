use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Outcome of a learner's attempt, as recorded by the history store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AttemptStatus {
    Solved,
    Attempted,
    #[serde(untagged)]
    Other(String),
}

impl AttemptStatus {
    pub fn as_str(&self) -> &str {
        match self {
            AttemptStatus::Solved => "solved",
            AttemptStatus::Attempted => "attempted",
            AttemptStatus::Other(value) => value.as_str(),
        }
    }

    pub fn parse(value: &str) -> Self {
        match value {
            "solved" => AttemptStatus::Solved,
            "attempted" => AttemptStatus::Attempted,
            other => AttemptStatus::Other(other.to_string()),
        }
    }

    pub fn is_solved(&self) -> bool {
        matches!(self, AttemptStatus::Solved)
    }
}

/// One past attempt joined with the metadata of the attempted task.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AttemptRecord {
    pub task_id: i64,
    pub status: AttemptStatus,
    pub score: Option<f64>,
    pub subject: String,
    pub difficulty: i32,
    pub problem: String,
    pub timestamp: DateTime<Utc>,
}

impl AttemptRecord {
    /// Score with a missing value treated as zero.
    pub fn effective_score(&self) -> f64 {
        self.score.unwrap_or(0.0)
    }
}
