use serde::{Deserialize, Serialize};
use validator::Validate;

use super::task::CandidateTask;

/// Computed view of a task for one learner. Never persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedRecommendation {
    pub id: i64,
    pub subject: String,
    pub problem: String,
    pub difficulty: f64,
    pub relevance_score: f64,
    pub match_reason: String,
}

impl RankedRecommendation {
    pub fn from_task(task: &CandidateTask, relevance_score: f64, match_reason: String) -> Self {
        Self {
            id: task.id,
            subject: task.subject.clone(),
            problem: task.problem.clone(),
            difficulty: f64::from(task.difficulty),
            relevance_score,
            match_reason,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct RecommendationsResponse {
    pub items: Vec<RankedRecommendation>,
}

/// Query string of the recommendations endpoint. A missing `n` uses the configured default.
#[derive(Debug, Deserialize, Validate)]
pub struct RecommendationsQuery {
    #[validate(range(min = 1, max = 50))]
    pub n: Option<usize>,
}
