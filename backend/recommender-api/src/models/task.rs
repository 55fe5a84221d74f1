use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CandidateTask {
    #[serde(rename = "_id")]
    pub id: i64,
    pub subject: String,
    #[serde(default)]
    pub problem: String,
    #[serde(default)]
    pub solution: String,
    #[serde(default)]
    pub answer: String,
    pub difficulty: i32,
}

/// Candidate annotated with how many times any learner has solved it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PopularTask {
    #[serde(flatten)]
    pub task: CandidateTask,
    #[serde(default)]
    pub solved_count: i64,
}

/// Inclusive difficulty bounds used by the cold-start query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DifficultyRange {
    pub min: i32,
    pub max: i32,
}

impl DifficultyRange {
    pub fn new(min: i32, max: i32) -> Self {
        Self { min, max }
    }

    pub fn contains(&self, difficulty: i32) -> bool {
        difficulty >= self.min && difficulty <= self.max
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn difficulty_range_is_inclusive() {
        let range = DifficultyRange::new(2, 3);
        assert!(!range.contains(1));
        assert!(range.contains(2));
        assert!(range.contains(3));
        assert!(!range.contains(4));
    }

    #[test]
    fn candidate_task_reads_mongo_id_field() {
        let task: CandidateTask = serde_json::from_value(serde_json::json!({
            "_id": 7,
            "subject": "algebra",
            "problem": "Solve x + 1 = 2",
            "difficulty": 2
        }))
        .unwrap();
        assert_eq!(task.id, 7);
        assert!(task.solution.is_empty());
    }
}
