use crate::models::{AttemptRecord, AttemptStatus};

const SOLVED_WEIGHT: f64 = 1.5;
const ATTEMPTED_WEIGHT: f64 = 0.7;
const OTHER_WEIGHT: f64 = 1.0;

const PREFERRED_SUBJECTS: usize = 3;
const MASTERY_SCORE: f64 = 0.7;
const MIN_MASTERY_WEIGHT: f64 = 0.01;
/// Midpoint of the 1-5 difficulty scale.
pub const DEFAULT_DIFFICULTY: f64 = 2.5;

/// What the engine learns about a learner from their recent attempts.
#[derive(Debug, Clone, PartialEq)]
pub struct HistoryProfile {
    pub preferred_subjects: Vec<String>,
    pub calibrated_difficulty: f64,
    pub solved_problems: Vec<String>,
}

impl HistoryProfile {
    pub fn from_history(history: &[AttemptRecord]) -> Self {
        Self {
            preferred_subjects: preferred_subjects(history),
            calibrated_difficulty: calibrated_difficulty(history),
            solved_problems: solved_problems(history),
        }
    }

    pub fn prefers(&self, subject: &str) -> bool {
        self.preferred_subjects.iter().any(|s| s == subject)
    }
}

fn status_weight(status: &AttemptStatus) -> f64 {
    match status {
        AttemptStatus::Solved => SOLVED_WEIGHT,
        AttemptStatus::Attempted => ATTEMPTED_WEIGHT,
        AttemptStatus::Other(_) => OTHER_WEIGHT,
    }
}

/// Top subjects by accumulated `score * status weight`. Ties keep first-seen order.
pub fn preferred_subjects(history: &[AttemptRecord]) -> Vec<String> {
    let mut totals: Vec<(&str, f64)> = Vec::new();
    for attempt in history {
        let value = attempt.effective_score() * status_weight(&attempt.status);
        match totals.iter_mut().find(|(subject, _)| *subject == attempt.subject) {
            Some((_, total)) => *total += value,
            None => totals.push((attempt.subject.as_str(), value)),
        }
    }

    // stable sort keeps insertion order among equal totals
    totals.sort_by(|a, b| b.1.total_cmp(&a.1));
    totals
        .into_iter()
        .take(PREFERRED_SUBJECTS)
        .map(|(subject, _)| subject.to_string())
        .collect()
}

/// Score-weighted mean difficulty of mastered attempts (solved, or score above 0.7).
pub fn calibrated_difficulty(history: &[AttemptRecord]) -> f64 {
    let (weighted, total_weight) = history
        .iter()
        .filter(|attempt| attempt.status.is_solved() || attempt.effective_score() > MASTERY_SCORE)
        .fold((0.0, 0.0), |(weighted, total), attempt| {
            let weight = attempt.effective_score().max(MIN_MASTERY_WEIGHT);
            (
                weighted + f64::from(attempt.difficulty) * weight,
                total + weight,
            )
        });

    if total_weight > 0.0 {
        weighted / total_weight
    } else {
        DEFAULT_DIFFICULTY
    }
}

pub fn solved_problems(history: &[AttemptRecord]) -> Vec<String> {
    history
        .iter()
        .filter(|attempt| attempt.status.is_solved())
        .map(|attempt| attempt.problem.clone())
        .collect()
}
