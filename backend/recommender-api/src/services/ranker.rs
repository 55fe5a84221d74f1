use crate::models::{CandidateTask, RankedRecommendation};

use super::history_analyzer::HistoryProfile;

const DIFFICULTY_WEIGHT: f64 = 0.4;
const SUBJECT_WEIGHT: f64 = 0.3;
const SIMILARITY_WEIGHT: f64 = 0.3;

const PREFERRED_SUBJECT_SCORE: f64 = 1.5;
const OTHER_SUBJECT_SCORE: f64 = 1.0;

const OPTIMAL_DIFFICULTY_THRESHOLD: f64 = 0.7;
const PREFERRED_SUBJECT_THRESHOLD: f64 = 1.2;
const SIMILARITY_THRESHOLD: f64 = 0.5;

pub const REASON_OPTIMAL_DIFFICULTY: &str = "optimal difficulty";
pub const REASON_PREFERRED_SUBJECT: &str = "preferred subject";
pub const REASON_SIMILAR: &str = "similar to a solved problem";
pub const REASON_NEW_CHALLENGE: &str = "new challenge";

/// The three factors behind a candidate's relevance.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoreBreakdown {
    pub difficulty: f64,
    pub subject: f64,
    pub similarity: f64,
}

impl ScoreBreakdown {
    pub fn relevance(&self) -> f64 {
        DIFFICULTY_WEIGHT * self.difficulty
            + SUBJECT_WEIGHT * self.subject
            + SIMILARITY_WEIGHT * self.similarity
    }

    pub fn match_reason(&self) -> String {
        let mut reasons = Vec::new();
        if self.difficulty > OPTIMAL_DIFFICULTY_THRESHOLD {
            reasons.push(REASON_OPTIMAL_DIFFICULTY);
        }
        if self.subject > PREFERRED_SUBJECT_THRESHOLD {
            reasons.push(REASON_PREFERRED_SUBJECT);
        }
        if self.similarity > SIMILARITY_THRESHOLD {
            reasons.push(REASON_SIMILAR);
        }

        if reasons.is_empty() {
            REASON_NEW_CHALLENGE.to_string()
        } else {
            reasons.join(" and ")
        }
    }
}

/// 1.0 on an exact match, decaying with distance from the calibrated difficulty.
pub fn difficulty_score(difficulty: f64, calibrated: f64) -> f64 {
    1.0 / (1.0 + (difficulty - calibrated).abs())
}

pub fn subject_score(subject: &str, profile: &HistoryProfile) -> f64 {
    if profile.prefers(subject) {
        PREFERRED_SUBJECT_SCORE
    } else {
        OTHER_SUBJECT_SCORE
    }
}

pub fn score(task: &CandidateTask, profile: &HistoryProfile, similarity: f64) -> ScoreBreakdown {
    ScoreBreakdown {
        difficulty: difficulty_score(f64::from(task.difficulty), profile.calibrated_difficulty),
        subject: subject_score(&task.subject, profile),
        similarity,
    }
}

/// Scores and sorts `candidates` by relevance, highest first. `similarity` is indexed like
/// `candidates`; missing entries count as 0.0. Equal relevance keeps the candidate order.
pub fn rank(
    candidates: &[CandidateTask],
    profile: &HistoryProfile,
    similarity: &[f64],
) -> Vec<RankedRecommendation> {
    let mut ranked: Vec<RankedRecommendation> = candidates
        .iter()
        .enumerate()
        .map(|(index, task)| {
            let breakdown = score(task, profile, similarity.get(index).copied().unwrap_or(0.0));
            RankedRecommendation::from_task(task, breakdown.relevance(), breakdown.match_reason())
        })
        .collect();

    ranked.sort_by(|a, b| b.relevance_score.total_cmp(&a.relevance_score));
    ranked
}
