pub mod attempt;
pub mod recommendation;
pub mod task;

pub use attempt::{AttemptRecord, AttemptStatus};
pub use recommendation::{RankedRecommendation, RecommendationsQuery, RecommendationsResponse};
pub use task::{CandidateTask, DifficultyRange, PopularTask};
