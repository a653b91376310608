//! NR-01 Psychosocial Risk Engine — deterministic, rule-based scoring.
//!
//! Turns Likert questionnaire responses plus question metadata into per-category
//! scores, a weighted overall risk, a risk level (baixo/medio/alto/critico) and
//! the categories flagged as critical. Results feed regulatory reports, so the
//! arithmetic is reproduced exactly, including unanswered questions counting as 0.
//!
//! No DB, no network; pure computation. Used by the binary for stdin/stdout and
//! callable as a library.

pub mod config;
pub mod disc;
pub mod engine;
pub mod error;
pub mod fingerprint;
pub mod normalize;
pub mod response;
pub mod scoring;
pub mod telemetry;
pub mod types;

pub use config::{CategoryWeights, Config, ThresholdPreset, Thresholds};
pub use engine::Engine;
pub use error::EngineError;
pub use response::ResponseSet;
pub use types::{
  AssessmentReport, AssessmentSubmission, Category, CategoryScores, DiscFactor, Question,
  RiskAssessment, RiskLevel,
};
