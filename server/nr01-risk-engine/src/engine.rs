//! Core engine: owns the scoring configuration and turns submissions into reports.

use crate::config::{Config, Thresholds};
use crate::disc;
use crate::error::EngineError;
use crate::fingerprint;
use crate::normalize;
use crate::response::ResponseSet;
use crate::scoring;
use crate::types::*;

/// The psychosocial risk scoring engine. Stateless apart from its configuration,
/// so one instance can score unrelated assessments concurrently.
#[derive(Debug, Clone)]
pub struct Engine {
  config: Config,
}

impl Engine {
  pub fn new(config: Config) -> Self {
    Self { config }
  }

  pub fn with_defaults() -> Self {
    Self::new(Config::default())
  }

  pub fn config(&self) -> &Config {
    &self.config
  }

  pub fn compute_category_scores(
    &self,
    questions: &[Question],
    responses: &ResponseSet,
  ) -> CategoryScores {
    scoring::compute_category_scores(questions, responses)
  }

  pub fn compute_overall_risk(&self, scores: &CategoryScores) -> u8 {
    scoring::compute_overall_risk(scores, &self.config.weights)
  }

  /// Classify with the override when given, else the configured ladder.
  pub fn classify_risk_level(&self, overall_risk: u8, thresholds: Option<&Thresholds>) -> RiskLevel {
    scoring::classify_risk_level(overall_risk, thresholds.unwrap_or(&self.config.thresholds))
  }

  pub fn identify_critical_categories(&self, scores: &CategoryScores) -> Vec<Category> {
    scoring::identify_critical_categories(scores, self.config.critical_category_score)
  }

  /// Score one completed questionnaire. Never fails: empty input yields an empty
  /// score map, overall 0, `baixo` and no critical categories.
  pub fn assess(
    &self,
    questions: &[Question],
    responses: &ResponseSet,
    thresholds: Option<&Thresholds>,
  ) -> RiskAssessment {
    let category_scores = self.compute_category_scores(questions, responses);
    let overall_risk = self.compute_overall_risk(&category_scores);
    let risk_level = self.classify_risk_level(overall_risk, thresholds);
    let critical_categories = self.identify_critical_categories(&category_scores);

    tracing::debug!(
      categories = category_scores.len(),
      overall_risk,
      risk_level = %risk_level,
      critical = critical_categories.len(),
      "assessment scored"
    );

    RiskAssessment {
      category_scores,
      overall_risk,
      risk_level,
      critical_categories,
    }
  }

  /// Validate an inbound submission and produce the persisted report.
  pub fn evaluate(&self, raw: &AssessmentSubmission) -> Result<AssessmentReport, EngineError> {
    let submission = normalize::normalize(raw)?;
    Ok(self.report(&submission))
  }

  /// Build the persisted report for an already-normalized submission.
  pub fn report(&self, submission: &Submission) -> AssessmentReport {
    let assessment = self.assess(
      &submission.questions,
      &submission.responses,
      submission.thresholds.as_ref(),
    );
    let insufficient_data = assessment.is_insufficient_data();
    if insufficient_data {
      tracing::info!(
        assessment_id = submission.assessment_id.as_deref().unwrap_or("-"),
        "no psychosocial questions scored; reporting insufficient data"
      );
    }

    let answered = submission
      .questions
      .iter()
      .filter(|q| submission.responses.get(q.id()).is_some())
      .count();

    AssessmentReport {
      assessment_id: submission.assessment_id.clone(),
      template_fingerprint: fingerprint::compute(&submission.questions).0,
      requires_action_plan: assessment.risk_level.requires_action_plan(),
      factors_scores: assessment.category_scores,
      raw_score: assessment.overall_risk,
      risk_level: assessment.risk_level,
      critical_categories: assessment.critical_categories,
      insufficient_data,
      answered,
      total_questions: submission.questions.len(),
      completed_at: submission.completed_at.map(|ts| ts.to_rfc3339()),
      disc_profile: disc::compute_disc_profile(&submission.questions, &submission.responses),
    }
  }
}

impl Default for Engine {
  fn default() -> Self {
    Self::with_defaults()
  }
}
