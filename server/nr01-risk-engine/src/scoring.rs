//! Category scores, weighted overall risk, risk-level ladder and critical categories.
//!
//! Float operations are performed in the same order as the stored reports were
//! produced (sum / count, then / 5, then * 100, then round) so that results are
//! bit-exact with historical assessments.

use std::collections::HashMap;

use crate::config::{CategoryWeights, Thresholds};
use crate::response::{ResponseSet, LIKERT_MAX};
use crate::types::{Category, CategoryScores, Question, RiskLevel};

/// Average Likert value over `count` questions mapped to 0..=100, rounded half-up.
pub fn likert_to_percent(sum: u32, count: u32) -> u8 {
  if count == 0 {
    return 0;
  }
  let average = f64::from(sum) / f64::from(count);
  let percent = ((average / f64::from(LIKERT_MAX)) * 100.0).round();
  percent.clamp(0.0, 100.0) as u8
}

/// Per-category score for the psychosocial questions of a template.
///
/// Unanswered (or malformed) questions count as 0 and stay in the denominator.
/// DISC questions are ignored.
pub fn compute_category_scores(questions: &[Question], responses: &ResponseSet) -> CategoryScores {
  // (category, sum, count) in first-seen order.
  let mut tallies: Vec<(Category, u32, u32)> = Vec::new();
  let mut index: HashMap<Category, usize> = HashMap::new();

  for question in questions {
    let Question::Psychosocial(q) = question else {
      continue;
    };
    let value = u32::from(responses.value_for(&q.id));
    let slot = *index.entry(q.category.clone()).or_insert_with(|| {
      tallies.push((q.category.clone(), 0, 0));
      tallies.len() - 1
    });
    let tally = &mut tallies[slot];
    tally.1 += value;
    tally.2 += 1;
  }

  tallies
    .into_iter()
    .map(|(category, sum, count)| {
      let score = likert_to_percent(sum, count);
      tracing::trace!(category = %category, sum, count, score, "category scored");
      (category, score)
    })
    .collect()
}

/// `round(Σ score·weight / Σ weight)` in category order. Empty input scores 0.
pub fn compute_overall_risk(scores: &CategoryScores, weights: &CategoryWeights) -> u8 {
  let mut weighted_sum = 0.0_f64;
  let mut total_weight = 0.0_f64;

  for (category, score) in scores.iter() {
    if !weights.contains(category) {
      tracing::debug!(category = %category, "no weight configured; using 1.0");
    }
    let weight = weights.weight_of(category);
    weighted_sum += f64::from(score) * weight;
    total_weight += weight;
  }

  if total_weight <= 0.0 {
    return 0;
  }
  (weighted_sum / total_weight).round().clamp(0.0, 100.0) as u8
}

pub fn classify_risk_level(overall_risk: u8, thresholds: &Thresholds) -> RiskLevel {
  thresholds.classify(overall_risk)
}

/// Categories scoring at or above `cutoff`, in category-score order.
pub fn identify_critical_categories(scores: &CategoryScores, cutoff: u8) -> Vec<Category> {
  scores
    .iter()
    .filter(|(_, score)| *score >= cutoff)
    .map(|(category, _)| category.clone())
    .collect()
}
