//! Normalize inbound submissions into canonical internal models.
//!
//! Question kinds are resolved here, once; the scoring code only ever sees the
//! tagged [`Question`] type. Response values are never rejected (see `response`).

use chrono::{DateTime, Utc};

use crate::error::EngineError;
use crate::types::*;

/// Parse and validate an AssessmentSubmission.
pub fn normalize(raw: &AssessmentSubmission) -> Result<Submission, EngineError> {
  let completed_at = match &raw.completed_at {
    Some(ts) => Some(
      DateTime::parse_from_rfc3339(ts)
        .map_err(|e| EngineError::validation("completed_at", &format!("invalid RFC3339: {}", e)))?
        .with_timezone(&Utc),
    ),
    None => None,
  };

  if let Some(thresholds) = &raw.thresholds {
    thresholds.validate()?;
  }

  // Repeated ids are kept: each copy reads the same response and is tallied.
  let questions = raw
    .questions
    .iter()
    .enumerate()
    .map(|(i, q)| resolve_question(q, i))
    .collect::<Result<Vec<_>, EngineError>>()?;

  let assessment_id = raw
    .assessment_id
    .as_ref()
    .map(|id| id.trim().to_string())
    .filter(|id| !id.is_empty());

  Ok(Submission {
    assessment_id,
    completed_at,
    questions,
    responses: raw.responses.clone(),
    thresholds: raw.thresholds,
  })
}

/// Resolve one stored question into its tagged form.
///
/// An explicit `kind` wins. Without one, `target_factor` marks a DISC question
/// and `category` a psychosocial one. Only questions that cannot be typed at all
/// are rejected; odd tags and weights still score.
pub fn resolve_question(raw: &InboundQuestion, index: usize) -> Result<Question, EngineError> {
  let field = |name: &str| format!("questions[{}].{}", index, name);

  let id = raw.id.trim();
  if id.is_empty() {
    return Err(EngineError::validation(&field("id"), "must not be empty"));
  }

  let is_disc = match raw.kind.as_deref().map(|k| k.trim().to_ascii_lowercase()) {
    Some(kind) if kind == "disc" => true,
    Some(kind) if kind == "psychosocial" => false,
    Some(_) => {
      return Err(EngineError::validation(
        &field("kind"),
        "expected psychosocial|disc",
      ))
    }
    None if raw.target_factor.is_some() => true,
    None if raw.category.is_some() => false,
    None => {
      return Err(EngineError::validation(
        &field("category"),
        "question must carry a category or a target_factor",
      ))
    }
  };

  if is_disc {
    let factor = raw
      .target_factor
      .as_deref()
      .and_then(DiscFactor::from_str_loose)
      .ok_or_else(|| EngineError::validation(&field("target_factor"), "expected D|I|S|C"))?;
    return Ok(Question::disc(id, factor));
  }

  let category = match raw.category.as_deref() {
    Some(tag) => Category::from_tag(tag),
    None => {
      return Err(EngineError::validation(
        &field("category"),
        "psychosocial question must carry a category",
      ))
    }
  };
  if !category.is_known() {
    tracing::debug!(category = %category, question_id = id, "unregistered category; default weight applies");
  }

  let weight = match raw.weight {
    Some(w) if w.is_finite() && w > 0.0 => w,
    Some(w) => {
      tracing::debug!(question_id = id, weight = w, "non-positive question weight; using 1.0");
      1.0
    }
    None => 1.0,
  };

  Ok(Question::Psychosocial(PsychosocialQuestion {
    id: id.to_string(),
    category,
    weight,
  }))
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::config::Thresholds;

  fn inbound(id: &str, category: Option<&str>, factor: Option<&str>) -> InboundQuestion {
    InboundQuestion {
      id: id.into(),
      kind: None,
      category: category.map(Into::into),
      target_factor: factor.map(Into::into),
      weight: None,
    }
  }

  fn submission(questions: Vec<InboundQuestion>) -> AssessmentSubmission {
    AssessmentSubmission {
      assessment_id: Some("a-1".into()),
      completed_at: None,
      questions,
      responses: Default::default(),
      thresholds: None,
    }
  }

  #[test]
  fn kind_inferred_from_fields() {
    let p = resolve_question(&inbound("q1", Some("suporte_social"), None), 0).unwrap();
    assert_eq!(p, Question::psychosocial("q1", Category::SuporteSocial));

    let d = resolve_question(&inbound("d1", None, Some("C")), 1).unwrap();
    assert_eq!(d, Question::disc("d1", DiscFactor::Conscientiousness));
  }

  #[test]
  fn explicit_kind_wins() {
    let mut q = inbound("q1", Some("suporte_social"), Some("D"));
    q.kind = Some("psychosocial".into());
    assert!(matches!(resolve_question(&q, 0).unwrap(), Question::Psychosocial(_)));
  }

  #[test]
  fn unknown_kind_rejected() {
    let mut q = inbound("q1", Some("suporte_social"), None);
    q.kind = Some("likert".into());
    let err = resolve_question(&q, 2).unwrap_err();
    assert_eq!(err.field(), Some("questions[2].kind"));
  }

  #[test]
  fn shapeless_question_rejected() {
    let err = resolve_question(&inbound("q1", None, None), 0).unwrap_err();
    assert!(err.to_string().contains("category"));
  }

  #[test]
  fn bad_disc_factor_rejected() {
    let err = resolve_question(&inbound("d1", None, Some("Z")), 0).unwrap_err();
    assert_eq!(err.field(), Some("questions[0].target_factor"));
  }

  #[test]
  fn unknown_category_is_accepted() {
    let q = resolve_question(&inbound("q1", Some("carga_emocional"), None), 0).unwrap();
    assert_eq!(
      q,
      Question::psychosocial("q1", Category::Other("carga_emocional".into()))
    );
  }

  #[test]
  fn non_positive_weight_defaults_to_one() {
    for bad in [0.0, -2.5, f64::NAN] {
      let mut q = inbound("q1", Some("recompensas"), None);
      q.weight = Some(bad);
      let Question::Psychosocial(p) = resolve_question(&q, 0).unwrap() else {
        panic!("expected a psychosocial question");
      };
      assert_eq!(p.weight, 1.0);
    }
  }

  #[test]
  fn empty_category_is_an_unregistered_tag() {
    let q = resolve_question(&inbound("q1", Some(""), None), 0).unwrap();
    assert_eq!(q, Question::psychosocial("q1", Category::Other(String::new())));
  }

  #[test]
  fn explicit_psychosocial_without_category_rejected() {
    let mut q = inbound("q1", None, None);
    q.kind = Some("psychosocial".into());
    let err = resolve_question(&q, 4).unwrap_err();
    assert_eq!(err.field(), Some("questions[4].category"));
  }

  #[test]
  fn duplicate_ids_are_kept() {
    let raw = submission(vec![
      inbound("q1", Some("recompensas"), None),
      inbound("q1", Some("clareza_papel"), None),
    ]);
    let sub = normalize(&raw).unwrap();
    assert_eq!(sub.questions.len(), 2);
    assert_eq!(sub.questions[1].id(), "q1");
  }

  #[test]
  fn invalid_completed_at_rejected() {
    let mut raw = submission(vec![]);
    raw.completed_at = Some("yesterday".into());
    let err = normalize(&raw).unwrap_err();
    assert_eq!(err.field(), Some("completed_at"));
  }

  #[test]
  fn invalid_threshold_override_rejected() {
    let mut raw = submission(vec![]);
    raw.thresholds = Some(Thresholds {
      low: 60.0,
      medium: 40.0,
      high: 80.0,
    });
    assert!(normalize(&raw).is_err());
  }

  #[test]
  fn valid_submission_normalizes() {
    let mut raw = submission(vec![
      inbound(" q1 ", Some("demandas_trabalho"), None),
      inbound("d1", None, Some("i")),
    ]);
    raw.completed_at = Some("2025-03-10T14:00:00-03:00".into());
    raw.assessment_id = Some("  ".into());

    let sub = normalize(&raw).unwrap();
    assert_eq!(sub.questions.len(), 2);
    assert_eq!(sub.questions[0].id(), "q1");
    assert_eq!(sub.assessment_id, None);
    assert_eq!(
      sub.completed_at.unwrap().to_rfc3339(),
      "2025-03-10T17:00:00+00:00"
    );
  }
}
