//! Stable fingerprint of a template's question definitions.
//!
//! Published templates must not change; a stored assessment whose fingerprint no
//! longer matches its template was scored against different questions.

use crate::types::Question;

/// Compact ID for an ordered set of question definitions.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TemplateFingerprint(pub String);

/// Hash kind, id, category or factor, and weight of every question in order.
/// Responses never affect the result.
pub fn compute(questions: &[Question]) -> TemplateFingerprint {
  let mut hasher = blake3::Hasher::new();
  for question in questions {
    hasher.update(question.kind().as_bytes());
    hasher.update(b"|");
    hasher.update(question.id().as_bytes());
    hasher.update(b"|");
    match question {
      Question::Psychosocial(q) => {
        hasher.update(q.category.as_str().as_bytes());
        hasher.update(b"|");
        hasher.update(&q.weight.to_bits().to_le_bytes());
      }
      Question::Disc(q) => {
        hasher.update(q.target_factor.as_str().as_bytes());
      }
    }
    hasher.update(b"\n");
  }

  let hex = hasher.finalize().to_hex();
  TemplateFingerprint(format!("tpl-{}", &hex[..16]))
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::types::{Category, DiscFactor, PsychosocialQuestion};

  fn template() -> Vec<Question> {
    vec![
      Question::psychosocial("q1", Category::DemandasTrabalho),
      Question::psychosocial("q2", Category::SuporteSocial),
      Question::disc("d1", DiscFactor::Dominance),
    ]
  }

  #[test]
  fn same_template_same_fingerprint() {
    assert_eq!(compute(&template()), compute(&template()));
  }

  #[test]
  fn recategorized_question_changes_fingerprint() {
    let mut changed = template();
    changed[1] = Question::psychosocial("q2", Category::ClarezaPapel);
    assert_ne!(compute(&template()), compute(&changed));
  }

  #[test]
  fn reweighted_question_changes_fingerprint() {
    let mut changed = template();
    changed[0] = Question::Psychosocial(PsychosocialQuestion {
      id: "q1".into(),
      category: Category::DemandasTrabalho,
      weight: 2.0,
    });
    assert_ne!(compute(&template()), compute(&changed));
  }

  #[test]
  fn question_order_matters() {
    let mut reordered = template();
    reordered.swap(0, 1);
    assert_ne!(compute(&template()), compute(&reordered));
  }

  #[test]
  fn fingerprint_shape() {
    let fp = compute(&template());
    assert!(fp.0.starts_with("tpl-"));
    assert_eq!(fp.0.len(), 20);
    assert!(fp.0[4..].chars().all(|c| c.is_ascii_hexdigit()));
  }
}
