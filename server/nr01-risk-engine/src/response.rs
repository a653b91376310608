//! Likert response sets: question id → value in 1..=5.
//!
//! Values that are not a whole number in 1..=5 (out of range, fractional,
//! strings, null, booleans) are dropped when the set is built, so they
//! contribute 0 exactly like an unanswered question.

use serde::{Deserialize, Deserializer};
use serde_json::Value;
use std::collections::HashMap;

pub const LIKERT_MIN: u8 = 1;
pub const LIKERT_MAX: u8 = 5;

/// Resolve one raw JSON response into a Likert value.
///
/// Integer-valued numbers are accepted (`4` and `4.0`); everything else is `None`.
pub fn resolve_likert(value: &Value) -> Option<u8> {
  let n = value.as_f64()?;
  if n.fract() != 0.0 || n < f64::from(LIKERT_MIN) || n > f64::from(LIKERT_MAX) {
    return None;
  }
  Some(n as u8)
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResponseSet {
  values: HashMap<String, u8>,
}

impl ResponseSet {
  pub fn new() -> Self {
    Self::default()
  }

  /// Record a response. Returns false (and records nothing) when the value is
  /// outside 1..=5.
  pub fn insert(&mut self, question_id: impl Into<String>, value: i64) -> bool {
    let question_id = question_id.into();
    match u8::try_from(value) {
      Ok(v) if (LIKERT_MIN..=LIKERT_MAX).contains(&v) => {
        self.values.insert(question_id, v);
        true
      }
      _ => {
        self.values.remove(&question_id);
        tracing::debug!(question_id = %question_id, value, "response outside likert range; counted as 0");
        false
      }
    }
  }

  /// Build from raw JSON values, coercing malformed entries to "absent".
  pub fn from_json_map(raw: &HashMap<String, Value>) -> Self {
    let mut values = HashMap::with_capacity(raw.len());
    for (question_id, value) in raw {
      match resolve_likert(value) {
        Some(v) => {
          values.insert(question_id.clone(), v);
        }
        None => {
          tracing::debug!(question_id = %question_id, value = %value, "malformed response; counted as 0");
        }
      }
    }
    Self { values }
  }

  /// Response for a question, 0 when absent or malformed.
  pub fn value_for(&self, question_id: &str) -> u8 {
    self.values.get(question_id).copied().unwrap_or(0)
  }

  pub fn get(&self, question_id: &str) -> Option<u8> {
    self.values.get(question_id).copied()
  }

  pub fn len(&self) -> usize {
    self.values.len()
  }

  pub fn is_empty(&self) -> bool {
    self.values.is_empty()
  }
}

impl<K: Into<String>> FromIterator<(K, i64)> for ResponseSet {
  fn from_iter<I: IntoIterator<Item = (K, i64)>>(iter: I) -> Self {
    let mut set = Self::new();
    for (question_id, value) in iter {
      set.insert(question_id, value);
    }
    set
  }
}

impl<'de> Deserialize<'de> for ResponseSet {
  fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
    let raw = HashMap::<String, Value>::deserialize(deserializer)?;
    Ok(Self::from_json_map(&raw))
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use serde_json::json;

  #[test]
  fn accepts_whole_numbers_in_range() {
    assert_eq!(resolve_likert(&json!(1)), Some(1));
    assert_eq!(resolve_likert(&json!(5)), Some(5));
    assert_eq!(resolve_likert(&json!(3.0)), Some(3));
  }

  #[test]
  fn rejects_malformed_values() {
    assert_eq!(resolve_likert(&json!(0)), None);
    assert_eq!(resolve_likert(&json!(6)), None);
    assert_eq!(resolve_likert(&json!(-2)), None);
    assert_eq!(resolve_likert(&json!(2.5)), None);
    assert_eq!(resolve_likert(&json!("4")), None);
    assert_eq!(resolve_likert(&json!(null)), None);
    assert_eq!(resolve_likert(&json!(true)), None);
  }

  #[test]
  fn absent_and_malformed_read_as_zero() {
    let set: ResponseSet = serde_json::from_value(json!({"q1": 4, "q2": "x", "q3": 9})).unwrap();
    assert_eq!(set.value_for("q1"), 4);
    assert_eq!(set.value_for("q2"), 0);
    assert_eq!(set.value_for("q3"), 0);
    assert_eq!(set.value_for("missing"), 0);
    assert_eq!(set.len(), 1);
  }

  #[test]
  fn insert_out_of_range_clears_previous_value() {
    let mut set = ResponseSet::new();
    assert!(set.insert("q1", 3));
    assert!(!set.insert("q1", 7));
    assert_eq!(set.get("q1"), None);
  }

  #[test]
  fn collects_from_pairs() {
    let set: ResponseSet = vec![("a", 1), ("b", 5), ("c", 0)].into_iter().collect();
    assert_eq!(set.len(), 2);
    assert_eq!(set.value_for("c"), 0);
  }
}
