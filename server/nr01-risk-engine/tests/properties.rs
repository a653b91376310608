//! Property tests: determinism, range and monotonicity of the scoring engine.

use nr01_risk_engine::{Category, Engine, Question, ResponseSet};
use proptest::prelude::*;

/// A template of up to 24 psychosocial questions spread over known and unknown
/// categories, with a response (0 = unanswered) per question.
fn template() -> impl Strategy<Value = (Vec<Question>, Vec<i64>)> {
  let category = prop_oneof![
    (0..Category::KNOWN.len()).prop_map(|i| Category::KNOWN[i].clone()),
    Just(Category::from_tag("carga_emocional")),
  ];
  prop::collection::vec((category, 0i64..=5), 0..24).prop_map(|items| {
    let mut questions = Vec::with_capacity(items.len());
    let mut values = Vec::with_capacity(items.len());
    for (i, (category, value)) in items.into_iter().enumerate() {
      questions.push(Question::psychosocial(format!("q{}", i), category));
      values.push(value);
    }
    (questions, values)
  })
}

fn responses(values: &[i64]) -> ResponseSet {
  values
    .iter()
    .enumerate()
    .filter(|(_, v)| **v > 0)
    .map(|(i, v)| (format!("q{}", i), *v))
    .collect()
}

proptest! {
  #[test]
  fn scoring_is_deterministic((questions, values) in template()) {
    let engine = Engine::with_defaults();
    let rs = responses(&values);
    prop_assert_eq!(engine.assess(&questions, &rs, None), engine.assess(&questions, &rs, None));
  }

  #[test]
  fn scores_stay_in_range((questions, values) in template()) {
    let engine = Engine::with_defaults();
    let result = engine.assess(&questions, &responses(&values), None);
    for (_, score) in result.category_scores.iter() {
      prop_assert!(score <= 100);
    }
    prop_assert!(result.overall_risk <= 100);
  }

  #[test]
  fn raising_one_response_never_lowers_scores(
    (questions, values) in template(),
    pick in any::<prop::sample::Index>(),
  ) {
    prop_assume!(!questions.is_empty());
    let i = pick.index(questions.len());
    prop_assume!(values[i] < 5);

    let engine = Engine::with_defaults();
    let before = engine.assess(&questions, &responses(&values), None);

    let mut raised = values.clone();
    raised[i] += 1;
    let after = engine.assess(&questions, &responses(&raised), None);

    let Question::Psychosocial(q) = &questions[i] else {
      unreachable!("template only builds psychosocial questions");
    };
    prop_assert!(after.category_scores.get(&q.category) >= before.category_scores.get(&q.category));
    prop_assert!(after.overall_risk >= before.overall_risk);
  }

  #[test]
  fn critical_categories_are_exactly_those_at_or_above_70((questions, values) in template()) {
    let engine = Engine::with_defaults();
    let result = engine.assess(&questions, &responses(&values), None);
    let expected: Vec<Category> = result
      .category_scores
      .iter()
      .filter(|(_, s)| *s >= 70)
      .map(|(c, _)| c.clone())
      .collect();
    prop_assert_eq!(result.critical_categories, expected);
  }
}
