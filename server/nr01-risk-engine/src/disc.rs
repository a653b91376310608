//! DISC behavioural profile from the DISC questions of a template.

use std::collections::BTreeMap;

use crate::response::ResponseSet;
use crate::scoring::likert_to_percent;
use crate::types::{DiscFactor, DiscProfile, Question};

/// Score each factor with the same 0..=100 scale and missing-as-zero policy as
/// the psychosocial categories. `None` when the template has no DISC questions.
///
/// Ties for the primary factor go to the earlier factor in D, I, S, C order.
pub fn compute_disc_profile(questions: &[Question], responses: &ResponseSet) -> Option<DiscProfile> {
  let mut tallies: BTreeMap<DiscFactor, (u32, u32)> = BTreeMap::new();
  for question in questions {
    if let Question::Disc(q) = question {
      let tally = tallies.entry(q.target_factor).or_insert((0, 0));
      tally.0 += u32::from(responses.value_for(&q.id));
      tally.1 += 1;
    }
  }

  let scores: BTreeMap<DiscFactor, u8> = tallies
    .into_iter()
    .map(|(factor, (sum, count))| (factor, likert_to_percent(sum, count)))
    .collect();

  let mut primary: Option<(DiscFactor, u8)> = None;
  for (&factor, &score) in &scores {
    match primary {
      Some((_, best)) if best >= score => {}
      _ => primary = Some((factor, score)),
    }
  }

  primary.map(|(primary_factor, _)| DiscProfile {
    scores,
    primary_factor,
  })
}
