//! Core types for the risk engine (JSON contracts + domain models).

use chrono::{DateTime, Utc};
use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::BTreeMap;
use std::fmt;

use crate::config::Thresholds;
use crate::response::ResponseSet;

// ---------------------------------------------------------------------------
// Categories
// ---------------------------------------------------------------------------

/// Psychosocial risk category. Wire form is the snake_case tag stored on the
/// template question (`"demandas_trabalho"`, ...).
///
/// Tags outside the known set are kept verbatim in `Other` and are never
/// rejected. Build values with [`Category::from_tag`] so a known tag always
/// resolves to its named variant.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Category {
  DemandasTrabalho,
  ControleAutonomia,
  CondicoesAmbientais,
  RelacoesSocioprofissionais,
  ReconhecimentoCrescimento,
  EquilibrioTrabalhoVida,
  SuporteSocial,
  ClarezaPapel,
  Recompensas,
  GestaoMudancas,
  ImpactosSaude,
  Other(String),
}

impl Category {
  pub const KNOWN: [Category; 11] = [
    Category::DemandasTrabalho,
    Category::ControleAutonomia,
    Category::CondicoesAmbientais,
    Category::RelacoesSocioprofissionais,
    Category::ReconhecimentoCrescimento,
    Category::EquilibrioTrabalhoVida,
    Category::SuporteSocial,
    Category::ClarezaPapel,
    Category::Recompensas,
    Category::GestaoMudancas,
    Category::ImpactosSaude,
  ];

  /// Exact tag match; anything else becomes `Other`.
  pub fn from_tag(tag: &str) -> Self {
    match tag {
      "demandas_trabalho" => Self::DemandasTrabalho,
      "controle_autonomia" => Self::ControleAutonomia,
      "condicoes_ambientais" => Self::CondicoesAmbientais,
      "relacoes_socioprofissionais" => Self::RelacoesSocioprofissionais,
      "reconhecimento_crescimento" => Self::ReconhecimentoCrescimento,
      "equilibrio_trabalho_vida" => Self::EquilibrioTrabalhoVida,
      "suporte_social" => Self::SuporteSocial,
      "clareza_papel" => Self::ClarezaPapel,
      "recompensas" => Self::Recompensas,
      "gestao_mudancas" => Self::GestaoMudancas,
      "impactos_saude" => Self::ImpactosSaude,
      other => Self::Other(other.to_string()),
    }
  }

  pub fn as_str(&self) -> &str {
    match self {
      Self::DemandasTrabalho => "demandas_trabalho",
      Self::ControleAutonomia => "controle_autonomia",
      Self::CondicoesAmbientais => "condicoes_ambientais",
      Self::RelacoesSocioprofissionais => "relacoes_socioprofissionais",
      Self::ReconhecimentoCrescimento => "reconhecimento_crescimento",
      Self::EquilibrioTrabalhoVida => "equilibrio_trabalho_vida",
      Self::SuporteSocial => "suporte_social",
      Self::ClarezaPapel => "clareza_papel",
      Self::Recompensas => "recompensas",
      Self::GestaoMudancas => "gestao_mudancas",
      Self::ImpactosSaude => "impactos_saude",
      Self::Other(tag) => tag,
    }
  }

  pub fn is_known(&self) -> bool {
    !matches!(self, Self::Other(_))
  }
}

impl fmt::Display for Category {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

impl Serialize for Category {
  fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(self.as_str())
  }
}

impl<'de> Deserialize<'de> for Category {
  fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
    let tag = String::deserialize(deserializer)?;
    Ok(Self::from_tag(&tag))
  }
}

// ---------------------------------------------------------------------------
// DISC factors
// ---------------------------------------------------------------------------

/// Behavioural factor targeted by a DISC question. Ordering is D, I, S, C.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum DiscFactor {
  #[serde(rename = "D")]
  Dominance,
  #[serde(rename = "I")]
  Influence,
  #[serde(rename = "S")]
  Steadiness,
  #[serde(rename = "C")]
  Conscientiousness,
}

impl DiscFactor {
  pub const ALL: [DiscFactor; 4] = [
    DiscFactor::Dominance,
    DiscFactor::Influence,
    DiscFactor::Steadiness,
    DiscFactor::Conscientiousness,
  ];

  pub fn from_str_loose(s: &str) -> Option<Self> {
    match s.trim().to_ascii_lowercase().as_str() {
      "d" | "dominance" | "dominancia" => Some(Self::Dominance),
      "i" | "influence" | "influencia" => Some(Self::Influence),
      "s" | "steadiness" | "estabilidade" => Some(Self::Steadiness),
      "c" | "conscientiousness" | "conformidade" => Some(Self::Conscientiousness),
      _ => None,
    }
  }

  pub fn as_str(self) -> &'static str {
    match self {
      Self::Dominance => "D",
      Self::Influence => "I",
      Self::Steadiness => "S",
      Self::Conscientiousness => "C",
    }
  }
}

// ---------------------------------------------------------------------------
// Questions (resolved once at load time)
// ---------------------------------------------------------------------------

fn default_weight() -> f64 {
  1.0
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PsychosocialQuestion {
  pub id: String,
  pub category: Category,
  /// Carried with the template definition; category scores are a plain average.
  #[serde(default = "default_weight")]
  pub weight: f64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiscQuestion {
  pub id: String,
  pub target_factor: DiscFactor,
}

/// A template question with an explicit discriminant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Question {
  Psychosocial(PsychosocialQuestion),
  Disc(DiscQuestion),
}

impl Question {
  pub fn psychosocial(id: impl Into<String>, category: Category) -> Self {
    Self::Psychosocial(PsychosocialQuestion {
      id: id.into(),
      category,
      weight: default_weight(),
    })
  }

  pub fn disc(id: impl Into<String>, target_factor: DiscFactor) -> Self {
    Self::Disc(DiscQuestion {
      id: id.into(),
      target_factor,
    })
  }

  pub fn id(&self) -> &str {
    match self {
      Self::Psychosocial(q) => &q.id,
      Self::Disc(q) => &q.id,
    }
  }

  pub fn kind(&self) -> &'static str {
    match self {
      Self::Psychosocial(_) => "psychosocial",
      Self::Disc(_) => "disc",
    }
  }
}

// ---------------------------------------------------------------------------
// Scoring results
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum RiskLevel {
  #[serde(rename = "baixo")]
  Low,
  #[serde(rename = "medio")]
  Medium,
  #[serde(rename = "alto")]
  High,
  #[serde(rename = "critico")]
  Critical,
}

impl RiskLevel {
  pub fn as_str(self) -> &'static str {
    match self {
      Self::Low => "baixo",
      Self::Medium => "medio",
      Self::High => "alto",
      Self::Critical => "critico",
    }
  }

  /// High and critical assessments trigger the external action-plan generator.
  pub fn requires_action_plan(self) -> bool {
    matches!(self, Self::High | Self::Critical)
  }
}

impl fmt::Display for RiskLevel {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

/// Category → score (0..=100), in first-seen order while scanning questions.
///
/// Serialized as a JSON object whose keys keep that order; the weighted
/// overall score iterates the same order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CategoryScores {
  entries: Vec<(Category, u8)>,
}

impl CategoryScores {
  pub fn new() -> Self {
    Self::default()
  }

  /// Insert or replace; a replaced category keeps its original position.
  pub fn insert(&mut self, category: Category, score: u8) {
    match self.entries.iter_mut().find(|(c, _)| *c == category) {
      Some(entry) => entry.1 = score,
      None => self.entries.push((category, score)),
    }
  }

  pub fn get(&self, category: &Category) -> Option<u8> {
    self
      .entries
      .iter()
      .find(|(c, _)| c == category)
      .map(|(_, s)| *s)
  }

  pub fn iter(&self) -> impl Iterator<Item = (&Category, u8)> {
    self.entries.iter().map(|(c, s)| (c, *s))
  }

  pub fn categories(&self) -> impl Iterator<Item = &Category> {
    self.entries.iter().map(|(c, _)| c)
  }

  pub fn len(&self) -> usize {
    self.entries.len()
  }

  pub fn is_empty(&self) -> bool {
    self.entries.is_empty()
  }
}

impl FromIterator<(Category, u8)> for CategoryScores {
  fn from_iter<I: IntoIterator<Item = (Category, u8)>>(iter: I) -> Self {
    let mut scores = Self::new();
    for (category, score) in iter {
      scores.insert(category, score);
    }
    scores
  }
}

impl Serialize for CategoryScores {
  fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
    let mut map = serializer.serialize_map(Some(self.entries.len()))?;
    for (category, score) in &self.entries {
      map.serialize_entry(category, score)?;
    }
    map.end()
  }
}

impl<'de> Deserialize<'de> for CategoryScores {
  fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
    struct ScoresVisitor;

    impl<'de> Visitor<'de> for ScoresVisitor {
      type Value = CategoryScores;

      fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a map of category tag to score")
      }

      fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
        let mut scores = CategoryScores::new();
        while let Some((category, score)) = access.next_entry::<Category, u8>()? {
          scores.insert(category, score);
        }
        Ok(scores)
      }
    }

    deserializer.deserialize_map(ScoresVisitor)
  }
}

/// Result of scoring one completed questionnaire. Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RiskAssessment {
  pub category_scores: CategoryScores,
  pub overall_risk: u8,
  pub risk_level: RiskLevel,
  pub critical_categories: Vec<Category>,
}

impl RiskAssessment {
  /// Zero overall risk with no category entries means "not yet assessed",
  /// which is distinct from a genuine low-risk result.
  pub fn is_insufficient_data(&self) -> bool {
    self.category_scores.is_empty()
  }
}

/// Per-factor DISC scores (D, I, S, C order) and the dominant factor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiscProfile {
  pub scores: BTreeMap<DiscFactor, u8>,
  pub primary_factor: DiscFactor,
}

// ---------------------------------------------------------------------------
// Inbound types (JSON contract — what the caller sends)
// ---------------------------------------------------------------------------

/// One completed questionnaire submission. Unknown fields are silently ignored.
#[derive(Debug, Clone, Deserialize)]
pub struct AssessmentSubmission {
  #[serde(default)]
  pub assessment_id: Option<String>,
  #[serde(default)]
  pub completed_at: Option<String>,
  pub questions: Vec<InboundQuestion>,
  #[serde(default)]
  pub responses: ResponseSet,
  /// Per-tenant override of the configured risk-level ladder.
  #[serde(default)]
  pub thresholds: Option<Thresholds>,
}

/// Question as stored by the template store. `kind` may be absent on legacy
/// templates; it is then resolved from `category` vs `target_factor`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct InboundQuestion {
  pub id: String,
  #[serde(default)]
  pub kind: Option<String>,
  #[serde(default)]
  pub category: Option<String>,
  #[serde(default, alias = "targetFactor")]
  pub target_factor: Option<String>,
  #[serde(default)]
  pub weight: Option<f64>,
}

// ---------------------------------------------------------------------------
// Internal normalized types
// ---------------------------------------------------------------------------

/// Canonical submission after normalization + validation.
#[derive(Debug, Clone)]
pub struct Submission {
  pub assessment_id: Option<String>,
  pub completed_at: Option<DateTime<Utc>>,
  pub questions: Vec<Question>,
  pub responses: ResponseSet,
  pub thresholds: Option<Thresholds>,
}

// ---------------------------------------------------------------------------
// Output types (JSON contract — what we emit)
// ---------------------------------------------------------------------------

/// Persisted representation of a scored assessment. Field names match the
/// assessment record columns so report generators read them without recomputation.
#[derive(Debug, Clone, Serialize)]
pub struct AssessmentReport {
  #[serde(skip_serializing_if = "Option::is_none")]
  pub assessment_id: Option<String>,
  pub template_fingerprint: String,
  pub factors_scores: CategoryScores,
  pub raw_score: u8,
  pub risk_level: RiskLevel,
  pub critical_categories: Vec<Category>,
  pub insufficient_data: bool,
  pub requires_action_plan: bool,
  pub answered: usize,
  pub total_questions: usize,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub completed_at: Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub disc_profile: Option<DiscProfile>,
}

// ---------------------------------------------------------------------------
// CLI stream wrappers
// ---------------------------------------------------------------------------

/// Structured error output for invalid input.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorOutput {
  pub error: bool,
  pub message: String,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub field: Option<String>,
}

impl ErrorOutput {
  pub fn new(message: impl Into<String>) -> Self {
    Self {
      error: true,
      message: message.into(),
      field: None,
    }
  }

  pub fn with_field(mut self, field: impl Into<String>) -> Self {
    self.field = Some(field.into());
    self
  }
}
