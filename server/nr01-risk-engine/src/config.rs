//! Engine configuration with sane defaults.
//!
//! The weight table and the threshold ladder are plain values owned by the
//! engine instance, so a tenant (or a test) can override them without
//! touching shared state.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

use crate::error::EngineError;
use crate::types::{Category, RiskLevel};

/// Score at or above which a category is flagged as critical.
pub const DEFAULT_CRITICAL_CATEGORY_SCORE: u8 = 70;

// ---------------------------------------------------------------------------
// Threshold ladder
// ---------------------------------------------------------------------------

/// Lower bounds of the medio/alto/critico bands. Evaluated high to low.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Thresholds {
  pub low: f64,
  pub medium: f64,
  pub high: f64,
}

impl Thresholds {
  /// Ladder used by the scoring module: 40 / 60 / 80. Canonical default.
  pub const SCORING_DEFAULT: Thresholds = Thresholds {
    low: 40.0,
    medium: 60.0,
    high: 80.0,
  };

  /// Ladder used by the per-company risk configuration screens: 30 / 60 / 80.
  pub const COMPANY_DEFAULT: Thresholds = Thresholds {
    low: 30.0,
    medium: 60.0,
    high: 80.0,
  };

  pub fn validate(&self) -> Result<(), EngineError> {
    for (field, value) in [
      ("thresholds.low", self.low),
      ("thresholds.medium", self.medium),
      ("thresholds.high", self.high),
    ] {
      if !value.is_finite() || !(0.0..=100.0).contains(&value) {
        return Err(EngineError::validation(field, "must be a number in 0..=100"));
      }
    }
    if self.low > self.medium {
      return Err(EngineError::validation("thresholds.low", "must be <= medium"));
    }
    if self.medium > self.high {
      return Err(EngineError::validation("thresholds.medium", "must be <= high"));
    }
    Ok(())
  }

  pub fn classify(&self, overall_risk: u8) -> RiskLevel {
    let score = f64::from(overall_risk);
    if score >= self.high {
      RiskLevel::Critical
    } else if score >= self.medium {
      RiskLevel::High
    } else if score >= self.low {
      RiskLevel::Medium
    } else {
      RiskLevel::Low
    }
  }
}

impl Default for Thresholds {
  fn default() -> Self {
    Self::SCORING_DEFAULT
  }
}

/// Named default ladders.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ThresholdPreset {
  Scoring,
  Company,
}

impl ThresholdPreset {
  pub fn thresholds(self) -> Thresholds {
    match self {
      Self::Scoring => Thresholds::SCORING_DEFAULT,
      Self::Company => Thresholds::COMPANY_DEFAULT,
    }
  }
}

// ---------------------------------------------------------------------------
// Category weights
// ---------------------------------------------------------------------------

/// Category → risk weight used only in the overall-score aggregation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CategoryWeights {
  weights: HashMap<Category, f64>,
}

impl CategoryWeights {
  pub const FALLBACK_WEIGHT: f64 = 1.0;

  pub fn empty() -> Self {
    Self {
      weights: HashMap::new(),
    }
  }

  pub fn set(&mut self, category: Category, weight: f64) {
    self.weights.insert(category, weight);
  }

  /// Weight for a category. Unknown categories, and entries that are not a
  /// positive finite number, weigh 1.0.
  pub fn weight_of(&self, category: &Category) -> f64 {
    match self.weights.get(category) {
      Some(&w) if w.is_finite() && w > 0.0 => w,
      _ => Self::FALLBACK_WEIGHT,
    }
  }

  pub fn contains(&self, category: &Category) -> bool {
    self.weights.contains_key(category)
  }

  pub fn validate(&self) -> Result<(), EngineError> {
    for (category, weight) in &self.weights {
      if !weight.is_finite() || *weight <= 0.0 {
        return Err(EngineError::validation(
          &format!("weights.{}", category),
          "must be a positive number",
        ));
      }
    }
    Ok(())
  }
}

impl Default for CategoryWeights {
  fn default() -> Self {
    let weights = [
      (Category::DemandasTrabalho, 1.2),
      (Category::ControleAutonomia, 1.1),
      (Category::CondicoesAmbientais, 0.9),
      (Category::RelacoesSocioprofissionais, 1.0),
      (Category::ReconhecimentoCrescimento, 0.9),
      (Category::EquilibrioTrabalhoVida, 1.0),
      (Category::SuporteSocial, 1.0),
      (Category::ClarezaPapel, 0.8),
      (Category::Recompensas, 0.8),
      (Category::GestaoMudancas, 0.9),
      (Category::ImpactosSaude, 1.3),
    ]
    .into_iter()
    .collect();
    Self { weights }
  }
}

// ---------------------------------------------------------------------------
// Engine config
// ---------------------------------------------------------------------------

/// Tunable parameters for scoring and classification.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
  /// Per-category weights for the overall score.
  pub weights: CategoryWeights,
  /// Risk-level ladder used when a submission carries no override.
  pub thresholds: Thresholds,
  /// Category scores at or above this are flagged critical.
  pub critical_category_score: u8,
  /// Fallback log filter when RUST_LOG is unset.
  pub log_level: String,
}

impl Default for Config {
  fn default() -> Self {
    Self {
      weights: CategoryWeights::default(),
      thresholds: Thresholds::default(),
      critical_category_score: DEFAULT_CRITICAL_CATEGORY_SCORE,
      log_level: "warn".to_string(),
    }
  }
}

/// On-disk shape of a tenant config file. Every field is optional and merged
/// over the defaults; `weights` entries override individual categories.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct ConfigFile {
  #[serde(default)]
  weights: HashMap<Category, f64>,
  #[serde(default)]
  threshold_preset: Option<ThresholdPreset>,
  #[serde(default)]
  thresholds: Option<Thresholds>,
  #[serde(default)]
  critical_category_score: Option<u8>,
  #[serde(default)]
  log_level: Option<String>,
}

impl Config {
  pub fn from_json_str(raw: &str) -> Result<Self, EngineError> {
    let file: ConfigFile = serde_json::from_str(raw)?;
    let mut config = Config::default();

    for (category, weight) in file.weights {
      config.weights.set(category, weight);
    }
    if let Some(preset) = file.threshold_preset {
      config.thresholds = preset.thresholds();
    }
    // An explicit ladder wins over a preset.
    if let Some(thresholds) = file.thresholds {
      config.thresholds = thresholds;
    }
    if let Some(score) = file.critical_category_score {
      config.critical_category_score = score;
    }
    if let Some(level) = file.log_level {
      config.log_level = level;
    }

    config.validate()?;
    Ok(config)
  }

  pub fn from_path(path: &Path) -> Result<Self, EngineError> {
    let raw = std::fs::read_to_string(path)?;
    Self::from_json_str(&raw)
  }

  pub fn validate(&self) -> Result<(), EngineError> {
    self.weights.validate()?;
    self.thresholds.validate()?;
    if self.critical_category_score > 100 {
      return Err(EngineError::validation(
        "critical_category_score",
        "must be in 0..=100",
      ));
    }
    Ok(())
  }
}
