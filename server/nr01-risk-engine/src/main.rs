//! Binary entrypoint: read submissions from stdin, write reports to stdout.
//!
//! Default mode reads one JSON object and writes one JSON object. With `--lines`
//! each input line is an AssessmentSubmission and each output line is either:
//! - An AssessmentReport
//! - An ErrorOutput (when input validation fails)
//!
//! Logs go to stderr.

use clap::{Parser, ValueEnum};
use nr01_risk_engine::types::ErrorOutput;
use nr01_risk_engine::{telemetry, AssessmentSubmission, Config, Engine, EngineError, ThresholdPreset};
use std::io::{self, BufRead, Read, Write};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
  name = "nr01-risk-engine",
  about = "Score NR-01 psychosocial risk questionnaires (JSON on stdin, JSON on stdout)",
  version
)]
struct Cli {
  /// Tenant config file (JSON) merged over the built-in defaults
  #[arg(long)]
  config: Option<PathBuf>,
  /// Read one submission per line instead of a single JSON object
  #[arg(long)]
  lines: bool,
  /// Default risk-level ladder: scoring (40/60/80) or company (30/60/80)
  #[arg(long, value_enum)]
  thresholds: Option<LadderArg>,
  /// Log filter used when RUST_LOG is unset (overrides the config file)
  #[arg(long)]
  log_level: Option<String>,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum LadderArg {
  Scoring,
  Company,
}

impl From<LadderArg> for ThresholdPreset {
  fn from(arg: LadderArg) -> Self {
    match arg {
      LadderArg::Scoring => ThresholdPreset::Scoring,
      LadderArg::Company => ThresholdPreset::Company,
    }
  }
}

fn main() {
  match run_binary() {
    Ok(true) => {}
    Ok(false) => std::process::exit(1),
    Err(e) => {
      let _ = writeln!(io::stderr(), "nr01-risk-engine error: {}", e);
      std::process::exit(1);
    }
  }
}

/// Returns Ok(false) when the single submission was rejected.
fn run_binary() -> Result<bool, Box<dyn std::error::Error>> {
  let cli = Cli::parse();

  let mut config = match &cli.config {
    Some(path) => Config::from_path(path)?,
    None => Config::default(),
  };
  if let Some(ladder) = cli.thresholds {
    config.thresholds = ThresholdPreset::from(ladder).thresholds();
  }

  let level = cli.log_level.clone().unwrap_or_else(|| config.log_level.clone());
  telemetry::init(&level)?;
  tracing::debug!(thresholds = ?config.thresholds, lines = cli.lines, "engine configured");

  let engine = Engine::new(config);
  if cli.lines {
    run_lines(&engine)?;
    Ok(true)
  } else {
    run_single(&engine)
  }
}

fn run_single(engine: &Engine) -> Result<bool, Box<dyn std::error::Error>> {
  let mut raw = String::new();
  io::stdin().lock().read_to_string(&mut raw)?;

  let mut out = io::stdout().lock();
  let accepted = match score_one(engine, raw.trim()) {
    Ok(json) => {
      out.write_all(&json)?;
      true
    }
    Err(err) => {
      serde_json::to_writer(&mut out, &err)?;
      false
    }
  };
  out.flush()?;
  Ok(accepted)
}

fn run_lines(engine: &Engine) -> Result<(), Box<dyn std::error::Error>> {
  let stdin = io::stdin();
  let mut out = io::BufWriter::new(io::stdout().lock());

  for (n, line) in stdin.lock().lines().enumerate() {
    let line = line?;

    // Skip blank lines.
    let trimmed = line.trim();
    if trimmed.is_empty() {
      continue;
    }

    match score_one(engine, trimmed) {
      Ok(json) => out.write_all(&json)?,
      Err(err) => {
        tracing::warn!(line = n + 1, message = %err.message, "submission rejected");
        serde_json::to_writer(&mut out, &err)?;
      }
    }
    writeln!(out)?;
  }

  out.flush()?;
  Ok(())
}

/// Parse, score and serialize one submission.
fn score_one(engine: &Engine, raw: &str) -> Result<Vec<u8>, ErrorOutput> {
  let submission: AssessmentSubmission =
    serde_json::from_str(raw).map_err(|e| ErrorOutput::new(format!("json parse: {}", e)))?;
  let report = engine.evaluate(&submission).map_err(|e| error_output(&e))?;
  serde_json::to_vec(&report).map_err(|e| ErrorOutput::new(format!("json encode: {}", e)))
}

fn error_output(e: &EngineError) -> ErrorOutput {
  match e {
    EngineError::Validation { field, reason } => {
      ErrorOutput::new(reason.clone()).with_field(field.clone())
    }
    _ => ErrorOutput::new(e.to_string()),
  }
}
