use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Catalog lookup handed to the engine, keyed by exercise id
pub type ExerciseMap = HashMap<String, Exercise>;

/// Category used for weekly set goals
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExerciseType {
  Push,
  Pull,
  Legs,
  Core,
  Balance,
  Mobility,
  Other,
}

impl ExerciseType {
  pub fn as_str(&self) -> &'static str {
    match self {
      ExerciseType::Push => "push",
      ExerciseType::Pull => "pull",
      ExerciseType::Legs => "legs",
      ExerciseType::Core => "core",
      ExerciseType::Balance => "balance",
      ExerciseType::Mobility => "mobility",
      ExerciseType::Other => "other",
    }
  }
}

impl std::fmt::Display for ExerciseType {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.write_str(self.as_str())
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MeasurementType {
  Reps,
  Time,
}

impl MeasurementType {
  pub fn unit(&self) -> &'static str {
    match self {
      MeasurementType::Reps => "reps",
      MeasurementType::Time => "seconds",
    }
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ExerciseMode {
  #[default]
  Standard,
  /// Progresses by a flat weekly increment instead of the cycle's main scheme
  Conditioning,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Exercise {
  pub id: String,
  pub name: String,
  pub exercise_type: ExerciseType,
  pub measurement_type: MeasurementType,
  #[serde(default)]
  pub mode: ExerciseMode,
  #[serde(default)]
  pub weight_enabled: bool,
  /// Used in place of an established max until one is recorded
  #[serde(default)]
  pub default_max: Option<u32>,
  /// Conditioning starting point when the assignment does not set one
  #[serde(default)]
  pub default_conditioning_base: Option<u32>,
}

impl Exercise {
  pub fn is_conditioning(&self) -> bool {
    self.mode == ExerciseMode::Conditioning
  }

  pub fn is_timed(&self) -> bool {
    self.measurement_type == MeasurementType::Time
  }
}
