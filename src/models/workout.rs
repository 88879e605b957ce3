use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::cycle::{SimpleProgression, WeightProgression};
use super::exercise::{ExerciseType, MeasurementType};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum WorkoutStatus {
  #[default]
  Pending,
  Partial,
  Completed,
  Skipped,
}

impl WorkoutStatus {
  pub const ALL: [WorkoutStatus; 4] = [
    WorkoutStatus::Pending,
    WorkoutStatus::Partial,
    WorkoutStatus::Completed,
    WorkoutStatus::Skipped,
  ];

  /// Completed and skipped workouts are history; regeneration keeps them
  pub fn is_settled(&self) -> bool {
    matches!(self, Self::Completed | Self::Skipped)
  }
}

impl std::fmt::Display for WorkoutStatus {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    match self {
      Self::Pending => write!(f, "pending"),
      Self::Partial => write!(f, "partial"),
      Self::Completed => write!(f, "completed"),
      Self::Skipped => write!(f, "skipped"),
    }
  }
}

impl std::str::FromStr for WorkoutStatus {
  type Err = String;
  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s {
      "pending" => Ok(Self::Pending),
      "partial" => Ok(Self::Partial),
      "completed" => Ok(Self::Completed),
      "skipped" => Ok(Self::Skipped),
      _ => Err(format!("Unknown workout status: {}", s)),
    }
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WarmupTier {
  Tier1,
  Tier2,
}

impl WarmupTier {
  pub const ALL: [WarmupTier; 2] = [WarmupTier::Tier1, WarmupTier::Tier2];

  /// Fraction of the working target performed in this warm-up
  pub fn fraction(&self) -> f64 {
    match self {
      WarmupTier::Tier1 => 0.2,
      WarmupTier::Tier2 => 0.4,
    }
  }
}

/// Snapshot of the assignment arithmetic a set resolves against at read time
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum SetProgression {
  Rfem,
  Simple(SimpleProgression),
  Conditioning { base: u32, weekly_increment: u32 },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduledSet {
  pub id: String,
  pub exercise_id: String,
  pub exercise_type: ExerciseType,
  pub measurement: MeasurementType,
  #[serde(default)]
  pub warmup: Option<WarmupTier>,
  #[serde(default)]
  pub is_max_test: bool,
  #[serde(default)]
  pub is_conditioning: bool,
  pub progression: SetProgression,
  #[serde(default)]
  pub weight: Option<WeightProgression>,
  /// Zero-based count of earlier workouts in the cycle that include this exercise
  #[serde(default)]
  pub occurrence: u32,
}

impl ScheduledSet {
  pub fn is_warmup(&self) -> bool {
    self.warmup.is_some()
  }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduledWorkout {
  pub id: String,
  pub cycle_id: String,
  /// 1-based position in the rotation; ad-hoc workouts reuse their anchor's number
  pub sequence_number: u32,
  /// Timeline order. Scheduled workouts use their sequence number, ad-hoc ones sit between.
  pub sort_key: f64,
  pub week_number: u32,
  pub day_in_week: u32,
  #[serde(default)]
  pub scheduled_date: Option<NaiveDate>,
  /// None for ad-hoc workouts inserted outside the rotation
  #[serde(default)]
  pub group_id: Option<String>,
  #[serde(default)]
  pub rfem: Option<u32>,
  #[serde(default)]
  pub scheduled_sets: Vec<ScheduledSet>,
  #[serde(default)]
  pub status: WorkoutStatus,
}

impl ScheduledWorkout {
  pub fn is_ad_hoc(&self) -> bool {
    self.group_id.is_none()
  }

  /// Absolute rotation index, or None for ad-hoc workouts
  pub fn slot_index(&self) -> Option<u32> {
    if self.is_ad_hoc() {
      None
    } else {
      self.sequence_number.checked_sub(1)
    }
  }

  pub fn working_sets(&self) -> impl Iterator<Item = &ScheduledSet> {
    self.scheduled_sets.iter().filter(|s| !s.is_warmup())
  }
}
