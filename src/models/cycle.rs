use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

use super::exercise::{Exercise, ExerciseType, MeasurementType};

/// ---------------------------------------------------------------------------
/// Cycle-wide enums
/// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum CycleStatus {
  #[default]
  Planning,
  Active,
  Completed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum CycleType {
  #[default]
  Training,
  /// Every working set is an all-out max attempt
  MaxTesting,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProgressionMode {
  Rfem,
  Simple,
  /// Each assignment picks rfem or simple for itself
  Mixed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SchedulingMode {
  #[default]
  Sequence,
  Date,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ProgressionInterval {
  #[default]
  Constant,
  PerWorkout,
  PerWeek,
}

/// ---------------------------------------------------------------------------
/// Assignment progression variants
/// ---------------------------------------------------------------------------

/// A base value tagged with its unit, so reps and time can't both be set
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "unit", content = "value", rename_all = "snake_case")]
pub enum BaseValue {
  Reps(u32),
  Seconds(u32),
}

impl BaseValue {
  pub fn of(measurement: MeasurementType, value: u32) -> Self {
    match measurement {
      MeasurementType::Reps => BaseValue::Reps(value),
      MeasurementType::Time => BaseValue::Seconds(value),
    }
  }

  pub fn value(&self) -> u32 {
    match self {
      BaseValue::Reps(v) | BaseValue::Seconds(v) => *v,
    }
  }

  pub fn measurement(&self) -> MeasurementType {
    match self {
      BaseValue::Reps(_) => MeasurementType::Reps,
      BaseValue::Seconds(_) => MeasurementType::Time,
    }
  }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimpleProgression {
  pub base: BaseValue,
  #[serde(default)]
  pub interval: ProgressionInterval,
  #[serde(default)]
  pub increment: u32,
}

impl SimpleProgression {
  /// Placeholder for an assignment missing its simple fields; resolves to zero
  pub fn unset(measurement: MeasurementType) -> Self {
    Self {
      base: BaseValue::of(measurement, 0),
      interval: ProgressionInterval::Constant,
      increment: 0,
    }
  }
}

/// Added load, progressed independently of reps/time
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeightProgression {
  pub base_weight: f64,
  #[serde(default)]
  pub interval: ProgressionInterval,
  #[serde(default)]
  pub increment: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct ConditioningTarget {
  #[serde(default)]
  pub base: Option<BaseValue>,
  /// Overrides the cycle-wide weekly increment when set
  #[serde(default)]
  pub increment: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum AssignmentProgression {
  Rfem,
  Simple(SimpleProgression),
}

/// Progression arithmetic that actually applies to an assignment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EffectiveMode {
  Rfem,
  Simple,
  Conditioning,
}

/// ---------------------------------------------------------------------------
/// Groups and assignments
/// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExerciseAssignment {
  pub exercise_id: String,
  pub progression: AssignmentProgression,
  #[serde(default)]
  pub weight: Option<WeightProgression>,
  #[serde(default)]
  pub conditioning: Option<ConditioningTarget>,
}

impl ExerciseAssignment {
  /// Mixed cycles honour the assignment's own variant. Otherwise conditioning
  /// exercises get conditioning arithmetic and everything else follows the cycle.
  pub fn effective_mode(&self, cycle_mode: ProgressionMode, exercise: Option<&Exercise>) -> EffectiveMode {
    match cycle_mode {
      ProgressionMode::Mixed => match self.progression {
        AssignmentProgression::Rfem => EffectiveMode::Rfem,
        AssignmentProgression::Simple(_) => EffectiveMode::Simple,
      },
      _ if exercise.is_some_and(|e| e.is_conditioning()) => EffectiveMode::Conditioning,
      ProgressionMode::Rfem => EffectiveMode::Rfem,
      ProgressionMode::Simple => EffectiveMode::Simple,
    }
  }

  pub fn simple(&self) -> Option<&SimpleProgression> {
    match &self.progression {
      AssignmentProgression::Simple(simple) => Some(simple),
      AssignmentProgression::Rfem => None,
    }
  }

  /// Conditioning base from the assignment, falling back to the exercise default
  pub fn conditioning_base(&self, exercise: Option<&Exercise>) -> Option<u32> {
    self
      .conditioning
      .and_then(|c| c.base)
      .map(|b| b.value())
      .or_else(|| exercise.and_then(|e| e.default_conditioning_base))
  }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Group {
  pub id: String,
  pub name: String,
  #[serde(default)]
  pub assignments: Vec<ExerciseAssignment>,
}

/// ---------------------------------------------------------------------------
/// Cycle
/// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Cycle {
  pub id: String,
  pub name: String,
  #[serde(default)]
  pub status: CycleStatus,
  #[serde(default)]
  pub cycle_type: CycleType,
  pub progression_mode: ProgressionMode,
  pub number_of_weeks: u32,
  pub workout_days_per_week: u32,
  #[serde(default)]
  pub scheduling_mode: SchedulingMode,
  #[serde(default)]
  pub start_date: Option<NaiveDate>,
  /// Weekday indices, 0 = Sunday through 6 = Saturday
  #[serde(default)]
  pub selected_days: BTreeSet<u8>,
  pub groups: Vec<Group>,
  pub group_rotation: Vec<String>,
  #[serde(default)]
  pub rfem_rotation: Vec<u32>,
  #[serde(default)]
  pub weekly_set_goals: BTreeMap<ExerciseType, u32>,
  #[serde(default)]
  pub conditioning_weekly_rep_increment: u32,
  #[serde(default)]
  pub conditioning_weekly_time_increment: u32,
  #[serde(default)]
  pub include_warmup_sets: bool,
  #[serde(default)]
  pub include_timed_warmups: bool,
}

impl Cycle {
  pub fn is_date_scheduled(&self) -> bool {
    self.scheduling_mode == SchedulingMode::Date
  }

  pub fn is_max_testing(&self) -> bool {
    self.cycle_type == CycleType::MaxTesting
  }

  /// Date-scheduled cycles train once per selected weekday. Out-of-range
  /// indices are skipped, matching the calendar expansion.
  pub fn effective_days_per_week(&self) -> u32 {
    if self.is_date_scheduled() {
      self.selected_days.iter().filter(|d| **d < 7).count() as u32
    } else {
      self.workout_days_per_week
    }
  }

  pub fn total_workouts(&self) -> u32 {
    self.number_of_weeks.saturating_mul(self.effective_days_per_week())
  }

  pub fn group(&self, id: &str) -> Option<&Group> {
    self.groups.iter().find(|g| g.id == id)
  }

  pub fn assignments(&self) -> impl Iterator<Item = (&Group, &ExerciseAssignment)> {
    self
      .groups
      .iter()
      .flat_map(|g| g.assignments.iter().map(move |a| (g, a)))
  }

  /// Cycle-wide conditioning increment for the given unit
  pub fn conditioning_increment(&self, measurement: MeasurementType) -> u32 {
    match measurement {
      MeasurementType::Reps => self.conditioning_weekly_rep_increment,
      MeasurementType::Time => self.conditioning_weekly_time_increment,
    }
  }
}
