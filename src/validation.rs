//! Cycle validation
//!
//! Runs on every edit of a draft cycle, so it stays linear in the number of
//! assignments and never touches storage. Errors block committing the cycle;
//! warnings are advisory only.

use serde::Serialize;
use std::collections::{BTreeSet, HashSet};

use crate::models::{
  AssignmentProgression, Cycle, EffectiveMode, ExerciseMap, ExerciseType, Group,
};

/// ---------------------------------------------------------------------------
/// Blocking errors
/// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CycleError {
  #[error("Cycle name is required")]
  MissingName,

  #[error("Cycle must run for at least one week")]
  NoWeeks,

  #[error("Cycle needs at least one workout day per week")]
  NoWorkoutDays,

  #[error("Select at least one training day")]
  NoSelectedDays,

  #[error("Selected day {0} is not a weekday (expected 0-6)")]
  InvalidSelectedDay(u8),

  #[error("Date-scheduled cycles need a start date")]
  MissingStartDate,

  #[error("Add at least one exercise to a group")]
  NoExercises,

  #[error("Group id {0} is used by more than one group")]
  DuplicateGroup(String),

  #[error("Group rotation must contain at least one group")]
  EmptyGroupRotation,

  #[error("Group rotation references unknown group {0}")]
  UnknownRotationGroup(String),

  #[error("RFEM rotation must contain at least one value")]
  EmptyRfemRotation,

  #[error("Exercise {exercise_id} in {group} was not found (it may have been deleted)")]
  MissingExercise { group: String, exercise_id: String },

  #[error("{exercise} in {group} needs a base value greater than zero")]
  MissingBaseValue { group: String, exercise: String },

  #[error("{exercise} in {group} is measured in {expected} but its base value is in {found}")]
  BaseUnitMismatch {
    group: String,
    exercise: String,
    expected: &'static str,
    found: &'static str,
  },

  #[error("{exercise} in {group} needs a conditioning base value")]
  MissingConditioningBase { group: String, exercise: String },
}

impl Serialize for CycleError {
  fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
  where
    S: serde::Serializer,
  {
    serializer.serialize_str(&self.to_string())
  }
}

/// ---------------------------------------------------------------------------
/// Advisory warnings
/// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CycleWarning {
  #[error("Weekly set goal for {0} is zero but the cycle assigns {0} exercises")]
  ZeroSetGoal(ExerciseType),

  #[error("{selected} training days are selected but the cycle is set to {configured} workouts per week")]
  SelectedDaysMismatch { selected: u32, configured: u32 },

  #[error("Group {0} is never used by the rotation")]
  UnusedGroup(String),
}

impl Serialize for CycleWarning {
  fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
  where
    S: serde::Serializer,
  {
    serializer.serialize_str(&self.to_string())
  }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ValidationResult {
  pub valid: bool,
  pub errors: Vec<CycleError>,
  pub warnings: Vec<CycleWarning>,
}

/// ---------------------------------------------------------------------------
/// Validation
/// ---------------------------------------------------------------------------

pub fn validate(cycle: &Cycle, exercises: &ExerciseMap) -> ValidationResult {
  let mut errors = Vec::new();
  let mut warnings = Vec::new();

  if cycle.name.trim().is_empty() {
    errors.push(CycleError::MissingName);
  }
  if cycle.number_of_weeks < 1 {
    errors.push(CycleError::NoWeeks);
  }

  check_schedule(cycle, &mut errors, &mut warnings);
  check_groups(cycle, &mut errors, &mut warnings);
  check_assignments(cycle, exercises, &mut errors, &mut warnings);

  ValidationResult {
    valid: errors.is_empty(),
    errors,
    warnings,
  }
}

fn check_schedule(cycle: &Cycle, errors: &mut Vec<CycleError>, warnings: &mut Vec<CycleWarning>) {
  if !cycle.is_date_scheduled() {
    if cycle.workout_days_per_week < 1 {
      errors.push(CycleError::NoWorkoutDays);
    }
    return;
  }

  if cycle.selected_days.is_empty() {
    errors.push(CycleError::NoSelectedDays);
  }
  for day in cycle.selected_days.iter().filter(|d| **d > 6) {
    errors.push(CycleError::InvalidSelectedDay(*day));
  }
  if cycle.start_date.is_none() {
    errors.push(CycleError::MissingStartDate);
  }

  let selected = cycle.effective_days_per_week();
  if selected > 0 && selected != cycle.workout_days_per_week {
    warnings.push(CycleWarning::SelectedDaysMismatch {
      selected,
      configured: cycle.workout_days_per_week,
    });
  }
}

fn check_groups(cycle: &Cycle, errors: &mut Vec<CycleError>, warnings: &mut Vec<CycleWarning>) {
  if !cycle.groups.iter().any(|g| !g.assignments.is_empty()) {
    errors.push(CycleError::NoExercises);
  }

  let mut seen = HashSet::new();
  for group in &cycle.groups {
    if !seen.insert(group.id.as_str()) {
      errors.push(CycleError::DuplicateGroup(group.id.clone()));
    }
  }

  if cycle.group_rotation.is_empty() {
    errors.push(CycleError::EmptyGroupRotation);
  }
  // Report each dangling id once, in rotation order
  let mut reported = HashSet::new();
  for id in &cycle.group_rotation {
    if !seen.contains(id.as_str()) && reported.insert(id.as_str()) {
      errors.push(CycleError::UnknownRotationGroup(id.clone()));
    }
  }

  for group in &cycle.groups {
    if !cycle.group_rotation.iter().any(|id| *id == group.id) {
      warnings.push(CycleWarning::UnusedGroup(group_label(group)));
    }
  }
}

fn check_assignments(
  cycle: &Cycle,
  exercises: &ExerciseMap,
  errors: &mut Vec<CycleError>,
  warnings: &mut Vec<CycleWarning>,
) {
  let mut needs_rfem = false;
  let mut assigned_types = BTreeSet::new();

  for (group, assignment) in cycle.assignments() {
    let exercise = exercises.get(&assignment.exercise_id);
    let group_name = group_label(group);
    let exercise_name = exercise
      .map(|e| e.name.clone())
      .unwrap_or_else(|| assignment.exercise_id.clone());

    match exercise {
      Some(e) => {
        assigned_types.insert(e.exercise_type);
      }
      None => errors.push(CycleError::MissingExercise {
        group: group_name.clone(),
        exercise_id: assignment.exercise_id.clone(),
      }),
    }

    match assignment.effective_mode(cycle.progression_mode, exercise) {
      EffectiveMode::Rfem => needs_rfem = true,
      EffectiveMode::Simple => match &assignment.progression {
        AssignmentProgression::Simple(simple) => {
          if simple.base.value() == 0 {
            errors.push(CycleError::MissingBaseValue {
              group: group_name.clone(),
              exercise: exercise_name.clone(),
            });
          }
          if let Some(e) = exercise {
            if simple.base.measurement() != e.measurement_type {
              errors.push(CycleError::BaseUnitMismatch {
                group: group_name.clone(),
                exercise: exercise_name.clone(),
                expected: e.measurement_type.unit(),
                found: simple.base.measurement().unit(),
              });
            }
          }
        }
        AssignmentProgression::Rfem => errors.push(CycleError::MissingBaseValue {
          group: group_name.clone(),
          exercise: exercise_name.clone(),
        }),
      },
      EffectiveMode::Conditioning => {
        if !assignment.conditioning_base(exercise).is_some_and(|b| b > 0) {
          errors.push(CycleError::MissingConditioningBase {
            group: group_name.clone(),
            exercise: exercise_name.clone(),
          });
        }
        let base_unit = assignment.conditioning.and_then(|c| c.base).map(|b| b.measurement());
        if let (Some(found), Some(e)) = (base_unit, exercise) {
          if found != e.measurement_type {
            errors.push(CycleError::BaseUnitMismatch {
              group: group_name.clone(),
              exercise: exercise_name.clone(),
              expected: e.measurement_type.unit(),
              found: found.unit(),
            });
          }
        }
      }
    }
  }

  if needs_rfem && cycle.rfem_rotation.is_empty() {
    errors.push(CycleError::EmptyRfemRotation);
  }

  for exercise_type in assigned_types {
    if cycle.weekly_set_goals.get(&exercise_type).copied().unwrap_or(0) == 0 {
      warnings.push(CycleWarning::ZeroSetGoal(exercise_type));
    }
  }
}

fn group_label(group: &Group) -> String {
  if group.name.trim().is_empty() {
    group.id.clone()
  } else {
    group.name.clone()
  }
}
