//! Test utilities and helpers for unit testing
//!
//! This module provides common test infrastructure including:
//! - Database setup/teardown
//! - Mock exercise catalogs and cycles
//! - Helper assertions

use chrono::NaiveDate;
use sqlx::SqlitePool;
use std::collections::{BTreeMap, BTreeSet};

use crate::models::{
  AssignmentProgression, BaseValue, Cycle, CycleStatus, CycleType, Exercise, ExerciseAssignment,
  ExerciseMap, ExerciseMode, ExerciseType, Group, MeasurementType, ProgressionInterval,
  ProgressionMode, SchedulingMode, SimpleProgression, WeightProgression,
};
use crate::store::record_established_max;

/// ---------------------------------------------------------------------------
/// Database Test Utilities
/// ---------------------------------------------------------------------------

/// Create an in-memory SQLite database for testing
/// Runs all migrations and returns a ready-to-use pool
///
/// Uses max_connections(1) to prevent multiple pool connections from creating
/// isolated in-memory databases, which would cause intermittent test failures
pub async fn setup_test_db() -> SqlitePool {
  let pool = sqlx::sqlite::SqlitePoolOptions::new()
    .max_connections(1)
    .connect("sqlite::memory:")
    .await
    .expect("Failed to create in-memory database");

  sqlx::migrate!("./migrations")
    .run(&pool)
    .await
    .expect("Failed to run migrations");

  pool
}

/// Close a test database pool
pub async fn teardown_test_db(pool: SqlitePool) {
  pool.close().await;
}

/// Seed established maxes: push_up 20, pull_up 8
pub async fn seed_test_established_maxes(pool: &SqlitePool) {
  for (exercise_id, value) in [("push_up", 20), ("pull_up", 8)] {
    record_established_max(pool, exercise_id, value)
      .await
      .expect("Failed to seed established max");
  }
}

/// ---------------------------------------------------------------------------
/// Mock Data Factories
/// ---------------------------------------------------------------------------

fn exercise(id: &str, exercise_type: ExerciseType, measurement_type: MeasurementType) -> Exercise {
  Exercise {
    id: id.to_string(),
    name: id.replace('_', " "),
    exercise_type,
    measurement_type,
    mode: ExerciseMode::Standard,
    weight_enabled: false,
    default_max: None,
    default_conditioning_base: None,
  }
}

/// Catalog of five exercises covering every measurement and mode
///
/// - push_up: push, reps
/// - plank: core, time, no default max
/// - pull_up: pull, reps, weighted, default max 8
/// - squat: legs, reps
/// - burpee: conditioning, reps, default base 10
pub fn mock_exercises() -> ExerciseMap {
  let mut pull_up = exercise("pull_up", ExerciseType::Pull, MeasurementType::Reps);
  pull_up.weight_enabled = true;
  pull_up.default_max = Some(8);

  let mut burpee = exercise("burpee", ExerciseType::Other, MeasurementType::Reps);
  burpee.mode = ExerciseMode::Conditioning;
  burpee.default_conditioning_base = Some(10);

  [
    exercise("push_up", ExerciseType::Push, MeasurementType::Reps),
    exercise("plank", ExerciseType::Core, MeasurementType::Time),
    pull_up,
    exercise("squat", ExerciseType::Legs, MeasurementType::Reps),
    burpee,
  ]
  .into_iter()
  .map(|e| (e.id.clone(), e))
  .collect()
}

pub fn rfem_assignment(exercise_id: &str) -> ExerciseAssignment {
  ExerciseAssignment {
    exercise_id: exercise_id.to_string(),
    progression: AssignmentProgression::Rfem,
    weight: None,
    conditioning: None,
  }
}

/// Simple assignment progressing per week
pub fn simple_assignment(exercise_id: &str, base: BaseValue, increment: u32) -> ExerciseAssignment {
  simple_assignment_with(exercise_id, base, ProgressionInterval::PerWeek, increment)
}

pub fn simple_assignment_with(
  exercise_id: &str,
  base: BaseValue,
  interval: ProgressionInterval,
  increment: u32,
) -> ExerciseAssignment {
  ExerciseAssignment {
    exercise_id: exercise_id.to_string(),
    progression: AssignmentProgression::Simple(SimpleProgression {
      base,
      interval,
      increment,
    }),
    weight: None,
    conditioning: None,
  }
}

fn group(id: &str, assignments: Vec<ExerciseAssignment>) -> Group {
  Group {
    id: id.to_string(),
    name: format!("Day {}", id.to_uppercase()),
    assignments,
  }
}

fn default_goals() -> BTreeMap<ExerciseType, u32> {
  [
    (ExerciseType::Push, 6),
    (ExerciseType::Pull, 6),
    (ExerciseType::Legs, 4),
    (ExerciseType::Core, 4),
  ]
  .into_iter()
  .collect()
}

/// 3 weeks x 4 days, groups a/b alternating, rfem rotation [4, 3, 2]
pub fn mock_rfem_cycle() -> Cycle {
  Cycle {
    id: "c-rfem".to_string(),
    name: "Winter Strength".to_string(),
    status: CycleStatus::Planning,
    cycle_type: CycleType::Training,
    progression_mode: ProgressionMode::Rfem,
    number_of_weeks: 3,
    workout_days_per_week: 4,
    scheduling_mode: SchedulingMode::Sequence,
    start_date: None,
    selected_days: BTreeSet::new(),
    groups: vec![
      group("a", vec![rfem_assignment("push_up"), rfem_assignment("plank")]),
      group("b", vec![rfem_assignment("pull_up"), rfem_assignment("squat")]),
    ],
    group_rotation: vec!["a".to_string(), "b".to_string()],
    rfem_rotation: vec![4, 3, 2],
    weekly_set_goals: default_goals(),
    conditioning_weekly_rep_increment: 2,
    conditioning_weekly_time_increment: 5,
    include_warmup_sets: false,
    include_timed_warmups: false,
  }
}

/// Same shape as the rfem cycle with explicit simple targets
pub fn mock_simple_cycle() -> Cycle {
  Cycle {
    id: "c-simple".to_string(),
    name: "Volume Block".to_string(),
    progression_mode: ProgressionMode::Simple,
    groups: vec![
      group(
        "a",
        vec![
          simple_assignment("push_up", BaseValue::Reps(10), 2),
          simple_assignment_with("plank", BaseValue::Seconds(30), ProgressionInterval::PerWorkout, 5),
        ],
      ),
      group(
        "b",
        vec![
          simple_assignment("pull_up", BaseValue::Reps(5), 1),
          simple_assignment_with("squat", BaseValue::Reps(15), ProgressionInterval::Constant, 0),
        ],
      ),
    ],
    ..mock_rfem_cycle()
  }
}

/// Rfem and simple assignments side by side, with a weighted pull-up
pub fn mock_mixed_cycle() -> Cycle {
  let mut pull_up = simple_assignment("pull_up", BaseValue::Reps(5), 1);
  pull_up.weight = Some(WeightProgression {
    base_weight: 5.0,
    interval: ProgressionInterval::PerWeek,
    increment: 2.5,
  });

  Cycle {
    id: "c-mixed".to_string(),
    name: "Hybrid Block".to_string(),
    progression_mode: ProgressionMode::Mixed,
    rfem_rotation: vec![3, 2],
    groups: vec![
      group(
        "a",
        vec![
          rfem_assignment("push_up"),
          simple_assignment("plank", BaseValue::Seconds(30), 5),
        ],
      ),
      group("b", vec![pull_up, rfem_assignment("squat")]),
    ],
    ..mock_rfem_cycle()
  }
}

/// 2 weeks on Mon/Wed/Fri starting Wednesday 2026-01-07
pub fn mock_date_cycle() -> Cycle {
  Cycle {
    id: "c-date".to_string(),
    name: "Calendar Block".to_string(),
    number_of_weeks: 2,
    workout_days_per_week: 3,
    scheduling_mode: SchedulingMode::Date,
    start_date: NaiveDate::from_ymd_opt(2026, 1, 7),
    selected_days: [1, 3, 5].into_iter().collect(),
    ..mock_rfem_cycle()
  }
}

/// ---------------------------------------------------------------------------
/// Test Assertions
/// ---------------------------------------------------------------------------

/// Assert that two f64 values are approximately equal
#[macro_export]
macro_rules! assert_approx_eq {
  ($left:expr, $right:expr, $epsilon:expr) => {
    let left_val = $left;
    let right_val = $right;
    let diff = (left_val - right_val).abs();
    assert!(
      diff < $epsilon,
      "assertion failed: `(left ≈ right)`\n  left: `{:?}`,\n right: `{:?}`,\n  diff: `{:?}`,\n   eps: `{:?}`",
      left_val,
      right_val,
      diff,
      $epsilon
    );
  };
}

#[cfg(test)]
mod tests {
  use super::*;

  #[tokio::test]
  async fn test_setup_test_db() {
    let pool = setup_test_db().await;

    let tables: Vec<(String,)> =
      sqlx::query_as("SELECT name FROM sqlite_master WHERE type='table'")
        .fetch_all(&pool)
        .await
        .expect("Failed to query tables");

    let table_names: Vec<String> = tables.into_iter().map(|(name,)| name).collect();
    assert!(table_names.contains(&"scheduled_workouts".to_string()));
    assert!(table_names.contains(&"max_records".to_string()));

    teardown_test_db(pool).await;
  }

  #[test]
  fn test_mock_cycles_share_rotation() {
    let rfem = mock_rfem_cycle();
    for cycle in [mock_simple_cycle(), mock_mixed_cycle(), mock_date_cycle()] {
      assert_eq!(cycle.group_rotation, rfem.group_rotation);
      assert_ne!(cycle.id, rfem.id);
    }
    assert_eq!(mock_date_cycle().total_workouts(), 6);
  }

  #[test]
  fn test_assert_approx_eq_macro() {
    crate::assert_approx_eq!(1.0_f64, 1.0000001_f64, 0.001);
  }
}
