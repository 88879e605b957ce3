//! Regeneration after a cycle edit
//!
//! Restart wipes the cycle's schedule and lays it out again from the first
//! slot. Continue keeps every completed or skipped workout, drops the rest and
//! generates only the slots after the last surviving one, so rotation and
//! per-workout progression pick up where the history left off.

use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;

use crate::models::{Cycle, ExerciseMap, ScheduledWorkout, WorkoutStatus};
use crate::schedule::{continuation_offset, generate};
use crate::store::{self, StoreError};
use crate::validation::validate;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RegenerationStrategy {
  Continue,
  Restart,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RegenerationOutcome {
  /// Rows deleted before generating
  pub removed: u64,
  pub start_from_workout: u32,
  /// Newly generated workouts, already persisted
  pub workouts: Vec<ScheduledWorkout>,
}

pub async fn regenerate_cycle(
  pool: &SqlitePool,
  cycle: &Cycle,
  exercises: &ExerciseMap,
  strategy: RegenerationStrategy,
) -> Result<RegenerationOutcome, StoreError> {
  let result = validate(cycle, exercises);
  if !result.valid {
    return Err(StoreError::InvalidCycle(
      result.errors.iter().map(ToString::to_string).collect(),
    ));
  }
  for warning in &result.warnings {
    tracing::warn!(cycle_id = %cycle.id, "{}", warning);
  }

  let mut tx = pool.begin().await?;

  let (removed, start_from_workout) = match strategy {
    RegenerationStrategy::Restart => {
      let removed = store::delete_cycle_workouts_in(&mut tx, &cycle.id, None).await?;
      (removed, 0)
    }
    RegenerationStrategy::Continue => {
      let unsettled: Vec<WorkoutStatus> = WorkoutStatus::ALL
        .into_iter()
        .filter(|s| !s.is_settled())
        .collect();
      let removed = store::delete_cycle_workouts_in(&mut tx, &cycle.id, Some(unsettled.as_slice())).await?;
      let kept = store::load_cycle_workouts_in(&mut tx, &cycle.id).await?;
      (removed, continuation_offset(&kept))
    }
  };

  let workouts = generate(cycle, exercises, start_from_workout);
  store::insert_workouts_in(&mut tx, &workouts).await?;
  tx.commit().await?;

  tracing::info!(
    cycle_id = %cycle.id,
    ?strategy,
    removed,
    start_from_workout,
    generated = workouts.len(),
    "regenerated cycle schedule"
  );

  Ok(RegenerationOutcome {
    removed,
    start_from_workout,
    workouts,
  })
}
