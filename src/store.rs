//! Persistence collaborator for generated schedules
//!
//! The engine never reads or writes storage. This module is the caller-side
//! store it assumes: bulk insert of generated workouts, status-filtered
//! deletion for regeneration, established-max lookup, and the last-used
//! settings per exercise that seed the next cycle's defaults.

use chrono::{NaiveDate, Utc};
use serde::Serialize;
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqliteConnection, SqlitePool};
use std::collections::HashMap;

use crate::models::{Cycle, ExerciseAssignment, ScheduledSet, ScheduledWorkout, WorkoutStatus};

const DATE_FORMAT: &str = "%Y-%m-%d";

/// ---------------------------------------------------------------------------
/// Error Handling
/// ---------------------------------------------------------------------------

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
  #[error("Database error: {0}")]
  Database(#[from] sqlx::Error),

  #[error("Migration error: {0}")]
  Migration(#[from] sqlx::migrate::MigrateError),

  #[error("Serialization error: {0}")]
  Serialization(#[from] serde_json::Error),

  #[error("Invalid stored value: {0}")]
  InvalidValue(String),

  #[error("Workout not found: {0}")]
  WorkoutNotFound(String),

  #[error("Cycle is not valid: {}", .0.join("; "))]
  InvalidCycle(Vec<String>),
}

impl Serialize for StoreError {
  fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
  where
    S: serde::Serializer,
  {
    serializer.serialize_str(&self.to_string())
  }
}

/// ---------------------------------------------------------------------------
/// Scheduled Workouts
/// ---------------------------------------------------------------------------

/// Bulk-insert generated workouts in one transaction
pub async fn insert_workouts(pool: &SqlitePool, workouts: &[ScheduledWorkout]) -> Result<(), StoreError> {
  let mut tx = pool.begin().await?;
  insert_workouts_in(&mut tx, workouts).await?;
  tx.commit().await?;
  Ok(())
}

pub(crate) async fn insert_workouts_in(
  conn: &mut SqliteConnection,
  workouts: &[ScheduledWorkout],
) -> Result<(), StoreError> {
  for workout in workouts {
    let sets_json = serde_json::to_string(&workout.scheduled_sets)?;
    let scheduled_date = workout
      .scheduled_date
      .map(|d| d.format(DATE_FORMAT).to_string());

    sqlx::query(
      r#"
      INSERT INTO scheduled_workouts (
        id, cycle_id, sequence_number, sort_key, week_number, day_in_week,
        scheduled_date, group_id, rfem, sets_json, status
      )
      VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)
      "#,
    )
    .bind(&workout.id)
    .bind(&workout.cycle_id)
    .bind(i64::from(workout.sequence_number))
    .bind(workout.sort_key)
    .bind(i64::from(workout.week_number))
    .bind(i64::from(workout.day_in_week))
    .bind(scheduled_date)
    .bind(&workout.group_id)
    .bind(workout.rfem.map(i64::from))
    .bind(sets_json)
    .bind(workout.status.to_string())
    .execute(&mut *conn)
    .await?;
  }
  Ok(())
}

/// Load every workout of a cycle in timeline order
pub async fn load_cycle_workouts(
  pool: &SqlitePool,
  cycle_id: &str,
) -> Result<Vec<ScheduledWorkout>, StoreError> {
  let mut conn = pool.acquire().await?;
  load_cycle_workouts_in(&mut conn, cycle_id).await
}

pub(crate) async fn load_cycle_workouts_in(
  conn: &mut SqliteConnection,
  cycle_id: &str,
) -> Result<Vec<ScheduledWorkout>, StoreError> {
  let rows = sqlx::query(
    r#"
    SELECT
      id, cycle_id, sequence_number, sort_key, week_number, day_in_week,
      scheduled_date, group_id, rfem, sets_json, status
    FROM scheduled_workouts
    WHERE cycle_id = ?1
    ORDER BY sort_key, id
    "#,
  )
  .bind(cycle_id)
  .fetch_all(&mut *conn)
  .await?;

  rows.iter().map(workout_from_row).collect()
}

fn workout_from_row(row: &SqliteRow) -> Result<ScheduledWorkout, StoreError> {
  let sets_json: String = row.try_get("sets_json")?;
  let scheduled_sets: Vec<ScheduledSet> = serde_json::from_str(&sets_json)?;

  let scheduled_date = row
    .try_get::<Option<String>, _>("scheduled_date")?
    .map(|s| {
      NaiveDate::parse_from_str(&s, DATE_FORMAT)
        .map_err(|e| StoreError::InvalidValue(format!("scheduled_date {:?}: {}", s, e)))
    })
    .transpose()?;

  let status: String = row.try_get("status")?;
  let status: WorkoutStatus = status.parse().map_err(StoreError::InvalidValue)?;

  let rfem = row
    .try_get::<Option<i64>, _>("rfem")?
    .map(|v| to_u32(v, "rfem"))
    .transpose()?;

  Ok(ScheduledWorkout {
    id: row.try_get("id")?,
    cycle_id: row.try_get("cycle_id")?,
    sequence_number: to_u32(row.try_get("sequence_number")?, "sequence_number")?,
    sort_key: row.try_get("sort_key")?,
    week_number: to_u32(row.try_get("week_number")?, "week_number")?,
    day_in_week: to_u32(row.try_get("day_in_week")?, "day_in_week")?,
    scheduled_date,
    group_id: row.try_get("group_id")?,
    rfem,
    scheduled_sets,
    status,
  })
}

fn to_u32(value: i64, column: &str) -> Result<u32, StoreError> {
  u32::try_from(value).map_err(|_| StoreError::InvalidValue(format!("{} out of range: {}", column, value)))
}

/// Delete a cycle's workouts, optionally only those with the given statuses.
/// Returns the number of rows removed.
pub async fn delete_cycle_workouts(
  pool: &SqlitePool,
  cycle_id: &str,
  statuses: Option<&[WorkoutStatus]>,
) -> Result<u64, StoreError> {
  let mut conn = pool.acquire().await?;
  delete_cycle_workouts_in(&mut conn, cycle_id, statuses).await
}

pub(crate) async fn delete_cycle_workouts_in(
  conn: &mut SqliteConnection,
  cycle_id: &str,
  statuses: Option<&[WorkoutStatus]>,
) -> Result<u64, StoreError> {
  let Some(statuses) = statuses else {
    let result = sqlx::query("DELETE FROM scheduled_workouts WHERE cycle_id = ?1")
      .bind(cycle_id)
      .execute(&mut *conn)
      .await?;
    return Ok(result.rows_affected());
  };

  let mut removed = 0;
  for status in statuses {
    let result = sqlx::query("DELETE FROM scheduled_workouts WHERE cycle_id = ?1 AND status = ?2")
      .bind(cycle_id)
      .bind(status.to_string())
      .execute(&mut *conn)
      .await?;
    removed += result.rows_affected();
  }
  Ok(removed)
}

/// Mark a workout completed, skipped, etc.
pub async fn update_workout_status(
  pool: &SqlitePool,
  workout_id: &str,
  status: WorkoutStatus,
) -> Result<(), StoreError> {
  let result = sqlx::query(
    r#"
    UPDATE scheduled_workouts
    SET status = ?1, updated_at = CURRENT_TIMESTAMP
    WHERE id = ?2
    "#,
  )
  .bind(status.to_string())
  .bind(workout_id)
  .execute(pool)
  .await?;

  if result.rows_affected() == 0 {
    return Err(StoreError::WorkoutNotFound(workout_id.to_string()));
  }
  Ok(())
}

/// ---------------------------------------------------------------------------
/// Established Maxes
/// ---------------------------------------------------------------------------

pub async fn record_established_max(
  pool: &SqlitePool,
  exercise_id: &str,
  value: u32,
) -> Result<(), StoreError> {
  sqlx::query(
    r#"
    INSERT INTO max_records (exercise_id, value, recorded_at)
    VALUES (?1, ?2, ?3)
    "#,
  )
  .bind(exercise_id)
  .bind(i64::from(value))
  .bind(Utc::now().to_rfc3339())
  .execute(pool)
  .await?;

  Ok(())
}

/// Latest recorded max per exercise
pub async fn load_established_maxes(pool: &SqlitePool) -> Result<HashMap<String, u32>, StoreError> {
  let rows = sqlx::query(
    r#"
    SELECT exercise_id, value
    FROM max_records
    ORDER BY recorded_at, id
    "#,
  )
  .fetch_all(pool)
  .await?;

  let mut maxes = HashMap::new();
  for row in rows {
    let exercise_id: String = row.try_get("exercise_id")?;
    let value = to_u32(row.try_get("value")?, "value")?;
    // Later rows overwrite earlier ones
    maxes.insert(exercise_id, value);
  }
  Ok(maxes)
}

pub async fn load_established_max(pool: &SqlitePool, exercise_id: &str) -> Result<Option<u32>, StoreError> {
  let value: Option<i64> = sqlx::query_scalar(
    r#"
    SELECT value FROM max_records
    WHERE exercise_id = ?1
    ORDER BY recorded_at DESC, id DESC
    LIMIT 1
    "#,
  )
  .bind(exercise_id)
  .fetch_optional(pool)
  .await?;

  value.map(|v| to_u32(v, "value")).transpose()
}

/// ---------------------------------------------------------------------------
/// Last-Used Settings
/// ---------------------------------------------------------------------------

pub async fn save_last_settings(pool: &SqlitePool, assignment: &ExerciseAssignment) -> Result<(), StoreError> {
  let assignment_json = serde_json::to_string(assignment)?;

  sqlx::query(
    r#"
    INSERT INTO last_cycle_settings (exercise_id, assignment_json, updated_at)
    VALUES (?1, ?2, ?3)
    ON CONFLICT(exercise_id) DO UPDATE SET
      assignment_json = excluded.assignment_json,
      updated_at = excluded.updated_at
    "#,
  )
  .bind(&assignment.exercise_id)
  .bind(assignment_json)
  .bind(Utc::now().to_rfc3339())
  .execute(pool)
  .await?;

  Ok(())
}

/// Remember every assignment of a committed cycle. Later groups win when an
/// exercise appears more than once.
pub async fn save_cycle_settings(pool: &SqlitePool, cycle: &Cycle) -> Result<(), StoreError> {
  for (_, assignment) in cycle.assignments() {
    save_last_settings(pool, assignment).await?;
  }
  Ok(())
}

pub async fn load_last_settings(
  pool: &SqlitePool,
  exercise_id: &str,
) -> Result<Option<ExerciseAssignment>, StoreError> {
  let json: Option<String> = sqlx::query_scalar(
    "SELECT assignment_json FROM last_cycle_settings WHERE exercise_id = ?1",
  )
  .bind(exercise_id)
  .fetch_optional(pool)
  .await?;

  Ok(json.map(|j| serde_json::from_str(&j)).transpose()?)
}

/// ---------------------------------------------------------------------------
/// Tests
/// ---------------------------------------------------------------------------
