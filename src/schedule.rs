//! Schedule generation
//!
//! Lays out one workout per slot `i` in `start_from_workout..total`, where
//! `i` is the absolute index into both rotations and the date list. Sets carry
//! a snapshot of their assignment's arithmetic; targets are resolved later by
//! the progression calculator.
//!
//! Output is a pure function of (cycle, exercises, start). Ids are derived
//! from the cycle id and sequence number, so regenerating an unchanged cycle
//! reproduces identical records.

use std::collections::{HashMap, HashSet};

use crate::calendar::expand_dates;
use crate::models::{
  Cycle, EffectiveMode, Exercise, ExerciseAssignment, ExerciseMap, ExerciseType, Group,
  MeasurementType, ProgressionMode, ScheduledSet, ScheduledWorkout, SetProgression,
  SimpleProgression, WarmupTier, WorkoutStatus,
};
use crate::rotation::{resolve_group, resolve_rfem};

/// ---------------------------------------------------------------------------
/// Generation
/// ---------------------------------------------------------------------------

pub fn generate(cycle: &Cycle, exercises: &ExerciseMap, start_from_workout: u32) -> Vec<ScheduledWorkout> {
  let days_per_week = cycle.effective_days_per_week();
  let total = cycle.total_workouts();

  if days_per_week == 0 || start_from_workout >= total {
    return Vec::new();
  }
  if cycle.group_rotation.is_empty() {
    tracing::warn!(cycle_id = %cycle.id, "group rotation is empty, nothing to schedule");
    return Vec::new();
  }

  let dates = if cycle.is_date_scheduled() {
    match cycle.start_date {
      Some(start) => expand_dates(start, cycle.number_of_weeks, &cycle.selected_days),
      None => {
        tracing::warn!(cycle_id = %cycle.id, "date-scheduled cycle has no start date");
        Vec::new()
      }
    }
  } else {
    Vec::new()
  };

  let mut occurrences = OccurrenceCounter::seeded(cycle, start_from_workout);
  let mut workouts = Vec::with_capacity((total - start_from_workout) as usize);

  for i in start_from_workout..total {
    let group_id = resolve_group(&cycle.group_rotation, i).unwrap_or_default();
    let sequence_number = i + 1;
    let workout_id = format!("{}-w{}", cycle.id, sequence_number);

    let scheduled_sets = match cycle.group(group_id) {
      Some(group) => build_sets(cycle, exercises, group, &workout_id, &occurrences),
      None => {
        tracing::warn!(cycle_id = %cycle.id, group_id, "rotation references a missing group");
        Vec::new()
      }
    };
    if let Some(group) = cycle.group(group_id) {
      occurrences.record(group);
    }

    workouts.push(ScheduledWorkout {
      id: workout_id,
      cycle_id: cycle.id.clone(),
      sequence_number,
      sort_key: f64::from(sequence_number),
      week_number: i / days_per_week + 1,
      day_in_week: i % days_per_week + 1,
      scheduled_date: dates.get(i as usize).copied(),
      group_id: Some(group_id.to_string()),
      rfem: slot_rfem(cycle, i),
      scheduled_sets,
      status: WorkoutStatus::Pending,
    });
  }

  tracing::debug!(
    cycle_id = %cycle.id,
    start_from_workout,
    generated = workouts.len(),
    "generated schedule"
  );

  workouts
}

/// Rfem value for the slot; pure simple cycles carry none
fn slot_rfem(cycle: &Cycle, workout_index: u32) -> Option<u32> {
  if cycle.progression_mode == ProgressionMode::Simple {
    None
  } else {
    resolve_rfem(&cycle.rfem_rotation, workout_index)
  }
}

fn build_sets(
  cycle: &Cycle,
  exercises: &ExerciseMap,
  group: &Group,
  workout_id: &str,
  occurrences: &OccurrenceCounter,
) -> Vec<ScheduledSet> {
  let mut sets = Vec::new();
  let mut warmed_up = HashSet::new();

  for assignment in &group.assignments {
    let exercise = exercises.get(&assignment.exercise_id);
    if exercise.is_none() {
      tracing::warn!(
        exercise_id = %assignment.exercise_id,
        group_id = %group.id,
        "scheduling assignment for unknown exercise"
      );
    }

    let template = set_template(cycle, assignment, exercise, occurrences.get(&assignment.exercise_id));

    // One warm-up ladder per exercise per workout
    if wants_warmups(cycle, exercise) && warmed_up.insert(assignment.exercise_id.as_str()) {
      for tier in WarmupTier::ALL {
        sets.push(ScheduledSet {
          warmup: Some(tier),
          weight: None,
          ..template.clone()
        });
      }
    }
    sets.push(template);
  }

  for (n, set) in sets.iter_mut().enumerate() {
    set.id = format!("{}-s{}", workout_id, n + 1);
  }
  sets
}

/// Working set for an assignment, before its id is assigned
fn set_template(
  cycle: &Cycle,
  assignment: &ExerciseAssignment,
  exercise: Option<&Exercise>,
  occurrence: u32,
) -> ScheduledSet {
  let measurement = exercise
    .map(|e| e.measurement_type)
    .unwrap_or(MeasurementType::Reps);
  let is_conditioning = exercise.is_some_and(|e| e.is_conditioning());
  let weight = if exercise.is_some_and(|e| e.weight_enabled) {
    assignment.weight.clone()
  } else {
    None
  };

  ScheduledSet {
    id: String::new(),
    exercise_id: assignment.exercise_id.clone(),
    exercise_type: exercise.map(|e| e.exercise_type).unwrap_or(ExerciseType::Other),
    measurement,
    warmup: None,
    is_max_test: cycle.is_max_testing(),
    is_conditioning,
    progression: set_progression(cycle, assignment, exercise, measurement),
    weight,
    occurrence,
  }
}

fn set_progression(
  cycle: &Cycle,
  assignment: &ExerciseAssignment,
  exercise: Option<&Exercise>,
  measurement: MeasurementType,
) -> SetProgression {
  match assignment.effective_mode(cycle.progression_mode, exercise) {
    EffectiveMode::Rfem => SetProgression::Rfem,
    EffectiveMode::Simple => SetProgression::Simple(
      assignment
        .simple()
        .cloned()
        .unwrap_or_else(|| SimpleProgression::unset(measurement)),
    ),
    EffectiveMode::Conditioning => SetProgression::Conditioning {
      base: assignment.conditioning_base(exercise).unwrap_or(0),
      weekly_increment: assignment
        .conditioning
        .and_then(|c| c.increment)
        .unwrap_or_else(|| cycle.conditioning_increment(measurement)),
    },
  }
}

/// Warm-ups only for known, non-conditioning exercises; timed ones need opt-in
fn wants_warmups(cycle: &Cycle, exercise: Option<&Exercise>) -> bool {
  if !cycle.include_warmup_sets {
    return false;
  }
  match exercise {
    Some(e) if e.is_conditioning() => false,
    Some(e) if e.is_timed() => cycle.include_timed_warmups,
    Some(_) => true,
    None => false,
  }
}

/// Per-exercise count of workouts already laid out before the current slot
struct OccurrenceCounter {
  counts: HashMap<String, u32>,
}

impl OccurrenceCounter {
  /// Replay the rotation over `0..start` so continuation resumes the counts
  fn seeded(cycle: &Cycle, start: u32) -> Self {
    let mut counter = Self {
      counts: HashMap::new(),
    };
    for i in 0..start {
      if let Some(group) = resolve_group(&cycle.group_rotation, i).and_then(|id| cycle.group(id)) {
        counter.record(group);
      }
    }
    counter
  }

  fn get(&self, exercise_id: &str) -> u32 {
    self.counts.get(exercise_id).copied().unwrap_or(0)
  }

  /// Count each exercise once per workout, however many assignments use it
  fn record(&mut self, group: &Group) {
    let unique: HashSet<&str> = group.assignments.iter().map(|a| a.exercise_id.as_str()).collect();
    for exercise_id in unique {
      *self.counts.entry(exercise_id.to_string()).or_insert(0) += 1;
    }
  }
}

/// ---------------------------------------------------------------------------
/// Continuation and ad-hoc workouts
/// ---------------------------------------------------------------------------

/// Index to resume generation at, given the workouts that survive a
/// continue-style edit. Ad-hoc workouts sit outside the rotation and are ignored.
pub fn continuation_offset(existing: &[ScheduledWorkout]) -> u32 {
  existing
    .iter()
    .filter_map(ScheduledWorkout::slot_index)
    .max()
    .map(|index| index + 1)
    .unwrap_or(0)
}

/// Build an ad-hoc workout that sorts right after `after_sequence` (and any
/// ad-hoc workouts already placed there) without consuming a rotation slot.
pub fn ad_hoc_workout(
  cycle_id: &str,
  existing: &[ScheduledWorkout],
  after_sequence: u32,
  sets: Vec<ScheduledSet>,
) -> ScheduledWorkout {
  let anchor = existing
    .iter()
    .filter(|w| w.sequence_number == after_sequence)
    .max_by(|a, b| a.sort_key.total_cmp(&b.sort_key));
  let anchor_key = anchor.map(|w| w.sort_key).unwrap_or(f64::from(after_sequence));
  let next_key = existing
    .iter()
    .map(|w| w.sort_key)
    .filter(|k| *k > anchor_key)
    .min_by(|a, b| a.total_cmp(b));
  let sort_key = match next_key {
    Some(next) => (anchor_key + next) / 2.0,
    None => anchor_key + 1.0,
  };

  // Numbering continues past the highest surviving suffix; siblings may
  // have been deleted, so a count would reuse a live id
  let prefix = format!("{}-w{}-adhoc", cycle_id, after_sequence);
  let last = existing
    .iter()
    .filter(|w| w.is_ad_hoc())
    .filter_map(|w| w.id.strip_prefix(&prefix)?.parse::<u32>().ok())
    .max()
    .unwrap_or(0);
  let id = format!("{}{}", prefix, last + 1);
  let sets = sets
    .into_iter()
    .enumerate()
    .map(|(n, set)| ScheduledSet {
      id: format!("{}-s{}", id, n + 1),
      ..set
    })
    .collect();

  ScheduledWorkout {
    id,
    cycle_id: cycle_id.to_string(),
    sequence_number: after_sequence,
    sort_key,
    week_number: anchor.map(|w| w.week_number).unwrap_or(1),
    day_in_week: anchor.map(|w| w.day_in_week).unwrap_or(1),
    scheduled_date: anchor.and_then(|w| w.scheduled_date),
    group_id: None,
    rfem: None,
    scheduled_sets: sets,
    status: WorkoutStatus::Pending,
  }
}

/// ---------------------------------------------------------------------------
/// Tests
/// ---------------------------------------------------------------------------
