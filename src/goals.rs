//! Weekly set goals are descriptive: generation never enforces them. This
//! report compares them against the working sets a cycle actually schedules.

use serde::Serialize;
use std::collections::BTreeMap;

use crate::models::{Cycle, ExerciseMap, ExerciseType};
use crate::schedule::generate;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SetGoalReport {
  pub exercise_type: ExerciseType,
  pub weekly_goal: u32,
  /// Working sets per week, averaged over the cycle
  pub scheduled_per_week: f64,
  pub met: bool,
}

/// One entry per category that has a goal or scheduled sets, in category order
pub fn weekly_set_report(cycle: &Cycle, exercises: &ExerciseMap) -> Vec<SetGoalReport> {
  let mut scheduled: BTreeMap<ExerciseType, u32> = BTreeMap::new();
  for workout in generate(cycle, exercises, 0) {
    for set in workout.working_sets() {
      *scheduled.entry(set.exercise_type).or_insert(0) += 1;
    }
  }

  for (exercise_type, goal) in &cycle.weekly_set_goals {
    if *goal > 0 {
      scheduled.entry(*exercise_type).or_insert(0);
    }
  }

  let weeks = f64::from(cycle.number_of_weeks.max(1));
  scheduled
    .into_iter()
    .map(|(exercise_type, total)| {
      let weekly_goal = cycle.weekly_set_goals.get(&exercise_type).copied().unwrap_or(0);
      let scheduled_per_week = f64::from(total) / weeks;
      SetGoalReport {
        exercise_type,
        weekly_goal,
        scheduled_per_week,
        met: scheduled_per_week >= f64::from(weekly_goal),
      }
    })
    .collect()
}
