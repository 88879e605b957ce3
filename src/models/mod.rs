pub mod cycle;
pub mod exercise;
pub mod workout;

pub use cycle::{
  AssignmentProgression, BaseValue, ConditioningTarget, Cycle, CycleStatus, CycleType,
  EffectiveMode, ExerciseAssignment, Group, ProgressionInterval, ProgressionMode, SchedulingMode,
  SimpleProgression, WeightProgression,
};
pub use exercise::{Exercise, ExerciseMap, ExerciseMode, ExerciseType, MeasurementType};
pub use workout::{ScheduledSet, ScheduledWorkout, SetProgression, WarmupTier, WorkoutStatus};
