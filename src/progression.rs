//! Progression Calculator
//!
//! Resolves the concrete target for a scheduled set at read time:
//! - rfem: established max minus the slot's rfem value, floored at 1
//! - simple: base + increment * steps (constant, per workout, per week)
//! - conditioning: base + weekly increment * (week - 1)
//! - warm-ups: 20% / 40% of the working target
//!
//! Targets are never stored with the schedule. The established max changes
//! as the user tests, so callers resolve on demand and may memoize.
//!
//! Every function here is total. Malformed input resolves to zero; the
//! validator is the place that rejects it.

use serde::{Deserialize, Serialize};

use crate::config::EngineConfig;
use crate::models::{
    Exercise, MeasurementType, ProgressionInterval, ScheduledSet, ScheduledWorkout,
    SetProgression, SimpleProgression, WarmupTier, WeightProgression,
};

/// Lowest target an rfem or warm-up set resolves to
pub const MIN_TARGET: u32 = 1;

// ---------------------------------------------------------------------------
/// Target: what the user should perform
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum Target {
    /// Max test: go all-out, no bounded number
    AllOut,
    Reps(u32),
    Seconds(u32),
}

impl Target {
    pub fn of(measurement: MeasurementType, value: u32) -> Self {
        match measurement {
            MeasurementType::Reps => Target::Reps(value),
            MeasurementType::Time => Target::Seconds(value),
        }
    }

    pub fn value(&self) -> Option<u32> {
        match self {
            Target::AllOut => None,
            Target::Reps(v) | Target::Seconds(v) => Some(*v),
        }
    }
}

impl std::fmt::Display for Target {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::AllOut => write!(f, "max effort"),
            Self::Reps(v) => write!(f, "{} reps", v),
            Self::Seconds(v) => write!(f, "{}s", v),
        }
    }
}

// ---------------------------------------------------------------------------
/// Read-time inputs that can change after generation
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TargetInputs {
    /// Most recent recorded max for the set's exercise
    pub established_max: Option<u32>,
    /// Used when no max is recorded yet
    pub fallback_default: u32,
    pub include_timed_warmups: bool,
}

impl TargetInputs {
    pub fn effective_max(&self) -> u32 {
        self.established_max.unwrap_or(self.fallback_default)
    }
}

/// Fallback max: the exercise's own default, then the engine default for its unit
pub fn fallback_default(
    exercise: Option<&Exercise>,
    measurement: MeasurementType,
    config: &EngineConfig,
) -> u32 {
    exercise
        .and_then(|e| e.default_max)
        .unwrap_or_else(|| config.fallback_max(measurement))
}

// ---------------------------------------------------------------------------
/// Target resolution
// ---------------------------------------------------------------------------

/// Resolve the reps/seconds target for one set of a workout
pub fn target_for(set: &ScheduledSet, workout: &ScheduledWorkout, inputs: &TargetInputs) -> Target {
    match set.warmup {
        Some(tier) => {
            if set.measurement == MeasurementType::Time && !inputs.include_timed_warmups {
                return Target::Seconds(0);
            }
            // A max test has no bounded working target, so scale the max itself
            let working = if set.is_max_test {
                inputs.effective_max()
            } else {
                working_value(set, workout, inputs)
            };
            Target::of(set.measurement, warmup_target(working, tier))
        }
        None if set.is_max_test => Target::AllOut,
        None => Target::of(set.measurement, working_value(set, workout, inputs)),
    }
}

fn working_value(set: &ScheduledSet, workout: &ScheduledWorkout, inputs: &TargetInputs) -> u32 {
    match &set.progression {
        SetProgression::Rfem => match workout.rfem {
            Some(rfem) => rfem_target(inputs.effective_max(), rfem),
            None => 0, // rfem slot without a resolved rfem value
        },
        SetProgression::Simple(simple) => {
            simple_target(simple, set.measurement, workout.week_number, set.occurrence)
        }
        SetProgression::Conditioning {
            base,
            weekly_increment,
        } => conditioning_target(*base, *weekly_increment, workout.week_number),
    }
}

/// Established max minus rfem, never below MIN_TARGET
pub fn rfem_target(established_max: u32, rfem: u32) -> u32 {
    established_max.saturating_sub(rfem).max(MIN_TARGET)
}

/// Number of increments applied for the interval.
/// `week_number` is 1-based, `occurrence` is zero-based.
pub fn progression_steps(interval: ProgressionInterval, week_number: u32, occurrence: u32) -> u32 {
    match interval {
        ProgressionInterval::Constant => 0,
        ProgressionInterval::PerWorkout => occurrence,
        ProgressionInterval::PerWeek => week_number.saturating_sub(1),
    }
}

/// Base + increment * steps. Zero when the base is missing or in the wrong unit.
pub fn simple_target(
    progression: &SimpleProgression,
    measurement: MeasurementType,
    week_number: u32,
    occurrence: u32,
) -> u32 {
    if progression.base.measurement() != measurement || progression.base.value() == 0 {
        return 0;
    }
    let steps = progression_steps(progression.interval, week_number, occurrence);
    progression
        .base
        .value()
        .saturating_add(progression.increment.saturating_mul(steps))
}

pub fn conditioning_target(base: u32, weekly_increment: u32, week_number: u32) -> u32 {
    if base == 0 {
        return 0;
    }
    base.saturating_add(weekly_increment.saturating_mul(week_number.saturating_sub(1)))
}

/// Scale a working target to its warm-up tier, rounding to the nearest whole
/// unit with a floor of MIN_TARGET. A zero working target stays zero.
pub fn warmup_target(working: u32, tier: WarmupTier) -> u32 {
    if working == 0 {
        return 0;
    }
    let scaled = (f64::from(working) * tier.fraction()).round() as u32;
    scaled.max(MIN_TARGET)
}

/// Added weight for a working set; None for warm-ups and unweighted sets
pub fn weight_for(set: &ScheduledSet, workout: &ScheduledWorkout) -> Option<f64> {
    if set.is_warmup() {
        return None;
    }
    set.weight
        .as_ref()
        .map(|w| weight_target(w, workout.week_number, set.occurrence))
}

pub fn weight_target(weight: &WeightProgression, week_number: u32, occurrence: u32) -> f64 {
    let steps = progression_steps(weight.interval, week_number, occurrence);
    (weight.base_weight + weight.increment * f64::from(steps)).max(0.0)
}

// ---------------------------------------------------------------------------
/// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{BaseValue, ExerciseType};
    use crate::test_utils::*;

    fn make_set(progression: SetProgression, measurement: MeasurementType) -> ScheduledSet {
        ScheduledSet {
            id: "c1-w1-s1".to_string(),
            exercise_id: "push_up".to_string(),
            exercise_type: ExerciseType::Push,
            measurement,
            warmup: None,
            is_max_test: false,
            is_conditioning: false,
            progression,
            weight: None,
            occurrence: 0,
        }
    }

    fn make_workout(week_number: u32, rfem: Option<u32>) -> ScheduledWorkout {
        ScheduledWorkout {
            id: "c1-w1".to_string(),
            cycle_id: "c1".to_string(),
            sequence_number: 1,
            sort_key: 1.0,
            week_number,
            day_in_week: 1,
            scheduled_date: None,
            group_id: Some("a".to_string()),
            rfem,
            scheduled_sets: vec![],
            status: Default::default(),
        }
    }

    fn inputs(established_max: Option<u32>) -> TargetInputs {
        TargetInputs {
            established_max,
            fallback_default: 10,
            include_timed_warmups: true,
        }
    }

    fn simple(base: BaseValue, interval: ProgressionInterval, increment: u32) -> SetProgression {
        SetProgression::Simple(SimpleProgression {
            base,
            interval,
            increment,
        })
    }

    #[test]
    fn test_rfem_targets_follow_rotation() {
        let set = make_set(SetProgression::Rfem, MeasurementType::Reps);
        let targets: Vec<Target> = [4, 3, 2]
            .into_iter()
            .map(|rfem| target_for(&set, &make_workout(1, Some(rfem)), &inputs(Some(20))))
            .collect();

        assert_eq!(
            targets,
            vec![Target::Reps(16), Target::Reps(17), Target::Reps(18)]
        );
    }

    #[test]
    fn test_rfem_falls_back_to_default_without_max() {
        let set = make_set(SetProgression::Rfem, MeasurementType::Reps);
        let target = target_for(&set, &make_workout(1, Some(3)), &inputs(None));
        assert_eq!(target, Target::Reps(7));
    }

    #[test]
    fn test_rfem_floor_prevents_non_positive_targets() {
        assert_eq!(rfem_target(3, 5), MIN_TARGET);
        assert_eq!(rfem_target(0, 0), MIN_TARGET);
        assert_eq!(rfem_target(12, 2), 10);
    }

    #[test]
    fn test_rfem_without_resolved_value_is_zero() {
        let set = make_set(SetProgression::Rfem, MeasurementType::Reps);
        assert_eq!(target_for(&set, &make_workout(1, None), &inputs(Some(20))), Target::Reps(0));
    }

    #[test]
    fn test_simple_per_week_progression() {
        let set = make_set(
            simple(BaseValue::Reps(10), ProgressionInterval::PerWeek, 2),
            MeasurementType::Reps,
        );
        assert_eq!(target_for(&set, &make_workout(1, None), &inputs(None)), Target::Reps(10));
        assert_eq!(target_for(&set, &make_workout(3, None), &inputs(None)), Target::Reps(14));
    }

    #[test]
    fn test_simple_per_workout_uses_occurrence() {
        let mut set = make_set(
            simple(BaseValue::Seconds(30), ProgressionInterval::PerWorkout, 5),
            MeasurementType::Time,
        );
        set.occurrence = 3;
        // Week number is irrelevant for per-workout progression
        assert_eq!(target_for(&set, &make_workout(1, None), &inputs(None)), Target::Seconds(45));
        assert_eq!(target_for(&set, &make_workout(4, None), &inputs(None)), Target::Seconds(45));
    }

    #[test]
    fn test_simple_constant_ignores_position() {
        let mut set = make_set(
            simple(BaseValue::Reps(8), ProgressionInterval::Constant, 3),
            MeasurementType::Reps,
        );
        set.occurrence = 9;
        assert_eq!(target_for(&set, &make_workout(5, None), &inputs(None)), Target::Reps(8));
    }

    #[test]
    fn test_simple_malformed_base_resolves_to_zero() {
        // Time base on a rep-measured set
        let mismatched = make_set(
            simple(BaseValue::Seconds(30), ProgressionInterval::PerWeek, 5),
            MeasurementType::Reps,
        );
        assert_eq!(target_for(&mismatched, &make_workout(2, None), &inputs(None)), Target::Reps(0));

        let unset = make_set(
            SetProgression::Simple(SimpleProgression::unset(MeasurementType::Reps)),
            MeasurementType::Reps,
        );
        assert_eq!(target_for(&unset, &make_workout(2, None), &inputs(None)), Target::Reps(0));
    }

    #[test]
    fn test_conditioning_weekly_increment() {
        let set = make_set(
            SetProgression::Conditioning {
                base: 10,
                weekly_increment: 2,
            },
            MeasurementType::Reps,
        );
        assert_eq!(target_for(&set, &make_workout(1, None), &inputs(None)), Target::Reps(10));
        assert_eq!(target_for(&set, &make_workout(4, None), &inputs(None)), Target::Reps(16));
        assert_eq!(conditioning_target(0, 5, 3), 0);
    }

    #[test]
    fn test_warmup_scaling() {
        assert_eq!(warmup_target(20, WarmupTier::Tier1), 4);
        assert_eq!(warmup_target(20, WarmupTier::Tier2), 8);
        // 2 * 0.2 rounds to 0, floored to 1
        assert_eq!(warmup_target(2, WarmupTier::Tier1), 1);
        assert_eq!(warmup_target(0, WarmupTier::Tier2), 0);
    }

    #[test]
    fn test_warmup_set_scales_rfem_target() {
        let mut set = make_set(SetProgression::Rfem, MeasurementType::Reps);
        set.warmup = Some(WarmupTier::Tier2);
        // Working target 24 - 4 = 20, tier 2 = 8
        let target = target_for(&set, &make_workout(1, Some(4)), &inputs(Some(24)));
        assert_eq!(target, Target::Reps(8));
    }

    #[test]
    fn test_timed_warmups_suppressed() {
        let mut set = make_set(
            simple(BaseValue::Seconds(60), ProgressionInterval::Constant, 0),
            MeasurementType::Time,
        );
        set.warmup = Some(WarmupTier::Tier1);

        let mut no_timed = inputs(None);
        no_timed.include_timed_warmups = false;
        assert_eq!(target_for(&set, &make_workout(1, None), &no_timed), Target::Seconds(0));
        assert_eq!(target_for(&set, &make_workout(1, None), &inputs(None)), Target::Seconds(12));
    }

    #[test]
    fn test_max_test_is_all_out() {
        let mut set = make_set(SetProgression::Rfem, MeasurementType::Reps);
        set.is_max_test = true;
        let target = target_for(&set, &make_workout(1, Some(2)), &inputs(Some(20)));
        assert_eq!(target, Target::AllOut);
        assert_eq!(target.value(), None);

        // Warm-ups before a max test scale the established max
        set.warmup = Some(WarmupTier::Tier1);
        assert_eq!(target_for(&set, &make_workout(1, Some(2)), &inputs(Some(20))), Target::Reps(4));
    }

    #[test]
    fn test_weight_progresses_independently() {
        let mut set = make_set(SetProgression::Rfem, MeasurementType::Reps);
        set.weight = Some(WeightProgression {
            base_weight: 10.0,
            interval: ProgressionInterval::PerWeek,
            increment: 2.5,
        });

        let weight = weight_for(&set, &make_workout(3, Some(2))).expect("weighted set");
        crate::assert_approx_eq!(weight, 15.0, 1e-9);
        // Reps target is unaffected by the weight scheme
        assert_eq!(target_for(&set, &make_workout(3, Some(2)), &inputs(Some(12))), Target::Reps(10));

        set.warmup = Some(WarmupTier::Tier1);
        assert_eq!(weight_for(&set, &make_workout(3, Some(2))), None);
    }

    #[test]
    fn test_fallback_default_precedence() {
        let exercises = mock_exercises();
        let config = EngineConfig::default();

        // pull_up carries its own default max
        assert_eq!(
            fallback_default(exercises.get("pull_up"), MeasurementType::Reps, &config),
            8
        );
        assert_eq!(
            fallback_default(exercises.get("plank"), MeasurementType::Time, &config),
            config.default_max_seconds
        );
        assert_eq!(fallback_default(None, MeasurementType::Reps, &config), config.default_max_reps);
    }
}
