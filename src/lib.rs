//! Cycle schedule and progression engine for bodyweight strength training
//!
//! The engine modules (`rotation`, `calendar`, `progression`, `validation`,
//! `schedule`, `goals`) are pure and synchronous. `db`, `store` and
//! `regenerate` are the sqlite collaborator that persists generated workouts
//! and drives continue/restart regeneration.

pub mod calendar;
pub mod config;
pub mod db;
pub mod goals;
pub mod models;
pub mod progression;
pub mod regenerate;
pub mod rotation;
pub mod schedule;
pub mod store;
pub mod validation;

#[cfg(test)]
mod test_utils;

pub use calendar::expand_dates;
pub use config::{ConfigError, EngineConfig};
pub use goals::{weekly_set_report, SetGoalReport};
pub use progression::{fallback_default, target_for, weight_for, Target, TargetInputs};
pub use regenerate::{regenerate_cycle, RegenerationOutcome, RegenerationStrategy};
pub use rotation::{resolve_group, resolve_rfem};
pub use schedule::{ad_hoc_workout, continuation_offset, generate};
pub use store::StoreError;
pub use validation::{validate, CycleError, CycleWarning, ValidationResult};
