use chrono::{Datelike, NaiveDate, Weekday};
use std::collections::BTreeSet;

/// Sunday-based weekday index (0 = Sunday .. 6 = Saturday)
pub fn weekday_index(weekday: Weekday) -> u8 {
  weekday.num_days_from_sunday() as u8
}

/// Expand a start date into the training dates of a date-scheduled cycle.
///
/// Walks forward from `start_date` (inclusive) and keeps every day whose
/// weekday is selected, until `number_of_weeks * selected_days.len()` dates
/// are collected. Dates before the start are never emitted, so a cycle that
/// starts mid-week picks up its first slot on the next matching day.
/// Out-of-range weekday indices are ignored.
pub fn expand_dates(
  start_date: NaiveDate,
  number_of_weeks: u32,
  selected_days: &BTreeSet<u8>,
) -> Vec<NaiveDate> {
  let valid_days: BTreeSet<u8> = selected_days.iter().copied().filter(|d| *d < 7).collect();
  if valid_days.is_empty() {
    return Vec::new();
  }

  let wanted = number_of_weeks as usize * valid_days.len();
  let mut dates = Vec::with_capacity(wanted);
  let mut day = Some(start_date);

  while dates.len() < wanted {
    let Some(current) = day else { break };
    if valid_days.contains(&weekday_index(current.weekday())) {
      dates.push(current);
    }
    day = current.succ_opt();
  }

  dates
}
