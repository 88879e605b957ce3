//! Rotation sequencing
//!
//! Group and intensity rotations are indexed by the absolute workout index,
//! never a per-week counter. A continuation run that starts at index 12
//! lands on exactly the entry an uninterrupted run would have used.

/// Pick `rotation[workout_index mod len]`. None when the rotation is empty.
pub fn resolve<T>(rotation: &[T], workout_index: u32) -> Option<&T> {
  if rotation.is_empty() {
    return None;
  }
  rotation.get(workout_index as usize % rotation.len())
}

pub fn resolve_group(group_rotation: &[String], workout_index: u32) -> Option<&str> {
  resolve(group_rotation, workout_index).map(String::as_str)
}

pub fn resolve_rfem(rfem_rotation: &[u32], workout_index: u32) -> Option<u32> {
  resolve(rfem_rotation, workout_index).copied()
}
