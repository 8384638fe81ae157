//! UUID generation helpers for identifier defaults.

use uuid::Uuid;

/// Generates a new random (v4) UUID.
#[must_use]
pub fn generate_uuid() -> Uuid {
    Uuid::new_v4()
}

/// Generates a new time-ordered (v7) UUID.
#[must_use]
pub fn generate_time_uuid() -> Uuid {
    Uuid::now_v7()
}

/// True for time-based UUIDs (version 1 or 7).
#[must_use]
pub fn is_time_uuid(id: &Uuid) -> bool {
    matches!(id.get_version_num(), 1 | 7)
}
