//! Validation errors raised by store mutations.
//!
//! A mutation that returns one of these leaves the store untouched and does
//! not notify subscribers. Callers (the UI layer) are expected to surface the
//! message; nothing retries automatically.

use thiserror::Error;

/// Input rejected by a store mutation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("username must not be empty")]
    EmptyUsername,

    #[error("username is {length} characters long, the limit is {max}")]
    UsernameTooLong { length: usize, max: usize },

    #[error("level {level} is outside the range {min}..={max}")]
    LevelOutOfRange { level: i64, min: u32, max: u32 },

    #[error("{field} must not be negative (got {value})")]
    Negative { field: &'static str, value: i64 },
}

pub type Result<T> = std::result::Result<T, ValidationError>;

/// Convert a signed input into a non-negative counter value.
pub(crate) fn non_negative(field: &'static str, value: i64) -> Result<u64> {
    u64::try_from(value).map_err(|_| ValidationError::Negative { field, value })
}
