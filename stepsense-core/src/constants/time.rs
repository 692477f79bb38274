//! Time-Related Constants

/// Milliseconds per second.
pub const MS_PER_SECOND: u64 = 1000;

/// Milliseconds per minute.
pub const MS_PER_MINUTE: u64 = 60 * MS_PER_SECOND;

/// Milliseconds per hour.
pub const MS_PER_HOUR: u64 = 60 * MS_PER_MINUTE;
