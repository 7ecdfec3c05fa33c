//! Common error types used across the workspace.
//!
//! Every fallible domain operation returns [`SchedulingError`]. Errors are
//! reported synchronously and never carry partial results.

/// Top-level domain error.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SchedulingError {
    /// A run length does not fit into the available time points.
    #[error("run length {run_length} does not fit into {available} time points")]
    InvalidDuration { run_length: usize, available: usize },

    /// An array length is inconsistent with its stated time density.
    #[error("expected {expected} time points, got {actual}")]
    ShapeMismatch { expected: usize, actual: usize },

    /// A window or interval is malformed.
    #[error("invalid window")]
    InvalidWindow(#[from] WindowError),

    /// A division by a zero-length series or width, or a width that does not
    /// evenly divide a day.
    #[error("division domain error")]
    DivisionDomain(#[from] DivisionDomainError),

    /// A `HH:MM:SS` text could not be parsed.
    #[error("invalid time: {0}")]
    InvalidTime(#[from] chrono::ParseError),
}

/// Reasons a window or interval is rejected.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum WindowError {
    #[error("window end {end} is before start {start}")]
    EndBeforeStart { start: i64, end: i64 },

    #[error("window end {end} lies outside the {time_points} time points of a day")]
    OutOfDay { end: i64, time_points: usize },

    /// Only `-1` is a valid negative start; it marks a device as unschedulable.
    #[error("invalid sentinel {start}, only -1 marks an unschedulable device")]
    InvalidSentinel { start: i64 },

    #[error("interval end {end} is not after start {start}")]
    EmptyInterval { start: String, end: String },
}

/// Reasons a time density or series cannot be divided.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DivisionDomainError {
    #[error("series is empty")]
    EmptySeries,

    #[error("time density is zero")]
    ZeroDensity,

    #[error("time density of {seconds}s does not evenly divide a day")]
    UnevenDensity { seconds: u32 },

    #[error("abstraction factor must be positive and finite")]
    InvalidFactor,
}
