//! Application-layer errors.

use loadshift_domain::error::SchedulingError;
use loadshift_domain::time::TimeDensity;

/// Failures of the use-case services.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PlanningError {
    /// A domain operation rejected its input.
    #[error(transparent)]
    Scheduling(#[from] SchedulingError),

    /// The joint candidate space is larger than the configured limit.
    #[error("joint candidate space exceeds the limit of {limit}")]
    CandidateLimitExceeded { limit: usize },

    /// A forecast is not given at the density the service works with.
    #[error("series `{series}` is at {actual}, expected {expected}")]
    DensityMismatch {
        series: String,
        expected: TimeDensity,
        actual: TimeDensity,
    },
}
