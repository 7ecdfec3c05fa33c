//! Time masks: per-bucket membership of a wall-clock interval.

use chrono::TimeDelta;
use serde::{Deserialize, Serialize};

use crate::activation::ActivationArray;
use crate::error::{SchedulingError, WindowError};
use crate::time::{TimeDensity, TimeOfDay};

/// 0/1 per bucket of a day, `1` marking buckets inside an interval.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TimeMask(Vec<u8>);

impl TimeMask {
    /// A mask of `time_points` buckets, none inside.
    #[must_use]
    pub fn empty(time_points: usize) -> Self {
        Self(vec![0; time_points])
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[must_use]
    pub fn as_slice(&self) -> &[u8] {
        &self.0
    }

    #[must_use]
    pub fn is_inside(&self, index: usize) -> bool {
        self.0.get(index).is_some_and(|bit| *bit != 0)
    }

    /// Number of buckets inside the interval.
    #[must_use]
    pub fn inside_count(&self) -> usize {
        self.0.iter().filter(|bit| **bit != 0).count()
    }

    /// Whether every active time point of `activation` lies inside the mask.
    /// Arrays of a different length are never allowed.
    #[must_use]
    pub fn allows(&self, activation: &ActivationArray) -> bool {
        activation.len() == self.len()
            && activation
                .as_slice()
                .iter()
                .zip(&self.0)
                .all(|(active, inside)| *active == 0 || *inside != 0)
    }
}

/// Mask of the buckets inside `[start, end)`.
///
/// The first inside bucket is the earliest whose nominal start is at or after
/// `start`. The bucket starting exactly at `end` is outside.
///
/// # Errors
///
/// Returns [`SchedulingError::InvalidWindow`] unless `start < end`.
pub fn time_mask(
    start: TimeOfDay,
    end: TimeOfDay,
    density: TimeDensity,
) -> Result<TimeMask, SchedulingError> {
    if start >= end {
        return Err(WindowError::EmptyInterval {
            start: start.to_string(),
            end: end.to_string(),
        }
        .into());
    }

    let time_points = density.time_points();
    let width = density.seconds();
    let first = start.seconds_from_midnight().div_ceil(width) as usize;
    let past_last = (end.seconds_from_midnight().div_ceil(width) as usize).min(time_points);

    let mut mask = vec![0; time_points];
    if first < past_last {
        mask[first..past_last].fill(1);
    }
    debug_assert_eq!(mask.len(), time_points);
    Ok(TimeMask(mask))
}

/// Mask of the buckets a device may be rescheduled into, from
/// `current_time` until `current_time + window`.
///
/// The window is clamped to `23:59:59` and never wraps into the next day.
/// When nothing of the window remains (zero window, or `current_time` already
/// at the end of the day) the mask is empty.
///
/// # Errors
///
/// Same as [`time_mask`] for a non-empty window.
pub fn rescheduling_mask(
    current_time: TimeOfDay,
    density: TimeDensity,
    window: TimeDelta,
) -> Result<TimeMask, SchedulingError> {
    let end = current_time.saturating_add(window);
    if end <= current_time {
        return Ok(TimeMask::empty(density.time_points()));
    }
    time_mask(current_time, end, density)
}
