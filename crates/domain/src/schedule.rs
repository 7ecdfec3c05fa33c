//! Schedule: decoding chosen activation arrays back into wall-clock time
//! frames, and moving schedules between densities.

use std::fmt;

use chrono::{NaiveDate, NaiveDateTime, TimeDelta};
use serde::{Serialize, Serializer};

use crate::activation::ActivationArray;
use crate::error::SchedulingError;
use crate::series::{RELATIVE_TOLERANCE, TimeSeries, convert};
use crate::time::{TimeDensity, TimeOfDay};

const DATE_TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// The span a schedule keeps a device active, at second resolution.
///
/// `end` is one bucket past the last active bucket and may equal the end of
/// the day, in which case it renders as `00:00:00`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ScheduledInterval {
    start_seconds: u64,
    end_seconds: u64,
}

impl ScheduledInterval {
    #[must_use]
    pub fn start(&self) -> TimeOfDay {
        TimeOfDay::from_seconds_wrapping(self.start_seconds)
    }

    #[must_use]
    pub fn end(&self) -> TimeOfDay {
        TimeOfDay::from_seconds_wrapping(self.end_seconds)
    }

    /// Active duration.
    #[must_use]
    pub fn duration(&self) -> TimeDelta {
        TimeDelta::seconds((self.end_seconds - self.start_seconds).cast_signed())
    }

    /// Anchor the interval on `date`. An interval ending at midnight ends on
    /// the following day.
    #[must_use]
    pub fn on_date(&self, date: NaiveDate) -> ScheduledTimeFrame {
        let midnight = date.and_time(TimeOfDay::midnight().as_naive());
        ScheduledTimeFrame {
            start: midnight + TimeDelta::seconds(self.start_seconds.cast_signed()),
            end: midnight + TimeDelta::seconds(self.end_seconds.cast_signed()),
        }
    }
}

impl fmt::Display for ScheduledInterval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.start(), self.end())
    }
}

impl Serialize for ScheduledInterval {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// A scheduled interval on a calendar date, as reported to the household.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct ScheduledTimeFrame {
    #[serde(serialize_with = "serialize_date_time")]
    pub start: NaiveDateTime,
    #[serde(serialize_with = "serialize_date_time")]
    pub end: NaiveDateTime,
}

fn serialize_date_time<S: Serializer>(value: &NaiveDateTime, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.collect_str(&value.format(DATE_TIME_FORMAT))
}

/// Decode an activation array into the interval from its first active bucket
/// to the end of its last active bucket. Idle arrays decode to `None`.
///
/// # Errors
///
/// Returns [`SchedulingError::ShapeMismatch`] when the array does not hold
/// one value per time point of `density`.
pub fn decode_interval(
    schedule: &ActivationArray,
    density: TimeDensity,
) -> Result<Option<ScheduledInterval>, SchedulingError> {
    let expected = density.time_points();
    if schedule.len() != expected {
        return Err(SchedulingError::ShapeMismatch {
            expected,
            actual: schedule.len(),
        });
    }

    let width = u64::from(density.seconds());
    Ok(schedule.active_span().map(|span| ScheduledInterval {
        start_seconds: span.start as u64 * width,
        end_seconds: span.end as u64 * width,
    }))
}

/// Decode several schedules at the same density.
///
/// # Errors
///
/// Fails on the first schedule [`decode_interval`] rejects.
pub fn decode_intervals(
    schedules: &[ActivationArray],
    density: TimeDensity,
) -> Result<Vec<Option<ScheduledInterval>>, SchedulingError> {
    schedules
        .iter()
        .map(|schedule| decode_interval(schedule, density))
        .collect()
}

/// Move a schedule from `original` to `target` density.
///
/// When coarsening, a bucket is active only if every finer bucket it groups is
/// active. When refining, each finer bucket copies its enclosing bucket.
///
/// # Errors
///
/// Returns [`SchedulingError::ShapeMismatch`] when the schedule does not hold
/// one value per time point of `original`.
pub fn change_schedule_density(
    schedule: &ActivationArray,
    original: TimeDensity,
    target: TimeDensity,
) -> Result<ActivationArray, SchedulingError> {
    let expected = original.time_points();
    if schedule.len() != expected {
        return Err(SchedulingError::ShapeMismatch {
            expected,
            actual: schedule.len(),
        });
    }

    let levels = schedule
        .as_slice()
        .iter()
        .map(|bit| if *bit == 0 { 0.0 } else { 1.0 })
        .collect();
    let series = TimeSeries::intensive(original, levels)?;
    let converted = convert(&series, target)?;

    Ok(ActivationArray::from_bits(
        converted
            .values()
            .iter()
            .map(|level| u8::from(*level >= 1.0 - RELATIVE_TOLERANCE))
            .collect(),
    ))
}
