//! Time densities, wall-clock times and day arithmetic.
//!
//! A day is partitioned into equally wide buckets ("time points"). Every
//! bucket-count invariant in this crate assumes the bucket width divides a day
//! exactly, which [`TimeDensity`] enforces at construction.

use std::fmt;
use std::str::FromStr;

use chrono::{NaiveTime, TimeDelta, Timelike};
use serde::{Deserialize, Serialize};

use crate::error::{DivisionDomainError, SchedulingError};

/// Number of seconds in one day.
pub const SECONDS_PER_DAY: u32 = 86_400;

const TIME_FORMAT: &str = "%H:%M:%S";

/// Width of one bucket of the day timeline.
///
/// Parsed from and rendered as `HH:MM:SS`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TimeDensity {
    seconds: u32,
}

impl TimeDensity {
    /// Build a density from a width in seconds.
    ///
    /// # Errors
    ///
    /// Returns [`SchedulingError::DivisionDomain`] when `seconds` is zero or
    /// does not evenly divide a day.
    pub fn from_seconds(seconds: u32) -> Result<Self, SchedulingError> {
        if seconds == 0 {
            return Err(DivisionDomainError::ZeroDensity.into());
        }
        if SECONDS_PER_DAY % seconds != 0 {
            return Err(DivisionDomainError::UnevenDensity { seconds }.into());
        }
        Ok(Self { seconds })
    }

    /// Build a density from a number of minutes.
    ///
    /// # Errors
    ///
    /// Same as [`TimeDensity::from_seconds`].
    pub fn from_minutes(minutes: u32) -> Result<Self, SchedulingError> {
        Self::from_seconds(minutes.saturating_mul(60))
    }

    /// Bucket width in seconds.
    #[must_use]
    pub fn seconds(self) -> u32 {
        self.seconds
    }

    /// Number of buckets in one day.
    #[must_use]
    pub fn time_points(self) -> usize {
        (SECONDS_PER_DAY / self.seconds) as usize
    }

    /// Nominal start time of the bucket at `index`, wrapping at midnight.
    #[must_use]
    pub fn offset(self, index: usize) -> TimeOfDay {
        let seconds = (index as u64) * u64::from(self.seconds);
        TimeOfDay::from_seconds_wrapping(seconds)
    }

    /// Ratio of `target` width to this width, i.e. how many of these buckets
    /// one `target` bucket spans.
    #[must_use]
    pub fn abstraction_factor(self, target: TimeDensity) -> f64 {
        f64::from(target.seconds) / f64::from(self.seconds)
    }
}

impl fmt::Display for TimeDensity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let h = self.seconds / 3600;
        let m = (self.seconds % 3600) / 60;
        let s = self.seconds % 60;
        write!(f, "{h:02}:{m:02}:{s:02}")
    }
}

impl FromStr for TimeDensity {
    type Err = SchedulingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let delta = parse_duration(s)?;
        // parse_duration never exceeds a day
        let seconds = u32::try_from(delta.num_seconds()).unwrap_or(0);
        Self::from_seconds(seconds)
    }
}

impl TryFrom<String> for TimeDensity {
    type Error = SchedulingError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<TimeDensity> for String {
    fn from(value: TimeDensity) -> Self {
        value.to_string()
    }
}

/// Total time points per day for the given density.
#[must_use]
pub fn compute_time_points(density: TimeDensity) -> usize {
    density.time_points()
}

/// How many time points of the `original` density one time point of the
/// `abstracted` density consists of.
#[must_use]
pub fn abstraction_factor(original: TimeDensity, abstracted: TimeDensity) -> f64 {
    original.abstraction_factor(abstracted)
}

/// Parse an `HH:MM:SS` text as a duration since midnight.
///
/// `24:00:00` is accepted as a whole day.
///
/// # Errors
///
/// Returns [`SchedulingError::InvalidTime`] if `s` is not a valid `HH:MM:SS`.
pub fn parse_duration(s: &str) -> Result<TimeDelta, SchedulingError> {
    let s = s.trim();
    if is_whole_day(s) {
        return Ok(TimeDelta::seconds(i64::from(SECONDS_PER_DAY)));
    }
    let time = NaiveTime::parse_from_str(s, TIME_FORMAT)?;
    Ok(time.signed_duration_since(NaiveTime::MIN))
}

fn is_whole_day(s: &str) -> bool {
    let mut parts = s.split(':').map(str::parse::<u32>);
    matches!(
        (parts.next(), parts.next(), parts.next(), parts.next()),
        (Some(Ok(24)), Some(Ok(0)), Some(Ok(0)), None)
    )
}

/// A wall-clock time within a single day, at second resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TimeOfDay(NaiveTime);

impl TimeOfDay {
    /// `00:00:00`.
    #[must_use]
    pub fn midnight() -> Self {
        Self(NaiveTime::MIN)
    }

    /// `23:59:59`, the latest time a same-day interval may end at.
    #[must_use]
    pub fn end_of_day() -> Self {
        Self::from_seconds_wrapping(u64::from(SECONDS_PER_DAY - 1))
    }

    /// Build from hours, minutes and seconds. Returns `None` if out of range.
    #[must_use]
    pub fn from_hms(hour: u32, minute: u32, second: u32) -> Option<Self> {
        NaiveTime::from_hms_opt(hour, minute, second).map(Self)
    }

    /// Build from a second offset since midnight, wrapping into the day.
    #[must_use]
    pub fn from_seconds_wrapping(seconds: u64) -> Self {
        let within_day = seconds % u64::from(SECONDS_PER_DAY);
        // within_day < 86_400, always representable
        let delta = TimeDelta::seconds(within_day.cast_signed());
        Self(NaiveTime::MIN + delta)
    }

    /// Seconds elapsed since midnight.
    #[must_use]
    pub fn seconds_from_midnight(self) -> u32 {
        self.0.num_seconds_from_midnight()
    }

    /// Add `window`, clamping to [`TimeOfDay::end_of_day`] instead of
    /// wrapping into the next day.
    #[must_use]
    pub fn saturating_add(self, window: TimeDelta) -> Self {
        let end = i64::from(self.seconds_from_midnight()) + window.num_seconds().max(0);
        if end >= i64::from(SECONDS_PER_DAY) {
            Self::end_of_day()
        } else {
            Self::from_seconds_wrapping(end.cast_unsigned())
        }
    }

    /// Access the inner [`NaiveTime`].
    #[must_use]
    pub fn as_naive(self) -> NaiveTime {
        self.0
    }
}

impl fmt::Display for TimeOfDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format(TIME_FORMAT))
    }
}

impl FromStr for TimeOfDay {
    type Err = SchedulingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(NaiveTime::parse_from_str(s.trim(), TIME_FORMAT)?))
    }
}

impl TryFrom<String> for TimeOfDay {
    type Error = SchedulingError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<TimeOfDay> for String {
    fn from(value: TimeOfDay) -> Self {
        value.to_string()
    }
}

impl From<NaiveTime> for TimeOfDay {
    fn from(value: NaiveTime) -> Self {
        Self(value.with_nanosecond(0).unwrap_or(value))
    }
}
