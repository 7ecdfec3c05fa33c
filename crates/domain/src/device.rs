//! Device: an appliance to schedule, described by how long it runs and when
//! it may run.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{SchedulingError, WindowError};

/// Sentinel start index marking a device as not schedulable this period.
pub const UNSCHEDULABLE: i64 = -1;

/// Name of an appliance, e.g. `dishwasher`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DeviceName(String);

impl DeviceName {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DeviceName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for DeviceName {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

/// The time points a device is allowed to run in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SchedulingWindow {
    /// Any placement within the day.
    #[default]
    FullDay,
    /// Placements fully inside `[start, end]` (inclusive bucket indices).
    Between { start: usize, end: usize },
    /// Not schedulable this period; yields a single idle candidate.
    Unschedulable,
}

impl SchedulingWindow {
    /// Interpret raw bucket indices as exchanged with the rule evaluator,
    /// where a start of `-1` marks the device as unschedulable.
    ///
    /// # Errors
    ///
    /// Returns [`SchedulingError::InvalidWindow`] when `start` is negative but
    /// not `-1`, or when `end` is negative or before `start`.
    pub fn from_raw(start: i64, end: i64) -> Result<Self, SchedulingError> {
        if start == UNSCHEDULABLE {
            return Ok(Self::Unschedulable);
        }
        if start < 0 {
            return Err(WindowError::InvalidSentinel { start }.into());
        }
        if end < start {
            return Err(WindowError::EndBeforeStart { start, end }.into());
        }
        Ok(Self::Between {
            start: start.cast_unsigned() as usize,
            end: end.cast_unsigned() as usize,
        })
    }

    /// Check the window fits into a day of `time_points` buckets.
    ///
    /// # Errors
    ///
    /// Returns [`SchedulingError::InvalidWindow`] when the window ends past the
    /// last time point or before it starts.
    pub fn validate(&self, time_points: usize) -> Result<(), SchedulingError> {
        if let Self::Between { start, end } = *self {
            if end < start {
                return Err(WindowError::EndBeforeStart {
                    start: start as i64,
                    end: end as i64,
                }
                .into());
            }
            if end >= time_points {
                return Err(WindowError::OutOfDay {
                    end: end as i64,
                    time_points,
                }
                .into());
            }
        }
        Ok(())
    }
}

/// How long a device runs and where it may be placed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivationSpec {
    pub device: DeviceName,
    /// Number of consecutive active time points.
    pub run_length: usize,
    #[serde(default)]
    pub window: SchedulingWindow,
}

impl ActivationSpec {
    /// Create a builder for constructing an [`ActivationSpec`].
    #[must_use]
    pub fn builder() -> ActivationSpecBuilder {
        ActivationSpecBuilder::default()
    }

    /// Check domain invariants.
    ///
    /// # Errors
    ///
    /// Returns [`SchedulingError::InvalidDuration`] when `run_length` is zero.
    pub fn validate(&self) -> Result<(), SchedulingError> {
        if self.run_length == 0 {
            return Err(SchedulingError::InvalidDuration {
                run_length: 0,
                available: 0,
            });
        }
        Ok(())
    }
}

/// Step-by-step builder for [`ActivationSpec`].
#[derive(Debug, Default)]
pub struct ActivationSpecBuilder {
    device: Option<DeviceName>,
    run_length: Option<usize>,
    window: Option<SchedulingWindow>,
}

impl ActivationSpecBuilder {
    #[must_use]
    pub fn device(mut self, device: impl Into<DeviceName>) -> Self {
        self.device = Some(device.into());
        self
    }

    #[must_use]
    pub fn run_length(mut self, run_length: usize) -> Self {
        self.run_length = Some(run_length);
        self
    }

    #[must_use]
    pub fn window(mut self, window: SchedulingWindow) -> Self {
        self.window = Some(window);
        self
    }

    /// Consume the builder, validate, and return an [`ActivationSpec`].
    ///
    /// # Errors
    ///
    /// Returns [`SchedulingError::InvalidDuration`] if `run_length` is missing
    /// or zero.
    pub fn build(self) -> Result<ActivationSpec, SchedulingError> {
        let spec = ActivationSpec {
            device: self.device.unwrap_or_else(|| DeviceName::new("device")),
            run_length: self.run_length.unwrap_or_default(),
            window: self.window.unwrap_or_default(),
        };
        spec.validate()?;
        Ok(spec)
    }
}
