//! Time series: numeric values aligned to the buckets of a time density.
//!
//! Each series carries a [`SeriesKind`] tag fixed at construction. The tag
//! decides how values combine when the series changes density: additive
//! quantities (energy) keep their total, intensive quantities (price) keep
//! their average.

mod redistribute;
mod resample;

pub use redistribute::{RELATIVE_TOLERANCE, redistribute};
pub use resample::{convert, resample_profile};

use serde::{Deserialize, Serialize};

use crate::error::{DivisionDomainError, SchedulingError};
use crate::time::TimeDensity;

/// How values of a series combine across buckets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SeriesKind {
    /// The sum across buckets is meaningful (energy, consumption).
    Additive,
    /// The average across buckets is meaningful (price, power level).
    Intensive,
}

impl std::fmt::Display for SeriesKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Additive => f.write_str("additive"),
            Self::Intensive => f.write_str("intensive"),
        }
    }
}

/// A non-empty, kind-tagged sequence of values at a given density.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawTimeSeries")]
pub struct TimeSeries {
    kind: SeriesKind,
    density: TimeDensity,
    values: Vec<f64>,
}

impl TimeSeries {
    /// Build a series.
    ///
    /// # Errors
    ///
    /// Returns [`SchedulingError::DivisionDomain`] when `values` is empty.
    pub fn new(
        kind: SeriesKind,
        density: TimeDensity,
        values: Vec<f64>,
    ) -> Result<Self, SchedulingError> {
        if values.is_empty() {
            return Err(DivisionDomainError::EmptySeries.into());
        }
        Ok(Self {
            kind,
            density,
            values,
        })
    }

    /// Build an additive series.
    ///
    /// # Errors
    ///
    /// Same as [`TimeSeries::new`].
    pub fn additive(density: TimeDensity, values: Vec<f64>) -> Result<Self, SchedulingError> {
        Self::new(SeriesKind::Additive, density, values)
    }

    /// Build an intensive series.
    ///
    /// # Errors
    ///
    /// Same as [`TimeSeries::new`].
    pub fn intensive(density: TimeDensity, values: Vec<f64>) -> Result<Self, SchedulingError> {
        Self::new(SeriesKind::Intensive, density, values)
    }

    #[must_use]
    pub fn kind(&self) -> SeriesKind {
        self.kind
    }

    #[must_use]
    pub fn density(&self) -> TimeDensity {
        self.density
    }

    #[must_use]
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Always `false`; kept alongside [`TimeSeries::len`].
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Whether the series covers exactly one day at its density.
    #[must_use]
    pub fn is_full_day(&self) -> bool {
        self.values.len() == self.density.time_points()
    }

    #[must_use]
    pub fn sum(&self) -> f64 {
        self.values.iter().sum()
    }

    #[allow(clippy::cast_precision_loss)]
    #[must_use]
    pub fn mean(&self) -> f64 {
        self.sum() / self.values.len() as f64
    }
}

#[derive(Deserialize)]
struct RawTimeSeries {
    kind: SeriesKind,
    density: TimeDensity,
    values: Vec<f64>,
}

impl TryFrom<RawTimeSeries> for TimeSeries {
    type Error = SchedulingError;

    fn try_from(raw: RawTimeSeries) -> Result<Self, Self::Error> {
        Self::new(raw.kind, raw.density, raw.values)
    }
}
