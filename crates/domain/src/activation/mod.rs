//! Activation: 0/1 placements of a device's run over the day timeline.
//!
//! Every array produced by [`activation_candidates`] is either all zeros or
//! holds exactly one contiguous run of the device's run length. Downstream
//! rule evaluation relies on that shape.

mod combiner;
mod generator;

pub use combiner::{activation_tuples, candidate_count};
pub use generator::{activation_candidates, candidates_for_devices};

use std::ops::Range;

use serde::{Deserialize, Serialize};

/// On/off state of a device per time point (`1` = active).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ActivationArray(Vec<u8>);

impl ActivationArray {
    /// An array of `time_points` zeros.
    #[must_use]
    pub fn idle(time_points: usize) -> Self {
        Self(vec![0; time_points])
    }

    /// An array of `time_points` with ones at `[offset, offset + run_length)`.
    ///
    /// The run is truncated at the end of the array.
    #[must_use]
    pub fn with_run(time_points: usize, offset: usize, run_length: usize) -> Self {
        let mut bits = vec![0; time_points];
        let end = offset.saturating_add(run_length).min(time_points);
        if offset < end {
            bits[offset..end].fill(1);
        }
        Self(bits)
    }

    /// Wrap raw bits; any non-zero value counts as active.
    #[must_use]
    pub fn from_bits(bits: Vec<u8>) -> Self {
        Self(bits)
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

    /// `true` when no time point is active.
    #[must_use]
    pub fn is_idle(&self) -> bool {
        self.0.iter().all(|bit| *bit == 0)
    }

    /// Number of active time points.
    #[must_use]
    pub fn active_count(&self) -> usize {
        self.0.iter().filter(|bit| **bit != 0).count()
    }

    /// From the first active time point to one past the last, or `None` when
    /// idle.
    #[must_use]
    pub fn active_span(&self) -> Option<Range<usize>> {
        let first = self.0.iter().position(|bit| *bit != 0)?;
        let last = self.0.iter().rposition(|bit| *bit != 0)?;
        Some(first..last + 1)
    }

    /// `true` when the array is idle or holds a single contiguous run.
    #[must_use]
    pub fn is_single_run(&self) -> bool {
        self.active_span()
            .is_none_or(|span| span.len() == self.active_count())
    }
}

impl From<Vec<u8>> for ActivationArray {
    fn from(bits: Vec<u8>) -> Self {
        Self::from_bits(bits)
    }
}
