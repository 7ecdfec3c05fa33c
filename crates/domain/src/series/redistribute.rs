//! Sum-preserving redistribution of an additive series onto buckets of a
//! different width.

use std::mem;

use crate::error::{DivisionDomainError, SchedulingError};
use crate::time::SECONDS_PER_DAY;

/// Relative tolerance under which a remaining capacity or share counts as zero.
pub const RELATIVE_TOLERANCE: f64 = 1e-9;

/// Smallest accepted factor: one-second output buckets out of day-long
/// source buckets.
#[allow(clippy::cast_lossless)]
pub const MIN_FACTOR: f64 = 1.0 / SECONDS_PER_DAY as f64;

/// Redistribute `values` onto output buckets each spanning `factor` source
/// buckets, splitting a source value across output buckets by its exact
/// temporal overlap.
///
/// The total is conserved: every part of every source value lands in exactly
/// one output bucket. A trailing partially filled output bucket is kept.
///
/// # Errors
///
/// Returns [`SchedulingError::DivisionDomain`] when `values` is empty or
/// `factor` is not a finite number of at least [`MIN_FACTOR`].
pub fn redistribute(values: &[f64], factor: f64) -> Result<Vec<f64>, SchedulingError> {
    if values.is_empty() {
        return Err(DivisionDomainError::EmptySeries.into());
    }
    if !factor.is_finite() || factor < MIN_FACTOR {
        return Err(DivisionDomainError::InvalidFactor.into());
    }
    Ok(sweep(values, 1.0, factor))
}

/// Single left-to-right sweep. Widths share a unit (seconds when called with
/// densities, source buckets when called with a factor).
pub(crate) fn sweep(values: &[f64], source_width: f64, target_width: f64) -> Vec<f64> {
    let tolerance = source_width.min(target_width) * RELATIVE_TOLERANCE;
    let mut output = Vec::with_capacity(expected_len(values.len(), source_width, target_width));

    let mut bucket = 0.0;
    let mut bucket_open = false;
    let mut capacity = target_width;

    for &value in values {
        let mut share = source_width;
        let mut remaining = value;
        loop {
            let portion = capacity.min(share);
            let exhausts_source = share - portion <= tolerance;
            let assigned = if exhausts_source {
                remaining
            } else {
                value * portion / source_width
            };

            bucket += assigned;
            remaining -= assigned;
            capacity -= portion;
            share -= portion;
            bucket_open = true;

            if capacity <= tolerance {
                output.push(mem::take(&mut bucket));
                capacity = target_width;
                bucket_open = false;
            }
            if exhausts_source {
                break;
            }
        }
    }

    if bucket_open {
        output.push(bucket);
    }
    output
}

/// Capacity hint for the output, never above one day of one-second buckets.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss, clippy::cast_precision_loss)]
fn expected_len(len: usize, source_width: f64, target_width: f64) -> usize {
    let hint = (len as f64 * source_width / target_width).ceil();
    hint.min(f64::from(SECONDS_PER_DAY)) as usize
}
