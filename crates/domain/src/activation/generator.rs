//! Enumeration of every feasible placement of a device's run.

use crate::device::{ActivationSpec, SchedulingWindow};
use crate::error::SchedulingError;

use super::ActivationArray;

/// All placements of a run of `run_length` time points within `window`.
///
/// - [`SchedulingWindow::Unschedulable`] yields a single idle array.
/// - [`SchedulingWindow::FullDay`] yields `time_points - run_length + 1`
///   arrays, one per start offset in increasing order.
/// - [`SchedulingWindow::Between`] keeps only the runs that lie fully inside
///   the window, padded with zeros to the full day.
///
/// # Errors
///
/// Returns [`SchedulingError::InvalidDuration`] when `run_length` is zero or
/// longer than the day or window, and [`SchedulingError::InvalidWindow`] when
/// the window does not fit into the day.
pub fn activation_candidates(
    run_length: usize,
    time_points: usize,
    window: SchedulingWindow,
) -> Result<Vec<ActivationArray>, SchedulingError> {
    let (first, available) = match window {
        SchedulingWindow::Unschedulable => return Ok(vec![ActivationArray::idle(time_points)]),
        SchedulingWindow::FullDay => (0, time_points),
        SchedulingWindow::Between { start, end } => {
            window.validate(time_points)?;
            (start, end - start + 1)
        }
    };

    if run_length == 0 || run_length > available {
        return Err(SchedulingError::InvalidDuration {
            run_length,
            available,
        });
    }

    Ok((0..=available - run_length)
        .map(|offset| ActivationArray::with_run(time_points, first + offset, run_length))
        .collect())
}

/// Candidate lists for several devices, in the order the specs are given.
///
/// # Errors
///
/// Fails on the first spec that [`activation_candidates`] rejects.
pub fn candidates_for_devices(
    specs: &[ActivationSpec],
    time_points: usize,
) -> Result<Vec<Vec<ActivationArray>>, SchedulingError> {
    specs
        .iter()
        .map(|spec| activation_candidates(spec.run_length, time_points, spec.window))
        .collect()
}
