//! Density conversion: calendar grouping when the target is wider, forward
//! fill or fractional redistribution when it is narrower.

use std::cmp::Ordering;

use crate::error::SchedulingError;
use crate::time::TimeDensity;

use super::redistribute::sweep;
use super::{SeriesKind, TimeSeries};

/// Resample a full-day series to the `target` density.
///
/// - Target wider: source buckets are grouped by their start time from
///   midnight; additive groups are summed, intensive groups averaged.
/// - Target narrower: intensive values are forward-filled, additive values
///   are split by exact temporal overlap.
///
/// The result always holds `target.time_points()` values.
///
/// # Errors
///
/// Returns [`SchedulingError::ShapeMismatch`] when the series does not cover
/// exactly one day at its own density.
pub fn convert(series: &TimeSeries, target: TimeDensity) -> Result<TimeSeries, SchedulingError> {
    let source = series.density();
    if !series.is_full_day() {
        return Err(SchedulingError::ShapeMismatch {
            expected: source.time_points(),
            actual: series.len(),
        });
    }

    let values = match target.seconds().cmp(&source.seconds()) {
        Ordering::Equal => series.values().to_vec(),
        Ordering::Greater => {
            // A synthetic bucket at midnight of the next day closes the last
            // group; the group it opens is dropped again.
            let mut padded = series.values().to_vec();
            padded.push(0.0);
            let mut grouped = group_by_alignment(
                &padded,
                series.kind(),
                source.seconds(),
                target.seconds(),
                target.time_points() + 1,
            );
            grouped.pop();
            grouped
        }
        Ordering::Less => split(series, target, target.time_points()),
    };

    debug_assert_eq!(values.len(), target.time_points());
    TimeSeries::new(series.kind(), target, values)
}

/// Resample a series that covers only part of a day, such as an appliance's
/// consumption over a single run.
///
/// Downsampling groups buckets by start time and yields one value per target
/// bucket that a source bucket starts in. Upsampling covers the profile's full
/// extent. There is no day-length postcondition.
///
/// # Errors
///
/// Never fails for a valid [`TimeSeries`]; the `Result` mirrors [`convert`].
pub fn resample_profile(
    series: &TimeSeries,
    target: TimeDensity,
) -> Result<TimeSeries, SchedulingError> {
    let source = series.density();
    let values = match target.seconds().cmp(&source.seconds()) {
        Ordering::Equal => series.values().to_vec(),
        Ordering::Greater => {
            let last_start = (series.len() as u64 - 1) * u64::from(source.seconds());
            let groups = usize::try_from(last_start / u64::from(target.seconds()))
                .unwrap_or(usize::MAX)
                .saturating_add(1);
            group_by_alignment(
                series.values(),
                series.kind(),
                source.seconds(),
                target.seconds(),
                groups,
            )
        }
        Ordering::Less => {
            let extent = series.len() as u64 * u64::from(source.seconds());
            let buckets =
                usize::try_from(extent.div_ceil(u64::from(target.seconds()))).unwrap_or(usize::MAX);
            split(series, target, buckets)
        }
    };
    TimeSeries::new(series.kind(), target, values)
}

/// Assign each source bucket to the target bucket its start time falls in.
/// Empty target buckets are zero for additive series and carry the previous
/// value forward for intensive ones.
fn group_by_alignment(
    values: &[f64],
    kind: SeriesKind,
    source_seconds: u32,
    target_seconds: u32,
    groups: usize,
) -> Vec<f64> {
    let mut sums = vec![0.0; groups];
    let mut counts = vec![0usize; groups];

    for (index, value) in values.iter().enumerate() {
        let start = index as u64 * u64::from(source_seconds);
        let group = usize::try_from(start / u64::from(target_seconds)).unwrap_or(usize::MAX);
        if group >= groups {
            break;
        }
        sums[group] += value;
        counts[group] += 1;
    }

    match kind {
        SeriesKind::Additive => sums,
        SeriesKind::Intensive => {
            let mut previous = 0.0;
            sums.iter()
                .zip(&counts)
                .map(|(sum, count)| {
                    if *count > 0 {
                        #[allow(clippy::cast_precision_loss)]
                        let mean = sum / *count as f64;
                        previous = mean;
                    }
                    previous
                })
                .collect()
        }
    }
}

/// Spread values onto `buckets` narrower target buckets.
fn split(series: &TimeSeries, target: TimeDensity, buckets: usize) -> Vec<f64> {
    match series.kind() {
        SeriesKind::Intensive => {
            let source_seconds = u64::from(series.density().seconds());
            (0..buckets)
                .map(|index| {
                    let start = index as u64 * u64::from(target.seconds());
                    let enclosing = usize::try_from(start / source_seconds).unwrap_or(usize::MAX);
                    series
                        .values()
                        .get(enclosing)
                        .or_else(|| series.values().last())
                        .copied()
                        .unwrap_or_default()
                })
                .collect()
        }
        SeriesKind::Additive => sweep(
            series.values(),
            f64::from(series.density().seconds()),
            f64::from(target.seconds()),
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::series::RELATIVE_TOLERANCE;
    use proptest::prelude::*;

    fn density(minutes: u32) -> TimeDensity {
        TimeDensity::from_minutes(minutes).unwrap()
    }

    fn assert_close(actual: f64, expected: f64) {
        let scale = expected.abs().max(1.0);
        assert!(
            (actual - expected).abs() <= scale * RELATIVE_TOLERANCE,
            "expected {expected}, got {actual}"
        );
    }

    #[test]
    fn should_sum_constant_quarter_hours_into_hours() {
        let series = TimeSeries::additive(density(15), vec![4.0; 96]).unwrap();
        let hourly = convert(&series, density(60)).unwrap();
        assert_eq!(hourly.len(), 24);
        assert!(hourly.values().iter().all(|v| (*v - 16.0).abs() < f64::EPSILON));
        assert_close(hourly.sum(), 384.0);
    }

    #[test]
    fn should_average_intensive_series_when_downsampling() {
        let values: Vec<f64> = (0..96).map(|i| f64::from(i % 4)).collect();
        let series = TimeSeries::intensive(density(15), values).unwrap();
        let hourly = convert(&series, density(60)).unwrap();
        assert_eq!(hourly.len(), 24);
        assert!(hourly.values().iter().all(|v| (*v - 1.5).abs() < f64::EPSILON));
        assert_eq!(hourly.kind(), SeriesKind::Intensive);
    }

    #[test]
    fn should_forward_fill_intensive_series_when_upsampling() {
        let values: Vec<f64> = (0..24).map(f64::from).collect();
        let series = TimeSeries::intensive(density(60), values).unwrap();
        let quarters = convert(&series, density(15)).unwrap();
        assert_eq!(quarters.len(), 96);
        assert_eq!(&quarters.values()[..5], &[0.0, 0.0, 0.0, 0.0, 1.0]);
        assert_eq!(quarters.values()[95], 23.0);
    }

    #[test]
    fn should_split_additive_series_when_upsampling() {
        let values: Vec<f64> = (0..24).map(|i| f64::from(i) * 4.0).collect();
        let series = TimeSeries::additive(density(60), values).unwrap();
        let quarters = convert(&series, density(15)).unwrap();
        assert_eq!(quarters.len(), 96);
        assert_eq!(&quarters.values()[4..8], &[1.0, 1.0, 1.0, 1.0]);
        assert_close(quarters.sum(), series.sum());
    }

    #[test]
    fn should_group_by_start_time_for_non_integer_ratios() {
        // 72 twenty-minute buckets into 48 thirty-minute buckets
        let values: Vec<f64> = (0..72).map(f64::from).collect();
        let series = TimeSeries::additive(density(20), values).unwrap();
        let half_hours = convert(&series, density(30)).unwrap();
        assert_eq!(half_hours.len(), 48);
        // starts 0 and 20 fall in [0, 30); 40 falls in [30, 60)
        assert_close(half_hours.values()[0], 1.0);
        assert_close(half_hours.values()[1], 2.0);
        assert_close(half_hours.sum(), series.sum());
    }

    #[test]
    fn should_return_identical_values_for_same_density() {
        let series = TimeSeries::intensive(density(60), vec![0.31; 24]).unwrap();
        assert_eq!(convert(&series, density(60)).unwrap(), series);
    }

    #[test]
    fn should_reject_series_not_covering_a_day() {
        let series = TimeSeries::additive(density(15), vec![1.0; 95]).unwrap();
        assert!(matches!(
            convert(&series, density(60)),
            Err(SchedulingError::ShapeMismatch {
                expected: 96,
                actual: 95
            })
        ));
    }

    #[test]
    fn should_downsample_short_consumption_profile() {
        let profile =
            TimeSeries::additive(density(15), vec![100.0, 200.0, 312.0, 500.0, 231.0, 345.0])
                .unwrap();
        let hourly = resample_profile(&profile, density(60)).unwrap();
        assert_eq!(hourly.values(), &[1112.0, 576.0]);
    }

    #[test]
    fn should_average_short_intensive_profile() {
        let profile =
            TimeSeries::intensive(density(15), vec![100.0, 200.0, 300.0, 400.0, 500.0]).unwrap();
        let hourly = resample_profile(&profile, density(60)).unwrap();
        assert_eq!(hourly.values(), &[250.0, 500.0]);
    }

    #[test]
    fn should_upsample_profile_over_its_full_extent() {
        let profile = TimeSeries::additive(density(60), vec![800.0, 400.0]).unwrap();
        let quarters = resample_profile(&profile, density(15)).unwrap();
        assert_eq!(
            quarters.values(),
            &[200.0, 200.0, 200.0, 200.0, 100.0, 100.0, 100.0, 100.0]
        );
    }

    fn divisors_of_day() -> impl Strategy<Value = u32> {
        prop::sample::select(vec![5u32, 10, 15, 20, 30, 60, 120, 180, 240])
    }

    proptest! {
        #[test]
        fn additive_round_trip_preserves_total(
            fine in divisors_of_day(),
            coarse in divisors_of_day(),
            seed in prop::collection::vec(0.0f64..1000.0, 1..8),
        ) {
            let fine = density(fine);
            let coarse = density(coarse);
            let values: Vec<f64> =
                (0..fine.time_points()).map(|i| seed[i % seed.len()]).collect();
            let series = TimeSeries::additive(fine, values).unwrap();

            let there = convert(&series, coarse).unwrap();
            let back = convert(&there, fine).unwrap();

            prop_assert_eq!(there.len(), coarse.time_points());
            prop_assert_eq!(back.len(), fine.time_points());
            let tolerance = series.sum().abs().max(1.0) * RELATIVE_TOLERANCE;
            prop_assert!((there.sum() - series.sum()).abs() <= tolerance);
            prop_assert!((back.sum() - series.sum()).abs() <= tolerance);
        }

        #[test]
        fn constant_intensive_series_stays_constant(
            source in divisors_of_day(),
            target in divisors_of_day(),
            level in -500.0f64..500.0,
        ) {
            let source = density(source);
            let target = density(target);
            let series =
                TimeSeries::intensive(source, vec![level; source.time_points()]).unwrap();
            let converted = convert(&series, target).unwrap();
            prop_assert_eq!(converted.len(), target.time_points());
            for value in converted.values() {
                prop_assert!((value - level).abs() <= level.abs().max(1.0) * RELATIVE_TOLERANCE);
            }
        }
    }
}
