//! Report service: renders chosen schedules as wall-clock time frames.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use loadshift_domain::activation::ActivationArray;
use loadshift_domain::device::DeviceName;
use loadshift_domain::schedule::{
    ScheduledInterval, ScheduledTimeFrame, decode_interval, decode_intervals,
};
use loadshift_domain::time::TimeDensity;

use crate::error::PlanningError;

/// Application service decoding schedules at one density.
pub struct ReportService {
    density: TimeDensity,
}

impl ReportService {
    #[must_use]
    pub fn new(density: TimeDensity) -> Self {
        Self { density }
    }

    /// Decode each schedule into its interval; idle schedules yield `None`.
    ///
    /// # Errors
    ///
    /// Returns [`PlanningError::Scheduling`] when a schedule does not match
    /// the density.
    pub fn intervals(
        &self,
        schedules: &[ActivationArray],
    ) -> Result<Vec<Option<ScheduledInterval>>, PlanningError> {
        Ok(decode_intervals(schedules, self.density)?)
    }

    /// Time frames per device anchored on `date`. Idle devices are left out.
    ///
    /// # Errors
    ///
    /// Returns [`PlanningError::Scheduling`] when a schedule does not match
    /// the density.
    #[tracing::instrument(skip(self, schedules), fields(devices = schedules.len()))]
    pub fn time_frames(
        &self,
        date: NaiveDate,
        schedules: &[(DeviceName, ActivationArray)],
    ) -> Result<BTreeMap<DeviceName, ScheduledTimeFrame>, PlanningError> {
        let mut frames = BTreeMap::new();
        for (device, schedule) in schedules {
            match decode_interval(schedule, self.density)? {
                Some(interval) => {
                    tracing::debug!(%device, %interval, "scheduled");
                    frames.insert(device.clone(), interval.on_date(date));
                }
                None => tracing::debug!(%device, "not scheduled"),
            }
        }
        Ok(frames)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use loadshift_domain::error::SchedulingError;

    fn make_service() -> ReportService {
        ReportService::new("01:00:00".parse().unwrap())
    }

    #[test]
    fn should_render_intervals_for_each_schedule() {
        let svc = make_service();
        let intervals = svc
            .intervals(&[
                ActivationArray::with_run(24, 15, 3),
                ActivationArray::idle(24),
            ])
            .unwrap();
        assert_eq!(intervals[0].unwrap().to_string(), "15:00:00-18:00:00");
        assert_eq!(intervals[1], None);
    }

    #[test]
    fn should_report_time_frames_for_scheduled_devices_only() {
        let svc = make_service();
        let date = NaiveDate::from_ymd_opt(2026, 10, 15).unwrap();
        let frames = svc
            .time_frames(
                date,
                &[
                    ("dishwasher".into(), ActivationArray::with_run(24, 13, 2)),
                    ("dryer".into(), ActivationArray::idle(24)),
                ],
            )
            .unwrap();

        assert_eq!(frames.len(), 1);
        let json = serde_json::to_value(&frames).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "dishwasher": {"start": "2026-10-15 13:00:00", "end": "2026-10-15 15:00:00"}
            })
        );
    }

    #[test]
    fn should_reject_schedule_at_other_density() {
        let svc = make_service();
        let date = NaiveDate::from_ymd_opt(2026, 10, 15).unwrap();
        let result = svc.time_frames(date, &[("oven".into(), ActivationArray::idle(96))]);
        assert!(matches!(
            result,
            Err(PlanningError::Scheduling(SchedulingError::ShapeMismatch { .. }))
        ));
    }
}
