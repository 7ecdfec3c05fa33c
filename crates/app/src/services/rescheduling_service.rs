//! Rescheduling service: restricts planning to the window starting now.

use chrono::TimeDelta;
use loadshift_domain::device::ActivationSpec;
use loadshift_domain::mask::{TimeMask, rescheduling_mask};
use loadshift_domain::time::{TimeDensity, TimeOfDay};
use serde::Serialize;

use crate::error::PlanningError;
use crate::ports::Clock;
use crate::services::planning_service::{CandidatePlan, PlanningService};

/// Candidates restricted to a rescheduling window, with the window's mask.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReschedulePlan {
    pub mask: TimeMask,
    pub plan: CandidatePlan,
}

/// Application service for re-planning devices during the day.
pub struct ReschedulingService<C> {
    clock: C,
    density: TimeDensity,
    window: TimeDelta,
}

impl<C: Clock> ReschedulingService<C> {
    /// Create a service re-planning within `window` from the clock's time.
    pub fn new(clock: C, density: TimeDensity, window: TimeDelta) -> Self {
        Self {
            clock,
            density,
            window,
        }
    }

    /// Current wall-clock time according to the injected clock.
    pub fn current_time(&self) -> TimeOfDay {
        TimeOfDay::from(self.clock.now().time())
    }

    /// Mask of the rescheduling window starting at `current_time`.
    ///
    /// # Errors
    ///
    /// Returns [`PlanningError::Scheduling`] if the mask cannot be built.
    #[tracing::instrument(skip(self), fields(density = %self.density, window_secs = self.window.num_seconds()))]
    pub fn mask_at(&self, current_time: TimeOfDay) -> Result<TimeMask, PlanningError> {
        let mask = rescheduling_mask(current_time, self.density, self.window)?;
        if current_time.saturating_add(self.window) == TimeOfDay::end_of_day() {
            tracing::warn!(%current_time, "rescheduling window clamped at end of day");
        }
        if mask.inside_count() == 0 {
            tracing::warn!(%current_time, "rescheduling window is empty");
        }
        Ok(mask)
    }

    /// Mask of the rescheduling window starting now.
    ///
    /// # Errors
    ///
    /// Same as [`ReschedulingService::mask_at`].
    pub fn current_mask(&self) -> Result<TimeMask, PlanningError> {
        self.mask_at(self.current_time())
    }

    /// Plan `specs` with `planner`, keeping only candidates inside the
    /// rescheduling window starting at `current_time`. The window's mask is
    /// built once and returned with the plan.
    ///
    /// # Errors
    ///
    /// Returns [`PlanningError::DensityMismatch`] when the planner works at a
    /// different density, otherwise the errors of [`PlanningService::plan_within`].
    pub fn reschedule_at(
        &self,
        planner: &PlanningService,
        specs: &[ActivationSpec],
        current_time: TimeOfDay,
    ) -> Result<ReschedulePlan, PlanningError> {
        if planner.density() != self.density {
            return Err(PlanningError::DensityMismatch {
                series: "rescheduling_mask".to_string(),
                expected: planner.density(),
                actual: self.density,
            });
        }
        let mask = self.mask_at(current_time)?;
        let plan = planner.plan_within(specs, &mask)?;
        Ok(ReschedulePlan { mask, plan })
    }

    /// Like [`ReschedulingService::reschedule_at`], starting now.
    ///
    /// # Errors
    ///
    /// Same as [`ReschedulingService::reschedule_at`].
    pub fn reschedule(
        &self,
        planner: &PlanningService,
        specs: &[ActivationSpec],
    ) -> Result<ReschedulePlan, PlanningError> {
        self.reschedule_at(planner, specs, self.current_time())
    }
}
