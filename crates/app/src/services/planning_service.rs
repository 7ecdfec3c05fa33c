//! Planning service: per-device activation candidates and the joint
//! candidate space handed to the rule evaluator.

use loadshift_domain::activation::{
    ActivationArray, activation_tuples, candidate_count, candidates_for_devices,
};
use loadshift_domain::device::{ActivationSpec, DeviceName, SchedulingWindow};
use loadshift_domain::mask::TimeMask;
use loadshift_domain::time::TimeDensity;
use serde::Serialize;

use crate::error::PlanningError;

/// Every placement of one device's run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeviceCandidates {
    pub device: DeviceName,
    pub candidates: Vec<ActivationArray>,
}

/// Per-device candidates together with their cartesian product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CandidatePlan {
    pub devices: Vec<DeviceCandidates>,
    pub tuples: Vec<Vec<ActivationArray>>,
}

/// Application service generating activation candidates at one density.
pub struct PlanningService {
    density: TimeDensity,
    max_candidates: usize,
}

impl PlanningService {
    /// Create a service working at `density` that refuses joint candidate
    /// spaces larger than `max_candidates`.
    #[must_use]
    pub fn new(density: TimeDensity, max_candidates: usize) -> Self {
        Self {
            density,
            max_candidates,
        }
    }

    #[must_use]
    pub fn density(&self) -> TimeDensity {
        self.density
    }

    /// Enumerate the candidates of each device, in the order given.
    ///
    /// # Errors
    ///
    /// Returns [`PlanningError::Scheduling`] when a spec is invalid or its run
    /// does not fit into its window.
    #[tracing::instrument(skip(self, specs), fields(devices = specs.len(), density = %self.density))]
    pub fn device_candidates(
        &self,
        specs: &[ActivationSpec],
    ) -> Result<Vec<DeviceCandidates>, PlanningError> {
        for spec in specs {
            spec.validate()?;
            if spec.window == SchedulingWindow::Unschedulable {
                tracing::warn!(device = %spec.device, "device cannot be scheduled this period");
            }
        }

        let lists = candidates_for_devices(specs, self.density.time_points())?;
        Ok(specs
            .iter()
            .zip(lists)
            .map(|(spec, candidates)| {
                tracing::debug!(device = %spec.device, count = candidates.len(), "generated candidates");
                DeviceCandidates {
                    device: spec.device.clone(),
                    candidates,
                }
            })
            .collect())
    }

    /// Keep only the candidates that run inside `mask`.
    ///
    /// A device left without any candidate falls back to a single idle
    /// candidate, exactly like an unschedulable device.
    #[tracing::instrument(skip_all, fields(inside = mask.inside_count()))]
    pub fn constrain(&self, devices: Vec<DeviceCandidates>, mask: &TimeMask) -> Vec<DeviceCandidates> {
        devices
            .into_iter()
            .map(|DeviceCandidates { device, candidates }| {
                let mut kept: Vec<ActivationArray> = candidates
                    .into_iter()
                    .filter(|candidate| mask.allows(candidate))
                    .collect();
                if kept.is_empty() {
                    tracing::warn!(%device, "no candidate fits the mask, keeping device idle");
                    kept.push(ActivationArray::idle(self.density.time_points()));
                }
                DeviceCandidates {
                    device,
                    candidates: kept,
                }
            })
            .collect()
    }

    /// Cartesian product of the devices' candidate lists.
    ///
    /// # Errors
    ///
    /// Returns [`PlanningError::CandidateLimitExceeded`] when the product is
    /// larger than the configured limit, before allocating it.
    #[tracing::instrument(skip_all, fields(devices = devices.len()))]
    pub fn joint_candidates(
        &self,
        devices: &[DeviceCandidates],
    ) -> Result<Vec<Vec<ActivationArray>>, PlanningError> {
        let lists: Vec<&[ActivationArray]> = devices
            .iter()
            .map(|device| device.candidates.as_slice())
            .collect();

        let count = candidate_count(&lists)
            .filter(|count| *count <= self.max_candidates)
            .ok_or(PlanningError::CandidateLimitExceeded {
                limit: self.max_candidates,
            })?;
        tracing::info!(count, "combining device candidates");

        Ok(activation_tuples(&lists))
    }

    /// Candidates per device and their joint space.
    ///
    /// # Errors
    ///
    /// Same as [`PlanningService::device_candidates`] and
    /// [`PlanningService::joint_candidates`].
    pub fn plan(&self, specs: &[ActivationSpec]) -> Result<CandidatePlan, PlanningError> {
        let devices = self.device_candidates(specs)?;
        let tuples = self.joint_candidates(&devices)?;
        Ok(CandidatePlan { devices, tuples })
    }

    /// Like [`PlanningService::plan`], restricted to candidates inside `mask`.
    ///
    /// # Errors
    ///
    /// Same as [`PlanningService::plan`].
    pub fn plan_within(
        &self,
        specs: &[ActivationSpec],
        mask: &TimeMask,
    ) -> Result<CandidatePlan, PlanningError> {
        let devices = self.constrain(self.device_candidates(specs)?, mask);
        let tuples = self.joint_candidates(&devices)?;
        Ok(CandidatePlan { devices, tuples })
    }
}
