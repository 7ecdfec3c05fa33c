//! Abstraction service: moves a household's forecasts and schedules between
//! the fine scheduling density and the coarse density of the first-pass stage.

use loadshift_domain::activation::ActivationArray;
use loadshift_domain::device::DeviceName;
use loadshift_domain::error::SchedulingError;
use loadshift_domain::schedule::change_schedule_density;
use loadshift_domain::series::{TimeSeries, convert, resample_profile};
use loadshift_domain::time::TimeDensity;
use serde::{Deserialize, Serialize};

use crate::error::PlanningError;

/// Consumption of one appliance per time point over a single run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApplianceProfile {
    pub device: DeviceName,
    pub consumption: TimeSeries,
}

/// All forecasts one scheduling run works with.
///
/// Production, base load and consumption are additive (energy per time
/// point); costs are intensive (price per kWh).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HouseholdForecast {
    pub appliances: Vec<ApplianceProfile>,
    pub solar_production: TimeSeries,
    pub energy_costs: TimeSeries,
    pub base_load: TimeSeries,
}

impl HouseholdForecast {
    /// Tag raw values given at `density` with their series kinds.
    ///
    /// # Errors
    ///
    /// Returns [`SchedulingError::DivisionDomain`] when any series is empty.
    pub fn from_raw(
        density: TimeDensity,
        appliances: Vec<(DeviceName, Vec<f64>)>,
        solar_production: Vec<f64>,
        energy_costs: Vec<f64>,
        base_load: Vec<f64>,
    ) -> Result<Self, SchedulingError> {
        let appliances = appliances
            .into_iter()
            .map(|(device, values)| -> Result<ApplianceProfile, SchedulingError> {
                Ok(ApplianceProfile {
                    device,
                    consumption: TimeSeries::additive(density, values)?,
                })
            })
            .collect::<Result<Vec<_>, SchedulingError>>()?;
        Ok(Self {
            appliances,
            solar_production: TimeSeries::additive(density, solar_production)?,
            energy_costs: TimeSeries::intensive(density, energy_costs)?,
            base_load: TimeSeries::additive(density, base_load)?,
        })
    }

    fn named_series(&self) -> impl Iterator<Item = (String, &TimeSeries)> {
        self.appliances
            .iter()
            .map(|profile| (profile.device.to_string(), &profile.consumption))
            .chain([
                ("solar_production".to_string(), &self.solar_production),
                ("energy_costs".to_string(), &self.energy_costs),
                ("base_load".to_string(), &self.base_load),
            ])
    }
}

/// Application service converting between two fixed densities.
pub struct AbstractionService {
    original: TimeDensity,
    abstracted: TimeDensity,
}

impl AbstractionService {
    /// Create a service converting from `original` to `abstracted`.
    #[must_use]
    pub fn new(original: TimeDensity, abstracted: TimeDensity) -> Self {
        Self {
            original,
            abstracted,
        }
    }

    /// How many original time points one abstract time point spans.
    #[must_use]
    pub fn abstraction_factor(&self) -> f64 {
        self.original.abstraction_factor(self.abstracted)
    }

    /// Resample every forecast to the abstract density.
    ///
    /// Day-long forecasts come back with exactly one value per abstract time
    /// point; appliance profiles keep their own extent.
    ///
    /// # Errors
    ///
    /// Returns [`PlanningError::DensityMismatch`] when a series is not at the
    /// original density, and [`PlanningError::Scheduling`] when a day-long
    /// series does not cover exactly one day.
    #[tracing::instrument(
        skip_all,
        fields(original = %self.original, abstracted = %self.abstracted, appliances = forecast.appliances.len())
    )]
    pub fn abstract_forecast(
        &self,
        forecast: &HouseholdForecast,
    ) -> Result<HouseholdForecast, PlanningError> {
        for (name, series) in forecast.named_series() {
            if series.density() != self.original {
                return Err(PlanningError::DensityMismatch {
                    series: name,
                    expected: self.original,
                    actual: series.density(),
                });
            }
        }

        if self.original == self.abstracted {
            tracing::debug!("densities are equal, forecast unchanged");
            return Ok(forecast.clone());
        }

        let appliances = forecast
            .appliances
            .iter()
            .map(|profile| -> Result<ApplianceProfile, SchedulingError> {
                Ok(ApplianceProfile {
                    device: profile.device.clone(),
                    consumption: resample_profile(&profile.consumption, self.abstracted)?,
                })
            })
            .collect::<Result<Vec<_>, SchedulingError>>()?;

        let abstracted = HouseholdForecast {
            appliances,
            solar_production: convert(&forecast.solar_production, self.abstracted)?,
            energy_costs: convert(&forecast.energy_costs, self.abstracted)?,
            base_load: convert(&forecast.base_load, self.abstracted)?,
        };
        tracing::info!(
            factor = self.abstraction_factor(),
            time_points = self.abstracted.time_points(),
            "abstracted household forecast"
        );
        Ok(abstracted)
    }

    /// Move a schedule at the original density to the abstract density.
    ///
    /// # Errors
    ///
    /// Returns [`PlanningError::Scheduling`] when the schedule length does not
    /// match the original density.
    pub fn abstract_schedule(
        &self,
        schedule: &ActivationArray,
    ) -> Result<ActivationArray, PlanningError> {
        Ok(change_schedule_density(
            schedule,
            self.original,
            self.abstracted,
        )?)
    }

    /// Move a schedule at the abstract density back to the original density.
    ///
    /// # Errors
    ///
    /// Returns [`PlanningError::Scheduling`] when the schedule length does not
    /// match the abstract density.
    pub fn refine_schedule(
        &self,
        schedule: &ActivationArray,
    ) -> Result<ActivationArray, PlanningError> {
        Ok(change_schedule_density(
            schedule,
            self.abstracted,
            self.original,
        )?)
    }
}
