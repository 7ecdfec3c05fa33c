//! Request dispatch: one JSON request in, one JSON response out.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use loadshift_app::ports::Clock;
use loadshift_app::services::abstraction_service::{AbstractionService, HouseholdForecast};
use loadshift_app::services::planning_service::{CandidatePlan, PlanningService};
use loadshift_app::services::report_service::ReportService;
use loadshift_app::services::rescheduling_service::ReschedulingService;
use loadshift_domain::activation::ActivationArray;
use loadshift_domain::device::{ActivationSpec, DeviceName, SchedulingWindow};
use loadshift_domain::mask::{TimeMask, time_mask};
use loadshift_domain::schedule::{ScheduledInterval, ScheduledTimeFrame};
use loadshift_domain::time::{TimeDensity, TimeOfDay, abstraction_factor, compute_time_points};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::config::Scheduling;
use crate::error::CliError;

/// The operations the binary answers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Activation candidates per device and their joint space.
    Candidates,
    /// Household forecast and schedules at the abstract density.
    Abstract,
    /// Time mask of a wall-clock interval.
    Mask,
    /// Candidates restricted to the rescheduling window.
    Reschedule,
    /// Schedules rendered as intervals and dated time frames.
    Decode,
    /// Time point counts of the configured densities.
    Points,
}

impl Command {
    pub const NAMES: [&'static str; 6] = [
        "candidates",
        "abstract",
        "mask",
        "reschedule",
        "decode",
        "points",
    ];

    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Candidates => "candidates",
            Self::Abstract => "abstract",
            Self::Mask => "mask",
            Self::Reschedule => "reschedule",
            Self::Decode => "decode",
            Self::Points => "points",
        }
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Command {
    type Err = CliError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "candidates" => Ok(Self::Candidates),
            "abstract" => Ok(Self::Abstract),
            "mask" => Ok(Self::Mask),
            "reschedule" => Ok(Self::Reschedule),
            "decode" => Ok(Self::Decode),
            "points" => Ok(Self::Points),
            other => Err(CliError::UnknownCommand(other.to_string())),
        }
    }
}

/// A wall-clock interval `[start, end)`.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct IntervalRequest {
    pub start: TimeOfDay,
    pub end: TimeOfDay,
}

/// Where a device may run, as sent by the caller.
///
/// Raw bucket indices come either as a `[start, end]` pair or as a
/// `{"start", "end"}` object; a start of `-1` marks the device as not
/// schedulable this period.
#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(untagged)]
pub enum WindowRequest {
    Tagged(SchedulingWindow),
    Pair(i64, i64),
    Bounds { start: i64, end: i64 },
}

impl TryFrom<WindowRequest> for SchedulingWindow {
    type Error = CliError;

    fn try_from(value: WindowRequest) -> Result<Self, Self::Error> {
        match value {
            WindowRequest::Tagged(window) => Ok(window),
            WindowRequest::Pair(start, end) | WindowRequest::Bounds { start, end } => {
                Ok(Self::from_raw(start, end)?)
            }
        }
    }
}

/// A device to plan, defaulting to the whole day.
#[derive(Debug, Deserialize)]
pub struct DeviceRequest {
    pub device: DeviceName,
    pub run_length: usize,
    #[serde(default)]
    pub window: Option<WindowRequest>,
}

impl DeviceRequest {
    fn into_spec(self) -> Result<ActivationSpec, CliError> {
        let window = match self.window {
            Some(window) => window.try_into()?,
            None => SchedulingWindow::FullDay,
        };
        Ok(ActivationSpec {
            device: self.device,
            run_length: self.run_length,
            window,
        })
    }
}

fn into_specs(devices: Vec<DeviceRequest>) -> Result<Vec<ActivationSpec>, CliError> {
    devices.into_iter().map(DeviceRequest::into_spec).collect()
}

#[derive(Debug, Deserialize)]
pub struct CandidatesRequest {
    pub devices: Vec<DeviceRequest>,
    /// Keep only candidates running inside this interval.
    #[serde(default)]
    pub within: Option<IntervalRequest>,
}

#[derive(Debug, Deserialize)]
pub struct ApplianceRequest {
    pub device: DeviceName,
    pub consumption: Vec<f64>,
}

/// Forecasts at the configured density, kinds implied by their role.
#[derive(Debug, Deserialize)]
pub struct AbstractRequest {
    #[serde(default)]
    pub appliances: Vec<ApplianceRequest>,
    pub solar_production: Vec<f64>,
    pub energy_costs: Vec<f64>,
    pub base_load: Vec<f64>,
    /// Schedules at the configured density to move to the abstract density.
    #[serde(default)]
    pub schedules: BTreeMap<DeviceName, ActivationArray>,
}

#[derive(Debug, Serialize)]
pub struct AbstractResponse {
    pub abstraction_factor: f64,
    pub forecast: HouseholdForecast,
    pub schedules: BTreeMap<DeviceName, ActivationArray>,
}

#[derive(Debug, Serialize)]
pub struct MaskResponse {
    pub inside: usize,
    pub mask: TimeMask,
}

#[derive(Debug, Deserialize)]
pub struct RescheduleRequest {
    pub devices: Vec<DeviceRequest>,
    /// Defaults to the current local time.
    #[serde(default)]
    pub current_time: Option<TimeOfDay>,
}

#[derive(Debug, Serialize)]
pub struct RescheduleResponse {
    pub current_time: TimeOfDay,
    pub mask: TimeMask,
    pub plan: CandidatePlan,
}

#[derive(Debug, Deserialize)]
pub struct DecodeRequest {
    /// Defaults to the current local date.
    #[serde(default)]
    pub date: Option<NaiveDate>,
    pub schedules: BTreeMap<DeviceName, ActivationArray>,
}

#[derive(Debug, Serialize)]
pub struct DecodeResponse {
    pub intervals: BTreeMap<DeviceName, Option<ScheduledInterval>>,
    pub time_frames: BTreeMap<DeviceName, ScheduledTimeFrame>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct PointsRequest {
    pub time_density: Option<TimeDensity>,
    pub abstract_time_density: Option<TimeDensity>,
}

#[derive(Debug, Serialize)]
pub struct PointsResponse {
    pub time_density: TimeDensity,
    pub time_points: usize,
    pub abstract_time_density: TimeDensity,
    pub abstract_time_points: usize,
    pub abstraction_factor: f64,
}

/// Answer one request.
///
/// Blank input is read as an empty JSON object.
///
/// # Errors
///
/// Returns [`CliError::Request`] when `input` does not match the command's
/// request, and the planning or scheduling error of the underlying service
/// otherwise.
#[tracing::instrument(skip(input, settings, clock), fields(bytes = input.len()))]
pub fn dispatch<C: Clock>(
    command: Command,
    input: &str,
    settings: &Scheduling,
    clock: C,
) -> Result<Value, CliError> {
    let input = if input.trim().is_empty() { "{}" } else { input };
    let response = match command {
        Command::Candidates => serde_json::to_value(candidates(
            serde_json::from_str(input)?,
            settings,
        )?)?,
        Command::Abstract => {
            serde_json::to_value(abstract_forecast(serde_json::from_str(input)?, settings)?)?
        }
        Command::Mask => serde_json::to_value(mask(serde_json::from_str(input)?, settings)?)?,
        Command::Reschedule => serde_json::to_value(reschedule(
            serde_json::from_str(input)?,
            settings,
            clock,
        )?)?,
        Command::Decode => {
            serde_json::to_value(decode(serde_json::from_str(input)?, settings, &clock)?)?
        }
        Command::Points => serde_json::to_value(points(serde_json::from_str(input)?, settings))?,
    };
    tracing::debug!(%command, "request answered");
    Ok(response)
}

fn candidates(request: CandidatesRequest, settings: &Scheduling) -> Result<CandidatePlan, CliError> {
    let planner = PlanningService::new(settings.time_density, settings.max_candidates);
    let specs = into_specs(request.devices)?;
    let plan = match request.within {
        Some(interval) => {
            let mask = time_mask(interval.start, interval.end, settings.time_density)?;
            planner.plan_within(&specs, &mask)?
        }
        None => planner.plan(&specs)?,
    };
    Ok(plan)
}

fn abstract_forecast(
    request: AbstractRequest,
    settings: &Scheduling,
) -> Result<AbstractResponse, CliError> {
    let service = AbstractionService::new(settings.time_density, settings.abstract_time_density);
    let forecast = HouseholdForecast::from_raw(
        settings.time_density,
        request
            .appliances
            .into_iter()
            .map(|appliance| (appliance.device, appliance.consumption))
            .collect(),
        request.solar_production,
        request.energy_costs,
        request.base_load,
    )?;
    let schedules = request
        .schedules
        .iter()
        .map(|(device, schedule)| -> Result<_, CliError> {
            Ok((device.clone(), service.abstract_schedule(schedule)?))
        })
        .collect::<Result<BTreeMap<_, _>, CliError>>()?;
    Ok(AbstractResponse {
        abstraction_factor: service.abstraction_factor(),
        forecast: service.abstract_forecast(&forecast)?,
        schedules,
    })
}

fn mask(request: IntervalRequest, settings: &Scheduling) -> Result<MaskResponse, CliError> {
    let mask = time_mask(request.start, request.end, settings.time_density)?;
    Ok(MaskResponse {
        inside: mask.inside_count(),
        mask,
    })
}

fn reschedule<C: Clock>(
    request: RescheduleRequest,
    settings: &Scheduling,
    clock: C,
) -> Result<RescheduleResponse, CliError> {
    let planner = PlanningService::new(settings.time_density, settings.max_candidates);
    let service =
        ReschedulingService::new(clock, settings.time_density, settings.rescheduling_window);
    let current_time = request
        .current_time
        .unwrap_or_else(|| service.current_time());
    let specs = into_specs(request.devices)?;
    let rescheduled = service.reschedule_at(&planner, &specs, current_time)?;
    Ok(RescheduleResponse {
        current_time,
        mask: rescheduled.mask,
        plan: rescheduled.plan,
    })
}

fn decode<C: Clock>(
    request: DecodeRequest,
    settings: &Scheduling,
    clock: &C,
) -> Result<DecodeResponse, CliError> {
    let reporter = ReportService::new(settings.time_density);
    let date = request.date.unwrap_or_else(|| clock.now().date());
    let schedules: Vec<(DeviceName, ActivationArray)> = request.schedules.into_iter().collect();

    let arrays: Vec<ActivationArray> = schedules.iter().map(|(_, s)| s.clone()).collect();
    let intervals = schedules
        .iter()
        .map(|(device, _)| device.clone())
        .zip(reporter.intervals(&arrays)?)
        .collect();
    Ok(DecodeResponse {
        intervals,
        time_frames: reporter.time_frames(date, &schedules)?,
    })
}

fn points(request: PointsRequest, settings: &Scheduling) -> PointsResponse {
    let time_density = request.time_density.unwrap_or(settings.time_density);
    let abstract_time_density = request
        .abstract_time_density
        .unwrap_or(settings.abstract_time_density);
    PointsResponse {
        time_density,
        time_points: compute_time_points(time_density),
        abstract_time_density,
        abstract_time_points: compute_time_points(abstract_time_density),
        abstraction_factor: abstraction_factor(time_density, abstract_time_density),
    }
}
