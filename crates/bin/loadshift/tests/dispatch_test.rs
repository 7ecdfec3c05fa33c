//! End-to-end tests for request dispatch.
//!
//! Each test feeds a JSON request through `dispatch` with a fixed clock and
//! hourly settings, and inspects the JSON response. No process is spawned.

use chrono::{NaiveDate, TimeDelta};
use loadshift::commands::{Command, dispatch};
use loadshift::config::Scheduling;
use loadshift::error::CliError;
use loadshift_app::error::PlanningError;
use loadshift_app::ports::FixedClock;
use loadshift_domain::error::{SchedulingError, WindowError};
use serde_json::{Value, json};

fn settings() -> Scheduling {
    Scheduling {
        time_density: "01:00:00".parse().unwrap(),
        abstract_time_density: "04:00:00".parse().unwrap(),
        rescheduling_window: TimeDelta::hours(6),
        max_candidates: 1_000,
    }
}

fn clock() -> FixedClock {
    FixedClock(
        NaiveDate::from_ymd_opt(2026, 10, 15)
            .unwrap()
            .and_hms_opt(14, 0, 0)
            .unwrap(),
    )
}

fn run(command: Command, request: &Value) -> Result<Value, CliError> {
    dispatch(command, &request.to_string(), &settings(), clock())
}

fn ones(bits: &Value) -> Vec<usize> {
    bits.as_array()
        .unwrap()
        .iter()
        .enumerate()
        .filter(|(_, bit)| bit.as_u64() == Some(1))
        .map(|(i, _)| i)
        .collect()
}

// ---------------------------------------------------------------------------
// candidates
// ---------------------------------------------------------------------------

#[test]
fn should_list_candidates_and_joint_space() {
    let response = run(
        Command::Candidates,
        &json!({
            "devices": [
                {"device": "dishwasher", "run_length": 2, "window": {"type": "between", "start": 20, "end": 23}},
                {"device": "dryer", "run_length": 1, "window": {"type": "unschedulable"}}
            ]
        }),
    )
    .unwrap();

    let dishwasher = response["devices"][0]["candidates"].as_array().unwrap();
    assert_eq!(response["devices"][0]["device"], "dishwasher");
    assert_eq!(dishwasher.len(), 3);
    assert_eq!(ones(&dishwasher[0]), vec![20, 21]);
    assert_eq!(ones(&dishwasher[2]), vec![22, 23]);

    let dryer = response["devices"][1]["candidates"].as_array().unwrap();
    assert_eq!(dryer.len(), 1);
    assert!(ones(&dryer[0]).is_empty());

    assert_eq!(response["tuples"].as_array().unwrap().len(), 3);
}

#[test]
fn should_default_to_full_day_window() {
    let response = run(
        Command::Candidates,
        &json!({"devices": [{"device": "kettle", "run_length": 24}]}),
    )
    .unwrap();
    let candidates = response["devices"][0]["candidates"].as_array().unwrap();
    assert_eq!(candidates.len(), 1);
    assert_eq!(ones(&candidates[0]).len(), 24);
}

#[test]
fn should_idle_device_when_raw_window_starts_at_minus_one() {
    let response = run(
        Command::Candidates,
        &json!({
            "devices": [
                {"device": "dryer", "run_length": 2, "window": [-1, 5]},
                {"device": "dishwasher", "run_length": 2, "window": [3, 5]}
            ]
        }),
    )
    .unwrap();
    let dryer = response["devices"][0]["candidates"].as_array().unwrap();
    assert_eq!(dryer.len(), 1);
    assert!(ones(&dryer[0]).is_empty());
    let dishwasher = response["devices"][1]["candidates"].as_array().unwrap();
    assert_eq!(dishwasher.len(), 2);
    assert_eq!(ones(&dishwasher[1]), vec![4, 5]);
}

#[test]
fn should_reject_raw_window_with_other_negative_start() {
    let result = run(
        Command::Reschedule,
        &json!({
            "devices": [{"device": "dryer", "run_length": 2, "window": {"start": -2, "end": 5}}]
        }),
    );
    assert!(matches!(
        result,
        Err(CliError::Scheduling(SchedulingError::InvalidWindow(
            WindowError::InvalidSentinel { start: -2 }
        )))
    ));
}

#[test]
fn should_restrict_candidates_to_interval() {
    let response = run(
        Command::Candidates,
        &json!({
            "devices": [{"device": "dishwasher", "run_length": 2}],
            "within": {"start": "01:00:00", "end": "05:00:00"}
        }),
    )
    .unwrap();
    let starts: Vec<usize> = response["devices"][0]["candidates"]
        .as_array()
        .unwrap()
        .iter()
        .map(|c| ones(c)[0])
        .collect();
    assert_eq!(starts, vec![1, 2, 3]);
}

#[test]
fn should_reject_run_longer_than_day() {
    let result = run(
        Command::Candidates,
        &json!({"devices": [{"device": "heater", "run_length": 25}]}),
    );
    assert!(matches!(
        result,
        Err(CliError::Planning(PlanningError::Scheduling(
            SchedulingError::InvalidDuration { run_length: 25, available: 24 }
        )))
    ));
}

#[test]
fn should_refuse_joint_space_above_limit() {
    let result = run(
        Command::Candidates,
        &json!({
            "devices": [
                {"device": "a", "run_length": 1},
                {"device": "b", "run_length": 1},
                {"device": "c", "run_length": 1}
            ]
        }),
    );
    assert!(matches!(
        result,
        Err(CliError::Planning(PlanningError::CandidateLimitExceeded { limit: 1_000 }))
    ));
}

// ---------------------------------------------------------------------------
// abstract
// ---------------------------------------------------------------------------

#[test]
fn should_abstract_forecast_and_schedules() {
    let mut schedule = vec![0; 24];
    schedule[8..16].fill(1);
    let response = run(
        Command::Abstract,
        &json!({
            "appliances": [{"device": "dishwasher", "consumption": [100.0, 200.0, 300.0, 400.0, 500.0]}],
            "solar_production": vec![1.0; 24],
            "energy_costs": vec![0.25; 24],
            "base_load": vec![2.0; 24],
            "schedules": {"dishwasher": schedule}
        }),
    )
    .unwrap();

    assert_eq!(response["abstraction_factor"], 4.0);
    let forecast = &response["forecast"];
    assert_eq!(forecast["solar_production"]["values"], json!(vec![4.0; 6]));
    assert_eq!(forecast["energy_costs"]["values"], json!(vec![0.25; 6]));
    assert_eq!(forecast["energy_costs"]["kind"], "intensive");
    assert_eq!(forecast["base_load"]["values"], json!(vec![8.0; 6]));
    assert_eq!(
        forecast["appliances"][0]["consumption"]["values"],
        json!([1000.0, 500.0])
    );
    assert_eq!(ones(&response["schedules"]["dishwasher"]), vec![2, 3]);
}

#[test]
fn should_reject_forecast_not_covering_day() {
    let result = run(
        Command::Abstract,
        &json!({
            "solar_production": vec![1.0; 23],
            "energy_costs": vec![0.25; 24],
            "base_load": vec![2.0; 24]
        }),
    );
    assert!(matches!(
        result,
        Err(CliError::Planning(PlanningError::Scheduling(
            SchedulingError::ShapeMismatch { expected: 24, actual: 23 }
        )))
    ));
}

// ---------------------------------------------------------------------------
// mask
// ---------------------------------------------------------------------------

#[test]
fn should_build_mask_for_interval() {
    let response = run(
        Command::Mask,
        &json!({"start": "01:00:00", "end": "05:00:00"}),
    )
    .unwrap();
    assert_eq!(response["inside"], 4);
    assert_eq!(ones(&response["mask"]), vec![1, 2, 3, 4]);
}

#[test]
fn should_reject_empty_interval() {
    let result = run(
        Command::Mask,
        &json!({"start": "05:00:00", "end": "05:00:00"}),
    );
    assert!(matches!(
        result,
        Err(CliError::Scheduling(SchedulingError::InvalidWindow(_)))
    ));
}

// ---------------------------------------------------------------------------
// reschedule
// ---------------------------------------------------------------------------

#[test]
fn should_reschedule_from_clock_time() {
    let response = run(
        Command::Reschedule,
        &json!({"devices": [{"device": "dishwasher", "run_length": 3}]}),
    )
    .unwrap();
    assert_eq!(response["current_time"], "14:00:00");
    assert_eq!(ones(&response["mask"]), vec![14, 15, 16, 17, 18, 19]);
    let starts: Vec<usize> = response["plan"]["devices"][0]["candidates"]
        .as_array()
        .unwrap()
        .iter()
        .map(|c| ones(c)[0])
        .collect();
    assert_eq!(starts, vec![14, 15, 16, 17]);
}

#[test]
fn should_reschedule_from_explicit_time() {
    let response = run(
        Command::Reschedule,
        &json!({
            "devices": [{"device": "dishwasher", "run_length": 1}],
            "current_time": "21:30:00"
        }),
    )
    .unwrap();
    assert_eq!(ones(&response["mask"]), vec![22, 23]);
}

// ---------------------------------------------------------------------------
// decode
// ---------------------------------------------------------------------------

#[test]
fn should_decode_schedules_on_given_date() {
    let mut dishwasher = vec![0; 24];
    dishwasher[15..18].fill(1);
    let response = run(
        Command::Decode,
        &json!({
            "date": "2026-10-20",
            "schedules": {"dishwasher": dishwasher, "dryer": vec![0; 24]}
        }),
    )
    .unwrap();

    assert_eq!(
        response,
        json!({
            "intervals": {"dishwasher": "15:00:00-18:00:00", "dryer": null},
            "time_frames": {
                "dishwasher": {"start": "2026-10-20 15:00:00", "end": "2026-10-20 18:00:00"}
            }
        })
    );
}

#[test]
fn should_decode_on_clock_date_by_default() {
    let mut kettle = vec![0; 24];
    kettle[7] = 1;
    let response = run(Command::Decode, &json!({"schedules": {"kettle": kettle}})).unwrap();
    assert_eq!(
        response["time_frames"]["kettle"]["start"],
        "2026-10-15 07:00:00"
    );
}

#[test]
fn should_reject_schedule_of_wrong_length() {
    let result = run(
        Command::Decode,
        &json!({"schedules": {"kettle": vec![0; 96]}}),
    );
    assert!(matches!(
        result,
        Err(CliError::Planning(PlanningError::Scheduling(
            SchedulingError::ShapeMismatch { expected: 24, actual: 96 }
        )))
    ));
}

// ---------------------------------------------------------------------------
// points
// ---------------------------------------------------------------------------

#[test]
fn should_report_configured_time_points_for_blank_request() {
    let response = dispatch(Command::Points, "  \n", &settings(), clock()).unwrap();
    assert_eq!(
        response,
        json!({
            "time_density": "01:00:00",
            "time_points": 24,
            "abstract_time_density": "04:00:00",
            "abstract_time_points": 6,
            "abstraction_factor": 4.0
        })
    );
}

#[test]
fn should_report_time_points_for_requested_density() {
    let response = run(Command::Points, &json!({"time_density": "00:15:00"})).unwrap();
    assert_eq!(response["time_points"], 96);
    assert_eq!(response["abstraction_factor"], 16.0);
}

#[test]
fn should_reject_malformed_request() {
    let result = dispatch(Command::Mask, "{not json", &settings(), clock());
    assert!(matches!(result, Err(CliError::Request(_))));
}
