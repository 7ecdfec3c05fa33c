//! # loadshift-app
//!
//! Application layer: use-cases and **port definitions** (traits).
//!
//! ## Responsibilities
//! - Define **port traits** that adapters implement:
//!   - `Clock`: where "now" comes from when rescheduling
//! - Define **use-case services**:
//!   - `PlanningService`: per-device candidates, masks, joint candidate space
//!   - `AbstractionService`: forecasts and schedules between densities
//!   - `ReschedulingService`: planning within the window starting now
//!   - `ReportService`: chosen schedules as wall-clock time frames
//! - Log every use-case through `tracing`
//!
//! ## Dependency rule
//! Depends on `loadshift-domain` only. Never performs IO itself.

pub mod error;
pub mod ports;
pub mod services;
