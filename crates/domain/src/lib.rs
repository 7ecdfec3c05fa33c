//! # loadshift-domain
//!
//! Pure domain model for the loadshift household-appliance scheduler.
//!
//! ## Responsibilities
//! - Foundational types: time densities, wall-clock times, error conventions
//! - Describe **Devices** (run length plus the window they may run in)
//! - Enumerate **Activation** candidates per device and their joint space
//! - Resample forecast **Series** between densities (sum- or mean-preserving)
//! - Build time **Masks** for allowed and rescheduling intervals
//! - Decode chosen **Schedules** back into wall-clock time frames
//!
//! ## Dependency rule
//! This crate has **no internal dependencies** and performs no IO.
//! Every function takes all of its parameters explicitly and holds no state
//! beyond a single call.

pub mod error;
pub mod time;

pub mod activation;
pub mod device;
pub mod mask;
pub mod schedule;
pub mod series;
