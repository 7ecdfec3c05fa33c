//! Application services: use-case implementations.
//!
//! Each service receives its densities and limits at construction and works
//! on values passed in explicitly; ports (the clock) are injected through
//! generic parameters.

pub mod abstraction_service;
pub mod planning_service;
pub mod report_service;
pub mod rescheduling_service;
