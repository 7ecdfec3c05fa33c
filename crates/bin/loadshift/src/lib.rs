//! # loadshift: scheduling core front end
//!
//! Composition root that wires configuration, logging and the application
//! services together.
//!
//! ## Responsibilities
//! - Load configuration (`loadshift.toml`, environment overrides)
//! - Construct application services with the configured densities and limits
//! - Decode one JSON request per invocation, dispatch it to the matching
//!   service and encode the JSON response
//!
//! ## Dependency rule
//! This is the **only** crate that depends on both `loadshift-domain` and
//! `loadshift-app` and performs IO. No scheduling logic belongs here.

pub mod clock;
pub mod commands;
pub mod config;
pub mod error;
