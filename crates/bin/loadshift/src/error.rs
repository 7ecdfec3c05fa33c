//! Errors surfaced by the command-line front end.

use loadshift_app::error::PlanningError;
use loadshift_domain::error::SchedulingError;

use crate::config::ConfigError;

/// Top-level CLI error.
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error("missing command, expected one of: {names}", names = crate::commands::Command::NAMES.join(", "))]
    MissingCommand,

    #[error("unknown command {0:?}, expected one of: {names}", names = crate::commands::Command::NAMES.join(", "))]
    UnknownCommand(String),

    #[error(transparent)]
    Config(#[from] ConfigError),

    /// The request on stdin is not valid JSON for the command.
    #[error("invalid request: {0}")]
    Request(#[from] serde_json::Error),

    #[error(transparent)]
    Planning(#[from] PlanningError),

    #[error(transparent)]
    Scheduling(#[from] SchedulingError),

    #[error("failed to read request")]
    Io(#[from] std::io::Error),
}
