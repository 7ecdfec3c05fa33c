//! # loadshift
//!
//! `loadshift <command> < request.json > response.json`
//!
//! Reads one JSON request from stdin, answers it with the configured
//! densities and writes the JSON response to stdout. Logs go to stderr.

use std::io::Read;

use loadshift::clock::SystemClock;
use loadshift::commands::{Command, dispatch};
use loadshift::config::Config;
use loadshift::error::CliError;
use tracing_subscriber::EnvFilter;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load()?;

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(EnvFilter::new(&config.logging.filter))
        .init();

    let command: Command = std::env::args()
        .nth(1)
        .ok_or(CliError::MissingCommand)?
        .parse()?;
    let settings = config.scheduling()?;
    tracing::info!(
        %command,
        time_density = %settings.time_density,
        abstract_time_density = %settings.abstract_time_density,
        "loadshift starting"
    );

    let mut input = String::new();
    std::io::stdin()
        .read_to_string(&mut input)
        .map_err(CliError::Io)?;

    let response = match dispatch(command, &input, &settings, SystemClock) {
        Ok(response) => response,
        Err(err) => {
            tracing::error!(error = %err, %command, "request failed");
            return Err(err.into());
        }
    };
    println!("{}", serde_json::to_string_pretty(&response)?);
    Ok(())
}
