//! Shared helpers for command handlers.

use std::io::{self, IsTerminal, Write};
use std::sync::Arc;

use milkfleet_core::{Device, Phase, ResourceState};

use crate::error::CliError;

/// Unwrap a refreshed resource state, surfacing its error if the fetch
/// failed soft during `refresh()`.
pub fn ready<T>(state: &ResourceState<T>, what: &str) -> Result<Arc<T>, CliError> {
    if state.phase == Phase::Error {
        return Err(CliError::ApiError {
            message: state
                .error
                .clone()
                .unwrap_or_else(|| format!("{what} unavailable")),
            status: None,
        });
    }
    state.data.clone().ok_or_else(|| CliError::ApiError {
        message: format!("{what} not loaded"),
        status: None,
    })
}

/// Find a device by ID or (exact) name in a fetched snapshot.
pub fn find_device<'a>(devices: &'a [Device], needle: &str) -> Option<&'a Device> {
    devices
        .iter()
        .find(|d| d.id == needle)
        .or_else(|| devices.iter().find(|d| d.name == needle))
}

/// Ask for confirmation on destructive operations.
///
/// `--yes` skips the prompt; a non-interactive stdin without `--yes` is an
/// error rather than a hang.
pub fn confirm(prompt: &str, yes: bool) -> Result<bool, CliError> {
    if yes {
        return Ok(true);
    }
    if !io::stdin().is_terminal() {
        return Err(CliError::NonInteractiveRequiresYes {
            action: prompt.into(),
        });
    }
    eprint!("{prompt} [y/N] ");
    io::stderr().flush()?;
    let mut line = String::new();
    io::stdin().read_line(&mut line)?;
    Ok(matches!(line.trim(), "y" | "Y" | "yes"))
}
