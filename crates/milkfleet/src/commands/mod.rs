//! Command dispatch and shared handler utilities.

pub mod account;
pub mod alerts;
pub mod config_cmd;
pub mod devices;
pub mod pricing;
pub mod status;
pub mod transactions;
pub mod vendor;
pub mod watch;

mod util;

use milkfleet_core::FleetController;

use crate::cli::{Command, GlobalOpts};
use crate::error::CliError;

pub async fn dispatch(
    cmd: Command,
    controller: &FleetController,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match cmd {
        Command::Status => status::handle(controller, global).await,
        Command::Devices(args) => devices::handle(controller, args, global).await,
        Command::Alerts => alerts::handle(controller, global).await,
        Command::Transactions(args) => transactions::handle(controller, args, global).await,
        Command::Pricing(args) => pricing::handle(controller, args, global).await,
        Command::Account(args) => account::handle(controller, args, global).await,
        Command::Vendor(args) => vendor::handle(controller, args, global).await,
        Command::Watch => watch::handle(controller, global).await,

        // Handled in main before a controller is built.
        Command::Config(_) | Command::Completions(_) => Ok(()),
    }
}
