//! Live dashboard: connect, poll, and print fleet changes until Ctrl-C.

use owo_colors::OwoColorize;

use milkfleet_core::metrics::FleetMetrics;
use milkfleet_core::{Device, FleetController};

use crate::cli::GlobalOpts;
use crate::error::CliError;
use crate::output;

pub async fn handle(controller: &FleetController, global: &GlobalOpts) -> Result<(), CliError> {
    controller.connect().await?;

    let mut devices = controller.devices();
    let mut transactions = controller.transactions();
    let mut account = controller.account();
    let color = output::should_color(&global.color);

    if let Some(snapshot) = devices.current().data.clone() {
        print_fleet_line(&snapshot, color);
    }
    if !global.quiet {
        eprintln!("Watching fleet (Ctrl-C to stop)...");
    }

    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => break,

            Some(state) = devices.changed() => {
                if let Some(snapshot) = state.data {
                    print_fleet_line(&snapshot, color);
                }
            }

            Some(state) = transactions.changed() => {
                if let Some(txs) = state.data {
                    println!(
                        "{}  {} transactions on record",
                        timestamp(),
                        txs.len()
                    );
                }
            }

            Some(state) = account.changed() => {
                if let Some(account) = state.data {
                    println!("{}  balance {:.2}", timestamp(), account.balance);
                }
            }
        }
    }

    controller.disconnect().await;
    Ok(())
}

fn timestamp() -> String {
    chrono::Utc::now().format("%H:%M:%S").to_string()
}

fn print_fleet_line(devices: &[Device], color: bool) {
    let metrics = FleetMetrics::compute(devices);
    let uptime = metrics
        .uptime_percent
        .map_or_else(|| "-".into(), |v| format!("{v}%"));
    let alerts = if color && metrics.alert_count() > 0 {
        format!("{}", metrics.alert_count().red().bold())
    } else {
        metrics.alert_count().to_string()
    };
    println!(
        "{}  {}/{} online, uptime {}, alerts {}",
        timestamp(),
        metrics.online,
        metrics.total,
        uptime,
        alerts
    );
}
