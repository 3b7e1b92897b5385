//! Device command handlers.

use tabled::Tabled;

use milkfleet_core::{Device, FleetController, metrics};

use crate::cli::{DevicesArgs, DevicesCommand, GlobalOpts};
use crate::error::CliError;
use crate::output;

use super::util;

// ── Table row ───────────────────────────────────────────────────────

#[derive(Tabled)]
struct DeviceRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Status")]
    status: String,
    #[tabled(rename = "Tampered")]
    tampered: String,
    #[tabled(rename = "Capacity")]
    capacity: String,
    #[tabled(rename = "Last Seen")]
    last_seen: String,
}

impl From<&Device> for DeviceRow {
    fn from(d: &Device) -> Self {
        Self {
            id: d.id.clone(),
            name: d.name.clone(),
            status: if d.is_online() { "online" } else { "offline" }.into(),
            tampered: if d.is_tampered { "yes" } else { "" }.into(),
            capacity: capacity_cell(d),
            last_seen: d
                .last_updated
                .map_or_else(String::new, |t| t.format("%Y-%m-%d %H:%M").to_string()),
        }
    }
}

fn capacity_cell(d: &Device) -> String {
    match (metrics::capacity_percent(d), metrics::capacity_band(d)) {
        (Some(pct), Some(band)) => format!("{pct:.0}% ({band:?})").to_lowercase(),
        _ => "-".into(),
    }
}

fn detail(d: &Device) -> String {
    let mut lines = vec![
        format!("ID:          {}", d.id),
        format!("Name:        {}", d.name),
        format!(
            "Status:      {}",
            if d.is_online() { "online" } else { "offline" }
        ),
        format!("Tampered:    {}", if d.is_tampered { "yes" } else { "no" }),
        format!("Capacity:    {}", capacity_cell(d)),
    ];
    if let Some(temp) = d.temperature {
        lines.push(format!("Temperature: {temp:.1}°C"));
    }
    if let Some(ts) = d.last_updated {
        lines.push(format!("Last Seen:   {}", ts.format("%Y-%m-%d %H:%M:%S UTC")));
    }
    lines.join("\n")
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(
    controller: &FleetController,
    args: DevicesArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match args.command {
        DevicesCommand::List => {
            controller.refresh().await?;
            let devices = util::ready(&controller.devices().latest(), "device list")?;
            let out = output::render_list(
                &global.output,
                &devices,
                |d| DeviceRow::from(d),
                |d| d.id.clone(),
            );
            output::print_output(&out, global.quiet);
            Ok(())
        }

        DevicesCommand::Show { device } => {
            // Try the backend by ID first, then fall back to a name match
            // against the fetched list.
            let found = match controller.device(&device).await {
                Ok(d) => d,
                Err(milkfleet_core::CoreError::NotFound { .. }) => {
                    controller.refresh().await?;
                    let devices = util::ready(&controller.devices().latest(), "device list")?;
                    util::find_device(&devices, &device)
                        .cloned()
                        .ok_or_else(|| CliError::NotFound {
                            resource_type: "device".into(),
                            identifier: device,
                            list_command: "devices list".into(),
                        })?
                }
                Err(e) => return Err(e.into()),
            };
            let out = output::render_single(&global.output, &found, detail, |d| d.id.clone());
            output::print_output(&out, global.quiet);
            Ok(())
        }

        DevicesCommand::Add { name, capacity } => {
            controller.add_device(&name, capacity).await?;
            if !global.quiet {
                eprintln!("Device '{name}' registered");
            }
            Ok(())
        }
    }
}
