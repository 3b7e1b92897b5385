//! Tamper alert listing.

use tabled::Tabled;

use milkfleet_core::{Device, FleetController, metrics};

use crate::cli::GlobalOpts;
use crate::error::CliError;
use crate::output;

use super::util;

#[derive(Tabled)]
struct AlertRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Status")]
    status: String,
    #[tabled(rename = "Last Seen")]
    last_seen: String,
}

impl From<&Device> for AlertRow {
    fn from(d: &Device) -> Self {
        Self {
            id: d.id.clone(),
            name: d.name.clone(),
            status: if d.is_online() { "online" } else { "offline" }.into(),
            last_seen: d
                .last_updated
                .map_or_else(String::new, |t| t.format("%Y-%m-%d %H:%M").to_string()),
        }
    }
}

pub async fn handle(controller: &FleetController, global: &GlobalOpts) -> Result<(), CliError> {
    controller.refresh().await?;
    let devices = util::ready(&controller.devices().latest(), "device list")?;

    let tampered: Vec<Device> = metrics::tampered_devices(&devices)
        .into_iter()
        .cloned()
        .collect();

    if tampered.is_empty() && !global.quiet {
        eprintln!("No tamper alerts");
        return Ok(());
    }

    let out = output::render_list(&global.output, &tampered, |d| AlertRow::from(d), |d| d.id.clone());
    output::print_output(&out, global.quiet);
    Ok(())
}
