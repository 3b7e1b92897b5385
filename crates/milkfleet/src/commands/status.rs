//! Fleet status overview.

use owo_colors::OwoColorize;
use serde::Serialize;

use milkfleet_core::FleetController;
use milkfleet_core::metrics::FleetMetrics;

use crate::cli::GlobalOpts;
use crate::error::CliError;
use crate::output;

use super::util;

/// Aggregated snapshot rendered by `milkfleet status`.
#[derive(Serialize)]
struct StatusSummary {
    vendor: String,
    shop: String,
    devices_total: usize,
    devices_online: usize,
    uptime_percent: Option<u8>,
    alerts: usize,
    price_per_litre: f64,
    balance: f64,
}

pub async fn handle(controller: &FleetController, global: &GlobalOpts) -> Result<(), CliError> {
    controller.refresh().await?;

    let devices = util::ready(&controller.devices().latest(), "device list")?;
    let vendor = util::ready(&controller.vendor().latest(), "vendor")?;
    let pricing = util::ready(&controller.pricing().latest(), "pricing")?;
    let account = util::ready(&controller.account().latest(), "account")?;

    let metrics = FleetMetrics::compute(&devices);
    let summary = StatusSummary {
        vendor: vendor.name.clone(),
        shop: vendor.shop_name.clone(),
        devices_total: metrics.total,
        devices_online: metrics.online,
        uptime_percent: metrics.uptime_percent,
        alerts: metrics.alert_count(),
        price_per_litre: pricing.price_per_litre,
        balance: account.balance,
    };

    let color = output::should_color(&global.color);
    let out = output::render_single(
        &global.output,
        &summary,
        |s| detail(s, color),
        |s| s.shop.clone(),
    );
    output::print_output(&out, global.quiet);
    Ok(())
}

fn detail(s: &StatusSummary, color: bool) -> String {
    let uptime = s
        .uptime_percent
        .map_or_else(|| "-".into(), |v| format!("{v}%"));
    let alerts = if color && s.alerts > 0 {
        format!("{}", s.alerts.red().bold())
    } else {
        s.alerts.to_string()
    };
    let online = if color && s.devices_online < s.devices_total {
        format!("{}", format!("{}/{}", s.devices_online, s.devices_total).yellow())
    } else {
        format!("{}/{}", s.devices_online, s.devices_total)
    };
    [
        format!("Vendor:   {} ({})", s.vendor, s.shop),
        format!("Devices:  {online} online"),
        format!("Uptime:   {uptime}"),
        format!("Alerts:   {alerts}"),
        format!("Price:    {:.2}/L", s.price_per_litre),
        format!("Balance:  {:.2}", s.balance),
    ]
    .join("\n")
}
