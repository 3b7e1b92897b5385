//! Transaction listing.

use tabled::Tabled;

use milkfleet_core::{FleetController, Transaction};

use crate::cli::{GlobalOpts, TransactionsArgs};
use crate::error::CliError;
use crate::output;

use super::util;

#[derive(Tabled)]
struct TransactionRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Device")]
    device: String,
    #[tabled(rename = "Amount")]
    amount: String,
    #[tabled(rename = "Method")]
    method: String,
    #[tabled(rename = "Time")]
    time: String,
}

impl From<&Transaction> for TransactionRow {
    fn from(t: &Transaction) -> Self {
        Self {
            id: t.id.clone(),
            device: t.device_name.clone().unwrap_or_else(|| t.device_id.clone()),
            amount: format!("{:.2} {}", t.amount, t.currency),
            method: format!("{:?}", t.method).to_lowercase(),
            time: t.timestamp.format("%Y-%m-%d %H:%M").to_string(),
        }
    }
}

pub async fn handle(
    controller: &FleetController,
    args: TransactionsArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    controller.refresh().await?;
    let all = util::ready(&controller.transactions().latest(), "transaction list")?;

    let mut filtered: Vec<Transaction> = match args.device {
        Some(ref needle) => all
            .iter()
            .filter(|t| {
                t.device_id == *needle || t.device_name.as_deref() == Some(needle.as_str())
            })
            .cloned()
            .collect(),
        None => all.iter().cloned().collect(),
    };

    // Newest first.
    filtered.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
    if let Some(limit) = args.limit {
        filtered.truncate(limit);
    }

    let out = output::render_list(
        &global.output,
        &filtered,
        |t| TransactionRow::from(t),
        |t| t.id.clone(),
    );
    output::print_output(&out, global.quiet);
    Ok(())
}
