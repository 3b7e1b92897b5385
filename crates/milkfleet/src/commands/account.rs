//! Account command handlers: balance, withdrawals, cash collection.

use tabled::Tabled;

use milkfleet_core::{Account, CashPayment, FleetController};

use crate::cli::{AccountArgs, AccountCommand, GlobalOpts};
use crate::error::CliError;
use crate::output;

use super::util;

// ── Table rows ──────────────────────────────────────────────────────

#[derive(Tabled)]
struct CashRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Device")]
    device: String,
    #[tabled(rename = "Amount")]
    amount: String,
    #[tabled(rename = "Time")]
    time: String,
}

impl From<&CashPayment> for CashRow {
    fn from(p: &CashPayment) -> Self {
        Self {
            id: p.id.clone(),
            device: p.device_id.clone(),
            amount: format!("{:.2}", p.amount),
            time: p.timestamp.format("%Y-%m-%d %H:%M").to_string(),
        }
    }
}

fn detail(a: &Account) -> String {
    let mut lines = vec![
        format!("Balance:     {:.2}", a.balance),
        format!("Withdrawals: {}", a.withdrawals.len()),
    ];
    for w in a.withdrawals.iter().take(5) {
        lines.push(format!(
            "  {}  {:>10.2}  {}",
            w.timestamp.format("%Y-%m-%d %H:%M"),
            w.amount,
            w.id
        ));
    }
    lines.join("\n")
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(
    controller: &FleetController,
    args: AccountArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match args.command {
        AccountCommand::Show => {
            controller.refresh().await?;
            let account = util::ready(&controller.account().latest(), "account")?;
            let out = output::render_single(&global.output, account.as_ref(), detail, |a| {
                format!("{:.2}", a.balance)
            });
            output::print_output(&out, global.quiet);
            Ok(())
        }

        AccountCommand::Withdraw { amount } => {
            if !util::confirm(&format!("Withdraw {amount:.2}?"), global.yes)? {
                return Ok(());
            }
            let account = controller.withdraw(amount).await?;
            if !global.quiet {
                eprintln!("Withdrew {amount:.2}, new balance {:.2}", account.balance);
            }
            Ok(())
        }

        AccountCommand::Deposit { amount } => {
            let account = controller.deposit(amount).await?;
            if !global.quiet {
                eprintln!("Deposited {amount:.2}, new balance {:.2}", account.balance);
            }
            Ok(())
        }

        AccountCommand::Cash => {
            controller.refresh().await?;
            let payments = util::ready(&controller.cash_payments().latest(), "cash payments")?;
            let out =
                output::render_list(&global.output, &payments, |p| CashRow::from(p), |p| p.id.clone());
            output::print_output(&out, global.quiet);
            Ok(())
        }
    }
}
