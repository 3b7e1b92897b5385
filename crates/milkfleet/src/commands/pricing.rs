//! Pricing command handlers.

use milkfleet_core::{FleetController, Pricing};

use crate::cli::{GlobalOpts, PricingArgs, PricingCommand};
use crate::error::CliError;
use crate::output;

use super::util;

fn detail(p: &Pricing) -> String {
    format!("Price per litre: {:.2}", p.price_per_litre)
}

pub async fn handle(
    controller: &FleetController,
    args: PricingArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match args.command {
        PricingCommand::Show => {
            controller.refresh().await?;
            let pricing = util::ready(&controller.pricing().latest(), "pricing")?;
            let out = output::render_single(&global.output, pricing.as_ref(), detail, |p| {
                format!("{:.2}", p.price_per_litre)
            });
            output::print_output(&out, global.quiet);
            Ok(())
        }

        PricingCommand::Set { price } => {
            controller.set_price(price).await?;
            if !global.quiet {
                eprintln!("Price set to {price:.2}/L");
            }
            Ok(())
        }
    }
}
