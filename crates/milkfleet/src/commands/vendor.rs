//! Vendor profile command handlers.

use milkfleet_core::{FleetController, Vendor};

use crate::cli::{GlobalOpts, VendorArgs, VendorCommand};
use crate::error::CliError;
use crate::output;

fn detail(v: &Vendor) -> String {
    [
        format!("ID:   {}", v.id),
        format!("Name: {}", v.name),
        format!("Shop: {}", v.shop_name),
    ]
    .join("\n")
}

pub async fn handle(
    controller: &FleetController,
    args: VendorArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match args.command {
        VendorCommand::Show => {
            let vendor = controller.refresh_vendor().await?;
            let out = output::render_single(&global.output, &vendor, detail, |v| v.id.clone());
            output::print_output(&out, global.quiet);
            Ok(())
        }

        VendorCommand::Update { name, shop } => {
            // The backend keys the update on the vendor ID, so fetch the
            // current record first.
            let current = controller.refresh_vendor().await?;
            let updated = controller.update_vendor(&current.id, &name, &shop).await?;
            if !global.quiet {
                eprintln!("Vendor updated: {} ({})", updated.name, updated.shop_name);
            }
            Ok(())
        }
    }
}
