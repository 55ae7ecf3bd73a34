use capsule_core::context::AppContext;
use capsule_core::model::NetworkStatus;

use crate::commands::cli::OutputFormat;
use crate::error::CliError;
use crate::render;

pub async fn handle_status(format: OutputFormat, ctx: &AppContext) -> Result<(), CliError> {
    let ledger = ctx.ledger_client();
    let capsules = ctx.capsules_client();
    futures::join!(ledger.refresh(), capsules.refresh());

    let status = NetworkStatus::from_snapshot(&ledger.snapshot());
    let listed = capsules.snapshot().data.map(|c| c.len());

    match format {
        OutputFormat::Json => {
            let out = serde_json::json!({ "network": status, "capsules": listed });
            println!("{}", serde_json::to_string_pretty(&out).map_err(anyhow::Error::from)?);
        }
        OutputFormat::Text => {
            println!("{}", render::status_block(&status));
            if let Some(err) = ledger.snapshot().error_message() {
                println!("Error: {err}");
            }
            match listed {
                Some(n) => println!("Capsules listed: {n}"),
                None => println!("Capsules listed: unavailable"),
            }
        }
    }
    Ok(())
}
