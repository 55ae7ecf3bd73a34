use capsule_core::context::AppContext;

use crate::commands::cli::{ChainArgs, OutputFormat};
use crate::error::CliError;
use crate::render;

pub async fn handle_chain(
    args: ChainArgs,
    format: OutputFormat,
    ctx: &AppContext,
) -> Result<(), CliError> {
    let client = ctx.ledger_client();
    client.refresh().await;
    let snapshot = client.snapshot();
    if let Some(err) = snapshot.error {
        return Err(CliError::Api(err));
    }
    let Some(ledger) = snapshot.data else {
        return Err(CliError::Command("ledger unavailable".to_string()));
    };

    let skip = args
        .last
        .map(|n| ledger.chain.len().saturating_sub(n))
        .unwrap_or(0);

    match format {
        OutputFormat::Json => {
            let out = serde_json::json!({
                "stats": ledger.stats(),
                "chain": &ledger.chain[skip..],
                "pending": ledger.pending,
            });
            println!("{}", serde_json::to_string_pretty(&out).map_err(anyhow::Error::from)?);
        }
        OutputFormat::Text => {
            println!("{}\n", render::stats_block(&ledger.stats()));
            let latest = ledger.chain.len().checked_sub(1);
            for (idx, block) in ledger.chain.iter().enumerate().skip(skip) {
                println!("{}", render::block_line(block, Some(idx) == latest));
            }
        }
    }
    Ok(())
}
