use capsule_core::context::AppContext;
use capsule_core::mining::{MiningState, StartOutcome};

use crate::commands::cli::OutputFormat;
use crate::error::CliError;
use crate::render;

pub async fn handle_mine(format: OutputFormat, ctx: &AppContext) -> Result<i32, CliError> {
    let workflow = ctx.mining_workflow();
    let status = workflow.sync_status().await;
    if let Some(err) = workflow.ledger().snapshot().error {
        return Err(CliError::Api(err));
    }

    if !workflow.can_mine() {
        match format {
            OutputFormat::Json => {
                let out = serde_json::json!({
                    "state": "disabled",
                    "pending": status.pending_count,
                });
                println!("{out}");
            }
            OutputFormat::Text => println!("No pending transactions to mine"),
        }
        return Ok(0);
    }

    if format == OutputFormat::Text {
        println!("Mining block with {} pending transaction(s)...", status.pending_count);
    }
    let outcome = workflow.start_mining().await;
    let state = workflow.state();

    match format {
        OutputFormat::Json => {
            let out = serde_json::to_string_pretty(&render::mining_json(&state))
                .map_err(anyhow::Error::from)?;
            println!("{out}");
        }
        OutputFormat::Text => match &state {
            MiningState::Success(result) => {
                println!("Mining successful!");
                println!("Block index: #{}", result.block.index);
                println!("Execution time: {}ms", result.execution_time_ms());
                println!("Nonce: {}", result.block.nonce);
                println!("Transactions: {}", result.block.transaction_count());
                println!("Block hash: {}", result.block.hash);
                println!("\n{}", render::status_block(&workflow.network_status()));
            }
            MiningState::Failed(err) => {
                tracing::error!(error = %err, "mining failed");
                println!("{}", state.notice().unwrap_or_default());
            }
            MiningState::Idle | MiningState::Mining => {}
        },
    }

    Ok(match outcome {
        StartOutcome::Failed => 20,
        _ => 0,
    })
}
