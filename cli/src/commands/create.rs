use capsule_core::context::AppContext;
use capsule_core::draft::CapsuleDraft;
use chrono::Utc;

use crate::commands::cli::{CreateArgs, OutputFormat};
use crate::error::CliError;

pub async fn handle_create(
    args: CreateArgs,
    format: OutputFormat,
    ctx: &AppContext,
) -> Result<(), CliError> {
    let draft = CapsuleDraft {
        name: args.name,
        message: args.message,
        unlock_date: args.unlock_date,
        is_public: !args.private,
    };

    let capsule = ctx.commands().submit_capsule(&draft, Utc::now()).await?;
    tracing::info!(id = %capsule.id, unlock_at = %capsule.unlock_at, "capsule created");

    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&capsule).map_err(anyhow::Error::from)?);
        }
        OutputFormat::Text => {
            println!("Time capsule created successfully!");
            println!("id: {}", capsule.id);
            println!("unlocks: {}", crate::render::when(capsule.unlock_at));
        }
    }
    Ok(())
}
