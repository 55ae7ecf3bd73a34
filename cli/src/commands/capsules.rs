use capsule_core::collection::{present, CollectionQuery};
use capsule_core::context::AppContext;
use chrono::Utc;

use crate::commands::cli::{CapsulesArgs, OutputFormat};
use crate::error::CliError;
use crate::render;

pub async fn handle_capsules(
    args: CapsulesArgs,
    format: OutputFormat,
    ctx: &AppContext,
) -> Result<(), CliError> {
    let client = ctx.capsules_client();
    client.refresh().await;
    let snapshot = client.snapshot();
    if let Some(err) = snapshot.error {
        return Err(CliError::Api(err));
    }
    let capsules = snapshot.data.unwrap_or_default();

    let query = CollectionQuery {
        search: args.search,
        status: args.status,
        sort: args.sort,
    };
    let views = present(&capsules, &query, Utc::now());
    tracing::debug!(
        total = capsules.len(),
        shown = views.len(),
        status = %query.status,
        sort = %query.sort,
        "capsules filtered"
    );

    match format {
        OutputFormat::Json => {
            let items: Vec<_> = views.iter().map(render::capsule_json).collect();
            println!("{}", serde_json::to_string_pretty(&items).map_err(anyhow::Error::from)?);
        }
        OutputFormat::Text => {
            if views.is_empty() {
                println!("No capsules found. Try adjusting your search or filter criteria.");
            }
            for view in &views {
                println!("{}\n", render::capsule_line(view));
            }
        }
    }
    Ok(())
}
