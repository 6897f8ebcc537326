//! Database actions

use anyhow::{Context as _, Result};
use tracing::warn;

use super::Context;
use crate::cli::DbCommands;
use crate::http::CoolifyClient;

async fn display_name(client: &CoolifyClient, uuid: &str) -> String {
    match client.list_databases().await {
        Ok(dbs) => dbs
            .into_iter()
            .find(|db| db.uuid == uuid && !db.name.is_empty())
            .map(|db| db.name)
            .unwrap_or_else(|| uuid.to_string()),
        Err(e) => {
            warn!("Could not look up database {}: {}", uuid, e);
            uuid.to_string()
        }
    }
}

pub async fn act(ctx: &Context, command: DbCommands) -> Result<()> {
    let client = ctx.client().await?;

    match command {
        DbCommands::Start { uuid } => {
            let name = display_name(&client, &uuid).await;
            client
                .start_database(&uuid)
                .await
                .with_context(|| format!("Failed to start {}", name))?;
            ctx.success(format!("✅ {} start command sent successfully", name));
        }
        DbCommands::Stop { uuid } => {
            let name = display_name(&client, &uuid).await;
            client
                .stop_database(&uuid)
                .await
                .with_context(|| format!("Failed to stop {}", name))?;
            ctx.success(format!("✅ {} stop command sent successfully", name));
        }
        DbCommands::Backup { uuid } => {
            let name = display_name(&client, &uuid).await;
            client
                .backup_database(&uuid)
                .await
                .with_context(|| format!("Failed to back up {}", name))?;
            ctx.success(format!("✅ Backup created for {}", name));
        }
    }
    Ok(())
}
