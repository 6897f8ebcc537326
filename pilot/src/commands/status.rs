//! status and watch

use std::sync::Arc;

use anyhow::Result;
use colored::Colorize;

use super::{await_shutdown_signal, Context};
use crate::cache::{render_tree, ResourceSnapshot};
use crate::sink::timestamp;
use crate::workers::poller;

pub async fn status(ctx: &Context) -> Result<()> {
    let client = ctx.client().await?;
    println!("Server:  {}", client.base_url());

    let reachable = client.test_reachability().await;
    println!(
        "Health:  {}",
        if reachable { "reachable".green() } else { "unreachable".red() }
    );

    let token_ok = client.verify_token().await;
    println!(
        "Token:   {}",
        if token_ok { "valid".green() } else { "rejected".red() }
    );

    if token_ok {
        match client.version().await {
            Ok(version) => println!("Version: {}", version),
            Err(e) => println!("Version: {}", format!("unavailable ({})", e).yellow()),
        }
    }
    Ok(())
}

pub async fn watch(ctx: &Context) -> Result<()> {
    let client = ctx.client().await?;
    let snapshot = Arc::new(ResourceSnapshot::new());
    let options = poller::Options {
        interval: ctx.settings.refresh_interval(),
    };

    let view = snapshot.clone();
    poller::run(
        &options,
        &client,
        &snapshot,
        tokio::time::sleep,
        move |summary| {
            let Some(data) = view.try_data() else {
                return;
            };
            println!("{}", format!("── Coolify @ {} ──", timestamp()).bold());
            print!("{}", render_tree(&data));
            if !summary.is_complete() {
                println!(
                    "{}",
                    format!("(stale: {})", summary.failed.join(", ")).yellow()
                );
            }
            println!();
        },
        Box::pin(await_shutdown_signal()),
    )
    .await;
    Ok(())
}
