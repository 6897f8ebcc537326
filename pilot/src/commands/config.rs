//! configure, login and logout

use anyhow::{bail, Context as _, Result};
use colored::Colorize;
use secrecy::SecretString;
use tracing::info;

use super::Context;
use crate::authn::DeepLinkAuth;
use crate::http::CoolifyClient;
use crate::storage::{Credentials, Settings};
use crate::utils::{is_valid_server_url, normalize_server_url};

async fn store(ctx: &Context, server_url: &str, token: SecretString) -> Result<()> {
    let settings_file = ctx.layout.settings_file();
    let mut settings = Settings::load(&settings_file)
        .await
        .context("Failed to read settings")?;
    settings.server_url = Some(server_url.to_string());
    settings
        .save(&settings_file)
        .await
        .context("Failed to write settings")?;

    Credentials::new(token)
        .save(&ctx.layout.credentials_file())
        .await
        .context("Failed to store API token")?;

    info!("Stored configuration in {}", ctx.layout.base_dir.display());
    Ok(())
}

pub async fn configure(ctx: &Context) -> Result<()> {
    let Some(raw_url) = ctx.overrides.url.as_deref().filter(|u| !u.trim().is_empty()) else {
        bail!("Server URL is required (--url or COOLIFY_URL)");
    };
    let Some(token) = ctx.overrides.token.as_deref().filter(|t| !t.trim().is_empty()) else {
        bail!("Token is required (--token or COOLIFY_TOKEN)");
    };

    if !is_valid_server_url(raw_url) {
        bail!("Invalid URL format: {}", raw_url);
    }
    let server_url = normalize_server_url(raw_url);
    let token = SecretString::from(token.trim().to_string());

    let client = CoolifyClient::new(&server_url, token.clone())?;
    if !client.test_reachability().await {
        bail!("Could not reach the Coolify server. Check the URL and try again.");
    }
    println!(
        "{} Connected to Coolify at {}",
        "✔".green(),
        server_url.trim_start_matches("https://").trim_start_matches("http://")
    );

    if !client.verify_token().await {
        bail!("Invalid token. Please check and try again.");
    }

    store(ctx, &server_url, token).await?;
    ctx.success("🎉 Coolify configured!");
    Ok(())
}

pub async fn login(ctx: &Context, link: &str) -> Result<()> {
    let auth = DeepLinkAuth::parse(link)?;
    println!("🔐 Authenticating with Coolify at {}…", auth.display_host());

    let client = CoolifyClient::new(&auth.server_url, auth.token.clone())?;
    if !client.verify_token().await {
        bail!("The token from the deep link is invalid or expired.");
    }

    store(ctx, &auth.server_url, auth.token.clone()).await?;
    ctx.success(format!("✅ Authenticated with Coolify at {}!", auth.display_host()));
    Ok(())
}

pub async fn logout(ctx: &Context) -> Result<()> {
    let settings_file = ctx.layout.settings_file();
    let mut settings = Settings::load(&settings_file)
        .await
        .context("Failed to read settings")?;
    if settings.server_url.take().is_some() {
        settings
            .save(&settings_file)
            .await
            .context("Failed to write settings")?;
    }

    Credentials::clear(&ctx.layout.credentials_file())
        .await
        .context("Failed to remove API token")?;

    println!("Coolify configuration cleared.");
    Ok(())
}
