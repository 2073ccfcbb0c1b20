//! Refresh token command implementation.

use anyhow::{Context, Result};
use clap::Args;

use crate::config;
use crate::output;

#[derive(Args, Debug)]
pub struct RefreshTokenArgs {}

pub async fn run(_args: RefreshTokenArgs) -> Result<()> {
    let session = config::authenticated_session().await?;

    output::note("Refreshing session...");

    session
        .refresh_access_token()
        .await
        .context("Failed to refresh session")?;

    output::success("Session refreshed successfully");

    Ok(())
}
