//! Health check command implementation.

use anyhow::{Context, Result};
use clap::Args;

use pokedex_core::ApiUrl;

use crate::config;
use crate::output;

#[derive(Args, Debug)]
pub struct HealthArgs {
    /// API base URL (defaults to the one saved at login)
    #[arg(long)]
    pub api: Option<String>,
}

pub async fn run(args: HealthArgs) -> Result<()> {
    let api = match &args.api {
        Some(api) => ApiUrl::new(api).context("Invalid API URL")?,
        None => config::load_api()?
            .context("No saved API. Pass --api or run 'pokedex auth login' first.")?,
    };

    let session = config::fresh_session(api.clone())?;

    session
        .health_check()
        .await
        .context("Backend is unreachable")?;

    output::success(&format!("{} is healthy", api.as_str()));

    Ok(())
}
