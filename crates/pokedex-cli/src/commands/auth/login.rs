//! Login command implementation.

use anyhow::{Context, Result};
use clap::Args;

use pokedex_core::{ApiUrl, Credentials};

use crate::config;
use crate::output;

#[derive(Args, Debug)]
pub struct LoginArgs {
    /// Account email address
    #[arg(long)]
    pub email: String,

    /// Account password
    #[arg(long)]
    pub password: String,

    /// API base URL
    #[arg(long, default_value = config::DEFAULT_API)]
    pub api: String,
}

pub async fn run(args: LoginArgs) -> Result<()> {
    let api = ApiUrl::new(&args.api).context("Invalid API URL")?;
    let credentials = Credentials::new(&args.email, &args.password);

    output::note("Logging in...");

    let session = config::fresh_session(api.clone())?;
    let result = session.login(&credentials).await;

    // Remember the API whenever tokens were installed, so later commands
    // reach the same backend even if the profile fetch failed.
    if session.access_token().is_some() {
        config::save_api(&api).context("Failed to save configuration")?;
    }

    let user = result.context("Failed to login")?;

    println!();
    output::field("Name", &user.full_name());
    output::field("Email", &user.email);
    output::field("API", api.as_str());

    Ok(())
}
