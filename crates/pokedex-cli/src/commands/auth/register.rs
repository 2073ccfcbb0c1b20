//! Register command implementation.

use anyhow::{Context, Result};
use clap::Args;

use pokedex_core::{ApiUrl, Registration};

use crate::config;
use crate::output;

#[derive(Args, Debug)]
pub struct RegisterArgs {
    /// First name
    #[arg(long)]
    pub first_name: String,

    /// Last name
    #[arg(long)]
    pub last_name: String,

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

pub async fn run(args: RegisterArgs) -> Result<()> {
    let api = ApiUrl::new(&args.api).context("Invalid API URL")?;
    let registration = Registration::new(
        &args.first_name,
        &args.last_name,
        &args.email,
        &args.password,
    );

    output::note("Creating account...");

    let session = config::fresh_session(api.clone())?;
    let result = session.register(&registration).await;

    if session.access_token().is_some() {
        config::save_api(&api).context("Failed to save configuration")?;
    }

    let user = result.context("Failed to register")?;

    println!();
    output::field("Name", &user.full_name());
    output::field("Email", &user.email);
    output::field("API", api.as_str());

    Ok(())
}
