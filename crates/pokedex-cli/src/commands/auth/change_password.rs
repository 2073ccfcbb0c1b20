//! Change password command implementation.

use anyhow::{Context, Result, bail};
use clap::Args;

use crate::config;

#[derive(Args, Debug)]
pub struct ChangePasswordArgs {
    /// New password
    #[arg(long)]
    pub new_password: String,

    /// Confirmation of the new password
    #[arg(long)]
    pub confirm_password: String,
}

pub async fn run(args: ChangePasswordArgs) -> Result<()> {
    // Validate locally before touching the backend
    if args.new_password.is_empty() {
        bail!("Enter a new password");
    }
    if args.new_password.len() < 8 {
        bail!("Password must be at least 8 characters");
    }
    if args.confirm_password.is_empty() {
        bail!("Confirm the new password");
    }
    if args.new_password != args.confirm_password {
        bail!("Passwords do not match");
    }

    let session = config::authenticated_session().await?;

    // The session notifier reports the success
    session
        .change_password(&args.new_password, &args.confirm_password)
        .await
        .context("Failed to change password")?;

    Ok(())
}
