//! Logout command implementation.

use anyhow::Result;
use clap::Args;

use crate::config;
use crate::output;

#[derive(Args, Debug)]
pub struct LogoutArgs {}

pub async fn run(_args: LogoutArgs) -> Result<()> {
    let session = config::restored_session().await?;

    if session.access_token().is_none() {
        output::note("No active session.");
        return Ok(());
    }

    // The session notifier reports the logout
    session.logout();

    Ok(())
}
