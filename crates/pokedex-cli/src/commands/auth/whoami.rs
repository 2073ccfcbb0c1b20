//! Whoami command implementation.

use anyhow::{Context, Result};
use chrono::SecondsFormat;
use clap::Args;

use crate::config;
use crate::output;

#[derive(Args, Debug)]
pub struct WhoamiArgs {}

pub async fn run(_args: WhoamiArgs) -> Result<()> {
    let session = config::authenticated_session().await?;

    // Restore already tried the profile; retry here so a transient failure
    // during restore does not leave whoami empty-handed.
    let user = match session.user() {
        Some(user) => user,
        None => session
            .fetch_user_profile()
            .await
            .context("Failed to fetch profile")?,
    };

    output::field("Name", &user.full_name());
    output::field("Email", &user.email);
    output::field(
        "Joined",
        &user.date_joined.to_rfc3339_opts(SecondsFormat::Secs, true),
    );
    output::field("API", session.api().as_str());

    Ok(())
}
