//! List favorites command implementation.

use anyhow::{Context, Result};
use clap::Args;

use crate::config;
use crate::output;

#[derive(Args, Debug)]
pub struct FavoritesArgs {
    /// Pretty-print JSON output
    #[arg(long)]
    pub pretty: bool,
}

pub async fn run(args: FavoritesArgs) -> Result<()> {
    let session = config::authenticated_session().await?;

    let page = session
        .list_favorite_pokemons()
        .await
        .context("Failed to list favorites")?;

    if page.results.is_empty() {
        output::note("No favorites yet.");
        return Ok(());
    }

    for pokemon in &page.results {
        if args.pretty {
            output::json_pretty(pokemon)?;
        } else {
            output::json(pokemon)?;
        }
    }

    Ok(())
}
