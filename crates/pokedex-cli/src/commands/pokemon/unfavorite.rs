//! Unfavorite pokemon command implementation.

use anyhow::{Context, Result};
use clap::Args;

use pokedex_core::PokemonKey;

use crate::config;
use crate::output;

#[derive(Args, Debug)]
pub struct UnfavoriteArgs {
    /// Pokemon name or numeric id
    pub key: String,
}

pub async fn run(args: UnfavoriteArgs) -> Result<()> {
    let key = PokemonKey::new(&args.key).context("Invalid pokemon key")?;
    let session = config::authenticated_session().await?;

    let pokemon = session
        .unfavorite_pokemon(&key)
        .await
        .context("Failed to unfavorite pokemon")?;

    output::success(&format!("Removed {} from favorites", pokemon.name));

    Ok(())
}
