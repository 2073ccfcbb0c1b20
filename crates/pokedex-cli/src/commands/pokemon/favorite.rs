//! Favorite pokemon command implementation.

use anyhow::{Context, Result};
use clap::Args;

use pokedex_core::PokemonKey;

use crate::config;
use crate::output;

#[derive(Args, Debug)]
pub struct FavoriteArgs {
    /// Pokemon name or numeric id
    pub key: String,
}

pub async fn run(args: FavoriteArgs) -> Result<()> {
    let key = PokemonKey::new(&args.key).context("Invalid pokemon key")?;
    let session = config::authenticated_session().await?;

    let pokemon = session
        .favorite_pokemon(&key)
        .await
        .context("Failed to favorite pokemon")?;

    output::success(&format!("Favorited {}", pokemon.name));

    Ok(())
}
