//! Get pokemon command implementation.

use anyhow::{Context, Result};
use clap::Args;

use pokedex_core::PokemonKey;

use crate::config;
use crate::output;

#[derive(Args, Debug)]
pub struct GetArgs {
    /// Pokemon name or numeric id
    pub key: String,

    /// Print the raw JSON instead of fields
    #[arg(long)]
    pub json: bool,
}

pub async fn run(args: GetArgs) -> Result<()> {
    let key = PokemonKey::new(&args.key).context("Invalid pokemon key")?;
    let session = config::authenticated_session().await?;

    let pokemon = session
        .get_pokemon(&key)
        .await
        .context("Failed to get pokemon")?;

    if args.json {
        output::json_pretty(&pokemon)?;
        return Ok(());
    }

    output::field("Name", &pokemon.name);
    output::field("Id", &pokemon.external_id.to_string());
    output::field("Types", &pokemon.types.join(", "));
    output::field("Abilities", &pokemon.abilities.join(", "));
    output::field("Height", &pokemon.height.to_string());
    output::field("Weight", &pokemon.weight.to_string());
    output::field("Favorited", if pokemon.is_favorited { "yes" } else { "no" });
    println!();
    println!("{}", pokemon.flavor_text);

    Ok(())
}
