//! Pokemon subcommand implementations.

mod evolution;
mod favorite;
mod favorites;
mod get;
mod list;
mod unfavorite;

use anyhow::Result;
use clap::{Args, Subcommand};

#[derive(Args, Debug)]
pub struct PokemonCommand {
    #[command(subcommand)]
    pub command: PokemonSubcommand,
}

#[derive(Subcommand, Debug)]
pub enum PokemonSubcommand {
    /// List the catalogue page by page
    List(list::ListArgs),

    /// Fetch a single pokemon
    Get(get::GetArgs),

    /// Mark a pokemon as a favorite
    Favorite(favorite::FavoriteArgs),

    /// Remove a pokemon from the favorites
    Unfavorite(unfavorite::UnfavoriteArgs),

    /// List the favorited pokemons
    Favorites(favorites::FavoritesArgs),

    /// Show the evolution chain for a pokemon
    Evolution(evolution::EvolutionArgs),
}

pub async fn handle(cmd: PokemonCommand) -> Result<()> {
    match cmd.command {
        PokemonSubcommand::List(args) => list::run(args).await,
        PokemonSubcommand::Get(args) => get::run(args).await,
        PokemonSubcommand::Favorite(args) => favorite::run(args).await,
        PokemonSubcommand::Unfavorite(args) => unfavorite::run(args).await,
        PokemonSubcommand::Favorites(args) => favorites::run(args).await,
        PokemonSubcommand::Evolution(args) => evolution::run(args).await,
    }
}
