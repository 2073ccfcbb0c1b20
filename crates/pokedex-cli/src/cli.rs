//! CLI argument definitions.

use clap::{Parser, Subcommand};

use crate::commands::auth::AuthCommand;
use crate::commands::health::HealthArgs;
use crate::commands::pokemon::PokemonCommand;

/// Pokédex CLI client.
#[derive(Parser, Debug)]
#[command(name = "pokedex")]
#[command(author, version = env!("POKEDEX_VERSION"), about, long_about = None)]
pub struct Cli {
    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Output logs as JSON
    #[arg(long, global = true)]
    pub json_logs: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Account and session operations
    Auth(AuthCommand),

    /// Catalogue operations
    Pokemon(PokemonCommand),

    /// Probe the backend health endpoint
    Health(HealthArgs),
}
