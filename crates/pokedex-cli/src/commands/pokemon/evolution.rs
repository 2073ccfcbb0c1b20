//! Evolution chain command implementation.

use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;

use pokedex_core::{EvolutionNode, PokemonKey};

use crate::config;
use crate::output;

#[derive(Args, Debug)]
pub struct EvolutionArgs {
    /// Pokemon name or numeric id
    pub key: String,

    /// Print the raw JSON instead of a tree
    #[arg(long)]
    pub json: bool,
}

pub async fn run(args: EvolutionArgs) -> Result<()> {
    let key = PokemonKey::new(&args.key).context("Invalid pokemon key")?;
    let session = config::authenticated_session().await?;

    let chain = session
        .get_evolution_chain(&key)
        .await
        .context("Failed to get evolution chain")?;

    if args.json {
        output::json_pretty(&chain)?;
        return Ok(());
    }

    print_node(&chain, 0);

    Ok(())
}

fn print_node(node: &EvolutionNode, depth: usize) {
    let indent = "  ".repeat(depth);

    match &node.evolution_text {
        Some(text) => println!("{}{} ({})", indent, node.pokemon.name, text.dimmed()),
        None => println!("{}{}", indent, node.pokemon.name),
    }

    for next in &node.evolves_to {
        print_node(next, depth + 1);
    }
}
