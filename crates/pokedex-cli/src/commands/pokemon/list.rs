//! List pokemons command implementation.

use anyhow::{Context, Result};
use clap::Args;

use pokedex_http::ListPokemonsParams;

use crate::config;
use crate::output;

#[derive(Args, Debug)]
pub struct ListArgs {
    /// Maximum number of pokemons to return
    #[arg(long)]
    pub limit: Option<u32>,

    /// Number of pokemons to skip
    #[arg(long)]
    pub offset: Option<u32>,

    /// Pretty-print JSON output
    #[arg(long)]
    pub pretty: bool,
}

pub async fn run(args: ListArgs) -> Result<()> {
    let session = config::authenticated_session().await?;

    let page = session
        .list_pokemons(ListPokemonsParams {
            limit: args.limit,
            offset: args.offset,
        })
        .await
        .context("Failed to list pokemons")?;

    if page.results.is_empty() {
        output::note("No pokemons found.");
        return Ok(());
    }

    for pokemon in &page.results {
        if args.pretty {
            output::json_pretty(pokemon)?;
        } else {
            output::json(pokemon)?;
        }
    }

    eprintln!();
    output::note(&format!(
        "Showing {} of {}",
        page.results.len(),
        page.count
    ));

    Ok(())
}
