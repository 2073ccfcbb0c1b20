//! Typed Pokémon catalogue operations.

use reqwest::Method;
use tracing::{debug, instrument};

use pokedex_core::{EvolutionNode, Page, Pokemon, PokemonKey, Result};

use crate::client::RequestBody;
use crate::endpoints::{
    FAVORITE_POKEMONS, LIST_POKEMONS, evolution_chain_path, favorite_path, pokemon_path,
    unfavorite_path,
};
use crate::session::Session;

/// Paging options for the catalogue listing.
#[derive(Debug, Clone, Copy, Default)]
pub struct ListPokemonsParams {
    pub limit: Option<u32>,
    pub offset: Option<u32>,
}

impl ListPokemonsParams {
    /// The listing path with only the supplied paging parameters appended.
    fn query_path(&self) -> String {
        let mut query = Vec::new();
        if let Some(limit) = self.limit {
            query.push(format!("limit={}", limit));
        }
        if let Some(offset) = self.offset {
            query.push(format!("offset={}", offset));
        }

        if query.is_empty() {
            LIST_POKEMONS.to_string()
        } else {
            format!("{}?{}", LIST_POKEMONS, query.join("&"))
        }
    }
}

impl Session {
    /// List a page of the Pokémon catalogue.
    #[instrument(skip(self))]
    pub async fn list_pokemons(&self, params: ListPokemonsParams) -> Result<Page<Pokemon>> {
        debug!("Listing pokemons");
        self.execute_as(Method::GET, &params.query_path(), RequestBody::Empty)
            .await
    }

    /// Fetch a single Pokémon by name or id.
    #[instrument(skip(self), fields(%key))]
    pub async fn get_pokemon(&self, key: &PokemonKey) -> Result<Pokemon> {
        debug!("Fetching pokemon");
        self.execute_as(Method::GET, &pokemon_path(key), RequestBody::Empty)
            .await
    }

    /// Mark a Pokémon as a favorite, returning its updated record.
    #[instrument(skip(self), fields(%key))]
    pub async fn favorite_pokemon(&self, key: &PokemonKey) -> Result<Pokemon> {
        debug!("Favoriting pokemon");
        self.execute_as(Method::POST, &favorite_path(key), RequestBody::Empty)
            .await
    }

    /// Remove a Pokémon from favorites, returning its updated record.
    #[instrument(skip(self), fields(%key))]
    pub async fn unfavorite_pokemon(&self, key: &PokemonKey) -> Result<Pokemon> {
        debug!("Unfavoriting pokemon");
        self.execute_as(Method::POST, &unfavorite_path(key), RequestBody::Empty)
            .await
    }

    /// List the authenticated user's favorite Pokémon.
    #[instrument(skip(self))]
    pub async fn list_favorite_pokemons(&self) -> Result<Page<Pokemon>> {
        debug!("Listing favorite pokemons");
        self.execute_as(Method::GET, FAVORITE_POKEMONS, RequestBody::Empty)
            .await
    }

    /// Fetch the evolution chain containing a Pokémon.
    #[instrument(skip(self), fields(%key))]
    pub async fn get_evolution_chain(&self, key: &PokemonKey) -> Result<EvolutionNode> {
        debug!("Fetching evolution chain");
        self.execute_as(Method::GET, &evolution_chain_path(key), RequestBody::Empty)
            .await
    }
}
