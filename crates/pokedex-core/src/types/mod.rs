//! Validated domain types.
//!
//! These newtypes enforce their invariants at construction time, so the rest
//! of the crate can pass them around without re-checking.

mod api_url;
mod pokemon_key;

pub use api_url::ApiUrl;
pub use pokemon_key::PokemonKey;
