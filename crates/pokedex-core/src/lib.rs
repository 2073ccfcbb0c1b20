//! pokedex-core - Core Pokédex client types and traits.

pub mod claims;
pub mod credentials;
pub mod error;
pub mod models;
pub mod notify;
pub mod store;
pub mod tokens;
pub mod types;

pub use credentials::{Credentials, Registration};
pub use error::Error;
pub use models::{EvolutionNode, Page, Pokemon, PokemonSprites, User};
pub use notify::{NoticeLevel, Notifier, NullNotifier};
pub use store::{MemoryTokenStore, TokenStore};
pub use tokens::{AccessToken, RefreshToken, TokenPair};
pub use types::{ApiUrl, PokemonKey};

/// Result type alias using the crate's Error type.
pub type Result<T> = std::result::Result<T, Error>;
