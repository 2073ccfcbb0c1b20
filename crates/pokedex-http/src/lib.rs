//! pokedex-http - HTTP-backed session and request execution.
//!
//! This crate provides the [`Session`] type that owns the token lifecycle
//! against a Pokédex backend: login, registration, refresh, logout, and
//! authenticated request execution with pre-emptive token renewal and a
//! one-shot 401 retry.
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use pokedex_core::{ApiUrl, Credentials, NullNotifier};
//! use pokedex_http::{FileTokenStore, Session};
//!
//! # async fn example() -> pokedex_core::Result<()> {
//! let api = ApiUrl::new("http://localhost:8000")?;
//! let store = Arc::new(FileTokenStore::new("/tmp/pokedex-tokens.json"));
//! let session = Session::new(api, store, Arc::new(NullNotifier));
//!
//! session
//!     .login(&Credentials::new("ash@example.com", "pikapika"))
//!     .await?;
//! let page = session.list_pokemons(Default::default()).await?;
//! println!("{} pokemons", page.count);
//! # Ok(())
//! # }
//! ```

mod client;
mod endpoints;
pub mod pokemons;
pub mod session;
pub mod store;

pub use client::{MultipartForm, RequestBody};
pub use pokemons::ListPokemonsParams;
pub use session::Session;
pub use store::FileTokenStore;

// Re-export the method type taken by `Session::execute`.
pub use reqwest::Method;
