//! API endpoint definitions and request/response types.

use serde::{Deserialize, Serialize};

use pokedex_core::PokemonKey;

// ============================================================================
// Endpoint Paths
// ============================================================================

/// Obtain an access/refresh token pair from credentials.
pub const OBTAIN_TOKEN: &str = "/api/auth/token/obtain/";

/// Exchange a refresh token for a new access token.
pub const REFRESH_TOKEN: &str = "/api/auth/token/refresh/";

/// The authenticated user's profile.
pub const USER_PROFILE: &str = "/api/auth/user/";

/// Create a new account.
pub const REGISTER: &str = "/api/auth/register/";

/// Change the authenticated user's password.
pub const CHANGE_PASSWORD: &str = "/api/users/users/change-password/";

/// The paginated Pokémon catalogue.
pub const LIST_POKEMONS: &str = "/api/pokemons/pokemons/";

/// The authenticated user's favorited Pokémon.
pub const FAVORITE_POKEMONS: &str = "/api/pokemons/favorited-pokemons/";

/// Backend liveness probe.
pub const HEALTH: &str = "/health/";

/// A single Pokémon by name or id.
pub fn pokemon_path(key: &PokemonKey) -> String {
    format!("/api/pokemons/pokemons/{}/", key)
}

/// Mark a Pokémon as a favorite.
pub fn favorite_path(key: &PokemonKey) -> String {
    format!("/api/pokemons/pokemons/{}/favorite/", key)
}

/// Remove a Pokémon from favorites.
pub fn unfavorite_path(key: &PokemonKey) -> String {
    format!("/api/pokemons/pokemons/{}/unfavorite/", key)
}

/// The evolution chain containing a Pokémon.
pub fn evolution_chain_path(key: &PokemonKey) -> String {
    format!("/api/pokemons/evolution-chains/{}/", key)
}

// ============================================================================
// Request/Response Types
// ============================================================================

// Request types carrying passwords or tokens deliberately do not derive
// Debug, so they cannot leak through logging.

/// Request body for obtaining a token pair.
#[derive(Serialize)]
pub struct ObtainTokenRequest<'a> {
    pub email: &'a str,
    pub password: &'a str,
}

/// Request body for registration.
#[derive(Serialize)]
pub struct RegisterRequest<'a> {
    pub first_name: &'a str,
    pub last_name: &'a str,
    pub email: &'a str,
    pub password: &'a str,
}

/// Response from the obtain and register endpoints.
#[derive(Deserialize)]
pub struct TokenPairResponse {
    pub access: String,
    pub refresh: String,
}

/// Request body for the refresh endpoint.
#[derive(Serialize)]
pub struct RefreshTokenRequest<'a> {
    pub refresh: &'a str,
}

/// Response from the refresh endpoint.
///
/// The backend normally returns only a new access token; a rotated refresh
/// token is accepted if one is ever sent.
#[derive(Deserialize)]
pub struct RefreshTokenResponse {
    pub access: String,
    #[serde(default)]
    pub refresh: Option<String>,
}

/// Request body for the change-password endpoint.
#[derive(Serialize)]
pub struct ChangePasswordRequest<'a> {
    pub new_password: &'a str,
    pub confirm_password: &'a str,
}
