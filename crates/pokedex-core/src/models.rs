//! API resource types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The authenticated user's profile.
///
/// An immutable snapshot of what the profile endpoint returned; replaced
/// wholesale on each fetch, never patched field by field.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    /// Numeric primary key.
    pub id: i64,

    /// Stable unique identifier.
    pub uuid: String,

    /// Account email, also the login identifier.
    pub email: String,

    pub first_name: String,
    pub last_name: String,

    pub is_active: bool,
    pub is_staff: bool,
    pub is_superuser: bool,

    pub date_joined: DateTime<Utc>,

    /// Absent until the first login.
    pub last_login: Option<DateTime<Utc>>,
}

impl User {
    /// A display name: "first last", falling back to the first name, then
    /// to a numbered placeholder.
    pub fn full_name(&self) -> String {
        match (self.first_name.is_empty(), self.last_name.is_empty()) {
            (false, false) => format!("{} {}", self.first_name, self.last_name),
            (false, true) => self.first_name.clone(),
            _ => format!("user {}", self.id),
        }
    }
}

/// Artwork URLs for a Pokémon.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PokemonSprites {
    /// The regular artwork.
    #[serde(rename = "default")]
    pub normal: String,

    /// The shiny variant.
    pub shiny: String,
}

/// A Pokémon catalogue entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Pokemon {
    /// Numeric primary key in the catalogue.
    pub id: i64,

    /// The national dex number.
    pub external_id: i64,

    pub name: String,

    /// Flavor text shown on the detail view.
    pub flavor_text: String,

    pub sprites: PokemonSprites,

    pub abilities: Vec<String>,

    /// Height in decimetres.
    pub height: i64,

    /// Weight in hectograms.
    pub weight: i64,

    pub types: Vec<String>,

    /// URL of the cry audio clip.
    pub cry: String,

    /// Whether the authenticated user has favorited this Pokémon.
    pub is_favorited: bool,
}

/// One page of a paginated listing.
///
/// The backend's pagination envelope: `next`/`previous` are opaque URLs to
/// the adjacent pages, `count` is the total across all pages.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Page<T> {
    pub count: u64,
    pub next: Option<String>,
    pub previous: Option<String>,
    pub results: Vec<T>,
}

/// A node in a Pokémon evolution chain.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvolutionNode {
    pub pokemon: Pokemon,

    /// How this form is reached, e.g. a level or item requirement.
    /// Absent on the root of the chain.
    #[serde(default)]
    pub evolution_text: Option<String>,

    /// Forms this Pokémon evolves into.
    #[serde(default)]
    pub evolves_to: Vec<EvolutionNode>,
}
