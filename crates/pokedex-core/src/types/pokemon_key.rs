//! Pokémon lookup key type.

use std::fmt;
use std::str::FromStr;

use crate::error::{Error, InvalidInputError};

/// A validated Pokémon lookup key.
///
/// The catalogue endpoints accept either a name or a numeric id in the URL
/// path. Keys are trimmed and lowercased so `"Pikachu "` and `"pikachu"`
/// address the same resource.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct PokemonKey(String);

impl PokemonKey {
    /// Create a new key from a name or numeric id, validating the format.
    ///
    /// # Errors
    ///
    /// Returns an error if the key is empty or would break out of the
    /// endpoint path.
    pub fn new(s: impl AsRef<str>) -> Result<Self, Error> {
        let s = s.as_ref();
        let normalized = s.trim().to_lowercase();

        if normalized.is_empty() {
            return Err(InvalidInputError::PokemonKey {
                value: s.to_string(),
                reason: "must not be empty".to_string(),
            }
            .into());
        }

        if normalized.contains('/') {
            return Err(InvalidInputError::PokemonKey {
                value: s.to_string(),
                reason: "must not contain '/'".to_string(),
            }
            .into());
        }

        Ok(Self(normalized))
    }

    /// Returns the normalized key as a string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PokemonKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for PokemonKey {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl AsRef<str> for PokemonKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
