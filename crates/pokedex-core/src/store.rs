//! Token persistence.

use std::sync::RwLock;

use crate::error::StoreError;
use crate::tokens::TokenPair;

/// Persistent storage for a token pair.
///
/// Implementations hold at most one pair: credentials are saved whole and
/// cleared whole, never half-updated. The session manager is the only
/// writer; see [`crate::tokens::TokenPair`] for the persisted shape.
///
/// Implementations must treat malformed stored data as absent rather than
/// failing, so a corrupt store can never lock a user out of logging in
/// again.
pub trait TokenStore: Send + Sync {
    /// Load the stored pair, if any.
    fn load(&self) -> Result<Option<TokenPair>, StoreError>;

    /// Persist the pair, replacing any previous one.
    fn save(&self, pair: &TokenPair) -> Result<(), StoreError>;

    /// Remove the stored pair. Clearing an empty store is not an error.
    fn clear(&self) -> Result<(), StoreError>;
}

/// An in-memory token store.
///
/// Used by tests and by embedders that do not want credentials on disk.
#[derive(Debug, Default)]
pub struct MemoryTokenStore {
    tokens: RwLock<Option<TokenPair>>,
}

impl MemoryTokenStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

impl TokenStore for MemoryTokenStore {
    fn load(&self) -> Result<Option<TokenPair>, StoreError> {
        Ok(self.tokens.read().unwrap().clone())
    }

    fn save(&self, pair: &TokenPair) -> Result<(), StoreError> {
        *self.tokens.write().unwrap() = Some(pair.clone());
        Ok(())
    }

    fn clear(&self) -> Result<(), StoreError> {
        *self.tokens.write().unwrap() = None;
        Ok(())
    }
}
