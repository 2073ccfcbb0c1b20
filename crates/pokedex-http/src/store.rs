//! File-backed token persistence.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::warn;

use pokedex_core::error::StoreError;
use pokedex_core::store::TokenStore;
use pokedex_core::tokens::TokenPair;

#[cfg(unix)]
use std::os::unix::fs::PermissionsExt;

/// Token store backed by a JSON file.
///
/// The file holds one serialized pair and is created with owner-only
/// permissions on Unix. A malformed file is treated as absent and logged.
#[derive(Debug, Clone)]
pub struct FileTokenStore {
    path: PathBuf,
}

impl FileTokenStore {
    /// Create a store backed by the given file path.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// The file this store reads and writes.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl TokenStore for FileTokenStore {
    fn load(&self) -> Result<Option<TokenPair>, StoreError> {
        if !self.path.exists() {
            return Ok(None);
        }

        let json = fs::read_to_string(&self.path).map_err(|e| StoreError::Read {
            message: e.to_string(),
        })?;

        match serde_json::from_str(&json) {
            Ok(pair) => Ok(Some(pair)),
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "Ignoring malformed token file");
                Ok(None)
            }
        }
    }

    fn save(&self, pair: &TokenPair) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|e| StoreError::Write {
                message: e.to_string(),
            })?;
        }

        let json = serde_json::to_string_pretty(pair).map_err(|e| StoreError::Encode {
            message: e.to_string(),
        })?;

        fs::write(&self.path, &json).map_err(|e| StoreError::Write {
            message: e.to_string(),
        })?;

        // Set restrictive permissions (Unix only)
        #[cfg(unix)]
        {
            fs::metadata(&self.path)
                .and_then(|meta| {
                    let mut perms = meta.permissions();
                    perms.set_mode(0o600);
                    fs::set_permissions(&self.path, perms)
                })
                .map_err(|e| StoreError::Write {
                    message: e.to_string(),
                })?;
        }

        Ok(())
    }

    fn clear(&self) -> Result<(), StoreError> {
        if self.path.exists() {
            fs::remove_file(&self.path).map_err(|e| StoreError::Write {
                message: e.to_string(),
            })?;
        }
        Ok(())
    }
}
