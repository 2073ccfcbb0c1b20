//! CLI configuration persisted between runs.
//!
//! The CLI remembers the API base URL chosen at login in a small config
//! file, next to the token file managed by [`FileTokenStore`]. Later
//! commands reach the same backend without repeating `--api`.

use std::fs;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result, bail};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use pokedex_core::ApiUrl;
use pokedex_http::{FileTokenStore, Session};

use crate::notify::CliNotifier;

/// API used when `--api` is not given at login.
pub const DEFAULT_API: &str = "http://localhost:8000";

/// Stored CLI configuration.
#[derive(Debug, Serialize, Deserialize)]
struct StoredConfig {
    api: String,
}

/// Get the data directory, creating it if needed.
fn data_dir() -> Result<PathBuf> {
    let dirs =
        ProjectDirs::from("", "", "pokedex").context("Could not determine config directory")?;

    let data_dir = dirs.data_dir();
    fs::create_dir_all(data_dir).context("Failed to create data directory")?;

    Ok(data_dir.to_path_buf())
}

fn config_path() -> Result<PathBuf> {
    Ok(data_dir()?.join("config.json"))
}

fn tokens_path() -> Result<PathBuf> {
    Ok(data_dir()?.join("tokens.json"))
}

/// Remember the API URL used at login.
pub fn save_api(api: &ApiUrl) -> Result<()> {
    let stored = StoredConfig {
        api: api.as_str().to_string(),
    };

    let path = config_path()?;
    let json = serde_json::to_string_pretty(&stored)?;

    fs::write(&path, &json).context("Failed to write config file")?;

    Ok(())
}

/// Load the remembered API URL, if any.
pub fn load_api() -> Result<Option<ApiUrl>> {
    let path = config_path()?;

    if !path.exists() {
        return Ok(None);
    }

    let json = fs::read_to_string(&path).context("Failed to read config file")?;
    let stored: StoredConfig = match serde_json::from_str(&json) {
        Ok(stored) => stored,
        Err(e) => {
            tracing::warn!(error = %e, "Ignoring malformed config file");
            return Ok(None);
        }
    };

    let api = ApiUrl::new(&stored.api).context("Invalid API URL in config")?;

    Ok(Some(api))
}

/// A fresh session against the given API, with nothing restored.
pub fn fresh_session(api: ApiUrl) -> Result<Session> {
    let store = FileTokenStore::new(tokens_path()?);
    Ok(Session::new(api, Arc::new(store), Arc::new(CliNotifier)))
}

/// The session for the API remembered at login, with stored tokens resolved.
pub async fn restored_session() -> Result<Session> {
    let api = load_api()?.context("No active session. Run 'pokedex auth login' first.")?;
    let store = FileTokenStore::new(tokens_path()?);

    Ok(Session::initialize(api, Arc::new(store), Arc::new(CliNotifier)).await)
}

/// The restored session, failing if nobody is logged in.
pub async fn authenticated_session() -> Result<Session> {
    let session = restored_session().await?;

    if session.access_token().is_none() {
        bail!("No active session. Run 'pokedex auth login' first.");
    }

    Ok(session)
}
