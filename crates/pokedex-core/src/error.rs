//! Error types for the pokedex client.
//!
//! This module provides a unified error type with explicit variants for
//! transport, authentication, request, storage, and input validation errors.

use std::fmt;
use thiserror::Error;

/// The unified error type for pokedex operations.
///
/// Every failure mode carries an explicit variant so callers can match on
/// the specific case instead of probing error messages.
#[derive(Debug, Error)]
pub enum Error {
    /// Network transport errors (connection, timeout).
    #[error("transport error: {0}")]
    Transport(#[from] TransportError),

    /// Authentication errors (missing or rejected credentials).
    #[error("authentication error: {0}")]
    Auth(#[from] AuthError),

    /// A non-2xx API response, carrying the status and body for inspection.
    #[error("request failed: {0}")]
    Request(#[from] RequestFailure),

    /// Token store errors (I/O, serialization).
    #[error("store error: {0}")]
    Store(#[from] StoreError),

    /// Input validation errors (invalid API URL or Pokémon key).
    #[error("invalid input: {0}")]
    InvalidInput(#[from] InvalidInputError),

    /// A response body that could not be decoded into the expected type.
    #[error("failed to decode response: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Transport-level errors.
#[derive(Debug, Error)]
pub enum TransportError {
    /// Network connection failed.
    #[error("connection failed: {message}")]
    Connection { message: String },

    /// Request timed out.
    #[error("request timed out after {duration_ms}ms")]
    Timeout { duration_ms: u64 },

    /// Generic HTTP error.
    #[error("HTTP error: {message}")]
    Http { message: String },
}

/// Authentication-related errors.
#[derive(Debug, Error)]
pub enum AuthError {
    /// No access token is available to attach to a request.
    #[error("no access token available")]
    NoAccessToken,

    /// No refresh token is available to renew the session.
    #[error("no refresh token available")]
    NoRefreshToken,

    /// The stored refresh token is past its own expiry.
    ///
    /// The session has already been logged out when this is returned.
    #[error("refresh token expired")]
    RefreshTokenExpired,

    /// The refresh endpoint rejected the refresh token.
    ///
    /// The session has already been logged out when this is returned.
    #[error("token refresh failed: {detail}")]
    RefreshFailed { detail: String },

    /// A 401 retry could not complete because the token refresh failed.
    ///
    /// The session has already been logged out when this is returned.
    #[error("authentication failed")]
    AuthenticationFailed,
}

/// A non-2xx response from the API.
///
/// Carries the status and the decoded body so callers can inspect both.
/// `retried` marks a failure that survived the one-shot 401 retry.
#[derive(Debug)]
pub struct RequestFailure {
    /// HTTP status code.
    pub status: u16,
    /// The response body, decoded as JSON where possible, otherwise a
    /// JSON string holding the raw text.
    pub body: serde_json::Value,
    /// True if this response came from the single 401-triggered resend.
    pub retried: bool,
}

impl RequestFailure {
    /// Create a new request failure.
    pub fn new(status: u16, body: serde_json::Value, retried: bool) -> Self {
        Self {
            status,
            body,
            retried,
        }
    }

    /// Extract a human-readable message from the response body, if any.
    ///
    /// Follows the backend's error conventions: a bare string body, then a
    /// `detail` field, then a `message` field, then per-field validation
    /// errors flattened to `• <msg>` lines.
    pub fn detail(&self) -> Option<String> {
        use serde_json::Value;

        match &self.body {
            Value::String(text) if !text.is_empty() => Some(text.clone()),
            Value::Object(map) => {
                if let Some(Value::String(detail)) = map.get("detail") {
                    return Some(detail.clone());
                }
                if let Some(Value::String(message)) = map.get("message") {
                    return Some(message.clone());
                }

                let mut lines = Vec::new();
                for value in map.values() {
                    match value {
                        Value::Array(items) => {
                            for item in items {
                                if let Value::String(msg) = item {
                                    lines.push(format!("• {}", msg));
                                }
                            }
                        }
                        Value::String(msg) => lines.push(format!("• {}", msg)),
                        _ => {}
                    }
                }

                if lines.is_empty() {
                    None
                } else {
                    Some(lines.join("\n"))
                }
            }
            _ => None,
        }
    }

    /// A human-readable summary, falling back to the status code.
    pub fn summary(&self) -> String {
        self.detail()
            .unwrap_or_else(|| format!("HTTP {}", self.status))
    }
}

impl fmt::Display for RequestFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "HTTP {}", self.status)?;
        if self.retried {
            write!(f, " after retry")?;
        }
        if let Some(detail) = self.detail() {
            write!(f, ": {}", detail)?;
        }
        Ok(())
    }
}

impl std::error::Error for RequestFailure {}

/// Token store errors.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Failed to read from the store.
    #[error("failed to read token store: {message}")]
    Read { message: String },

    /// Failed to write to the store.
    #[error("failed to write token store: {message}")]
    Write { message: String },

    /// Failed to encode the token pair for storage.
    #[error("failed to encode tokens: {message}")]
    Encode { message: String },
}

/// Input validation errors.
#[derive(Debug, Error)]
pub enum InvalidInputError {
    /// Invalid API base URL.
    #[error("invalid API URL '{value}': {reason}")]
    ApiUrl { value: String, reason: String },

    /// Invalid Pokémon identifier.
    #[error("invalid Pokémon key '{value}': {reason}")]
    PokemonKey { value: String, reason: String },

    /// Generic invalid input.
    #[error("invalid input: {message}")]
    Other { message: String },
}
