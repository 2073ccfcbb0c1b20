//! JWT expiry inspection.
//!
//! Pure functions over opaque bearer strings: decode the middle segment
//! (base64url JSON) and read the numeric `exp` claim. Decoding is
//! fail-closed: a token that cannot be decoded counts as expired and as
//! needing refresh, and nothing here panics or returns an error.
//!
//! Signatures are never verified; the server does that. The client only
//! needs expiry to decide when to refresh.

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use chrono::{DateTime, Utc};

/// Refresh an access token when it expires within this window.
pub const REFRESH_WINDOW_SECS: i64 = 300;

/// Returns true if the token's `exp` is in the past, or if the token
/// cannot be decoded.
pub fn is_expired(token: &str) -> bool {
    is_expired_at(token, Utc::now().timestamp())
}

/// Returns true if the token expires within [`REFRESH_WINDOW_SECS`], or if
/// the token cannot be decoded.
pub fn needs_refresh(token: &str) -> bool {
    needs_refresh_at(token, Utc::now().timestamp())
}

/// Returns the token's expiry time, if it can be decoded.
pub fn expires_at(token: &str) -> Option<DateTime<Utc>> {
    decode_exp(token).and_then(|exp| DateTime::from_timestamp(exp, 0))
}

fn is_expired_at(token: &str, now: i64) -> bool {
    match decode_exp(token) {
        Some(exp) => exp < now,
        None => true,
    }
}

fn needs_refresh_at(token: &str, now: i64) -> bool {
    match decode_exp(token) {
        Some(exp) => exp - now < REFRESH_WINDOW_SECS,
        None => true,
    }
}

/// Decode the `exp` claim from a JWT's payload segment.
fn decode_exp(token: &str) -> Option<i64> {
    let payload = token.split('.').nth(1)?;
    // Tolerate padded input; JWTs are unpadded base64url
    let bytes = URL_SAFE_NO_PAD.decode(payload.trim_end_matches('=')).ok()?;
    let claims: serde_json::Value = serde_json::from_slice(&bytes).ok()?;
    let exp = claims.get("exp")?;
    exp.as_i64().or_else(|| exp.as_f64().map(|f| f as i64))
}
