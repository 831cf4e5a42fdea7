//! Bearer tokens issued by the Hostup login endpoint.
//!
//! The API hands out a compact `header.payload.signature` token whose payload
//! carries an `exp` claim. The client only needs that claim to decide when to
//! log in again, so the payload is decoded without verifying the signature;
//! the API itself rejects tokens it did not issue.

use base64::engine::general_purpose::URL_SAFE;
use base64::Engine;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised while turning a raw token into a [`Token`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TokenError {
    /// The token is not a three-part token with a decodable JSON payload.
    #[error("malformed token ({reason}): {token}")]
    Malformed {
        /// The raw token.
        token: String,
        /// What could not be decoded.
        reason: String,
    },

    /// The payload decoded fine but carries no integer `exp` claim.
    #[error("could not find expiration in token: {token}")]
    MissingExpiration {
        /// The raw token.
        token: String,
    },

    /// The login response did not contain a token at all.
    #[error("login response did not contain a token: {body}")]
    MissingToken {
        /// The raw response body.
        body: String,
    },
}

impl TokenError {
    fn malformed(token: &str, reason: impl Into<String>) -> Self {
        TokenError::Malformed {
            token: token.to_string(),
            reason: reason.into(),
        }
    }
}

/// Decodes the `exp` claim (epoch seconds) of a token.
///
/// # Example
///
/// ```
/// use hostup_dns::token::decode_expiry;
///
/// // {"alg":"HS256","typ":"JWT"} . {"exp":95617584000} . signature
/// let token = "eyJhbGciOiJIUzI1NiIsInR5cCI6IkpXVCJ9.eyJleHAiOjk1NjE3NTg0MDAwfQ.c2ln";
/// assert_eq!(decode_expiry(token).unwrap(), 95617584000);
/// ```
pub fn decode_expiry(token: &str) -> Result<i64, TokenError> {
    let parts: Vec<&str> = token.split('.').collect();
    if parts.len() != 3 {
        return Err(TokenError::malformed(
            token,
            format!("expected 3 parts, found {}", parts.len()),
        ));
    }

    let mut payload = parts[1].to_string();
    if payload.is_empty() {
        return Err(TokenError::malformed(token, "empty payload"));
    }
    let missing = (4 - payload.len() % 4) % 4;
    payload.extend(std::iter::repeat('=').take(missing));

    let decoded = URL_SAFE
        .decode(payload.as_bytes())
        .map_err(|e| TokenError::malformed(token, format!("invalid base64: {}", e)))?;

    let claims: serde_json::Value = serde_json::from_slice(&decoded)
        .map_err(|e| TokenError::malformed(token, format!("invalid JSON payload: {}", e)))?;

    claims
        .get("exp")
        .and_then(serde_json::Value::as_i64)
        .ok_or_else(|| TokenError::MissingExpiration {
            token: token.to_string(),
        })
}

/// An API bearer token together with its decoded expiry.
///
/// A `Token` can only be built through [`Token::new`] (deserialization goes
/// through it as well), so `expiration` always reflects the token's own claim.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "StoredToken")]
pub struct Token {
    token: String,
    refresh: String,
    expiration: i64,
}

/// Shape of a token as found in the cache file or the login response.
#[derive(Deserialize)]
struct StoredToken {
    token: String,
    #[serde(default)]
    refresh: String,
}

impl TryFrom<StoredToken> for Token {
    type Error = TokenError;

    fn try_from(stored: StoredToken) -> Result<Self, Self::Error> {
        Token::new(stored.token, stored.refresh)
    }
}

impl Token {
    /// Creates a token, decoding its expiry.
    pub fn new(token: impl Into<String>, refresh: impl Into<String>) -> Result<Self, TokenError> {
        let token = token.into();
        let expiration = decode_expiry(&token)?;
        Ok(Self {
            token,
            refresh: refresh.into(),
            expiration,
        })
    }

    /// The raw bearer string.
    pub fn bearer(&self) -> &str {
        &self.token
    }

    /// The refresh value returned by the login call. Stored, never used.
    pub fn refresh(&self) -> &str {
        &self.refresh
    }

    /// Expiry as epoch seconds.
    pub fn expiration(&self) -> i64 {
        self.expiration
    }

    /// Expiry as a timestamp, if it fits chrono's range.
    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.expiration, 0)
    }

    /// Seconds left until expiry at `now`; negative once expired.
    pub fn seconds_until_expiration(&self, now: DateTime<Utc>) -> i64 {
        self.expiration.saturating_sub(now.timestamp())
    }
}
