//! Login session: hands out a valid bearer token.
//!
//! A cached token is reused while it has enough lifetime left; otherwise the
//! session logs in with username and password and caches the new token. There
//! is no refresh flow, an expired token simply leads to a new login.

use std::fmt;

use reqwest::Method;
use serde::Deserialize;

use super::api::{Client, HostupError, LOGIN_PATH};
use crate::cache::TokenCache;
use crate::token::{Token, TokenError};

/// Body of a successful `POST /login`.
#[derive(Deserialize)]
struct LoginResponse {
    #[serde(default)]
    token: Option<String>,
    #[serde(default)]
    refresh: Option<String>,
}

/// Username/password session with a persistent token cache.
pub struct AuthSession {
    username: String,
    password: String,
    cache: TokenCache,
}

impl fmt::Debug for AuthSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthSession")
            .field("username", &self.username)
            .field("cache", &self.cache.path())
            .finish_non_exhaustive()
    }
}

impl AuthSession {
    /// Creates a session. No request is made until a token is needed.
    pub fn new(username: impl Into<String>, password: impl Into<String>, cache: TokenCache) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
            cache,
        }
    }

    /// The token cache used by this session.
    pub fn cache(&self) -> &TokenCache {
        &self.cache
    }

    /// Returns the cached token, or logs in and caches a new one.
    pub async fn get_token(&self, transport: &Client) -> Result<Token, HostupError> {
        if let Some(token) = self.cache.load()? {
            return Ok(token);
        }

        let token = self.login(transport).await?;
        self.cache.save(&token)?;
        Ok(token)
    }

    async fn login(&self, transport: &Client) -> Result<Token, HostupError> {
        tracing::info!(username = %self.username, "logging in");
        let payload = [
            ("username", self.username.clone()),
            ("password", self.password.clone()),
        ];
        let body = transport
            .dispatch(Method::POST, LOGIN_PATH, Some(&payload[..]), None)
            .await?
            .into_body()?;

        let token = parse_login_response(&body)?;
        tracing::debug!(expiration = token.expiration(), "login succeeded");
        Ok(token)
    }
}

fn parse_login_response(body: &str) -> Result<Token, TokenError> {
    let missing = || TokenError::MissingToken {
        body: body.to_string(),
    };
    let response: LoginResponse = serde_json::from_str(body).map_err(|_| missing())?;
    let token = response.token.ok_or_else(missing)?;
    Token::new(token, response.refresh.unwrap_or_default())
}
