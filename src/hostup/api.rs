//! Low-level Hostup API client.
//!
//! Every request goes through [`Client::send`], which attaches the bearer token
//! when asked to and classifies the HTTP response into an [`ApiOutcome`]. The
//! typed helpers further down decode successful bodies into [`crate::types`].
//!
//! # Endpoints
//!
//! | Method | Path | Purpose |
//! |--------|------|---------|
//! | POST | `/login` | exchange username/password for a token |
//! | POST | `/logout` | invalidate the current token |
//! | GET | `/dns` | list zones |
//! | GET | `/service/{service_id}/dns/{domain_id}` | zone details and records |
//! | POST | `/service/{service_id}/dns/{domain_id}/records` | create a record |
//! | DELETE | `/service/{service_id}/dns/{domain_id}/records/{record_id}` | delete a record |

use std::fmt;
use std::path::PathBuf;

use reqwest::header::AUTHORIZATION;
use reqwest::Method;
use serde::de::DeserializeOwned;
use thiserror::Error;

use super::session::AuthSession;
use crate::cache::{CacheError, TokenCache};
use crate::token::{Token, TokenError};
use crate::types::{RecordRequest, RecordResponse, ZoneDetails, Zones};
use crate::HttpClientConfig;

/// The public Hostup API root.
pub const DEFAULT_API_ENDPOINT: &str = "https://min.hostup.se/api";

pub(crate) const LOGIN_PATH: &str = "/login";
pub(crate) const LOGOUT_PATH: &str = "/logout";
const ZONES_PATH: &str = "/dns";

/// Form payload: ordered key/value pairs, keys may repeat.
pub type FormPayload<'a> = &'a [(&'a str, String)];

/// Errors that may occur when interacting with the Hostup API.
#[derive(Debug, Error)]
pub enum HostupError {
    /// HTTP 429. The caller decides whether to wait and try again.
    #[error("rate limited by the API: {body}")]
    RateLimited {
        /// Raw response body.
        body: String,
    },

    /// HTTP 200 with `"success": false`.
    #[error("API error: {}", errors.join("; "))]
    Api {
        /// Error messages reported by the API.
        errors: Vec<String>,
    },

    /// Any status other than 200 or 429.
    #[error("unexpected HTTP status {status}: {body}")]
    Transport {
        /// HTTP status code.
        status: u16,
        /// Raw response body.
        body: String,
    },

    /// No zone of the account matches the given name.
    #[error("no zone found for {0}")]
    ZoneNotFound(String),

    /// The token could not be obtained or decoded.
    #[error(transparent)]
    Token(#[from] TokenError),

    /// The token cache could not be read or written.
    #[error(transparent)]
    Cache(#[from] CacheError),

    /// An HTTP request error occurred.
    #[error("HTTP request error: {0}")]
    Request(#[from] reqwest::Error),

    /// A response body did not have the expected shape.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Classified result of a single API call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiOutcome {
    /// HTTP 200; the raw body, to be decoded by the caller.
    Success(String),
    /// HTTP 429; the raw body.
    RateLimited(String),
    /// HTTP 200 carrying `"success": false`; the API's error list.
    ApiError(Vec<String>),
    /// Any other status.
    TransportError {
        /// HTTP status code.
        status: u16,
        /// Raw response body.
        body: String,
    },
}

impl ApiOutcome {
    /// Classifies a status code and body.
    pub fn classify(status: u16, body: String) -> Self {
        match status {
            429 => ApiOutcome::RateLimited(body),
            200 => match failure_errors(&body) {
                Some(errors) => ApiOutcome::ApiError(errors),
                None => ApiOutcome::Success(body),
            },
            _ => ApiOutcome::TransportError { status, body },
        }
    }

    /// Returns the body of a successful call, or the matching error.
    pub fn into_body(self) -> Result<String, HostupError> {
        match self {
            ApiOutcome::Success(body) => Ok(body),
            ApiOutcome::RateLimited(body) => Err(HostupError::RateLimited { body }),
            ApiOutcome::ApiError(errors) => Err(HostupError::Api { errors }),
            ApiOutcome::TransportError { status, body } => {
                Err(HostupError::Transport { status, body })
            }
        }
    }

    /// Decodes the body of a successful call.
    pub fn decode<T: DeserializeOwned>(self) -> Result<T, HostupError> {
        let body = self.into_body()?;
        Ok(serde_json::from_str(&body)?)
    }
}

/// Extracts the error list when `body` is a JSON object with `"success": false`.
fn failure_errors(body: &str) -> Option<Vec<String>> {
    let value: serde_json::Value = serde_json::from_str(body).ok()?;
    let object = value.as_object()?;
    if object.get("success")?.as_bool()? {
        return None;
    }

    let errors = match object.get("error") {
        Some(serde_json::Value::Array(items)) => items
            .iter()
            .map(|item| match item {
                serde_json::Value::String(s) => s.clone(),
                other => other.to_string(),
            })
            .collect(),
        Some(serde_json::Value::String(message)) => vec![message.clone()],
        _ => Vec::new(),
    };
    Some(errors)
}

/// Resolved connection settings for the API client.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    /// Account username (usually an email address).
    pub username: String,
    /// Account password.
    pub password: String,
    /// API root, without trailing slash.
    pub api_endpoint: String,
    /// Where the bearer token is cached between runs.
    pub token_cache_path: PathBuf,
}

impl Credentials {
    /// Creates a new set of credentials.
    pub fn new(
        username: impl Into<String>,
        password: impl Into<String>,
        api_endpoint: impl Into<String>,
        token_cache_path: impl Into<PathBuf>,
    ) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
            api_endpoint: api_endpoint.into(),
            token_cache_path: token_cache_path.into(),
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .field("api_endpoint", &self.api_endpoint)
            .field("token_cache_path", &self.token_cache_path)
            .finish()
    }
}

/// Hostup API client.
#[derive(Debug)]
pub struct Client {
    http_client: reqwest::Client,
    base_url: String,
    session: AuthSession,
}

impl Client {
    /// Creates a new API client with default HTTP settings.
    pub fn new(credentials: Credentials) -> Result<Self, reqwest::Error> {
        Self::with_http_config(credentials, HttpClientConfig::default())
    }

    /// Creates a new API client with custom HTTP configuration.
    pub fn with_http_config(
        credentials: Credentials,
        http_config: HttpClientConfig,
    ) -> Result<Self, reqwest::Error> {
        let http_client = http_config.build_client()?;
        let cache = TokenCache::new(credentials.token_cache_path);
        Ok(Self {
            http_client,
            base_url: credentials.api_endpoint.trim_end_matches('/').to_string(),
            session: AuthSession::new(credentials.username, credentials.password, cache),
        })
    }

    /// The API root requests are sent to.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// The login session holding the token cache.
    pub fn session(&self) -> &AuthSession {
        &self.session
    }

    /// Returns a valid token, logging in if needed.
    pub async fn get_token(&self) -> Result<Token, HostupError> {
        self.session.get_token(self).await
    }

    /// Sends one request and classifies the response.
    ///
    /// With `requires_auth` the bearer token is obtained first (which may
    /// itself trigger a login). The call is never retried.
    pub async fn send(
        &self,
        method: Method,
        path: &str,
        payload: Option<FormPayload<'_>>,
        requires_auth: bool,
    ) -> Result<ApiOutcome, HostupError> {
        let token = if requires_auth {
            Some(self.get_token().await?)
        } else {
            None
        };
        self.dispatch(method, path, payload, token.as_ref().map(Token::bearer))
            .await
    }

    /// Performs the HTTP exchange. Never consults the session, so login can
    /// use it without recursing.
    pub(crate) async fn dispatch(
        &self,
        method: Method,
        path: &str,
        payload: Option<FormPayload<'_>>,
        bearer: Option<&str>,
    ) -> Result<ApiOutcome, HostupError> {
        let url = format!("{}{}", self.base_url, path);
        tracing::debug!(%method, %url, "request");

        let mut request = self.http_client.request(method.clone(), &url);
        if let Some(bearer) = bearer {
            request = request.header(AUTHORIZATION, format!("Bearer {}", bearer));
        }
        if let Some(payload) = payload {
            request = request.form(payload);
        }

        let response = request.send().await?;
        let status = response.status().as_u16();
        let body = response.text().await?;
        tracing::debug!(%method, %url, status, "response");

        let outcome = ApiOutcome::classify(status, body);
        match &outcome {
            ApiOutcome::RateLimited(_) => tracing::warn!(%method, %url, "rate limited (HTTP 429)"),
            ApiOutcome::ApiError(errors) => tracing::debug!(%method, %url, ?errors, "API error"),
            _ => {}
        }
        Ok(outcome)
    }

    // =========================================================================
    // Typed endpoints
    // =========================================================================

    /// Lists all zones of the account.
    pub async fn list_zones(&self) -> Result<Zones, HostupError> {
        self.send(Method::GET, ZONES_PATH, None, true)
            .await?
            .decode()
    }

    /// Gets a zone's details, including all of its records.
    pub async fn zone_details(
        &self,
        service_id: i64,
        domain_id: i64,
    ) -> Result<ZoneDetails, HostupError> {
        self.send(Method::GET, &zone_path(service_id, domain_id), None, true)
            .await?
            .decode()
    }

    /// Creates a record in zone `domain_id` of service `service_id`.
    pub async fn create_record(
        &self,
        service_id: i64,
        domain_id: i64,
        request: &RecordRequest,
    ) -> Result<RecordResponse, HostupError> {
        let payload = request.form_pairs();
        self.send(
            Method::POST,
            &format!("{}/records", zone_path(service_id, domain_id)),
            Some(payload.as_slice()),
            true,
        )
        .await?
        .decode()
    }

    /// Deletes record `record_id` from zone `domain_id` of service `service_id`.
    pub async fn delete_record(
        &self,
        service_id: i64,
        domain_id: i64,
        record_id: i64,
    ) -> Result<RecordResponse, HostupError> {
        self.send(
            Method::DELETE,
            &format!("{}/records/{}", zone_path(service_id, domain_id), record_id),
            None,
            true,
        )
        .await?
        .decode()
    }
}

fn zone_path(service_id: i64, domain_id: i64) -> String {
    format!("/service/{}/dns/{}", service_id, domain_id)
}
