//! Hostup DNS record management.
//!
//! This crate talks to the [Hostup](https://hostup.se) customer API to list DNS
//! zones and to add, look up and delete records by their fully-qualified name.
//! It is primarily meant for ACME DNS-01 automation, where a TXT record under
//! `_acme-challenge.<domain>` has to be created and removed again.
//!
//! # Layout
//!
//! - [`token`] - bearer token type and expiry decoding
//! - [`cache`] - on-disk token cache shared between process invocations
//! - [`hostup`] - API transport, login session and record operations
//! - [`types`] - wire types for zones, records and record requests
//! - [`config`] - settings resolution from file, environment and arguments
//!
//! # Example
//!
//! ```no_run
//! use hostup_dns::hostup::{Credentials, HostupProvider};
//! use hostup_dns::types::RecordRequest;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
//! let credentials = Credentials::new(
//!     "user@example.com",
//!     "secret",
//!     "https://min.hostup.se/api",
//!     "/tmp/hostup-token.json",
//! );
//! let provider = HostupProvider::new(credentials)?;
//!
//! let request = RecordRequest::txt("_acme-challenge.example.com", "token-value");
//! let response = provider.add_record_by_name(&request, true).await?;
//! println!("created: {}", response.success);
//! # Ok(())
//! # }
//! ```

use std::net::IpAddr;
use std::time::Duration;

pub mod cache;
pub mod config;
pub mod hostup;
pub mod token;
pub mod types;

/// Default total request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Default connect timeout.
pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// HTTP client configuration for outgoing API requests.
///
/// # Example
///
/// ```
/// use std::time::Duration;
/// use hostup_dns::HttpClientConfig;
///
/// let config = HttpClientConfig::new()
///     .timeout(Duration::from_secs(5))
///     .local_address("127.0.0.1".parse().unwrap());
/// assert_eq!(config.timeout, Some(Duration::from_secs(5)));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HttpClientConfig {
    /// Total request timeout. Falls back to [`DEFAULT_TIMEOUT`].
    pub timeout: Option<Duration>,
    /// Connect timeout. Falls back to [`DEFAULT_CONNECT_TIMEOUT`].
    pub connect_timeout: Option<Duration>,
    /// Local address to bind outgoing connections to.
    pub local_address: Option<IpAddr>,
    /// Network interface to bind outgoing connections to (Unix-like systems only).
    pub interface: Option<String>,
}

impl HttpClientConfig {
    /// Creates an empty configuration using the defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the total request timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Sets the connect timeout.
    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = Some(timeout);
        self
    }

    /// Binds outgoing connections to a local address.
    pub fn local_address(mut self, addr: IpAddr) -> Self {
        self.local_address = Some(addr);
        self
    }

    /// Binds outgoing connections to a network interface.
    pub fn interface(mut self, iface: impl Into<String>) -> Self {
        self.interface = Some(iface.into());
        self
    }

    /// Builds a `reqwest` client honouring this configuration.
    pub(crate) fn build_client(&self) -> Result<reqwest::Client, reqwest::Error> {
        let mut builder = reqwest::Client::builder()
            .user_agent(concat!("hostup-dns/", env!("CARGO_PKG_VERSION")))
            .timeout(self.timeout.unwrap_or(DEFAULT_TIMEOUT))
            .connect_timeout(self.connect_timeout.unwrap_or(DEFAULT_CONNECT_TIMEOUT));

        if let Some(addr) = self.local_address {
            builder = builder.local_address(addr);
        }

        #[cfg(any(
            target_os = "android",
            target_os = "fuchsia",
            target_os = "linux",
            target_os = "macos",
            target_os = "ios",
            target_os = "tvos",
            target_os = "watchos",
            target_os = "illumos",
            target_os = "solaris",
        ))]
        if let Some(ref iface) = self.interface {
            builder = builder.interface(iface);
        }

        builder.build()
    }
}
