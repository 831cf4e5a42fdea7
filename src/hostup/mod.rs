//! Hostup DNS provider.
//!
//! Records are addressed by their fully-qualified name. The provider finds
//! the owning zone by scanning the account's zone listing and finds records by
//! scanning each zone's record listing, so no zone or record IDs need to be
//! known up front. Records can still be listed and deleted by ID when a name
//! is ambiguous.
//!
//! # Important Notes
//!
//! - **Zone matching**: the first zone whose name occurs anywhere in the
//!   requested name is used. This is a plain substring test, not a suffix or
//!   longest-match test.
//! - **Record lookup**: every zone's listing may be fetched, one request per
//!   zone. Fine for accounts with tens of zones.
//! - **Replacement**: [`HostupProvider::add_record_by_name`] with
//!   `replace_existing` deletes *all* records with the same name first.
//! - **By ID**: [`HostupProvider::list_records`] and
//!   [`HostupProvider::delete_record_by_id`] skip name resolution entirely.
//!
//! # Example
//!
//! ```no_run
//! use hostup_dns::hostup::{Credentials, HostupProvider};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
//! let credentials = Credentials::new(
//!     "user@example.com",
//!     "secret",
//!     hostup_dns::hostup::DEFAULT_API_ENDPOINT,
//!     "/tmp/hostup-token.json",
//! );
//! let provider = HostupProvider::new(credentials)?;
//!
//! for zone in provider.list_zones().await?.zones {
//!     println!("{} (service {}, zone {})", zone.name, zone.service_id, zone.domain_id);
//! }
//! # Ok(())
//! # }
//! ```

pub mod api;
pub mod session;

use std::sync::Arc;

use reqwest::Method;

pub use api::{ApiOutcome, Client, Credentials, HostupError, DEFAULT_API_ENDPOINT};
pub use session::AuthSession;

use crate::types::{
    Record, RecordMatch, RecordRequest, RecordResponse, Zone, ZoneDetails, Zones, DEFAULT_TTL,
};
use crate::HttpClientConfig;

/// Hostup DNS provider.
#[derive(Debug, Clone)]
pub struct HostupProvider {
    api_client: Arc<Client>,
}

impl HostupProvider {
    /// Creates a new provider with default HTTP settings.
    pub fn new(credentials: Credentials) -> Result<Self, reqwest::Error> {
        Ok(Self {
            api_client: Arc::new(Client::new(credentials)?),
        })
    }

    /// Creates a new provider with custom HTTP client configuration.
    pub fn with_http_config(
        credentials: Credentials,
        http_config: HttpClientConfig,
    ) -> Result<Self, reqwest::Error> {
        Ok(Self {
            api_client: Arc::new(Client::with_http_config(credentials, http_config)?),
        })
    }

    /// The underlying API client.
    pub fn api_client(&self) -> &Client {
        &self.api_client
    }

    // =========================================================================
    // Resolution
    // =========================================================================

    /// Finds the zone a name belongs to.
    pub async fn find_zone(&self, fqdn: &str) -> Result<Option<Zone>, HostupError> {
        let zones = self.api_client.list_zones().await?;
        Ok(match_zone(&zones.zones, fqdn).cloned())
    }

    /// Finds the first record named exactly `fqdn`, in zone listing order.
    pub async fn find_record(&self, fqdn: &str) -> Result<Option<RecordMatch>, HostupError> {
        let zones = self.api_client.list_zones().await?;
        for zone in zones.zones {
            let details = self
                .api_client
                .zone_details(zone.service_id, zone.domain_id)
                .await?;
            if let Some(record) = match_record(details, fqdn) {
                return Ok(Some(RecordMatch { zone, record }));
            }
        }
        Ok(None)
    }

    // =========================================================================
    // Record operations
    // =========================================================================

    /// Lists all zones of the account.
    pub async fn list_zones(&self) -> Result<Zones, HostupError> {
        self.api_client.list_zones().await
    }

    /// Returns the record named `name`, if any.
    pub async fn get_record_by_name(&self, name: &str) -> Result<Option<Record>, HostupError> {
        Ok(self.find_record(name).await?.map(|found| found.record))
    }

    /// Creates a record in the zone owning `request.name`.
    ///
    /// With `replace_existing`, every record of the same name is deleted first.
    pub async fn add_record_by_name(
        &self,
        request: &RecordRequest,
        replace_existing: bool,
    ) -> Result<RecordResponse, HostupError> {
        if replace_existing {
            let deleted = self.delete_record_by_name(&request.name).await?;
            if !deleted.is_empty() {
                tracing::info!(name = %request.name, count = deleted.len(), "replaced existing records");
            }
        }

        let zone = self
            .find_zone(&request.name)
            .await?
            .ok_or_else(|| HostupError::ZoneNotFound(request.name.clone()))?;

        tracing::info!(
            name = %request.name,
            record_type = %request.record_type,
            zone = %zone.name,
            "creating record"
        );
        self.api_client
            .create_record(zone.service_id, zone.domain_id, request)
            .await
    }

    /// Deletes every record named `name`.
    ///
    /// Keeps resolving and deleting until no record of that name is left.
    /// This relies on the API reflecting a deletion in the very next listing.
    pub async fn delete_record_by_name(
        &self,
        name: &str,
    ) -> Result<Vec<RecordResponse>, HostupError> {
        let mut responses = Vec::new();
        while let Some(RecordMatch { zone, record }) = self.find_record(name).await? {
            tracing::info!(name, record_id = record.id, zone = %zone.name, "deleting record");
            responses.push(
                self.api_client
                    .delete_record(zone.service_id, zone.domain_id, record.id)
                    .await?,
            );
        }
        Ok(responses)
    }

    /// Lists the records of one zone, addressed by ID.
    pub async fn list_records(
        &self,
        service_id: i64,
        domain_id: i64,
    ) -> Result<ZoneDetails, HostupError> {
        self.api_client.zone_details(service_id, domain_id).await
    }

    /// Deletes one record by ID, without any name lookup.
    pub async fn delete_record_by_id(
        &self,
        service_id: i64,
        domain_id: i64,
        record_id: i64,
    ) -> Result<RecordResponse, HostupError> {
        tracing::info!(service_id, domain_id, record_id, "deleting record");
        self.api_client
            .delete_record(service_id, domain_id, record_id)
            .await
    }

    /// Invalidates the cached token on the server and removes it locally.
    ///
    /// Does nothing when no token is cached.
    pub async fn logout(&self) -> Result<(), HostupError> {
        let cache = self.api_client.session().cache();
        if cache.load()?.is_none() {
            tracing::debug!("no cached token, nothing to log out");
            return Ok(());
        }

        let outcome = self
            .api_client
            .send(Method::POST, api::LOGOUT_PATH, None, true)
            .await?;
        match outcome {
            ApiOutcome::Success(_) => {
                cache.delete()?;
                tracing::info!("logged out");
                Ok(())
            }
            // still an HTTP 200: the server has processed the logout
            ApiOutcome::ApiError(errors) => {
                cache.delete()?;
                Err(HostupError::Api { errors })
            }
            other => other.into_body().map(|_| ()),
        }
    }

    // =========================================================================
    // ACME DNS-01
    // =========================================================================

    /// Publishes an ACME challenge value as a TXT record.
    ///
    /// Existing values are kept so that several challenges for the same name
    /// (wildcard and apex) can be pending at once.
    pub async fn present_challenge(
        &self,
        fqdn: &str,
        value: &str,
    ) -> Result<RecordResponse, HostupError> {
        let request = RecordRequest::new(challenge_name(fqdn), "TXT", value, DEFAULT_TTL, 0);
        self.add_record_by_name(&request, false).await
    }

    /// Removes all TXT challenge records for `fqdn`.
    pub async fn cleanup_challenge(&self, fqdn: &str) -> Result<Vec<RecordResponse>, HostupError> {
        self.delete_record_by_name(challenge_name(fqdn)).await
    }
}

/// Strips the trailing root dot ACME clients pass along.
fn challenge_name(fqdn: &str) -> &str {
    fqdn.strip_suffix('.').unwrap_or(fqdn)
}

/// First zone whose name occurs in `fqdn`.
fn match_zone<'a>(zones: &'a [Zone], fqdn: &str) -> Option<&'a Zone> {
    zones.iter().find(|zone| fqdn.contains(zone.name.as_str()))
}

/// First record of a zone listing named exactly `fqdn`.
fn match_record(details: ZoneDetails, fqdn: &str) -> Option<Record> {
    details.records.into_iter().find(|record| record.name == fqdn)
}
