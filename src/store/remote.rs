//! Remote authoritative document store.
//!
//! The remote service is the system of record for issued documents. This
//! module defines the read contract the resolver depends on and an HTTP
//! implementation of it; the resolver never sees the transport.

use crate::clock::Clock;
use crate::record::{DocumentRecord, LookupResult};
use async_trait::async_trait;
use reqwest::{Client, StatusCode, Url};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Configuration for the remote document store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RemoteConfig {
    /// Base URL of the document service.
    #[serde(default)]
    pub base_url: Option<String>,

    /// Timeout for remote queries in seconds.
    #[serde(default = "default_query_timeout")]
    pub query_timeout_secs: u64,

    /// Whether remote lookups are enabled (false = local-only verification).
    #[serde(default = "default_enabled")]
    pub enabled: bool,
}

impl Default for RemoteConfig {
    fn default() -> Self {
        Self {
            base_url: None,
            query_timeout_secs: default_query_timeout(),
            enabled: default_enabled(),
        }
    }
}

const fn default_query_timeout() -> u64 {
    30
}

const fn default_enabled() -> bool {
    true
}

/// Read-only keyed lookup against an authoritative document service.
///
/// Implementations convert every service-side condition into a
/// [`LookupResult`] at this boundary; faults never escape as errors.
/// Availability must be checked before every lookup.
#[async_trait]
pub trait RemoteStore: Send + Sync {
    /// True once the underlying connection has completed initialization.
    fn is_available(&self) -> bool;

    /// Fetch the record stored under `hash`.
    async fn get(&self, hash: &str) -> LookupResult;
}

/// HTTP implementation of [`RemoteStore`].
///
/// Speaks a plain keyed-read contract: `GET {base_url}/documents/{hash}`
/// returns the record as JSON, 404 means no matching key. Expiry is a
/// read-time check only; remote records are never deleted by this system,
/// since their lifecycle is not ours to manage.
pub struct HttpRemoteStore {
    config: RemoteConfig,
    client: Option<Client>,
    base_url: Option<String>,
    clock: Arc<dyn Clock>,
}

impl HttpRemoteStore {
    /// Create a remote store from configuration.
    ///
    /// A missing or invalid base URL demotes the store to disabled with a
    /// warning rather than failing construction; verification then runs
    /// local-only.
    #[must_use]
    pub fn new(config: RemoteConfig, clock: Arc<dyn Clock>) -> Self {
        if !config.enabled {
            info!("Remote document store disabled - verification is local-only");
            return Self::disabled(config, clock);
        }

        let Some(raw_url) = config.base_url.clone() else {
            warn!("No remote document service URL configured - remote store disabled");
            return Self::disabled(config, clock);
        };

        if let Err(e) = Url::parse(&raw_url) {
            warn!("Invalid remote document service URL {raw_url}: {e} - remote store disabled");
            return Self::disabled(config, clock);
        }

        let client = match Client::builder().build() {
            Ok(client) => client,
            Err(e) => {
                warn!("Failed to build HTTP client: {e} - remote store disabled");
                return Self::disabled(config, clock);
            }
        };

        let base_url = raw_url.trim_end_matches('/').to_string();
        info!("Remote document store initialized at {base_url}");

        Self {
            config,
            client: Some(client),
            base_url: Some(base_url),
            clock,
        }
    }

    fn disabled(config: RemoteConfig, clock: Arc<dyn Clock>) -> Self {
        Self {
            config: RemoteConfig {
                enabled: false,
                ..config
            },
            client: None,
            base_url: None,
            clock,
        }
    }
}

#[async_trait]
impl RemoteStore for HttpRemoteStore {
    fn is_available(&self) -> bool {
        self.config.enabled && self.client.is_some()
    }

    async fn get(&self, hash: &str) -> LookupResult {
        let (Some(client), Some(base_url)) = (&self.client, &self.base_url) else {
            return LookupResult::StoreError(
                "Remote document service not connected".to_string(),
            );
        };

        let url = format!("{base_url}/documents/{hash}");
        debug!("Remote lookup for document {hash}");

        let fetch = async {
            let response = client
                .get(url)
                .send()
                .await
                .map_err(|e| format!("Error retrieving document: {e}"))?;

            if response.status() == StatusCode::NOT_FOUND {
                return Ok(None);
            }
            if !response.status().is_success() {
                return Err(format!(
                    "Remote document service returned {}",
                    response.status()
                ));
            }

            response
                .json::<DocumentRecord>()
                .await
                .map(Some)
                .map_err(|e| format!("Error decoding document: {e}"))
        };

        let timeout = Duration::from_secs(self.config.query_timeout_secs);
        match tokio::time::timeout(timeout, fetch).await {
            Ok(Ok(Some(record))) => {
                if record.is_expired_at(self.clock.now()) {
                    debug!("Remote document {hash} has expired");
                    return LookupResult::Expired;
                }
                debug!("Document {hash} found on remote service");
                LookupResult::Found(record)
            }
            Ok(Ok(None)) => {
                debug!("Document {hash} not found on remote service");
                LookupResult::NotFound
            }
            Ok(Err(detail)) => {
                warn!("Remote lookup for {hash} failed: {detail}");
                LookupResult::StoreError(detail)
            }
            Err(_) => {
                warn!("Remote lookup for {hash} timed out");
                LookupResult::StoreError("Remote document service timed out".to_string())
            }
        }
    }
}
