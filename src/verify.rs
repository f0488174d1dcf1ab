//! Verification state machine.
//!
//! Maps the resolver's lookup result onto the small set of user-facing
//! verification states. An expired record is deliberately surfaced the
//! same way as a suspected-tamper condition; the mapping is decided here,
//! at the orchestrator, over the distinct lookup variant.

use crate::record::{DocumentRecord, LookupResult};
use crate::request::VerifyRequest;
use crate::store::{DocumentResolver, RemoteStore};
use tracing::{debug, info, warn};

/// Message surfaced when a request carries no document hash.
pub const NO_HASH_MESSAGE: &str = "no document hash provided";

/// Message surfaced when a document is absent from every store.
pub const NOT_FOUND_MESSAGE: &str = "document not found";

/// User-facing classification of a verification attempt.
#[derive(Debug, Clone, PartialEq)]
pub enum VerificationState {
    /// No verification has been started.
    Idle,
    /// Resolution is in flight.
    Loading,
    /// The document resolved to a live record.
    Verified(DocumentRecord),
    /// The record is expired or otherwise suspect. The two are surfaced
    /// identically so the failure mode is not revealed to the reader.
    Tampered,
    /// The document could not be produced; carries a user-facing message.
    NotAvailable(String),
}

impl VerificationState {
    /// True once the attempt has reached a terminal state.
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            Self::Verified(_) | Self::Tampered | Self::NotAvailable(_)
        )
    }
}

/// Drives one verification attempt from a request to a terminal state.
///
/// A fresh orchestrator is constructed per attempt; a terminal state never
/// transitions back to [`VerificationState::Loading`]. There is no
/// internal retry: a failed resolution stays terminal until the consumer
/// starts a new attempt.
pub struct VerificationOrchestrator<'a, R> {
    resolver: &'a DocumentResolver<R>,
    state: VerificationState,
}

impl<'a, R: RemoteStore> VerificationOrchestrator<'a, R> {
    /// Create an idle orchestrator over the given resolver.
    #[must_use]
    pub fn new(resolver: &'a DocumentResolver<R>) -> Self {
        Self {
            resolver,
            state: VerificationState::Idle,
        }
    }

    /// Current state of the attempt.
    #[must_use]
    pub fn state(&self) -> &VerificationState {
        &self.state
    }

    /// Run the attempt to a terminal state.
    ///
    /// A request without a hash goes straight to `NotAvailable` without
    /// touching either store. Calling `run` again after a terminal state
    /// returns that state unchanged.
    pub async fn run(&mut self, request: &VerifyRequest) -> &VerificationState {
        if self.state.is_terminal() {
            return &self.state;
        }

        let Some(hash) = request.hash() else {
            self.state = VerificationState::NotAvailable(NO_HASH_MESSAGE.to_string());
            return &self.state;
        };

        self.state = VerificationState::Loading;
        debug!("Verifying document {hash}");

        self.state = match self.resolver.resolve(hash).await {
            LookupResult::Found(mut record) => {
                if record.transaction_id.is_none() {
                    record.transaction_id = request.transaction_id().map(String::from);
                }
                info!("Document {hash} verified");
                VerificationState::Verified(record)
            }
            LookupResult::Expired => {
                warn!("Document {hash} is expired, flagging as tampered");
                VerificationState::Tampered
            }
            LookupResult::NotFound => {
                debug!("Document {hash} not found in any store");
                VerificationState::NotAvailable(NOT_FOUND_MESSAGE.to_string())
            }
            LookupResult::StoreError(detail) => {
                warn!("Verification of {hash} failed: {detail}");
                VerificationState::NotAvailable(detail)
            }
        };

        &self.state
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use crate::record::PayloadRef;
    use crate::store::{CacheConfig, HttpRemoteStore, LocalCache, RemoteConfig};
    use chrono::{DateTime, Duration, TimeZone, Utc};
    use std::sync::Arc;

    fn start_time() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap()
    }

    fn record(hash: &str) -> DocumentRecord {
        DocumentRecord {
            hash: hash.to_string(),
            transaction_id: None,
            timestamp: start_time(),
            issuer: "treasury".to_string(),
            payload: PayloadRef::Url(format!("https://docs.example/{hash}.pdf")),
            metadata: serde_json::Map::new(),
            expires_at: start_time() + Duration::days(30),
        }
    }

    /// Resolver with the remote store disabled: every lookup is local.
    fn offline_resolver(
        dir: &std::path::Path,
    ) -> (DocumentResolver<HttpRemoteStore>, Arc<ManualClock>) {
        let clock = Arc::new(ManualClock::new(start_time()));
        let cache = LocalCache::open(dir, CacheConfig::default(), clock.clone()).unwrap();
        let remote = HttpRemoteStore::new(
            RemoteConfig {
                enabled: false,
                ..Default::default()
            },
            clock.clone(),
        );
        (DocumentResolver::new(remote, cache), clock)
    }

    #[tokio::test]
    async fn test_missing_hash_short_circuits() {
        let dir = tempfile::tempdir().unwrap();
        let (resolver, _clock) = offline_resolver(dir.path());

        let mut orchestrator = VerificationOrchestrator::new(&resolver);
        assert_eq!(*orchestrator.state(), VerificationState::Idle);

        let state = orchestrator.run(&VerifyRequest::empty()).await;
        assert_eq!(
            *state,
            VerificationState::NotAvailable(NO_HASH_MESSAGE.to_string())
        );
    }

    #[tokio::test]
    async fn test_local_document_verifies_offline() {
        let dir = tempfile::tempdir().unwrap();
        let (resolver, _clock) = offline_resolver(dir.path());
        resolver.cache().put(record("abc123")).unwrap();

        let mut orchestrator = VerificationOrchestrator::new(&resolver);
        let request = VerifyRequest::new("abc123", None);
        match orchestrator.run(&request).await {
            VerificationState::Verified(found) => assert_eq!(found.hash, "abc123"),
            other => assert!(false, "expected Verified, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_expired_document_reads_as_tampered() {
        let dir = tempfile::tempdir().unwrap();
        let (resolver, clock) = offline_resolver(dir.path());
        resolver.cache().put(record("abc123")).unwrap();
        clock.advance(Duration::days(31));

        let mut orchestrator = VerificationOrchestrator::new(&resolver);
        let request = VerifyRequest::new("abc123", None);
        assert_eq!(*orchestrator.run(&request).await, VerificationState::Tampered);
    }

    #[tokio::test]
    async fn test_unknown_document_is_not_available() {
        let dir = tempfile::tempdir().unwrap();
        let (resolver, _clock) = offline_resolver(dir.path());

        let mut orchestrator = VerificationOrchestrator::new(&resolver);
        let request = VerifyRequest::new("abc123", None);
        assert_eq!(
            *orchestrator.run(&request).await,
            VerificationState::NotAvailable(NOT_FOUND_MESSAGE.to_string())
        );
    }

    #[tokio::test]
    async fn test_request_transaction_fills_missing_reference() {
        let dir = tempfile::tempdir().unwrap();
        let (resolver, _clock) = offline_resolver(dir.path());
        resolver.cache().put(record("abc123")).unwrap();

        let mut orchestrator = VerificationOrchestrator::new(&resolver);
        let request = VerifyRequest::new("abc123", Some("5KtP3mQ9".to_string()));
        match orchestrator.run(&request).await {
            VerificationState::Verified(found) => {
                assert_eq!(found.transaction_id.as_deref(), Some("5KtP3mQ9"));
            }
            other => assert!(false, "expected Verified, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_terminal_state_is_sticky() {
        let dir = tempfile::tempdir().unwrap();
        let (resolver, _clock) = offline_resolver(dir.path());
        resolver.cache().put(record("abc123")).unwrap();

        let mut orchestrator = VerificationOrchestrator::new(&resolver);
        let request = VerifyRequest::new("abc123", None);
        let first = orchestrator.run(&request).await.clone();
        assert!(first.is_terminal());

        // A terminal attempt never re-resolves, even if the store changed
        // underneath it; a new hash means a new orchestrator.
        resolver.cache().sweep_expired().unwrap();
        let second = orchestrator.run(&VerifyRequest::empty()).await;
        assert_eq!(*second, first);
    }
}
