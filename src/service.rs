//! Verifier service - wires configuration, stores, and events together.
//!
//! One `Verifier` serves one consumer session. Each call to
//! [`Verifier::verify`] is an independent attempt with a fresh state
//! machine; stale results from an abandoned attempt are the caller's to
//! discard by hash comparison, never cancelled in flight.

use crate::clock::{Clock, SystemClock};
use crate::config::VerifierConfig;
use crate::error::Result;
use crate::event::{
    create_event_channel, VerifierEvent, VerifierEventsChannel, VerifierEventsSender,
};
use crate::record::DocumentRecord;
use crate::request::VerifyRequest;
use crate::store::{DocumentResolver, HttpRemoteStore, LocalCache, RemoteStore, ResolverStats};
use crate::verify::{VerificationOrchestrator, VerificationState};
use std::path::Path;
use std::sync::Arc;
use tracing::info;

/// Builder for constructing a verifier.
pub struct VerifierBuilder {
    config: VerifierConfig,
    clock: Arc<dyn Clock>,
}

impl VerifierBuilder {
    /// Create a builder with the given configuration and the system clock.
    #[must_use]
    pub fn new(config: VerifierConfig) -> Self {
        Self {
            config,
            clock: Arc::new(SystemClock),
        }
    }

    /// Use a custom time source.
    #[must_use]
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Build the verifier.
    ///
    /// # Errors
    ///
    /// Returns an error if the cache directory cannot be prepared.
    pub fn build(self) -> Result<Verifier<HttpRemoteStore>> {
        info!("Building verifier with config: {:?}", self.config);

        std::fs::create_dir_all(&self.config.root_dir)?;

        let cache = LocalCache::open(
            &self.config.root_dir.join("documents"),
            self.config.cache.clone(),
            Arc::clone(&self.clock),
        )?;
        let remote = HttpRemoteStore::new(self.config.remote.clone(), Arc::clone(&self.clock));
        let resolver = DocumentResolver::new(remote, cache);

        Ok(Verifier::new(self.config, resolver))
    }
}

/// A running document verifier.
pub struct Verifier<R> {
    config: VerifierConfig,
    resolver: DocumentResolver<R>,
    events_tx: VerifierEventsSender,
    events_rx: Option<VerifierEventsChannel>,
}

impl<R: RemoteStore> Verifier<R> {
    /// Create a verifier over an already-built resolver.
    ///
    /// Embedders with their own remote transport construct the resolver
    /// themselves; [`VerifierBuilder`] covers the HTTP case.
    #[must_use]
    pub fn new(config: VerifierConfig, resolver: DocumentResolver<R>) -> Self {
        let (events_tx, events_rx) = create_event_channel();
        Self {
            config,
            resolver,
            events_tx,
            events_rx: Some(events_rx),
        }
    }

    /// Run the startup sweep and announce readiness.
    ///
    /// Idempotent; the sweep is safe to run repeatedly.
    ///
    /// # Errors
    ///
    /// Returns an error if the cache index cannot be read or rewritten.
    pub fn start(&self) -> Result<()> {
        let removed = self.resolver.cache().sweep_expired()?;
        if removed > 0 {
            info!("Startup sweep removed {removed} expired documents");
        }
        let _ = self.events_tx.send(VerifierEvent::CacheSwept { removed });
        let _ = self.events_tx.send(VerifierEvent::Started);
        Ok(())
    }

    /// Verify a single request to a terminal state.
    pub async fn verify(&self, request: &VerifyRequest) -> VerificationState {
        if let Some(hash) = request.hash() {
            let _ = self.events_tx.send(VerifierEvent::VerificationStarted {
                hash: hash.to_string(),
            });
        }

        let mut orchestrator = VerificationOrchestrator::new(&self.resolver);
        let state = orchestrator.run(request).await.clone();

        match &state {
            VerificationState::Verified(record) => {
                let _ = self.events_tx.send(VerifierEvent::DocumentVerified {
                    hash: record.hash.clone(),
                });
            }
            VerificationState::Tampered => {
                // Expiry and tampering share one non-specific presentation.
                let _ = self.events_tx.send(VerifierEvent::DocumentRejected {
                    hash: request.hash().map(String::from),
                    reason: "document invalid".to_string(),
                });
            }
            VerificationState::NotAvailable(message) => {
                let _ = self.events_tx.send(VerifierEvent::DocumentRejected {
                    hash: request.hash().map(String::from),
                    reason: message.clone(),
                });
            }
            VerificationState::Idle | VerificationState::Loading => {}
        }

        state
    }

    /// Store a freshly produced document in the local cache.
    ///
    /// This is the producer-side write path; the verification read path
    /// never writes records.
    ///
    /// # Errors
    ///
    /// Returns an error if the record cannot be written.
    pub fn store_document(&self, record: DocumentRecord) -> Result<()> {
        let hash = record.hash.clone();
        self.resolver.cache().put(record)?;
        let _ = self.events_tx.send(VerifierEvent::DocumentStored { hash });
        Ok(())
    }

    /// Take the initial event receiver.
    ///
    /// Note: Can only be called once. Subsequent calls return None.
    pub fn events(&mut self) -> Option<VerifierEventsChannel> {
        self.events_rx.take()
    }

    /// Subscribe to verifier events.
    #[must_use]
    pub fn subscribe_events(&self) -> VerifierEventsChannel {
        self.events_tx.subscribe()
    }

    /// Resolution statistics for this verifier.
    #[must_use]
    pub fn stats(&self) -> ResolverStats {
        self.resolver.stats()
    }

    /// Root directory for locally cached documents.
    #[must_use]
    pub fn root_dir(&self) -> &Path {
        &self.config.root_dir
    }

    /// Announce shutdown.
    pub fn shutdown(&self) {
        let _ = self.events_tx.send(VerifierEvent::ShuttingDown);
        info!("Verifier shutdown");
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use crate::record::PayloadRef;
    use crate::store::RemoteConfig;
    use chrono::{DateTime, Duration, TimeZone, Utc};

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
            expires_at: start_time(),
        }
    }

    fn offline_verifier(
        root: &Path,
    ) -> (Verifier<HttpRemoteStore>, Arc<ManualClock>) {
        let clock = Arc::new(ManualClock::new(start_time()));
        let config = VerifierConfig {
            root_dir: root.to_path_buf(),
            remote: RemoteConfig {
                enabled: false,
                ..Default::default()
            },
            ..Default::default()
        };
        let verifier = VerifierBuilder::new(config)
            .with_clock(clock.clone())
            .build()
            .unwrap();
        (verifier, clock)
    }

    #[tokio::test]
    async fn test_store_then_verify() {
        let dir = tempfile::tempdir().unwrap();
        let (verifier, _clock) = offline_verifier(dir.path());
        verifier.start().unwrap();

        verifier.store_document(record("abc123")).unwrap();
        let state = verifier.verify(&VerifyRequest::new("abc123", None)).await;
        assert!(matches!(state, VerificationState::Verified(_)));
        assert_eq!(verifier.stats().local_hits, 1);
    }

    #[tokio::test]
    async fn test_startup_sweep_reports_removals() {
        let dir = tempfile::tempdir().unwrap();
        let (verifier, clock) = offline_verifier(dir.path());

        verifier.store_document(record("stale")).unwrap();
        clock.advance(Duration::days(31));

        let mut rx = verifier.subscribe_events();
        verifier.start().unwrap();

        match rx.try_recv().unwrap() {
            VerifierEvent::CacheSwept { removed } => assert_eq!(removed, 1),
            other => assert!(false, "expected CacheSwept, got {other:?}"),
        }
        assert!(matches!(rx.try_recv().unwrap(), VerifierEvent::Started));
    }

    #[tokio::test]
    async fn test_events_trace_an_attempt() {
        let dir = tempfile::tempdir().unwrap();
        let (verifier, _clock) = offline_verifier(dir.path());

        let mut rx = verifier.subscribe_events();
        verifier.store_document(record("abc123")).unwrap();
        let _ = verifier.verify(&VerifyRequest::new("abc123", None)).await;

        assert!(matches!(
            rx.try_recv().unwrap(),
            VerifierEvent::DocumentStored { .. }
        ));
        assert!(matches!(
            rx.try_recv().unwrap(),
            VerifierEvent::VerificationStarted { .. }
        ));
        assert!(matches!(
            rx.try_recv().unwrap(),
            VerifierEvent::DocumentVerified { .. }
        ));
    }

    #[tokio::test]
    async fn test_rejection_event_carries_reason() {
        let dir = tempfile::tempdir().unwrap();
        let (verifier, _clock) = offline_verifier(dir.path());

        let mut rx = verifier.subscribe_events();
        let state = verifier.verify(&VerifyRequest::empty()).await;
        assert!(matches!(state, VerificationState::NotAvailable(_)));

        match rx.try_recv().unwrap() {
            VerifierEvent::DocumentRejected { hash, reason } => {
                assert_eq!(hash, None);
                assert_eq!(reason, "no document hash provided");
            }
            other => assert!(false, "expected DocumentRejected, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_initial_event_receiver_taken_once() {
        let dir = tempfile::tempdir().unwrap();
        let (mut verifier, _clock) = offline_verifier(dir.path());
        assert!(verifier.events().is_some());
        assert!(verifier.events().is_none());
    }
}
