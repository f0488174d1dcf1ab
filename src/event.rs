//! Verifier event system.

use tokio::sync::broadcast;

/// Events emitted by the verifier.
#[derive(Debug, Clone)]
pub enum VerifierEvent {
    /// Verifier has started and the startup sweep has run.
    Started,

    /// Expired documents were swept from the local cache.
    CacheSwept {
        /// Number of index entries dropped.
        removed: usize,
    },

    /// A verification attempt has begun.
    VerificationStarted {
        /// Document hash under verification.
        hash: String,
    },

    /// A document resolved to a live record.
    DocumentVerified {
        /// Document hash.
        hash: String,
    },

    /// A document failed verification.
    DocumentRejected {
        /// Document hash, when one was supplied.
        hash: Option<String>,
        /// User-facing reason.
        reason: String,
    },

    /// A freshly produced document was written to the local cache.
    DocumentStored {
        /// Document hash.
        hash: String,
    },

    /// Verifier is shutting down.
    ShuttingDown,
}

/// Channel for receiving verifier events.
pub type VerifierEventsChannel = broadcast::Receiver<VerifierEvent>;

/// Sender for verifier events.
pub type VerifierEventsSender = broadcast::Sender<VerifierEvent>;

/// Create a new event channel pair.
#[must_use]
pub fn create_event_channel() -> (VerifierEventsSender, VerifierEventsChannel) {
    broadcast::channel(256)
}
