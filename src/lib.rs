//! veridoc - document resolution and verification for issued financial
//! documents.
//!
//! A recipient of a document-hash reference uses this crate to confirm
//! that the document is authentic, unmodified, and not expired, and to
//! obtain its payload. The crate answers one question - "does this hash
//! correspond to a valid, non-expired document?" - by consulting two
//! stores with different consistency and lifetime guarantees and
//! classifying every outcome into a small set of user-facing states.
//!
//! # Architecture
//!
//! ```text
//! VerifyRequest (hash, tx)
//!        │
//!        ▼
//! ┌──────────────────────────┐
//! │ VerificationOrchestrator │  Loading → Verified / Tampered / NotAvailable
//! └────────────┬─────────────┘
//!              ▼
//! ┌──────────────────────────┐
//! │     DocumentResolver     │  precedence + fallback
//! └──────┬────────────┬──────┘
//!        ▼            ▼
//! ┌────────────┐ ┌────────────┐
//! │ RemoteStore│ │ LocalCache │  TTL expiry, FIFO bound
//! │ (HTTP, SoR)│ │ (on disk)  │
//! └────────────┘ └────────────┘
//! ```
//!
//! The remote store is the system of record once reachable; the local
//! cache is the only store guaranteed to hold a document immediately
//! after production, so a remote miss is given a local second opinion.
//!
//! # Example
//!
//! ```rust,ignore
//! use veridoc::{VerifierBuilder, VerifierConfig, VerifyRequest};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let verifier = VerifierBuilder::new(VerifierConfig::default()).build()?;
//!     verifier.start()?;
//!
//!     let request = VerifyRequest::from_link(
//!         "https://verify.example/?hash=abc123&tx=5KtP3mQ9",
//!     )?;
//!     let state = verifier.verify(&request).await;
//!     println!("{state:?}");
//!     Ok(())
//! }
//! ```

pub mod clock;
pub mod config;
pub mod error;
pub mod event;
pub mod record;
pub mod request;
pub mod service;
pub mod store;
pub mod verify;

pub use config::VerifierConfig;
pub use error::{Error, Result};
pub use record::{content_hash, DocumentRecord, LookupResult, PayloadRef};
pub use request::VerifyRequest;
pub use service::{Verifier, VerifierBuilder};
pub use verify::{VerificationOrchestrator, VerificationState};
