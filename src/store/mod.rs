//! Tiered document storage for veridoc.
//!
//! Two stores with different consistency and lifetime guarantees back a
//! single resolution operation:
//!
//! 1. The **remote store** is authoritative once reachable; its positive
//!    answers (found, expired) are final.
//! 2. The **local cache** is bounded and TTL-expiring, and is the only
//!    store guaranteed to hold a document immediately after production.
//!
//! The resolver decides precedence and fallback between them and reduces
//! every lookup to a [`crate::record::LookupResult`].

mod disk;
mod local;
mod remote;
mod resolver;

pub use disk::DiskStore;
pub use local::{CacheConfig, LocalCache, DEFAULT_MAX_DOCUMENTS, DEFAULT_TTL_DAYS};
pub use remote::{HttpRemoteStore, RemoteConfig, RemoteStore};
pub use resolver::{DocumentResolver, ResolverStats};
