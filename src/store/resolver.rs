//! Tiered resolution across the remote and local stores.
//!
//! # Architecture
//!
//! ```text
//! resolve(hash)
//!       │
//!       ▼
//! ┌──────────────────┐
//! │ remote available?│──no──────────────┐
//! └────────┬─────────┘                  │
//!          │ yes                        │
//!          ▼                            ▼
//! ┌──────────────────┐          ┌──────────────┐
//! │ query remote     │          │ local cache  │
//! └────────┬─────────┘          │  (verbatim)  │
//!          │                    └──────────────┘
//!   ┌──────┼────────────┐              ▲
//!   │      │            │              │
//! Found  Expired    StoreError─────────┘
//!   │      │
//!   ▼      ▼        NotFound
//! return return        │
//! (authoritative)      ▼
//!              ┌──────────────────┐
//!              │ local 2nd opinion│
//!              └────────┬─────────┘
//!                Found/Expired → local result
//!                otherwise     → NotFound
//! ```

use crate::record::LookupResult;
use crate::store::local::LocalCache;
use crate::store::remote::RemoteStore;
use parking_lot::RwLock;
use tracing::{debug, warn};

/// Statistics about resolution attempts.
#[derive(Debug, Default, Clone)]
pub struct ResolverStats {
    /// Lookups answered authoritatively by the remote store.
    pub remote_hits: u64,
    /// Lookups answered by the local cache with the remote unreachable.
    pub local_hits: u64,
    /// Remote not-found answers overridden by a local copy.
    pub local_rescues: u64,
    /// Lookups not found in either store.
    pub misses: u64,
    /// Lookups that ended in a store fault.
    pub faults: u64,
}

/// Composes the remote store and local cache into a single lookup with
/// defined precedence and fallback.
///
/// The remote store is the system of record once reachable: its `Found`
/// and `Expired` answers are final and never second-guessed by a possibly
/// stale local copy. Its `NotFound` is not final - a document produced
/// while offline may exist only locally - so the cache gets a second
/// opinion before a miss is surfaced.
pub struct DocumentResolver<R> {
    remote: R,
    cache: LocalCache,
    stats: RwLock<ResolverStats>,
}

impl<R: RemoteStore> DocumentResolver<R> {
    /// Create a resolver over the given stores.
    #[must_use]
    pub fn new(remote: R, cache: LocalCache) -> Self {
        Self {
            remote,
            cache,
            stats: RwLock::new(ResolverStats::default()),
        }
    }

    /// Resolve a document hash against both stores.
    ///
    /// Runs to completion once invoked; there is no cancellation and no
    /// retry. The only suspension point is the remote query.
    pub async fn resolve(&self, hash: &str) -> LookupResult {
        if !self.remote.is_available() {
            debug!("Remote store unavailable, resolving {hash} locally");
            let result = self.cache.get(hash);
            self.note_local(&result);
            return result;
        }

        match self.remote.get(hash).await {
            result @ (LookupResult::Found(_) | LookupResult::Expired) => {
                self.stats.write().remote_hits += 1;
                result
            }
            LookupResult::StoreError(detail) => {
                warn!("Remote lookup for {hash} failed ({detail}), falling back to local cache");
                let result = self.cache.get(hash);
                self.note_local(&result);
                result
            }
            LookupResult::NotFound => {
                debug!("Document {hash} not on remote service, consulting local cache");
                match self.cache.get(hash) {
                    result @ (LookupResult::Found(_) | LookupResult::Expired) => {
                        self.stats.write().local_rescues += 1;
                        result
                    }
                    _ => {
                        self.stats.write().misses += 1;
                        LookupResult::NotFound
                    }
                }
            }
        }
    }

    /// The local cache this resolver reads and the producer writes.
    #[must_use]
    pub fn cache(&self) -> &LocalCache {
        &self.cache
    }

    /// Current resolution statistics.
    #[must_use]
    pub fn stats(&self) -> ResolverStats {
        self.stats.read().clone()
    }

    fn note_local(&self, result: &LookupResult) {
        let mut stats = self.stats.write();
        match result {
            LookupResult::Found(_) | LookupResult::Expired => stats.local_hits += 1,
            LookupResult::NotFound => stats.misses += 1,
            LookupResult::StoreError(_) => stats.faults += 1,
        }
    }
}
