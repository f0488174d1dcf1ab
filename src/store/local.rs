//! Bounded, TTL-expiring local document cache.
//!
//! The cache is the only store guaranteed to hold a document immediately
//! after it is produced, before any remote write confirms. It stamps a
//! fresh expiry on every write, bounds itself by pure FIFO eviction over
//! an insertion-ordered index, and lazily deletes expired records on read.

use crate::clock::Clock;
use crate::error::{Error, Result};
use crate::record::{DocumentRecord, LookupResult};
use crate::store::disk::DiskStore;
use chrono::Duration;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, warn};

/// Default maximum number of documents kept before eviction.
pub const DEFAULT_MAX_DOCUMENTS: usize = 50;

/// Default document time-to-live in days.
pub const DEFAULT_TTL_DAYS: i64 = 30;

/// Key namespace for document entries.
const DOC_PREFIX: &str = "doc/";

/// Key holding the insertion-ordered document index.
const INDEX_KEY: &str = "index";

/// Configuration for the local cache.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheConfig {
    /// Maximum number of documents kept before FIFO eviction.
    #[serde(default = "default_max_documents")]
    pub max_documents: usize,

    /// Document time-to-live in days.
    #[serde(default = "default_ttl_days")]
    pub ttl_days: i64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            max_documents: default_max_documents(),
            ttl_days: default_ttl_days(),
        }
    }
}

const fn default_max_documents() -> usize {
    DEFAULT_MAX_DOCUMENTS
}

const fn default_ttl_days() -> i64 {
    DEFAULT_TTL_DAYS
}

/// Bounded, TTL-expiring store of verification documents.
///
/// The cache exclusively owns its physical entries and the index; no other
/// component mutates them. `get` has a documented mutation contract:
/// reading an expired record deletes the physical record, while its index
/// entry stays behind until [`LocalCache::sweep_expired`] prunes it.
pub struct LocalCache {
    store: DiskStore,
    config: CacheConfig,
    clock: Arc<dyn Clock>,
}

impl LocalCache {
    /// Open a cache rooted at `dir`.
    ///
    /// # Errors
    ///
    /// Returns an error if the cache directory cannot be prepared.
    pub fn open(dir: &Path, config: CacheConfig, clock: Arc<dyn Clock>) -> Result<Self> {
        let store = DiskStore::new(dir)?;
        Ok(Self {
            store,
            config,
            clock,
        })
    }

    fn doc_key(hash: &str) -> String {
        format!("{DOC_PREFIX}{hash}")
    }

    fn load_index(&self) -> Result<Vec<String>> {
        match self.store.get(INDEX_KEY)? {
            Some(raw) => serde_json::from_str(&raw)
                .map_err(|e| Error::Storage(format!("document index corrupted: {e}"))),
            None => Ok(Vec::new()),
        }
    }

    fn write_index(&self, index: &[String]) -> Result<()> {
        let raw = serde_json::to_string(index)
            .map_err(|e| Error::Storage(format!("document index not serializable: {e}")))?;
        self.store.set(INDEX_KEY, &raw)
    }

    /// Write a record, stamping a fresh expiry, then bound the cache.
    ///
    /// The expiry is computed here, exactly once, as write time plus the
    /// configured TTL; whatever the caller put in `expires_at` is
    /// overwritten. A new hash is appended to the index; an overwrite
    /// keeps its original position. Overflow beyond `max_documents` is
    /// evicted oldest-first, deleting physical records best-effort. The
    /// index is not touched when the record write fails.
    ///
    /// # Errors
    ///
    /// Returns an error if the record or the index cannot be written.
    pub fn put(&self, mut record: DocumentRecord) -> Result<()> {
        record.expires_at = self.clock.now() + Duration::days(self.config.ttl_days);

        let raw = serde_json::to_string(&record)?;
        self.store.set(&Self::doc_key(&record.hash), &raw)?;
        debug!("Stored document {}", record.hash);

        let mut index = self.load_index()?;
        if !index.iter().any(|h| h == &record.hash) {
            index.push(record.hash.clone());
        }

        if index.len() > self.config.max_documents {
            let overflow = index.len() - self.config.max_documents;
            for hash in index.drain(..overflow) {
                // Best-effort: a failed delete must not abort the eviction
                // of the remaining keys.
                if let Err(e) = self.store.delete(&Self::doc_key(&hash)) {
                    warn!("Failed to evict document {hash}: {e}");
                }
            }
            debug!("Evicted {overflow} oldest documents");
        }

        self.write_index(&index)
    }

    /// Look up a record by hash.
    ///
    /// Reading an expired record deletes it: the first post-expiry call
    /// returns [`LookupResult::Expired`] and subsequent calls return
    /// [`LookupResult::NotFound`]. Storage faults are converted to
    /// [`LookupResult::StoreError`] here and never propagate.
    pub fn get(&self, hash: &str) -> LookupResult {
        let key = Self::doc_key(hash);
        let raw = match self.store.get(&key) {
            Ok(Some(raw)) => raw,
            Ok(None) => return LookupResult::NotFound,
            Err(e) => {
                return LookupResult::StoreError(format!("Error accessing stored document: {e}"))
            }
        };

        let record: DocumentRecord = match serde_json::from_str(&raw) {
            Ok(record) => record,
            Err(e) => {
                return LookupResult::StoreError(format!("Stored document corrupted: {e}"))
            }
        };

        if record.is_expired_at(self.clock.now()) {
            if let Err(e) = self.store.delete(&key) {
                warn!("Failed to delete expired document {hash}: {e}");
            }
            debug!("Document {hash} has expired");
            return LookupResult::Expired;
        }

        LookupResult::Found(record)
    }

    /// Drop expired documents and rewrite the index to resolvable keys.
    ///
    /// Calls [`LocalCache::get`] on every indexed key, which deletes
    /// expired records as a side effect, then keeps only the keys that
    /// still resolve. Returns the number of index entries dropped.
    /// Idempotent; intended to run once at service start.
    ///
    /// # Errors
    ///
    /// Returns an error if the index cannot be read or rewritten.
    pub fn sweep_expired(&self) -> Result<usize> {
        let index = self.load_index()?;
        let before = index.len();

        let live: Vec<String> = index
            .into_iter()
            .filter(|hash| self.get(hash).is_found())
            .collect();

        let removed = before - live.len();
        if removed > 0 {
            debug!("Swept {removed} unresolvable documents from the index");
        }
        self.write_index(&live)?;
        Ok(removed)
    }

    /// Hashes currently tracked by the index, oldest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the index cannot be read.
    pub fn tracked_hashes(&self) -> Result<Vec<String>> {
        self.load_index()
    }
}
