//! Document record model and lookup outcomes.
//!
//! A [`DocumentRecord`] is the canonical entity shared by both stores. It
//! is immutable once written; the only field stamped by this system is
//! `expires_at`, set exactly once when a record enters a store.

use bytes::Bytes;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// Reference to the rendered document carried by a record.
///
/// The resolution layer never interprets the payload; it is either an
/// embedded blob or a location the consumer can fetch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PayloadRef {
    /// Embedded document bytes.
    Inline {
        /// MIME type of the embedded data.
        media_type: String,
        /// Raw document bytes (hex-encoded in JSON).
        #[serde(with = "hex_bytes")]
        data: Bytes,
    },
    /// Location the document can be fetched from.
    Url(String),
}

/// The canonical verification document entity.
///
/// `expires_at` is stamped once when the record is written into a store
/// and never recomputed. A record whose expiry has passed is logically
/// absent regardless of its physical presence in storage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentRecord {
    /// Content-derived identifier; primary key in both stores.
    pub hash: String,

    /// External ledger reference, when known.
    #[serde(default)]
    pub transaction_id: Option<String>,

    /// Creation time of the original document.
    pub timestamp: DateTime<Utc>,

    /// Attestation identity (signing wallet or account).
    pub issuer: String,

    /// Opaque reference to the rendered document.
    pub payload: PayloadRef,

    /// Free-form descriptive fields, passed through unmodified.
    #[serde(default)]
    pub metadata: serde_json::Map<String, serde_json::Value>,

    /// Absolute expiry, stamped at write time.
    pub expires_at: DateTime<Utc>,
}

impl DocumentRecord {
    /// True when the record's expiry has passed at `now`.
    #[must_use]
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }
}

/// Result of a single store lookup.
///
/// Every negative condition a store can produce is folded into one of
/// these variants at the store's own boundary; faults never escape as
/// errors on the lookup path.
#[derive(Debug, Clone, PartialEq)]
pub enum LookupResult {
    /// A live record was found.
    Found(DocumentRecord),
    /// No record exists for the hash.
    NotFound,
    /// A record existed but its time-to-live has elapsed.
    Expired,
    /// The store itself failed (transport, quota, serialization).
    StoreError(String),
}

impl LookupResult {
    /// True when a live record was found.
    #[must_use]
    pub fn is_found(&self) -> bool {
        matches!(self, Self::Found(_))
    }
}

mod hex_bytes {
    use bytes::Bytes;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(data: &Bytes, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&hex::encode(data))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Bytes, D::Error> {
        let raw = String::deserialize(deserializer)?;
        hex::decode(raw)
            .map(Bytes::from)
            .map_err(serde::de::Error::custom)
    }
}

/// Compute the canonical content hash of a document payload.
///
/// SHA-256 over the raw bytes, rendered as lowercase hex. The producing
/// application embeds this hash in the verification link it hands out.
#[must_use]
pub fn content_hash(payload: &[u8]) -> String {
    hex::encode(Sha256::digest(payload))
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn sample_record() -> DocumentRecord {
        let issued = Utc.with_ymd_and_hms(2026, 1, 10, 9, 30, 0).unwrap();
        DocumentRecord {
            hash: content_hash(b"q1 financial report"),
            transaction_id: Some("5KtP3mQ9".to_string()),
            timestamp: issued,
            issuer: "7xKXtg2CW87d97TXJSDpbD5jBkheTqA83TZRuJosgAsU".to_string(),
            payload: PayloadRef::Inline {
                media_type: "application/pdf".to_string(),
                data: Bytes::from_static(b"%PDF-1.4"),
            },
            metadata: serde_json::Map::new(),
            expires_at: issued + Duration::days(30),
        }
    }

    #[test]
    fn test_content_hash_is_stable_hex() {
        let hash = content_hash(b"");
        assert_eq!(
            hash,
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
        assert_ne!(content_hash(b"a"), content_hash(b"b"));
    }

    #[test]
    fn test_record_json_round_trip() {
        let record = sample_record();
        let json = serde_json::to_string(&record).unwrap();
        let back: DocumentRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(back, record);
    }

    #[test]
    fn test_expiry_timestamp_is_iso_8601() {
        let record = sample_record();
        let json = serde_json::to_value(&record).unwrap();
        let expires = json["expires_at"].as_str().unwrap();
        assert_eq!(expires, "2026-02-09T09:30:00Z");
    }

    #[test]
    fn test_inline_payload_is_hex_in_json() {
        let record = sample_record();
        let json = serde_json::to_value(&record).unwrap();
        let data = json["payload"]["inline"]["data"].as_str().unwrap();
        assert_eq!(data, hex::encode(b"%PDF-1.4"));
    }

    #[test]
    fn test_expiry_boundary_is_inclusive() {
        let record = sample_record();
        assert!(!record.is_expired_at(record.expires_at - Duration::seconds(1)));
        assert!(record.is_expired_at(record.expires_at));
        assert!(record.is_expired_at(record.expires_at + Duration::seconds(1)));
    }

    #[test]
    fn test_missing_optional_fields_default() {
        let json = r#"{
            "hash": "abc123",
            "timestamp": "2026-01-10T09:30:00Z",
            "issuer": "treasury",
            "payload": { "url": "https://docs.example/abc123.pdf" },
            "expires_at": "2026-02-09T09:30:00Z"
        }"#;
        let record: DocumentRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.transaction_id, None);
        assert!(record.metadata.is_empty());
    }
}
