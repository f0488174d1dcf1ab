//! Verification request intake.

use crate::error::{Error, Result};
use reqwest::Url;

/// A single verification request: the document hash under test and an
/// optional ledger transaction reference.
///
/// Requests are created fresh per attempt and never persisted. A request
/// without a hash is still valid input; verification reports the missing
/// hash without touching any store.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VerifyRequest {
    hash: Option<String>,
    transaction_id: Option<String>,
}

impl VerifyRequest {
    /// Build a request from an explicit hash and optional transaction id.
    #[must_use]
    pub fn new(hash: impl Into<String>, transaction_id: Option<String>) -> Self {
        Self {
            hash: Some(hash.into()),
            transaction_id,
        }
    }

    /// Build a request carrying no hash.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Parse a request from a verification link.
    ///
    /// Reads the `hash` and `tx` query parameters; everything else in the
    /// link is ignored. A link without a `hash` parameter yields an empty
    /// request.
    ///
    /// # Errors
    ///
    /// Returns an error if the link is not a valid URL.
    pub fn from_link(link: &str) -> Result<Self> {
        let url = Url::parse(link)
            .map_err(|e| Error::InvalidRequest(format!("invalid verification link: {e}")))?;

        let mut request = Self::default();
        for (key, value) in url.query_pairs() {
            match key.as_ref() {
                "hash" => request.hash = Some(value.into_owned()),
                "tx" => request.transaction_id = Some(value.into_owned()),
                _ => {}
            }
        }
        Ok(request)
    }

    /// Document hash under verification.
    #[must_use]
    pub fn hash(&self) -> Option<&str> {
        self.hash.as_deref()
    }

    /// Transaction reference, passed through when the record lacks one.
    #[must_use]
    pub fn transaction_id(&self) -> Option<&str> {
        self.transaction_id.as_deref()
    }
}
