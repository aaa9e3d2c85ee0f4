//! Domain identifier types
//!
//! Newtype wrappers for the identifiers attached to destination documents.

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Identifier of a document in the sink
///
/// Generated by the sink at write time; callers never supply one.
///
/// # Examples
///
/// ```
/// use ledgerlift::domain::ids::DocumentId;
///
/// let a = DocumentId::generate();
/// let b = DocumentId::generate();
/// assert_ne!(a, b);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DocumentId(Uuid);

impl DocumentId {
    /// Generates a fresh random identifier
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }

    /// Returns the inner UUID
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl fmt::Display for DocumentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Content-derived deduplication key
///
/// Hex-encoded SHA-256 over the business fields of a document. Two documents
/// built from identical source rows share a key regardless of when they were
/// transformed.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DedupKey(String);

impl DedupKey {
    /// Hex-encodes a raw SHA-256 digest
    pub fn from_digest(digest: &[u8]) -> Self {
        Self(digest.iter().map(|b| format!("{b:02x}")).collect())
    }

    /// Returns the key as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DedupKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for DedupKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_id_display_matches_uuid() {
        let id = DocumentId::generate();
        assert_eq!(id.to_string(), id.as_uuid().to_string());
    }

    #[test]
    fn test_dedup_key_from_digest() {
        let key = DedupKey::from_digest(&[0xab; 32]);
        assert_eq!(key.as_str().len(), 64);
        assert!(key.as_str().starts_with("abab"));
    }
}
