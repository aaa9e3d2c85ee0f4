//! Database abstraction traits
//!
//! The migration talks to its two external systems only through these
//! traits. The PostgreSQL adapters implement them for production runs and
//! in-memory doubles implement them in tests.

use crate::domain::{DedupKey, DocumentId, LedgerDocument, Result, SourceRow};
use async_trait::async_trait;
use chrono::NaiveDate;

/// One page request against the relational source
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageQuery {
    /// Number of rows to skip in the deterministic ordering
    pub offset: u64,

    /// Maximum number of rows to return
    pub limit: usize,

    /// Only rows with `entry_date >= window_start` are selected
    pub window_start: NaiveDate,
}

/// A document ready to be inserted, with its optional dedup key
#[derive(Debug, Clone)]
pub struct PendingDocument {
    pub body: LedgerDocument,
    pub dedup_key: Option<DedupKey>,
}

impl PendingDocument {
    /// Document without a dedup key (at-least-once writes)
    pub fn plain(body: LedgerDocument) -> Self {
        Self {
            body,
            dedup_key: None,
        }
    }

    /// Document keyed by its content hash (idempotent writes)
    pub fn keyed(body: LedgerDocument) -> Self {
        let dedup_key = Some(body.dedup_key());
        Self { body, dedup_key }
    }
}

/// Outcome of an all-or-nothing batch commit
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommitResult {
    /// Documents inserted by this commit
    pub written: usize,

    /// Documents whose dedup key was already present
    pub duplicates_skipped: usize,

    /// Identifiers assigned to the inserted documents, in batch order
    pub document_ids: Vec<DocumentId>,
}

impl CommitResult {
    /// Result of committing nothing
    pub fn empty() -> Self {
        Self::default()
    }
}

/// Relational source of ledger rows
#[async_trait]
pub trait LedgerSource: Send + Sync {
    /// Fetch one page of active-account rows
    ///
    /// Rows come back in a stable order so that consecutive offsets never
    /// overlap or skip. At most `query.limit` rows are returned.
    ///
    /// # Errors
    ///
    /// Returns `LiftError::Source` or `LiftError::Connection` on failure.
    async fn fetch_page(&self, query: &PageQuery) -> Result<Vec<SourceRow>>;

    /// Test the connection
    async fn test_connection(&self) -> Result<()>;

    /// Release the underlying connections
    ///
    /// Must tolerate being called more than once.
    fn close(&self);
}

/// Document-oriented sink
#[async_trait]
pub trait DocumentSink: Send + Sync {
    /// Create the document collection if it does not exist
    async fn ensure_schema(&self) -> Result<()>;

    /// Insert every document or none of them
    ///
    /// Each inserted document gets a freshly generated `DocumentId`.
    /// Documents carrying a dedup key that is already stored are skipped
    /// and counted instead of inserted.
    ///
    /// # Errors
    ///
    /// Returns `LiftError::Sink` if the batch could not be committed. In
    /// that case nothing from the batch is visible in the sink.
    async fn commit_batch(&self, documents: Vec<PendingDocument>) -> Result<CommitResult>;

    /// Number of documents currently stored
    async fn count_documents(&self) -> Result<u64>;

    /// Test the connection
    async fn test_connection(&self) -> Result<()>;

    /// Release the underlying connections
    ///
    /// Must tolerate being called more than once.
    fn close(&self);
}
