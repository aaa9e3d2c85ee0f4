//! Batch writer
//!
//! Hands a transformed batch to the sink as a single all-or-nothing
//! commit. Sink errors are not retried here; a failed commit aborts the run
//! before the checkpoint moves.

use crate::adapters::database::traits::{CommitResult, DocumentSink, PendingDocument};
use crate::domain::{LedgerDocument, Result};
use std::sync::Arc;

/// Commits transformed batches to the document sink
pub struct BatchWriter {
    sink: Arc<dyn DocumentSink>,
    idempotent: bool,
    dry_run: bool,
}

impl BatchWriter {
    /// Create a writer
    ///
    /// With `idempotent` set, every document carries its content hash as a
    /// dedup key. With `dry_run` set, nothing reaches the sink.
    pub fn new(sink: Arc<dyn DocumentSink>, idempotent: bool, dry_run: bool) -> Self {
        Self {
            sink,
            idempotent,
            dry_run,
        }
    }

    /// Commit `documents` as one unit
    ///
    /// An empty batch is a no-op. In dry-run mode the commit is reported as
    /// fully written without touching the sink.
    ///
    /// # Errors
    ///
    /// Propagates the sink error; nothing from the batch is persisted.
    pub async fn commit(&self, documents: Vec<LedgerDocument>) -> Result<CommitResult> {
        if documents.is_empty() {
            return Ok(CommitResult::empty());
        }

        if self.dry_run {
            tracing::info!(
                count = documents.len(),
                "DRY RUN: Would write {} documents",
                documents.len()
            );
            return Ok(CommitResult {
                written: documents.len(),
                ..CommitResult::empty()
            });
        }

        let pending: Vec<PendingDocument> = if self.idempotent {
            documents.into_iter().map(PendingDocument::keyed).collect()
        } else {
            documents.into_iter().map(PendingDocument::plain).collect()
        };
        let count = pending.len();

        let result = self.sink.commit_batch(pending).await.map_err(|e| {
            tracing::error!(count, error = %e, "Batch commit failed, nothing was written");
            e
        })?;

        if result.duplicates_skipped > 0 {
            tracing::info!(
                duplicates_skipped = result.duplicates_skipped,
                "Skipped documents already present in the sink"
            );
        }

        Ok(result)
    }
}
