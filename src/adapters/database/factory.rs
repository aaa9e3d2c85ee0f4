//! Client factory and lifetime guard
//!
//! [`create_clients`] builds the configured source and sink and hands them
//! out wrapped in [`MigrationClients`], which releases both exactly once no
//! matter how the run ends.

use crate::adapters::database::traits::{DocumentSink, LedgerSource};
use crate::adapters::postgresql::{PostgresDocumentSink, PostgresLedgerSource};
use crate::config::LedgerliftConfig;
use crate::domain::{LiftError, Result};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Source and sink handles for one migration run
///
/// Call [`release`](Self::release) on every exit path. Dropping the guard
/// releases as well, so an early return or an unwinding panic cannot leak
/// either pool. Release builds set `panic = "abort"`, where a panic ends the
/// process without running `Drop` and the server side reclaims the sessions.
pub struct MigrationClients {
    source: Arc<dyn LedgerSource>,
    sink: Arc<dyn DocumentSink>,
    released: AtomicBool,
}

impl MigrationClients {
    /// Wrap an already constructed source and sink
    pub fn new(source: Arc<dyn LedgerSource>, sink: Arc<dyn DocumentSink>) -> Self {
        Self {
            source,
            sink,
            released: AtomicBool::new(false),
        }
    }

    /// Relational source
    pub fn source(&self) -> &Arc<dyn LedgerSource> {
        &self.source
    }

    /// Document sink
    pub fn sink(&self) -> &Arc<dyn DocumentSink> {
        &self.sink
    }

    /// Close source and sink
    ///
    /// Only the first call has an effect.
    pub fn release(&self) {
        if self.released.swap(true, Ordering::SeqCst) {
            return;
        }

        self.source.close();
        self.sink.close();
        tracing::debug!("Source and sink released");
    }

    /// Whether [`release`](Self::release) has run
    pub fn is_released(&self) -> bool {
        self.released.load(Ordering::SeqCst)
    }
}

impl Drop for MigrationClients {
    fn drop(&mut self) {
        self.release();
    }
}

/// Create the PostgreSQL source and sink and verify both are reachable
///
/// The sink collection is created if missing, except in dry-run mode where
/// the sink is never modified.
///
/// # Errors
///
/// Returns `LiftError::Connection` if either side cannot be reached or the
/// sink collection cannot be prepared. Anything already opened is released
/// before returning.
pub async fn create_clients(config: &LedgerliftConfig) -> Result<MigrationClients> {
    tracing::info!(
        source = %config.source.postgresql.connection_string_safe(),
        sink = %config.sink.postgresql.connection_string_safe(),
        "Creating PostgreSQL source and sink"
    );

    let source: Arc<dyn LedgerSource> = Arc::new(PostgresLedgerSource::new(&config.source)?);
    let sink: Arc<dyn DocumentSink> = match PostgresDocumentSink::new(&config.sink) {
        Ok(sink) => Arc::new(sink),
        Err(e) => {
            source.close();
            return Err(e);
        }
    };
    let clients = MigrationClients::new(source, sink);

    clients.source().test_connection().await?;
    clients.sink().test_connection().await?;

    if config.application.dry_run {
        tracing::info!("Dry run - skipping sink schema preparation");
    } else {
        clients
            .sink()
            .ensure_schema()
            .await
            .map_err(|e| LiftError::Connection(format!("Sink initialisation failed: {e}")))?;
    }

    Ok(clients)
}
