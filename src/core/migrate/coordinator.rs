//! Migration coordinator - drives the checkpointed batch loop
//!
//! One run: load the checkpoint, wait out the startup delay, then repeat
//! read → transform → write → save until the source is exhausted. The
//! checkpoint only advances after the batch is committed, so a crash at any
//! point resumes at the first uncommitted page.

use crate::adapters::database::MigrationClients;
use crate::config::LedgerliftConfig;
use crate::core::migrate::reader::BatchReader;
use crate::core::migrate::summary::{MigrationPhase, MigrationSummary};
use crate::core::migrate::writer::BatchWriter;
use crate::core::state::{Checkpoint, ProgressStore};
use crate::core::transform::transform_batch;
use crate::domain::{LiftError, Result};
use crate::log_batch_committed;
use std::time::{Duration, Instant};
use tokio::sync::watch;

/// Migration coordinator
pub struct MigrationCoordinator {
    config: LedgerliftConfig,
    clients: MigrationClients,
    store: ProgressStore,
    shutdown: watch::Receiver<bool>,
    phase: MigrationPhase,
}

impl MigrationCoordinator {
    /// Create a coordinator owning `clients` for the duration of the run
    pub fn new(
        config: LedgerliftConfig,
        clients: MigrationClients,
        shutdown: watch::Receiver<bool>,
    ) -> Self {
        let store = ProgressStore::new(config.migration.checkpoint_path.clone());
        Self {
            config,
            clients,
            store,
            shutdown,
            phase: MigrationPhase::Init,
        }
    }

    /// Run the migration to completion, interruption or failure
    ///
    /// Source and sink are released before this returns, on every path.
    ///
    /// # Errors
    ///
    /// Returns the first unrecovered error. Anything committed before it is
    /// covered by the last saved checkpoint, except when the error is
    /// `LiftError::CheckpointSave`.
    pub async fn execute(mut self) -> Result<MigrationSummary> {
        let start_time = Instant::now();
        let mut summary =
            MigrationSummary::new(Checkpoint::default(), self.config.application.dry_run);

        tracing::info!(
            page_size = self.config.migration.page_size,
            dry_run = self.config.application.dry_run,
            idempotent_writes = self.config.sink.idempotent_writes,
            "Starting migration"
        );

        let outcome = self.run(&mut summary).await;
        self.clients.release();

        match outcome {
            Ok(()) => {
                let final_phase = if summary.interrupted {
                    MigrationPhase::Interrupted
                } else {
                    MigrationPhase::Done
                };
                self.transition(final_phase);
                summary.final_phase = final_phase;

                let summary = summary.with_duration(start_time.elapsed());
                summary.log_summary();
                Ok(summary)
            }
            Err(e) => {
                self.transition(MigrationPhase::Aborted);
                tracing::error!(
                    error = %e,
                    offset = summary.final_checkpoint.offset,
                    total_migrated = summary.total_migrated,
                    "Migration aborted"
                );
                Err(e)
            }
        }
    }

    async fn run(&mut self, summary: &mut MigrationSummary) -> Result<()> {
        let page_size = self.config.migration.page_size;
        let dry_run = self.config.application.dry_run;

        self.transition(MigrationPhase::LoadingCheckpoint);
        let mut checkpoint = self.store.load().await;

        if !checkpoint.is_aligned(page_size) {
            return Err(LiftError::Validation(format!(
                "Checkpoint offset {} is not a multiple of page_size {}; \
                 restore the page size used by the previous run or reset the checkpoint",
                checkpoint.offset, page_size
            )));
        }
        *summary = MigrationSummary::new(checkpoint, dry_run);

        if checkpoint.is_initial() {
            tracing::info!("No previous progress - full migration");
        } else {
            tracing::info!(
                offset = checkpoint.offset,
                total_migrated = checkpoint.total_migrated,
                "Resuming migration from checkpoint"
            );
        }

        if self.startup_delay().await {
            summary.interrupted = true;
            return Ok(());
        }

        let reader = match checkpoint.window_start {
            Some(window) => BatchReader::with_window(
                self.clients.source().clone(),
                page_size,
                window,
                self.config.migration.retry.clone(),
            ),
            None => {
                if !checkpoint.is_initial() {
                    tracing::warn!(
                        offset = checkpoint.offset,
                        "Checkpoint has no window start; offsets are applied to today's window"
                    );
                }
                BatchReader::new(
                    self.clients.source().clone(),
                    page_size,
                    self.config.source.lookback_days,
                    self.config.migration.retry.clone(),
                )
            }
        };
        // Offsets saved from here on refer to this window
        checkpoint = checkpoint.with_window_start(reader.window_start());
        let writer = BatchWriter::new(
            self.clients.sink().clone(),
            self.config.sink.idempotent_writes,
            dry_run,
        );

        tracing::info!(window_start = %reader.window_start(), "Reading ledger rows");

        loop {
            if *self.shutdown.borrow() {
                tracing::warn!(
                    offset = checkpoint.offset,
                    "Shutdown requested - stopping before the next batch"
                );
                summary.interrupted = true;
                return Ok(());
            }

            self.transition(MigrationPhase::Reading);
            let batch = reader.read(&checkpoint).await?;

            if batch.is_empty() {
                if checkpoint.offset == 0 {
                    tracing::info!("Nothing to migrate");
                } else {
                    tracing::info!(offset = checkpoint.offset, "Source exhausted");
                }
                return Ok(());
            }

            self.transition(MigrationPhase::Transforming);
            let documents = transform_batch(&batch)?;

            self.transition(MigrationPhase::Writing);
            let result = writer.commit(documents).await?;

            self.transition(MigrationPhase::SavingCheckpoint);
            let next = checkpoint.advance(page_size, batch.len());
            if dry_run {
                tracing::debug!(offset = next.offset, "DRY RUN: checkpoint not saved");
            } else if let Err(e) = self.store.save(&next).await {
                tracing::error!(
                    committed_offset = batch.offset,
                    batch_size = batch.len(),
                    persisted_offset = checkpoint.offset,
                    checkpoint = %self.store.path().display(),
                    error = %e,
                    "Batch was written but the checkpoint was not saved. \
                     A rerun will write rows from offset {} again; reconcile the sink \
                     or set the checkpoint to offset {} before restarting",
                    batch.offset,
                    next.offset
                );
                return Err(e);
            }

            checkpoint = next;
            summary.record_batch(batch.len(), result.duplicates_skipped, checkpoint);
            log_batch_committed!(batch.len(), checkpoint.offset, checkpoint.total_migrated);

            if batch.is_last(page_size) {
                return Ok(());
            }
        }
    }

    /// Sleep before the first read
    ///
    /// Returns `true` if a shutdown signal cut the delay short.
    async fn startup_delay(&mut self) -> bool {
        let secs = self.config.migration.startup_delay_secs;
        if secs == 0 {
            return false;
        }

        tracing::info!(delay_secs = secs, "Waiting before the first read");

        let shutdown = &mut self.shutdown;
        tokio::select! {
            _ = tokio::time::sleep(Duration::from_secs(secs)) => false,
            _ = wait_for_shutdown(shutdown) => {
                tracing::warn!("Shutdown requested during startup delay");
                true
            }
        }
    }

    fn transition(&mut self, next: MigrationPhase) {
        tracing::debug!(from = %self.phase, to = %next, "Phase transition");
        self.phase = next;
    }
}

async fn wait_for_shutdown(shutdown: &mut watch::Receiver<bool>) {
    if shutdown.wait_for(|requested| *requested).await.is_err() {
        // Sender gone: no signal can arrive any more.
        std::future::pending::<()>().await;
    }
}
