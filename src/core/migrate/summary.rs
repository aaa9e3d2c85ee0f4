//! Migration phases and run summary

use crate::core::state::Checkpoint;
use std::fmt;
use std::time::Duration;

/// Where the coordinator is in the per-batch protocol
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MigrationPhase {
    Init,
    LoadingCheckpoint,
    Reading,
    Transforming,
    Writing,
    SavingCheckpoint,
    /// Source exhausted, every read batch committed
    Done,
    /// Stopped between batches on a shutdown signal
    Interrupted,
    /// Stopped on an unrecovered error
    Aborted,
}

impl fmt::Display for MigrationPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            MigrationPhase::Init => "init",
            MigrationPhase::LoadingCheckpoint => "loading_checkpoint",
            MigrationPhase::Reading => "reading",
            MigrationPhase::Transforming => "transforming",
            MigrationPhase::Writing => "writing",
            MigrationPhase::SavingCheckpoint => "saving_checkpoint",
            MigrationPhase::Done => "done",
            MigrationPhase::Interrupted => "interrupted",
            MigrationPhase::Aborted => "aborted",
        };
        f.write_str(name)
    }
}

/// Outcome of a migration run
#[derive(Debug, Clone)]
pub struct MigrationSummary {
    /// Batches committed during this run
    pub batches: usize,

    /// Rows committed during this run
    pub rows_this_run: u64,

    /// Rows committed across all runs, as recorded in the checkpoint
    pub total_migrated: u64,

    /// Checkpoint in effect when the run ended
    pub final_checkpoint: Checkpoint,

    /// Documents the sink skipped as already present
    pub duplicates_skipped: usize,

    /// Wall-clock duration of the run
    pub duration: Duration,

    /// The run stopped early on a shutdown signal
    pub interrupted: bool,

    /// Writes and checkpoint saves were skipped
    pub dry_run: bool,

    /// Phase the run ended in
    pub final_phase: MigrationPhase,
}

impl MigrationSummary {
    /// Create an empty summary starting from `checkpoint`
    pub fn new(checkpoint: Checkpoint, dry_run: bool) -> Self {
        Self {
            batches: 0,
            rows_this_run: 0,
            total_migrated: checkpoint.total_migrated,
            final_checkpoint: checkpoint,
            duplicates_skipped: 0,
            duration: Duration::ZERO,
            interrupted: false,
            dry_run,
            final_phase: MigrationPhase::Init,
        }
    }

    /// Record a committed batch and the checkpoint it advanced to
    pub fn record_batch(&mut self, rows: usize, duplicates_skipped: usize, checkpoint: Checkpoint) {
        self.batches += 1;
        self.rows_this_run += rows as u64;
        self.duplicates_skipped += duplicates_skipped;
        self.total_migrated = checkpoint.total_migrated;
        self.final_checkpoint = checkpoint;
    }

    /// Set the duration
    pub fn with_duration(mut self, duration: Duration) -> Self {
        self.duration = duration;
        self
    }

    /// Whether the run finished the whole source
    pub fn is_complete(&self) -> bool {
        self.final_phase == MigrationPhase::Done
    }

    /// Log the summary
    pub fn log_summary(&self) {
        tracing::info!(
            batches = self.batches,
            rows_this_run = self.rows_this_run,
            total_migrated = self.total_migrated,
            offset = self.final_checkpoint.offset,
            duplicates_skipped = self.duplicates_skipped,
            duration_secs = self.duration.as_secs(),
            dry_run = self.dry_run,
            final_phase = %self.final_phase,
            "Migration finished"
        );

        if self.interrupted {
            tracing::warn!(
                offset = self.final_checkpoint.offset,
                "Migration interrupted - rerun to resume from the saved checkpoint"
            );
        }
    }
}
