//! Migrate command implementation
//!
//! Runs (or resumes) the checkpointed migration from the ledger source to
//! the document sink.

use crate::adapters::database::create_clients;
use crate::config::{load_config, LedgerliftConfig};
use crate::core::migrate::{MigrationCoordinator, MigrationSummary};
use crate::core::state::{Checkpoint, ProgressStore};
use clap::Args;
use std::path::Path;
use tokio::sync::watch;

/// Arguments for the migrate command
#[derive(Args, Debug, Default)]
pub struct MigrateArgs {
    /// Skip confirmation prompt
    #[arg(short, long)]
    pub yes: bool,

    /// Dry run mode - read and transform without writing documents or checkpoints
    #[arg(long)]
    pub dry_run: bool,

    /// Override rows per page
    #[arg(long)]
    pub page_size: Option<usize>,

    /// Override the pause before the first read, in seconds
    #[arg(long)]
    pub startup_delay_secs: Option<u64>,
}

impl MigrateArgs {
    /// Execute the migrate command
    pub async fn execute(
        &self,
        config_path: &str,
        shutdown_signal: watch::Receiver<bool>,
    ) -> anyhow::Result<i32> {
        tracing::info!("Starting migrate command");

        let mut config = match load_config(config_path) {
            Ok(c) => c,
            Err(e) => {
                tracing::error!(error = %e, "Failed to load configuration");
                eprintln!("❌ Failed to load configuration: {e}");
                return Ok(e.exit_code());
            }
        };

        self.apply_overrides(&mut config);

        if let Err(e) = config.validate() {
            tracing::error!(error = %e, "Configuration validation failed");
            eprintln!("Configuration validation failed: {e}");
            return Ok(2);
        }

        if config.application.dry_run {
            tracing::info!("Dry run mode enabled - no data will be written");
            println!("🔍 DRY RUN MODE - No documents or checkpoints will be written");
            println!();
        }

        if !self.yes && !config.application.dry_run && !confirm(&config).await? {
            println!("Migration cancelled.");
            return Ok(0);
        }

        let clients = match create_clients(&config).await {
            Ok(c) => c,
            Err(e) => {
                tracing::error!(error = %e, "Failed to initialize source and sink");
                eprintln!("❌ Failed to initialize migration: {e}");
                return Ok(e.exit_code());
            }
        };

        println!("🚀 Starting migration...");
        println!();

        let checkpoint_path = config.migration.checkpoint_path.clone();
        let coordinator = MigrationCoordinator::new(config, clients, shutdown_signal);
        let summary = match coordinator.execute().await {
            Ok(s) => s,
            Err(e) => {
                eprintln!("❌ Migration failed: {e}");
                let saved = ProgressStore::new(&checkpoint_path).load().await;
                for line in abort_report(&saved, &checkpoint_path) {
                    eprintln!("{line}");
                }
                return Ok(e.exit_code());
            }
        };

        print_summary(&summary);

        let exit_code = if summary.interrupted {
            println!("⚠️  Migration interrupted gracefully. Progress saved.");
            println!("   Run the same command to resume from the checkpoint.");
            println!();
            tracing::info!("Migration interrupted by user signal");
            130
        } else {
            println!("✅ Migration completed successfully!");
            0
        };

        Ok(exit_code)
    }

    /// Apply command-line overrides on top of the loaded configuration
    pub fn apply_overrides(&self, config: &mut LedgerliftConfig) {
        if self.dry_run {
            tracing::info!("Enabling dry-run mode from CLI");
            config.application.dry_run = true;
        }

        if let Some(page_size) = self.page_size {
            tracing::info!(page_size, "Overriding page size from CLI");
            config.migration.page_size = page_size;
        }

        if let Some(secs) = self.startup_delay_secs {
            tracing::info!(startup_delay_secs = secs, "Overriding startup delay from CLI");
            config.migration.startup_delay_secs = secs;
        }
    }
}

async fn confirm(config: &LedgerliftConfig) -> anyhow::Result<bool> {
    let checkpoint = ProgressStore::new(&config.migration.checkpoint_path)
        .load()
        .await;

    println!("Migration Configuration:");
    println!(
        "  Source: {} ({})",
        config.source.postgresql.connection_string_safe(),
        config.source.table
    );
    println!(
        "  Sink: {} ({})",
        config.sink.postgresql.connection_string_safe(),
        config.sink.collection
    );
    println!("  Page size: {}", config.migration.page_size);
    println!("  Lookback: {} days", config.source.lookback_days);
    println!("  Idempotent writes: {}", config.sink.idempotent_writes);
    println!(
        "  Resume from offset: {} ({} rows already migrated)",
        checkpoint.offset, checkpoint.total_migrated
    );
    println!();
    print!("Proceed with migration? [y/N]: ");

    use std::io::{self, Write};
    io::stdout().flush()?;

    let mut input = String::new();
    io::stdin().read_line(&mut input)?;

    Ok(input.trim().eq_ignore_ascii_case("y"))
}

/// Lines describing where a failed run left off
fn abort_report(saved: &Checkpoint, path: &Path) -> Vec<String> {
    if saved.is_initial() {
        return vec!["   No progress saved. The next run starts from the beginning.".to_string()];
    }
    vec![
        format!(
            "   Last saved checkpoint: offset {} ({} rows migrated)",
            saved.offset, saved.total_migrated
        ),
        format!("   Checkpoint file: {}", path.display()),
        "   Run the same command to resume from this offset.".to_string(),
    ]
}

fn print_summary(summary: &MigrationSummary) {
    println!();
    println!("📊 Migration Summary:");
    println!("  Batches This Run: {}", summary.batches);
    println!("  Rows This Run: {}", summary.rows_this_run);
    println!("  Total Migrated: {}", summary.total_migrated);
    println!("  Next Offset: {}", summary.final_checkpoint.offset);
    if summary.duplicates_skipped > 0 {
        println!("  Duplicates Skipped: {}", summary.duplicates_skipped);
    }
    println!("  Duration: {:.2}s", summary.duration.as_secs_f64());
    if summary.dry_run {
        println!("  Mode: dry run");
    }
    println!();
}
