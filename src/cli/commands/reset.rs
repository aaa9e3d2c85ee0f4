//! Reset command implementation
//!
//! Deletes the checkpoint so the next `migrate` starts from offset 0.
//! Documents already in the sink are left alone.

use crate::config::load_config;
use crate::core::state::ProgressStore;
use clap::Args;

/// Arguments for the reset command
#[derive(Args, Debug, Default)]
pub struct ResetArgs {
    /// Skip confirmation prompt
    #[arg(short, long)]
    pub yes: bool,
}

impl ResetArgs {
    /// Execute the reset command
    pub async fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        let config = match load_config(config_path) {
            Ok(c) => c,
            Err(e) => {
                println!("❌ Failed to load configuration file");
                println!("   Error: {e}");
                return Ok(2);
            }
        };

        let store = ProgressStore::new(&config.migration.checkpoint_path);
        let checkpoint = store.load().await;

        if checkpoint.is_initial() && !store.path().exists() {
            println!("No checkpoint at {} - nothing to reset.", store.path().display());
            return Ok(0);
        }

        if !self.yes {
            println!(
                "Checkpoint {} records {} migrated rows (next offset {}).",
                store.path().display(),
                checkpoint.total_migrated,
                checkpoint.offset
            );
            println!("Resetting restarts the migration from the beginning.");
            println!("Documents already in the sink are NOT removed and will be written again");
            println!("unless idempotent writes are enabled.");
            print!("Proceed with reset? [y/N]: ");

            use std::io::{self, Write};
            io::stdout().flush()?;

            let mut input = String::new();
            io::stdin().read_line(&mut input)?;

            if !input.trim().eq_ignore_ascii_case("y") {
                println!("Reset cancelled.");
                return Ok(0);
            }
        }

        match store.reset().await {
            Ok(_) => {
                tracing::warn!(
                    path = %store.path().display(),
                    previous_offset = checkpoint.offset,
                    previous_total = checkpoint.total_migrated,
                    "Checkpoint reset"
                );
                println!("✅ Checkpoint removed: {}", store.path().display());
                Ok(0)
            }
            Err(e) => {
                println!("❌ Failed to remove checkpoint");
                println!("   Error: {e}");
                Ok(5)
            }
        }
    }
}
