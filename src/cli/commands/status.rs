//! Status command implementation
//!
//! Shows the saved checkpoint and, on request, the number of documents in
//! the sink.

use crate::adapters::database::DocumentSink;
use crate::adapters::postgresql::PostgresDocumentSink;
use crate::config::load_config;
use crate::core::state::ProgressStore;
use clap::Args;

/// Arguments for the status command
#[derive(Args, Debug, Default)]
pub struct StatusArgs {
    /// Also connect to the sink and count stored documents
    #[arg(long)]
    pub documents: bool,
}

impl StatusArgs {
    /// Execute the status command
    pub async fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        tracing::info!("Checking migration status");

        println!("📊 Migration Status");
        println!();

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
        let page_size = config.migration.page_size;

        println!("  Checkpoint file: {}", store.path().display());
        if checkpoint.is_initial() {
            println!("  No progress recorded.");
            println!("  Run 'ledgerlift migrate' to start the migration.");
        } else {
            println!("  Next offset: {}", checkpoint.offset);
            println!("  Total migrated: {}", checkpoint.total_migrated);
            println!(
                "  Pages committed: {}",
                checkpoint.offset / page_size.max(1) as u64
            );
            if !checkpoint.is_aligned(page_size) {
                println!(
                    "  ⚠️  Offset is not a multiple of the configured page_size ({page_size}); \
                     'migrate' will refuse to resume"
                );
            }
        }

        if self.documents {
            let sink = match PostgresDocumentSink::new(&config.sink) {
                Ok(s) => s,
                Err(e) => {
                    println!("❌ Failed to create sink client");
                    println!("   Error: {e}");
                    return Ok(e.exit_code());
                }
            };

            let counted = sink.count_documents().await;
            sink.close();

            match counted {
                Ok(count) => {
                    println!("  Documents in {}: {count}", config.sink.collection);
                    if count < checkpoint.total_migrated {
                        println!("  ⚠️  Sink holds fewer documents than the checkpoint records");
                    }
                }
                Err(e) => {
                    println!("❌ Failed to count documents");
                    println!("   Error: {e}");
                    return Ok(4);
                }
            }
        }

        println!();
        Ok(0)
    }
}
