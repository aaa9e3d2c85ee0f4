//! Validate config command implementation
//!
//! Loads and validates the configuration file without touching either
//! database.

use crate::config::load_config;
use clap::Args;

/// Arguments for the validate-config command
#[derive(Args, Debug)]
pub struct ValidateArgs {}

impl ValidateArgs {
    /// Execute the validate-config command
    pub async fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        tracing::info!(config_path = %config_path, "Validating configuration");

        println!("🔍 Validating configuration file: {config_path}");
        println!();

        // load_config validates as part of loading
        let config = match load_config(config_path) {
            Ok(c) => c,
            Err(e) => {
                println!("❌ Configuration is invalid");
                println!("   Error: {e}");
                println!();
                return Ok(2);
            }
        };

        println!("✅ Configuration is valid");
        println!();
        println!("Configuration Summary:");
        println!("  Log Level: {}", config.application.log_level);
        println!("  Dry Run: {}", config.application.dry_run);
        println!(
            "  Source: {}",
            config.source.postgresql.connection_string_safe()
        );
        println!("  Source Table: {}", config.source.table);
        println!("  Ordering: {}", config.source.order_by.join(", "));
        println!("  Lookback: {} days", config.source.lookback_days);
        println!("  Sink: {}", config.sink.postgresql.connection_string_safe());
        println!("  Sink Collection: {}", config.sink.collection);
        println!("  Idempotent Writes: {}", config.sink.idempotent_writes);
        println!("  Page Size: {}", config.migration.page_size);
        println!(
            "  Startup Delay: {}s",
            config.migration.startup_delay_secs
        );
        println!(
            "  Checkpoint: {}",
            config.migration.checkpoint_path.display()
        );
        println!(
            "  Read Retries: {} (backoff {}ms x{}, max {}ms)",
            config.migration.retry.max_retries,
            config.migration.retry.initial_delay_ms,
            config.migration.retry.backoff_multiplier,
            config.migration.retry.max_delay_ms
        );
        println!();
        Ok(0)
    }
}
