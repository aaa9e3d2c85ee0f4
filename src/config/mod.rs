//! Configuration management for Ledgerlift.
//!
//! Ledgerlift reads a single TOML file with support for:
//! - Environment variable substitution (`${VAR_NAME}`)
//! - `LEDGERLIFT_<SECTION>_<KEY>` overrides
//! - Default values for every tunable except the two connection strings
//! - Validation before anything connects
//!
//! # Example Configuration
//!
//! ```toml
//! [application]
//! log_level = "info"
//!
//! [source]
//! connection_string = "${LEDGERLIFT_SOURCE_DSN}"
//! table = "finance.account_balances"
//! order_by = ["entry_date", "office_code", "account_code"]
//! lookback_days = 365
//!
//! [sink]
//! connection_string = "${LEDGERLIFT_SINK_DSN}"
//! collection = "saldo_documents"
//! idempotent_writes = false
//!
//! [migration]
//! page_size = 100
//! startup_delay_secs = 5
//! checkpoint_path = "ledgerlift-checkpoint.json"
//! ```
//!
//! # Loading
//!
//! ```rust,no_run
//! use ledgerlift::config::load_config;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = load_config("ledgerlift.toml")?;
//! println!("Page size: {}", config.migration.page_size);
//! # Ok(())
//! # }
//! ```

pub mod loader;
pub mod schema;
pub mod secret;

// Re-export commonly used types
pub use loader::load_config;
pub use schema::{
    ApplicationConfig, LedgerliftConfig, LoggingConfig, MigrationConfig, PostgreSQLConfig,
    RetryConfig, SinkConfig, SourceConfig,
};
pub use secret::{secret_string, SecretString, SecretValue};
