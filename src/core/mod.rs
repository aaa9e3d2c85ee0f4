//! Core business logic for Ledgerlift.
//!
//! # Modules
//!
//! - [`migrate`] - Batch reader, batch writer and the migration coordinator
//! - [`state`] - Checkpoint model and its local-file store
//! - [`transform`] - Ledger row to document mapping
//!
//! # Migration Workflow
//!
//! 1. **Load Checkpoint**: Read `{offset, totalMigrated}` from the checkpoint file
//! 2. **Read**: Fetch one ordered page of rows at the checkpoint offset
//! 3. **Transform**: Compute the signed saldo for every row
//! 4. **Write**: Commit the page to the sink as one transaction
//! 5. **Checkpoint**: Advance the offset by one page and persist it
//! 6. **Repeat** until a short page, then report
//!
//! # Example
//!
//! ```rust,no_run
//! use ledgerlift::adapters::database::create_clients;
//! use ledgerlift::config::load_config;
//! use ledgerlift::core::migrate::MigrationCoordinator;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = load_config("ledgerlift.toml")?;
//! let clients = create_clients(&config).await?;
//!
//! let (_shutdown_tx, shutdown_rx) = tokio::sync::watch::channel(false);
//! let coordinator = MigrationCoordinator::new(config, clients, shutdown_rx);
//!
//! let summary = coordinator.execute().await?;
//! println!("Migrated: {}", summary.total_migrated);
//! # Ok(())
//! # }
//! ```

pub mod migrate;
pub mod state;
pub mod transform;
