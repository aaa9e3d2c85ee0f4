// Ledgerlift - Resumable ledger to document store migration
// Copyright (c) 2025 Ledgerlift Contributors
// Licensed under the MIT License

//! # Ledgerlift - Resumable Ledger Migration
//!
//! Ledgerlift copies ledger balance rows from a relational database into a
//! document store in fixed-size pages. Progress is checkpointed to a local
//! file after every committed page, so an interrupted run resumes where it
//! stopped.
//!
//! ## Overview
//!
//! Each iteration of the migration loop:
//! - **Reads** one deterministically ordered page at the checkpoint offset
//! - **Transforms** every row into a document with a signed closing balance
//! - **Writes** the page to the sink in a single transaction
//! - **Checkpoints** the next offset and the running row count
//!
//! A page shorter than the page size ends the run.
//!
//! ## Architecture
//!
//! - [`cli`] - Command-line interface and argument parsing
//! - [`core`] - Migration loop, checkpoint state and transform
//! - [`adapters`] - Source and sink traits with their PostgreSQL implementations
//! - [`domain`] - Ledger rows, documents, identifiers and errors
//! - [`config`] - Configuration management
//! - [`logging`] - Structured logging
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use ledgerlift::adapters::database::create_clients;
//! use ledgerlift::config::load_config;
//! use ledgerlift::core::migrate::MigrationCoordinator;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = load_config("ledgerlift.toml")?;
//!     let clients = create_clients(&config).await?;
//!
//!     let (_shutdown_tx, shutdown_rx) = tokio::sync::watch::channel(false);
//!     let summary = MigrationCoordinator::new(config, clients, shutdown_rx)
//!         .execute()
//!         .await?;
//!
//!     println!("Migrated {} rows", summary.total_migrated);
//!     Ok(())
//! }
//! ```
//!
//! ## Delivery Guarantee
//!
//! The checkpoint is saved after the page is committed. A crash between the
//! two re-writes that page on restart, so the baseline guarantee is
//! at-least-once. Setting `sink.idempotent_writes = true` keys every
//! document by a hash of its business fields and skips rows already stored.
//!
//! ## Error Handling
//!
//! All fallible operations return [`domain::Result`], whose error type
//! [`domain::LiftError`] maps onto the process exit code:
//!
//! ```rust
//! use ledgerlift::domain::LiftError;
//!
//! let err = LiftError::CheckpointSave("disk full".to_string());
//! assert_eq!(err.exit_code(), 3);
//! ```

pub mod adapters;
pub mod cli;
pub mod config;
pub mod core;
pub mod domain;
pub mod logging;
