//! External system integrations for Ledgerlift.
//!
//! - [`database`] - Source and sink traits, client factory and lifetime guard
//! - [`postgresql`] - PostgreSQL implementations of both traits
//!
//! # Example
//!
//! ```rust,no_run
//! use ledgerlift::adapters::database::create_clients;
//! use ledgerlift::config::load_config;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = load_config("ledgerlift.toml")?;
//! let clients = create_clients(&config).await?;
//!
//! let stored = clients.sink().count_documents().await?;
//! println!("{stored} documents in the sink");
//!
//! clients.release();
//! # Ok(())
//! # }
//! ```

pub mod database;
pub mod postgresql;
