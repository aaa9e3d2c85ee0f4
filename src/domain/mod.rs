//! Domain models and types for Ledgerlift.
//!
//! # Overview
//!
//! The domain layer provides:
//! - **Ledger models** ([`SourceRow`], [`Batch`], [`LedgerDocument`])
//! - **Identifiers** ([`DocumentId`], [`DedupKey`])
//! - **Error types** ([`LiftError`])
//! - **Result type alias** ([`Result`])
//!
//! # Error Handling
//!
//! All fallible operations return [`Result<T, LiftError>`]:
//!
//! ```rust
//! use ledgerlift::domain::{LiftError, Result};
//!
//! fn example() -> Result<()> {
//!     let config = ledgerlift::config::load_config("ledgerlift.toml")?;
//!     println!("page size {}", config.migration.page_size);
//!     Ok(())
//! }
//! ```

pub mod errors;
pub mod ids;
pub mod ledger;
pub mod result;

// Re-export commonly used types for convenience
pub use errors::LiftError;
pub use ids::{DedupKey, DocumentId};
pub use ledger::{Batch, LedgerDocument, SourceRow};
pub use result::Result;
