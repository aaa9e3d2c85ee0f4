//! Database abstraction layer
//!
//! Trait seams for the relational source and the document sink, plus the
//! factory that wires the configured implementations together.

pub mod factory;
pub mod traits;

pub use factory::{create_clients, MigrationClients};
pub use traits::{CommitResult, DocumentSink, LedgerSource, PageQuery, PendingDocument};
