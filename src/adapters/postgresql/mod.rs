//! PostgreSQL integration
//!
//! Implements [`LedgerSource`](crate::adapters::database::LedgerSource) over
//! a relational ledger table and
//! [`DocumentSink`](crate::adapters::database::DocumentSink) over a JSONB
//! document table.

pub mod client;
pub mod models;
pub mod sink;
pub mod source;

pub use client::PostgreSQLClient;
pub use sink::PostgresDocumentSink;
pub use source::PostgresLedgerSource;
