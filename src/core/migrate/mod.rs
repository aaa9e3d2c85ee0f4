// Checkpointed batch migration: reader, writer, coordinator and summary

pub mod coordinator;
pub mod reader;
pub mod summary;
pub mod writer;

pub use coordinator::MigrationCoordinator;
pub use reader::BatchReader;
pub use summary::{MigrationPhase, MigrationSummary};
pub use writer::BatchWriter;
