// Checkpoint model and local-file persistence

pub mod checkpoint;
pub mod store;

pub use checkpoint::Checkpoint;
pub use store::ProgressStore;
