//! Progress store for checkpoint persistence
//!
//! Keeps a single checkpoint record in a JSON file on local disk. Writes go
//! to a sibling temp file that is synced and then renamed over the target,
//! so a crash mid-save leaves either the old or the new checkpoint.

use crate::core::state::checkpoint::Checkpoint;
use crate::domain::{LiftError, Result};
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::io::AsyncWriteExt;

/// Local-file checkpoint store
#[derive(Debug, Clone)]
pub struct ProgressStore {
    path: PathBuf,
}

impl ProgressStore {
    /// Create a store backed by `path`
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Path of the checkpoint file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the last persisted checkpoint
    ///
    /// A missing file, an unreadable file and a file that does not parse
    /// all yield the zero checkpoint. None of them is an error.
    pub async fn load(&self) -> Checkpoint {
        let contents = match fs::read_to_string(&self.path).await {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::info!(
                    path = %self.path.display(),
                    "No checkpoint found - starting from offset 0"
                );
                return Checkpoint::default();
            }
            Err(e) => {
                tracing::warn!(
                    path = %self.path.display(),
                    error = %e,
                    "Checkpoint unreadable - starting from offset 0"
                );
                return Checkpoint::default();
            }
        };

        match serde_json::from_str::<Checkpoint>(&contents) {
            Ok(checkpoint) => {
                tracing::info!(
                    path = %self.path.display(),
                    offset = checkpoint.offset,
                    total_migrated = checkpoint.total_migrated,
                    "Loaded checkpoint"
                );
                checkpoint
            }
            Err(e) => {
                tracing::warn!(
                    path = %self.path.display(),
                    error = %e,
                    "Checkpoint is corrupt - starting from offset 0"
                );
                Checkpoint::default()
            }
        }
    }

    /// Persist `checkpoint`, replacing the previous one
    ///
    /// # Errors
    ///
    /// Returns `LiftError::CheckpointSave` if any step of the write fails.
    pub async fn save(&self, checkpoint: &Checkpoint) -> Result<()> {
        self.write_atomic(checkpoint)
            .await
            .map_err(|e| LiftError::CheckpointSave(format!("{}: {e}", self.path.display())))?;

        tracing::debug!(
            path = %self.path.display(),
            offset = checkpoint.offset,
            total_migrated = checkpoint.total_migrated,
            "Checkpoint saved"
        );
        Ok(())
    }

    /// Delete the checkpoint file
    ///
    /// Returns `true` if a file was removed, `false` if there was none.
    pub async fn reset(&self) -> Result<bool> {
        match fs::remove_file(&self.path).await {
            Ok(()) => {
                tracing::info!(path = %self.path.display(), "Checkpoint removed");
                Ok(true)
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e.into()),
        }
    }

    async fn write_atomic(&self, checkpoint: &Checkpoint) -> std::io::Result<()> {
        let dir = self.parent_dir();
        fs::create_dir_all(&dir).await?;

        let payload = serde_json::to_vec_pretty(checkpoint)?;
        let temp_path = self.temp_path();

        let mut file = fs::File::create(&temp_path).await?;
        file.write_all(&payload).await?;
        file.sync_all().await?;
        drop(file);

        fs::rename(&temp_path, &self.path).await?;

        // The rename is only durable once the directory entry is on disk
        #[cfg(unix)]
        fs::File::open(&dir).await?.sync_all().await?;

        Ok(())
    }

    /// Directory holding the checkpoint file, `.` for a bare file name
    fn parent_dir(&self) -> PathBuf {
        match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        }
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}
