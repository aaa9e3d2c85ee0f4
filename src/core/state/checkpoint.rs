//! Checkpoint model
//!
//! The checkpoint is the only state that survives a restart. It records the
//! next offset to read, how many rows have been committed so far and the
//! date window the offsets were counted in.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Resumable migration progress
///
/// Persisted as `{"offset": N, "totalMigrated": M, "windowStart": D}`.
/// `windowStart` is absent until the first batch is saved, and files
/// written without it still load.
///
/// # Examples
///
/// ```
/// use ledgerlift::core::state::Checkpoint;
///
/// let checkpoint = Checkpoint::default().advance(100, 100).advance(100, 50);
/// assert_eq!(checkpoint.offset, 200);
/// assert_eq!(checkpoint.total_migrated, 150);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Checkpoint {
    /// Offset of the next page to read; a multiple of the page size
    pub offset: u64,

    /// Sum of the sizes of all committed batches
    pub total_migrated: u64,

    /// Earliest entry date of the run that produced `offset`
    ///
    /// Offsets only address the same rows while the window stays put, so a
    /// resumed run reads with this date instead of recomputing it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub window_start: Option<NaiveDate>,
}

impl Checkpoint {
    /// Create a checkpoint at an explicit position
    pub fn new(offset: u64, total_migrated: u64) -> Self {
        Self {
            offset,
            total_migrated,
            window_start: None,
        }
    }

    /// Pin the date window the offsets refer to
    pub fn with_window_start(self, window_start: NaiveDate) -> Self {
        Self {
            window_start: Some(window_start),
            ..self
        }
    }

    /// Whether this is the zero state of a fresh run
    pub fn is_initial(&self) -> bool {
        self.offset == 0 && self.total_migrated == 0
    }

    /// Checkpoint after committing a batch of `batch_len` rows read with `page_size`
    ///
    /// The offset always moves by a whole page, even for the short final batch.
    pub fn advance(self, page_size: usize, batch_len: usize) -> Self {
        Self {
            offset: self.offset + page_size as u64,
            total_migrated: self.total_migrated + batch_len as u64,
            window_start: self.window_start,
        }
    }

    /// Whether the offset sits on a page boundary for `page_size`
    pub fn is_aligned(&self, page_size: usize) -> bool {
        page_size > 0 && self.offset % page_size as u64 == 0
    }
}
