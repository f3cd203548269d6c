//! The [`SaveStore`] trait and storage error taxonomy.

use crate::document::SaveDocument;
use std::path::PathBuf;

// ===========================================================================
// Errors
// ===========================================================================

/// Errors that can occur while reading or writing durable state.
///
/// None of these are fatal to the core: callers treat a read failure as
/// missing state (first run) and a write failure as a skipped checkpoint to
/// be retried at the next opportunity. Losing durability for one interval is
/// acceptable; losing in-memory correctness is not.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// An I/O error occurred while touching the backing files.
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// A backing file exists but could not be parsed.
    #[error("corrupt save data in {file}: {detail}")]
    Corrupt { file: PathBuf, detail: String },

    /// The store refused the operation (used by test failure injection).
    #[error("save store unavailable")]
    Unavailable,
}

// ===========================================================================
// SaveStore
// ===========================================================================

/// Durable storage for session state.
///
/// Scalar slots return `Ok(None)` when the slot has never been written.
/// Writes are synchronous write-through: when a write method returns `Ok`,
/// the value is durable (for [`crate::FileStore`], flushed to disk).
pub trait SaveStore {
    /// Read the persisted gem total, if any.
    fn read_gems(&self) -> Result<Option<u64>, StoreError>;

    /// Write the gem total.
    fn write_gems(&mut self, total: u64) -> Result<(), StoreError>;

    /// Read the last shutdown checkpoint, in seconds since the UNIX epoch.
    fn read_checkpoint(&self) -> Result<Option<f64>, StoreError>;

    /// Write the shutdown checkpoint, in seconds since the UNIX epoch.
    fn write_checkpoint(&mut self, seconds: f64) -> Result<(), StoreError>;

    /// Read the active factory count, if any.
    fn read_factory_count(&self) -> Result<Option<u32>, StoreError>;

    /// Write the active factory count.
    fn write_factory_count(&mut self, count: u32) -> Result<(), StoreError>;

    /// Read the save document. `Ok(None)` means first run.
    fn read_document(&self) -> Result<Option<SaveDocument>, StoreError>;

    /// Write the save document.
    fn write_document(&mut self, doc: &SaveDocument) -> Result<(), StoreError>;
}
