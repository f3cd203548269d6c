//! In-memory save store for tests, with failure injection.

use crate::document::SaveDocument;
use crate::store::{SaveStore, StoreError};

/// A [`SaveStore`] held entirely in memory.
///
/// Used by unit and integration tests. `fail_reads` / `fail_writes` make
/// every subsequent read or write return [`StoreError::Unavailable`],
/// exercising the degraded-storage paths without touching a filesystem.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    gems: Option<u64>,
    checkpoint: Option<f64>,
    factory_count: Option<u32>,
    document: Option<SaveDocument>,
    fail_reads: bool,
    fail_writes: bool,
}

impl MemoryStore {
    /// Create an empty store (first-run state).
    pub fn new() -> Self {
        Self::default()
    }

    /// Make all subsequent reads fail with [`StoreError::Unavailable`].
    pub fn fail_reads(&mut self, fail: bool) {
        self.fail_reads = fail;
    }

    /// Make all subsequent writes fail with [`StoreError::Unavailable`].
    pub fn fail_writes(&mut self, fail: bool) {
        self.fail_writes = fail;
    }

    fn check_read(&self) -> Result<(), StoreError> {
        if self.fail_reads {
            Err(StoreError::Unavailable)
        } else {
            Ok(())
        }
    }

    fn check_write(&self) -> Result<(), StoreError> {
        if self.fail_writes {
            Err(StoreError::Unavailable)
        } else {
            Ok(())
        }
    }
}

impl SaveStore for MemoryStore {
    fn read_gems(&self) -> Result<Option<u64>, StoreError> {
        self.check_read()?;
        Ok(self.gems)
    }

    fn write_gems(&mut self, total: u64) -> Result<(), StoreError> {
        self.check_write()?;
        self.gems = Some(total);
        Ok(())
    }

    fn read_checkpoint(&self) -> Result<Option<f64>, StoreError> {
        self.check_read()?;
        Ok(self.checkpoint)
    }

    fn write_checkpoint(&mut self, seconds: f64) -> Result<(), StoreError> {
        self.check_write()?;
        self.checkpoint = Some(seconds);
        Ok(())
    }

    fn read_factory_count(&self) -> Result<Option<u32>, StoreError> {
        self.check_read()?;
        Ok(self.factory_count)
    }

    fn write_factory_count(&mut self, count: u32) -> Result<(), StoreError> {
        self.check_write()?;
        self.factory_count = Some(count);
        Ok(())
    }

    fn read_document(&self) -> Result<Option<SaveDocument>, StoreError> {
        self.check_read()?;
        Ok(self.document.clone())
    }

    fn write_document(&mut self, doc: &SaveDocument) -> Result<(), StoreError> {
        self.check_write()?;
        self.document = Some(doc.clone());
        Ok(())
    }
}
