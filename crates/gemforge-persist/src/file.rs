//! File-backed save store: two JSON files in a save directory.
//!
//! - `prefs.json` holds the scalar slots as a flat JSON object.
//! - `factories.json` holds the [`SaveDocument`].
//!
//! Every scalar write is read-merge-rewrite of `prefs.json`, so each slot
//! stays independently writable at the cost of rewriting the small file.
//! All writes are synchronous; there is no batching or async queue.

use crate::document::SaveDocument;
use crate::store::{SaveStore, StoreError};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

const PREFS_FILE: &str = "prefs.json";
const DOCUMENT_FILE: &str = "factories.json";

/// The scalar slots, mirrored as one flat JSON object on disk.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Prefs {
    #[serde(skip_serializing_if = "Option::is_none")]
    gems: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    last_checkpoint: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    active_factories: Option<u32>,
}

/// A [`SaveStore`] backed by JSON files in a directory.
#[derive(Debug)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    /// Open a store rooted at `dir`, creating the directory if needed.
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let dir = dir.into();
        std::fs::create_dir_all(&dir)?;
        tracing::debug!(dir = %dir.display(), "opened save store");
        Ok(Self { dir })
    }

    /// The directory this store writes into.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn prefs_path(&self) -> PathBuf {
        self.dir.join(PREFS_FILE)
    }

    fn document_path(&self) -> PathBuf {
        self.dir.join(DOCUMENT_FILE)
    }

    fn read_prefs(&self) -> Result<Prefs, StoreError> {
        let path = self.prefs_path();
        if !path.exists() {
            return Ok(Prefs::default());
        }
        let content = std::fs::read_to_string(&path)?;
        serde_json::from_str(&content).map_err(|e| StoreError::Corrupt {
            file: path,
            detail: e.to_string(),
        })
    }

    fn write_prefs(&self, prefs: &Prefs) -> Result<(), StoreError> {
        let json = serde_json::to_string_pretty(prefs).map_err(|e| StoreError::Corrupt {
            file: self.prefs_path(),
            detail: e.to_string(),
        })?;
        std::fs::write(self.prefs_path(), json)?;
        Ok(())
    }
}

impl SaveStore for FileStore {
    fn read_gems(&self) -> Result<Option<u64>, StoreError> {
        Ok(self.read_prefs()?.gems)
    }

    fn write_gems(&mut self, total: u64) -> Result<(), StoreError> {
        let mut prefs = self.read_prefs().unwrap_or_default();
        prefs.gems = Some(total);
        self.write_prefs(&prefs)
    }

    fn read_checkpoint(&self) -> Result<Option<f64>, StoreError> {
        Ok(self.read_prefs()?.last_checkpoint)
    }

    fn write_checkpoint(&mut self, seconds: f64) -> Result<(), StoreError> {
        let mut prefs = self.read_prefs().unwrap_or_default();
        prefs.last_checkpoint = Some(seconds);
        self.write_prefs(&prefs)
    }

    fn read_factory_count(&self) -> Result<Option<u32>, StoreError> {
        Ok(self.read_prefs()?.active_factories)
    }

    fn write_factory_count(&mut self, count: u32) -> Result<(), StoreError> {
        let mut prefs = self.read_prefs().unwrap_or_default();
        prefs.active_factories = Some(count);
        self.write_prefs(&prefs)
    }

    fn read_document(&self) -> Result<Option<SaveDocument>, StoreError> {
        let path = self.document_path();
        if !path.exists() {
            return Ok(None);
        }
        let content = std::fs::read_to_string(&path)?;
        let doc = serde_json::from_str(&content).map_err(|e| StoreError::Corrupt {
            file: path,
            detail: e.to_string(),
        })?;
        Ok(Some(doc))
    }

    fn write_document(&mut self, doc: &SaveDocument) -> Result<(), StoreError> {
        let json = serde_json::to_string_pretty(doc).map_err(|e| StoreError::Corrupt {
            file: self.document_path(),
            detail: e.to_string(),
        })?;
        std::fs::write(self.document_path(), json)?;
        Ok(())
    }
}
