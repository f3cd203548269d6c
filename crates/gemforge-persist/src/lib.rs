//! Persistence layer for the Gemforge idle economy.
//!
//! Two kinds of durable state back a play session:
//!
//! - **Scalar slots** -- small independent key/value entries (total gems,
//!   last shutdown checkpoint, active factory count). Each slot is read and
//!   written on its own; there is no transactional grouping across slots, so
//!   a crash between writes can leave them mutually inconsistent. The
//!   reconciler tolerates that.
//! - **Save document** -- a structured, human-readable JSON document holding
//!   per-factory state. Absence of the document is a valid state meaning
//!   "first run".
//!
//! Both live behind the [`SaveStore`] trait. [`FileStore`] is the production
//! implementation (two JSON files in a save directory, synchronous
//! write-through). [`MemoryStore`] backs tests and supports failure
//! injection for exercising storage-unavailable paths.

pub mod document;
pub mod file;
pub mod memory;
pub mod store;

pub use document::{FactoryState, SaveDocument};
pub use file::FileStore;
pub use memory::MemoryStore;
pub use store::{SaveStore, StoreError};
