//! Test helpers shared by unit, integration, and property tests.
//!
//! Gated behind the `test-utils` feature (and always present for this
//! crate's own tests).

use crate::clock::{Clock, Seconds, Timestamp};
use crate::config::{FactorySpec, GameConfig};
use crate::session::Session;
use gemforge_persist::{MemoryStore, SaveDocument, SaveStore, StoreError};
use std::cell::{Cell, RefCell};
use std::rc::Rc;

/// A hand-driven clock. Clones share the same underlying time, so a test
/// can keep a handle while the session owns another.
#[derive(Debug, Clone)]
pub struct ManualClock {
    seconds: Rc<Cell<f64>>,
}

impl ManualClock {
    /// A clock reading `seconds` since the epoch.
    pub fn starting_at(seconds: f64) -> Self {
        Self {
            seconds: Rc::new(Cell::new(seconds)),
        }
    }

    /// Move the clock forward (or backward, with a negative delta).
    pub fn advance(&self, dt: Seconds) {
        self.seconds.set(self.seconds.get() + dt);
    }

    /// Jump the clock to an absolute reading.
    pub fn set(&self, seconds: f64) {
        self.seconds.set(seconds);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Timestamp {
        Timestamp::from_seconds(self.seconds.get())
    }
}

/// A [`MemoryStore`] behind a shared handle, so a test can hand a session
/// "the same store" twice and simulate a process restart.
#[derive(Debug, Clone, Default)]
pub struct SharedMemoryStore {
    inner: Rc<RefCell<MemoryStore>>,
}

impl SharedMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Direct access to the underlying store, e.g. to seed state or toggle
    /// failure injection.
    pub fn with_inner<R>(&self, f: impl FnOnce(&mut MemoryStore) -> R) -> R {
        f(&mut self.inner.borrow_mut())
    }
}

impl SaveStore for SharedMemoryStore {
    fn read_gems(&self) -> Result<Option<u64>, StoreError> {
        self.inner.borrow().read_gems()
    }

    fn write_gems(&mut self, total: u64) -> Result<(), StoreError> {
        self.inner.borrow_mut().write_gems(total)
    }

    fn read_checkpoint(&self) -> Result<Option<f64>, StoreError> {
        self.inner.borrow().read_checkpoint()
    }

    fn write_checkpoint(&mut self, seconds: f64) -> Result<(), StoreError> {
        self.inner.borrow_mut().write_checkpoint(seconds)
    }

    fn read_factory_count(&self) -> Result<Option<u32>, StoreError> {
        self.inner.borrow().read_factory_count()
    }

    fn write_factory_count(&mut self, count: u32) -> Result<(), StoreError> {
        self.inner.borrow_mut().write_factory_count(count)
    }

    fn read_document(&self) -> Result<Option<SaveDocument>, StoreError> {
        self.inner.borrow().read_document()
    }

    fn write_document(&mut self, doc: &SaveDocument) -> Result<(), StoreError> {
        self.inner.borrow_mut().write_document(doc)
    }
}

/// A spec producing whole gems per second, convenient for exact assertions.
pub fn unit_rate_spec() -> FactorySpec {
    FactorySpec {
        production_rate: 1.0,
        ..FactorySpec::default()
    }
}

/// Default config except the starting factory produces 1 gem/s.
pub fn unit_rate_config() -> GameConfig {
    GameConfig {
        starting_factory: unit_rate_spec(),
        ..GameConfig::default()
    }
}

/// A headless session over a manual clock and an in-memory store.
pub fn memory_session(config: GameConfig) -> (Session<ManualClock, MemoryStore>, ManualClock) {
    let clock = ManualClock::starting_at(0.0);
    let session = Session::new(clock.clone(), MemoryStore::new(), config);
    (session, clock)
}
