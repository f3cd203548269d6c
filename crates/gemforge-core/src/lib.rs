//! Gemforge Core -- the accrual engine for an idle factory economy.
//!
//! Factories produce gems over real elapsed time, can be leveled up at a
//! cost, and resume correctly after the process is closed and reopened,
//! crediting the player for the closure gap. This crate is the production
//! engine, the upgrade state machine, and the save/restore consistency
//! model; rendering and input stay on the far side of a fire-and-forget
//! notification bus.
//!
//! # Session Lifecycle
//!
//! A [`session::Session`] wires one clock, one save store, one ledger, and
//! one registry for the process lifetime, and implements the three
//! [`session::Lifecycle`] hooks a host loop drives:
//!
//! 1. **Start** -- [`reconcile::reconcile_startup`] restores persisted state
//!    and credits gems produced while the process was closed.
//! 2. **Tick** -- [`registry::FactoryRegistry::advance`] accumulates elapsed
//!    time and fires fixed-cadence production ticks into the ledger.
//! 3. **Stop** -- [`reconcile::checkpoint_shutdown`] durably records the
//!    shutdown instant and the full session state.
//!
//! # Key Types
//!
//! - [`ledger::GemLedger`] -- the currency balance; strict-inequality spend
//!   check, monotonic credit.
//! - [`factory::Factory`] -- one production unit; pure accrual computation
//!   plus the level-bounded upgrade transition.
//! - [`registry::FactoryRegistry`] -- ordered factory collection and the
//!   time-accumulator tick driver.
//! - [`clock::Clock`] -- wall-clock source, injected so tests drive time.
//! - [`event::NotificationBus`] -- outbound notifications to the display
//!   layer.
//!
//! Durable state lives behind [`gemforge_persist::SaveStore`].

pub mod clock;
pub mod config;
pub mod error;
pub mod event;
pub mod factory;
pub mod ledger;
pub mod reconcile;
pub mod registry;
pub mod session;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

pub use clock::{Clock, Seconds, SystemClock, Timestamp};
pub use config::{ConfigError, FactorySpec, GameConfig};
pub use error::{BuildError, SessionError, UpgradeError};
pub use event::{Notification, NotificationBus};
pub use factory::{Factory, FactoryId};
pub use ledger::GemLedger;
pub use reconcile::StartupReport;
pub use registry::FactoryRegistry;
pub use session::{Lifecycle, Session};
