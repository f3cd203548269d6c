//! Session assembly: one ledger, one registry, one store, one clock.
//!
//! The session is the seam where everything the rest of the crate keeps
//! pure gets wired together for a process lifetime. It owns exactly one
//! instance of each collaborator -- explicit construction, no global
//! singletons -- and implements the three lifecycle hooks a host loop
//! drives:
//!
//! - [`Lifecycle::on_start`] -- startup reconciliation (offline catch-up).
//! - [`Lifecycle::on_tick`] -- feed elapsed time to the production driver.
//! - [`Lifecycle::on_stop`] -- durable shutdown checkpoint.
//!
//! Write-through persistence of the gem total and the outbound
//! notifications both live here: crediting paths persist the new total
//! (logging and continuing on storage failure) and emit `GemsChanged`.

use crate::clock::{Clock, Seconds};
use crate::config::GameConfig;
use crate::error::SessionError;
use crate::event::{Notification, NotificationBus};
use crate::factory::FactoryId;
use crate::ledger::GemLedger;
use crate::reconcile::{StartupReport, checkpoint_shutdown, reconcile_startup};
use crate::registry::FactoryRegistry;
use gemforge_persist::SaveStore;
use tracing::warn;

/// The three hooks the host loop invokes. The core never assumes it is
/// running inside a larger framework; whoever owns the real loop calls
/// these.
pub trait Lifecycle {
    /// Called once before the first tick.
    fn on_start(&mut self);

    /// Called once per host callback with elapsed real time.
    fn on_tick(&mut self, dt: Seconds);

    /// Called once at clean exit or explicit teardown.
    fn on_stop(&mut self);
}

/// A running game session.
#[derive(Debug)]
pub struct Session<C: Clock, S: SaveStore> {
    clock: C,
    store: S,
    config: GameConfig,
    ledger: GemLedger,
    registry: FactoryRegistry,
    bus: NotificationBus,
    startup_report: Option<StartupReport>,
}

impl<C: Clock, S: SaveStore> Session<C, S> {
    /// Wire a session. Nothing is read from the store until `on_start`.
    pub fn new(clock: C, store: S, config: GameConfig) -> Self {
        let registry = FactoryRegistry::new(config.tick_interval);
        Self {
            clock,
            store,
            config,
            ledger: GemLedger::new(),
            registry,
            bus: NotificationBus::new(),
            startup_report: None,
        }
    }

    /// Register a passive listener for outbound notifications.
    pub fn subscribe(&mut self, listener: impl FnMut(&Notification) + 'static) {
        self.bus.subscribe(listener);
    }

    /// What startup reconciliation did, once `on_start` has run.
    pub fn startup_report(&self) -> Option<&StartupReport> {
        self.startup_report.as_ref()
    }

    pub fn ledger(&self) -> &GemLedger {
        &self.ledger
    }

    pub fn registry(&self) -> &FactoryRegistry {
        &self.registry
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    /// Read-only display text for the gem total (K/M abbreviated).
    pub fn gems_display_text(&self) -> String {
        self.ledger.display_text()
    }

    /// Inbound "build factory" action from the display layer.
    ///
    /// On failure, emits a user-facing message and returns the typed error;
    /// nothing is mutated. On success the spent-down total is persisted
    /// write-through and `GemsChanged` fires.
    pub fn build_factory(&mut self) -> Result<FactoryId, SessionError> {
        let now = self.clock.now();
        match self
            .registry
            .build_factory(&self.config, now, &mut self.ledger)
        {
            Ok(id) => {
                self.persist_gems();
                self.persist_factory_count();
                self.bus.emit(Notification::GemsChanged {
                    total: self.ledger.total(),
                });
                Ok(id)
            }
            Err(e) => {
                let text = match e {
                    crate::error::BuildError::InsufficientGems => "Don't have enough gems",
                    crate::error::BuildError::FactoryLimitReached => "No room for more factories",
                };
                self.bus.emit(Notification::Message {
                    text: text.into(),
                    success: false,
                });
                Err(e.into())
            }
        }
    }

    /// Inbound "upgrade factory" action from the display layer.
    pub fn upgrade_factory(&mut self, id: FactoryId) -> Result<(), SessionError> {
        let Some(factory) = self.registry.get_mut(id) else {
            return Err(SessionError::UnknownFactory(id));
        };
        match factory.upgrade(&mut self.ledger) {
            Ok(()) => {
                self.persist_gems();
                self.bus.emit(Notification::GemsChanged {
                    total: self.ledger.total(),
                });
                self.bus.emit(Notification::Message {
                    text: "Level upgraded".into(),
                    success: true,
                });
                Ok(())
            }
            Err(e) => {
                let text = match e {
                    crate::error::UpgradeError::InsufficientGems => "Don't have enough gems",
                    crate::error::UpgradeError::MaxLevelReached => "Already at max level",
                };
                self.bus.emit(Notification::Message {
                    text: text.into(),
                    success: false,
                });
                Err(e.into())
            }
        }
    }

    /// Write-through of the gem total. A failure costs durability for this
    /// interval only; the in-memory total stays authoritative and the next
    /// checkpoint retries.
    fn persist_gems(&mut self) {
        if let Err(e) = self.store.write_gems(self.ledger.total()) {
            warn!(error = %e, "failed to persist gem total; continuing in memory");
        }
    }

    fn persist_factory_count(&mut self) {
        if let Err(e) = self.store.write_factory_count(self.registry.len() as u32) {
            warn!(error = %e, "failed to persist factory count; continuing in memory");
        }
    }
}

impl<C: Clock, S: SaveStore> Lifecycle for Session<C, S> {
    fn on_start(&mut self) {
        let now = self.clock.now();
        let report = reconcile_startup(
            &mut self.store,
            now,
            &self.config,
            &mut self.registry,
            &mut self.ledger,
        );
        self.startup_report = Some(report);
        self.bus.emit(Notification::GemsChanged {
            total: self.ledger.total(),
        });
    }

    fn on_tick(&mut self, dt: Seconds) {
        let now = self.clock.now();
        let credited = self
            .registry
            .advance(dt, now, &mut self.ledger, &mut self.bus);
        if credited > 0 {
            self.persist_gems();
            self.bus.emit(Notification::GemsChanged {
                total: self.ledger.total(),
            });
        }
    }

    fn on_stop(&mut self) {
        let now = self.clock.now();
        checkpoint_shutdown(&mut self.store, now, &self.ledger, &self.registry);
    }
}
