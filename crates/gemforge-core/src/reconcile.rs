//! The accrual reconciler: offline catch-up at startup, checkpoint at
//! shutdown.
//!
//! Startup runs exactly once per session. It reads the persisted gem total,
//! the save document, and the shutdown checkpoint, then credits the gems
//! produced while the process was closed. Shutdown writes the current
//! wall-clock time back as the checkpoint unconditionally, along with the
//! rest of the durable state.
//!
//! Storage failures never propagate out of here: a failed read degrades to
//! "missing state" and a failed write is logged and skipped, to be retried
//! at the next checkpoint opportunity. In-memory state stays authoritative.

use crate::clock::{Seconds, Timestamp};
use crate::config::GameConfig;
use crate::factory::accrue;
use crate::ledger::GemLedger;
use crate::registry::FactoryRegistry;
use gemforge_persist::SaveStore;
use tracing::{info, warn};

/// What startup reconciliation found and did.
#[derive(Debug, Clone, PartialEq)]
pub struct StartupReport {
    /// True when no save document existed (default factory was created).
    pub first_run: bool,

    /// Wall-clock seconds the process was closed, clamped at zero.
    /// Zero when no checkpoint was persisted.
    pub offline_elapsed: Seconds,

    /// Gems credited for the closure gap.
    pub offline_gems: u64,

    /// Factories restored from the save document (0 on first run, where the
    /// single default factory is created instead).
    pub restored_factories: usize,
}

/// Rebuild session state from the store and credit offline production.
///
/// Offline accrual uses the single global `offline_rate` from the config,
/// not per-factory rates (see DESIGN.md open questions). The credit is
/// computed directly as `floor(elapsed * rate)`.
pub fn reconcile_startup<S: SaveStore>(
    store: &mut S,
    now: Timestamp,
    config: &GameConfig,
    registry: &mut FactoryRegistry,
    ledger: &mut GemLedger,
) -> StartupReport {
    let persisted_gems = read_or_missing(store.read_gems(), "gems");
    *ledger = GemLedger::with_total(persisted_gems.unwrap_or(0));

    let document = read_or_missing(store.read_document(), "save document");
    let (first_run, restored_factories) = match document {
        Some(doc) => {
            registry.restore(&doc.units, &config.starting_factory, now);
            (false, doc.units.len())
        }
        None => {
            registry.add_factory(&config.starting_factory, now);
            (true, 0)
        }
    };

    // The count slot is written independently of the document, so a crash
    // between writes can leave them disagreeing. The document wins; the
    // mismatch is only worth a warning.
    if let Some(count) = read_or_missing(store.read_factory_count(), "factory count") {
        if count as usize != registry.len() {
            warn!(
                persisted = count,
                restored = registry.len(),
                "factory count slot disagrees with save document"
            );
        }
    }

    // The checkpoint slot is independent of the document; catch up whenever
    // one exists. First run has neither, so no catch-up happens there.
    let checkpoint = read_or_missing(store.read_checkpoint(), "checkpoint");
    let (offline_elapsed, offline_gems) = match checkpoint {
        Some(seconds) => {
            let elapsed = now
                .elapsed_since(Timestamp::from_seconds(seconds))
                .max(0.0);
            (elapsed, accrue(config.offline_rate, elapsed))
        }
        None => (0.0, 0),
    };

    if offline_gems > 0 {
        ledger.credit(offline_gems);
        // Write-through of the new total; a failure here only costs
        // durability until the next checkpoint.
        if let Err(e) = store.write_gems(ledger.total()) {
            warn!(error = %e, "failed to persist offline credit");
        }
    }

    let report = StartupReport {
        first_run,
        offline_elapsed,
        offline_gems,
        restored_factories,
    };
    info!(
        first_run = report.first_run,
        offline_elapsed = report.offline_elapsed,
        offline_gems = report.offline_gems,
        restored = report.restored_factories,
        "startup reconciliation complete"
    );
    report
}

/// Persist the full session state and the shutdown checkpoint.
///
/// The checkpoint is written even if nothing was produced this session.
/// Each write is independent; one failing is logged and does not abort the
/// others, so a crash-adjacent shutdown still saves what it can.
pub fn checkpoint_shutdown<S: SaveStore>(
    store: &mut S,
    now: Timestamp,
    ledger: &GemLedger,
    registry: &FactoryRegistry,
) {
    if let Err(e) = store.write_checkpoint(now.as_seconds()) {
        warn!(error = %e, "failed to persist shutdown checkpoint");
    }
    if let Err(e) = store.write_gems(ledger.total()) {
        warn!(error = %e, "failed to persist gem total");
    }
    if let Err(e) = store.write_factory_count(registry.len() as u32) {
        warn!(error = %e, "failed to persist factory count");
    }
    if let Err(e) = store.write_document(&registry.to_document()) {
        warn!(error = %e, "failed to persist save document");
    }
}

/// Degrade a failed read to missing state, logging the error.
fn read_or_missing<T>(
    result: Result<Option<T>, gemforge_persist::StoreError>,
    what: &str,
) -> Option<T> {
    match result {
        Ok(value) => value,
        Err(e) => {
            warn!(error = %e, "failed to read {what}; treating as missing");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gemforge_persist::{FactoryState, MemoryStore, SaveDocument};

    fn at(seconds: f64) -> Timestamp {
        Timestamp::from_seconds(seconds)
    }

    fn fresh(config: &GameConfig) -> (FactoryRegistry, GemLedger) {
        (FactoryRegistry::new(config.tick_interval), GemLedger::new())
    }

    #[test]
    fn first_run_creates_one_default_factory() {
        let config = GameConfig::default();
        let (mut registry, mut ledger) = fresh(&config);
        let mut store = MemoryStore::new();

        let report =
            reconcile_startup(&mut store, at(0.0), &config, &mut registry, &mut ledger);

        assert!(report.first_run);
        assert_eq!(report.offline_gems, 0);
        assert_eq!(registry.len(), 1);
        assert_eq!(ledger.total(), 0);
    }

    #[test]
    fn restores_state_and_credits_offline_gap() {
        let config = GameConfig {
            offline_rate: 2.0,
            ..GameConfig::default()
        };
        let (mut registry, mut ledger) = fresh(&config);

        let mut store = MemoryStore::new();
        store.write_gems(40).unwrap();
        store.write_checkpoint(100.0).unwrap();
        store
            .write_document(&SaveDocument {
                units: vec![FactoryState {
                    level: 2,
                    production_rate: 2.0,
                }],
            })
            .unwrap();

        // 10.5 s closed at 2 gems/s -> floor(21.0) = 21.
        let report =
            reconcile_startup(&mut store, at(110.5), &config, &mut registry, &mut ledger);

        assert!(!report.first_run);
        assert_eq!(report.restored_factories, 1);
        assert_eq!(report.offline_gems, 21);
        assert_eq!(ledger.total(), 61);
        // Write-through landed.
        assert_eq!(store.read_gems().unwrap(), Some(61));
    }

    #[test]
    fn tiny_offline_rate_floors_to_zero() {
        let config = GameConfig::default(); // offline_rate 1e-7
        let mut store = MemoryStore::new();
        store.write_checkpoint(0.0).unwrap();
        store.write_document(&SaveDocument::default()).unwrap();

        let (mut registry, mut ledger) = fresh(&config);
        let report =
            reconcile_startup(&mut store, at(100.0), &config, &mut registry, &mut ledger);
        assert_eq!(report.offline_gems, 0);

        let (mut registry, mut ledger) = fresh(&config);
        let report = reconcile_startup(
            &mut store,
            at(10_000_000.0),
            &config,
            &mut registry,
            &mut ledger,
        );
        assert_eq!(report.offline_gems, 1);
        assert_eq!(ledger.total(), 1);
    }

    #[test]
    fn checkpoint_in_the_future_credits_nothing() {
        let config = GameConfig {
            offline_rate: 5.0,
            ..GameConfig::default()
        };
        let mut store = MemoryStore::new();
        store.write_checkpoint(1_000.0).unwrap();
        store.write_document(&SaveDocument::default()).unwrap();

        let (mut registry, mut ledger) = fresh(&config);
        let report =
            reconcile_startup(&mut store, at(500.0), &config, &mut registry, &mut ledger);

        assert_eq!(report.offline_elapsed, 0.0);
        assert_eq!(report.offline_gems, 0);
    }

    #[test]
    fn read_failure_degrades_to_first_run() {
        let config = GameConfig::default();
        let mut store = MemoryStore::new();
        store.write_gems(500).unwrap();
        store.fail_reads(true);

        let (mut registry, mut ledger) = fresh(&config);
        let report =
            reconcile_startup(&mut store, at(10.0), &config, &mut registry, &mut ledger);

        assert!(report.first_run);
        assert_eq!(registry.len(), 1);
        assert_eq!(ledger.total(), 0);
    }

    #[test]
    fn shutdown_writes_checkpoint_unconditionally() {
        let config = GameConfig::default();
        let (mut registry, ledger) = fresh(&config);
        registry.add_factory(&config.starting_factory, at(0.0));

        let mut store = MemoryStore::new();
        checkpoint_shutdown(&mut store, at(42.5), &ledger, &registry);

        assert_eq!(store.read_checkpoint().unwrap(), Some(42.5));
        assert_eq!(store.read_gems().unwrap(), Some(0));
        assert_eq!(store.read_factory_count().unwrap(), Some(1));
        assert_eq!(store.read_document().unwrap().unwrap().units.len(), 1);
    }

    #[test]
    fn shutdown_write_failure_does_not_panic() {
        let config = GameConfig::default();
        let (registry, ledger) = fresh(&config);
        let mut store = MemoryStore::new();
        store.fail_writes(true);

        checkpoint_shutdown(&mut store, at(1.0), &ledger, &registry);
    }
}
