//! The factory registry and the production tick driver.
//!
//! Owns every factory for the session, in creation order, and converts
//! irregular host callbacks into fixed-cadence production ticks with a time
//! accumulator: each callback adds its elapsed time, and once the
//! accumulator reaches the tick interval one tick fires and the interval is
//! SUBTRACTED (not reset), so fractional remainders carry across callbacks.
//! At most one tick fires per callback.

use crate::clock::{Seconds, Timestamp};
use crate::config::{FactorySpec, GameConfig};
use crate::error::BuildError;
use crate::event::{Notification, NotificationBus};
use crate::factory::{Factory, FactoryId};
use crate::ledger::GemLedger;
use gemforge_persist::{FactoryState, SaveDocument};

/// Ordered collection of factories plus the tick accumulator.
#[derive(Debug)]
pub struct FactoryRegistry {
    /// Insertion order == creation order. Iteration during a tick follows
    /// this order; the order carries no other game meaning.
    factories: Vec<Factory>,
    next_id: u32,
    accumulator: Seconds,
    tick_interval: Seconds,
}

impl FactoryRegistry {
    /// An empty registry firing one tick per `tick_interval` seconds.
    pub fn new(tick_interval: Seconds) -> Self {
        Self {
            factories: Vec::new(),
            next_id: 0,
            accumulator: 0.0,
            tick_interval,
        }
    }

    pub fn len(&self) -> usize {
        self.factories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.factories.is_empty()
    }

    /// All factories in creation order.
    pub fn factories(&self) -> &[Factory] {
        &self.factories
    }

    pub fn get(&self, id: FactoryId) -> Option<&Factory> {
        self.factories.iter().find(|f| f.id() == id)
    }

    pub fn get_mut(&mut self, id: FactoryId) -> Option<&mut Factory> {
        self.factories.iter_mut().find(|f| f.id() == id)
    }

    /// Current accumulator value, for diagnostics and tests.
    pub fn accumulator(&self) -> Seconds {
        self.accumulator
    }

    fn fresh_id(&mut self) -> FactoryId {
        let id = FactoryId(self.next_id);
        self.next_id += 1;
        id
    }

    /// Append a factory built from `spec`, assigning the next id.
    pub fn add_factory(&mut self, spec: &FactorySpec, now: Timestamp) -> FactoryId {
        let id = self.fresh_id();
        self.factories.push(Factory::from_spec(id, spec, now));
        id
    }

    /// The explicit "build" action: spends the build cost and appends a
    /// factory from the starting template.
    ///
    /// The cap check runs before the spend, so a failed build never costs
    /// gems.
    pub fn build_factory(
        &mut self,
        config: &GameConfig,
        now: Timestamp,
        ledger: &mut GemLedger,
    ) -> Result<FactoryId, BuildError> {
        if self.factories.len() >= config.max_factories {
            return Err(BuildError::FactoryLimitReached);
        }
        if !ledger.try_spend(config.build_cost) {
            return Err(BuildError::InsufficientGems);
        }
        Ok(self.add_factory(&config.starting_factory, now))
    }

    /// Rebuild factories from persisted state, in document order. Ids are
    /// reassigned sequentially, which reproduces the pre-shutdown ids
    /// because the document preserves registry order.
    pub fn restore(&mut self, states: &[FactoryState], spec: &FactorySpec, now: Timestamp) {
        for state in states {
            let id = self.fresh_id();
            self.factories.push(Factory::restored(
                id,
                spec,
                state.level,
                state.production_rate,
                now,
            ));
        }
    }

    /// Snapshot every factory for the save document, in registry order.
    pub fn to_document(&self) -> SaveDocument {
        SaveDocument::from_states(
            self.factories
                .iter()
                .map(|f| (f.level(), f.production_rate())),
        )
    }

    /// Feed elapsed host time into the accumulator and run at most one
    /// production tick. Returns the gems credited to the ledger.
    ///
    /// With no factories the callback is a no-op and the accumulator does
    /// not advance.
    pub fn advance(
        &mut self,
        dt: Seconds,
        now: Timestamp,
        ledger: &mut GemLedger,
        bus: &mut NotificationBus,
    ) -> u64 {
        if self.factories.is_empty() {
            return 0;
        }

        self.accumulator += dt;
        if self.accumulator >= self.tick_interval {
            self.accumulator -= self.tick_interval;
            self.run_tick(now, ledger, bus)
        } else {
            0
        }
    }

    /// One production tick: settle accrual for every factory, in order.
    ///
    /// Crediting cannot fail, so there is no partial-tick rollback to
    /// consider; each factory is settled independently.
    fn run_tick(
        &mut self,
        now: Timestamp,
        ledger: &mut GemLedger,
        bus: &mut NotificationBus,
    ) -> u64 {
        let mut credited = 0u64;
        for factory in &mut self.factories {
            let elapsed = now.elapsed_since(factory.last_checkpoint());
            let gems = factory.compute_accrual(elapsed);
            if gems > 0 {
                ledger.credit(gems);
                credited += gems;
                bus.emit(Notification::ProductionPulse {
                    factory: factory.id(),
                });
            }
            factory.settle(now);
        }
        credited
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(seconds: f64) -> Timestamp {
        Timestamp::from_seconds(seconds)
    }

    fn spec_with_rate(rate: f64) -> FactorySpec {
        FactorySpec {
            production_rate: rate,
            ..FactorySpec::default()
        }
    }

    #[test]
    fn ids_are_unique_and_sequential() {
        let mut registry = FactoryRegistry::new(1.0);
        let spec = FactorySpec::default();
        let a = registry.add_factory(&spec, at(0.0));
        let b = registry.add_factory(&spec, at(0.0));
        let c = registry.add_factory(&spec, at(0.0));
        assert_eq!((a, b, c), (FactoryId(0), FactoryId(1), FactoryId(2)));
    }

    #[test]
    fn accumulator_carries_fractional_remainder() {
        let mut registry = FactoryRegistry::new(1.0);
        let mut ledger = GemLedger::new();
        let mut bus = NotificationBus::new();
        registry.add_factory(&spec_with_rate(1.0), at(0.0));

        // 0.6 + 0.6 = 1.2: the second callback fires a tick and leaves 0.2.
        assert_eq!(registry.advance(0.6, at(0.6), &mut ledger, &mut bus), 0);
        let credited = registry.advance(0.6, at(1.2), &mut ledger, &mut bus);
        assert_eq!(credited, 1);
        assert!((registry.accumulator() - 0.2).abs() < 1e-9);
    }

    #[test]
    fn at_most_one_tick_per_callback() {
        let mut registry = FactoryRegistry::new(1.0);
        let mut ledger = GemLedger::new();
        let mut bus = NotificationBus::new();
        registry.add_factory(&spec_with_rate(1.0), at(0.0));

        // A 5-second stall still fires only one tick; the rest stays in the
        // accumulator (and the checkpoint math credits the full elapsed time).
        let credited = registry.advance(5.0, at(5.0), &mut ledger, &mut bus);
        assert_eq!(credited, 5);
        assert!((registry.accumulator() - 4.0).abs() < 1e-9);
    }

    #[test]
    fn empty_registry_does_not_accumulate() {
        let mut registry = FactoryRegistry::new(1.0);
        let mut ledger = GemLedger::new();
        let mut bus = NotificationBus::new();

        registry.advance(10.0, at(10.0), &mut ledger, &mut bus);
        assert_eq!(registry.accumulator(), 0.0);
        assert_eq!(ledger.total(), 0);
    }

    #[test]
    fn tick_settles_every_factory_in_order() {
        let mut registry = FactoryRegistry::new(1.0);
        let mut ledger = GemLedger::new();
        let mut bus = NotificationBus::new();
        registry.add_factory(&spec_with_rate(1.0), at(0.0));
        registry.add_factory(&spec_with_rate(2.0), at(0.0));

        let credited = registry.advance(1.0, at(1.0), &mut ledger, &mut bus);
        assert_eq!(credited, 3);
        assert_eq!(ledger.total(), 3);
        for factory in registry.factories() {
            assert_eq!(factory.last_checkpoint(), at(1.0));
        }
    }

    #[test]
    fn clock_gone_backwards_accrues_zero() {
        let mut registry = FactoryRegistry::new(1.0);
        let mut ledger = GemLedger::new();
        let mut bus = NotificationBus::new();
        registry.add_factory(&spec_with_rate(1.0), at(100.0));

        // now is before the checkpoint: no negative accrual, checkpoint
        // still advances (to the earlier instant).
        let credited = registry.advance(1.0, at(50.0), &mut ledger, &mut bus);
        assert_eq!(credited, 0);
        assert_eq!(ledger.total(), 0);
    }

    #[test]
    fn build_factory_spends_and_appends() {
        let mut registry = FactoryRegistry::new(1.0);
        let config = GameConfig::default();
        let mut ledger = GemLedger::with_total(25);

        let id = registry
            .build_factory(&config, at(0.0), &mut ledger)
            .unwrap();
        assert_eq!(id, FactoryId(0));
        assert_eq!(ledger.total(), 15);
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn build_factory_insufficient_gems() {
        let mut registry = FactoryRegistry::new(1.0);
        let config = GameConfig::default();
        let mut ledger = GemLedger::with_total(10); // strict: 10 > 10 fails

        assert_eq!(
            registry.build_factory(&config, at(0.0), &mut ledger),
            Err(BuildError::InsufficientGems)
        );
        assert_eq!(registry.len(), 0);
        assert_eq!(ledger.total(), 10);
    }

    #[test]
    fn build_factory_cap_check_precedes_spend() {
        let mut registry = FactoryRegistry::new(1.0);
        let config = GameConfig {
            max_factories: 1,
            ..GameConfig::default()
        };
        let mut ledger = GemLedger::with_total(1_000);

        registry
            .build_factory(&config, at(0.0), &mut ledger)
            .unwrap();
        let before = ledger.total();
        assert_eq!(
            registry.build_factory(&config, at(0.0), &mut ledger),
            Err(BuildError::FactoryLimitReached)
        );
        assert_eq!(ledger.total(), before, "capped build must not spend");
    }

    #[test]
    fn restore_preserves_order_and_state() {
        let mut registry = FactoryRegistry::new(1.0);
        let spec = FactorySpec::default();
        let states = vec![
            FactoryState {
                level: 2,
                production_rate: 2.0,
            },
            FactoryState {
                level: 3,
                production_rate: 3.0,
            },
        ];

        registry.restore(&states, &spec, at(0.0));
        assert_eq!(registry.len(), 2);
        assert_eq!(registry.factories()[0].level(), 2);
        assert_eq!(registry.factories()[1].production_rate(), 3.0);

        // Round-trip back out in the same order.
        let doc = registry.to_document();
        assert_eq!(doc.units, states);
    }
}
