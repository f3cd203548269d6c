//! A factory: one production unit with a level, a rate, and a checkpoint.
//!
//! Accrual is a pure computation; the registry applies the result to the
//! ledger and advances the checkpoint. The upgrade path is a tiny state
//! machine over `level`: one transition per state, terminal at `max_level`.

use crate::clock::{Seconds, Timestamp};
use crate::config::FactorySpec;
use crate::error::UpgradeError;
use crate::ledger::GemLedger;
use serde::{Deserialize, Serialize};

/// Identifies a factory. Unique within a registry, stable across save/load
/// (ids are reassigned in insertion order, which the save document preserves).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FactoryId(pub u32);

/// One production unit.
#[derive(Debug, Clone, PartialEq)]
pub struct Factory {
    id: FactoryId,
    level: u32,
    production_rate: f64,
    upgrade_cost: u64,
    max_level: u32,
    last_checkpoint: Timestamp,
}

impl Factory {
    /// Create a factory from a spec, with accrual settled as of `now`.
    pub fn from_spec(id: FactoryId, spec: &FactorySpec, now: Timestamp) -> Self {
        Self {
            id,
            level: spec.level.max(1),
            production_rate: spec.production_rate,
            upgrade_cost: spec.upgrade_cost,
            max_level: spec.max_level,
            last_checkpoint: now,
        }
    }

    /// Rebuild a factory from persisted state. Out-of-range persisted values
    /// fall back to the spec: level is clamped to at least 1, and a
    /// non-positive rate keeps the spec default.
    pub fn restored(
        id: FactoryId,
        spec: &FactorySpec,
        level: u32,
        production_rate: f64,
        now: Timestamp,
    ) -> Self {
        let mut factory = Self::from_spec(id, spec, now);
        factory.level = level.max(1);
        if production_rate > 0.0 {
            factory.production_rate = production_rate;
        }
        factory
    }

    pub fn id(&self) -> FactoryId {
        self.id
    }

    pub fn level(&self) -> u32 {
        self.level
    }

    pub fn production_rate(&self) -> f64 {
        self.production_rate
    }

    pub fn upgrade_cost(&self) -> u64 {
        self.upgrade_cost
    }

    pub fn max_level(&self) -> u32 {
        self.max_level
    }

    /// The last instant accrual was settled for this factory.
    pub fn last_checkpoint(&self) -> Timestamp {
        self.last_checkpoint
    }

    /// Advance the checkpoint after the caller has credited accrual.
    pub(crate) fn settle(&mut self, now: Timestamp) {
        self.last_checkpoint = now;
    }

    /// Gems earned over `elapsed` seconds: `floor(rate * elapsed)`.
    ///
    /// Pure; never mutates the factory. Zero for non-positive (or NaN)
    /// elapsed time -- accrual can never be negative.
    pub fn compute_accrual(&self, elapsed: Seconds) -> u64 {
        accrue(self.production_rate, elapsed)
    }

    /// Attempt one upgrade transition.
    ///
    /// The terminal check runs BEFORE the spend, so a factory at max level
    /// never costs gems to poke. On success the level increments and the
    /// rate is reassigned from the new level (the prior rate is discarded,
    /// not scaled). The upgrade cost does not change with level.
    pub fn upgrade(&mut self, ledger: &mut GemLedger) -> Result<(), UpgradeError> {
        if self.level >= self.max_level {
            return Err(UpgradeError::MaxLevelReached);
        }
        if !ledger.try_spend(self.upgrade_cost) {
            return Err(UpgradeError::InsufficientGems);
        }
        self.level += 1;
        self.production_rate = f64::from(self.level);
        Ok(())
    }
}

/// `floor(rate * elapsed)` clamped at zero, saturating at `u64::MAX`.
pub fn accrue(rate: f64, elapsed: Seconds) -> u64 {
    if !(elapsed > 0.0) || !(rate > 0.0) {
        return 0;
    }
    let raw = (rate * elapsed).floor();
    if raw >= u64::MAX as f64 {
        u64::MAX
    } else {
        raw as u64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(seconds: f64) -> Timestamp {
        Timestamp::from_seconds(seconds)
    }

    fn make(level: u32, rate: f64) -> Factory {
        Factory::restored(
            FactoryId(0),
            &FactorySpec::default(),
            level,
            rate,
            at(0.0),
        )
    }

    #[test]
    fn accrual_is_floored() {
        let factory = make(1, 1.5);
        assert_eq!(factory.compute_accrual(1.0), 1);
        assert_eq!(factory.compute_accrual(2.0), 3);
    }

    #[test]
    fn accrual_zero_for_non_positive_elapsed() {
        let factory = make(1, 5.0);
        assert_eq!(factory.compute_accrual(0.0), 0);
        assert_eq!(factory.compute_accrual(-10.0), 0);
        assert_eq!(factory.compute_accrual(f64::NAN), 0);
    }

    #[test]
    fn accrual_monotonic_in_elapsed() {
        let factory = make(1, 0.7);
        let mut last = 0;
        for i in 0..100 {
            let now = factory.compute_accrual(i as f64 * 0.5);
            assert!(now >= last);
            last = now;
        }
    }

    #[test]
    fn tiny_rate_needs_huge_gaps() {
        // 100 s at 1e-7 gems/s floors to zero; ten million seconds yields 1.
        assert_eq!(accrue(1e-7, 100.0), 0);
        assert_eq!(accrue(1e-7, 10_000_000.0), 1);
    }

    #[test]
    fn upgrade_success_scenario() {
        // Level 1, rate 1, cost 20, 25 gems: upgrade succeeds, level 2,
        // rate 2, 5 gems left.
        let mut factory = make(1, 1.0);
        let mut ledger = GemLedger::with_total(25);

        factory.upgrade(&mut ledger).unwrap();
        assert_eq!(factory.level(), 2);
        assert_eq!(factory.production_rate(), 2.0);
        assert_eq!(ledger.total(), 5);
    }

    #[test]
    fn upgrade_rate_is_reassigned_not_scaled() {
        // A restored factory with an odd rate still snaps to rate == level.
        let mut factory = make(1, 0.25);
        let mut ledger = GemLedger::with_total(1000);

        factory.upgrade(&mut ledger).unwrap();
        assert_eq!(factory.production_rate(), 2.0);
    }

    #[test]
    fn upgrade_insufficient_gems_mutates_nothing() {
        let mut factory = make(1, 1.0);
        let mut ledger = GemLedger::with_total(20); // strict: 20 > 20 fails

        assert_eq!(
            factory.upgrade(&mut ledger),
            Err(UpgradeError::InsufficientGems)
        );
        assert_eq!(factory.level(), 1);
        assert_eq!(factory.production_rate(), 1.0);
        assert_eq!(ledger.total(), 20);
    }

    #[test]
    fn upgrade_at_max_level_fails_before_spending() {
        let mut factory = make(3, 3.0);
        let mut ledger = GemLedger::with_total(1000);

        assert_eq!(
            factory.upgrade(&mut ledger),
            Err(UpgradeError::MaxLevelReached)
        );
        assert_eq!(factory.level(), 3);
        assert_eq!(ledger.total(), 1000, "max-level poke must be free");
    }

    #[test]
    fn upgrade_walks_to_terminal_state() {
        let mut factory = make(1, 1.0);
        let mut ledger = GemLedger::with_total(1_000);

        factory.upgrade(&mut ledger).unwrap();
        factory.upgrade(&mut ledger).unwrap();
        assert_eq!(factory.level(), 3);
        assert_eq!(
            factory.upgrade(&mut ledger),
            Err(UpgradeError::MaxLevelReached)
        );
    }

    #[test]
    fn restored_clamps_bad_persisted_values() {
        let spec = FactorySpec::default();
        let factory = Factory::restored(FactoryId(1), &spec, 0, -4.0, at(0.0));
        assert_eq!(factory.level(), 1);
        assert_eq!(factory.production_rate(), spec.production_rate);
    }
}
