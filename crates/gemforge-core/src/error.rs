//! Error taxonomy for the core.
//!
//! Everything here is recoverable and surfaced to the caller as a typed
//! result; nothing panics across the core boundary. Missing persisted state
//! is deliberately NOT an error -- it is the first-run signal, modeled as
//! `Option` in the persistence layer.

use crate::factory::FactoryId;

/// Why an upgrade attempt failed. Neither variant mutates any state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum UpgradeError {
    /// The ledger balance did not cover the upgrade cost.
    #[error("not enough gems for the upgrade")]
    InsufficientGems,

    /// The factory is already at its terminal level.
    #[error("factory is already at max level")]
    MaxLevelReached,
}

/// Why a build attempt failed. Neither variant mutates any state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum BuildError {
    /// The ledger balance did not cover the build cost.
    #[error("not enough gems to build a factory")]
    InsufficientGems,

    /// The factory cap has been reached.
    #[error("factory limit reached")]
    FactoryLimitReached,
}

/// Errors surfaced by session-level operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum SessionError {
    /// No factory with the given id exists in the registry.
    #[error("no factory with id {0:?}")]
    UnknownFactory(FactoryId),

    /// An upgrade failed.
    #[error(transparent)]
    Upgrade(#[from] UpgradeError),

    /// A build failed.
    #[error(transparent)]
    Build(#[from] BuildError),
}
