//! The JSON save document: per-factory state that must round-trip losslessly.

use serde::{Deserialize, Serialize};

/// Persisted state of one factory. Identity is positional: factories are
/// stored in registry order and reassigned the same ids on load.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FactoryState {
    /// Upgrade level, `1..=max_level`.
    pub level: u32,

    /// Gems produced per second of elapsed time.
    pub production_rate: f64,
}

/// Top-level save document, serialized as human-readable JSON.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SaveDocument {
    /// Factory states in registry (creation) order.
    pub units: Vec<FactoryState>,
}

impl SaveDocument {
    /// Build a document from an iterator of `(level, production_rate)` pairs.
    pub fn from_states<I>(states: I) -> Self
    where
        I: IntoIterator<Item = (u32, f64)>,
    {
        Self {
            units: states
                .into_iter()
                .map(|(level, production_rate)| FactoryState {
                    level,
                    production_rate,
                })
                .collect(),
        }
    }
}
