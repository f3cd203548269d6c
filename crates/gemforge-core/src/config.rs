//! Game configuration: factory defaults and economy tuning.
//!
//! All tuning values live in one [`GameConfig`] so the assembly seam decides
//! them once. Configs can be loaded from a RON data file or taken from
//! [`Default`].

use crate::clock::Seconds;
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Errors that can occur while loading a config file.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// An I/O error occurred reading the file.
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// The file could not be parsed as a `GameConfig`.
    #[error("parse error in {file}: {detail}")]
    Parse { file: PathBuf, detail: String },
}

/// Template for newly created factories.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct FactorySpec {
    /// Starting upgrade level.
    pub level: u32,

    /// Starting gems-per-second. The default is deliberately tiny;
    /// upgrading reassigns the rate from the level.
    pub production_rate: f64,

    /// Cost of one upgrade, in gems. Static across levels (see DESIGN.md
    /// open questions).
    pub upgrade_cost: u64,

    /// Terminal level. Upgrades at this level always fail.
    pub max_level: u32,
}

impl Default for FactorySpec {
    fn default() -> Self {
        Self {
            level: 1,
            production_rate: 1e-7,
            upgrade_cost: 20,
            max_level: 3,
        }
    }
}

/// Process-wide economy tuning.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Template for the first-run factory and every built factory.
    pub starting_factory: FactorySpec,

    /// Cost of building an additional factory, in gems.
    pub build_cost: u64,

    /// Hard cap on the number of factories.
    pub max_factories: usize,

    /// Accumulated real time required to fire one production tick.
    pub tick_interval: Seconds,

    /// Global gems-per-second rate used for offline catch-up. Catch-up
    /// deliberately uses one global rate rather than per-factory rates
    /// (see DESIGN.md open questions).
    pub offline_rate: f64,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            starting_factory: FactorySpec::default(),
            build_cost: 10,
            max_factories: 100,
            tick_interval: 1.0,
            offline_rate: 1e-7,
        }
    }
}

impl GameConfig {
    /// Load a config from a RON file. Missing fields fall back to defaults.
    pub fn load_ron(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        ron::from_str(&content).map_err(|e| ConfigError::Parse {
            file: path.to_path_buf(),
            detail: e.to_string(),
        })
    }
}
