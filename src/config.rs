use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Default location of the engine configuration file.
pub const DEFAULT_CONFIG_PATH: &str = "config/craftbench.toml";

/// Engine settings loaded from TOML.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Number of player inventory slots.
    pub inventory_slots: usize,
    /// Items JSON file. The bundled catalog is used when unset.
    pub items_path: Option<PathBuf>,
    /// Recipes JSON file. The bundled recipes are used when unset.
    pub recipes_path: Option<PathBuf>,
    /// Log filter applied when `RUST_LOG` is not set.
    pub log_filter: String,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            inventory_slots: craftbench_engine::INVENTORY_SIZE,
            items_path: None,
            recipes_path: None,
            log_filter: "warn".to_string(),
        }
    }
}

impl EngineConfig {
    /// Read and parse a config file, returning errors to the caller.
    pub fn read(path: &Path) -> Result<Self> {
        let contents =
            fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))?;
        let config: EngineConfig = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse {}", path.display()))?;
        if config.inventory_slots == 0 {
            anyhow::bail!("{}: inventory_slots must be at least 1", path.display());
        }
        Ok(config)
    }
}
