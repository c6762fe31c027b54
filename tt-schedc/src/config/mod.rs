//! Compiler configuration loading.
//!
//! The expected YAML structure is (every key optional):
//! ```yaml
//! root:
//!   name: "ecu"       # scope name before any `named` (default "root")
//!   phase: 0          # inherited phase at the root (default 0)
//!   period: 10        # inherited period at the root (default 1)
//! check_unique_names: true     # reject duplicate entry names (default false)
//! hyperperiod_limit: 1000000   # ticks (default 1 000 000)
//! ```

use std::path::Path;

use anyhow::{bail, Context as _, Result};
use serde::Deserialize;
use tracing::{debug, info};

use crate::flatten::{Context, DEFAULT_PERIOD, ROOT_NAME};
use crate::timing::DEFAULT_HYPERPERIOD_LIMIT;

// ── Private YAML deserialization types ────────────────────────────────────────

/// Top-level wrapper that maps directly onto the YAML file layout.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct ConfigFile {
    #[serde(default)]
    root: RootEntry,
    #[serde(default)]
    check_unique_names: bool,
    #[serde(default = "default_hyperperiod_limit")]
    hyperperiod_limit: u64,
}

impl Default for ConfigFile {
    fn default() -> Self {
        Self {
            root: RootEntry::default(),
            check_unique_names: false,
            hyperperiod_limit: default_hyperperiod_limit(),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RootEntry {
    #[serde(default = "default_root_name")]
    name: String,
    #[serde(default)]
    phase: u32,
    #[serde(default = "default_period")]
    period: u32,
}

impl Default for RootEntry {
    fn default() -> Self {
        Self {
            name: default_root_name(),
            phase: 0,
            period: default_period(),
        }
    }
}

fn default_root_name() -> String {
    ROOT_NAME.to_string()
}

fn default_period() -> u32 {
    DEFAULT_PERIOD
}

fn default_hyperperiod_limit() -> u64 {
    DEFAULT_HYPERPERIOD_LIMIT
}

// ── CompilerConfig ────────────────────────────────────────────────────────────

/// Settings for one compiler run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompilerConfig {
    /// Context the tree is flattened under.
    pub root: Context,
    /// Run the optional name-uniqueness pass after flattening.
    pub check_unique_names: bool,
    /// Upper bound on the table's hyperperiod, in ticks.
    pub hyperperiod_limit: u64,
}

impl Default for CompilerConfig {
    fn default() -> Self {
        Self {
            root: Context::default(),
            check_unique_names: false,
            hyperperiod_limit: DEFAULT_HYPERPERIOD_LIMIT,
        }
    }
}

impl CompilerConfig {
    /// Parses `path` into a configuration.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read, the YAML is invalid or has
    /// unknown keys, or the root context is unusable (empty name, period 0).
    pub fn load_from_file(path: &Path) -> Result<Self> {
        info!("Loading compiler configuration from: {}", path.display());

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Cannot open configuration file: {}", path.display()))?;

        Self::from_yaml_str(&content)
            .with_context(|| format!("Invalid configuration file: {}", path.display()))
    }

    /// Parses configuration from YAML text.
    pub fn from_yaml_str(content: &str) -> Result<Self> {
        // An empty document deserialises to unit, not to a map.
        let file: ConfigFile = if content.trim().is_empty() {
            ConfigFile::default()
        } else {
            serde_yaml::from_str(content).context("Failed to parse YAML")?
        };

        if file.root.name.is_empty() {
            bail!("root.name must not be empty");
        }
        if file.root.period == 0 {
            bail!("root.period must be at least 1");
        }

        let config = Self {
            root: Context::new(file.root.name, file.root.phase, file.root.period),
            check_unique_names: file.check_unique_names,
            hyperperiod_limit: file.hyperperiod_limit,
        };

        debug!(
            root = %config.root.name,
            phase = config.root.phase,
            period = config.root.period,
            check_unique_names = config.check_unique_names,
            hyperperiod_limit = config.hyperperiod_limit,
            "Compiler configuration"
        );

        Ok(config)
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
