//! hotsift configuration
//!
//! Optional TOML file, by default /etc/hotsift/config.toml. A missing file
//! means defaults.
//!
//! ```toml
//! [logging]
//! level = "info"
//!
//! [aggregation]
//! granularity = "minute"
//!
//! [priorities]
//! "kernel-error" = 1
//!
//! [[checks]]
//! name = "lp1927868"
//! pattern = 'VRRP_Instance\(\S+\) Entering BACKUP STATE'
//! message = "keepalived flapped {count} time(s)"
//! tracker = "launchpad"
//! bug_id = "1927868"
//! ```

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::aggregate::Granularity;
use crate::checks::{CheckDefinition, CheckSet};
use crate::collector::FindingsCollector;
use crate::error::{Result, TriageError};
use crate::issues::is_known_category;

/// System configuration directory
pub const SYSTEM_CONFIG_DIR: &str = "/etc/hotsift";
const CONFIG_FILE: &str = "config.toml";

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

/// Aggregation settings
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AggregationConfig {
    #[serde(default)]
    pub granularity: Granularity,
}

/// Complete configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TriageConfig {
    #[serde(default)]
    pub logging: LogConfig,

    #[serde(default)]
    pub aggregation: AggregationConfig,

    /// Category tag -> report priority (lower first)
    #[serde(default)]
    pub priorities: HashMap<String, u32>,

    #[serde(default)]
    pub checks: Vec<CheckDefinition>,
}

impl TriageConfig {
    /// Load from `path`; defaults if the file does not exist
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            debug!("no config at {}, using defaults", path.display());
            return Ok(Self::default());
        }
        let content = fs::read_to_string(path)?;
        let config = Self::from_toml_str(&content)?;
        debug!(
            "loaded config from {} ({} priorities, {} checks)",
            path.display(),
            config.priorities.len(),
            config.checks.len()
        );
        Ok(config)
    }

    pub fn load_default() -> Result<Self> {
        Self::load(&config_path())
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_toml_string(&self) -> Result<String> {
        toml::to_string_pretty(self).map_err(|e| TriageError::Config(e.to_string()))
    }

    fn validate(&self) -> Result<()> {
        if let Some(bad) = self.priorities.keys().find(|k| !is_known_category(k)) {
            return Err(TriageError::UnknownCategory(bad.clone()));
        }
        // Compiling surfaces bad patterns and unknown categories/trackers.
        CheckSet::from_definitions(&self.checks)?;
        Ok(())
    }

    /// Collector carrying the configured priorities
    pub fn collector(&self) -> FindingsCollector {
        FindingsCollector::new().with_priorities(self.priorities.clone())
    }

    /// Built-in checks followed by the configured ones
    pub fn check_set(&self) -> Result<CheckSet> {
        let mut set = CheckSet::builtin()?;
        set.extend(CheckSet::from_definitions(&self.checks)?);
        Ok(set)
    }
}

/// Default config file path
pub fn config_path() -> PathBuf {
    PathBuf::from(SYSTEM_CONFIG_DIR).join(CONFIG_FILE)
}
