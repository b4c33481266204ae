//! # Pool Configuration
//!
//! Serializable settings for the pool registry and the warmup driver. Files are
//! loaded through the [`Config`] trait, so either TOML or RON works:
//!
//! ```toml
//! default_initial_size = 8
//! pools_visible = false
//! log_level = "debug"
//!
//! [warmup]
//! slice_budget_ms = 2
//!
//! [[warmup.entries]]
//! template = "Bullet"
//! amount = 64
//! ```

use serde::{Serialize, Deserialize};
use std::time::Duration;

pub use crate::config::{Config, ConfigError};

/// Initial pool size used when a spawn call creates a pool implicitly
pub const DEFAULT_INITIAL_POOL_SIZE: usize = 5;

const LOG_LEVELS: [&str; 6] = ["off", "error", "warn", "info", "debug", "trace"];

/// # Pool Configuration
///
/// Registry-wide defaults: implicit pool size, hierarchy visibility of pooled
/// objects, logging level and the warmup manifest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PoolConfig {
    /// Number of objects a pool starts with when created by a spawn call
    pub default_initial_size: usize,
    /// Whether pooled objects are shown in the scene hierarchy
    pub pools_visible: bool,
    /// Default log filter when `RUST_LOG` is unset
    pub log_level: String,
    /// Pools to pre-fill at startup
    pub warmup: WarmupConfig,
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            default_initial_size: DEFAULT_INITIAL_POOL_SIZE,
            pools_visible: true,
            log_level: "info".to_string(),
            warmup: WarmupConfig::default(),
        }
    }
}

impl Config for PoolConfig {}

impl PoolConfig {
    /// Set the implicit initial pool size
    pub fn with_default_initial_size(mut self, size: usize) -> Self {
        self.default_initial_size = size;
        self
    }
    
    /// Show or hide pooled objects in the hierarchy
    pub fn with_pools_visible(mut self, visible: bool) -> Self {
        self.pools_visible = visible;
        self
    }

    /// Set the default log filter
    pub fn with_log_level(mut self, level: impl Into<String>) -> Self {
        self.log_level = level.into();
        self
    }

    /// Replace the warmup manifest
    pub fn with_warmup(mut self, warmup: WarmupConfig) -> Self {
        self.warmup = warmup;
        self
    }
    
    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !LOG_LEVELS.contains(&self.log_level.to_ascii_lowercase().as_str()) {
            return Err(ConfigError::Invalid(format!(
                "unknown log level '{}'",
                self.log_level
            )));
        }
        
        self.warmup.validate()
    }
}

/// # Warmup Configuration
///
/// Named templates to pre-fill and how much time each frame may spend doing it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WarmupConfig {
    /// Per-slice time budget in milliseconds (0 = fill everything at once)
    pub slice_budget_ms: u64,
    /// Templates to fill, in order
    pub entries: Vec<WarmupSpec>,
}

impl WarmupConfig {
    /// Per-slice time budget
    pub fn slice_budget(&self) -> Duration {
        Duration::from_millis(self.slice_budget_ms)
    }

    /// Append an entry
    pub fn with_entry(mut self, template: impl Into<String>, amount: usize) -> Self {
        self.entries.push(WarmupSpec {
            template: template.into(),
            amount,
        });
        self
    }

    /// Validate the manifest
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(index) = self.entries.iter().position(|e| e.template.trim().is_empty()) {
            return Err(ConfigError::Invalid(format!(
                "warmup entry {index} has an empty template name"
            )));
        }
        Ok(())
    }
}

/// One warmup entry: fill the pool of the named template up to `amount`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WarmupSpec {
    /// Template name as registered in the scene
    pub template: String,
    /// Target pool size
    pub amount: usize,
}
