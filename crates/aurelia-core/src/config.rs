//! Configuration loading and typed config structures for the Aurelia
//! simulator.
//!
//! The canonical configuration lives in `aurelia-config.yaml` at the
//! project root. This module defines strongly-typed structs that mirror
//! the YAML structure, and provides a loader that reads and validates the
//! file. Every section is optional; the defaults reproduce the original
//! widget's constants (20-day cycle, UTC-5 day key, 05:00 reset, 1280x720
//! tank).
//!
//! The phase table is deliberately injectable rather than hardcoded: the
//! repository ships `demo-config.yaml` with all durations shortened to 5
//! seconds so a full cycle can be watched in under a minute.

use std::collections::BTreeMap;
use std::path::Path;

use serde::Deserialize;

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read the configuration file from disk.
    #[error("failed to read config file: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },

    /// Failed to parse YAML content.
    #[error("failed to parse config YAML: {source}")]
    Yaml {
        /// The underlying YAML parse error.
        source: serde_yml::Error,
    },
}

impl From<serde_yml::Error> for ConfigError {
    fn from(source: serde_yml::Error) -> Self {
        Self::Yaml { source }
    }
}

/// Top-level simulator configuration.
///
/// Mirrors the structure of `aurelia-config.yaml`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct SimulationConfig {
    /// Life-cycle settings (origin instant, phase table).
    #[serde(default)]
    pub lifecycle: LifecycleConfig,

    /// Daily status message settings.
    #[serde(default)]
    pub status: StatusConfig,

    /// Tank geometry and drift parameters.
    #[serde(default)]
    pub tank: TankConfig,

    /// Engine loop settings.
    #[serde(default)]
    pub engine: EngineConfig,

    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl SimulationConfig {
    /// Load configuration from a YAML file at the given path.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read, or
    /// [`ConfigError::Yaml`] if the content is not valid YAML.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        let config: Self = serde_yml::from_str(&contents)?;
        Ok(config)
    }

    /// Parse configuration from a YAML string.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Yaml`] if the string is not valid YAML.
    pub fn parse(yaml: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_yml::from_str(yaml)?;
        Ok(config)
    }
}

/// One phase entry in the configured table.
///
/// Order within the list is significant: it defines the sequence phases
/// occur in within one cycle.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct PhaseEntry {
    /// Phase name (`polyp`, `ephyra`, `medusa`, `medusa_end`).
    pub name: String,

    /// Duration of the phase in seconds.
    pub seconds: u64,

    /// Body-length growth rate while in this phase, in cm/second.
    #[serde(default)]
    pub growth_rate_cm_per_sec: f64,
}

/// Life-cycle configuration.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct LifecycleConfig {
    /// RFC 3339 instant marking the start of cycle 1.
    #[serde(default = "default_origin")]
    pub origin: String,

    /// Ordered phase table.
    #[serde(default = "default_phases")]
    pub phases: Vec<PhaseEntry>,
}

impl Default for LifecycleConfig {
    fn default() -> Self {
        Self {
            origin: default_origin(),
            phases: default_phases(),
        }
    }
}

/// Daily status message configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct StatusConfig {
    /// Hour offset from UTC used to derive the day key.
    #[serde(default = "default_utc_offset_hours")]
    pub utc_offset_hours: i32,

    /// Hour of day (in the status timezone) at which the cached status
    /// is cleared so a fresh message is rolled.
    #[serde(default = "default_reset_hour")]
    pub reset_hour: u32,

    /// Per-phase message pool overrides, keyed by phase name. Phases not
    /// listed keep the built-in pools.
    #[serde(default)]
    pub messages: BTreeMap<String, Vec<String>>,
}

impl Default for StatusConfig {
    fn default() -> Self {
        Self {
            utc_offset_hours: default_utc_offset_hours(),
            reset_hour: default_reset_hour(),
            messages: BTreeMap::new(),
        }
    }
}

/// Tank geometry and drift parameters.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct TankConfig {
    /// Tank width in pixels.
    #[serde(default = "default_tank_width")]
    pub width: f64,

    /// Tank height in pixels.
    #[serde(default = "default_tank_height")]
    pub height: f64,

    /// Sprite edge length in pixels (the drift area is inset by this).
    #[serde(default = "default_sprite_size")]
    pub sprite_size: f64,

    /// Drift speed in pixels per tick.
    #[serde(default = "default_swim_speed")]
    pub swim_speed: f64,

    /// Milliseconds between heading jitters.
    #[serde(default = "default_turn_interval_ms")]
    pub turn_interval_ms: u64,

    /// Seed for the deterministic drift randomness.
    #[serde(default = "default_seed")]
    pub seed: u64,
}

impl Default for TankConfig {
    fn default() -> Self {
        Self {
            width: default_tank_width(),
            height: default_tank_height(),
            sprite_size: default_sprite_size(),
            swim_speed: default_swim_speed(),
            turn_interval_ms: default_turn_interval_ms(),
            seed: default_seed(),
        }
    }
}

/// Engine loop configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct EngineConfig {
    /// Real-time milliseconds between ticks.
    #[serde(default = "default_tick_interval_ms")]
    pub tick_interval_ms: u64,

    /// Maximum number of ticks before the run ends (0 = unlimited).
    #[serde(default)]
    pub max_ticks: u64,

    /// Maximum wall-clock seconds before the run ends (0 = unlimited).
    #[serde(default)]
    pub max_real_time_seconds: u64,

    /// Path of the status cache database file.
    #[serde(default = "default_store_path")]
    pub store_path: String,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            tick_interval_ms: default_tick_interval_ms(),
            max_ticks: 0,
            max_real_time_seconds: 0,
            store_path: default_store_path(),
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

// ---------------------------------------------------------------------------
// Default value functions (serde default requires named functions)
// ---------------------------------------------------------------------------

fn default_origin() -> String {
    "2025-06-11T00:00:00Z".to_owned()
}

fn default_phases() -> Vec<PhaseEntry> {
    vec![
        PhaseEntry {
            name: "polyp".to_owned(),
            seconds: 259_200, // 3 days
            growth_rate_cm_per_sec: 0.0,
        },
        PhaseEntry {
            name: "ephyra".to_owned(),
            seconds: 604_800, // 7 days
            growth_rate_cm_per_sec: 0.01,
        },
        PhaseEntry {
            name: "medusa".to_owned(),
            seconds: 604_800, // 7 days
            growth_rate_cm_per_sec: 0.01,
        },
        PhaseEntry {
            name: "medusa_end".to_owned(),
            seconds: 259_200, // 3 days
            growth_rate_cm_per_sec: 0.005,
        },
    ]
}

const fn default_utc_offset_hours() -> i32 {
    -5
}

const fn default_reset_hour() -> u32 {
    5
}

const fn default_tank_width() -> f64 {
    1280.0
}

const fn default_tank_height() -> f64 {
    720.0
}

const fn default_sprite_size() -> f64 {
    32.0
}

const fn default_swim_speed() -> f64 {
    0.3
}

const fn default_turn_interval_ms() -> u64 {
    3000
}

const fn default_seed() -> u64 {
    42
}

const fn default_tick_interval_ms() -> u64 {
    300
}

fn default_store_path() -> String {
    "aurelia-status.redb".to_owned()
}

fn default_log_level() -> String {
    "info".to_owned()
}
