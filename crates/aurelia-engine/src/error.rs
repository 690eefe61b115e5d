//! Error types for the engine binary.
//!
//! [`EngineError`] is the top-level error type that wraps all possible
//! failure modes during engine startup. Everything here is fatal: once
//! the loop is running, irregularities degrade gracefully instead of
//! erroring.

/// Top-level error for the engine binary.
///
/// Each variant wraps a specific subsystem error, providing a single
/// error type that `main` can propagate with `?`.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// Configuration loading failed.
    #[error("config error: {source}")]
    Config {
        /// The underlying config error.
        #[from]
        source: aurelia_core::config::ConfigError,
    },

    /// Life clock initialization failed.
    #[error("clock error: {source}")]
    Clock {
        /// The underlying clock error.
        #[from]
        source: aurelia_core::clock::ClockError,
    },

    /// Message pool construction failed.
    #[error("status error: {source}")]
    Status {
        /// The underlying status error.
        #[from]
        source: aurelia_core::status::StatusError,
    },

    /// Tank geometry construction failed.
    #[error("tank error: {source}")]
    Tank {
        /// The underlying tank error.
        #[from]
        source: aurelia_world::TankError,
    },
}
