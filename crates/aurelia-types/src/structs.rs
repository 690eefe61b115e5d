//! Core state structs for the Aurelia simulator.

use serde::{Deserialize, Serialize};

use crate::enums::Phase;

/// Derived temporal state of the jellyfish at a single instant.
///
/// A `CycleState` is a pure function of "now", the fixed origin, and the
/// phase table. It is recomputed on every query and never persisted as
/// authoritative state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CycleState {
    /// Life-cycle iteration number. Cycle 1 starts at the origin instant;
    /// instants before the origin yield values `<= 0`.
    pub cycle: i64,

    /// The phase the subject is currently in.
    pub phase: Phase,

    /// Whole seconds elapsed since the start of the current cycle.
    /// Always in `[0, total_cycle_seconds)`, including before the origin.
    pub seconds_in_cycle: u64,
}

/// Mutable drift state of the free-swimming jellyfish.
///
/// Owned by the simulation state and stepped once per tick. Positions are
/// in tank pixels, headings in radians.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DriftState {
    /// Horizontal position of the sprite's top-left corner.
    pub x: f64,

    /// Vertical position of the sprite's top-left corner.
    pub y: f64,

    /// Current heading in radians.
    pub heading: f64,

    /// Milliseconds-since-origin timestamp of the last heading jitter.
    pub last_turn_ms: u64,
}

/// The cached daily status message.
///
/// This is the only persisted value in the system, and it is a display
/// cache only: losing it merely causes a fresh message roll.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CachedStatus {
    /// Day key (`YYYY-MM-DD` in the configured status timezone).
    pub day_key: String,

    /// Phase the message was rolled for.
    pub phase: Phase,

    /// The message text shown to the viewer.
    pub text: String,
}
