//! Shared type definitions for the Aurelia jellyfish simulator.
//!
//! This crate is the single source of truth for the types used across the
//! Aurelia workspace: the life-cycle phase enumeration, the derived cycle
//! state, the drift state of the swimming jellyfish, and the cached daily
//! status record.
//!
//! # Modules
//!
//! - [`enums`] -- The [`Phase`] enumeration and its display labels.
//! - [`structs`] -- Derived and runtime state structs ([`CycleState`],
//!   [`DriftState`], [`CachedStatus`]).

pub mod enums;
pub mod structs;

// Re-export all public types at crate root for convenience.
pub use enums::Phase;
pub use structs::{CachedStatus, CycleState, DriftState};
