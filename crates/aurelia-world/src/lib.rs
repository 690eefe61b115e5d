//! Tank geometry and drift movement for the Aurelia jellyfish simulator.
//!
//! This crate models the physical side of the simulation: the bounded
//! 2-D tank the jellyfish drifts in, and the per-tick drift stepping with
//! deterministic heading jitter and wall reflection.
//!
//! # Modules
//!
//! - [`tank`] -- [`TankBounds`]: the drift area, inset by the sprite size.
//! - [`drift`] -- [`Drifter`]: per-tick movement with seeded, reproducible
//!   heading jitter; the polyp phase never moves.
//!
//! [`TankBounds`]: tank::TankBounds
//! [`Drifter`]: drift::Drifter

pub mod drift;
pub mod tank;

// Re-export primary types at crate root.
pub use drift::Drifter;
pub use tank::{TankBounds, TankError};
