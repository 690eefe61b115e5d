//! Life clock, tick cycle, and orchestration for the Aurelia jellyfish
//! simulator.
//!
//! This crate owns the phase/time calculator that anchors the jellyfish's
//! life cycle to real wall-clock time, and the fixed-interval tick cycle
//! built around it.
//!
//! # Modules
//!
//! - [`clock`] -- Life clock: derives cycle number, current phase, and
//!   seconds-in-cycle from the origin instant and the phase table.
//! - [`config`] -- Configuration loading from `aurelia-config.yaml` into
//!   strongly-typed structs.
//! - [`status`] -- Daily status message selection and the [`StatusStore`]
//!   cache seam.
//! - [`tick`] -- The per-tick recomputation step and [`SimulationState`].
//! - [`runner`] -- The bounded fixed-interval simulation loop and the
//!   [`RenderSink`] callback.
//!
//! [`StatusStore`]: status::StatusStore
//! [`SimulationState`]: tick::SimulationState
//! [`RenderSink`]: runner::RenderSink

pub mod clock;
pub mod config;
pub mod runner;
pub mod status;
pub mod tick;
