//! The per-tick recomputation step.
//!
//! One tick recomputes everything from the current wall-clock instant:
//!
//! 1. **Derive** -- query the life clock for the cycle state.
//! 2. **Drift** -- step the tank movement (free-swimming phases only).
//! 3. **Measure** -- remaining/elapsed seconds in phase and body length.
//! 4. **Status** -- resolve the daily status message through the cache.
//!
//! The tick is deterministic given the same instant, seed, tick counter,
//! and cache contents. There are no tick-time failure modes: the clock is
//! pure, and cache irregularities degrade to a fresh message roll.

use aurelia_types::{DriftState, Phase};
use aurelia_world::Drifter;
use chrono::{DateTime, Utc};
use rand::Rng;
use tracing::debug;

use crate::clock::LifeClock;
use crate::status::{self, MessagePools, StatusStore};

/// Summary of a single tick, carrying everything a render sink needs for
/// one frame.
#[derive(Debug, Clone, PartialEq)]
pub struct TickSummary {
    /// The tick number that was executed.
    pub tick: u64,
    /// Life-cycle iteration number.
    pub cycle: i64,
    /// Current phase.
    pub phase: Phase,
    /// Whole seconds elapsed in the current cycle.
    pub seconds_in_cycle: u64,
    /// Seconds until the current phase ends.
    pub remaining_in_phase: u64,
    /// Seconds since the current phase began.
    pub elapsed_in_phase: u64,
    /// Simulated body length in centimeters.
    pub body_length_cm: f64,
    /// The daily status message.
    pub status: String,
    /// Whether the jellyfish sprite is visible (free-swimming phases).
    pub visible: bool,
    /// Sprite x position in the tank.
    pub x: f64,
    /// Sprite y position in the tank.
    pub y: f64,
}

/// The mutable simulation state passed through the tick cycle.
///
/// This bundles everything the loop needs: the pure clock, the drift
/// stepper and its state, the message pools, and the status timezone
/// parameters. It is an explicit struct owned by the run loop -- nothing
/// in the simulator lives in ambient module-level state.
#[derive(Debug)]
pub struct SimulationState {
    /// The life clock.
    pub clock: LifeClock,
    /// The drift stepper (immutable movement parameters).
    pub drifter: Drifter,
    /// The mutable drift state.
    pub drift: DriftState,
    /// Per-phase status message pools.
    pub pools: MessagePools,
    /// Hour offset from UTC for the status day key.
    pub status_utc_offset_hours: i32,
    /// Hour of day (status timezone) for the daily cache reset.
    pub status_reset_hour: u32,
    /// Tick counter, incremented at the start of each tick.
    pub tick: u64,
}

/// Execute one complete tick of the simulation.
///
/// This is the only place the subsystems meet: clock derivation, drift
/// stepping, growth measurement, and status resolution happen here, in
/// that order, and the results are returned as a [`TickSummary`].
pub fn run_tick<R: Rng>(
    state: &mut SimulationState,
    store: &dyn StatusStore,
    rng: &mut R,
    now: DateTime<Utc>,
) -> TickSummary {
    state.tick = state.tick.saturating_add(1);

    // --- Derive ---
    let cycle_state = state.clock.state_at(now);

    // --- Drift ---
    // Milliseconds since the origin drive the turn timer; instants before
    // the origin clamp to zero, which merely delays the first turn.
    let ms = now
        .signed_duration_since(state.clock.origin())
        .num_milliseconds();
    let now_ms = u64::try_from(ms.max(0)).unwrap_or(0);
    state
        .drifter
        .step(&mut state.drift, cycle_state.phase, now_ms, state.tick);

    // --- Measure ---
    let remaining_in_phase = state.clock.remaining_in_phase(&cycle_state);
    let elapsed_in_phase = state.clock.elapsed_in_phase(&cycle_state);
    let body_length_cm = state.clock.body_length_cm(&cycle_state);

    // --- Status ---
    let status = status::resolve(
        store,
        &state.pools,
        cycle_state.phase,
        now,
        state.status_utc_offset_hours,
        rng,
    );

    debug!(
        tick = state.tick,
        cycle = cycle_state.cycle,
        phase = %cycle_state.phase,
        seconds_in_cycle = cycle_state.seconds_in_cycle,
        remaining_in_phase,
        body_length_cm,
        "Tick completed"
    );

    TickSummary {
        tick: state.tick,
        cycle: cycle_state.cycle,
        phase: cycle_state.phase,
        seconds_in_cycle: cycle_state.seconds_in_cycle,
        remaining_in_phase,
        elapsed_in_phase,
        body_length_cm,
        status,
        visible: cycle_state.phase.is_free_swimming(),
        x: state.drift.x,
        y: state.drift.y,
    }
}
