//! Drift movement: per-tick position updates with deterministic heading
//! jitter and wall reflection.
//!
//! # Determinism
//!
//! Heading jitter uses a `xorshift64` PRNG seeded from `(seed, tick)`, so
//! the same seed and tick sequence always produce the same trajectory.
//! This keeps simulation runs reproducible and makes the movement easy to
//! test without mocking a random number generator.

use std::f64::consts::PI;

use aurelia_types::{DriftState, Phase};

use crate::tank::{TankBounds, TankError};

/// Maximum heading change per jitter, in radians (plus or minus half).
const JITTER_ARC: f64 = PI / 6.0;

/// Per-tick drift stepper for the free-swimming jellyfish.
///
/// Owns the immutable movement parameters; the mutable [`DriftState`]
/// lives in the simulation state and is passed into each step.
#[derive(Debug, Clone, PartialEq)]
pub struct Drifter {
    /// The reachable tank area.
    bounds: TankBounds,

    /// Drift speed in pixels per tick.
    speed: f64,

    /// Milliseconds between heading jitters.
    turn_interval_ms: u64,

    /// Seed for the deterministic jitter randomness.
    seed: u64,
}

impl Drifter {
    /// Create a drifter.
    ///
    /// # Errors
    ///
    /// Returns [`TankError::InvalidBounds`] if the speed is non-finite
    /// or negative.
    pub fn new(
        bounds: TankBounds,
        speed: f64,
        turn_interval_ms: u64,
        seed: u64,
    ) -> Result<Self, TankError> {
        if !speed.is_finite() || speed < 0.0 {
            return Err(TankError::InvalidBounds {
                reason: "drift speed must be finite and non-negative".to_owned(),
            });
        }
        Ok(Self {
            bounds,
            speed,
            turn_interval_ms,
            seed,
        })
    }

    /// Initial drift state: tank center, heading derived from the seed.
    pub fn initial_state(&self) -> DriftState {
        let (x, y) = self.bounds.center();
        let heading = unit_random(self.seed, 0) * 2.0 * PI;
        DriftState {
            x,
            y,
            heading,
            last_turn_ms: 0,
        }
    }

    /// Advance the drift state by one tick.
    ///
    /// Sessile phases do not move at all: position, heading, and the
    /// turn timer are left untouched. For free-swimming phases the
    /// heading jitters by up to half the jitter arc in either direction
    /// once per turn interval, the position advances along the heading,
    /// and wall hits reflect the heading and clamp the position back
    /// inside the reachable area.
    pub fn step(&self, drift: &mut DriftState, phase: Phase, now_ms: u64, tick: u64) {
        if !phase.is_free_swimming() {
            return;
        }

        if now_ms.saturating_sub(drift.last_turn_ms) > self.turn_interval_ms {
            let roll = unit_random(self.seed, tick);
            drift.heading += (roll - 0.5) * JITTER_ARC;
            drift.last_turn_ms = now_ms;
        }

        drift.x += drift.heading.cos() * self.speed;
        drift.y += drift.heading.sin() * self.speed;

        if drift.x < 0.0 || drift.x > self.bounds.max_x() {
            drift.heading = PI - drift.heading;
            drift.x = drift.x.clamp(0.0, self.bounds.max_x());
        }
        if drift.y < 0.0 || drift.y > self.bounds.max_y() {
            drift.heading = -drift.heading;
            drift.y = drift.y.clamp(0.0, self.bounds.max_y());
        }
    }

    /// The reachable tank area.
    pub const fn bounds(&self) -> &TankBounds {
        &self.bounds
    }

    /// Drift speed in pixels per tick.
    pub const fn speed(&self) -> f64 {
        self.speed
    }
}

/// Deterministic pseudo-random number generator using `xorshift64`.
///
/// Combines the seed and tick number with a mixing step to avoid trivial
/// patterns. The same inputs always produce the same output.
const fn deterministic_random(seed: u64, tick: u64) -> u64 {
    // The constant 0x517cc1b727220a95 is a well-known mixing constant.
    let mut state = seed.wrapping_add(tick.wrapping_mul(0x517c_c1b7_2722_0a95));

    // xorshift requires non-zero input.
    if state == 0 {
        state = 0xdead_beef_cafe_babe;
    }

    // xorshift64 algorithm
    state ^= state << 13;
    state ^= state >> 7;
    state ^= state << 17;

    state
}

/// Map a deterministic draw into `[0, 1)`.
fn unit_random(seed: u64, tick: u64) -> f64 {
    let raw = deterministic_random(seed, tick);
    // The top 32 bits always fit in u32.
    let hi = u32::try_from(raw >> 32).unwrap_or(0);
    f64::from(hi) / 4_294_967_296.0
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    clippy::arithmetic_side_effects,
    clippy::float_cmp
)]
mod tests {
    use super::*;

    fn drifter() -> Drifter {
        let bounds = TankBounds::new(200.0, 100.0, 20.0).unwrap();
        Drifter::new(bounds, 1.0, 1000, 42).unwrap()
    }

    #[test]
    fn polyp_never_moves() {
        let drifter = drifter();
        let mut state = drifter.initial_state();
        let before = state;
        for tick in 0..100 {
            drifter.step(&mut state, Phase::Polyp, tick * 500, tick);
        }
        assert_eq!(state, before);
    }

    #[test]
    fn free_swimmer_moves() {
        let drifter = drifter();
        let mut state = drifter.initial_state();
        let before = state;
        drifter.step(&mut state, Phase::Medusa, 0, 0);
        assert!(state.x != before.x || state.y != before.y);
    }

    #[test]
    fn position_stays_inside_bounds() {
        let drifter = drifter();
        let mut state = drifter.initial_state();
        for tick in 0..10_000 {
            drifter.step(&mut state, Phase::Medusa, tick * 100, tick);
            assert!(
                drifter.bounds().contains(state.x, state.y),
                "escaped at tick {tick}: ({}, {})",
                state.x,
                state.y
            );
        }
    }

    #[test]
    fn x_wall_reflects_heading_horizontally() {
        let drifter = drifter();
        // Heading straight right, one step away from the right wall.
        let mut state = DriftState {
            x: drifter.bounds().max_x() - 0.5,
            y: 40.0,
            heading: 0.0,
            last_turn_ms: 0,
        };
        drifter.step(&mut state, Phase::Medusa, 0, 0);
        // Reflected heading points left: cos(pi - 0) = -1.
        assert!((state.heading - PI).abs() < 1e-9);
        assert!(state.x <= drifter.bounds().max_x());
    }

    #[test]
    fn y_wall_reflects_heading_vertically() {
        let drifter = drifter();
        // Heading straight down, one step away from the bottom wall.
        let mut state = DriftState {
            x: 50.0,
            y: drifter.bounds().max_y() - 0.5,
            heading: PI / 2.0,
            last_turn_ms: 0,
        };
        drifter.step(&mut state, Phase::Medusa, 0, 0);
        assert!((state.heading + PI / 2.0).abs() < 1e-9);
        assert!(state.y <= drifter.bounds().max_y());
    }

    #[test]
    fn heading_jitters_only_after_the_turn_interval() {
        let drifter = drifter();
        let mut state = drifter.initial_state();
        let heading_before = state.heading;

        // Inside the interval: no jitter (movement only).
        drifter.step(&mut state, Phase::Medusa, 500, 1);
        assert!((state.heading - heading_before).abs() < 1e-9);

        // Past the interval: the heading changes and the timer advances.
        drifter.step(&mut state, Phase::Medusa, 1500, 2);
        assert_eq!(state.last_turn_ms, 1500);
    }

    #[test]
    fn jitter_is_bounded_by_the_arc() {
        let drifter = drifter();
        for tick in 0..1000 {
            let roll = unit_random(42, tick);
            let delta = (roll - 0.5) * JITTER_ARC;
            assert!(delta.abs() <= JITTER_ARC / 2.0 + 1e-12);
        }
    }

    #[test]
    fn same_seed_and_ticks_reproduce_the_same_trajectory() {
        let drifter = drifter();
        let mut a = drifter.initial_state();
        let mut b = drifter.initial_state();
        for tick in 0..500 {
            drifter.step(&mut a, Phase::Ephyra, tick * 400, tick);
            drifter.step(&mut b, Phase::Ephyra, tick * 400, tick);
        }
        assert_eq!(a, b);
    }

    #[test]
    fn deterministic_random_is_reproducible_and_seed_sensitive() {
        assert_eq!(deterministic_random(42, 100), deterministic_random(42, 100));
        assert_ne!(deterministic_random(42, 100), deterministic_random(43, 100));
        assert_ne!(deterministic_random(42, 100), deterministic_random(42, 101));
    }

    #[test]
    fn unit_random_is_in_range() {
        for tick in 0..1000 {
            let value = unit_random(7, tick);
            assert!((0.0..1.0).contains(&value));
        }
    }

    #[test]
    fn negative_speed_is_rejected() {
        let bounds = TankBounds::new(200.0, 100.0, 20.0).unwrap();
        assert!(Drifter::new(bounds, -0.1, 1000, 42).is_err());
        assert!(Drifter::new(bounds, f64::NAN, 1000, 42).is_err());
    }
}
