//! Bounded fixed-interval simulation loop.
//!
//! This module provides [`run_simulation`], the top-level async function
//! that drives the tick cycle on a single fixed interval with support for:
//!
//! - **Bounded runs**: stop after `max_ticks` or `max_real_time_seconds`
//!   (0 means unlimited; with both at 0 the loop runs until the process
//!   is stopped).
//! - **Daily status reset**: when the wall clock crosses the configured
//!   reset boundary, the status cache is cleared so the next tick rolls a
//!   fresh message.
//!
//! One timer discipline only: every derived value is recomputed inside
//! the same interval callback. The runner wraps the single-tick
//! [`run_tick`] function and adds the control plane around it.
//!
//! [`run_tick`]: crate::tick::run_tick

use chrono::Utc;
use rand::Rng;
use tracing::{info, warn};

use crate::status::{self, StatusStore};
use crate::tick::{self, SimulationState, TickSummary};

/// The reason a bounded simulation run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SimulationEndReason {
    /// The configured tick limit was reached.
    MaxTicksReached,
    /// The configured wall-clock limit was reached.
    MaxRealTimeReached,
}

/// Boundaries and pacing for a simulation run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunBounds {
    /// Real-time milliseconds between ticks (0 = no sleep, for tests).
    pub tick_interval_ms: u64,
    /// Maximum number of ticks (0 = unlimited).
    pub max_ticks: u64,
    /// Maximum wall-clock seconds (0 = unlimited).
    pub max_real_time_seconds: u64,
}

impl From<&crate::config::EngineConfig> for RunBounds {
    fn from(config: &crate::config::EngineConfig) -> Self {
        Self {
            tick_interval_ms: config.tick_interval_ms,
            max_ticks: config.max_ticks,
            max_real_time_seconds: config.max_real_time_seconds,
        }
    }
}

/// Result of a simulation run.
#[derive(Debug)]
pub struct SimulationResult {
    /// The reason the run ended.
    pub end_reason: SimulationEndReason,
    /// The last tick summary, if any tick completed.
    pub final_summary: Option<TickSummary>,
    /// Total number of ticks executed.
    pub total_ticks: u64,
}

/// Callback invoked after each tick completes.
///
/// Implementations render the tick summary somewhere: the terminal, a
/// test buffer, anywhere. The simulator core never formats output itself.
pub trait RenderSink: Send {
    /// Called after a tick completes.
    fn on_tick(&mut self, summary: &TickSummary);
}

/// A no-op render sink for testing.
pub struct NoOpSink;

impl RenderSink for NoOpSink {
    fn on_tick(&mut self, _summary: &TickSummary) {}
}

/// Run the simulation loop until a termination condition is met.
///
/// Integrates the tick cycle with the run boundaries and the daily
/// status reset. With both limits at 0 this future never resolves; the
/// engine relies on process shutdown in that case.
pub async fn run_simulation<R: Rng>(
    state: &mut SimulationState,
    store: &dyn StatusStore,
    rng: &mut R,
    bounds: RunBounds,
    sink: &mut dyn RenderSink,
) -> SimulationResult {
    let started = std::time::Instant::now();
    let mut next_reset = status::next_reset_after(
        Utc::now(),
        state.status_reset_hour,
        state.status_utc_offset_hours,
    );
    let mut total_ticks: u64 = 0;

    info!(
        max_ticks = bounds.max_ticks,
        max_real_time_seconds = bounds.max_real_time_seconds,
        tick_interval_ms = bounds.tick_interval_ms,
        next_reset = %next_reset,
        "Simulation starting"
    );

    loop {
        let now = Utc::now();

        // --- Daily status reset ---
        if now >= next_reset {
            if let Err(err) = store.clear() {
                warn!(error = %err, "daily status reset failed, cache left as-is");
            }
            next_reset = status::next_reset_after(
                now,
                state.status_reset_hour,
                state.status_utc_offset_hours,
            );
            info!(next_reset = %next_reset, "Daily status reset");
        }

        // --- Execute tick ---
        let summary = tick::run_tick(state, store, rng, now);
        total_ticks = total_ticks.saturating_add(1);

        // --- Notify sink ---
        sink.on_tick(&summary);

        // --- Check tick limit ---
        if bounds.max_ticks > 0 && total_ticks >= bounds.max_ticks {
            info!(total_ticks, max_ticks = bounds.max_ticks, "Tick limit reached");
            return SimulationResult {
                end_reason: SimulationEndReason::MaxTicksReached,
                final_summary: Some(summary),
                total_ticks,
            };
        }

        // --- Check time limit ---
        if bounds.max_real_time_seconds > 0
            && started.elapsed().as_secs() >= bounds.max_real_time_seconds
        {
            info!(
                max_seconds = bounds.max_real_time_seconds,
                "Real-time limit reached"
            );
            return SimulationResult {
                end_reason: SimulationEndReason::MaxRealTimeReached,
                final_summary: Some(summary),
                total_ticks,
            };
        }

        // --- Sleep for tick interval ---
        if bounds.tick_interval_ms > 0 {
            tokio::time::sleep(tokio::time::Duration::from_millis(bounds.tick_interval_ms))
                .await;
        }
    }
}

/// Log the end of a simulation run.
pub fn log_simulation_end(result: &SimulationResult) {
    info!(
        reason = ?result.end_reason,
        total_ticks = result.total_ticks,
        final_tick = result.final_summary.as_ref().map(|s| s.tick),
        final_phase = result.final_summary.as_ref().map(|s| s.phase.config_name()),
        "Simulation ended"
    );

    if let Some(ref summary) = result.final_summary {
        info!(
            cycle = summary.cycle,
            phase = %summary.phase,
            body_length_cm = summary.body_length_cm,
            status = %summary.status,
            "Final tick summary"
        );
    } else {
        warn!("Simulation ended with no ticks executed");
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::arithmetic_side_effects)]
mod tests {
    use aurelia_types::Phase;
    use aurelia_world::{Drifter, TankBounds};
    use chrono::TimeZone;
    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    use super::*;
    use crate::clock::{LifeClock, PhaseSpan};
    use crate::status::{MemoryStatusStore, MessagePools};

    fn make_state() -> SimulationState {
        let origin = Utc.with_ymd_and_hms(2025, 6, 11, 0, 0, 0).unwrap();
        let clock = LifeClock::from_parts(
            origin,
            vec![
                PhaseSpan {
                    phase: Phase::Polyp,
                    seconds: 5,
                    growth_rate_cm_per_sec: 0.0,
                },
                PhaseSpan {
                    phase: Phase::Ephyra,
                    seconds: 5,
                    growth_rate_cm_per_sec: 0.01,
                },
            ],
        )
        .unwrap();
        let bounds = TankBounds::new(200.0, 100.0, 20.0).unwrap();
        let drifter = Drifter::new(bounds, 1.0, 1000, 42).unwrap();
        let drift = drifter.initial_state();
        SimulationState {
            clock,
            drifter,
            drift,
            pools: MessagePools::defaults(),
            status_utc_offset_hours: -5,
            status_reset_hour: 5,
            tick: 0,
        }
    }

    /// Sink that counts invocations.
    struct CountingSink {
        ticks: u64,
    }

    impl RenderSink for CountingSink {
        fn on_tick(&mut self, _summary: &TickSummary) {
            self.ticks += 1;
        }
    }

    #[tokio::test]
    async fn bounded_run_stops_at_max_ticks() {
        let mut state = make_state();
        let store = MemoryStatusStore::new();
        let mut rng = SmallRng::seed_from_u64(1);
        let mut sink = CountingSink { ticks: 0 };

        let bounds = RunBounds {
            tick_interval_ms: 0,
            max_ticks: 5,
            max_real_time_seconds: 0,
        };
        let result = run_simulation(&mut state, &store, &mut rng, bounds, &mut sink).await;

        assert_eq!(result.end_reason, SimulationEndReason::MaxTicksReached);
        assert_eq!(result.total_ticks, 5);
        assert_eq!(sink.ticks, 5);
        assert!(result.final_summary.is_some());
    }

    #[tokio::test]
    async fn time_limited_run_reports_the_right_reason() {
        let mut state = make_state();
        let store = MemoryStatusStore::new();
        let mut rng = SmallRng::seed_from_u64(1);
        let mut sink = NoOpSink;

        let bounds = RunBounds {
            tick_interval_ms: 50,
            max_ticks: 0,
            max_real_time_seconds: 1,
        };
        let result = run_simulation(&mut state, &store, &mut rng, bounds, &mut sink).await;
        assert_eq!(result.end_reason, SimulationEndReason::MaxRealTimeReached);
        assert!(result.total_ticks >= 1);
    }

    #[test]
    fn run_bounds_come_from_engine_config() {
        let config = crate::config::EngineConfig::default();
        let bounds = RunBounds::from(&config);
        assert_eq!(bounds.tick_interval_ms, 300);
        assert_eq!(bounds.max_ticks, 0);
        assert_eq!(bounds.max_real_time_seconds, 0);
    }
}
