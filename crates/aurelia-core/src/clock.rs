//! Life clock: wall-clock-anchored phase and cycle derivation.
//!
//! The life clock is the single source of truth for the jellyfish's
//! temporal state. Given an instant, it derives which life cycle the
//! subject is in, which phase within that cycle, and how far into the
//! cycle (and phase) it has progressed. Everything else in the simulator
//! is a thin consumer of these derived values.
//!
//! # Design Principles
//!
//! - All temporal derivations use checked or Euclidean arithmetic; the
//!   remainder is normalized to `[0, total_cycle_seconds)` even for
//!   instants before the origin.
//! - Cycle state is never stored. The pair (origin, phase table) plus
//!   "now" fully determine it, so it is recomputed on every query.
//! - An empty or all-zero phase table is a configuration error and is
//!   rejected at construction, never tolerated at query time.

use aurelia_types::{CycleState, Phase};
use chrono::{DateTime, Utc};

use crate::config::LifecycleConfig;

/// Errors that can occur during clock construction or configuration parsing.
#[derive(Debug, thiserror::Error)]
pub enum ClockError {
    /// Invalid lifecycle configuration (empty table, zero total, bad names).
    #[error("invalid lifecycle configuration: {reason}")]
    InvalidConfig {
        /// Explanation of what is wrong with the configuration.
        reason: String,
    },
}

/// One entry of the ordered phase table.
///
/// The table order defines the sequence phases occur in within a cycle.
#[derive(Debug, Clone, PartialEq)]
pub struct PhaseSpan {
    /// The phase this span describes.
    pub phase: Phase,

    /// Duration of the phase in whole seconds.
    pub seconds: u64,

    /// Linear body-length growth rate while in this phase, in cm/second.
    pub growth_rate_cm_per_sec: f64,
}

/// The life clock: origin instant plus ordered phase table.
///
/// Construction validates the table; afterwards every query is pure,
/// total, and side-effect free, so the clock can be queried at any rate.
#[derive(Debug, Clone, PartialEq)]
pub struct LifeClock {
    /// The instant cycle 1 begins.
    origin: DateTime<Utc>,

    /// Ordered phase spans forming one full cycle.
    spans: Vec<PhaseSpan>,

    /// Sum of all span durations. Always `>= 1` and `<= i64::MAX`.
    total_cycle_seconds: u64,
}

impl LifeClock {
    /// Create a life clock from the lifecycle configuration section.
    ///
    /// Parses the origin timestamp (RFC 3339) and the phase list, then
    /// validates the table via [`LifeClock::from_parts`].
    ///
    /// # Errors
    ///
    /// Returns [`ClockError::InvalidConfig`] if the origin does not parse,
    /// a phase name is unknown, or the table fails validation.
    pub fn new(config: &LifecycleConfig) -> Result<Self, ClockError> {
        let origin = DateTime::parse_from_rfc3339(&config.origin)
            .map_err(|err| ClockError::InvalidConfig {
                reason: format!("origin timestamp `{}` is not RFC 3339: {err}", config.origin),
            })?
            .with_timezone(&Utc);

        let spans = config
            .phases
            .iter()
            .map(|entry| {
                let phase = Phase::from_config_name(&entry.name).ok_or_else(|| {
                    ClockError::InvalidConfig {
                        reason: format!("unknown phase name: {}", entry.name),
                    }
                })?;
                Ok(PhaseSpan {
                    phase,
                    seconds: entry.seconds,
                    growth_rate_cm_per_sec: entry.growth_rate_cm_per_sec,
                })
            })
            .collect::<Result<Vec<_>, ClockError>>()?;

        Self::from_parts(origin, spans)
    }

    /// Create a clock from explicit parts (useful for testing and for
    /// callers that build the table programmatically).
    ///
    /// # Errors
    ///
    /// Returns [`ClockError::InvalidConfig`] if the table is empty, the
    /// total duration is zero or exceeds `i64::MAX` seconds, a phase
    /// appears more than once, or a growth rate is negative or non-finite.
    pub fn from_parts(
        origin: DateTime<Utc>,
        spans: Vec<PhaseSpan>,
    ) -> Result<Self, ClockError> {
        if spans.is_empty() {
            return Err(ClockError::InvalidConfig {
                reason: "at least one phase must be configured".to_owned(),
            });
        }

        let mut total: u64 = 0;
        for span in &spans {
            total = total
                .checked_add(span.seconds)
                .ok_or_else(|| ClockError::InvalidConfig {
                    reason: "total cycle duration overflows u64".to_owned(),
                })?;

            if spans
                .iter()
                .filter(|other| other.phase == span.phase)
                .count()
                > 1
            {
                return Err(ClockError::InvalidConfig {
                    reason: format!("phase {} appears more than once", span.phase),
                });
            }

            if !span.growth_rate_cm_per_sec.is_finite() || span.growth_rate_cm_per_sec < 0.0 {
                return Err(ClockError::InvalidConfig {
                    reason: format!(
                        "growth rate for {} must be finite and non-negative",
                        span.phase
                    ),
                });
            }
        }

        if total == 0 {
            return Err(ClockError::InvalidConfig {
                reason: "total cycle duration must be greater than zero".to_owned(),
            });
        }
        if i64::try_from(total).is_err() {
            return Err(ClockError::InvalidConfig {
                reason: "total cycle duration exceeds i64::MAX seconds".to_owned(),
            });
        }

        Ok(Self {
            origin,
            spans,
            total_cycle_seconds: total,
        })
    }

    /// Derive the cycle state at the given instant.
    ///
    /// The elapsed time is the whole-second difference `now - origin`.
    /// The remainder is Euclidean, so `seconds_in_cycle` stays in
    /// `[0, total_cycle_seconds)` even when `now` precedes the origin;
    /// in that case `cycle` is `<= 0` (cycle 1 starts exactly at the
    /// origin, and cycle numbers count down going backward in time).
    pub fn state_at(&self, now: DateTime<Utc>) -> CycleState {
        let elapsed = now.signed_duration_since(self.origin).num_seconds();

        // total is in [1, i64::MAX] by construction.
        let total = i64::try_from(self.total_cycle_seconds).unwrap_or(i64::MAX);

        // Euclidean division cannot overflow for a positive divisor.
        let quotient = elapsed.checked_div_euclid(total).unwrap_or(0);
        let cycle = quotient.saturating_add(1);

        // Euclidean remainder is non-negative for a positive divisor, so
        // the conversion to u64 always succeeds.
        let remainder = elapsed.checked_rem_euclid(total).unwrap_or(0);
        let seconds_in_cycle = u64::try_from(remainder).unwrap_or(0);

        let phase = self.phase_at_offset(seconds_in_cycle);

        CycleState {
            cycle,
            phase,
            seconds_in_cycle,
        }
    }

    /// Find the phase covering the given offset within one cycle.
    ///
    /// Walks the table in order, accumulating an upper bound; the first
    /// span whose cumulative bound exceeds the offset is current. Spans
    /// with zero duration are skipped naturally (the bound does not move).
    /// Falls back to the first span if the offset exceeds every bound,
    /// which cannot occur for normalized offsets.
    fn phase_at_offset(&self, seconds_in_cycle: u64) -> Phase {
        let mut upper: u64 = 0;
        for span in &self.spans {
            upper = upper.saturating_add(span.seconds);
            if seconds_in_cycle < upper {
                return span.phase;
            }
        }
        self.spans.first().map_or(Phase::Polyp, |span| span.phase)
    }

    /// Seconds remaining in the current phase.
    ///
    /// For states produced by [`state_at`] on this clock, the result is
    /// in `[0, span.seconds]`: it reaches the span duration at the
    /// instant the phase begins and 0 just before the next phase starts.
    ///
    /// [`state_at`]: LifeClock::state_at
    pub fn remaining_in_phase(&self, state: &CycleState) -> u64 {
        let mut upper: u64 = 0;
        for span in &self.spans {
            upper = upper.saturating_add(span.seconds);
            if span.phase == state.phase {
                return upper.saturating_sub(state.seconds_in_cycle);
            }
        }
        0
    }

    /// Seconds elapsed since the current phase began.
    ///
    /// Together with [`remaining_in_phase`] this always sums to the
    /// phase's configured duration.
    ///
    /// [`remaining_in_phase`]: LifeClock::remaining_in_phase
    pub fn elapsed_in_phase(&self, state: &CycleState) -> u64 {
        let mut before: u64 = 0;
        for span in &self.spans {
            if span.phase == state.phase {
                return state.seconds_in_cycle.saturating_sub(before);
            }
            before = before.saturating_add(span.seconds);
        }
        0
    }

    /// Simulated body length at the given state, in centimeters.
    ///
    /// Linear growth within the current phase: `elapsed_in_phase * rate`.
    /// Non-negative, unclamped above, and resets to 0 the instant the
    /// phase changes. Elapsed values beyond `u32::MAX` seconds (about 136
    /// years in one phase) saturate.
    pub fn body_length_cm(&self, state: &CycleState) -> f64 {
        let rate = self
            .span_of(state.phase)
            .map_or(0.0, |span| span.growth_rate_cm_per_sec);
        let elapsed = self.elapsed_in_phase(state);
        let elapsed = u32::try_from(elapsed).unwrap_or(u32::MAX);
        f64::from(elapsed) * rate
    }

    /// Look up the span for a phase, if present in the table.
    pub fn span_of(&self, phase: Phase) -> Option<&PhaseSpan> {
        self.spans.iter().find(|span| span.phase == phase)
    }

    /// Return the origin instant (start of cycle 1).
    pub const fn origin(&self) -> DateTime<Utc> {
        self.origin
    }

    /// Return the total duration of one full cycle, in seconds.
    pub const fn total_cycle_seconds(&self) -> u64 {
        self.total_cycle_seconds
    }

    /// Return the ordered phase table.
    pub fn spans(&self) -> &[PhaseSpan] {
        &self.spans
    }
}
