//! Daily status message selection and the status cache seam.
//!
//! The jellyfish shows one status line per day and phase. The line is
//! rolled uniformly at random from a per-phase pool, then cached in a
//! best-effort key-value store so refreshes within the same day (and
//! phase) re-use it instead of re-rolling. The cache key is a calendar
//! date in a configurable timezone offset; a scheduled daily reset clears
//! the cache so the next tick rolls fresh.
//!
//! The [`StatusStore`] trait abstracts the cache backend. The production
//! backend is the redb store in `aurelia-store`; [`MemoryStatusStore`]
//! is an in-process stub for tests and for degraded operation when the
//! database file cannot be opened. Store failures are never fatal: a
//! failed read falls back to a fresh roll, a failed write just means the
//! next refresh rolls again.

use std::collections::BTreeMap;
use std::sync::Mutex;

use aurelia_types::{CachedStatus, Phase};
use chrono::{DateTime, Utc};
use rand::Rng;
use tracing::warn;

/// Message shown when a phase has no configured pool.
const FALLBACK_MESSAGE: &str = "The jellyfish conceals its presence.";

/// Errors that can occur in status selection or the cache backend.
#[derive(Debug, thiserror::Error)]
pub enum StatusError {
    /// The cache backend failed.
    #[error("status store error: {message}")]
    Store {
        /// Description of the backend failure.
        message: String,
    },

    /// A message pool override referenced an unknown phase name.
    #[error("unknown phase in message overrides: {name}")]
    UnknownPhase {
        /// The unrecognized phase name.
        name: String,
    },
}

/// Best-effort cache for the daily status message.
///
/// Implementations must treat a missing value as `Ok(None)`, never as an
/// error; consumers tolerate the cache being absent or cleared at any
/// time.
pub trait StatusStore {
    /// Load the cached status, if one is present and well-formed.
    fn load(&self) -> Result<Option<CachedStatus>, StatusError>;

    /// Replace the cached status.
    fn save(&self, status: &CachedStatus) -> Result<(), StatusError>;

    /// Remove the cached status entirely.
    fn clear(&self) -> Result<(), StatusError>;
}

/// In-memory [`StatusStore`] stub.
///
/// Used by tests and as the degraded backend when the database file
/// cannot be opened. Holds at most one cached status, like the real
/// store.
#[derive(Debug, Default)]
pub struct MemoryStatusStore {
    /// The single cached value.
    inner: Mutex<Option<CachedStatus>>,
}

impl MemoryStatusStore {
    /// Create an empty in-memory store.
    pub fn new() -> Self {
        Self::default()
    }
}

impl StatusStore for MemoryStatusStore {
    fn load(&self) -> Result<Option<CachedStatus>, StatusError> {
        let guard = self.inner.lock().map_err(|_err| StatusError::Store {
            message: "memory store mutex poisoned".to_owned(),
        })?;
        Ok(guard.clone())
    }

    fn save(&self, status: &CachedStatus) -> Result<(), StatusError> {
        let mut guard = self.inner.lock().map_err(|_err| StatusError::Store {
            message: "memory store mutex poisoned".to_owned(),
        })?;
        *guard = Some(status.clone());
        Ok(())
    }

    fn clear(&self) -> Result<(), StatusError> {
        let mut guard = self.inner.lock().map_err(|_err| StatusError::Store {
            message: "memory store mutex poisoned".to_owned(),
        })?;
        *guard = None;
        Ok(())
    }
}

/// Per-phase pools of candidate status messages.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessagePools {
    /// Candidate messages keyed by phase.
    pools: BTreeMap<Phase, Vec<String>>,
}

impl MessagePools {
    /// The built-in pools.
    pub fn defaults() -> Self {
        let mut pools = BTreeMap::new();
        pools.insert(
            Phase::Polyp,
            to_owned_vec(&[
                "Preparing for a new life.",
                "Currently a polyp.",
                "The polyp is growing.",
                "Waiting for the next cycle.",
            ]),
        );
        pools.insert(
            Phase::Ephyra,
            to_owned_vec(&[
                "Not quite jellyfish-shaped yet, but a jellyfish all the same.",
                "Growing.",
                "Growing into a jellyfish.",
                "Hungry",
                "Full",
                "Cold",
                "Warm",
                "Happy",
                "Sad",
                "Angry",
                "Amazed",
            ]),
        );
        pools.insert(
            Phase::Medusa,
            to_owned_vec(&[
                "The jellyfish is still growing.",
                "Hungry",
                "Full",
                "Cold",
                "Warm",
                "Happy",
                "Sad",
                "Having fun",
                "Feeling low",
                "Angry",
                "Lonely",
                "Are there other jellyfish out there?",
                "Where is this place?",
                "The electricity feels nice",
            ]),
        );
        pools.insert(
            Phase::MedusaEnd,
            to_owned_vec(&[
                "The jellyfish is preparing its return.",
                "Time to start over",
                "This cycle was fun too",
                "Looking forward to the next cycle",
                "The jellyfish is getting ready to become a polyp again.",
            ]),
        );
        Self { pools }
    }

    /// Build pools from the defaults plus configuration overrides.
    ///
    /// Overrides replace the whole pool for the named phase.
    ///
    /// # Errors
    ///
    /// Returns [`StatusError::UnknownPhase`] if an override key is not a
    /// known phase name.
    pub fn with_overrides(
        overrides: &BTreeMap<String, Vec<String>>,
    ) -> Result<Self, StatusError> {
        let mut pools = Self::defaults().pools;
        for (name, messages) in overrides {
            let phase =
                Phase::from_config_name(name).ok_or_else(|| StatusError::UnknownPhase {
                    name: name.clone(),
                })?;
            pools.insert(phase, messages.clone());
        }
        Ok(Self { pools })
    }

    /// Pick a message for the phase uniformly at random.
    ///
    /// An absent or empty pool yields the fixed fallback line.
    pub fn pick<R: Rng>(&self, phase: Phase, rng: &mut R) -> String {
        match self.pools.get(&phase).filter(|pool| !pool.is_empty()) {
            Some(pool) => {
                let idx = rng.random_range(0..pool.len());
                pool.get(idx)
                    .cloned()
                    .unwrap_or_else(|| FALLBACK_MESSAGE.to_owned())
            }
            None => FALLBACK_MESSAGE.to_owned(),
        }
    }

    /// Number of candidate messages for a phase.
    pub fn pool_len(&self, phase: Phase) -> usize {
        self.pools.get(&phase).map_or(0, Vec::len)
    }
}

impl Default for MessagePools {
    fn default() -> Self {
        Self::defaults()
    }
}

fn to_owned_vec(items: &[&str]) -> Vec<String> {
    items.iter().map(|item| (*item).to_owned()).collect()
}

/// Calendar day key (`YYYY-MM-DD`) for the given instant in the status
/// timezone.
///
/// The instant is shifted by `utc_offset_hours` before taking the date,
/// so with the default offset of -5 a new status day begins at 05:00 UTC.
pub fn day_key(now: DateTime<Utc>, utc_offset_hours: i32) -> String {
    let shifted = now
        .checked_add_signed(chrono::Duration::hours(i64::from(utc_offset_hours)))
        .unwrap_or(now);
    shifted.format("%Y-%m-%d").to_string()
}

/// The next instant, strictly after `now`, at which the daily status
/// reset fires.
///
/// The reset fires at `reset_hour:00:00` in the status timezone. Hours
/// above 23 are clamped to 23.
pub fn next_reset_after(
    now: DateTime<Utc>,
    reset_hour: u32,
    utc_offset_hours: i32,
) -> DateTime<Utc> {
    let offset = chrono::Duration::hours(i64::from(utc_offset_hours));
    let local = now.checked_add_signed(offset).unwrap_or(now);

    let hour = reset_hour.min(23);
    // hour <= 23, so and_hms_opt always succeeds.
    let candidate_local = local
        .date_naive()
        .and_hms_opt(hour, 0, 0)
        .unwrap_or_else(|| local.naive_utc());
    let candidate = DateTime::<Utc>::from_naive_utc_and_offset(candidate_local, Utc)
        .checked_sub_signed(offset)
        .unwrap_or(now);

    if candidate > now {
        candidate
    } else {
        candidate
            .checked_add_signed(chrono::Duration::days(1))
            .unwrap_or(candidate)
    }
}

/// Resolve the status message for the given phase and instant.
///
/// Re-uses the cached message when the day key and phase both match and
/// the cached text is non-empty; otherwise rolls a fresh message and
/// saves it best-effort. Store failures degrade to a fresh roll with a
/// warning.
pub fn resolve<R: Rng>(
    store: &dyn StatusStore,
    pools: &MessagePools,
    phase: Phase,
    now: DateTime<Utc>,
    utc_offset_hours: i32,
    rng: &mut R,
) -> String {
    let key = day_key(now, utc_offset_hours);

    let cached = match store.load() {
        Ok(cached) => cached,
        Err(err) => {
            warn!(error = %err, "status cache read failed, rolling a fresh message");
            None
        }
    };

    if let Some(cached) = cached
        && cached.phase == phase
        && cached.day_key == key
        && !cached.text.is_empty()
    {
        return cached.text;
    }

    let text = pools.pick(phase, rng);
    let fresh = CachedStatus {
        day_key: key,
        phase,
        text: text.clone(),
    };
    if let Err(err) = store.save(&fresh) {
        warn!(error = %err, "status cache write failed, continuing uncached");
    }
    text
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::TimeZone;
    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    use super::*;

    fn utc(y: i32, mo: u32, d: u32, h: u32, mi: u32, s: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, mo, d, h, mi, s).unwrap()
    }

    #[test]
    fn day_key_shifts_by_offset() {
        // 04:00 UTC is still the previous day at UTC-5.
        assert_eq!(day_key(utc(2025, 6, 11, 4, 0, 0), -5), "2025-06-10");
        // 05:00 UTC is the boundary.
        assert_eq!(day_key(utc(2025, 6, 11, 5, 0, 0), -5), "2025-06-11");
        // Zero offset is the plain UTC date.
        assert_eq!(day_key(utc(2025, 6, 11, 4, 0, 0), 0), "2025-06-11");
    }

    #[test]
    fn next_reset_is_strictly_in_the_future() {
        // 03:00 UTC, reset at 05:00 local (UTC-5) = 10:00 UTC same day.
        let now = utc(2025, 6, 11, 3, 0, 0);
        let reset = next_reset_after(now, 5, -5);
        assert_eq!(reset, utc(2025, 6, 11, 10, 0, 0));

        // Exactly at the boundary the next reset is a day later.
        let reset = next_reset_after(utc(2025, 6, 11, 10, 0, 0), 5, -5);
        assert_eq!(reset, utc(2025, 6, 12, 10, 0, 0));

        // Just past the boundary, also a day later.
        let reset = next_reset_after(utc(2025, 6, 11, 10, 0, 1), 5, -5);
        assert_eq!(reset, utc(2025, 6, 12, 10, 0, 0));
    }

    #[test]
    fn default_pools_cover_every_phase() {
        let pools = MessagePools::defaults();
        for phase in [Phase::Polyp, Phase::Ephyra, Phase::Medusa, Phase::MedusaEnd] {
            assert!(pools.pool_len(phase) > 0, "{phase} pool is empty");
        }
    }

    #[test]
    fn pick_draws_from_the_phase_pool() {
        let pools = MessagePools::defaults();
        let mut rng = SmallRng::seed_from_u64(7);
        for _ in 0..50 {
            let message = pools.pick(Phase::Polyp, &mut rng);
            assert!(!message.is_empty());
        }
    }

    #[test]
    fn empty_override_pool_falls_back() {
        let mut overrides = BTreeMap::new();
        overrides.insert("medusa".to_owned(), Vec::new());
        let pools = MessagePools::with_overrides(&overrides).unwrap();
        let mut rng = SmallRng::seed_from_u64(7);
        assert_eq!(pools.pick(Phase::Medusa, &mut rng), FALLBACK_MESSAGE);
    }

    #[test]
    fn unknown_override_phase_is_rejected() {
        let mut overrides = BTreeMap::new();
        overrides.insert("larva".to_owned(), vec!["?".to_owned()]);
        assert!(MessagePools::with_overrides(&overrides).is_err());
    }

    #[test]
    fn resolve_reuses_cached_message_within_the_same_day_and_phase() {
        let store = MemoryStatusStore::new();
        let pools = MessagePools::defaults();
        let mut rng = SmallRng::seed_from_u64(1);
        let now = utc(2025, 6, 11, 12, 0, 0);

        let first = resolve(&store, &pools, Phase::Medusa, now, -5, &mut rng);
        // Later the same day: the cached text comes back regardless of rng.
        let later = now + chrono::Duration::hours(3);
        let second = resolve(&store, &pools, Phase::Medusa, later, -5, &mut rng);
        assert_eq!(first, second);
    }

    #[test]
    fn resolve_rolls_fresh_on_phase_change() {
        let store = MemoryStatusStore::new();
        let pools = MessagePools::defaults();
        let mut rng = SmallRng::seed_from_u64(1);
        let now = utc(2025, 6, 11, 12, 0, 0);

        let _ = resolve(&store, &pools, Phase::Ephyra, now, -5, &mut rng);
        let _ = resolve(&store, &pools, Phase::Medusa, now, -5, &mut rng);

        let cached = store.load().unwrap().unwrap();
        assert_eq!(cached.phase, Phase::Medusa);
    }

    #[test]
    fn resolve_rolls_fresh_on_day_change() {
        let store = MemoryStatusStore::new();
        let pools = MessagePools::defaults();
        let mut rng = SmallRng::seed_from_u64(1);

        let today = utc(2025, 6, 11, 12, 0, 0);
        let _ = resolve(&store, &pools, Phase::Medusa, today, -5, &mut rng);
        let first_key = store.load().unwrap().unwrap().day_key;

        let tomorrow = utc(2025, 6, 12, 12, 0, 0);
        let _ = resolve(&store, &pools, Phase::Medusa, tomorrow, -5, &mut rng);
        let second_key = store.load().unwrap().unwrap().day_key;

        assert_ne!(first_key, second_key);
    }

    #[test]
    fn resolve_survives_a_failing_store() {
        /// A store whose every operation fails.
        struct BrokenStore;

        impl StatusStore for BrokenStore {
            fn load(&self) -> Result<Option<CachedStatus>, StatusError> {
                Err(StatusError::Store {
                    message: "disk on fire".to_owned(),
                })
            }
            fn save(&self, _status: &CachedStatus) -> Result<(), StatusError> {
                Err(StatusError::Store {
                    message: "disk on fire".to_owned(),
                })
            }
            fn clear(&self) -> Result<(), StatusError> {
                Err(StatusError::Store {
                    message: "disk on fire".to_owned(),
                })
            }
        }

        let pools = MessagePools::defaults();
        let mut rng = SmallRng::seed_from_u64(1);
        let now = utc(2025, 6, 11, 12, 0, 0);
        let message = resolve(&BrokenStore, &pools, Phase::Medusa, now, -5, &mut rng);
        assert!(!message.is_empty());
    }

    #[test]
    fn memory_store_roundtrip_and_clear() {
        let store = MemoryStatusStore::new();
        assert!(store.load().unwrap().is_none());

        let status = CachedStatus {
            day_key: "2025-06-11".to_owned(),
            phase: Phase::Polyp,
            text: "Currently a polyp.".to_owned(),
        };
        store.save(&status).unwrap();
        assert_eq!(store.load().unwrap(), Some(status));

        store.clear().unwrap();
        assert!(store.load().unwrap().is_none());
    }
}
