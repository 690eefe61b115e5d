//! Embedded status cache for the Aurelia jellyfish simulator.
//!
//! A single redb table holds the cached daily status under three string
//! keys (`status_date`, `status_phase`, `status_text`). The cache is a
//! display convenience: every read path tolerates absent or malformed
//! values by reporting "no cached value", and the tick loop tolerates
//! outright backend failures by rolling a fresh message.

use std::path::Path;

use aurelia_core::status::{StatusError, StatusStore};
use aurelia_types::{CachedStatus, Phase};
use redb::{Database, TableDefinition};
use tracing::debug;

/// Key/value table holding the cached status fields.
const STATUS: TableDefinition<&str, &str> = TableDefinition::new("status");

/// Key for the cached day key.
const KEY_DATE: &str = "status_date";
/// Key for the cached phase name.
const KEY_PHASE: &str = "status_phase";
/// Key for the cached message text.
const KEY_TEXT: &str = "status_text";

/// Errors from the redb backend.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The underlying database operation failed.
    #[error("status store backend error: {message}")]
    Backend {
        /// Description of the backend failure.
        message: String,
    },
}

impl From<StoreError> for StatusError {
    fn from(err: StoreError) -> Self {
        Self::Store {
            message: err.to_string(),
        }
    }
}

/// Persistent [`StatusStore`] backed by a redb database file.
pub struct RedbStatusStore {
    /// The open database handle.
    db: Database,
}

impl RedbStatusStore {
    /// Open or create the database at `path`.
    ///
    /// Creates the status table if it does not already exist, so later
    /// reads never fail on a missing table.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Backend`] if the file cannot be created or
    /// the initial transaction fails.
    pub fn open(path: &Path) -> Result<Self, StoreError> {
        let db = Database::create(path).map_err(backend)?;
        let wt = db.begin_write().map_err(backend)?;
        wt.open_table(STATUS).map_err(backend)?;
        wt.commit().map_err(backend)?;
        Ok(Self { db })
    }

    /// Load the cached status, if all three fields are present and the
    /// phase name parses.
    ///
    /// A stale or hand-edited phase value is treated as an empty cache,
    /// not an error.
    pub fn load_cached(&self) -> Result<Option<CachedStatus>, StoreError> {
        let rt = self.db.begin_read().map_err(backend)?;
        let table = rt.open_table(STATUS).map_err(backend)?;

        let day_key = read_key(&table, KEY_DATE)?;
        let phase_name = read_key(&table, KEY_PHASE)?;
        let text = read_key(&table, KEY_TEXT)?;

        let (Some(day_key), Some(phase_name), Some(text)) = (day_key, phase_name, text) else {
            return Ok(None);
        };

        let Some(phase) = Phase::from_config_name(&phase_name) else {
            debug!(phase = %phase_name, "cached phase name unrecognized, ignoring cache");
            return Ok(None);
        };

        Ok(Some(CachedStatus {
            day_key,
            phase,
            text,
        }))
    }

    /// Replace the cached status.
    pub fn save_cached(&self, status: &CachedStatus) -> Result<(), StoreError> {
        let wt = self.db.begin_write().map_err(backend)?;
        {
            let mut table = wt.open_table(STATUS).map_err(backend)?;
            table
                .insert(KEY_DATE, status.day_key.as_str())
                .map_err(backend)?;
            table
                .insert(KEY_PHASE, status.phase.config_name())
                .map_err(backend)?;
            table
                .insert(KEY_TEXT, status.text.as_str())
                .map_err(backend)?;
        }
        wt.commit().map_err(backend)?;
        Ok(())
    }

    /// Remove the cached status entirely.
    pub fn clear_cached(&self) -> Result<(), StoreError> {
        let wt = self.db.begin_write().map_err(backend)?;
        {
            let mut table = wt.open_table(STATUS).map_err(backend)?;
            table.remove(KEY_DATE).map_err(backend)?;
            table.remove(KEY_PHASE).map_err(backend)?;
            table.remove(KEY_TEXT).map_err(backend)?;
        }
        wt.commit().map_err(backend)?;
        Ok(())
    }
}

impl StatusStore for RedbStatusStore {
    fn load(&self) -> Result<Option<CachedStatus>, StatusError> {
        Ok(self.load_cached()?)
    }

    fn save(&self, status: &CachedStatus) -> Result<(), StatusError> {
        Ok(self.save_cached(status)?)
    }

    fn clear(&self) -> Result<(), StatusError> {
        Ok(self.clear_cached()?)
    }
}

/// Map any redb error into a [`StoreError::Backend`].
fn backend<E: core::fmt::Display>(err: E) -> StoreError {
    StoreError::Backend {
        message: err.to_string(),
    }
}

/// Read one string key from the table, if present.
fn read_key(
    table: &impl redb::ReadableTable<&'static str, &'static str>,
    key: &str,
) -> Result<Option<String>, StoreError> {
    let value = table.get(key).map_err(backend)?;
    Ok(value.map(|guard| guard.value().to_owned()))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use tempfile::TempDir;

    use super::*;

    fn open_tmp() -> (TempDir, RedbStatusStore) {
        let dir = TempDir::new().unwrap();
        let store = RedbStatusStore::open(&dir.path().join("status.redb")).unwrap();
        (dir, store)
    }

    fn sample() -> CachedStatus {
        CachedStatus {
            day_key: "2025-06-11".to_owned(),
            phase: Phase::Medusa,
            text: "The jellyfish is still growing.".to_owned(),
        }
    }

    #[test]
    fn fresh_store_has_no_cached_status() {
        let (_dir, store) = open_tmp();
        assert!(store.load_cached().unwrap().is_none());
    }

    #[test]
    fn save_then_load_roundtrips() {
        let (_dir, store) = open_tmp();
        let status = sample();
        store.save_cached(&status).unwrap();
        assert_eq!(store.load_cached().unwrap(), Some(status));
    }

    #[test]
    fn clear_removes_the_cached_status() {
        let (_dir, store) = open_tmp();
        store.save_cached(&sample()).unwrap();
        store.clear_cached().unwrap();
        assert!(store.load_cached().unwrap().is_none());
    }

    #[test]
    fn clear_on_an_empty_store_is_fine() {
        let (_dir, store) = open_tmp();
        store.clear_cached().unwrap();
        assert!(store.load_cached().unwrap().is_none());
    }

    #[test]
    fn cache_survives_reopening_the_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("status.redb");
        let status = sample();

        {
            let store = RedbStatusStore::open(&path).unwrap();
            store.save_cached(&status).unwrap();
        }

        let store = RedbStatusStore::open(&path).unwrap();
        assert_eq!(store.load_cached().unwrap(), Some(status));
    }

    #[test]
    fn unrecognized_cached_phase_reads_as_empty() {
        let (_dir, store) = open_tmp();
        store.save_cached(&sample()).unwrap();

        // Corrupt the phase field directly.
        let wt = store.db.begin_write().unwrap();
        {
            let mut table = wt.open_table(STATUS).unwrap();
            table.insert(KEY_PHASE, "larva").unwrap();
        }
        wt.commit().unwrap();

        assert!(store.load_cached().unwrap().is_none());
    }

    #[test]
    fn partial_cache_reads_as_empty() {
        let (_dir, store) = open_tmp();

        // Only the text key, no date or phase.
        let wt = store.db.begin_write().unwrap();
        {
            let mut table = wt.open_table(STATUS).unwrap();
            table.insert(KEY_TEXT, "orphaned").unwrap();
        }
        wt.commit().unwrap();

        assert!(store.load_cached().unwrap().is_none());
    }

    #[test]
    fn trait_object_usage_works() {
        let (_dir, store) = open_tmp();
        let store: &dyn StatusStore = &store;
        assert!(store.load().unwrap().is_none());
        store.save(&sample()).unwrap();
        assert!(store.load().unwrap().is_some());
        store.clear().unwrap();
        assert!(store.load().unwrap().is_none());
    }
}
