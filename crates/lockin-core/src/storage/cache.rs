//! SQLite-backed cache of fetched goal lists.
//!
//! The API is the source of truth; the cache only lets the CLI show the
//! last known goals when offline. Entries are named (`goals` by default) and
//! hold the goal list as JSON plus the time it was fetched.

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension};
use serde::Serialize;
use std::path::Path;

use super::data_dir;
use crate::error::Result;
use crate::goal::Goal;

/// Name of the entry holding the full goal list.
pub const GOALS_ENTRY: &str = "goals";

/// Metadata for one cache entry.
#[derive(Debug, Clone, Serialize)]
pub struct CacheEntry {
    pub name: String,
    pub goal_count: usize,
    pub fetched_at: DateTime<Utc>,
}

/// Goal list cache.
pub struct GoalCache {
    conn: Connection,
}

impl GoalCache {
    /// Open the cache at `~/.config/lockin/cache.db`.
    ///
    /// # Errors
    /// Returns an error if the database cannot be opened or migrated.
    pub fn open() -> Result<Self> {
        Self::open_at(&data_dir()?.join("cache.db"))
    }

    /// Open the cache at an explicit path.
    ///
    /// # Errors
    /// Returns an error if the database cannot be opened or migrated.
    pub fn open_at(path: &Path) -> Result<Self> {
        let conn = Connection::open(path)?;
        let cache = Self { conn };
        cache.migrate()?;
        Ok(cache)
    }

    /// Open an in-memory cache (for tests).
    ///
    /// # Errors
    /// Returns an error if the schema cannot be created.
    pub fn open_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        let cache = Self { conn };
        cache.migrate()?;
        Ok(cache)
    }

    fn migrate(&self) -> Result<(), rusqlite::Error> {
        self.conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS goal_cache (
                name        TEXT PRIMARY KEY,
                payload     TEXT NOT NULL,
                goal_count  INTEGER NOT NULL,
                fetched_at  TEXT NOT NULL
            );",
        )
    }

    /// Replace the entry `name` with `goals`.
    ///
    /// # Errors
    /// Returns an error if serialization or the write fails.
    pub fn store(&self, name: &str, goals: &[Goal], fetched_at: DateTime<Utc>) -> Result<()> {
        let payload = serde_json::to_string(goals)?;
        self.conn.execute(
            "INSERT INTO goal_cache (name, payload, goal_count, fetched_at)
             VALUES (?1, ?2, ?3, ?4)
             ON CONFLICT(name) DO UPDATE SET
                payload = excluded.payload,
                goal_count = excluded.goal_count,
                fetched_at = excluded.fetched_at",
            params![name, payload, goals.len() as i64, fetched_at.to_rfc3339()],
        )?;
        tracing::debug!(name, count = goals.len(), "goal cache updated");
        Ok(())
    }

    /// Goals stored under `name`, with their fetch time.
    ///
    /// # Errors
    /// Returns an error if the read fails or the stored payload is corrupt.
    pub fn load(&self, name: &str) -> Result<Option<(Vec<Goal>, DateTime<Utc>)>> {
        let row = self
            .conn
            .query_row(
                "SELECT payload, fetched_at FROM goal_cache WHERE name = ?1",
                params![name],
                |row| Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?)),
            )
            .optional()?;

        let Some((payload, fetched_at)) = row else {
            return Ok(None);
        };
        let goals: Vec<Goal> = serde_json::from_str(&payload)?;
        let fetched_at = DateTime::parse_from_rfc3339(&fetched_at)
            .map(|dt| dt.with_timezone(&Utc))
            .map_err(|_| crate::error::CoreError::InvalidTimestamp { input: fetched_at })?;
        Ok(Some((goals, fetched_at)))
    }

    /// All entries, by name.
    ///
    /// # Errors
    /// Returns an error if the query fails.
    pub fn list(&self) -> Result<Vec<CacheEntry>> {
        let mut stmt = self
            .conn
            .prepare("SELECT name, goal_count, fetched_at FROM goal_cache ORDER BY name")?;
        let rows = stmt.query_map([], |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, i64>(1)?,
                row.get::<_, String>(2)?,
            ))
        })?;

        let mut entries = Vec::new();
        for row in rows {
            let (name, count, fetched_at) = row?;
            let Ok(fetched_at) = DateTime::parse_from_rfc3339(&fetched_at) else {
                tracing::warn!(name, "cache entry has unreadable timestamp, skipping");
                continue;
            };
            entries.push(CacheEntry {
                name,
                goal_count: usize::try_from(count).unwrap_or(0),
                fetched_at: fetched_at.with_timezone(&Utc),
            });
        }
        Ok(entries)
    }

    /// Remove one entry. Returns whether it existed.
    ///
    /// # Errors
    /// Returns an error if the delete fails.
    pub fn clear(&self, name: &str) -> Result<bool> {
        let removed = self
            .conn
            .execute("DELETE FROM goal_cache WHERE name = ?1", params![name])?;
        tracing::info!(name, "goal cache entry cleared");
        Ok(removed > 0)
    }

    /// Remove every entry. Returns how many were removed.
    ///
    /// # Errors
    /// Returns an error if the delete fails.
    pub fn clear_all(&self) -> Result<usize> {
        let removed = self.conn.execute("DELETE FROM goal_cache", [])?;
        tracing::info!(removed, "all goal cache entries cleared");
        Ok(removed)
    }
}

/// Development session over a [`GoalCache`].
///
/// Started explicitly by the caller; when enabled it wipes the cache so
/// every command sees fresh server data. Ending the session (or dropping
/// the guard) is logged. Nothing is installed process-wide.
pub struct DevSession<'a> {
    cache: &'a GoalCache,
    enabled: bool,
    cleared: usize,
}

impl<'a> DevSession<'a> {
    /// Begin a session. With `enabled = false` this is a no-op guard.
    ///
    /// # Errors
    /// Returns an error if clearing the cache fails.
    pub fn begin(cache: &'a GoalCache, enabled: bool) -> Result<Self> {
        let cleared = if enabled {
            let n = cache.clear_all()?;
            tracing::info!(cleared = n, "development mode enabled");
            n
        } else {
            0
        };
        Ok(Self {
            cache,
            enabled,
            cleared,
        })
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Entries removed when the session began.
    pub fn cleared(&self) -> usize {
        self.cleared
    }

    pub fn cache(&self) -> &GoalCache {
        self.cache
    }
}

impl Drop for DevSession<'_> {
    fn drop(&mut self) {
        if self.enabled {
            tracing::info!("development mode disabled");
        }
    }
}
