use std::{
    path::Path,
    sync::{Mutex, MutexGuard},
};

use anyhow::{Context, anyhow};
use rusqlite::Connection;

use crate::foundation::error::InkResult;

const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS source_images (
    id          TEXT PRIMARY KEY,
    path        TEXT NOT NULL,
    created_at  INTEGER NOT NULL
);

CREATE TABLE IF NOT EXISTS derived_artifacts (
    id               TEXT PRIMARY KEY,
    source_image_id  TEXT NOT NULL REFERENCES source_images(id) ON DELETE CASCADE,
    palette          TEXT NOT NULL,
    algorithm        TEXT NOT NULL,
    strength_bits    INTEGER NOT NULL,
    width            INTEGER NOT NULL,
    height           INTEGER NOT NULL,
    resize_method    TEXT NOT NULL,
    storage_path     TEXT NOT NULL UNIQUE,
    created_at       INTEGER NOT NULL,
    UNIQUE (source_image_id, palette, algorithm, strength_bits, width, height, resize_method)
);

CREATE INDEX IF NOT EXISTS idx_derived_artifacts_source
    ON derived_artifacts(source_image_id);

CREATE TABLE IF NOT EXISTS rotation_entries (
    position         INTEGER PRIMARY KEY,
    source_image_id  TEXT NOT NULL UNIQUE
);
";

/// Shared handle to the index database.
///
/// All access is serialized through one connection; multi-statement updates run inside a
/// transaction while the lock is held.
pub struct Catalog {
    conn: Mutex<Connection>,
}

impl Catalog {
    /// Open (creating if needed) the database at `path` and apply the schema.
    pub fn open(path: &Path) -> InkResult<Self> {
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("create catalog directory '{}'", parent.display()))?;
        }
        let conn = Connection::open(path)
            .with_context(|| format!("open catalog '{}'", path.display()))?;
        Self::from_connection(conn)
    }

    /// Private in-memory database, mostly for tests and one-shot CLI runs.
    pub fn open_in_memory() -> InkResult<Self> {
        let conn = Connection::open_in_memory().context("open in-memory catalog")?;
        Self::from_connection(conn)
    }

    fn from_connection(conn: Connection) -> InkResult<Self> {
        conn.pragma_update(None, "foreign_keys", true)
            .context("enable foreign keys")?;
        conn.execute_batch(SCHEMA).context("apply catalog schema")?;
        tracing::debug!("catalog schema ready");
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    pub(crate) fn lock(&self) -> InkResult<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|_| anyhow!("catalog connection lock poisoned").into())
    }
}

pub(crate) fn now_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

#[cfg(test)]
#[path = "../../tests/unit/catalog/store.rs"]
mod tests;
