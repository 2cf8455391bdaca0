use std::collections::HashSet;

use rusqlite::{Connection, OptionalExtension, Row, params};

use crate::{
    catalog::store::Catalog,
    foundation::core::SourceImageId,
    foundation::error::InkResult,
    model::RotationEntry,
};

fn entry_from_row(row: &Row<'_>) -> rusqlite::Result<RotationEntry> {
    Ok(RotationEntry {
        position: row.get(0)?,
        source_image_id: SourceImageId::from_stored(row.get(1)?),
    })
}

fn first_entry(conn: &Connection) -> rusqlite::Result<Option<RotationEntry>> {
    conn.query_row(
        "SELECT position, source_image_id FROM rotation_entries ORDER BY position ASC LIMIT 1",
        [],
        entry_from_row,
    )
    .optional()
}

fn entry_for(conn: &Connection, id: &SourceImageId) -> rusqlite::Result<Option<RotationEntry>> {
    conn.query_row(
        "SELECT position, source_image_id FROM rotation_entries WHERE source_image_id = ?1",
        [id.as_str()],
        entry_from_row,
    )
    .optional()
}

impl Catalog {
    /// Number of rotation entries.
    pub fn rotation_len(&self) -> InkResult<usize> {
        let conn = self.lock()?;
        let n: i64 = conn.query_row("SELECT COUNT(*) FROM rotation_entries", [], |r| r.get(0))?;
        Ok(n as usize)
    }

    /// Entry with the lowest position.
    pub fn rotation_first(&self) -> InkResult<Option<RotationEntry>> {
        let conn = self.lock()?;
        Ok(first_entry(&conn)?)
    }

    /// Entry holding `id`, if it is in the rotation.
    pub fn rotation_entry_for(&self, id: &SourceImageId) -> InkResult<Option<RotationEntry>> {
        let conn = self.lock()?;
        Ok(entry_for(&conn, id)?)
    }

    /// Successor of `current` in rotation order, wrapping past the end.
    ///
    /// With no current id, or one no longer in the rotation, this is the first entry. `None`
    /// only when the rotation is empty. Resolved under one lock so a concurrent insert cannot
    /// shift positions between the two lookups.
    pub fn rotation_next(
        &self,
        current: Option<&SourceImageId>,
    ) -> InkResult<Option<RotationEntry>> {
        let conn = self.lock()?;
        if let Some(id) = current
            && let Some(entry) = entry_for(&conn, id)?
        {
            let after = conn
                .query_row(
                    "SELECT position, source_image_id FROM rotation_entries
                     WHERE position > ?1 ORDER BY position ASC LIMIT 1",
                    [entry.position],
                    entry_from_row,
                )
                .optional()?;
            if after.is_some() {
                return Ok(after);
            }
        }
        Ok(first_entry(&conn)?)
    }

    /// All entries in ascending position order.
    pub fn rotation_entries(&self) -> InkResult<Vec<RotationEntry>> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare(
            "SELECT position, source_image_id FROM rotation_entries ORDER BY position ASC",
        )?;
        let rows = stmt
            .query_map([], entry_from_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(rows)
    }

    /// Remove entries whose id is not in `keep`, returning the removed ids.
    pub fn rotation_retain(&self, keep: &HashSet<SourceImageId>) -> InkResult<Vec<SourceImageId>> {
        let mut conn = self.lock()?;
        let tx = conn.transaction()?;
        let stale = {
            let mut stmt = tx.prepare("SELECT source_image_id FROM rotation_entries")?;
            let ids = stmt
                .query_map([], |r| r.get::<_, String>(0))?
                .collect::<Result<Vec<_>, _>>()?;
            ids.into_iter()
                .map(SourceImageId::from_stored)
                .filter(|id| !keep.contains(id))
                .collect::<Vec<_>>()
        };
        for id in &stale {
            tx.execute(
                "DELETE FROM rotation_entries WHERE source_image_id = ?1",
                [id.as_str()],
            )?;
        }
        tx.commit()?;
        Ok(stale)
    }

    /// Insert `id` so that it becomes the `rank`-th entry (0-based) in rotation order.
    ///
    /// Entries at or after that rank move up one position, highest first, inside a single
    /// transaction so positions stay unique at every step. `rank >= len` appends.
    pub fn rotation_insert_at_rank(&self, id: &SourceImageId, rank: usize) -> InkResult<i64> {
        let mut conn = self.lock()?;
        let tx = conn.transaction()?;

        let pivot: Option<i64> = tx
            .query_row(
                "SELECT position FROM rotation_entries ORDER BY position ASC LIMIT 1 OFFSET ?1",
                [rank as i64],
                |r| r.get(0),
            )
            .optional()?;

        let position = match pivot {
            Some(pivot) => {
                let to_shift = {
                    let mut stmt = tx.prepare(
                        "SELECT position FROM rotation_entries
                         WHERE position >= ?1 ORDER BY position DESC",
                    )?;
                    let positions = stmt
                        .query_map([pivot], |r| r.get::<_, i64>(0))?
                        .collect::<Result<Vec<_>, _>>()?;
                    positions
                };
                for pos in to_shift {
                    tx.execute(
                        "UPDATE rotation_entries SET position = ?1 WHERE position = ?2",
                        params![pos + 1, pos],
                    )?;
                }
                pivot
            }
            None => tx.query_row(
                "SELECT COALESCE(MAX(position) + 1, 0) FROM rotation_entries",
                [],
                |r| r.get(0),
            )?,
        };

        tx.execute(
            "INSERT INTO rotation_entries (position, source_image_id) VALUES (?1, ?2)",
            params![position, id.as_str()],
        )?;
        tx.commit()?;
        Ok(position)
    }

    /// Replace the whole rotation with `ids` at positions `0..n`.
    pub fn rotation_replace(&self, ids: &[SourceImageId]) -> InkResult<()> {
        let mut conn = self.lock()?;
        let tx = conn.transaction()?;
        tx.execute("DELETE FROM rotation_entries", [])?;
        for (pos, id) in ids.iter().enumerate() {
            tx.execute(
                "INSERT INTO rotation_entries (position, source_image_id) VALUES (?1, ?2)",
                params![pos as i64, id.as_str()],
            )?;
        }
        tx.commit()?;
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/catalog/rotation.rs"]
mod tests;
