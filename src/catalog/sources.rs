use std::{collections::HashSet, path::PathBuf};

use rusqlite::{OptionalExtension, params};

use crate::{
    catalog::store::{Catalog, now_millis},
    foundation::core::SourceImageId,
    foundation::error::InkResult,
    model::SourceImage,
};

impl Catalog {
    /// Insert or re-point one source image.
    pub fn upsert_source(&self, source: &SourceImage) -> InkResult<()> {
        let conn = self.lock()?;
        conn.execute(
            "INSERT INTO source_images (id, path, created_at) VALUES (?1, ?2, ?3)
             ON CONFLICT(id) DO UPDATE SET path = excluded.path",
            params![
                source.id.as_str(),
                source.path.to_string_lossy(),
                now_millis()
            ],
        )?;
        Ok(())
    }

    /// Delete a source image. Its artifact rows cascade; files are the caller's concern.
    pub fn delete_source(&self, id: &SourceImageId) -> InkResult<bool> {
        let conn = self.lock()?;
        let n = conn.execute("DELETE FROM source_images WHERE id = ?1", [id.as_str()])?;
        Ok(n > 0)
    }

    /// Source registered under `id`, if any.
    pub fn source(&self, id: &SourceImageId) -> InkResult<Option<SourceImage>> {
        let conn = self.lock()?;
        let path: Option<String> = conn
            .query_row(
                "SELECT path FROM source_images WHERE id = ?1",
                [id.as_str()],
                |row| row.get(0),
            )
            .optional()?;
        Ok(path.map(|p| SourceImage::new(id.clone(), PathBuf::from(p))))
    }

    /// Every registered source id, sorted.
    pub fn source_ids(&self) -> InkResult<Vec<SourceImageId>> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare("SELECT id FROM source_images ORDER BY id")?;
        let ids = stmt
            .query_map([], |row| row.get::<_, String>(0))?
            .map(|r| r.map(SourceImageId::from_stored))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(ids)
    }

    /// Make the registered set equal `current`. Returns the ids that were removed.
    pub fn replace_sources(&self, current: &[SourceImage]) -> InkResult<Vec<SourceImageId>> {
        let keep: HashSet<&SourceImageId> = current.iter().map(|s| &s.id).collect();
        let removed: Vec<SourceImageId> = self
            .source_ids()?
            .into_iter()
            .filter(|id| !keep.contains(id))
            .collect();

        let mut conn = self.lock()?;
        let tx = conn.transaction()?;
        for id in &removed {
            tx.execute("DELETE FROM source_images WHERE id = ?1", [id.as_str()])?;
        }
        let now = now_millis();
        for s in current {
            tx.execute(
                "INSERT INTO source_images (id, path, created_at) VALUES (?1, ?2, ?3)
                 ON CONFLICT(id) DO UPDATE SET path = excluded.path",
                params![s.id.as_str(), s.path.to_string_lossy(), now],
            )?;
        }
        tx.commit()?;
        Ok(removed)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/catalog/sources.rs"]
mod tests;
