use std::path::PathBuf;

use chrono::{DateTime, Utc};
use rusqlite::{OptionalExtension, Row, params};

use crate::{
    catalog::store::Catalog,
    foundation::core::{ArtifactId, SourceImageId},
    foundation::error::InkResult,
    model::{DerivedArtifact, RenderParams, ResizeMethod},
};

const COLUMNS: &str = "id, source_image_id, palette, algorithm, strength_bits, width, height, \
                       resize_method, storage_path, created_at";

fn artifact_from_row(row: &Row<'_>) -> rusqlite::Result<DerivedArtifact> {
    let strength_bits: i64 = row.get(4)?;
    let method: String = row.get(7)?;
    let storage: String = row.get(8)?;
    let created_ms: i64 = row.get(9)?;
    Ok(DerivedArtifact {
        id: ArtifactId::from_stored(row.get(0)?),
        source_image_id: SourceImageId::from_stored(row.get(1)?),
        params: RenderParams {
            palette: row.get(2)?,
            algorithm: row.get(3)?,
            strength: f32::from_bits(strength_bits as u32),
            width: row.get(5)?,
            height: row.get(6)?,
            resize_method: ResizeMethod::from_name(&method),
        },
        storage_path: PathBuf::from(storage),
        created_at: DateTime::<Utc>::from_timestamp_millis(created_ms).unwrap_or_default(),
    })
}

impl Catalog {
    /// Exact-key lookup. `params` must already be canonical.
    pub fn find_artifact(
        &self,
        source: &SourceImageId,
        params: &RenderParams,
    ) -> InkResult<Option<DerivedArtifact>> {
        let conn = self.lock()?;
        let sql = format!(
            "SELECT {COLUMNS} FROM derived_artifacts
             WHERE source_image_id = ?1 AND palette = ?2 AND algorithm = ?3
               AND strength_bits = ?4 AND width = ?5 AND height = ?6 AND resize_method = ?7"
        );
        let found = conn
            .query_row(
                &sql,
                params![
                    source.as_str(),
                    params.palette,
                    params.algorithm,
                    i64::from(params.strength_bits()),
                    params.width,
                    params.height,
                    params.resize_method.as_str(),
                ],
                artifact_from_row,
            )
            .optional()?;
        Ok(found)
    }

    /// Record a freshly built artifact. Fails on a duplicate key or storage path.
    pub fn insert_artifact(&self, artifact: &DerivedArtifact) -> InkResult<()> {
        let conn = self.lock()?;
        let p = &artifact.params;
        conn.execute(
            &format!("INSERT INTO derived_artifacts ({COLUMNS}) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)"),
            params![
                artifact.id.as_str(),
                artifact.source_image_id.as_str(),
                p.palette,
                p.algorithm,
                i64::from(p.strength_bits()),
                p.width,
                p.height,
                p.resize_method.as_str(),
                artifact.storage_path.to_string_lossy(),
                artifact.created_at.timestamp_millis(),
            ],
        )?;
        Ok(())
    }

    /// Artifact row by id.
    pub fn artifact(&self, id: &ArtifactId) -> InkResult<Option<DerivedArtifact>> {
        let conn = self.lock()?;
        let found = conn
            .query_row(
                &format!("SELECT {COLUMNS} FROM derived_artifacts WHERE id = ?1"),
                [id.as_str()],
                artifact_from_row,
            )
            .optional()?;
        Ok(found)
    }

    /// Delete one row, returning whether it existed.
    pub fn delete_artifact(&self, id: &ArtifactId) -> InkResult<bool> {
        let conn = self.lock()?;
        let n = conn.execute("DELETE FROM derived_artifacts WHERE id = ?1", [id.as_str()])?;
        Ok(n > 0)
    }

    /// Every artifact row of `source`.
    pub fn artifacts_for_source(&self, source: &SourceImageId) -> InkResult<Vec<DerivedArtifact>> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT {COLUMNS} FROM derived_artifacts WHERE source_image_id = ?1 ORDER BY created_at"
        ))?;
        let rows = stmt
            .query_map([source.as_str()], artifact_from_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(rows)
    }

    /// Every artifact row, oldest first.
    pub fn all_artifacts(&self) -> InkResult<Vec<DerivedArtifact>> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT {COLUMNS} FROM derived_artifacts ORDER BY created_at"
        ))?;
        let rows = stmt
            .query_map([], artifact_from_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(rows)
    }

    /// Drop every artifact row. Returns the number removed.
    pub fn clear_artifacts(&self) -> InkResult<usize> {
        let conn = self.lock()?;
        Ok(conn.execute("DELETE FROM derived_artifacts", [])?)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/catalog/artifacts.rs"]
mod tests;
