use std::{
    collections::HashSet,
    fs,
    path::{Path, PathBuf},
    sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard},
    time::Duration,
};

use anyhow::{Context, anyhow};

use crate::{
    bitplane::planes::BitPlanes,
    cache::{
        builder::ArtifactBuilder,
        files,
        inflight::{CacheKey, Claim, InFlight},
    },
    catalog::store::Catalog,
    foundation::core::{ArtifactId, SourceImageId},
    foundation::error::{InkError, InkResult},
    model::{DerivedArtifact, RenderParams},
    quantize::palette::Palette,
};

/// Outcome of [`ArtifactCache::verify`].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct VerifyReport {
    /// Index rows dropped because their image file was gone.
    pub dropped_rows: usize,
    /// Leftover temp files removed from the cache directory.
    pub removed_temp_files: usize,
    /// Image and plane files no index row points at.
    pub removed_orphan_files: usize,
}

/// Lazily materialized, exactly-once store of rendered artifacts.
///
/// The SQLite index is authoritative: a file that no row points at is never served, and a row
/// whose file has vanished is treated as a miss.
pub struct ArtifactCache {
    catalog: Arc<Catalog>,
    dir: PathBuf,
    builder: Arc<dyn ArtifactBuilder>,
    in_flight: InFlight,
    wait_timeout: Duration,
    // Shared by file writers, exclusive for directory sweeps.
    files_lock: RwLock<()>,
}

impl ArtifactCache {
    /// Cache over `catalog` storing files in `dir`, created if missing. `wait_timeout` bounds
    /// how long [`ArtifactCache::get_or_create`] waits on another caller's build.
    pub fn new(
        catalog: Arc<Catalog>,
        dir: impl Into<PathBuf>,
        builder: Arc<dyn ArtifactBuilder>,
        wait_timeout: Duration,
    ) -> InkResult<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir)
            .with_context(|| format!("create cache directory '{}'", dir.display()))?;
        Ok(Self {
            catalog,
            dir,
            builder,
            in_flight: InFlight::default(),
            wait_timeout,
            files_lock: RwLock::new(()),
        })
    }

    /// Directory holding images, plane files and temp files.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn writing(&self) -> InkResult<RwLockReadGuard<'_, ()>> {
        self.files_lock
            .read()
            .map_err(|_| anyhow!("cache file lock poisoned").into())
    }

    fn sweeping(&self) -> InkResult<RwLockWriteGuard<'_, ()>> {
        self.files_lock
            .write()
            .map_err(|_| anyhow!("cache file lock poisoned").into())
    }

    /// Return the artifact for `(source, params)`, building it on first request.
    pub fn get_or_create(
        &self,
        source: &SourceImageId,
        params: &RenderParams,
    ) -> InkResult<DerivedArtifact> {
        self.get_or_create_with_timeout(source, params, self.wait_timeout)
    }

    /// Like [`ArtifactCache::get_or_create`], but a caller that has to wait on another caller's
    /// build gives up after `timeout` with [`InkError::Concurrency`]. The build itself goes on.
    #[tracing::instrument(skip(self, params), fields(source = %source))]
    pub fn get_or_create_with_timeout(
        &self,
        source: &SourceImageId,
        params: &RenderParams,
        timeout: Duration,
    ) -> InkResult<DerivedArtifact> {
        let params = params.canonical()?;
        if let Some(hit) = self.lookup(source, &params)? {
            tracing::debug!(artifact = %hit.id, "cache hit");
            return Ok(hit);
        }

        match self.in_flight.claim(CacheKey::new(source, &params))? {
            Claim::Waiter(slot) => {
                tracing::debug!("waiting on in-flight build");
                slot.wait(timeout)
            }
            Claim::Leader(guard) => {
                // A build may have landed between the lookup and the claim.
                let result = match self.lookup(source, &params) {
                    Ok(Some(hit)) => Ok(hit),
                    Ok(None) => self.build(source, &params),
                    Err(e) => Err(e),
                };
                guard.finish(&result);
                result
            }
        }
    }

    /// Index lookup that treats a row without its file as a miss and drops it.
    fn lookup(
        &self,
        source: &SourceImageId,
        params: &RenderParams,
    ) -> InkResult<Option<DerivedArtifact>> {
        let Some(hit) = self.catalog.find_artifact(source, params)? else {
            return Ok(None);
        };
        if hit.storage_path.is_file() {
            return Ok(Some(hit));
        }
        tracing::warn!(
            artifact = %hit.id,
            path = %hit.storage_path.display(),
            "artifact file missing, rebuilding"
        );
        self.catalog.delete_artifact(&hit.id)?;
        self.remove_plane_files(&hit.id)?;
        Ok(None)
    }

    fn build(&self, source: &SourceImageId, params: &RenderParams) -> InkResult<DerivedArtifact> {
        let image_source = self
            .catalog
            .source(source)?
            .ok_or_else(|| InkError::input(format!("unknown source image '{source}'")))?;

        let pixels = self
            .builder
            .build(&image_source, params)
            .map_err(|e| InkError::build_failure(format!("render '{source}': {e}")))?;

        // A sweep must never see the file before its row.
        let _writing = self.writing()?;
        let id = ArtifactId::generate();
        let storage_path = self.dir.join(files::image_file_name(&id));
        files::write_png_atomic(&storage_path, &pixels)
            .map_err(|e| InkError::build_failure(format!("store '{source}': {e}")))?;

        let artifact = DerivedArtifact {
            id,
            source_image_id: source.clone(),
            params: params.clone(),
            storage_path,
            created_at: chrono::Utc::now(),
        };
        if let Err(e) = self.catalog.insert_artifact(&artifact) {
            let _ = files::remove_if_exists(&artifact.storage_path);
            return Err(InkError::build_failure(format!("index '{source}': {e}")));
        }

        tracing::info!(
            artifact = %artifact.id,
            source = %source,
            palette = %params.palette,
            algorithm = %params.algorithm,
            w = params.width,
            h = params.height,
            "built artifact"
        );
        Ok(artifact)
    }

    /// Paths of the `<id>_<plane>.bin` files for `artifact`, writing any that are missing.
    ///
    /// One file per palette entry, MSB-first packed, rows continuous.
    pub fn plane_files(&self, artifact: &DerivedArtifact) -> InkResult<Vec<PathBuf>> {
        let palette = Palette::resolve(&artifact.params.palette);
        let paths: Vec<PathBuf> = (0..palette.len())
            .map(|i| self.dir.join(files::plane_file_name(&artifact.id, i)))
            .collect();
        if paths.iter().all(|p| p.is_file()) {
            return Ok(paths);
        }

        let image = image::open(&artifact.storage_path)
            .with_context(|| format!("read artifact '{}'", artifact.storage_path.display()))?
            .to_rgb8();
        let planes = BitPlanes::from_image(&image, &palette)?;
        let _writing = self.writing()?;
        for (path, bytes) in paths.iter().zip(planes.planes.iter()) {
            files::write_bytes_atomic(path, bytes)?;
        }
        tracing::debug!(artifact = %artifact.id, planes = planes.len(), "wrote plane files");
        Ok(paths)
    }

    /// Delete one artifact: index row, image file and plane files.
    pub fn remove(&self, id: &ArtifactId) -> InkResult<bool> {
        let Some(artifact) = self.catalog.artifact(id)? else {
            return Ok(false);
        };
        self.discard(&artifact)?;
        Ok(true)
    }

    /// Delete every artifact of `source`. Returns how many were removed.
    pub fn remove_for_source(&self, source: &SourceImageId) -> InkResult<usize> {
        let artifacts = self.catalog.artifacts_for_source(source)?;
        for a in &artifacts {
            self.discard(a)?;
        }
        if !artifacts.is_empty() {
            tracing::info!(source = %source, count = artifacts.len(), "evicted artifacts");
        }
        Ok(artifacts.len())
    }

    fn discard(&self, artifact: &DerivedArtifact) -> InkResult<()> {
        self.catalog.delete_artifact(&artifact.id)?;
        files::remove_if_exists(&artifact.storage_path)?;
        self.remove_plane_files(&artifact.id)
    }

    fn remove_plane_files(&self, id: &ArtifactId) -> InkResult<()> {
        let prefix = format!("{id}_");
        for path in files::list_files(&self.dir, |name| {
            name.starts_with(&prefix) && name.ends_with(".bin")
        })? {
            files::remove_if_exists(&path)?;
        }
        Ok(())
    }

    /// Reconcile the directory with the index.
    ///
    /// Drops rows whose image file is gone, then deletes temp files and any image or plane
    /// file whose artifact has no row (left behind by source deletion or a crash). Waits for
    /// in-progress file writes to finish first.
    #[tracing::instrument(skip(self))]
    pub fn verify(&self) -> InkResult<VerifyReport> {
        let _sweeping = self.sweeping()?;
        let mut report = VerifyReport::default();
        let mut live = HashSet::new();
        for a in self.catalog.all_artifacts()? {
            if a.storage_path.is_file() {
                live.insert(a.id.as_str().to_string());
            } else {
                self.catalog.delete_artifact(&a.id)?;
                report.dropped_rows += 1;
            }
        }
        for path in files::list_files(&self.dir, files::is_cache_file)? {
            let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
                continue;
            };
            let removed = if files::is_temp_file(name) {
                &mut report.removed_temp_files
            } else if files::artifact_id_of(name).is_some_and(|id| !live.contains(id)) {
                &mut report.removed_orphan_files
            } else {
                continue;
            };
            if files::remove_if_exists(&path)? {
                *removed += 1;
            }
        }
        tracing::info!(
            dropped_rows = report.dropped_rows,
            removed_temp_files = report.removed_temp_files,
            removed_orphan_files = report.removed_orphan_files,
            "cache verified"
        );
        Ok(report)
    }

    /// Remove every artifact row and every cache file. Returns the number of rows dropped.
    pub fn purge(&self) -> InkResult<usize> {
        let _sweeping = self.sweeping()?;
        let rows = self.catalog.clear_artifacts()?;
        for path in files::list_files(&self.dir, files::is_cache_file)? {
            files::remove_if_exists(&path)?;
        }
        tracing::info!(rows, "cache purged");
        Ok(rows)
    }

    /// Number of builds currently in progress.
    pub fn in_flight(&self) -> usize {
        self.in_flight.len()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/cache/store.rs"]
mod tests;
