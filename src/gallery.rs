use std::{collections::HashSet, path::PathBuf, sync::Arc};

use crate::{
    cache::{
        builder::{ArtifactBuilder, PipelineBuilder},
        store::ArtifactCache,
    },
    catalog::store::Catalog,
    config::InkConfig,
    foundation::core::SourceImageId,
    foundation::error::InkResult,
    model::{DerivedArtifact, DeviceCursor, RenderParams, SourceImage},
    rotation::sequencer::{ReconcileReport, RotationSequencer},
};

/// What one device should display next.
#[derive(Clone, Debug, PartialEq)]
pub struct Frame {
    /// Source now shown.
    pub source_image_id: SourceImageId,
    /// Rendered image for the request params.
    pub artifact: DerivedArtifact,
    /// `<artifact id>_<index>.bin`, in palette order.
    pub planes: Vec<PathBuf>,
}

/// Outcome of [`Gallery::sync_sources`].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SyncReport {
    /// Sources no longer present.
    pub removed_sources: Vec<SourceImageId>,
    /// Artifacts deleted along with them.
    pub evicted_artifacts: usize,
    /// Rotation changes.
    pub rotation: ReconcileReport,
}

/// Wires the catalog, artifact cache and rotation together for the request path.
pub struct Gallery {
    catalog: Arc<Catalog>,
    cache: ArtifactCache,
    rotation: RotationSequencer,
}

impl Gallery {
    /// Open the catalog and cache described by `config`, rendering with the default pipeline.
    pub fn open(config: &InkConfig) -> InkResult<Self> {
        let builder = Arc::new(PipelineBuilder::new(config.pipeline_options()));
        Self::with_builder(config, builder)
    }

    /// Like [`Gallery::open`] with a caller-supplied artifact builder.
    pub fn with_builder(config: &InkConfig, builder: Arc<dyn ArtifactBuilder>) -> InkResult<Self> {
        config.validate()?;
        let catalog = Arc::new(Catalog::open(&config.database_path)?);
        let cache = ArtifactCache::new(
            Arc::clone(&catalog),
            &config.cache_dir,
            builder,
            config.build_wait_timeout(),
        )?;
        let rotation = RotationSequencer::new(Arc::clone(&catalog), config.rotation_seed);
        tracing::info!(
            db = %config.database_path.display(),
            cache = %config.cache_dir.display(),
            "gallery opened"
        );
        Ok(Self {
            catalog,
            cache,
            rotation,
        })
    }

    /// Shared SQLite catalog.
    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Artifact cache.
    pub fn cache(&self) -> &ArtifactCache {
        &self.cache
    }

    /// Rotation sequencer.
    pub fn rotation(&self) -> &RotationSequencer {
        &self.rotation
    }

    /// Make the registered sources equal the scanner's current view.
    ///
    /// Artifacts of vanished sources are evicted (rows and files) before the sources go, then
    /// the rotation is reconciled.
    #[tracing::instrument(skip_all, fields(sources = sources.len()))]
    pub fn sync_sources(&self, sources: &[SourceImage]) -> InkResult<SyncReport> {
        let keep: HashSet<&SourceImageId> = sources.iter().map(|s| &s.id).collect();
        let mut evicted = 0;
        for id in self.catalog.source_ids()? {
            if !keep.contains(&id) {
                evicted += self.cache.remove_for_source(&id)?;
            }
        }
        let removed_sources = self.catalog.replace_sources(sources)?;
        let ids: Vec<SourceImageId> = sources.iter().map(|s| s.id.clone()).collect();
        let rotation = self.rotation.reconcile(&ids)?;
        Ok(SyncReport {
            removed_sources,
            evicted_artifacts: evicted,
            rotation,
        })
    }

    /// Pick the next image for `cursor`, render or fetch it, export its planes, and move the
    /// cursor. The cursor is untouched on error.
    pub fn advance(&self, cursor: &mut DeviceCursor, params: &RenderParams) -> InkResult<Frame> {
        let next = self
            .rotation
            .next(cursor.current_source_image_id.as_ref())?;
        let artifact = self.cache.get_or_create(&next, params)?;
        let planes = self.cache.plane_files(&artifact)?;
        tracing::debug!(device = %cursor.device_id, source = %next, "advanced cursor");
        cursor.current_source_image_id = Some(next.clone());
        Ok(Frame {
            source_image_id: next,
            artifact,
            planes,
        })
    }
}

#[cfg(test)]
#[path = "../tests/unit/gallery.rs"]
mod tests;
