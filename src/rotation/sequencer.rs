use std::{
    collections::HashSet,
    sync::{Arc, Mutex},
};

use anyhow::anyhow;
use rand::{Rng, SeedableRng, rngs::StdRng, seq::SliceRandom};

use crate::{
    catalog::store::Catalog,
    foundation::core::SourceImageId,
    foundation::error::{InkError, InkResult},
};

/// What one [`RotationSequencer::reconcile`] pass changed.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ReconcileReport {
    /// Ids dropped from the rotation.
    pub removed: Vec<SourceImageId>,
    /// Ids placed at random ranks.
    pub inserted: Vec<SourceImageId>,
}

impl ReconcileReport {
    /// `true` when nothing changed.
    pub fn is_noop(&self) -> bool {
        self.removed.is_empty() && self.inserted.is_empty()
    }
}

/// Cyclic display order with random placement of newcomers.
///
/// Existing entries keep their relative order across reconciliation, so a device walking the
/// rotation is not reshuffled every time a photo is added.
pub struct RotationSequencer {
    catalog: Arc<Catalog>,
    rng: Mutex<StdRng>,
    maintenance: Mutex<()>,
}

impl RotationSequencer {
    /// `seed` makes insertion ranks reproducible; `None` seeds from the OS.
    pub fn new(catalog: Arc<Catalog>, seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(s) => StdRng::seed_from_u64(s),
            None => StdRng::from_entropy(),
        };
        Self {
            catalog,
            rng: Mutex::new(rng),
            maintenance: Mutex::new(()),
        }
    }

    /// The id that follows `current`, wrapping at the end.
    ///
    /// Starts from the first entry when `current` is `None` or no longer in the rotation.
    pub fn next(&self, current: Option<&SourceImageId>) -> InkResult<SourceImageId> {
        self.catalog
            .rotation_next(current)?
            .map(|e| e.source_image_id)
            .ok_or_else(|| InkError::sequence_empty("rotation has no source images"))
    }

    /// Ids in rotation order.
    pub fn order(&self) -> InkResult<Vec<SourceImageId>> {
        Ok(self
            .catalog
            .rotation_entries()?
            .into_iter()
            .map(|e| e.source_image_id)
            .collect())
    }

    /// Bring the rotation in line with `current`: drop vanished ids, insert new ones at a
    /// uniformly random rank. Each insertion commits on its own.
    #[tracing::instrument(skip_all, fields(current = current.len()))]
    pub fn reconcile(&self, current: &[SourceImageId]) -> InkResult<ReconcileReport> {
        let _serial = self
            .maintenance
            .lock()
            .map_err(|_| anyhow!("rotation maintenance lock poisoned"))?;

        let wanted: HashSet<SourceImageId> = current.iter().cloned().collect();
        let removed = self.catalog.rotation_retain(&wanted)?;

        let present: HashSet<SourceImageId> = self.order()?.into_iter().collect();
        let mut count = present.len();
        let mut inserted = Vec::new();
        let mut seen = HashSet::new();
        for id in current {
            if present.contains(id) || !seen.insert(id) {
                continue;
            }
            let rank = self.pick_rank(count)?;
            let position = self.catalog.rotation_insert_at_rank(id, rank)?;
            tracing::debug!(source = %id, rank, position, "inserted into rotation");
            inserted.push(id.clone());
            count += 1;
        }

        let report = ReconcileReport { removed, inserted };
        if !report.is_noop() {
            tracing::info!(
                removed = report.removed.len(),
                inserted = report.inserted.len(),
                total = count,
                "rotation reconciled"
            );
        }
        Ok(report)
    }

    /// Discard the current order and lay out `ids` in a fresh random permutation.
    pub fn shuffle(&self, ids: &[SourceImageId]) -> InkResult<()> {
        let _serial = self
            .maintenance
            .lock()
            .map_err(|_| anyhow!("rotation maintenance lock poisoned"))?;

        let mut seen = HashSet::new();
        let mut order: Vec<SourceImageId> =
            ids.iter().filter(|id| seen.insert(*id)).cloned().collect();
        {
            let mut rng = self
                .rng
                .lock()
                .map_err(|_| anyhow!("rotation rng lock poisoned"))?;
            order.shuffle(&mut *rng);
        }
        self.catalog.rotation_replace(&order)?;
        tracing::info!(total = order.len(), "rotation shuffled");
        Ok(())
    }

    fn pick_rank(&self, count: usize) -> InkResult<usize> {
        let mut rng = self
            .rng
            .lock()
            .map_err(|_| anyhow!("rotation rng lock poisoned"))?;
        Ok(rng.gen_range(0..=count))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/rotation/sequencer.rs"]
mod tests;
