use std::{
    collections::HashMap,
    sync::{Arc, Condvar, Mutex},
    time::{Duration, Instant},
};

use anyhow::anyhow;

use crate::{
    foundation::core::SourceImageId,
    foundation::error::{InkError, InkResult},
    model::{DerivedArtifact, RenderParams, ResizeMethod},
};

/// Hashable form of `(source id, canonical params)`.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub(crate) struct CacheKey {
    source: SourceImageId,
    palette: String,
    algorithm: String,
    strength_bits: u32,
    width: u32,
    height: u32,
    resize_method: ResizeMethod,
}

impl CacheKey {
    pub(crate) fn new(source: &SourceImageId, params: &RenderParams) -> Self {
        Self {
            source: source.clone(),
            palette: params.palette.clone(),
            algorithm: params.algorithm.clone(),
            strength_bits: params.strength_bits(),
            width: params.width,
            height: params.height,
            resize_method: params.resize_method,
        }
    }
}

/// Rendezvous for one in-progress build.
#[derive(Default)]
pub(crate) struct BuildSlot {
    outcome: Mutex<Option<InkResult<DerivedArtifact>>>,
    ready: Condvar,
}

impl BuildSlot {
    /// Block until the builder publishes, or `timeout` elapses.
    pub(crate) fn wait(&self, timeout: Duration) -> InkResult<DerivedArtifact> {
        let deadline = Instant::now() + timeout;
        let mut outcome = self
            .outcome
            .lock()
            .map_err(|_| anyhow!("build slot lock poisoned"))?;
        loop {
            if let Some(result) = outcome.as_ref() {
                return match result {
                    Ok(artifact) => Ok(artifact.clone()),
                    Err(e) => Err(e.duplicate()),
                };
            }
            let now = Instant::now();
            if now >= deadline {
                return Err(InkError::concurrency(format!(
                    "in-flight build not finished after {} ms",
                    timeout.as_millis()
                )));
            }
            let (guard, _) = self
                .ready
                .wait_timeout(outcome, deadline - now)
                .map_err(|_| anyhow!("build slot lock poisoned"))?;
            outcome = guard;
        }
    }

    fn publish(&self, result: InkResult<DerivedArtifact>) {
        if let Ok(mut outcome) = self.outcome.lock() {
            *outcome = Some(result);
        }
        self.ready.notify_all();
    }
}

pub(crate) enum Claim<'a> {
    /// This caller builds and must report through the guard.
    Leader(LeaderGuard<'a>),
    /// Another caller is building; wait on the slot.
    Waiter(Arc<BuildSlot>),
}

/// Per-key registry of builds in progress.
#[derive(Default)]
pub(crate) struct InFlight {
    slots: Mutex<HashMap<CacheKey, Arc<BuildSlot>>>,
}

impl InFlight {
    pub(crate) fn claim(&self, key: CacheKey) -> InkResult<Claim<'_>> {
        let mut slots = self
            .slots
            .lock()
            .map_err(|_| anyhow!("in-flight map lock poisoned"))?;
        if let Some(slot) = slots.get(&key) {
            return Ok(Claim::Waiter(Arc::clone(slot)));
        }
        let slot = Arc::new(BuildSlot::default());
        slots.insert(key.clone(), Arc::clone(&slot));
        Ok(Claim::Leader(LeaderGuard {
            owner: self,
            key,
            slot,
            done: false,
        }))
    }

    pub(crate) fn len(&self) -> usize {
        self.slots.lock().map(|s| s.len()).unwrap_or(0)
    }

    fn release(&self, key: &CacheKey) {
        if let Ok(mut slots) = self.slots.lock() {
            slots.remove(key);
        }
    }
}

/// Held by the building caller. Dropping it unfinished (e.g. on panic) fails the waiters.
pub(crate) struct LeaderGuard<'a> {
    owner: &'a InFlight,
    key: CacheKey,
    slot: Arc<BuildSlot>,
    done: bool,
}

impl LeaderGuard<'_> {
    /// Publish to waiters and retire the slot. The next caller for this key sees the index.
    pub(crate) fn finish(mut self, result: &InkResult<DerivedArtifact>) {
        let shared = match result {
            Ok(a) => Ok(a.clone()),
            Err(e) => Err(e.duplicate()),
        };
        self.owner.release(&self.key);
        self.slot.publish(shared);
        self.done = true;
    }
}

impl Drop for LeaderGuard<'_> {
    fn drop(&mut self) {
        if !self.done {
            self.owner.release(&self.key);
            self.slot
                .publish(Err(InkError::build_failure("builder abandoned the build")));
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/cache/inflight.rs"]
mod tests;
