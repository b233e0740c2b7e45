//! Two-tier sync engine: scratch cell → annotation store.
//!
//! - **Scratch**: the live geometry of the box under the active gesture.
//!   Written on every pointer move; cheap, and invisible to store observers.
//!
//! - **Store**: the observable, canonical list. The scratch is flushed into
//!   it according to the [`FlushPolicy`], and always when the gesture ends.
//!
//! The scratch is loaded from the store when a gesture begins, so a new
//! gesture never starts from stale geometry left by the previous one.

use boxmark_core::{
    AnnotationId, AnnotationStore, FinalizedAnnotation, FlushPolicy, Rect, StoreError,
};
use boxmark_render::LiveOverride;

/// Live geometry for the gesture target, not yet (or not only) in the store.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScratchCell {
    pub id: AnnotationId,
    pub geometry: Rect,
    /// Set when `geometry` differs from what the store last received.
    dirty: bool,
}

/// Holds the authoritative store and the per-gesture scratch cell.
pub struct SyncEngine {
    /// The current annotation list (single source of truth).
    store: AnnotationStore,

    scratch: Option<ScratchCell>,

    policy: FlushPolicy,
}

impl SyncEngine {
    pub fn new(policy: FlushPolicy) -> Self {
        Self::with_store(AnnotationStore::new(), policy)
    }

    pub fn with_store(store: AnnotationStore, policy: FlushPolicy) -> Self {
        Self {
            store,
            scratch: None,
            policy,
        }
    }

    pub fn store(&self) -> &AnnotationStore {
        &self.store
    }

    /// Direct store access for mutations that bypass gestures (insert on
    /// draw commit, labels, removal).
    pub fn store_mut(&mut self) -> &mut AnnotationStore {
        &mut self.store
    }

    pub fn scratch(&self) -> Option<&ScratchCell> {
        self.scratch.as_ref()
    }

    pub fn policy(&self) -> FlushPolicy {
        self.policy
    }

    // ─── Gesture boundaries ──────────────────────────────────────────────

    /// Load the scratch from the store for a gesture on `id`.
    ///
    /// Returns the starting geometry, or `None` if the id is unknown.
    pub fn begin_scratch(&mut self, id: AnnotationId) -> Option<Rect> {
        if let Some(stale) = self.scratch.take() {
            log::warn!("scratch for {:?} still open at gesture start, discarded", stale.id);
        }
        let geometry = self.store.get(id)?.geometry;
        self.scratch = Some(ScratchCell {
            id,
            geometry,
            dirty: false,
        });
        Some(geometry)
    }

    /// Record new live geometry for the scratch target.
    ///
    /// Under [`FlushPolicy::EveryMove`] it is flushed immediately.
    pub fn write_scratch(&mut self, geometry: Rect) -> Result<(), StoreError> {
        let Some(cell) = self.scratch.as_mut() else {
            return Ok(());
        };
        if !geometry.is_contained() {
            return Err(StoreError::ContainmentViolation {
                id: Some(cell.id),
                rect: geometry,
            });
        }
        if cell.geometry != geometry {
            cell.geometry = geometry;
            cell.dirty = true;
        }
        log::trace!("scratch {:?} -> {geometry:?}", cell.id);
        if self.policy == FlushPolicy::EveryMove {
            self.flush()?;
        }
        Ok(())
    }

    /// Push dirty scratch geometry into the store.
    ///
    /// Returns `true` if the store was written.
    pub fn flush(&mut self) -> Result<bool, StoreError> {
        let Some(cell) = self.scratch.as_mut() else {
            return Ok(false);
        };
        if !cell.dirty {
            return Ok(false);
        }
        self.store.update_geometry(cell.id, cell.geometry)?;
        cell.dirty = false;
        Ok(true)
    }

    /// Flush and close the scratch at gesture end.
    pub fn end_scratch(&mut self) -> Result<bool, StoreError> {
        let flushed = self.flush();
        self.scratch = None;
        flushed
    }

    /// Close the scratch without writing it (target gone).
    pub fn discard_scratch(&mut self) {
        if let Some(cell) = self.scratch.take() {
            log::debug!("scratch for {:?} discarded", cell.id);
        }
    }

    /// The scratch as a render override, while it holds unflushed geometry.
    pub fn live_override(&self) -> Option<LiveOverride> {
        self.scratch.filter(|c| c.dirty).map(|c| LiveOverride {
            id: c.id,
            geometry: c.geometry,
        })
    }

    /// Snapshot of the store with any pending scratch geometry applied.
    pub fn snapshot(&self) -> Vec<FinalizedAnnotation> {
        let mut snapshot = self.store.snapshot();
        if let Some(o) = self.live_override()
            && let Some(entry) = snapshot.iter_mut().find(|a| a.id == o.id)
        {
            entry.geometry = o.geometry;
        }
        snapshot
    }
}
