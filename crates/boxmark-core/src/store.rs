//! The canonical annotation list.
//!
//! Entities are kept in insertion order. Geometry is percent-space only and
//! every write re-checks containment: the store rejects, it never clamps.
//! Clamping belongs to whoever produced the geometry.

use crate::config::EditorConfig;
use crate::error::StoreError;
use crate::geometry::Rect;
use crate::id::AnnotationId;
use serde::{Deserialize, Serialize};

/// How an annotation came to exist.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Origin {
    /// Seeded from an external object detector.
    Detected,
    /// Drawn by the user.
    UserDrawn,
}

impl Origin {
    fn id_prefix(self) -> &'static str {
        match self {
            Origin::Detected => "detected",
            Origin::UserDrawn => "drawn",
        }
    }
}

/// One labeled region of the image.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnnotationEntity {
    pub id: AnnotationId,
    pub label: Option<String>,
    pub geometry: Rect,
    pub origin: Origin,
    /// Identifier of the upstream record this box was seeded from.
    pub source_reference: Option<String>,
}

/// A detector box handed in at session start.
///
/// Coordinates are percent-space and center-based. Missing sizes fall back
/// to [`EditorConfig::seed_default_size_percent`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeedBox {
    pub id: String,
    pub x: f64,
    pub y: f64,
    #[serde(default)]
    pub width: Option<f64>,
    #[serde(default)]
    pub height: Option<f64>,
}

/// The read-only record handed to the caller when the session completes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FinalizedAnnotation {
    pub id: AnnotationId,
    pub label: Option<String>,
    pub geometry: Rect,
}

impl From<&AnnotationEntity> for FinalizedAnnotation {
    fn from(entity: &AnnotationEntity) -> Self {
        Self {
            id: entity.id,
            label: entity.label.clone(),
            geometry: entity.geometry,
        }
    }
}

/// Ordered, percent-space collection of annotations.
#[derive(Debug, Clone, Default)]
pub struct AnnotationStore {
    entities: Vec<AnnotationEntity>,
    /// Bumped on every successful mutation.
    revision: u64,
}

impl AnnotationStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Import detector output as `Detected` entities with unset labels.
    ///
    /// Seeds are external input: out-of-range boxes are clamped into the
    /// image (with a warning) rather than rejected. Non-finite seeds are
    /// skipped. Returns the ids in seed order.
    pub fn seed(&mut self, seeds: &[SeedBox], config: &EditorConfig) -> Vec<AnnotationId> {
        let mut ids = Vec::with_capacity(seeds.len());
        for seed in seeds {
            let default = config.seed_default_size_percent;
            let raw = Rect::new(
                seed.x,
                seed.y,
                seed.width.unwrap_or(default),
                seed.height.unwrap_or(default),
            );
            if !raw.is_finite() {
                log::warn!("seed {:?} has non-finite geometry, skipped", seed.id);
                continue;
            }
            let rect = if raw.is_contained() {
                raw
            } else {
                let clamped = raw.clamp_center();
                log::warn!("seed {:?} out of bounds {raw:?}, clamped to {clamped:?}", seed.id);
                clamped
            };
            match self.insert(rect, None, Origin::Detected, Some(seed.id.clone())) {
                Ok(id) => ids.push(id),
                Err(e) => log::error!("seed {:?} rejected: {e}", seed.id),
            }
        }
        ids
    }

    /// Append a new entity with a freshly generated id.
    pub fn insert(
        &mut self,
        rect: Rect,
        label: Option<String>,
        origin: Origin,
        source_reference: Option<String>,
    ) -> Result<AnnotationId, StoreError> {
        if !rect.is_contained() {
            return Err(StoreError::ContainmentViolation { id: None, rect });
        }
        let id = AnnotationId::generate(origin.id_prefix());
        self.entities.push(AnnotationEntity {
            id,
            label,
            geometry: rect,
            origin,
            source_reference,
        });
        self.revision += 1;
        log::debug!("insert {id:?} {origin:?} {rect:?}");
        Ok(id)
    }

    /// Replace an entity's geometry.
    pub fn update_geometry(&mut self, id: AnnotationId, rect: Rect) -> Result<(), StoreError> {
        if !rect.is_contained() {
            return Err(StoreError::ContainmentViolation { id: Some(id), rect });
        }
        let entity = self.get_mut(id)?;
        if entity.geometry != rect {
            entity.geometry = rect;
            self.revision += 1;
        }
        Ok(())
    }

    /// Set or clear an entity's label.
    pub fn update_label(&mut self, id: AnnotationId, label: Option<String>) -> Result<(), StoreError> {
        let entity = self.get_mut(id)?;
        if entity.label != label {
            entity.label = label;
            self.revision += 1;
        }
        Ok(())
    }

    /// Remove an entity, returning it. Remaining entries keep their order.
    pub fn remove(&mut self, id: AnnotationId) -> Result<AnnotationEntity, StoreError> {
        let pos = self
            .entities
            .iter()
            .position(|e| e.id == id)
            .ok_or(StoreError::UnknownAnnotation(id))?;
        self.revision += 1;
        log::debug!("remove {id:?}");
        Ok(self.entities.remove(pos))
    }

    /// All entities in insertion order.
    pub fn all(&self) -> &[AnnotationEntity] {
        &self.entities
    }

    pub fn get(&self, id: AnnotationId) -> Option<&AnnotationEntity> {
        self.entities.iter().find(|e| e.id == id)
    }

    pub fn contains(&self, id: AnnotationId) -> bool {
        self.get(id).is_some()
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Detached `{id, label, geometry}` copies in order.
    pub fn snapshot(&self) -> Vec<FinalizedAnnotation> {
        self.entities.iter().map(FinalizedAnnotation::from).collect()
    }

    fn get_mut(&mut self, id: AnnotationId) -> Result<&mut AnnotationEntity, StoreError> {
        self.entities
            .iter_mut()
            .find(|e| e.id == id)
            .ok_or(StoreError::UnknownAnnotation(id))
    }
}
