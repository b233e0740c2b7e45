//! Error types for the annotation core.
//!
//! Store errors signal caller bugs: the gesture controller always clamps
//! before writing, so a containment violation reaching the store means a
//! broken invariant upstream, not bad user input.

use crate::geometry::Rect;
use crate::id::AnnotationId;
use thiserror::Error;

/// Rejected mutation of the annotation store.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum StoreError {
    /// No annotation with this id (removed, or never issued).
    #[error("unknown annotation {0}")]
    UnknownAnnotation(AnnotationId),

    /// Geometry escapes the normalized image square.
    #[error("rect {rect:?} violates containment for {id:?}")]
    ContainmentViolation {
        /// Target annotation, `None` for an insert.
        id: Option<AnnotationId>,
        rect: Rect,
    },
}

/// Invalid editor configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("config parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// A size threshold must be finite and positive.
    #[error("{field} must be a positive finite number, got {value}")]
    InvalidSize { field: &'static str, value: f64 },
}
