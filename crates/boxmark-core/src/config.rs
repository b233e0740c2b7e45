//! Editor configuration.
//!
//! Every field has a default matching the stock behavior, so an empty JSON
//! object (or no config at all) yields a working editor.

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};

/// When the scratch geometry of an in-flight gesture is written back into
/// the observable store.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FlushPolicy {
    /// Write on every pointer move. Observers see live geometry.
    #[default]
    EveryMove,
    /// Write only when the gesture ends. The store revision stays put while
    /// dragging, so store-driven views do not re-render per move.
    GestureEnd,
}

/// Tunables for gestures, handles, and seeding.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    /// A drawn box commits only if both sides exceed this (pixels).
    /// Default: **10**.
    pub min_draw_px: f64,

    /// Resizing never shrinks either side below this (pixels). Default: **20**.
    pub min_resize_px: f64,

    /// Side of the square resize handles (pixels). Default: **10**.
    pub handle_size_px: f64,

    /// Extra hit radius around each handle (pixels). Default: **4**.
    pub handle_hit_slop_px: f64,

    /// Side used for seeds that arrive without a width or height
    /// (percent). Default: **10**.
    pub seed_default_size_percent: f64,

    pub flush_policy: FlushPolicy,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            min_draw_px: 10.0,
            min_resize_px: 20.0,
            handle_size_px: 10.0,
            handle_hit_slop_px: 4.0,
            seed_default_size_percent: 10.0,
            flush_policy: FlushPolicy::EveryMove,
        }
    }
}

impl EditorConfig {
    /// Parse a JSON config, filling missing fields with defaults.
    ///
    /// # Errors
    /// Returns [`ConfigError`] on malformed JSON or out-of-range sizes.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: EditorConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Check that every size is positive and finite. The hit slop may be zero.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let sizes = [
            ("min_draw_px", self.min_draw_px),
            ("min_resize_px", self.min_resize_px),
            ("handle_size_px", self.handle_size_px),
            ("seed_default_size_percent", self.seed_default_size_percent),
        ];
        for (field, value) in sizes {
            if !(value.is_finite() && value > 0.0) {
                return Err(ConfigError::InvalidSize { field, value });
            }
        }
        if !(self.handle_hit_slop_px.is_finite() && self.handle_hit_slop_px >= 0.0) {
            return Err(ConfigError::InvalidSize {
                field: "handle_hit_slop_px",
                value: self.handle_hit_slop_px,
            });
        }
        Ok(())
    }
}
