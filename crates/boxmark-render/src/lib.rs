//! Overlay rendering for the annotation editor: projection of the store into
//! pixels, hit testing against that projection, and Vello painting.

pub mod hit;
pub mod paint;
pub mod project;

pub use hit::{HitTarget, hit_test};
pub use paint::{OverlayTheme, paint_overlay};
pub use project::{HandleMark, LiveOverride, ProjectedBox, handle_marks, project};
