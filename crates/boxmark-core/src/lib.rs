pub mod config;
pub mod error;
pub mod geometry;
pub mod handle;
pub mod id;
pub mod store;
pub mod transform;
pub mod viewport;

pub use config::{EditorConfig, FlushPolicy};
pub use error::{ConfigError, StoreError};
pub use geometry::{Edges, PERCENT_MAX, PixelPoint, PixelRect, Rect};
pub use handle::{AxisEdge, HandleEdges, ResizeHandle};
pub use id::AnnotationId;
pub use store::{AnnotationEntity, AnnotationStore, FinalizedAnnotation, Origin, SeedBox};
pub use transform::{point_to_image, rect_to_container, to_percent, to_pixels};
pub use viewport::{ImageBox, ViewportGeometry, ViewportTracker};
