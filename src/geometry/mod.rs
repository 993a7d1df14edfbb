//! Geometric Primitives and Operations

pub mod coordinates;
pub mod region_handle;
pub mod utilities;

// Re-export commonly used items
pub use coordinates::{OrthographicView, PaperAxes, SpriteSpace, ViewProjection};
pub use region_handle::RegionHandle;
pub use utilities::{centroid, edge_normal, snap_non_negative, snap_to_pixel};
