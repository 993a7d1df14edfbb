//! Rendering and Visualization
//!
//! This module contains the editor overlay drawing:
//! - The draw surface abstraction and a recording implementation
//! - Hit-testing of screen clicks against tagged primitives
//! - Sprite geometry, source region, socket and pivot overlays
//! - Canvas statistics text

pub mod sprite_draw;
pub mod stats;
pub mod surface;

// Re-export commonly used items
pub use hit_test::HitTestCanvas;
pub use sprite_draw::SpriteOverlay;
pub use surface::{DrawCommand, DrawList, DrawSurface};
