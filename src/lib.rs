//! Sprite geometry editing: collision and render polygons, source regions,
//! sockets and pivots, with hit-testing and undoable edits.
pub mod core;
pub mod data;
pub mod editing;
pub mod geometry;
pub mod logging;
pub mod rendering;
