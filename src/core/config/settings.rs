//! Editor settings and built-in defaults
//!
//! Sizes are in screen pixels. Colors are linear RGBA.

use bevy::color::LinearRgba;
use bevy::prelude::Resource;

// =================================================================
// HANDLE AND OVERLAY SIZES
// =================================================================

pub const VERTEX_HANDLE_SIZE: f32 = 8.0;
pub const CORNER_HANDLE_SIZE: f32 = 8.0;
pub const EDGE_HANDLE_SIZE: f32 = 6.0;
pub const BAKED_VERTEX_SIZE: f32 = 3.0;
pub const NORMAL_TICK_LENGTH: f32 = 15.0;
pub const SOCKET_DIAMOND_SIZE: f32 = 5.0;

/// Distance in pixels within which a click still hits a line
pub const DEFAULT_HIT_TOLERANCE: f32 = 3.0;

// =================================================================
// CANVAS TEXT LAYOUT
// =================================================================

pub const TEXT_MARGIN_X: f32 = 6.0;
pub const TEXT_START_Y: f32 = 42.0;
pub const TEXT_LINE_HEIGHT: f32 = 18.0;

// =================================================================
// COLORS
// =================================================================

pub const COLLISION_GEOMETRY_COLOR: LinearRgba = LinearRgba::new(1.0, 1.0, 0.0, 1.0);
pub const RENDER_GEOMETRY_COLOR: LinearRgba = LinearRgba::new(1.0, 0.2, 0.0, 1.0);
pub const SOURCE_REGION_COLOR: LinearRgba = LinearRgba::new(1.0, 1.0, 1.0, 0.8);
pub const NORMAL_TICK_COLOR: LinearRgba = LinearRgba::new(0.0, 1.0, 0.0, 0.5);
pub const BAKED_VERTEX_COLOR: LinearRgba = LinearRgba::new(1.0, 1.0, 0.0, 0.5);
pub const BAKED_LINE_COLOR: LinearRgba = LinearRgba::new(1.0, 1.0, 0.0, 0.25);
pub const SOCKET_COLOR: LinearRgba = LinearRgba::new(1.0, 0.5, 0.5, 1.0);
pub const SOCKET_NAME_COLOR: LinearRgba = LinearRgba::new(1.0, 0.77, 0.77, 1.0);
pub const TEXT_COLOR: LinearRgba = LinearRgba::WHITE;

/// Which optional overlays the viewport draws
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ViewFlags {
    pub show_source_texture: bool,
    pub show_sockets: bool,
    pub show_normals: bool,
    pub show_pivot: bool,
}

impl Default for ViewFlags {
    fn default() -> Self {
        Self {
            show_source_texture: false,
            show_sockets: true,
            show_normals: true,
            show_pivot: true,
        }
    }
}

/// Runtime settings for the editor viewport
#[derive(Resource, Debug, Clone, PartialEq)]
pub struct EditorSettings {
    pub vertex_handle_size: f32,
    pub corner_handle_size: f32,
    pub edge_handle_size: f32,
    pub baked_vertex_size: f32,
    pub normal_tick_length: f32,
    pub socket_diamond_size: f32,
    pub hit_tolerance: f32,
    pub collision_color: LinearRgba,
    pub render_color: LinearRgba,
    pub source_region_color: LinearRgba,
    pub normal_color: LinearRgba,
    pub view_flags: ViewFlags,
}

impl Default for EditorSettings {
    fn default() -> Self {
        Self {
            vertex_handle_size: VERTEX_HANDLE_SIZE,
            corner_handle_size: CORNER_HANDLE_SIZE,
            edge_handle_size: EDGE_HANDLE_SIZE,
            baked_vertex_size: BAKED_VERTEX_SIZE,
            normal_tick_length: NORMAL_TICK_LENGTH,
            socket_diamond_size: SOCKET_DIAMOND_SIZE,
            hit_tolerance: DEFAULT_HIT_TOLERANCE,
            collision_color: COLLISION_GEOMETRY_COLOR,
            render_color: RENDER_GEOMETRY_COLOR,
            source_region_color: SOURCE_REGION_COLOR,
            normal_color: NORMAL_TICK_COLOR,
            view_flags: ViewFlags::default(),
        }
    }
}

impl EditorSettings {
    /// Apply overrides from the user config file
    pub fn with_config(mut self, config: &crate::core::config::ConfigFile) -> Self {
        let flags = &mut self.view_flags;
        if let Some(show) = config.show_source_texture {
            flags.show_source_texture = show;
        }
        if let Some(show) = config.show_sockets {
            flags.show_sockets = show;
        }
        if let Some(show) = config.show_normals {
            flags.show_normals = show;
        }
        if let Some(show) = config.show_pivot {
            flags.show_pivot = show;
        }
        if let Some(tolerance) = config.hit_tolerance {
            self.hit_tolerance = tolerance.max(0.0);
        }
        self
    }
}
