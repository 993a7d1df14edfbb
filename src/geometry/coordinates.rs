//! Coordinate conversion between texture space, world space and screen space
//!
//! Texture space is the pixel grid of a sprite's source image with the origin
//! at the top-left and Y growing downwards. World space is the 3D space the
//! sprite is placed in, where the sprite plane is spanned by [`PaperAxes::x`]
//! and [`PaperAxes::y`] (Y up). Screen space is viewport pixels, origin
//! top-left.

use bevy::math::{Vec2, Vec3};
use kurbo::Point;

/// The world-space basis of the sprite plane
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PaperAxes {
    /// Texture X maps onto this axis
    pub x: Vec3,
    /// Texture "up" (negative texture Y) maps onto this axis
    pub y: Vec3,
    /// Depth, pointing out of the sprite plane towards the viewer
    pub z: Vec3,
}

impl Default for PaperAxes {
    fn default() -> Self {
        Self {
            x: Vec3::X,
            y: Vec3::Z,
            z: Vec3::Y,
        }
    }
}

/// Maps one sprite's texture space into world space
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpriteSpace {
    /// Pivot in texture space; it lands on `origin` in world space
    pub pivot: Point,
    pub units_per_pixel: f32,
    pub origin: Vec3,
    pub axes: PaperAxes,
}

impl SpriteSpace {
    pub fn new(pivot: Point, pixels_per_unit: f32, axes: PaperAxes) -> Self {
        let units_per_pixel = if pixels_per_unit > 0.0 {
            1.0 / pixels_per_unit
        } else {
            1.0
        };
        Self {
            pivot,
            units_per_pixel,
            origin: Vec3::ZERO,
            axes,
        }
    }

    /// Space for the auxiliary source texture view.
    ///
    /// The view shows the whole texture with a bottom-left pivot and is pushed
    /// one unit back along the depth axis so it never occludes the sprite.
    pub fn source_view(texture_size: Vec2, pixels_per_unit: f32, axes: PaperAxes) -> Self {
        let mut space = Self::new(
            Point::new(0.0, texture_size.y as f64),
            pixels_per_unit,
            axes,
        );
        space.origin = -axes.z;
        space
    }

    pub fn texture_to_pivot(&self, point: Point) -> Vec2 {
        Vec2::new(
            (point.x - self.pivot.x) as f32,
            (self.pivot.y - point.y) as f32,
        )
    }

    pub fn pivot_to_texture(&self, point: Vec2) -> Point {
        Point::new(
            point.x as f64 + self.pivot.x,
            self.pivot.y - point.y as f64,
        )
    }

    pub fn texture_to_world(&self, point: Point) -> Vec3 {
        let pivot_space = self.texture_to_pivot(point);
        self.origin
            + (self.axes.x * pivot_space.x + self.axes.y * pivot_space.y) * self.units_per_pixel
    }

    pub fn world_to_texture(&self, world: Vec3) -> Point {
        let relative = world - self.origin;
        let pivot_space = Vec2::new(
            relative.dot(self.axes.x) / self.units_per_pixel,
            relative.dot(self.axes.y) / self.units_per_pixel,
        );
        self.pivot_to_texture(pivot_space)
    }

    pub fn texture_to_screen(&self, view: &dyn ViewProjection, point: Point) -> Vec2 {
        view.world_to_pixel(self.texture_to_world(point))
    }

    pub fn screen_to_texture(&self, view: &dyn ViewProjection, pixel: Vec2) -> Point {
        self.world_to_texture(view.pixel_to_world(pixel))
    }

    /// Convert a world-space drag into a texture-space delta.
    ///
    /// Y is negated: texture space grows downwards, the world up axis does not.
    pub fn texture_delta_from_world(&self, drag: Vec3) -> kurbo::Vec2 {
        kurbo::Vec2::new(
            (drag.dot(self.axes.x) / self.units_per_pixel) as f64,
            (-drag.dot(self.axes.y) / self.units_per_pixel) as f64,
        )
    }

    pub fn world_delta_from_texture(&self, delta: kurbo::Vec2) -> Vec3 {
        (self.axes.x * delta.x as f32 - self.axes.y * delta.y as f32) * self.units_per_pixel
    }
}

/// Projection between world space and viewport pixels
pub trait ViewProjection {
    fn world_to_pixel(&self, world: Vec3) -> Vec2;
    fn pixel_to_world(&self, pixel: Vec2) -> Vec3;
}

/// An orthographic camera looking straight at the sprite plane
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OrthographicView {
    /// World point shown at the center of the viewport
    pub center: Vec3,
    /// Pixels per world unit
    pub zoom: f32,
    pub viewport_size: Vec2,
    pub axes: PaperAxes,
}

impl Default for OrthographicView {
    fn default() -> Self {
        Self {
            center: Vec3::ZERO,
            zoom: 1.0,
            viewport_size: Vec2::new(1280.0, 720.0),
            axes: PaperAxes::default(),
        }
    }
}

impl OrthographicView {
    pub fn new(center: Vec3, zoom: f32, viewport_size: Vec2) -> Self {
        Self {
            center,
            zoom,
            viewport_size,
            axes: PaperAxes::default(),
        }
    }
}

impl ViewProjection for OrthographicView {
    fn world_to_pixel(&self, world: Vec3) -> Vec2 {
        let relative = world - self.center;
        let half = self.viewport_size * 0.5;
        Vec2::new(
            half.x + relative.dot(self.axes.x) * self.zoom,
            half.y - relative.dot(self.axes.y) * self.zoom,
        )
    }

    fn pixel_to_world(&self, pixel: Vec2) -> Vec3 {
        let half = self.viewport_size * 0.5;
        self.center
            + self.axes.x * ((pixel.x - half.x) / self.zoom)
            + self.axes.y * ((half.y - pixel.y) / self.zoom)
    }
}
