//! Geometry utility functions
//!
//! Shared geometry functions to avoid code duplication across the codebase.
//! Functions for pixel snapping, edge normals and averaging positions.

use bevy::math::{Vec2, Vec3};
use kurbo::Point;

/// Round a texture-space point to the nearest whole pixel
///
/// Halves round away from zero.
pub fn snap_to_pixel(point: Point) -> Point {
    Point::new(point.x.round(), point.y.round())
}

/// Round to the nearest whole pixel, never going below zero
pub fn snap_non_negative(value: f64) -> f64 {
    value.round().max(0.0)
}

/// The left-hand normal of the segment `from -> to` in screen space
///
/// A zero-length segment yields a zero normal instead of dividing by zero.
pub fn edge_normal(from: Vec2, to: Vec2) -> Vec2 {
    let direction = (to - from).normalize_or_zero();
    Vec2::new(-direction.y, direction.x)
}

/// Arithmetic mean of a set of world positions
pub fn centroid(positions: &[Vec3]) -> Option<Vec3> {
    if positions.is_empty() {
        return None;
    }
    let sum: Vec3 = positions.iter().copied().sum();
    Some(sum / positions.len() as f32)
}

/// Distance from `point` to the segment `from -> to`
pub fn distance_to_segment(point: Vec2, from: Vec2, to: Vec2) -> f32 {
    let segment = to - from;
    let length_squared = segment.length_squared();
    if length_squared <= f32::EPSILON {
        return point.distance(from);
    }
    let t = ((point - from).dot(segment) / length_squared).clamp(0.0, 1.0);
    point.distance(from + segment * t)
}
