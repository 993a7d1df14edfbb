//! Sprite asset data
//!
//! A sprite is a rectangular region of a source texture plus the polygon
//! geometry used to render it and to collide with it. Geometry is stored in
//! texture space (pixels, origin top-left, Y down).

use crate::data::bake;
use crate::geometry::utilities::snap_to_pixel;
use crate::geometry::{PaperAxes, SpriteSpace};
use anyhow::{Context, Result};
use bevy::log::{debug, warn};
use bevy::math::{Mat4, Quat, Vec2, Vec3};
use kurbo::{BezPath, Point, Shape, Size};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::fs;
use std::path::{Path, PathBuf};

/// Edge length of the triangle seeded by [`PolygonCollection::add_seed_triangle`]
pub const SEED_POLYGON_SIZE: f64 = 10.0;

/// Which of the sprite's two polygon collections is meant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GeometryKind {
    Collision,
    Render,
}

impl GeometryKind {
    pub fn name(self) -> &'static str {
        match self {
            GeometryKind::Collision => "Collision Geometry",
            GeometryKind::Render => "Render Geometry",
        }
    }
}

/// How a polygon collection is produced
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum PolygonMode {
    /// Regenerated from the source rectangle whenever the sprite changes
    #[default]
    SourceBoundingBox,
    /// Edited by hand; never regenerated
    FullyCustom,
}

/// A closed polygon; the last vertex connects back to the first
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Polygon {
    pub vertices: Vec<Point>,
}

impl Polygon {
    pub fn new(vertices: Vec<Point>) -> Self {
        Self { vertices }
    }

    pub fn len(&self) -> usize {
        self.vertices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    pub fn next_index(&self, index: usize) -> usize {
        (index + 1) % self.vertices.len().max(1)
    }

    /// Endpoints of the edge starting at `index`
    pub fn edge(&self, index: usize) -> Option<(Point, Point)> {
        let start = *self.vertices.get(index)?;
        let end = self.vertices[self.next_index(index)];
        Some((start, end))
    }

    pub fn edge_midpoint(&self, index: usize) -> Option<Point> {
        self.edge(index).map(|(start, end)| start.midpoint(end))
    }

    /// Insert the midpoint of edge `index` right after its start vertex.
    /// Returns the index of the new vertex.
    pub fn insert_edge_midpoint(&mut self, index: usize) -> Option<usize> {
        let midpoint = self.edge_midpoint(index)?;
        self.vertices.insert(index + 1, midpoint);
        Some(index + 1)
    }

    pub fn remove_vertex(&mut self, index: usize) -> Option<Point> {
        (index < self.vertices.len()).then(|| self.vertices.remove(index))
    }

    pub fn snap_to_pixel_grid(&mut self) {
        for vertex in &mut self.vertices {
            *vertex = snap_to_pixel(*vertex);
        }
    }

    fn to_bez_path(&self) -> BezPath {
        let mut path = BezPath::new();
        if let Some((first, rest)) = self.vertices.split_first() {
            path.move_to(*first);
            for vertex in rest {
                path.line_to(*vertex);
            }
            path.close_path();
        }
        path
    }

    /// Signed area in square pixels
    pub fn area(&self) -> f64 {
        self.to_bez_path().area()
    }
}

/// An ordered list of polygons plus how they were produced
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PolygonCollection {
    pub polygons: Vec<Polygon>,
    #[serde(default)]
    pub mode: PolygonMode,
}

impl PolygonCollection {
    pub fn custom(polygons: Vec<Polygon>) -> Self {
        Self {
            polygons,
            mode: PolygonMode::FullyCustom,
        }
    }

    pub fn is_custom(&self) -> bool {
        self.mode == PolygonMode::FullyCustom
    }

    pub fn mark_custom(&mut self) {
        self.mode = PolygonMode::FullyCustom;
    }

    pub fn vertex_count(&self) -> usize {
        self.polygons.iter().map(Polygon::len).sum()
    }

    /// Append a small triangle anchored at `base` and return its index
    pub fn add_seed_triangle(&mut self, base: Point) -> usize {
        let size = SEED_POLYGON_SIZE;
        self.polygons.push(Polygon::new(vec![
            Point::new(base.x, base.y),
            Point::new(base.x + size, base.y + size),
            Point::new(base.x, base.y + size),
        ]));
        self.mark_custom();
        self.polygons.len() - 1
    }

    /// Round every vertex of every polygon to whole pixels.
    /// Returns true if there was at least one vertex to snap.
    pub fn snap_all_vertices_to_pixel_grid(&mut self) -> bool {
        let mut touched = false;
        for polygon in &mut self.polygons {
            touched |= !polygon.is_empty();
            polygon.snap_to_pixel_grid();
        }
        touched
    }

    /// Rebuild auto-generated geometry; custom collections are left alone
    pub fn regenerate(&mut self, source_uv: Point, source_dimension: Size) {
        match self.mode {
            PolygonMode::FullyCustom => {}
            PolygonMode::SourceBoundingBox => {
                let (x, y) = (source_uv.x, source_uv.y);
                let (w, h) = (source_dimension.width, source_dimension.height);
                self.polygons = vec![Polygon::new(vec![
                    Point::new(x, y),
                    Point::new(x + w, y),
                    Point::new(x + w, y + h),
                    Point::new(x, y + h),
                ])];
            }
        }
    }
}

/// Where the pivot of a sprite sits relative to its source region
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum PivotMode {
    TopLeft,
    TopCenter,
    TopRight,
    CenterLeft,
    #[default]
    CenterCenter,
    CenterRight,
    BottomLeft,
    BottomCenter,
    BottomRight,
    Custom,
}

/// Local placement of a socket relative to the sprite pivot, in world units
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SocketTransform {
    pub translation: Vec3,
    pub rotation: Quat,
    pub scale: Vec3,
}

impl Default for SocketTransform {
    fn default() -> Self {
        Self {
            translation: Vec3::ZERO,
            rotation: Quat::IDENTITY,
            scale: Vec3::ONE,
        }
    }
}

impl SocketTransform {
    pub fn from_translation(translation: Vec3) -> Self {
        Self {
            translation,
            ..Default::default()
        }
    }

    pub fn to_matrix(&self) -> Mat4 {
        Mat4::from_scale_rotation_translation(self.scale, self.rotation, self.translation)
    }
}

/// A named attachment point on a sprite
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpriteSocket {
    pub name: String,
    #[serde(default)]
    pub local_transform: SocketTransform,
}

/// The image a sprite is cut from
///
/// Sprite files store only the texture's path and size. The alpha mask is
/// decoded by the host from the image itself and attached after loading with
/// [`SourceTexture::with_alpha`]; until then source region extraction finds
/// nothing.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SourceTexture {
    pub path: PathBuf,
    pub width: u32,
    pub height: u32,
    /// Row-major alpha values, one byte per texel. Not saved.
    #[serde(skip)]
    pub alpha: Option<Vec<u8>>,
}

impl SourceTexture {
    pub fn new(path: impl Into<PathBuf>, width: u32, height: u32) -> Self {
        Self {
            path: path.into(),
            width,
            height,
            alpha: None,
        }
    }

    /// Attach the alpha mask. A mask that does not cover the texture exactly
    /// is rejected and the texture stays without one.
    pub fn with_alpha(mut self, alpha: Vec<u8>) -> Self {
        let texels = self.width as usize * self.height as usize;
        if alpha.len() == texels {
            self.alpha = Some(alpha);
        } else {
            warn!(
                "Alpha mask for {:?} has {} values, expected {}",
                self.path,
                alpha.len(),
                texels
            );
        }
        self
    }

    pub fn size(&self) -> Vec2 {
        Vec2::new(self.width as f32, self.height as f32)
    }

    pub fn is_opaque(&self, x: i64, y: i64) -> bool {
        if x < 0 || y < 0 || x >= self.width as i64 || y >= self.height as i64 {
            return false;
        }
        self.alpha
            .as_ref()
            .and_then(|alpha| alpha.get((y * self.width as i64 + x) as usize))
            .is_some_and(|&a| a > 0)
    }
}

fn default_pixels_per_unit() -> f32 {
    1.0
}

/// A sprite asset
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sprite {
    pub name: String,
    #[serde(default)]
    pub source_texture: Option<SourceTexture>,
    pub source_uv: Point,
    pub source_dimension: Size,
    #[serde(default)]
    pub pivot_mode: PivotMode,
    #[serde(default)]
    pub custom_pivot_point: Point,
    #[serde(default = "default_pixels_per_unit")]
    pub pixels_per_unit: f32,
    #[serde(default)]
    pub collision_geometry: PolygonCollection,
    #[serde(default)]
    pub render_geometry: PolygonCollection,
    #[serde(default)]
    pub sockets: Vec<SpriteSocket>,
    /// Triangle list produced from the render geometry
    #[serde(skip)]
    pub baked_render_data: Vec<Point>,
}

impl Sprite {
    pub fn new(name: impl Into<String>, source_uv: Point, source_dimension: Size) -> Self {
        let mut sprite = Self {
            name: name.into(),
            source_texture: None,
            source_uv,
            source_dimension,
            pivot_mode: PivotMode::default(),
            custom_pivot_point: Point::ZERO,
            pixels_per_unit: default_pixels_per_unit(),
            collision_geometry: PolygonCollection::default(),
            render_geometry: PolygonCollection::default(),
            sockets: Vec::new(),
            baked_render_data: Vec::new(),
        };
        sprite.rebuild();
        sprite
    }

    pub fn with_texture(mut self, texture: SourceTexture) -> Self {
        self.source_texture = Some(texture);
        self
    }

    pub fn geometry(&self, kind: GeometryKind) -> &PolygonCollection {
        match kind {
            GeometryKind::Collision => &self.collision_geometry,
            GeometryKind::Render => &self.render_geometry,
        }
    }

    pub fn geometry_mut(&mut self, kind: GeometryKind) -> &mut PolygonCollection {
        match kind {
            GeometryKind::Collision => &mut self.collision_geometry,
            GeometryKind::Render => &mut self.render_geometry,
        }
    }

    pub fn socket(&self, name: &str) -> Option<&SpriteSocket> {
        self.sockets.iter().find(|socket| socket.name == name)
    }

    pub fn socket_mut(&mut self, name: &str) -> Option<&mut SpriteSocket> {
        self.sockets.iter_mut().find(|socket| socket.name == name)
    }

    /// Pivot position in texture space
    pub fn pivot_position(&self) -> Point {
        let (x, y) = (self.source_uv.x, self.source_uv.y);
        let (w, h) = (self.source_dimension.width, self.source_dimension.height);
        match self.pivot_mode {
            PivotMode::TopLeft => Point::new(x, y),
            PivotMode::TopCenter => Point::new(x + w * 0.5, y),
            PivotMode::TopRight => Point::new(x + w, y),
            PivotMode::CenterLeft => Point::new(x, y + h * 0.5),
            PivotMode::CenterCenter => Point::new(x + w * 0.5, y + h * 0.5),
            PivotMode::CenterRight => Point::new(x + w, y + h * 0.5),
            PivotMode::BottomLeft => Point::new(x, y + h),
            PivotMode::BottomCenter => Point::new(x + w * 0.5, y + h),
            PivotMode::BottomRight => Point::new(x + w, y + h),
            PivotMode::Custom => self.custom_pivot_point,
        }
    }

    /// Move the pivot by a texture-space delta, switching to a custom pivot
    pub fn nudge_pivot(&mut self, delta: kurbo::Vec2) {
        if self.pivot_mode != PivotMode::Custom {
            self.custom_pivot_point = self.pivot_position();
            self.pivot_mode = PivotMode::Custom;
        }
        self.custom_pivot_point += delta;
    }

    /// Texture space of the sprite as it is rendered
    pub fn render_space(&self, axes: PaperAxes) -> SpriteSpace {
        SpriteSpace::new(self.pivot_position(), self.pixels_per_unit, axes)
    }

    /// Texture space of the full source texture view
    pub fn source_view_space(&self, axes: PaperAxes) -> SpriteSpace {
        SpriteSpace::source_view(self.texture_size(), self.pixels_per_unit, axes)
    }

    /// Size of the source texture, or the extent of the source region when
    /// no texture is attached
    pub fn texture_size(&self) -> Vec2 {
        match &self.source_texture {
            Some(texture) => texture.size(),
            None => Vec2::new(
                (self.source_uv.x + self.source_dimension.width) as f32,
                (self.source_uv.y + self.source_dimension.height) as f32,
            ),
        }
    }

    /// Round the source rectangle to whole, non-negative pixels
    pub fn snap_source_region_to_pixel_grid(&mut self) {
        use crate::geometry::snap_non_negative;
        self.source_uv = Point::new(
            snap_non_negative(self.source_uv.x),
            snap_non_negative(self.source_uv.y),
        );
        self.source_dimension = Size::new(
            snap_non_negative(self.source_dimension.width),
            snap_non_negative(self.source_dimension.height),
        );
    }

    /// Regenerate automatic geometry and rebake render data
    pub fn rebuild(&mut self) {
        let (uv, dimension) = (self.source_uv, self.source_dimension);
        self.collision_geometry.regenerate(uv, dimension);
        self.render_geometry.regenerate(uv, dimension);
        self.baked_render_data = bake::triangulate(&self.render_geometry);
        debug!(
            "Rebuilt sprite '{}': {} baked triangles",
            self.name,
            self.baked_render_data.len() / 3
        );
    }

    /// World-space bounds of the baked render data
    pub fn render_bounds(&self, axes: PaperAxes) -> Option<(Vec3, Vec3)> {
        let space = self.render_space(axes);
        let mut points = self
            .baked_render_data
            .iter()
            .map(|point| space.texture_to_world(*point));
        let first = points.next()?;
        Some(points.fold((first, first), |(min, max), p| (min.min(p), max.max(p))))
    }

    /// Select the connected opaque region of the texture around `texture_point`
    /// and make its bounding box the new source region.
    ///
    /// Returns false when the texel is transparent, outside the texture, or
    /// the texture carries no alpha data.
    pub fn extract_source_region_from_texture_point(&mut self, texture_point: Point) -> bool {
        let Some(texture) = &self.source_texture else {
            return false;
        };
        let start = (texture_point.x.floor() as i64, texture_point.y.floor() as i64);
        if !texture.is_opaque(start.0, start.1) {
            debug!("No opaque texel at {:?}, nothing to extract", start);
            return false;
        }

        let width = texture.width as usize;
        let mut visited = vec![false; width * texture.height as usize];
        let mut queue = VecDeque::from([start]);
        visited[start.1 as usize * width + start.0 as usize] = true;
        let (mut min, mut max) = (start, start);

        while let Some((x, y)) = queue.pop_front() {
            min = (min.0.min(x), min.1.min(y));
            max = (max.0.max(x), max.1.max(y));
            for (nx, ny) in [(x - 1, y), (x + 1, y), (x, y - 1), (x, y + 1)] {
                if texture.is_opaque(nx, ny) {
                    let index = ny as usize * width + nx as usize;
                    if !visited[index] {
                        visited[index] = true;
                        queue.push_back((nx, ny));
                    }
                }
            }
        }

        self.source_uv = Point::new(min.0 as f64, min.1 as f64);
        self.source_dimension = Size::new((max.0 - min.0 + 1) as f64, (max.1 - min.1 + 1) as f64);
        debug!(
            "Extracted source region {:?} {:?} for sprite '{}'",
            self.source_uv, self.source_dimension, self.name
        );
        true
    }

    pub fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read sprite file {}", path.display()))?;
        let mut sprite: Sprite = serde_json::from_str(&contents)
            .with_context(|| format!("Failed to parse sprite file {}", path.display()))?;
        sprite.rebuild();
        Ok(sprite)
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let contents = serde_json::to_string_pretty(self)?;
        fs::write(path, contents)
            .with_context(|| format!("Failed to write sprite file {}", path.display()))?;
        debug!("Saved sprite '{}' to {:?}", self.name, path);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn triangle() -> Polygon {
        Polygon::new(vec![
            Point::new(0.0, 0.0),
            Point::new(10.0, 0.0),
            Point::new(0.0, 10.0),
        ])
    }

    #[test]
    fn test_edges_wrap_around() {
        let polygon = triangle();
        assert_eq!(
            polygon.edge(2),
            Some((Point::new(0.0, 10.0), Point::new(0.0, 0.0)))
        );
        assert_eq!(polygon.edge(3), None);
        assert_eq!(polygon.edge_midpoint(0), Some(Point::new(5.0, 0.0)));
    }

    #[test]
    fn test_single_vertex_edge_is_degenerate() {
        let mut polygon = Polygon::new(vec![Point::new(3.0, 4.0)]);
        assert_eq!(polygon.insert_edge_midpoint(0), Some(1));
        assert_eq!(polygon.vertices, vec![Point::new(3.0, 4.0); 2]);
    }

    #[test]
    fn test_area_of_triangle() {
        assert_eq!(triangle().area().abs(), 50.0);
    }

    #[test]
    fn test_seed_triangle_marks_custom() {
        let mut collection = PolygonCollection::default();
        let index = collection.add_seed_triangle(Point::new(4.0, 8.0));
        assert_eq!(index, 0);
        assert!(collection.is_custom());
        assert_eq!(
            collection.polygons[0].vertices,
            vec![
                Point::new(4.0, 8.0),
                Point::new(14.0, 18.0),
                Point::new(4.0, 18.0)
            ]
        );
    }

    #[test]
    fn test_regenerate_skips_custom_geometry() {
        let mut sprite = Sprite::new("crate", Point::new(0.0, 0.0), Size::new(32.0, 16.0));
        assert_eq!(sprite.collision_geometry.polygons.len(), 1);
        assert_eq!(sprite.collision_geometry.vertex_count(), 4);

        sprite.collision_geometry = PolygonCollection::custom(vec![triangle()]);
        sprite.source_dimension = Size::new(64.0, 64.0);
        sprite.rebuild();
        assert_eq!(sprite.collision_geometry.polygons, vec![triangle()]);
        assert_eq!(
            sprite.render_geometry.polygons[0].vertices[2],
            Point::new(64.0, 64.0)
        );
    }

    #[test]
    fn test_pivot_modes() {
        let mut sprite = Sprite::new("pivot", Point::new(10.0, 20.0), Size::new(30.0, 40.0));
        assert_eq!(sprite.pivot_position(), Point::new(25.0, 40.0));
        sprite.pivot_mode = PivotMode::BottomLeft;
        assert_eq!(sprite.pivot_position(), Point::new(10.0, 60.0));

        sprite.nudge_pivot(kurbo::Vec2::new(1.0, -2.0));
        assert_eq!(sprite.pivot_mode, PivotMode::Custom);
        assert_eq!(sprite.pivot_position(), Point::new(11.0, 58.0));
    }

    #[test]
    fn test_extract_connected_region() {
        // 6x4 texture with two opaque islands
        #[rustfmt::skip]
        let alpha = vec![
            0, 255, 255, 0, 0, 0,
            0, 255,   0, 0, 0, 9,
            0, 255, 255, 0, 0, 9,
            0,   0,   0, 0, 0, 0,
        ];
        let mut sprite = Sprite::new("sheet", Point::ZERO, Size::new(6.0, 4.0))
            .with_texture(SourceTexture::new("sheet.png", 6, 4).with_alpha(alpha));

        assert!(sprite.extract_source_region_from_texture_point(Point::new(2.5, 2.2)));
        assert_eq!(sprite.source_uv, Point::new(1.0, 0.0));
        assert_eq!(sprite.source_dimension, Size::new(2.0, 3.0));

        assert!(sprite.extract_source_region_from_texture_point(Point::new(5.0, 1.0)));
        assert_eq!(sprite.source_uv, Point::new(5.0, 1.0));
        assert_eq!(sprite.source_dimension, Size::new(1.0, 2.0));

        assert!(!sprite.extract_source_region_from_texture_point(Point::new(0.5, 0.5)));
        assert!(!sprite.extract_source_region_from_texture_point(Point::new(-3.0, 0.5)));
        assert_eq!(sprite.source_uv, Point::new(5.0, 1.0));
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sprites").join("hero.json");

        let mut sprite = Sprite::new("hero", Point::new(2.0, 2.0), Size::new(16.0, 24.0));
        sprite.sockets.push(SpriteSocket {
            name: "hand".to_string(),
            local_transform: SocketTransform::from_translation(Vec3::new(3.0, 0.0, 4.0)),
        });
        sprite.render_geometry = PolygonCollection::custom(vec![triangle()]);
        sprite.rebuild();
        sprite.save(&path).unwrap();

        let loaded = Sprite::load(&path).unwrap();
        assert_eq!(loaded, sprite);
    }

    #[test]
    fn test_alpha_mask_is_attached_after_loading() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sheet.json");
        let alpha = vec![0, 255, 255, 0];
        Sprite::new("sheet", Point::ZERO, Size::new(2.0, 2.0))
            .with_texture(SourceTexture::new("sheet.png", 2, 2).with_alpha(alpha.clone()))
            .save(&path)
            .unwrap();

        let mut loaded = Sprite::load(&path).unwrap();
        let texture = loaded.source_texture.take().unwrap();
        assert!(texture.alpha.is_none());
        assert!(!loaded.extract_source_region_from_texture_point(Point::new(1.5, 0.5)));

        loaded.source_texture = Some(texture.with_alpha(alpha));
        assert!(loaded.extract_source_region_from_texture_point(Point::new(1.5, 0.5)));
        assert_eq!(loaded.source_uv, Point::new(1.0, 0.0));
        assert_eq!(loaded.source_dimension, Size::new(1.0, 1.0));
    }

    #[test]
    fn test_mismatched_alpha_mask_is_rejected() {
        let short = SourceTexture::new("sheet.png", 4, 4).with_alpha(vec![255; 3]);
        assert!(short.alpha.is_none());
        assert!(!short.is_opaque(0, 0));

        // Sizes whose texel count overflows u32
        let huge = SourceTexture::new("huge.png", 70_000, 70_000).with_alpha(vec![255; 4]);
        assert!(huge.alpha.is_none());
    }
}
