//! Text lines for the viewport canvas overlay

use crate::data::{GeometryKind, PolygonCollection, Sprite};
use crate::editing::mode::EditorMode;
use crate::geometry::PaperAxes;

pub const GEOMETRY_HELP: &str = "Select an edge and press Insert to add a vertex.\n\
                                 Select an edge or vertex and press Delete to remove it.";
pub const SOURCE_REGION_HELP: &str = "Drag handles to adjust source region\n\
                                      Double-click on an image region to select all connected pixels";

/// Tool help shown at the top of the canvas for a mode
pub fn help_text(mode: EditorMode) -> Option<&'static str> {
    match mode {
        EditorMode::EditCollision | EditorMode::EditRenderGeometry => Some(GEOMETRY_HELP),
        EditorMode::EditSourceRegion => Some(SOURCE_REGION_HELP),
        EditorMode::View | EditorMode::AddSprite => None,
    }
}

pub fn pivot_text(sprite: &Sprite) -> String {
    let pivot = sprite.pivot_position();
    format!("Pivot: ({}, {})", pivot.x, pivot.y)
}

pub fn geometry_stats(geometry: &PolygonCollection, kind: GeometryKind) -> Vec<String> {
    vec![
        format!("{} (source)", kind.name()),
        format!("Polys: {}", geometry.polygons.len()),
        format!("Verts: {}", geometry.vertex_count()),
    ]
}

pub fn render_stats(sprite: &Sprite) -> Vec<String> {
    let mut lines = vec!["Render Geometry (baked)".to_string()];
    let triangles = sprite.baked_render_data.len() / 3;
    if triangles > 0 {
        lines.push(format!("Triangles: {}", triangles));
    }
    lines
}

/// Size of the baked render data in world units, truncated to whole units
pub fn bounds_text(sprite: &Sprite, axes: PaperAxes) -> String {
    let size = sprite
        .render_bounds(axes)
        .map(|(min, max)| max - min)
        .unwrap_or_default();
    format!(
        "Approx. Size: {}x{}x{}",
        size.x as i32, size.y as i32, size.z as i32
    )
}

/// All stat lines shown for a mode, top to bottom
pub fn canvas_lines(sprite: &Sprite, mode: EditorMode, axes: PaperAxes) -> Vec<String> {
    let mut lines = Vec::new();
    match mode {
        EditorMode::View => {
            lines.push(pivot_text(sprite));
            if !sprite.collision_geometry.polygons.is_empty() {
                lines.extend(geometry_stats(
                    &sprite.collision_geometry,
                    GeometryKind::Collision,
                ));
            }
            lines.extend(render_stats(sprite));
            lines.push(bounds_text(sprite, axes));
        }
        EditorMode::EditCollision => {
            lines.extend(geometry_stats(
                &sprite.collision_geometry,
                GeometryKind::Collision,
            ));
        }
        EditorMode::EditRenderGeometry => {
            lines.extend(geometry_stats(&sprite.render_geometry, GeometryKind::Render));
            lines.extend(render_stats(sprite));
            lines.push(bounds_text(sprite, axes));
        }
        EditorMode::EditSourceRegion | EditorMode::AddSprite => {}
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use kurbo::{Point, Size};

    #[test]
    fn test_view_mode_lines() {
        let sprite = Sprite::new("crate", Point::new(0.0, 0.0), Size::new(32.0, 16.0));
        let lines = canvas_lines(&sprite, EditorMode::View, PaperAxes::default());
        assert_eq!(
            lines,
            vec![
                "Pivot: (16, 8)",
                "Collision Geometry (source)",
                "Polys: 1",
                "Verts: 4",
                "Render Geometry (baked)",
                "Triangles: 2",
                "Approx. Size: 32x0x16",
            ]
        );
    }

    #[test]
    fn test_empty_render_geometry() {
        let mut sprite = Sprite::new("empty", Point::ZERO, Size::new(8.0, 8.0));
        sprite.render_geometry = PolygonCollection::custom(Vec::new());
        sprite.rebuild();
        assert_eq!(render_stats(&sprite), vec!["Render Geometry (baked)"]);
        assert_eq!(
            bounds_text(&sprite, PaperAxes::default()),
            "Approx. Size: 0x0x0"
        );
        assert!(help_text(EditorMode::View).is_none());
        assert_eq!(help_text(EditorMode::EditCollision), Some(GEOMETRY_HELP));
    }
}
