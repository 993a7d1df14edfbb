//! Drawing the editable parts of a sprite and registering their hit regions
//!
//! Every interactive primitive is drawn with a freshly built [`SelectedItem`]
//! as its hit proxy, so hit regions carry the current polygon and vertex
//! indices.

use crate::core::config::settings::{
    BAKED_LINE_COLOR, BAKED_VERTEX_COLOR, SOCKET_COLOR, SOCKET_NAME_COLOR, TEXT_COLOR,
    TEXT_LINE_HEIGHT, TEXT_MARGIN_X, TEXT_START_Y,
};
use crate::core::config::EditorSettings;
use crate::data::{GeometryKind, Sprite, SpriteHandle};
use crate::editing::mode::EditorMode;
use crate::editing::selection::SelectedItem;
use crate::geometry::{edge_normal, PaperAxes, RegionHandle, SpriteSpace, ViewProjection};
use crate::rendering::stats;
use crate::rendering::surface::DrawSurface;
use bevy::color::LinearRgba;
use bevy::math::{Mat4, Vec2, Vec3};
use kurbo::Point;

/// Draws one sprite's overlay onto a [`DrawSurface`]
pub struct SpriteOverlay<'a> {
    pub handle: SpriteHandle,
    pub sprite: &'a Sprite,
    pub view: &'a dyn ViewProjection,
    pub axes: PaperAxes,
    pub settings: &'a EditorSettings,
}

impl<'a> SpriteOverlay<'a> {
    fn render_space(&self) -> SpriteSpace {
        self.sprite.render_space(self.axes)
    }

    fn to_screen(&self, point: Point) -> Vec2 {
        self.render_space().texture_to_screen(self.view, point)
    }

    fn source_to_screen(&self, point: Point) -> Vec2 {
        self.sprite
            .source_view_space(self.axes)
            .texture_to_screen(self.view, point)
    }

    /// Polygon edges (with normal ticks) and vertex handles
    pub fn draw_geometry(&self, surface: &mut dyn DrawSurface, kind: GeometryKind, color: LinearRgba) {
        let geometry = self.sprite.geometry(kind);
        let line_color = LinearRgba {
            alpha: color.alpha * 0.5,
            ..color
        };
        let settings = self.settings;

        for (polygon_index, polygon) in geometry.polygons.iter().enumerate() {
            let screen: Vec<Vec2> = polygon
                .vertices
                .iter()
                .map(|vertex| self.to_screen(*vertex))
                .collect();

            for (index, &start) in screen.iter().enumerate() {
                let end = screen[(index + 1) % screen.len()];

                if settings.view_flags.show_normals {
                    let midpoint = (start + end) * 0.5;
                    let normal = edge_normal(start, end);
                    surface.draw_line(
                        midpoint,
                        midpoint - normal * settings.normal_tick_length,
                        settings.normal_color,
                    );
                }

                surface.set_hit_proxy(Some(SelectedItem::Edge {
                    sprite: self.handle,
                    geometry: kind,
                    polygon: polygon_index,
                    vertex: index,
                }));
                surface.draw_line(start, end, line_color);
                surface.set_hit_proxy(None);
            }

            for (index, &position) in screen.iter().enumerate() {
                surface.set_hit_proxy(Some(SelectedItem::Vertex {
                    sprite: self.handle,
                    geometry: kind,
                    polygon: polygon_index,
                    vertex: index,
                }));
                surface.draw_tile(position, settings.vertex_handle_size, color);
                surface.set_hit_proxy(None);
            }
        }
    }

    /// Source rectangle outline with edge-midpoint and corner handles
    pub fn draw_source_region(&self, surface: &mut dyn DrawSurface, color: LinearRgba) {
        let (uv, dimension) = (self.sprite.source_uv, self.sprite.source_dimension);
        let corners = RegionHandle::CORNERS
            .map(|handle| self.source_to_screen(handle.point_in_region(uv, dimension)));

        for (index, &corner) in corners.iter().enumerate() {
            let next = corners[(index + 1) % corners.len()];
            surface.draw_line(corner, next, color);

            surface.set_hit_proxy(Some(SelectedItem::SourceRegion {
                sprite: self.handle,
                handle: RegionHandle::EDGES[index],
            }));
            surface.draw_tile((corner + next) * 0.5, self.settings.edge_handle_size, color);
            surface.set_hit_proxy(None);

            surface.set_hit_proxy(Some(SelectedItem::SourceRegion {
                sprite: self.handle,
                handle: RegionHandle::CORNERS[index],
            }));
            surface.draw_tile(corner, self.settings.corner_handle_size, color);
            surface.set_hit_proxy(None);
        }
    }

    /// A wire diamond per socket
    pub fn draw_sockets(&self, surface: &mut dyn DrawSurface) {
        let origin = self.render_space().origin;
        let size = self.settings.socket_diamond_size;
        let (x, y) = (self.axes.x * size, self.axes.y * size);

        for socket in &self.sprite.sockets {
            let transform = Mat4::from_translation(origin) * socket.local_transform.to_matrix();
            let points = [x, y, -x, -y]
                .map(|offset| self.view.world_to_pixel(transform.transform_point3(offset)));

            surface.set_hit_proxy(Some(SelectedItem::Socket {
                sprite: self.handle,
                name: socket.name.clone(),
            }));
            for (index, &point) in points.iter().enumerate() {
                surface.draw_line(point, points[(index + 1) % points.len()], SOCKET_COLOR);
            }
            if surface.is_hit_testing() {
                // Make the inside of the diamond clickable too
                let center = self.view.world_to_pixel(transform.transform_point3(Vec3::ZERO));
                let extent = points[0].distance(center) * 2.0;
                surface.draw_tile(center, extent, SOCKET_COLOR);
            }
            surface.set_hit_proxy(None);
        }
    }

    pub fn draw_socket_names(&self, surface: &mut dyn DrawSurface) {
        let origin = self.render_space().origin;
        for socket in &self.sprite.sockets {
            let position = self
                .view
                .world_to_pixel(origin + socket.local_transform.translation);
            surface.draw_text(position, &socket.name, SOCKET_NAME_COLOR);
        }
    }

    /// A cross at the pivot
    pub fn draw_pivot(&self, surface: &mut dyn DrawSurface) {
        let center = self.to_screen(self.sprite.pivot_position());
        let arm = self.settings.vertex_handle_size;

        surface.set_hit_proxy(Some(SelectedItem::Pivot {
            sprite: self.handle,
        }));
        surface.draw_line(center - Vec2::X * arm, center + Vec2::X * arm, TEXT_COLOR);
        surface.draw_line(center - Vec2::Y * arm, center + Vec2::Y * arm, TEXT_COLOR);
        surface.draw_tile(center, self.settings.corner_handle_size, TEXT_COLOR);
        surface.set_hit_proxy(None);
    }

    /// Baked triangles; not interactive
    pub fn draw_triangle_list(&self, surface: &mut dyn DrawSurface) {
        let screen: Vec<Vec2> = self
            .sprite
            .baked_render_data
            .iter()
            .map(|point| self.to_screen(*point))
            .collect();

        for &vertex in &screen {
            surface.draw_tile(vertex, self.settings.baked_vertex_size, BAKED_VERTEX_COLOR);
        }
        for triangle in screen.chunks_exact(3) {
            for offset in 0..3 {
                surface.draw_line(triangle[offset], triangle[(offset + 1) % 3], BAKED_LINE_COLOR);
            }
        }
    }

    /// Mode overlay: handles for the edited elements plus help and stats text
    pub fn draw_canvas(&self, surface: &mut dyn DrawSurface, mode: EditorMode) {
        let flags = self.settings.view_flags;
        if flags.show_pivot && !flags.show_source_texture && !mode.is_source_region() {
            self.draw_pivot(surface);
        }

        match mode {
            EditorMode::EditCollision => {
                self.draw_geometry(surface, GeometryKind::Collision, self.settings.collision_color)
            }
            EditorMode::EditRenderGeometry => {
                self.draw_geometry(surface, GeometryKind::Render, self.settings.render_color)
            }
            EditorMode::EditSourceRegion => {
                self.draw_source_region(surface, self.settings.source_region_color)
            }
            EditorMode::View => {
                if !surface.is_hit_testing() {
                    self.draw_triangle_list(surface);
                }
            }
            EditorMode::AddSprite => {}
        }

        if flags.show_sockets {
            self.draw_sockets(surface);
        }

        if surface.is_hit_testing() {
            return;
        }

        let mut y = TEXT_START_Y;
        if let Some(help) = stats::help_text(mode) {
            for line in help.lines() {
                surface.draw_text(Vec2::new(TEXT_MARGIN_X, y), line, TEXT_COLOR);
                y += TEXT_LINE_HEIGHT;
            }
        }
        for line in stats::canvas_lines(self.sprite, mode, self.axes) {
            surface.draw_text(Vec2::new(TEXT_MARGIN_X, y), &line, TEXT_COLOR);
            y += TEXT_LINE_HEIGHT;
        }

        if flags.show_sockets {
            self.draw_socket_names(surface);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{PolygonCollection, Polygon, SpriteStore};
    use crate::geometry::OrthographicView;
    use crate::rendering::hit_test::HitTestCanvas;
    use crate::rendering::surface::{DrawCommand, DrawList};
    use bevy::math::Vec3;
    use kurbo::Size;

    struct Fixture {
        store: SpriteStore,
        handle: SpriteHandle,
        view: OrthographicView,
        settings: EditorSettings,
    }

    impl Fixture {
        fn new() -> Self {
            let mut sprite = Sprite::new("hero", Point::new(0.0, 0.0), Size::new(20.0, 20.0));
            sprite.collision_geometry = PolygonCollection::custom(vec![Polygon::new(vec![
                Point::new(0.0, 0.0),
                Point::new(20.0, 0.0),
                Point::new(0.0, 20.0),
            ])]);
            let mut store = SpriteStore::new();
            let handle = store.insert(sprite);
            Self {
                store,
                handle,
                view: OrthographicView::new(Vec3::ZERO, 1.0, Vec2::new(200.0, 200.0)),
                settings: EditorSettings::default(),
            }
        }

        fn overlay(&self) -> SpriteOverlay<'_> {
            SpriteOverlay {
                handle: self.handle,
                sprite: self.store.get(self.handle).unwrap(),
                view: &self.view,
                axes: PaperAxes::default(),
                settings: &self.settings,
            }
        }
    }

    #[test]
    fn test_geometry_registers_edges_then_vertices() {
        let fixture = Fixture::new();
        let mut list = DrawList::hit_testing();
        fixture.overlay().draw_geometry(&mut list, GeometryKind::Collision, LinearRgba::WHITE);

        // 3 normal ticks + 3 edges + 3 vertices
        assert_eq!(list.len(), 9);
        let proxies: Vec<_> = list.commands().iter().filter_map(|c| c.proxy()).collect();
        assert_eq!(proxies.len(), 6);
        assert!(matches!(proxies[0], SelectedItem::Edge { vertex: 0, .. }));
        assert!(matches!(proxies[5], SelectedItem::Vertex { vertex: 2, .. }));
    }

    #[test]
    fn test_vertex_beats_edge_under_cursor() {
        let fixture = Fixture::new();
        let mut canvas = HitTestCanvas::new(3.0);
        fixture.overlay().draw_geometry(&mut canvas, GeometryKind::Collision, LinearRgba::WHITE);

        // Texture (20, 0) sits at world (10, 0, 10) -> screen (110, 90)
        let hit = canvas.pick(Vec2::new(110.0, 90.0));
        assert_eq!(
            hit,
            Some(SelectedItem::Vertex {
                sprite: fixture.handle,
                geometry: GeometryKind::Collision,
                polygon: 0,
                vertex: 1,
            })
        );

        // Middle of the top edge
        let hit = canvas.pick(Vec2::new(100.0, 90.0));
        assert!(matches!(hit, Some(SelectedItem::Edge { vertex: 0, .. })));
    }

    #[test]
    fn test_source_region_handle_order() {
        let fixture = Fixture::new();
        let mut list = DrawList::hit_testing();
        fixture.overlay().draw_source_region(&mut list, LinearRgba::WHITE);

        let handles: Vec<RegionHandle> = list
            .commands()
            .iter()
            .filter_map(|c| match c.proxy() {
                Some(SelectedItem::SourceRegion { handle, .. }) => Some(*handle),
                _ => None,
            })
            .collect();
        assert_eq!(
            handles,
            vec![
                RegionHandle::Top,
                RegionHandle::TopLeft,
                RegionHandle::Right,
                RegionHandle::TopRight,
                RegionHandle::Bottom,
                RegionHandle::BottomRight,
                RegionHandle::Left,
                RegionHandle::BottomLeft,
            ]
        );
    }

    #[test]
    fn test_zero_length_edge_draws_flat_normal() {
        let mut fixture = Fixture::new();
        let sprite = fixture.store.get_mut(fixture.handle).unwrap();
        sprite.collision_geometry.polygons[0] = Polygon::new(vec![Point::new(5.0, 5.0); 2]);

        let mut list = DrawList::new();
        fixture.overlay().draw_geometry(&mut list, GeometryKind::Collision, LinearRgba::WHITE);
        let DrawCommand::Line { from, to, .. } = &list.commands()[0] else {
            panic!("expected a normal tick first");
        };
        assert_eq!(from, to);
    }

    #[test]
    fn test_canvas_text_is_skipped_when_hit_testing() {
        let fixture = Fixture::new();
        let mut list = DrawList::new();
        fixture.overlay().draw_canvas(&mut list, EditorMode::EditCollision);
        let texts: Vec<&str> = list.texts().collect();
        assert_eq!(texts[0], "Select an edge and press Insert to add a vertex.");
        assert!(texts.contains(&"Verts: 3"));

        let mut hits = DrawList::hit_testing();
        fixture.overlay().draw_canvas(&mut hits, EditorMode::EditCollision);
        assert_eq!(hits.texts().count(), 0);
    }
}
