//! Selectable elements of a sprite
//!
//! A [`SelectedItem`] names one editable element by index: a polygon vertex,
//! a polygon edge, the pivot, a socket or one of the source region handles.
//! Items are created fresh by hit-testing, so they are only valid until the
//! next structural edit shifts polygon indices.

use crate::data::{GeometryKind, Polygon, Sprite, SpriteHandle, SpriteStore};
use crate::geometry::{PaperAxes, RegionHandle};
use bevy::log::warn;
use bevy::math::Vec3;
use kurbo::{Point, Size};

/// The different kinds of selectable element
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SelectionKind {
    Vertex,
    Edge,
    Pivot,
    Socket,
    SourceRegion,
}

impl SelectionKind {
    pub fn name(&self) -> &'static str {
        match self {
            SelectionKind::Vertex => "Vertex",
            SelectionKind::Edge => "Edge",
            SelectionKind::Pivot => "Pivot",
            SelectionKind::Socket => "Socket",
            SelectionKind::SourceRegion => "SourceRegion",
        }
    }
}

/// One selectable element of a sprite
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum SelectedItem {
    Vertex {
        sprite: SpriteHandle,
        geometry: GeometryKind,
        polygon: usize,
        vertex: usize,
    },
    /// The edge from `vertex` to the next vertex of the polygon
    Edge {
        sprite: SpriteHandle,
        geometry: GeometryKind,
        polygon: usize,
        vertex: usize,
    },
    Pivot {
        sprite: SpriteHandle,
    },
    Socket {
        sprite: SpriteHandle,
        name: String,
    },
    SourceRegion {
        sprite: SpriteHandle,
        handle: RegionHandle,
    },
}

impl SelectedItem {
    pub fn sprite(&self) -> SpriteHandle {
        match self {
            SelectedItem::Vertex { sprite, .. }
            | SelectedItem::Edge { sprite, .. }
            | SelectedItem::Pivot { sprite }
            | SelectedItem::Socket { sprite, .. }
            | SelectedItem::SourceRegion { sprite, .. } => *sprite,
        }
    }

    pub fn kind(&self) -> SelectionKind {
        match self {
            SelectedItem::Vertex { .. } => SelectionKind::Vertex,
            SelectedItem::Edge { .. } => SelectionKind::Edge,
            SelectedItem::Pivot { .. } => SelectionKind::Pivot,
            SelectedItem::Socket { .. } => SelectionKind::Socket,
            SelectedItem::SourceRegion { .. } => SelectionKind::SourceRegion,
        }
    }

    /// Whether the element this item points at still exists
    pub fn is_live(&self, store: &SpriteStore) -> bool {
        let Some(sprite) = store.get(self.sprite()) else {
            return false;
        };
        match self {
            SelectedItem::Vertex {
                geometry,
                polygon,
                vertex,
                ..
            }
            | SelectedItem::Edge {
                geometry,
                polygon,
                vertex,
                ..
            } => polygon_of(sprite, *geometry, *polygon).is_some_and(|p| *vertex < p.len()),
            SelectedItem::Pivot { .. } | SelectedItem::SourceRegion { .. } => true,
            SelectedItem::Socket { name, .. } => sprite.socket(name).is_some(),
        }
    }

    /// Current world position of the element
    pub fn world_pos(&self, store: &SpriteStore, axes: PaperAxes) -> Option<Vec3> {
        let sprite = store.get(self.sprite())?;
        let render_space = sprite.render_space(axes);
        match self {
            SelectedItem::Vertex {
                geometry,
                polygon,
                vertex,
                ..
            } => {
                let point = polygon_of(sprite, *geometry, *polygon)?.vertices.get(*vertex)?;
                Some(render_space.texture_to_world(*point))
            }
            SelectedItem::Edge {
                geometry,
                polygon,
                vertex,
                ..
            } => {
                let midpoint = polygon_of(sprite, *geometry, *polygon)?.edge_midpoint(*vertex)?;
                Some(render_space.texture_to_world(midpoint))
            }
            SelectedItem::Pivot { .. } => {
                Some(render_space.texture_to_world(sprite.pivot_position()))
            }
            SelectedItem::Socket { name, .. } => {
                let socket = sprite.socket(name)?;
                Some(render_space.origin + socket.local_transform.translation)
            }
            SelectedItem::SourceRegion { handle, .. } => {
                let point = handle.point_in_region(sprite.source_uv, sprite.source_dimension);
                Some(sprite.source_view_space(axes).texture_to_world(point))
            }
        }
    }

    /// Move the element by a texture-space delta.
    /// Returns true if anything changed.
    pub fn apply_delta(&self, store: &mut SpriteStore, delta: kurbo::Vec2, axes: PaperAxes) -> bool {
        let Some(sprite) = store.get_mut(self.sprite()) else {
            warn!("Cannot move {}: sprite no longer exists", self.kind().name());
            return false;
        };
        if delta == kurbo::Vec2::ZERO {
            return false;
        }

        match self {
            SelectedItem::Vertex {
                geometry,
                polygon,
                vertex,
                ..
            } => {
                let collection = sprite.geometry_mut(*geometry);
                let Some(point) = collection
                    .polygons
                    .get_mut(*polygon)
                    .and_then(|p| p.vertices.get_mut(*vertex))
                else {
                    warn!("Stale vertex selection {}:{}", polygon, vertex);
                    return false;
                };
                *point += delta;
                collection.mark_custom();
                true
            }
            SelectedItem::Edge {
                geometry,
                polygon,
                vertex,
                ..
            } => {
                let collection = sprite.geometry_mut(*geometry);
                let Some(target) = collection.polygons.get_mut(*polygon) else {
                    warn!("Stale edge selection {}:{}", polygon, vertex);
                    return false;
                };
                if *vertex >= target.len() {
                    warn!("Stale edge selection {}:{}", polygon, vertex);
                    return false;
                }
                let next = target.next_index(*vertex);
                target.vertices[*vertex] += delta;
                if next != *vertex {
                    target.vertices[next] += delta;
                }
                collection.mark_custom();
                true
            }
            SelectedItem::Pivot { .. } => {
                sprite.nudge_pivot(delta);
                true
            }
            SelectedItem::Socket { name, .. } => {
                let world_delta = sprite.render_space(axes).world_delta_from_texture(delta);
                let Some(socket) = sprite.socket_mut(name) else {
                    warn!("Socket '{}' no longer exists", name);
                    return false;
                };
                socket.local_transform.translation += world_delta;
                true
            }
            SelectedItem::SourceRegion { handle, .. } => drag_source_region(sprite, *handle, delta),
        }
    }

    /// Remove the element. Only vertices and edges (their start vertex) can
    /// be deleted.
    pub fn delete(&self, store: &mut SpriteStore) -> bool {
        let (geometry, polygon, vertex) = match self {
            SelectedItem::Vertex {
                geometry,
                polygon,
                vertex,
                ..
            }
            | SelectedItem::Edge {
                geometry,
                polygon,
                vertex,
                ..
            } => (*geometry, *polygon, *vertex),
            _ => return false,
        };
        let Some(sprite) = store.get_mut(self.sprite()) else {
            return false;
        };
        let collection = sprite.geometry_mut(geometry);
        let removed = collection
            .polygons
            .get_mut(polygon)
            .and_then(|p| p.remove_vertex(vertex));
        match removed {
            Some(_) => {
                collection.mark_custom();
                true
            }
            None => {
                warn!("Stale selection {}:{}, nothing deleted", polygon, vertex);
                false
            }
        }
    }

    /// Insert a vertex at the midpoint of an edge. Other kinds are ignored.
    pub fn split_edge(&self, store: &mut SpriteStore) -> bool {
        let SelectedItem::Edge {
            sprite,
            geometry,
            polygon,
            vertex,
        } = self
        else {
            return false;
        };
        let Some(sprite) = store.get_mut(*sprite) else {
            return false;
        };
        let collection = sprite.geometry_mut(*geometry);
        let inserted = collection
            .polygons
            .get_mut(*polygon)
            .and_then(|p| p.insert_edge_midpoint(*vertex));
        match inserted {
            Some(_) => {
                collection.mark_custom();
                true
            }
            None => {
                warn!("Stale edge selection {}:{}, nothing split", polygon, vertex);
                false
            }
        }
    }
}

fn polygon_of(sprite: &Sprite, geometry: GeometryKind, polygon: usize) -> Option<&Polygon> {
    sprite.geometry(geometry).polygons.get(polygon)
}

/// Drag the sides of the source region attached to `handle`.
///
/// A side is never dragged past the opposite side, so the width and height
/// stay non-negative.
fn drag_source_region(sprite: &mut Sprite, handle: RegionHandle, delta: kurbo::Vec2) -> bool {
    let sides = handle.sides();
    let (mut x, mut y) = (sprite.source_uv.x, sprite.source_uv.y);
    let (mut width, mut height) = (
        sprite.source_dimension.width,
        sprite.source_dimension.height,
    );

    if sides.left {
        let right = x + width;
        let left = (x + delta.x).min(right);
        width = right - left;
        x = left;
    }
    if sides.right {
        width = (width + delta.x).max(0.0);
    }
    if sides.top {
        let bottom = y + height;
        let top = (y + delta.y).min(bottom);
        height = bottom - top;
        y = top;
    }
    if sides.bottom {
        height = (height + delta.y).max(0.0);
    }

    let uv = Point::new(x, y);
    let dimension = Size::new(width, height);
    let changed = uv != sprite.source_uv || dimension != sprite.source_dimension;
    sprite.source_uv = uv;
    sprite.source_dimension = dimension;
    changed
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::PolygonCollection;

    fn setup() -> (SpriteStore, SpriteHandle) {
        let mut sprite = Sprite::new("test", Point::new(0.0, 0.0), Size::new(32.0, 32.0));
        sprite.collision_geometry = PolygonCollection::custom(vec![Polygon::new(vec![
            Point::new(10.0, 10.0),
            Point::new(20.0, 10.0),
            Point::new(10.0, 20.0),
        ])]);
        let mut store = SpriteStore::new();
        let handle = store.insert(sprite);
        (store, handle)
    }

    fn vertices(store: &SpriteStore, handle: SpriteHandle) -> Vec<Point> {
        store.get(handle).unwrap().collision_geometry.polygons[0]
            .vertices
            .clone()
    }

    #[test]
    fn test_split_edge_inserts_midpoint() {
        let (mut store, sprite) = setup();
        // The closing edge 2 -> 0
        let edge = SelectedItem::Edge {
            sprite,
            geometry: GeometryKind::Collision,
            polygon: 0,
            vertex: 2,
        };
        assert!(edge.split_edge(&mut store));
        assert_eq!(
            vertices(&store, sprite),
            vec![
                Point::new(10.0, 10.0),
                Point::new(20.0, 10.0),
                Point::new(10.0, 20.0),
                Point::new(10.0, 15.0),
            ]
        );
    }

    #[test]
    fn test_split_is_edge_only() {
        let (mut store, sprite) = setup();
        let vertex = SelectedItem::Vertex {
            sprite,
            geometry: GeometryKind::Collision,
            polygon: 0,
            vertex: 0,
        };
        assert!(!vertex.split_edge(&mut store));
        assert!(!SelectedItem::Pivot { sprite }.delete(&mut store));
        assert_eq!(vertices(&store, sprite).len(), 3);
    }

    #[test]
    fn test_delete_keeps_cyclic_order() {
        let (mut store, sprite) = setup();
        let vertex = SelectedItem::Vertex {
            sprite,
            geometry: GeometryKind::Collision,
            polygon: 0,
            vertex: 1,
        };
        assert!(vertex.delete(&mut store));
        assert_eq!(
            vertices(&store, sprite),
            vec![Point::new(10.0, 10.0), Point::new(10.0, 20.0)]
        );
        // The same index now points past the end
        let stale = SelectedItem::Vertex {
            sprite,
            geometry: GeometryKind::Collision,
            polygon: 0,
            vertex: 2,
        };
        assert!(!stale.is_live(&store));
        assert!(!stale.delete(&mut store));
    }

    #[test]
    fn test_edge_delta_moves_both_endpoints() {
        let (mut store, sprite) = setup();
        let edge = SelectedItem::Edge {
            sprite,
            geometry: GeometryKind::Collision,
            polygon: 0,
            vertex: 0,
        };
        assert!(edge.apply_delta(&mut store, kurbo::Vec2::new(1.0, 2.0), PaperAxes::default()));
        assert_eq!(
            vertices(&store, sprite),
            vec![
                Point::new(11.0, 12.0),
                Point::new(21.0, 12.0),
                Point::new(10.0, 20.0),
            ]
        );
    }

    #[test]
    fn test_vertex_delta_marks_geometry_custom() {
        let mut store = SpriteStore::new();
        let sprite = store.insert(Sprite::new("auto", Point::ZERO, Size::new(8.0, 8.0)));
        assert!(!store.get(sprite).unwrap().render_geometry.is_custom());

        let vertex = SelectedItem::Vertex {
            sprite,
            geometry: GeometryKind::Render,
            polygon: 0,
            vertex: 2,
        };
        assert!(vertex.apply_delta(&mut store, kurbo::Vec2::new(1.0, 1.0), PaperAxes::default()));
        let render = &store.get(sprite).unwrap().render_geometry;
        assert!(render.is_custom());
        assert_eq!(render.polygons[0].vertices[2], Point::new(9.0, 9.0));
    }

    #[test]
    fn test_source_region_corner_clamps_dimension() {
        let (mut store, sprite) = setup();
        let corner = SelectedItem::SourceRegion {
            sprite,
            handle: RegionHandle::BottomLeft,
        };
        assert!(corner.apply_delta(
            &mut store,
            kurbo::Vec2::new(-10000.0, -10000.0),
            PaperAxes::default()
        ));
        let sprite = store.get(sprite).unwrap();
        assert!(sprite.source_dimension.width >= 0.0);
        assert_eq!(sprite.source_dimension.height, 0.0);
        assert_eq!(sprite.source_uv, Point::new(-10000.0, 0.0));
        assert_eq!(sprite.source_dimension.width, 10032.0);
    }

    #[test]
    fn test_source_region_edges_move_one_side() {
        let (mut store, sprite) = setup();
        let top = SelectedItem::SourceRegion {
            sprite,
            handle: RegionHandle::Top,
        };
        assert!(top.apply_delta(&mut store, kurbo::Vec2::new(5.0, 40.0), PaperAxes::default()));
        let edited = store.get(sprite).unwrap();
        // X is ignored, Y stops at the bottom side
        assert_eq!(edited.source_uv, Point::new(0.0, 32.0));
        assert_eq!(edited.source_dimension, Size::new(32.0, 0.0));

        let right = SelectedItem::SourceRegion {
            sprite,
            handle: RegionHandle::Right,
        };
        assert!(right.apply_delta(&mut store, kurbo::Vec2::new(-50.0, 3.0), PaperAxes::default()));
        let edited = store.get(sprite).unwrap();
        assert_eq!(edited.source_dimension, Size::new(0.0, 0.0));
    }

    #[test]
    fn test_socket_delta_moves_local_translation() {
        let (mut store, sprite) = setup();
        store.get_mut(sprite).unwrap().sockets.push(crate::data::SpriteSocket {
            name: "muzzle".to_string(),
            local_transform: Default::default(),
        });
        let socket = SelectedItem::Socket {
            sprite,
            name: "muzzle".to_string(),
        };
        assert!(socket.apply_delta(&mut store, kurbo::Vec2::new(2.0, 3.0), PaperAxes::default()));
        assert_eq!(
            socket.world_pos(&store, PaperAxes::default()),
            Some(Vec3::new(2.0, 0.0, -3.0))
        );
    }

    #[test]
    fn test_world_positions() {
        let (store, sprite) = setup();
        let axes = PaperAxes::default();
        // Default pivot is the center of the 32x32 region
        let pivot = SelectedItem::Pivot { sprite };
        assert_eq!(pivot.world_pos(&store, axes), Some(Vec3::ZERO));

        let edge = SelectedItem::Edge {
            sprite,
            geometry: GeometryKind::Collision,
            polygon: 0,
            vertex: 0,
        };
        assert_eq!(edge.world_pos(&store, axes), Some(Vec3::new(-1.0, 0.0, 6.0)));

        let missing = SelectedItem::Socket {
            sprite,
            name: "nope".to_string(),
        };
        assert_eq!(missing.world_pos(&store, axes), None);
    }
}
