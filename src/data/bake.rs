//! Baking render geometry into triangles

use crate::data::sprite::PolygonCollection;
use bevy::log::{debug, warn};
use kurbo::Point;
use lyon::geom::point;
use lyon::path::Path;
use lyon::tessellation::{
    BuffersBuilder, FillOptions, FillRule, FillTessellator, FillVertex, VertexBuffers,
};

/// Tessellate every polygon of a collection into a flat triangle list.
///
/// Polygons are filled independently. Polygons with fewer than three vertices
/// or no enclosed area contribute nothing; a polygon that fails to tessellate
/// is skipped.
pub fn triangulate(collection: &PolygonCollection) -> Vec<Point> {
    let mut tessellator = FillTessellator::new();
    let fill_options = FillOptions::default().with_fill_rule(FillRule::NonZero);
    let mut triangles = Vec::new();

    for (polygon_index, polygon) in collection.polygons.iter().enumerate() {
        let Some((first, rest)) = polygon.vertices.split_first() else {
            continue;
        };
        if rest.len() < 2 {
            continue;
        }
        if polygon.area().abs() <= f64::EPSILON {
            debug!("Polygon {} encloses no area, not baking it", polygon_index);
            continue;
        }

        let mut builder = Path::builder();
        builder.begin(point(first.x as f32, first.y as f32));
        for vertex in rest {
            builder.line_to(point(vertex.x as f32, vertex.y as f32));
        }
        builder.end(true);
        let path = builder.build();

        let mut buffers: VertexBuffers<[f32; 2], u32> = VertexBuffers::new();
        let result = tessellator.tessellate_path(
            &path,
            &fill_options,
            &mut BuffersBuilder::new(&mut buffers, |vertex: FillVertex| {
                vertex.position().to_array()
            }),
        );
        if let Err(error) = result {
            warn!("Failed to tessellate polygon {}: {:?}", polygon_index, error);
            continue;
        }

        triangles.extend(buffers.indices.iter().map(|&index| {
            let [x, y] = buffers.vertices[index as usize];
            Point::new(x as f64, y as f64)
        }));
    }

    triangles
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::sprite::Polygon;

    #[test]
    fn test_square_bakes_to_two_triangles() {
        let collection = PolygonCollection::custom(vec![Polygon::new(vec![
            Point::new(0.0, 0.0),
            Point::new(8.0, 0.0),
            Point::new(8.0, 8.0),
            Point::new(0.0, 8.0),
        ])]);
        let triangles = triangulate(&collection);
        assert_eq!(triangles.len(), 6);
        assert!(triangles
            .iter()
            .all(|p| (0.0..=8.0).contains(&p.x) && (0.0..=8.0).contains(&p.y)));
    }

    #[test]
    fn test_degenerate_polygons_are_skipped() {
        let collection = PolygonCollection::custom(vec![
            Polygon::new(vec![]),
            Polygon::new(vec![Point::new(1.0, 1.0), Point::new(2.0, 2.0)]),
            // Collinear, so nothing to fill
            Polygon::new(vec![
                Point::new(0.0, 0.0),
                Point::new(4.0, 4.0),
                Point::new(8.0, 8.0),
            ]),
        ]);
        assert!(triangulate(&collection).is_empty());
    }
}
