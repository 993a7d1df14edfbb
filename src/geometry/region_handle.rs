//! Handles on the edges and corners of a sprite's source region
//!
//! The source region is a texture-space rectangle that can be resized from
//! eight handles: four corners and the midpoints of the four edges.
//!
//! ```text
//! TopLeft     Top     TopRight
//! Left                Right
//! BottomLeft  Bottom  BottomRight
//! ```
//!
//! Handles are numbered the way they are drawn: corners 0-3 clockwise from
//! the top-left, then the edge midpoints 4-7 starting with the top edge
//! (edge `4 + i` runs from corner `i` to corner `i + 1`).

use kurbo::{Point, Size};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RegionHandle {
    TopLeft,
    TopRight,
    BottomRight,
    BottomLeft,
    Top,
    Right,
    Bottom,
    Left,
}

/// Which sides of the rectangle a handle drags
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct HandleSides {
    pub left: bool,
    pub right: bool,
    pub top: bool,
    pub bottom: bool,
}

impl RegionHandle {
    pub const ALL: [RegionHandle; 8] = [
        RegionHandle::TopLeft,
        RegionHandle::TopRight,
        RegionHandle::BottomRight,
        RegionHandle::BottomLeft,
        RegionHandle::Top,
        RegionHandle::Right,
        RegionHandle::Bottom,
        RegionHandle::Left,
    ];

    /// Corners in winding order
    pub const CORNERS: [RegionHandle; 4] = [
        RegionHandle::TopLeft,
        RegionHandle::TopRight,
        RegionHandle::BottomRight,
        RegionHandle::BottomLeft,
    ];

    /// `EDGES[i]` runs from `CORNERS[i]` to the next corner
    pub const EDGES: [RegionHandle; 4] = [
        RegionHandle::Top,
        RegionHandle::Right,
        RegionHandle::Bottom,
        RegionHandle::Left,
    ];

    pub fn index(self) -> usize {
        match self {
            RegionHandle::TopLeft => 0,
            RegionHandle::TopRight => 1,
            RegionHandle::BottomRight => 2,
            RegionHandle::BottomLeft => 3,
            RegionHandle::Top => 4,
            RegionHandle::Right => 5,
            RegionHandle::Bottom => 6,
            RegionHandle::Left => 7,
        }
    }

    pub fn corner(index: usize) -> Option<Self> {
        (index < 4).then(|| Self::ALL[index])
    }

    /// The edge handle between corner `index` and the next corner
    pub fn edge(index: usize) -> Option<Self> {
        (index < 4).then(|| Self::ALL[4 + index])
    }

    pub fn is_corner(self) -> bool {
        self.index() < 4
    }

    pub fn sides(self) -> HandleSides {
        let mut sides = HandleSides::default();
        match self {
            RegionHandle::TopLeft => {
                sides.top = true;
                sides.left = true;
            }
            RegionHandle::TopRight => {
                sides.top = true;
                sides.right = true;
            }
            RegionHandle::BottomRight => {
                sides.bottom = true;
                sides.right = true;
            }
            RegionHandle::BottomLeft => {
                sides.bottom = true;
                sides.left = true;
            }
            RegionHandle::Top => sides.top = true,
            RegionHandle::Right => sides.right = true,
            RegionHandle::Bottom => sides.bottom = true,
            RegionHandle::Left => sides.left = true,
        }
        sides
    }

    /// Texture-space position of the handle on the rectangle `origin + size`
    pub fn point_in_region(self, origin: Point, size: Size) -> Point {
        let (w, h) = (size.width, size.height);
        let offset = match self {
            RegionHandle::TopLeft => (0.0, 0.0),
            RegionHandle::TopRight => (w, 0.0),
            RegionHandle::BottomRight => (w, h),
            RegionHandle::BottomLeft => (0.0, h),
            RegionHandle::Top => (w * 0.5, 0.0),
            RegionHandle::Right => (w, h * 0.5),
            RegionHandle::Bottom => (w * 0.5, h),
            RegionHandle::Left => (0.0, h * 0.5),
        };
        Point::new(origin.x + offset.0, origin.y + offset.1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn handle_positioning() {
        let origin = Point::new(10.0, 10.0);
        let size = Size::new(90.0, 40.0);

        assert_eq!(
            RegionHandle::TopLeft.point_in_region(origin, size),
            Point::new(10.0, 10.0)
        );
        assert_eq!(
            RegionHandle::BottomRight.point_in_region(origin, size),
            Point::new(100.0, 50.0)
        );
        assert_eq!(
            RegionHandle::Top.point_in_region(origin, size),
            Point::new(55.0, 10.0)
        );
        assert_eq!(
            RegionHandle::Left.point_in_region(origin, size),
            Point::new(10.0, 30.0)
        );
    }

    #[test]
    fn handle_numbering() {
        for (index, handle) in RegionHandle::ALL.iter().enumerate() {
            assert_eq!(handle.index(), index);
        }
        assert_eq!(RegionHandle::corner(4), None);
        // Edge i lies between corner i and corner i + 1
        assert_eq!(RegionHandle::edge(1), Some(RegionHandle::Right));
        assert_eq!(RegionHandle::edge(3), Some(RegionHandle::Left));
        assert!(RegionHandle::corner(2).is_some_and(|h| h.is_corner()));
        assert!(!RegionHandle::Bottom.is_corner());
    }

    #[test]
    fn corners_drag_two_sides() {
        let sides = RegionHandle::BottomLeft.sides();
        assert!(sides.bottom && sides.left && !sides.top && !sides.right);
        let sides = RegionHandle::Right.sides();
        assert!(sides.right && !sides.left && !sides.top && !sides.bottom);
    }
}
