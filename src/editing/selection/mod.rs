//! Selection of sprite elements in the editor viewport

pub mod item;

pub use item::{SelectedItem, SelectionKind};

use crate::data::SpriteStore;
use crate::geometry::{centroid, PaperAxes};
use bevy::math::Vec3;

/// The set of currently selected items, in selection order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SelectionSet {
    items: Vec<SelectedItem>,
}

impl SelectionSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the whole selection with a single item
    pub fn select_only(&mut self, item: SelectedItem) {
        self.items.clear();
        self.items.push(item);
    }

    /// Add an item; returns false if it was already selected
    pub fn add(&mut self, item: SelectedItem) -> bool {
        if self.items.contains(&item) {
            return false;
        }
        self.items.push(item);
        true
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &SelectedItem> {
        self.items.iter()
    }

    /// The selected item when exactly one is selected
    pub fn single(&self) -> Option<&SelectedItem> {
        match self.items.as_slice() {
            [item] => Some(item),
            _ => None,
        }
    }

    /// Drop items whose element no longer exists
    pub fn retain_live(&mut self, store: &SpriteStore) {
        self.items.retain(|item| item.is_live(store));
    }

    /// Mean world position of the selected items
    pub fn centroid(&self, store: &SpriteStore, axes: PaperAxes) -> Option<Vec3> {
        let positions: Vec<Vec3> = self
            .items
            .iter()
            .filter_map(|item| item.world_pos(store, axes))
            .collect();
        centroid(&positions)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::Sprite;
    use crate::geometry::RegionHandle;
    use kurbo::{Point, Size};

    #[test]
    fn test_selection_set_operations() {
        let mut store = SpriteStore::new();
        let sprite = store.insert(Sprite::new("s", Point::ZERO, Size::new(4.0, 4.0)));
        let pivot = SelectedItem::Pivot { sprite };
        let corner = SelectedItem::SourceRegion {
            sprite,
            handle: RegionHandle::TopLeft,
        };

        let mut selection = SelectionSet::new();
        assert!(selection.single().is_none());
        assert!(selection.add(pivot.clone()));
        assert!(!selection.add(pivot.clone()));
        assert_eq!(selection.single(), Some(&pivot));

        selection.add(corner.clone());
        assert_eq!(selection.len(), 2);
        assert!(selection.single().is_none());

        selection.select_only(pivot.clone());
        assert_eq!(selection.single(), Some(&pivot));

        store.remove(sprite);
        selection.retain_live(&store);
        assert!(selection.is_empty());
    }

    #[test]
    fn test_centroid_of_selection() {
        let mut store = SpriteStore::new();
        let sprite = store.insert(Sprite::new("s", Point::ZERO, Size::new(4.0, 4.0)));
        let mut selection = SelectionSet::new();
        assert_eq!(selection.centroid(&store, PaperAxes::default()), None);

        // Render geometry is the 4x4 source rectangle, pivot at its center
        for vertex in 0..4 {
            selection.add(SelectedItem::Vertex {
                sprite,
                geometry: crate::data::GeometryKind::Render,
                polygon: 0,
                vertex,
            });
        }
        assert_eq!(
            selection.centroid(&store, PaperAxes::default()),
            Some(Vec3::ZERO)
        );
    }
}
