//! Sprite asset storage with generation-checked handles
//!
//! Editors never own sprites. They address them through [`SpriteHandle`]s,
//! which stop resolving as soon as the sprite is removed, even if the slot is
//! later reused by another sprite.

use crate::data::sprite::Sprite;
use bevy::log::debug;
use bevy::prelude::Resource;
use std::fmt;

/// A non-owning reference to a sprite in a [`SpriteStore`]
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SpriteHandle {
    index: u32,
    generation: u32,
}

impl SpriteHandle {
    pub fn index(&self) -> u32 {
        self.index
    }

    pub fn generation(&self) -> u32 {
        self.generation
    }
}

impl fmt::Debug for SpriteHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}v{}", self.index, self.generation)
    }
}

/// Change notifications raised on sprites, drained by the host
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssetNotification {
    /// The sprite is about to change (snapshot for undo was taken)
    Modified(SpriteHandle),
    /// A property changed and derived data was rebuilt
    PropertyChanged(SpriteHandle),
    Removed(SpriteHandle),
}

impl AssetNotification {
    pub fn sprite(&self) -> SpriteHandle {
        match self {
            AssetNotification::Modified(handle)
            | AssetNotification::PropertyChanged(handle)
            | AssetNotification::Removed(handle) => *handle,
        }
    }
}

#[derive(Debug)]
struct Slot {
    generation: u32,
    sprite: Option<Sprite>,
}

/// Owner of all sprite assets being edited
#[derive(Resource, Debug, Default)]
pub struct SpriteStore {
    slots: Vec<Slot>,
    free: Vec<u32>,
    notifications: Vec<AssetNotification>,
}

impl SpriteStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, sprite: Sprite) -> SpriteHandle {
        debug!("Adding sprite '{}' to store", sprite.name);
        if let Some(index) = self.free.pop() {
            let slot = &mut self.slots[index as usize];
            slot.sprite = Some(sprite);
            return SpriteHandle {
                index,
                generation: slot.generation,
            };
        }
        self.slots.push(Slot {
            generation: 0,
            sprite: Some(sprite),
        });
        SpriteHandle {
            index: (self.slots.len() - 1) as u32,
            generation: 0,
        }
    }

    /// Remove a sprite; every outstanding handle to it becomes stale
    pub fn remove(&mut self, handle: SpriteHandle) -> Option<Sprite> {
        let slot = self.live_slot_mut(handle)?;
        let sprite = slot.sprite.take();
        slot.generation = slot.generation.wrapping_add(1);
        self.free.push(handle.index);
        self.notifications.push(AssetNotification::Removed(handle));
        sprite
    }

    pub fn contains(&self, handle: SpriteHandle) -> bool {
        self.get(handle).is_some()
    }

    pub fn get(&self, handle: SpriteHandle) -> Option<&Sprite> {
        self.slots
            .get(handle.index as usize)
            .filter(|slot| slot.generation == handle.generation)
            .and_then(|slot| slot.sprite.as_ref())
    }

    pub fn get_mut(&mut self, handle: SpriteHandle) -> Option<&mut Sprite> {
        self.live_slot_mut(handle)
            .and_then(|slot| slot.sprite.as_mut())
    }

    fn live_slot_mut(&mut self, handle: SpriteHandle) -> Option<&mut Slot> {
        self.slots
            .get_mut(handle.index as usize)
            .filter(|slot| slot.generation == handle.generation && slot.sprite.is_some())
    }

    pub fn len(&self) -> usize {
        self.slots.iter().filter(|slot| slot.sprite.is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Mark a sprite as about to change
    pub fn modify(&mut self, handle: SpriteHandle) -> bool {
        if !self.contains(handle) {
            return false;
        }
        self.notifications.push(AssetNotification::Modified(handle));
        true
    }

    /// Tell a sprite one of its properties changed; rebuilds derived data
    pub fn post_edit_change(&mut self, handle: SpriteHandle) -> bool {
        let Some(sprite) = self.get_mut(handle) else {
            return false;
        };
        sprite.rebuild();
        self.notifications
            .push(AssetNotification::PropertyChanged(handle));
        true
    }

    /// Replace a sprite's contents wholesale (undo/redo, rollback)
    pub fn restore(&mut self, handle: SpriteHandle, sprite: Sprite) -> bool {
        let Some(current) = self.get_mut(handle) else {
            return false;
        };
        *current = sprite;
        true
    }

    pub fn notifications(&self) -> &[AssetNotification] {
        &self.notifications
    }

    pub fn drain_notifications(&mut self) -> Vec<AssetNotification> {
        std::mem::take(&mut self.notifications)
    }
}
