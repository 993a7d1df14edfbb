//! Undoable edit transactions
//!
//! A [`ScopedTransaction`] snapshots a sprite when an edit begins. Committing
//! it records a before/after pair in [`UndoHistory`]; rolling it back puts the
//! snapshot back in place.

use crate::data::{Sprite, SpriteHandle, SpriteStore};
use bevy::log::debug;
use std::collections::VecDeque;

/// Default number of edits kept for undo
const DEFAULT_UNDO_STACK_SIZE: usize = 128;

/// An open edit on one sprite
#[derive(Debug)]
pub struct ScopedTransaction {
    label: String,
    sprite: SpriteHandle,
    before: Sprite,
}

impl ScopedTransaction {
    /// Snapshot the sprite and flag it as modified.
    /// Returns `None` if the handle no longer resolves.
    pub fn begin(label: &str, store: &mut SpriteStore, sprite: SpriteHandle) -> Option<Self> {
        let before = store.get(sprite)?.clone();
        store.modify(sprite);
        debug!("Begin transaction '{}' on sprite {:?}", label, sprite);
        Some(Self {
            label: label.to_string(),
            sprite,
            before,
        })
    }

    /// Record the edit in the history. Edits that changed nothing are dropped.
    pub fn commit(self, store: &SpriteStore, history: &mut UndoHistory) -> bool {
        let Some(after) = store.get(self.sprite) else {
            debug!("Transaction '{}' target is gone, dropping", self.label);
            return false;
        };
        if *after == self.before {
            debug!("Transaction '{}' changed nothing", self.label);
            return false;
        }
        debug!("Commit transaction '{}'", self.label);
        history.push(UndoEntry {
            label: self.label,
            sprite: self.sprite,
            before: self.before,
            after: after.clone(),
        });
        true
    }

    /// Put the snapshot back, discarding everything done since `begin`
    pub fn rollback(self, store: &mut SpriteStore) -> bool {
        debug!("Roll back transaction '{}'", self.label);
        store.restore(self.sprite, self.before)
    }
}

#[derive(Debug, Clone)]
struct UndoEntry {
    label: String,
    sprite: SpriteHandle,
    before: Sprite,
    after: Sprite,
}

/// Committed edits that can be undone and redone
#[derive(Debug, Clone)]
pub struct UndoHistory {
    max_undo_count: usize,
    entries: VecDeque<UndoEntry>,
    /// Number of entries currently applied
    applied: usize,
}

impl Default for UndoHistory {
    fn default() -> Self {
        Self::new_sized(DEFAULT_UNDO_STACK_SIZE)
    }
}

impl UndoHistory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn new_sized(max_undo_count: usize) -> Self {
        Self {
            max_undo_count: max_undo_count.max(1),
            entries: VecDeque::new(),
            applied: 0,
        }
    }

    fn push(&mut self, entry: UndoEntry) {
        // A new edit after undoing discards the redo tail
        self.entries.truncate(self.applied);
        self.entries.push_back(entry);
        if self.entries.len() > self.max_undo_count {
            self.entries.pop_front();
        }
        self.applied = self.entries.len();
    }

    pub fn can_undo(&self) -> bool {
        self.applied > 0
    }

    pub fn can_redo(&self) -> bool {
        self.applied < self.entries.len()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Label of the edit the next undo would revert
    pub fn undo_label(&self) -> Option<&str> {
        self.applied
            .checked_sub(1)
            .and_then(|index| self.entries.get(index))
            .map(|entry| entry.label.as_str())
    }

    /// Labels of the applied edits, oldest first
    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.entries
            .iter()
            .take(self.applied)
            .map(|entry| entry.label.as_str())
    }

    /// Revert the last applied edit; returns the sprite it touched.
    /// Edits on sprites that no longer exist are dropped on the way.
    pub fn undo(&mut self, store: &mut SpriteStore) -> Option<SpriteHandle> {
        while let Some(index) = self.applied.checked_sub(1) {
            let entry = self.entries.get(index)?;
            if !store.restore(entry.sprite, entry.before.clone()) {
                debug!("Dropping undo '{}', sprite {:?} is gone", entry.label, entry.sprite);
                self.entries.remove(index);
                self.applied = index;
                continue;
            }
            store.post_edit_change(entry.sprite);
            debug!("Undo '{}'", entry.label);
            self.applied = index;
            return Some(entry.sprite);
        }
        None
    }

    /// Re-apply the last undone edit; returns the sprite it touched
    pub fn redo(&mut self, store: &mut SpriteStore) -> Option<SpriteHandle> {
        while let Some(entry) = self.entries.get(self.applied) {
            if !store.restore(entry.sprite, entry.after.clone()) {
                debug!("Dropping redo '{}', sprite {:?} is gone", entry.label, entry.sprite);
                self.entries.remove(self.applied);
                continue;
            }
            store.post_edit_change(entry.sprite);
            debug!("Redo '{}'", entry.label);
            self.applied += 1;
            return Some(entry.sprite);
        }
        None
    }
}
