//! Editor mode state - which part of the sprite the viewport is editing

use crate::data::GeometryKind;
use bevy::log::{debug, info};
use std::fmt;
use std::str::FromStr;

/// What the viewport is currently editing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum EditorMode {
    #[default]
    View,
    EditCollision,
    EditRenderGeometry,
    EditSourceRegion,
    AddSprite,
}

impl EditorMode {
    pub const ALL: [EditorMode; 5] = [
        EditorMode::View,
        EditorMode::EditCollision,
        EditorMode::EditRenderGeometry,
        EditorMode::EditSourceRegion,
        EditorMode::AddSprite,
    ];

    /// Get the mode's display name
    pub fn name(&self) -> &'static str {
        match self {
            EditorMode::View => "View",
            EditorMode::EditCollision => "Edit Collision",
            EditorMode::EditRenderGeometry => "Edit Render Geometry",
            EditorMode::EditSourceRegion => "Edit Source Region",
            EditorMode::AddSprite => "Add Sprite",
        }
    }

    /// Convert to string ID (used on the command line)
    pub fn as_str(&self) -> &'static str {
        match self {
            EditorMode::View => "view",
            EditorMode::EditCollision => "collision",
            EditorMode::EditRenderGeometry => "render",
            EditorMode::EditSourceRegion => "source",
            EditorMode::AddSprite => "add-sprite",
        }
    }

    /// The polygon collection edited in this mode, if any
    pub fn geometry_kind(&self) -> Option<GeometryKind> {
        match self {
            EditorMode::EditCollision => Some(GeometryKind::Collision),
            EditorMode::EditRenderGeometry => Some(GeometryKind::Render),
            _ => None,
        }
    }

    pub fn is_source_region(&self) -> bool {
        *self == EditorMode::EditSourceRegion
    }
}

impl fmt::Display for EditorMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EditorMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        EditorMode::ALL
            .into_iter()
            .find(|mode| mode.as_str() == s)
            .ok_or_else(|| format!("unknown editor mode '{s}'"))
    }
}

/// Tracks the active mode
#[derive(Debug, Default)]
pub struct ModeState {
    active: EditorMode,
}

impl ModeState {
    pub fn active(&self) -> EditorMode {
        self.active
    }

    /// Switch to a new mode. Returns false if it was already active.
    pub fn activate(&mut self, mode: EditorMode) -> bool {
        if self.active == mode {
            debug!("Mode {:?} already active", mode);
            return false;
        }
        let previous = std::mem::replace(&mut self.active, mode);
        info!("Mode switched: {} -> {}", previous.name(), mode.name());
        true
    }

    pub fn is_active(&self, mode: EditorMode) -> bool {
        self.active == mode
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mode_switching() {
        let mut state = ModeState::default();
        assert!(state.is_active(EditorMode::View));

        assert!(state.activate(EditorMode::EditCollision));
        assert_eq!(state.active(), EditorMode::EditCollision);
        assert!(!state.activate(EditorMode::EditCollision));
        assert_eq!(EditorMode::EditCollision.name(), "Edit Collision");
    }

    #[test]
    fn test_mode_string_ids() {
        for mode in EditorMode::ALL {
            assert_eq!(mode.as_str().parse::<EditorMode>(), Ok(mode));
        }
        assert!("pen".parse::<EditorMode>().is_err());
    }

    #[test]
    fn test_geometry_per_mode() {
        assert_eq!(
            EditorMode::EditCollision.geometry_kind(),
            Some(GeometryKind::Collision)
        );
        assert_eq!(
            EditorMode::EditRenderGeometry.geometry_kind(),
            Some(GeometryKind::Render)
        );
        assert_eq!(EditorMode::EditSourceRegion.geometry_kind(), None);
        assert!(EditorMode::EditSourceRegion.is_source_region());
    }
}
