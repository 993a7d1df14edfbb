//! Editing Functionality
//!
//! This module contains all editing-related functionality:
//! - Selection of vertices, edges, pivot, sockets and source region handles
//! - The viewport controller that turns input into edits
//! - Editor modes
//! - Transactions and the undo/redo history
//! - Bevy plugin wiring

pub mod mode;
pub mod plugin;
pub mod selection;
pub mod transaction;
pub mod viewport;

// Re-export commonly used items
pub use mode::EditorMode;
pub use plugin::{
    ActiveSpriteEditor, EditorViewState, SpriteAssetChanged, SpriteEditorCommand,
    SpriteEditorPlugin,
};
pub use selection::{SelectedItem, SelectionKind, SelectionSet};
pub use transaction::{ScopedTransaction, UndoHistory};
pub use viewport::{ClickKind, SpriteEditorViewport, ViewportClick, WidgetMode};
