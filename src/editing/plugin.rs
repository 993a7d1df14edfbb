//! Bevy integration for the sprite editor
//!
//! Input handling is left to the host app. It sends [`SpriteEditorCommand`]s
//! and listens for [`SpriteAssetChanged`] to redraw or rebuild whatever it
//! renders the sprite with.

use crate::core::config::EditorSettings;
use crate::data::{AssetNotification, SpriteHandle, SpriteStore};
use crate::editing::mode::EditorMode;
use crate::editing::viewport::{SpriteEditorViewport, ViewportClick};
use crate::geometry::OrthographicView;
use bevy::log::{debug, warn};
use bevy::math::Vec3;
use bevy::prelude::*;

/// The camera the editor overlay is projected with
#[derive(Resource, Debug, Default, Clone, Copy)]
pub struct EditorViewState {
    pub view: OrthographicView,
}

/// The viewport controller of the sprite currently open for editing
#[derive(Resource, Debug, Default)]
pub struct ActiveSpriteEditor {
    pub viewport: Option<SpriteEditorViewport>,
}

/// Requests from the host to the open editor
#[derive(Event, Debug, Clone, PartialEq)]
pub enum SpriteEditorCommand {
    /// Start editing a sprite, replacing whatever was open
    Open(SpriteHandle),
    Click(ViewportClick),
    BeginDrag,
    /// World-space drag step
    Drag(Vec3),
    EndDrag,
    CancelDrag,
    DeleteSelection,
    SplitEdge,
    AddPolygon,
    SnapToPixelGrid,
    SetMode(EditorMode),
    Undo,
    Redo,
}

/// A sprite asset changed; forwarded from the store's notifications
#[derive(Event, Debug, Clone, Copy, PartialEq)]
pub struct SpriteAssetChanged(pub AssetNotification);

pub fn handle_editor_commands(
    mut commands: EventReader<SpriteEditorCommand>,
    mut store: ResMut<SpriteStore>,
    mut editor: ResMut<ActiveSpriteEditor>,
    view: Res<EditorViewState>,
    settings: Res<EditorSettings>,
) {
    let store = store.as_mut();
    for command in commands.read() {
        debug!("Sprite editor command: {:?}", command);

        if let SpriteEditorCommand::Open(handle) = command {
            match editor.viewport.as_mut() {
                Some(viewport) => viewport.notify_sprite_being_edited_has_changed(store, *handle),
                None => {
                    editor.viewport = Some(SpriteEditorViewport::new(*handle, settings.clone()));
                }
            }
            continue;
        }

        let Some(viewport) = editor.viewport.as_mut() else {
            warn!("No sprite open, ignoring {:?}", command);
            continue;
        };

        match command {
            SpriteEditorCommand::Open(_) => {}
            SpriteEditorCommand::Click(click) => viewport.click_at(store, &view.view, *click),
            SpriteEditorCommand::BeginDrag => viewport.tracking_started(store, true),
            SpriteEditorCommand::Drag(drag) => {
                viewport.input_widget_delta(store, *drag);
            }
            SpriteEditorCommand::EndDrag => viewport.tracking_stopped(store),
            SpriteEditorCommand::CancelDrag => viewport.cancel_tracking(store),
            SpriteEditorCommand::DeleteSelection => {
                viewport.delete_selection(store);
            }
            SpriteEditorCommand::SplitEdge => {
                viewport.split_edge(store);
            }
            SpriteEditorCommand::AddPolygon => {
                viewport.add_polygon(store);
            }
            SpriteEditorCommand::SnapToPixelGrid => {
                viewport.snap_all_vertices_to_pixel_grid(store);
            }
            SpriteEditorCommand::SetMode(mode) => viewport.set_mode(store, *mode),
            SpriteEditorCommand::Undo => {
                viewport.undo(store);
            }
            SpriteEditorCommand::Redo => {
                viewport.redo(store);
            }
        }
    }
}

/// Forward store notifications as events
pub fn forward_asset_notifications(
    mut store: ResMut<SpriteStore>,
    mut events: EventWriter<SpriteAssetChanged>,
) {
    for notification in store.drain_notifications() {
        events.write(SpriteAssetChanged(notification));
    }
}

/// Plugin to add the sprite editor resources, events and systems
pub struct SpriteEditorPlugin;

impl Plugin for SpriteEditorPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<SpriteStore>()
            .init_resource::<EditorSettings>()
            .init_resource::<EditorViewState>()
            .init_resource::<ActiveSpriteEditor>()
            .add_event::<SpriteEditorCommand>()
            .add_event::<SpriteAssetChanged>()
            .add_systems(
                Update,
                (handle_editor_commands, forward_asset_notifications).chain(),
            );
    }
}
