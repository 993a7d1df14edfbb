//! The sprite editor viewport controller
//!
//! Owns the selection, the editor mode and the open transaction for one
//! sprite, and turns clicks, drags and commands into edits on the
//! [`SpriteStore`].

use crate::core::config::EditorSettings;
use crate::data::{GeometryKind, SpriteHandle, SpriteStore};
use crate::editing::mode::{EditorMode, ModeState};
use crate::editing::selection::{SelectedItem, SelectionSet};
use crate::editing::transaction::{ScopedTransaction, UndoHistory};
use crate::geometry::{PaperAxes, ViewProjection};
use crate::rendering::{DrawSurface, HitTestCanvas, SpriteOverlay};
use bevy::log::{debug, info, warn};
use bevy::math::{Vec2, Vec3};

const MODIFICATION_IN_VIEWPORT: &str = "Modification in Viewport";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ClickKind {
    #[default]
    Single,
    Double,
}

/// A click in the viewport
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ViewportClick {
    /// Viewport pixel, origin top-left
    pub pixel: Vec2,
    pub kind: ClickKind,
    /// Add to the selection instead of replacing it
    pub modifier: bool,
}

impl ViewportClick {
    pub fn single(pixel: Vec2) -> Self {
        Self {
            pixel,
            ..Default::default()
        }
    }

    pub fn double(pixel: Vec2) -> Self {
        Self {
            pixel,
            kind: ClickKind::Double,
            modifier: false,
        }
    }

    pub fn with_modifier(mut self) -> Self {
        self.modifier = true;
        self
    }
}

/// Which manipulation widget to show
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WidgetMode {
    None,
    Translate,
}

/// Interaction controller for editing one sprite
#[derive(Debug)]
pub struct SpriteEditorViewport {
    sprite: SpriteHandle,
    mode: ModeState,
    selection: SelectionSet,
    transaction: Option<ScopedTransaction>,
    history: UndoHistory,
    manipulating: bool,
    /// Set when the open manipulation changed something
    dirtied: bool,
    axes: PaperAxes,
    settings: EditorSettings,
}

impl SpriteEditorViewport {
    pub fn new(sprite: SpriteHandle, settings: EditorSettings) -> Self {
        Self {
            sprite,
            mode: ModeState::default(),
            selection: SelectionSet::new(),
            transaction: None,
            history: UndoHistory::new(),
            manipulating: false,
            dirtied: false,
            axes: PaperAxes::default(),
            settings,
        }
    }

    pub fn with_axes(mut self, axes: PaperAxes) -> Self {
        self.axes = axes;
        self
    }

    pub fn sprite(&self) -> SpriteHandle {
        self.sprite
    }

    pub fn mode(&self) -> EditorMode {
        self.mode.active()
    }

    pub fn selection(&self) -> &SelectionSet {
        &self.selection
    }

    pub fn settings(&self) -> &EditorSettings {
        &self.settings
    }

    pub fn settings_mut(&mut self) -> &mut EditorSettings {
        &mut self.settings
    }

    pub fn axes(&self) -> PaperAxes {
        self.axes
    }

    pub fn history(&self) -> &UndoHistory {
        &self.history
    }

    pub fn is_manipulating(&self) -> bool {
        self.manipulating
    }

    pub fn has_open_transaction(&self) -> bool {
        self.transaction.is_some()
    }

    fn is_in_source_region_mode(&self) -> bool {
        self.mode.active().is_source_region()
    }

    /// The polygon collection the current mode edits, if any
    pub fn geometry_being_edited(&self) -> Option<GeometryKind> {
        self.mode.active().geometry_kind()
    }

    // -----------------------------------------------------------------
    // Transactions
    // -----------------------------------------------------------------

    /// Open a transaction unless one is already open
    fn begin_transaction(&mut self, store: &mut SpriteStore, label: &str) {
        if self.transaction.is_some() {
            return;
        }
        self.transaction = ScopedTransaction::begin(label, store, self.sprite);
        if self.transaction.is_none() {
            warn!("Sprite {:?} is gone, cannot begin '{}'", self.sprite, label);
        }
    }

    /// Finish the open edit and commit the transaction. Safe to call when
    /// nothing is open.
    fn end_transaction(&mut self, store: &mut SpriteStore) {
        if self.dirtied {
            if self.is_in_source_region_mode() {
                if let Some(sprite) = store.get_mut(self.sprite) {
                    sprite.snap_source_region_to_pixel_grid();
                }
            }
            store.post_edit_change(self.sprite);
        }
        self.dirtied = false;

        if let Some(transaction) = self.transaction.take() {
            transaction.commit(store, &mut self.history);
        }
    }

    /// Run a single-shot edit inside its own transaction
    fn with_transaction<R>(
        &mut self,
        store: &mut SpriteStore,
        label: &str,
        edit: impl FnOnce(&mut Self, &mut SpriteStore) -> R,
    ) -> R {
        self.begin_transaction(store, label);
        let result = edit(self, store);
        self.end_transaction(store);
        result
    }

    // -----------------------------------------------------------------
    // Selection
    // -----------------------------------------------------------------

    /// Collect the hit regions of the current overlay and pick the topmost
    pub fn pick(&self, store: &SpriteStore, view: &dyn ViewProjection, pixel: Vec2) -> Option<SelectedItem> {
        let mut canvas = HitTestCanvas::new(self.settings.hit_tolerance);
        self.draw(store, view, &mut canvas);
        canvas.pick(pixel)
    }

    /// Apply a click whose hit-test result is already known
    pub fn process_click(
        &mut self,
        store: &mut SpriteStore,
        view: &dyn ViewProjection,
        hit: Option<SelectedItem>,
        click: ViewportClick,
    ) {
        if let Some(item) = hit {
            if !click.modifier {
                self.selection.clear();
            }
            self.selection.add(item);
            return;
        }

        self.selection.clear();

        if click.kind == ClickKind::Double && self.is_in_source_region_mode() {
            let Some(sprite) = store.get(self.sprite) else {
                return;
            };
            let texel = sprite
                .source_view_space(self.axes)
                .screen_to_texture(view, click.pixel);
            debug!("Extracting source region at texel {:?}", texel);

            self.with_transaction(store, "Extract Source Region", |viewport, store| {
                if let Some(sprite) = store.get_mut(viewport.sprite) {
                    viewport.dirtied |= sprite.extract_source_region_from_texture_point(texel);
                }
            });
        }
    }

    /// Hit-test a click against the current overlay and apply it
    pub fn click_at(&mut self, store: &mut SpriteStore, view: &dyn ViewProjection, click: ViewportClick) {
        let hit = self.pick(store, view, click.pixel);
        self.process_click(store, view, hit, click);
    }

    // -----------------------------------------------------------------
    // Manipulation
    // -----------------------------------------------------------------

    /// Open the drag transaction. Nothing happens without a selection.
    pub fn tracking_started(&mut self, store: &mut SpriteStore, is_dragging: bool) {
        if !self.manipulating && is_dragging && !self.selection.is_empty() {
            self.begin_transaction(store, MODIFICATION_IN_VIEWPORT);
            self.manipulating = true;
            self.dirtied = false;
        }
    }

    /// Apply a world-space drag step to every selected item.
    /// Returns true if the drag was consumed.
    pub fn input_widget_delta(&mut self, store: &mut SpriteStore, drag: Vec3) -> bool {
        if !self.manipulating {
            return false;
        }
        let Some(sprite) = store.get(self.sprite) else {
            return false;
        };
        let delta = sprite.render_space(self.axes).texture_delta_from_world(drag);

        let mut changed = false;
        for item in self.selection.iter() {
            changed |= item.apply_delta(store, delta, self.axes);
        }

        if changed {
            if !self.is_in_source_region_mode() {
                store.post_edit_change(self.sprite);
            }
            self.dirtied = true;
        }
        true
    }

    pub fn tracking_stopped(&mut self, store: &mut SpriteStore) {
        if self.manipulating {
            self.end_transaction(store);
            self.manipulating = false;
        }
    }

    /// Abandon the drag in progress and restore the sprite as it was
    pub fn cancel_tracking(&mut self, store: &mut SpriteStore) {
        if !self.manipulating {
            return;
        }
        self.manipulating = false;
        self.dirtied = false;
        if let Some(transaction) = self.transaction.take() {
            if transaction.rollback(store) {
                store.post_edit_change(self.sprite);
            }
        }
        self.selection.retain_live(store);
        debug!("Manipulation cancelled");
    }

    pub fn widget_mode(&self) -> WidgetMode {
        if self.selection.is_empty() {
            WidgetMode::None
        } else {
            WidgetMode::Translate
        }
    }

    /// Center of the selection in world space, zero when nothing is selected
    pub fn widget_location(&self, store: &SpriteStore) -> Vec3 {
        self.selection
            .centroid(store, self.axes)
            .unwrap_or(Vec3::ZERO)
    }

    // -----------------------------------------------------------------
    // Commands
    // -----------------------------------------------------------------

    /// Delete the selected vertex or edge. Only a single selected item is
    /// supported; anything else is refused.
    pub fn delete_selection(&mut self, store: &mut SpriteStore) -> bool {
        if self.manipulating {
            debug!("Delete ignored during a drag");
            return false;
        }
        self.with_transaction(store, "Delete Selection", |viewport, store| {
            let Some(item) = viewport.selection.single().cloned() else {
                debug!(
                    "Delete needs exactly one selected item, have {}",
                    viewport.selection.len()
                );
                return false;
            };
            let deleted = item.delete(store);
            viewport.selection.clear();
            viewport.dirtied |= deleted;
            deleted
        })
    }

    /// Insert a vertex in the middle of the selected edge
    pub fn split_edge(&mut self, store: &mut SpriteStore) -> bool {
        if self.manipulating {
            debug!("Split ignored during a drag");
            return false;
        }
        self.with_transaction(store, "Split Edge", |viewport, store| {
            let Some(item) = viewport.selection.single().cloned() else {
                debug!(
                    "Split needs exactly one selected item, have {}",
                    viewport.selection.len()
                );
                return false;
            };
            let split = item.split_edge(store);
            viewport.selection.clear();
            viewport.dirtied |= split;
            split
        })
    }

    /// Seed a new triangle in the geometry of the current mode.
    /// Returns the new polygon's index.
    pub fn add_polygon(&mut self, store: &mut SpriteStore) -> Option<usize> {
        if self.manipulating {
            debug!("Add polygon ignored during a drag");
            return None;
        }
        let kind = self.geometry_being_edited()?;
        self.with_transaction(store, "Add Polygon", |viewport, store| {
            let sprite = store.get_mut(viewport.sprite)?;
            let base = sprite.source_uv;
            let index = sprite.geometry_mut(kind).add_seed_triangle(base);
            viewport.dirtied = true;
            info!("Added polygon {} to {}", index, kind.name());
            Some(index)
        })
    }

    pub fn snap_all_vertices_to_pixel_grid(&mut self, store: &mut SpriteStore) -> bool {
        if self.manipulating {
            debug!("Snap ignored during a drag");
            return false;
        }
        let Some(kind) = self.geometry_being_edited() else {
            return false;
        };
        self.with_transaction(store, "Snap All Verts to Pixel Grid", |viewport, store| {
            let Some(sprite) = store.get_mut(viewport.sprite) else {
                return false;
            };
            let snapped = sprite.geometry_mut(kind).snap_all_vertices_to_pixel_grid();
            viewport.dirtied |= snapped;
            snapped
        })
    }

    pub fn set_mode(&mut self, store: &mut SpriteStore, mode: EditorMode) {
        if self.mode.is_active(mode) {
            return;
        }
        self.end_transaction(store);
        self.manipulating = false;
        self.selection.clear();
        self.mode.activate(mode);
    }

    /// Point the viewport at a different sprite (or the same one after an
    /// external change)
    pub fn notify_sprite_being_edited_has_changed(&mut self, store: &mut SpriteStore, sprite: SpriteHandle) {
        self.end_transaction(store);
        self.manipulating = false;
        self.selection.clear();
        self.sprite = sprite;
    }

    pub fn undo(&mut self, store: &mut SpriteStore) -> bool {
        if self.manipulating {
            debug!("Undo ignored during a drag");
            return false;
        }
        self.selection.clear();
        self.history.undo(store).is_some()
    }

    pub fn redo(&mut self, store: &mut SpriteStore) -> bool {
        if self.manipulating {
            debug!("Redo ignored during a drag");
            return false;
        }
        self.selection.clear();
        self.history.redo(store).is_some()
    }

    // -----------------------------------------------------------------
    // View flags
    // -----------------------------------------------------------------

    pub fn toggle_show_source_texture(&mut self) {
        let flags = &mut self.settings.view_flags;
        flags.show_source_texture = !flags.show_source_texture;
    }

    pub fn toggle_show_sockets(&mut self) {
        let flags = &mut self.settings.view_flags;
        flags.show_sockets = !flags.show_sockets;
    }

    pub fn toggle_show_normals(&mut self) {
        let flags = &mut self.settings.view_flags;
        flags.show_normals = !flags.show_normals;
    }

    pub fn toggle_show_pivot(&mut self) {
        let flags = &mut self.settings.view_flags;
        flags.show_pivot = !flags.show_pivot;
    }

    // -----------------------------------------------------------------
    // Drawing
    // -----------------------------------------------------------------

    pub fn draw(&self, store: &SpriteStore, view: &dyn ViewProjection, surface: &mut dyn DrawSurface) {
        let Some(sprite) = store.get(self.sprite) else {
            return;
        };
        SpriteOverlay {
            handle: self.sprite,
            sprite,
            view,
            axes: self.axes,
            settings: &self.settings,
        }
        .draw_canvas(surface, self.mode.active());
    }
}
