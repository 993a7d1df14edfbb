//! Draw surface abstraction
//!
//! The editor overlay only needs three primitives (tiles, lines, text) plus a
//! hit proxy that tags the primitives drawn while it is set.

use crate::editing::selection::SelectedItem;
use bevy::color::LinearRgba;
use bevy::math::Vec2;

/// A 2D canvas in screen pixels, origin top-left
pub trait DrawSurface {
    /// True when the surface only collects hit regions
    fn is_hit_testing(&self) -> bool;

    /// Tag subsequent primitives with `proxy` (`None` stops tagging)
    fn set_hit_proxy(&mut self, proxy: Option<SelectedItem>);

    /// Draw a square tile of `size` pixels centered on `center`
    fn draw_tile(&mut self, center: Vec2, size: f32, color: LinearRgba);

    fn draw_line(&mut self, from: Vec2, to: Vec2, color: LinearRgba);

    fn draw_text(&mut self, position: Vec2, text: &str, color: LinearRgba);
}

/// One recorded primitive
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    Tile {
        center: Vec2,
        size: f32,
        color: LinearRgba,
        proxy: Option<SelectedItem>,
    },
    Line {
        from: Vec2,
        to: Vec2,
        color: LinearRgba,
        proxy: Option<SelectedItem>,
    },
    Text {
        position: Vec2,
        text: String,
        color: LinearRgba,
    },
}

impl DrawCommand {
    pub fn proxy(&self) -> Option<&SelectedItem> {
        match self {
            DrawCommand::Tile { proxy, .. } | DrawCommand::Line { proxy, .. } => proxy.as_ref(),
            DrawCommand::Text { .. } => None,
        }
    }
}

/// A surface that records every primitive in draw order
#[derive(Debug, Default, Clone)]
pub struct DrawList {
    hit_testing: bool,
    current_proxy: Option<SelectedItem>,
    commands: Vec<DrawCommand>,
}

impl DrawList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn hit_testing() -> Self {
        Self {
            hit_testing: true,
            ..Default::default()
        }
    }

    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    pub fn clear(&mut self) {
        self.commands.clear();
        self.current_proxy = None;
    }

    /// All text drawn, in draw order
    pub fn texts(&self) -> impl Iterator<Item = &str> {
        self.commands.iter().filter_map(|command| match command {
            DrawCommand::Text { text, .. } => Some(text.as_str()),
            _ => None,
        })
    }
}

impl DrawSurface for DrawList {
    fn is_hit_testing(&self) -> bool {
        self.hit_testing
    }

    fn set_hit_proxy(&mut self, proxy: Option<SelectedItem>) {
        self.current_proxy = proxy;
    }

    fn draw_tile(&mut self, center: Vec2, size: f32, color: LinearRgba) {
        self.commands.push(DrawCommand::Tile {
            center,
            size,
            color,
            proxy: self.current_proxy.clone(),
        });
    }

    fn draw_line(&mut self, from: Vec2, to: Vec2, color: LinearRgba) {
        self.commands.push(DrawCommand::Line {
            from,
            to,
            color,
            proxy: self.current_proxy.clone(),
        });
    }

    fn draw_text(&mut self, position: Vec2, text: &str, color: LinearRgba) {
        self.commands.push(DrawCommand::Text {
            position,
            text: text.to_string(),
            color,
        });
    }
}
