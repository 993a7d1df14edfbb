//! Sprite asset data and storage

pub mod bake;
pub mod sprite;
pub mod store;

pub use sprite::{
    GeometryKind, PivotMode, Polygon, PolygonCollection, PolygonMode, SocketTransform,
    SourceTexture, Sprite, SpriteSocket,
};
pub use store::{AssetNotification, SpriteHandle, SpriteStore};
