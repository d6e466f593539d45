pub mod autotile;
pub mod body;
pub mod collision;
pub mod config;
pub mod convert;
pub mod error;
pub mod geometry;
pub mod pathfinding;
pub mod raycast;
pub mod sheet;
pub mod tile;
pub mod tiled;
pub mod tilemap;

pub mod prelude {
    pub use crate::autotile::AutoTileMode;
    pub use crate::body::Body;
    pub use crate::collision::{Overlap, TileContact};
    pub use crate::config::{LoadOptions, PathOptions};
    pub use crate::error::{Result, TilemapError};
    pub use crate::geometry::Rect;
    pub use crate::raycast::RayResult;
    pub use crate::sheet::TileSheet;
    pub use crate::tile::{CollisionFlags, TileType, tile_callback, tile_filter};
    pub use crate::tilemap::Tilemap;
    pub use glam::Vec2;
}
