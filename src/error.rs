//! Error types for tilemap loading and level-data conversion.

/// Result type alias
pub type Result<T> = std::result::Result<T, TilemapError>;

/// Everything that can go wrong while building a tilemap or converting level data.
///
/// Queries on a loaded map never fail: they answer with `bool`/`Option`.
#[derive(Debug, thiserror::Error)]
pub enum TilemapError {
    /// The level text had no row with more than one field.
    #[error("level data contains no rows")]
    EmptyLevel,

    /// Tile width or height resolved to zero.
    #[error("invalid tile size {width}x{height}")]
    InvalidTileSize { width: u32, height: u32 },

    /// The sprite sheet cannot hold a single tile of the requested size.
    #[error("sprite sheet {sheet_width}x{sheet_height} is too small for {tile_width}x{tile_height} tiles")]
    SheetTooSmall {
        sheet_width: u32,
        sheet_height: u32,
        tile_width: u32,
        tile_height: u32,
    },

    /// A named or indexed Tiled layer does not exist (or is not a tile layer).
    #[error("layer {0} does not exist in map")]
    LayerNotFound(String),

    /// Image decoding failed.
    #[error("image error: {0}")]
    Image(#[from] image::ImageError),

    /// JSON (options or Tiled map) failed to parse.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}
