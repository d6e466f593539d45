use serde::{Deserialize, Serialize};

use crate::autotile::AutoTileMode;

// ── LoadOptions ───────────────────────────────────────────────────────────────

/// Options controlling how level text is turned into a [`Tilemap`](crate::tilemap::Tilemap).
///
/// Every field has a default, so a JSON level descriptor only needs to name
/// what it changes:
///
/// ```json
/// { "tile_width": 16, "auto": "alt" }
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoadOptions {
    /// Tile width in pixels.  `0` means "use the sheet height".
    pub tile_width: u32,
    /// Tile height in pixels.  `0` means "same as the tile width".
    pub tile_height: u32,
    /// Auto-tiling mode.  Anything but `Off` forces the three indices below to `1`.
    pub auto: AutoTileMode,
    /// Number of blank tile types inserted in front of the sheet graphics.
    pub starting_index: u32,
    /// Tile types with an id at or above this are visible.
    pub draw_index: u32,
    /// Tile types with an id at or above this collide from every direction.
    pub collide_index: u32,
    /// Horizontal spacing between tiles in the sheet, in pixels.
    pub offset_x: u32,
    /// Vertical spacing between tiles in the sheet, in pixels.
    pub offset_y: u32,
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self {
            tile_width:     0,
            tile_height:    0,
            auto:           AutoTileMode::Off,
            starting_index: 0,
            draw_index:     1,
            collide_index:  1,
            offset_x:       0,
            offset_y:       0,
        }
    }
}

impl LoadOptions {
    /// Deserialise options from a JSON object.  Missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn with_tile_size(mut self, width: u32, height: u32) -> Self {
        self.tile_width = width;
        self.tile_height = height;
        self
    }

    pub fn with_auto(mut self, auto: AutoTileMode) -> Self {
        self.auto = auto;
        self
    }

    pub fn with_indices(mut self, starting: u32, draw: u32, collide: u32) -> Self {
        self.starting_index = starting;
        self.draw_index = draw;
        self.collide_index = collide;
        self
    }
}

// ── PathOptions ───────────────────────────────────────────────────────────────

/// Knobs for [`Tilemap::find_path`](crate::tilemap::Tilemap::find_path).
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PathOptions {
    /// Drop waypoints that lie on a straight line with their neighbours.
    pub simplify: bool,
    /// Drop waypoints a straight ray can skip.  May cut close corners.
    pub ray_simplify: bool,
    /// Only step diagonally when both flanking orthogonal tiles are open.
    pub wide_diagonal: bool,
}

impl Default for PathOptions {
    fn default() -> Self {
        Self { simplify: true, ray_simplify: false, wide_diagonal: true }
    }
}

// ── Tests ──────────────────────────────────────────────────────────────────────
