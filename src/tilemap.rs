use glam::Vec2;

use crate::autotile::{self, AutoTileMode};
use crate::config::LoadOptions;
use crate::error::{Result, TilemapError};
use crate::geometry::Rect;
use crate::sheet::TileSheet;
use crate::tile::{CollisionFlags, TileCallback, TileFilter, TileRegistry, TileType};

// =============================================================================
// TILEMAP
// =============================================================================
///
/// A grid of tile-type ids with the tile types they refer to.
///
/// Cells are stored row-major (`index = row * width_in_tiles + column`).
/// Every cell holds a valid index into the tile-type registry.
///
/// `K` is the caller's object-kind type, used by tile callback filters.
/// Games that do not filter callbacks can leave it as `()`.
pub struct Tilemap<K: Copy + 'static = ()> {
    position: Vec2,
    last_position: Vec2,
    auto: AutoTileMode,
    width_in_tiles: usize,
    height_in_tiles: usize,
    tile_width: u32,
    tile_height: u32,
    starting_index: u32,
    offset_x: u32,
    offset_y: u32,
    sheet: TileSheet,
    cells: Vec<u32>,
    /// Sheet rectangle for each cell; `None` for invisible tiles.
    rects: Vec<Option<Rect>>,
    registry: TileRegistry<K>,
}

impl<K: Copy + 'static> Tilemap<K> {
    /// Build a tilemap from comma/newline separated level text.
    ///
    /// Lines with fewer than two fields are skipped and do not count as rows.
    /// The first kept row fixes the width; longer rows are truncated and
    /// shorter ones padded with `0`.  Fields that are not non-negative
    /// integers load as `0`.
    pub fn load(text: &str, sheet: TileSheet, options: &LoadOptions) -> Result<Self> {
        let (mut cells, width, height) = parse_level(text);
        if width == 0 || height == 0 {
            return Err(TilemapError::EmptyLevel);
        }

        let mut starting_index = options.starting_index;
        let mut draw_index = options.draw_index;
        let mut collide_index = options.collide_index;
        if options.auto != AutoTileMode::Off {
            starting_index = 1;
            draw_index = 1;
            collide_index = 1;
            autotile::apply_all(&mut cells, width, options.auto);
        }

        let tile_width = if options.tile_width == 0 { sheet.height } else { options.tile_width };
        let tile_height = if options.tile_height == 0 { tile_width } else { options.tile_height };
        if tile_width == 0 || tile_height == 0 {
            return Err(TilemapError::InvalidTileSize { width: tile_width, height: tile_height });
        }

        let graphics = sheet.tile_count(tile_width, tile_height, options.offset_x, options.offset_y);
        if graphics == 0 {
            return Err(TilemapError::SheetTooSmall {
                sheet_width: sheet.width,
                sheet_height: sheet.height,
                tile_width,
                tile_height,
            });
        }
        let type_count = graphics + starting_index as usize;

        let max_id = (type_count - 1) as u32;
        let mut clamped = 0usize;
        for cell in cells.iter_mut().filter(|c| **c > max_id) {
            *cell = max_id;
            clamped += 1;
        }
        if clamped > 0 {
            log::warn!("{clamped} cells referenced tile ids past {max_id}; clamped to {max_id}");
        }

        let mut map = Self {
            position: Vec2::ZERO,
            last_position: Vec2::ZERO,
            auto: options.auto,
            width_in_tiles: width,
            height_in_tiles: height,
            tile_width,
            tile_height,
            starting_index,
            offset_x: options.offset_x,
            offset_y: options.offset_y,
            sheet,
            rects: vec![None; cells.len()],
            cells,
            registry: TileRegistry::build(type_count, draw_index, collide_index),
        };
        for index in 0..map.cells.len() {
            map.update_rect(index);
        }

        log::debug!(
            "loaded {}x{} tilemap ({} tile types, auto {:?})",
            width,
            height,
            type_count,
            options.auto
        );
        Ok(map)
    }

    /// Like [`load`](Self::load), with the options read from a JSON object.
    pub fn from_config(text: &str, sheet: TileSheet, options_json: &str) -> Result<Self> {
        let options = LoadOptions::from_json(options_json)?;
        Self::load(text, sheet, &options)
    }

    // ── Dimensions & placement ─────────────────────────────────────────────

    pub fn width_in_tiles(&self) -> usize {
        self.width_in_tiles
    }

    pub fn height_in_tiles(&self) -> usize {
        self.height_in_tiles
    }

    pub fn total_tiles(&self) -> usize {
        self.cells.len()
    }

    pub fn tile_width(&self) -> u32 {
        self.tile_width
    }

    pub fn tile_height(&self) -> u32 {
        self.tile_height
    }

    pub fn auto_mode(&self) -> AutoTileMode {
        self.auto
    }

    pub fn sheet(&self) -> TileSheet {
        self.sheet
    }

    /// World position of the map's top-left corner.
    pub fn position(&self) -> Vec2 {
        self.position
    }

    /// Position at the start of the current frame: the value before the most
    /// recent [`set_position`](Self::set_position), until
    /// [`post_update`](Self::post_update) catches it up.
    pub fn last_position(&self) -> Vec2 {
        self.last_position
    }

    /// End-of-frame bookkeeping: forget this frame's movement so a map that
    /// stops moving reports a zero [`TileContact::delta`](crate::collision::TileContact::delta).
    pub fn post_update(&mut self) {
        self.last_position = self.position;
    }

    /// Move the map.  The previous position is kept so overlap callbacks can
    /// tell how far the tiles moved this frame.
    pub fn set_position(&mut self, position: Vec2) {
        self.last_position = self.position;
        self.position = position;
    }

    /// Map size in pixels.
    pub fn pixel_size(&self) -> Vec2 {
        Vec2::new(
            (self.width_in_tiles as u32 * self.tile_width) as f32,
            (self.height_in_tiles as u32 * self.tile_height) as f32,
        )
    }

    /// World-space rectangle covered by the whole map.
    pub fn bounds(&self) -> Rect {
        Rect::from_min_size(self.position, self.pixel_size())
    }

    /// The map bounds shrunk by `border` tiles on every side: the area a
    /// camera following the player should be clamped to.  Negative borders pad
    /// the bounds instead.
    pub fn camera_bounds(&self, border: i32) -> Rect {
        self.bounds().inset(
            border as f32 * self.tile_width as f32,
            border as f32 * self.tile_height as f32,
        )
    }

    // ── Cell access ────────────────────────────────────────────────────────

    /// Tile-type id at column `x`, row `y`.
    ///
    /// # Panics
    /// If `(x, y)` is outside the map.
    pub fn tile(&self, x: usize, y: usize) -> u32 {
        assert!(
            x < self.width_in_tiles && y < self.height_in_tiles,
            "tile ({x}, {y}) is outside the {}x{} map",
            self.width_in_tiles,
            self.height_in_tiles
        );
        self.cells[y * self.width_in_tiles + x]
    }

    /// Tile-type id at a row-major index.
    ///
    /// # Panics
    /// If `index >= total_tiles()`.
    pub fn tile_by_index(&self, index: usize) -> u32 {
        self.cells[index]
    }

    /// The raw cell array.
    pub fn data(&self) -> &[u32] {
        &self.cells
    }

    /// A copy of the cell array as `1` (collides) / `0` (passable).
    pub fn collision_data(&self) -> Vec<u32> {
        (0..self.cells.len()).map(|i| self.cell_collides(i) as u32).collect()
    }

    /// Write a tile at column `x`, row `y`.  See [`set_tile_by_index`](Self::set_tile_by_index).
    pub fn set_tile(&mut self, x: usize, y: usize, tile: u32, update_graphics: bool) -> bool {
        if x >= self.width_in_tiles || y >= self.height_in_tiles {
            return false;
        }
        self.set_tile_by_index(y * self.width_in_tiles + x, tile, update_graphics)
    }

    /// Write a tile at a row-major index.
    ///
    /// Returns `false` (and leaves the map untouched) when the index is out of
    /// range or `tile` is not a registered tile type.  With `update_graphics`
    /// the sheet rectangle is refreshed; on an auto-tiled map the written cell
    /// and its 3×3 neighbourhood are re-tiled first.
    pub fn set_tile_by_index(&mut self, index: usize, tile: u32, update_graphics: bool) -> bool {
        if index >= self.cells.len() {
            return false;
        }
        if tile as usize >= self.registry.len() {
            log::warn!("set_tile: id {tile} is not a registered tile type");
            return false;
        }

        self.cells[index] = tile;
        if !update_graphics {
            return true;
        }

        if self.auto == AutoTileMode::Off {
            self.update_rect(index);
            return true;
        }

        let row = (index / self.width_in_tiles) as i64;
        let column = (index % self.width_in_tiles) as i64;
        for r in row - 1..=row + 1 {
            for c in column - 1..=column + 1 {
                if r < 0 || c < 0 || r >= self.height_in_tiles as i64 || c >= self.width_in_tiles as i64 {
                    continue;
                }
                let i = r as usize * self.width_in_tiles + c as usize;
                autotile::apply(&mut self.cells, self.width_in_tiles, self.auto, i);
                self.update_rect(i);
            }
        }
        true
    }

    /// Every row-major index holding tile-type `id`.
    pub fn tile_instances(&self, id: u32) -> Vec<usize> {
        self.cells
            .iter()
            .enumerate()
            .filter_map(|(i, &cell)| (cell == id).then_some(i))
            .collect()
    }

    /// World coordinates of every cell holding tile-type `id`: the tile
    /// centre when `midpoint` is set, otherwise its top-left corner.
    pub fn tile_coords(&self, id: u32, midpoint: bool) -> Vec<Vec2> {
        self.tile_instances(id)
            .into_iter()
            .map(|i| if midpoint { self.cell_center(i) } else { self.cell_origin(i) })
            .collect()
    }

    /// Sheet rectangle drawn for the cell at `index`, `None` if invisible.
    pub fn draw_rect(&self, index: usize) -> Option<Rect> {
        self.rects.get(index).copied().flatten()
    }

    // ── Tile types ─────────────────────────────────────────────────────────

    pub fn tile_type(&self, id: u32) -> Option<&TileType<K>> {
        self.registry.get(id)
    }

    pub fn tile_type_mut(&mut self, id: u32) -> Option<&mut TileType<K>> {
        self.registry.get_mut(id)
    }

    pub fn tile_types(&self) -> &TileRegistry<K> {
        &self.registry
    }

    /// Collision flags of the cell at `index`.  Invisible tiles report `NONE`.
    pub fn tile_collision(&self, index: usize) -> CollisionFlags {
        self.cells
            .get(index)
            .and_then(|&id| self.registry.get(id))
            .filter(|tile| tile.visible)
            .map_or(CollisionFlags::NONE, |tile| tile.allow_collisions)
    }

    /// Change collisions and bind a callback for `range` tile types starting
    /// at `first`.  The callback fires from the overlap queries; `filter`
    /// restricts it to certain object kinds.
    pub fn set_tile_properties(
        &mut self,
        first: u32,
        allow_collisions: CollisionFlags,
        callback: Option<TileCallback<K>>,
        filter: Option<TileFilter<K>>,
        range: u32,
    ) {
        self.registry.set_properties(first, allow_collisions, callback, filter, range);
    }

    // ── Internal helpers ───────────────────────────────────────────────────

    /// True if the tile type stored at `index` blocks from any direction.
    pub(crate) fn cell_collides(&self, index: usize) -> bool {
        self.registry[self.cells[index]].allow_collisions.is_solid()
    }

    /// Row-major index of the cell containing world point `point`.
    pub(crate) fn index_at(&self, point: Vec2) -> Option<usize> {
        let local = point - self.position;
        let column = (local.x / self.tile_width as f32).floor();
        let row = (local.y / self.tile_height as f32).floor();
        // Written so NaN coordinates fall through to `None`.
        if !(column >= 0.0 && row >= 0.0) {
            return None;
        }
        let (column, row) = (column as usize, row as usize);
        (column < self.width_in_tiles && row < self.height_in_tiles)
            .then(|| row * self.width_in_tiles + column)
    }

    /// Index of the neighbour `offset` away from `index`, if it is on the map.
    pub(crate) fn neighbor_index(&self, index: usize, (dx, dy): (i32, i32)) -> Option<usize> {
        let column = (index % self.width_in_tiles) as i64 + dx as i64;
        let row = (index / self.width_in_tiles) as i64 + dy as i64;
        if column < 0 || row < 0 || column >= self.width_in_tiles as i64 || row >= self.height_in_tiles as i64 {
            return None;
        }
        Some(row as usize * self.width_in_tiles + column as usize)
    }

    pub(crate) fn cell_origin(&self, index: usize) -> Vec2 {
        let column = (index % self.width_in_tiles) as f32;
        let row = (index / self.width_in_tiles) as f32;
        self.position + Vec2::new(column * self.tile_width as f32, row * self.tile_height as f32)
    }

    pub(crate) fn cell_center(&self, index: usize) -> Vec2 {
        self.cell_origin(index)
            + Vec2::new(self.tile_width as f32 * 0.5, self.tile_height as f32 * 0.5)
    }

    fn update_rect(&mut self, index: usize) {
        let id = self.cells[index];
        self.rects[index] = match self.registry.get(id) {
            Some(tile) if tile.visible => self.sheet.rect_for_id(
                id,
                self.starting_index,
                self.tile_width,
                self.tile_height,
                self.offset_x,
                self.offset_y,
            ),
            _ => None,
        };
    }
}

// ── Level text parsing ────────────────────────────────────────────────────────

/// Split level text into a flat cell array plus its width and height.
fn parse_level(text: &str) -> (Vec<u32>, usize, usize) {
    let mut cells = Vec::new();
    let mut width = 0;
    let mut height = 0;

    for (line_no, line) in text.split('\n').enumerate() {
        let fields: Vec<&str> = line.split(',').collect();
        if fields.len() <= 1 {
            if !line.trim().is_empty() {
                log::debug!("level line {line_no} has a single field; skipping");
            }
            continue;
        }
        if width == 0 {
            width = fields.len();
        } else if fields.len() != width {
            log::debug!(
                "level line {line_no} has {} fields, expected {width}; truncating/padding",
                fields.len()
            );
        }
        cells.extend((0..width).map(|c| fields.get(c).map_or(0, |f| parse_field(f))));
        height += 1;
    }

    (cells, width, height)
}

/// Parse one level field.  Never fails: junk reads as `0`, fractions truncate.
fn parse_field(field: &str) -> u32 {
    let field = field.trim();
    field.parse::<u32>().unwrap_or_else(|_| {
        field
            .parse::<f64>()
            .ok()
            .filter(|v| v.is_finite() && *v > 0.0)
            .map_or(0, |v| v as u32)
    })
}
