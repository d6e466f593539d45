use std::path::Path;

use crate::error::Result;
use crate::geometry::Rect;

/// Pixel dimensions of the sprite sheet a tilemap draws its tiles from.
///
/// The tilemap never touches pixel data; it only needs the sheet size to
/// derive how many tile types exist and where each one sits in the sheet.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct TileSheet {
    pub width: u32,
    pub height: u32,
}

impl TileSheet {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Read the dimensions of an encoded PNG held in memory.
    pub fn from_png(png_bytes: &[u8]) -> Result<Self> {
        let img = image::load_from_memory(png_bytes)?;
        Ok(Self::new(img.width(), img.height()))
    }

    /// Read the dimensions of an image file without decoding its pixels.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let (width, height) = image::image_dimensions(path)?;
        Ok(Self::new(width, height))
    }

    /// How many `tile_w` × `tile_h` graphics fit in the sheet, given
    /// `spacing_x` / `spacing_y` pixels between neighbouring tiles.
    pub fn tile_count(&self, tile_w: u32, tile_h: u32, spacing_x: u32, spacing_y: u32) -> usize {
        let cols = self.width / (tile_w + spacing_x);
        let rows = self.height / (tile_h + spacing_y);
        (cols * rows) as usize
    }

    /// Source rectangle in the sheet for tile-type `id`.
    ///
    /// Tiles are laid out row-major; `starting_index` blank types sit in front
    /// of the first graphic.  Returns `None` for ids inside that blank range.
    pub fn rect_for_id(
        &self,
        id: u32,
        starting_index: u32,
        tile_w: u32,
        tile_h: u32,
        spacing_x: u32,
        spacing_y: u32,
    ) -> Option<Rect> {
        let slot = id.checked_sub(starting_index)?;
        let mut rx = slot * (tile_w + spacing_x);
        let mut ry = 0;
        if self.width > 0 && rx >= self.width {
            ry = (rx / self.width) * (tile_h + spacing_y);
            rx %= self.width;
        }
        Some(Rect::new(rx as f32, ry as f32, tile_w as f32, tile_h as f32))
    }
}
