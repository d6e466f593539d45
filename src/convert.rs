// =============================================================================
// CONVERT.RS: Producing level text from other data
//
// Everything here returns the comma/newline text `Tilemap::load` reads:
// - Flat id arrays (e.g. a level edited in memory)
// - Images, where pure black pixels become solid tiles
// Tiled maps live in `tiled.rs`.
// =============================================================================

use std::path::Path;

use image::RgbaImage;

use crate::error::Result;

/// Write a flat, row-major id array as level text.
///
/// Rows are separated by `\n`, fields by `", "`.  With `invert`, `0` and `1`
/// are swapped (every other id is kept), which flips a 1-bit collision map.
/// A trailing partial row is written as-is.
///
/// With `width == 1` every line holds a single field, and
/// [`Tilemap::load`](crate::tilemap::Tilemap::load) skips lines with fewer
/// than two fields, so that text does not load back as a map.
pub fn array_to_csv(data: &[u32], width: usize, invert: bool) -> String {
    if width == 0 {
        return String::new();
    }
    data.chunks(width)
        .map(|row| {
            row.iter()
                .map(|&id| match (invert, id) {
                    (true, 0) => 1,
                    (true, 1) => 0,
                    _ => id,
                })
                .map(|id| id.to_string())
                .collect::<Vec<_>>()
                .join(", ")
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Turn an image into level text, one field per pixel.
///
/// Without a colour map, pure black (`0x000000`, alpha ignored) becomes `1`
/// and every other colour `0`; `invert` makes every non-black pixel `1`
/// instead.  With a colour map, each pixel becomes the position of its
/// `0xRRGGBB` colour in the map, or `0` when the colour is not listed.
///
/// `scale` repeats each pixel as a `scale`×`scale` block of tiles; `0` is
/// treated as `1`.
pub fn bitmap_to_csv(
    image: &RgbaImage,
    invert: bool,
    scale: u32,
    color_map: Option<&[u32]>,
) -> String {
    let scale = scale.max(1);
    let (width, height) = (image.width() * scale, image.height() * scale);

    let mut rows = Vec::with_capacity(height as usize);
    for y in 0..height {
        let mut fields = Vec::with_capacity(width as usize);
        for x in 0..width {
            let [r, g, b, _] = image.get_pixel(x / scale, y / scale).0;
            let rgb = (r as u32) << 16 | (g as u32) << 8 | b as u32;
            let value = match color_map {
                Some(colors) => colors.iter().position(|&c| c == rgb).unwrap_or(0),
                None => ((rgb == 0) != invert) as usize,
            };
            fields.push(value.to_string());
        }
        rows.push(fields.join(", "));
    }
    rows.join("\n")
}

/// Decode an image file and convert it with [`bitmap_to_csv`].
pub fn image_to_csv(path: impl AsRef<Path>, invert: bool, scale: u32) -> Result<String> {
    let image = image::open(path)?.to_rgba8();
    Ok(bitmap_to_csv(&image, invert, scale, None))
}

/// Decode an in-memory PNG and convert it with [`bitmap_to_csv`].
pub fn png_to_csv(png_bytes: &[u8], invert: bool, scale: u32) -> Result<String> {
    let image = image::load_from_memory_with_format(png_bytes, image::ImageFormat::Png)?.to_rgba8();
    Ok(bitmap_to_csv(&image, invert, scale, None))
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    const BLACK: Rgba<u8> = Rgba([0, 0, 0, 255]);
    const WHITE: Rgba<u8> = Rgba([255, 255, 255, 255]);
    const RED: Rgba<u8> = Rgba([255, 0, 0, 255]);

    fn checker() -> RgbaImage {
        RgbaImage::from_fn(2, 2, |x, y| if (x + y) % 2 == 0 { BLACK } else { WHITE })
    }

    #[test]
    fn array_rows_and_fields() {
        assert_eq!(array_to_csv(&[1, 2, 3, 4, 5, 6], 3, false), "1, 2, 3\n4, 5, 6");
    }

    #[test]
    fn array_invert_swaps_only_zero_and_one() {
        assert_eq!(array_to_csv(&[0, 1, 2, 1], 2, true), "1, 0\n2, 0");
    }

    #[test]
    fn array_width_one_writes_single_field_lines() {
        assert_eq!(array_to_csv(&[1, 0, 1], 1, false), "1\n0\n1");
    }

    #[test]
    fn array_zero_width_is_empty() {
        assert_eq!(array_to_csv(&[1, 2], 0, false), "");
    }

    #[test]
    fn black_pixels_are_solid() {
        assert_eq!(bitmap_to_csv(&checker(), false, 1, None), "1, 0\n0, 1");
        assert_eq!(bitmap_to_csv(&checker(), true, 1, None), "0, 1\n1, 0");
    }

    #[test]
    fn scale_repeats_pixels() {
        let csv = bitmap_to_csv(&checker(), false, 2, None);
        assert_eq!(csv, "1, 1, 0, 0\n1, 1, 0, 0\n0, 0, 1, 1\n0, 0, 1, 1");
    }

    #[test]
    fn color_map_indexes_and_defaults_to_zero() {
        let img = RgbaImage::from_fn(3, 1, |x, _| [WHITE, RED, BLACK][x as usize]);
        let csv = bitmap_to_csv(&img, false, 1, Some(&[0xFFFFFF, 0xFF0000]));
        assert_eq!(csv, "0, 1, 0");
    }

    #[test]
    fn png_bytes_decode() {
        let mut bytes = Vec::new();
        checker()
            .write_to(&mut std::io::Cursor::new(&mut bytes), image::ImageFormat::Png)
            .unwrap();
        assert_eq!(png_to_csv(&bytes, false, 1).unwrap(), "1, 0\n0, 1");
        assert!(png_to_csv(b"not a png", false, 1).is_err());
    }
}
