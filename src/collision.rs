use glam::Vec2;

use crate::body::Body;
use crate::geometry::Rect;
use crate::tile::CollisionFlags;
use crate::tilemap::Tilemap;

/// One cell's worth of tile, as seen by overlap callbacks.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct TileContact {
    pub tile_id: u32,
    /// Row-major index of the cell in the map.
    pub map_index: usize,
    /// World-space rectangle of the tile.
    pub rect: Rect,
    /// Where the tile's top-left corner was before the map last moved.
    pub last: Vec2,
    pub allow_collisions: CollisionFlags,
}

impl TileContact {
    /// How far the tile moved since the map's previous position.
    pub fn delta(&self) -> Vec2 {
        self.rect.min() - self.last
    }
}

/// Argument handed to an injected overlap callback.  The variant records the
/// parameter order the caller asked for.
#[derive(Debug)]
pub enum Overlap<'a, B> {
    TileFirst(&'a TileContact, &'a mut B),
    ObjectFirst(&'a mut B, &'a TileContact),
}

impl<'a, B> Overlap<'a, B> {
    pub fn contact(&self) -> &TileContact {
        match self {
            Overlap::TileFirst(contact, _) | Overlap::ObjectFirst(_, contact) => contact,
        }
    }

    pub fn object(&mut self) -> &mut B {
        match self {
            Overlap::TileFirst(_, object) | Overlap::ObjectFirst(object, _) => object,
        }
    }
}

/// Injected per-cell overlap test.  Returns whether the pair counts as overlapping.
pub type OverlapFn<'f, B> = dyn FnMut(Overlap<'_, B>) -> bool + 'f;

impl<K: Copy + 'static> Tilemap<K> {
    /// Test `object` against every colliding tile its bounds could touch.
    ///
    /// `position` places the map somewhere other than its own origin for this
    /// query.  Without `callback` a tile counts when its rectangle strictly
    /// overlaps the object; with one, the callback decides and `flip` picks
    /// the argument order.  Tile-type callbacks fire for every counted tile,
    /// and for non-colliding trigger tiles in range regardless of geometry.
    ///
    /// Returns `true` if any colliding tile counted.
    pub fn overlaps_with_callback<B: Body<Kind = K>>(
        &self,
        object: &mut B,
        position: Option<Vec2>,
        mut callback: Option<&mut OverlapFn<'_, B>>,
        flip: bool,
    ) -> bool {
        let origin = position.unwrap_or(self.position());
        let moved = origin - self.last_position();
        let tile_w = self.tile_width() as f32;
        let tile_h = self.tile_height() as f32;
        let width = self.width_in_tiles() as i64;
        let height = self.height_in_tiles() as i64;

        let bounds = object.bounds();
        let first_col = ((bounds.x - origin.x) / tile_w).floor() as i64;
        let first_row = ((bounds.y - origin.y) / tile_h).floor() as i64;
        let end_col = (first_col + (bounds.width / tile_w).ceil() as i64 + 1).min(width);
        let end_row = (first_row + (bounds.height / tile_h).ceil() as i64 + 1).min(height);

        let mut results = false;
        for row in first_row.max(0)..end_row {
            for col in first_col.max(0)..end_col {
                let map_index = (row * width + col) as usize;
                let tile_id = self.tile_by_index(map_index);
                let tile = &self.tile_types()[tile_id];

                let corner = origin + Vec2::new(col as f32 * tile_w, row as f32 * tile_h) + tile.offset;
                let contact = TileContact {
                    tile_id,
                    map_index,
                    rect: Rect::from_min_size(corner, Vec2::new(tile_w, tile_h)),
                    last: corner - moved,
                    allow_collisions: tile.allow_collisions,
                };

                if !tile.allow_collisions.is_solid() {
                    if tile.triggers_for(object.kind()) {
                        tile.fire(&contact, &*object);
                    }
                    continue;
                }

                let found = match callback.as_deref_mut() {
                    Some(cb) if flip => cb(Overlap::ObjectFirst(&mut *object, &contact)),
                    Some(cb) => cb(Overlap::TileFirst(&contact, &mut *object)),
                    None => object.bounds().overlaps(&contact.rect),
                };
                if found {
                    if tile.triggers_for(object.kind()) {
                        tile.fire(&contact, &*object);
                    }
                    results = true;
                }
            }
        }
        results
    }

    /// Plain overlap test at the map's own position.
    pub fn overlaps<B: Body<Kind = K>>(&self, object: &mut B) -> bool {
        self.overlaps_with_callback(object, None, None, false)
    }

    /// Overlap test as if the map sat at `position`.
    pub fn overlaps_at<B: Body<Kind = K>>(&self, position: Vec2, object: &mut B) -> bool {
        self.overlaps_with_callback(object, Some(position), None, false)
    }

    /// Test every object in a group.  All objects are tested (so tile
    /// callbacks fire for each) even after the first hit.
    pub fn overlaps_any<B: Body<Kind = K>>(&self, objects: &mut [B]) -> bool {
        objects
            .iter_mut()
            .fold(false, |hit, object| self.overlaps(object) | hit)
    }

    /// True if the cell under world point `point` collides.  Points off the
    /// map never do.
    pub fn overlaps_point(&self, point: Vec2) -> bool {
        self.index_at(point).is_some_and(|i| self.cell_collides(i))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::LoadOptions;
    use crate::sheet::TileSheet;

    fn map() -> Tilemap {
        let options = LoadOptions::default().with_tile_size(8, 8);
        Tilemap::load("0,0,0\n0,1,0\n0,0,0", TileSheet::new(16, 8), &options).unwrap()
    }

    #[test]
    fn aabb_overlap_without_callback() {
        let map = map();
        assert!(map.overlaps(&mut Rect::new(6.0, 6.0, 4.0, 4.0)));
        assert!(!map.overlaps(&mut Rect::new(0.0, 0.0, 8.0, 8.0)));
        assert!(!map.overlaps(&mut Rect::new(-30.0, -30.0, 4.0, 4.0)));
    }

    #[test]
    fn overlaps_at_shifts_the_map() {
        let map = map();
        let mut object = Rect::new(6.0, 6.0, 4.0, 4.0);
        assert!(!map.overlaps_at(Vec2::new(100.0, 100.0), &mut object));
        assert!(map.overlaps_at(Vec2::new(-2.0, -2.0), &mut Rect::new(6.0, 6.0, 1.0, 1.0)));
    }

    #[test]
    fn callback_decides_and_flip_swaps_order() {
        let map = map();
        let mut seen = Vec::new();
        let mut cb = |overlap: Overlap<'_, Rect>| {
            seen.push((matches!(overlap, Overlap::ObjectFirst(..)), overlap.contact().map_index));
            true
        };
        // The object sits entirely inside the top-left cell, yet the callback says yes.
        let hit = map.overlaps_with_callback(&mut Rect::new(0.0, 0.0, 2.0, 2.0), None, Some(&mut cb), true);
        assert!(hit);
        assert_eq!(seen, vec![(true, 4)]);
    }

    #[test]
    fn contact_tracks_map_movement() {
        let mut map = map();
        map.set_position(Vec2::new(3.0, 0.0));
        let mut delta = None;
        let mut cb = |overlap: Overlap<'_, Rect>| {
            delta = Some(overlap.contact().delta());
            false
        };
        map.overlaps_with_callback(&mut Rect::new(11.0, 8.0, 2.0, 2.0), None, Some(&mut cb), false);
        assert_eq!(delta, Some(Vec2::new(3.0, 0.0)));
    }

    #[test]
    fn post_update_clears_movement() {
        let mut map = map();
        map.set_position(Vec2::new(3.0, 0.0));
        map.post_update();
        assert_eq!(map.last_position(), Vec2::new(3.0, 0.0));

        let mut delta = None;
        let mut cb = |overlap: Overlap<'_, Rect>| {
            delta = Some(overlap.contact().delta());
            false
        };
        map.overlaps_with_callback(&mut Rect::new(11.0, 8.0, 2.0, 2.0), None, Some(&mut cb), false);
        assert_eq!(delta, Some(Vec2::ZERO));
    }

    #[test]
    fn overlaps_point_off_map_is_false() {
        let map = map();
        assert!(map.overlaps_point(Vec2::new(12.0, 12.0)));
        assert!(!map.overlaps_point(Vec2::new(2.0, 2.0)));
        assert!(!map.overlaps_point(Vec2::new(-1.0, 12.0)));
        assert!(!map.overlaps_point(Vec2::new(24.0, 12.0)));
    }

    #[test]
    fn overlaps_point_nan_is_off_map() {
        // Cell 0 is solid, so a NaN that landed there would report a hit.
        let options = LoadOptions::default().with_tile_size(8, 8);
        let map: Tilemap = Tilemap::load("1,0
0,0", TileSheet::new(16, 8), &options).unwrap();
        assert!(map.overlaps_point(Vec2::new(4.0, 4.0)));
        assert!(!map.overlaps_point(Vec2::NAN));
        assert!(!map.overlaps_point(Vec2::new(f32::NAN, 4.0)));
        assert!(!map.overlaps_point(Vec2::new(4.0, f32::NAN)));
    }
}
