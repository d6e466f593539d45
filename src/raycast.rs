use glam::Vec2;

use crate::tilemap::Tilemap;

/// Outcome of a line-of-sight test.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum RayResult {
    /// Nothing solid between the two points.
    Clear,
    /// A solid tile was sampled.  `point` is where the ray crosses into it,
    /// or `None` when the crossing could not be resolved from the last step.
    Blocked { point: Option<Vec2> },
}

impl RayResult {
    pub fn is_clear(&self) -> bool {
        matches!(self, RayResult::Clear)
    }

    pub fn hit_point(&self) -> Option<Vec2> {
        match self {
            RayResult::Clear => None,
            RayResult::Blocked { point } => *point,
        }
    }
}

impl<K: Copy + 'static> Tilemap<K> {
    /// March from `start` towards `end` in world space, sampling at
    /// `min(tile_width, tile_height) / resolution` pixel intervals.
    ///
    /// Samples outside the map are ignored.  The last sample is one step
    /// short of `end`.  A `resolution` of zero or less means `1`.
    pub fn ray(&self, start: Vec2, end: Vec2, resolution: f32) -> RayResult {
        let resolution = if resolution > 0.0 { resolution } else { 1.0 };
        let tile_w = self.tile_width() as f32;
        let tile_h = self.tile_height() as f32;
        let step = tile_w.min(tile_h) / resolution;

        let delta = end - start;
        let steps = (delta.length() / step).ceil() as usize;
        if steps == 0 {
            return RayResult::Clear;
        }
        let step_v = delta / steps as f32;

        let origin = self.position();
        let mut current = start - step_v;
        for _ in 0..steps {
            current += step_v;
            let Some(index) = self.index_at(current) else {
                continue;
            };
            if !self.cell_collides(index) {
                continue;
            }

            let local = current - origin;
            let cell_min = Vec2::new(
                (local.x / tile_w).floor() * tile_w,
                (local.y / tile_h).floor() * tile_h,
            );
            let last = local - step_v;

            // Crossing of the vertical cell edge facing the ray.
            let qx = if delta.x < 0.0 { cell_min.x + tile_w } else { cell_min.x };
            let ry = last.y + step_v.y * ((qx - last.x) / step_v.x);
            if ry > cell_min.y && ry < cell_min.y + tile_h {
                return RayResult::Blocked { point: Some(origin + Vec2::new(qx, ry)) };
            }

            // Crossing of the horizontal edge.
            let qy = if delta.y < 0.0 { cell_min.y + tile_h } else { cell_min.y };
            let rx = last.x + step_v.x * ((qy - last.y) / step_v.y);
            if rx > cell_min.x && rx < cell_min.x + tile_w {
                return RayResult::Blocked { point: Some(origin + Vec2::new(rx, qy)) };
            }

            return RayResult::Blocked { point: None };
        }
        RayResult::Clear
    }

    /// The world point where a ray from `start` to `end` first enters a solid
    /// tile, if it does.
    pub fn ray_hit(&self, start: Vec2, end: Vec2, resolution: f32) -> Option<Vec2> {
        self.ray(start, end, resolution).hit_point()
    }
}
