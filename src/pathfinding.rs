use glam::Vec2;

use crate::config::PathOptions;
use crate::geometry::{NEIGHBOR_ORDER, is_diagonal};
use crate::tilemap::Tilemap;

/// Distance-field marker for a colliding cell.
pub const WALL: i32 = -2;
/// Distance-field marker for an open cell the flood has not reached.
pub const UNVISITED: i32 = -1;

// =============================================================================
// GRID PATHFINDING
// =============================================================================
///
/// Breadth-first flood from the start cell, then a greedy walk back down the
/// distance field from the end cell.  Every step (orthogonal or diagonal)
/// costs one.  There is no heuristic and no iteration cap; the flood stops as
/// soon as the end cell is reached.
impl<K: Copy + 'static> Tilemap<K> {
    /// Shortest walkable route between two world points.
    ///
    /// Returns `None` if either point is off the map, sits in a colliding
    /// tile, or the end cannot be reached.  The first waypoint is exactly
    /// `start`, the last exactly `end`; the ones between are tile centres.
    pub fn find_path(&self, start: Vec2, end: Vec2, options: PathOptions) -> Option<Vec<Vec2>> {
        let start_index = self.index_at(start)?;
        let end_index = self.index_at(end)?;
        if self.cell_collides(start_index) || self.cell_collides(end_index) {
            return None;
        }

        let distances = self.compute_path_distance(start_index, end_index, options.wide_diagonal)?;

        // Collected end-first.
        let mut points: Vec<Option<Vec2>> = self
            .walk_path(&distances, end_index)
            .into_iter()
            .map(Some)
            .collect();
        if let Some(first) = points.last_mut() {
            *first = Some(start);
        }
        if let Some(last) = points.first_mut() {
            *last = Some(end);
        }

        if options.simplify {
            simplify_path(&mut points);
        }
        if options.ray_simplify {
            self.ray_simplify_path(&mut points);
        }

        let path: Vec<Vec2> = points.into_iter().rev().flatten().collect();
        log::trace!("path {start} -> {end}: {} waypoints", path.len());
        Some(path)
    }

    /// Flood the map from `start_index` and return each cell's step count.
    ///
    /// Colliding cells hold [`WALL`], cells the flood never reached hold
    /// [`UNVISITED`].  With `wide_diagonal` a diagonal step is only taken
    /// when neither flanking orthogonal cell is a wall.  Returns `None` if
    /// `end_index` is unreachable.
    pub fn compute_path_distance(
        &self,
        start_index: usize,
        end_index: usize,
        wide_diagonal: bool,
    ) -> Option<Vec<i32>> {
        let mut distances: Vec<i32> = (0..self.total_tiles())
            .map(|i| if self.cell_collides(i) { WALL } else { UNVISITED })
            .collect();
        distances[start_index] = 0;

        let mut frontier = vec![start_index];
        let mut distance = 1;
        while !frontier.is_empty() {
            let mut next = Vec::new();
            for &current in &frontier {
                if current == end_index {
                    return Some(distances);
                }

                for offset in NEIGHBOR_ORDER {
                    let Some(index) = self.neighbor_index(current, offset) else {
                        continue;
                    };
                    if distances[index] != UNVISITED {
                        continue;
                    }
                    if wide_diagonal && is_diagonal(offset) {
                        let flank_open = |flank| {
                            self.neighbor_index(current, flank)
                                .is_some_and(|i| distances[i] >= UNVISITED)
                        };
                        if !flank_open((offset.0, 0)) || !flank_open((0, offset.1)) {
                            continue;
                        }
                    }
                    distances[index] = distance;
                    next.push(index);
                }
            }
            frontier = next;
            distance += 1;
        }

        None
    }

    /// Walk downhill from `from` to the flood origin, taking the first
    /// neighbour (in [`NEIGHBOR_ORDER`]) with a smaller non-negative distance.
    /// Yields tile centres, `from` first.
    fn walk_path(&self, distances: &[i32], from: usize) -> Vec<Vec2> {
        let mut points = vec![self.cell_center(from)];
        let mut current = from;
        while distances[current] != 0 {
            let here = distances[current];
            let step = NEIGHBOR_ORDER.iter().find_map(|&offset| {
                self.neighbor_index(current, offset)
                    .filter(|&i| distances[i] >= 0 && distances[i] < here)
            });
            match step {
                Some(index) => {
                    current = index;
                    points.push(self.cell_center(current));
                }
                None => break,
            }
        }
        points
    }

    /// Drop waypoints a straight ray can skip.
    ///
    /// Casts from the current anchor to each remaining waypoint in turn.
    /// While the ray is clear the previous waypoint is removed; when it is
    /// blocked the previous waypoint becomes the new anchor.
    pub fn ray_simplify_path(&self, points: &mut [Option<Vec2>]) {
        let Some(mut source) = points.first().copied().flatten() else {
            return;
        };
        let mut last_index: Option<usize> = None;
        for i in 1..points.len() {
            let Some(node) = points[i] else {
                continue;
            };
            if self.ray(source, node, 1.0).is_clear() {
                if let Some(last) = last_index {
                    points[last] = None;
                }
            } else if let Some(anchor) = last_index.and_then(|last| points[last]) {
                source = anchor;
            }
            last_index = Some(i);
        }
    }
}

/// Drop interior waypoints that continue in the same direction.
///
/// A waypoint goes when the kept waypoint before it and the waypoint after it
/// share an x or a y coordinate, or when the slopes on both sides match.
/// The first and last waypoints are never removed.
pub fn simplify_path(points: &mut [Option<Vec2>]) {
    if points.len() < 3 {
        return;
    }
    let Some(mut last) = points[0] else {
        return;
    };
    for i in 1..points.len() - 1 {
        let (Some(node), Some(next)) = (points[i], points[i + 1]) else {
            continue;
        };
        let slope_before = (node.x - last.x) / (node.y - last.y);
        let slope_after = (node.x - next.x) / (node.y - next.y);
        if last.x == next.x || last.y == next.y || slope_before == slope_after {
            points[i] = None;
        } else {
            last = node;
        }
    }
}
