use serde::{Deserialize, Serialize};

// =============================================================================
// BINARY AUTO-TILING
// =============================================================================
///
/// Rewrites raw "placed / empty" level data into one of 16 wall pieces based on
/// which orthogonal neighbours are filled.
///
/// Bit layout of the adjacency code (before the final `+ 1`):
/// ```text
///   UP = 1   RIGHT = 2   DOWN = 4   LEFT = 8
/// ```
/// The map edge counts as filled.  `0` is reserved for blank cells, so the
/// stored value is always `code + 1` (1..=16).
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AutoTileMode {
    /// No auto-tiling: level data is used as-is.
    #[default]
    Off,
    /// Good for levels with thin walls that don't need interior corner art.
    Auto,
    /// Better for thick walls: fully enclosed cells pick an interior-corner
    /// piece based on which diagonal is open.
    Alt,
}

const UP: u32 = 1;
const RIGHT: u32 = 2;
const DOWN: u32 = 4;
const LEFT: u32 = 8;
const ENCLOSED: u32 = UP | RIGHT | DOWN | LEFT;

/// Recompute the auto-tile value of `cells[index]` in place.
///
/// Blank cells (`0`) are left untouched.  Neighbours are read straight from
/// `cells`, so when a whole map is processed in ascending index order the
/// cells above and to the left have already been rewritten while the cells
/// below and to the right still hold raw data.  Rewritten cells are always
/// non-zero, so this only matters for the raw/blank distinction, and existing
/// levels depend on the exact output: keep the scan order.
///
/// In [`AutoTileMode::Alt`] a fully enclosed cell is replaced by an interior
/// corner piece.  The diagonals are checked bottom-left, top-left, top-right,
/// bottom-right and each open one overwrites the previous choice, so the last
/// open diagonal in that order wins.
pub fn apply(cells: &mut [u32], width: usize, mode: AutoTileMode, index: usize) {
    if mode == AutoTileMode::Off || cells[index] == 0 {
        return;
    }

    let total = cells.len();
    let column = index % width;
    let has_up = index >= width;
    let has_down = index + width < total;
    let has_left = column > 0;
    let has_right = column + 1 < width;

    let mut code = 0;
    if !has_up || cells[index - width] > 0 {
        code |= UP;
    }
    if !has_right || cells[index + 1] > 0 {
        code |= RIGHT;
    }
    if !has_down || cells[index + width] > 0 {
        code |= DOWN;
    }
    if !has_left || cells[index - 1] > 0 {
        code |= LEFT;
    }

    if mode == AutoTileMode::Alt && code == ENCLOSED {
        if has_left && has_down && cells[index + width - 1] == 0 {
            code = 1; // bottom-left open
        }
        if has_left && has_up && cells[index - width - 1] == 0 {
            code = 2; // top-left open
        }
        if has_right && has_up && cells[index - width + 1] == 0 {
            code = 4; // top-right open
        }
        if has_right && has_down && cells[index + width + 1] == 0 {
            code = 8; // bottom-right open
        }
    }

    cells[index] = code + 1;
}

/// Auto-tile every cell in ascending (row-major) order.
pub fn apply_all(cells: &mut [u32], width: usize, mode: AutoTileMode) {
    for index in 0..cells.len() {
        apply(cells, width, mode, index);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid(rows: &[[u32; 3]; 3]) -> Vec<u32> {
        rows.iter().flatten().copied().collect()
    }

    #[test]
    fn blank_cell_is_untouched() {
        let mut cells = grid(&[[1, 1, 1], [1, 0, 1], [1, 1, 1]]);
        apply(&mut cells, 3, AutoTileMode::Auto, 4);
        assert_eq!(cells[4], 0);
    }

    #[test]
    fn isolated_cell_gets_code_zero() {
        let mut cells = grid(&[[0, 0, 0], [0, 1, 0], [0, 0, 0]]);
        apply(&mut cells, 3, AutoTileMode::Auto, 4);
        assert_eq!(cells[4], 1);
    }

    #[test]
    fn edges_count_as_filled() {
        // Top-left corner with nothing around it: UP and LEFT come from the edge.
        let mut cells = grid(&[[1, 0, 0], [0, 0, 0], [0, 0, 0]]);
        apply(&mut cells, 3, AutoTileMode::Auto, 0);
        assert_eq!(cells[0], (UP | LEFT) + 1);
    }

    #[test]
    fn enclosed_cell_auto_mode() {
        let mut cells = grid(&[[0, 1, 0], [1, 1, 1], [0, 1, 0]]);
        apply(&mut cells, 3, AutoTileMode::Auto, 4);
        assert_eq!(cells[4], 16);
    }

    #[test]
    fn alt_mode_last_open_diagonal_wins() {
        // Every diagonal is open: bottom-right is checked last.
        let mut cells = grid(&[[0, 1, 0], [1, 1, 1], [0, 1, 0]]);
        apply(&mut cells, 3, AutoTileMode::Alt, 4);
        assert_eq!(cells[4], 9);

        // Only top-left and top-right open: top-right wins.
        let mut cells = grid(&[[0, 1, 0], [1, 1, 1], [1, 1, 1]]);
        apply(&mut cells, 3, AutoTileMode::Alt, 4);
        assert_eq!(cells[4], 5);
    }

    #[test]
    fn alt_mode_single_open_diagonal() {
        let cases = [
            ([[1, 1, 1], [1, 1, 1], [0, 1, 1]], 2), // bottom-left
            ([[0, 1, 1], [1, 1, 1], [1, 1, 1]], 3), // top-left
            ([[1, 1, 0], [1, 1, 1], [1, 1, 1]], 5), // top-right
            ([[1, 1, 1], [1, 1, 1], [1, 1, 0]], 9), // bottom-right
        ];
        for (rows, expected) in cases {
            let mut cells = grid(&rows);
            apply(&mut cells, 3, AutoTileMode::Alt, 4);
            assert_eq!(cells[4], expected, "{rows:?}");
        }
    }

    #[test]
    fn alt_mode_no_open_diagonal_keeps_enclosed_piece() {
        let mut cells = vec![1; 9];
        apply(&mut cells, 3, AutoTileMode::Alt, 4);
        assert_eq!(cells[4], 16);
    }

    #[test]
    fn off_mode_is_a_no_op() {
        let mut cells = grid(&[[0, 0, 0], [0, 7, 0], [0, 0, 0]]);
        apply(&mut cells, 3, AutoTileMode::Off, 4);
        assert_eq!(cells[4], 7);
    }

    #[test]
    fn single_column_map() {
        let mut cells = vec![1, 1, 1];
        apply_all(&mut cells, 1, AutoTileMode::Auto);
        assert_eq!(cells, vec![16, 16, 16]);
    }
}
