//! Property-based tests for rectangle mapping, claims, and sweeps.
//!
//! Run with: cargo test -p cf-tilegrid -- proptest

#![allow(clippy::unwrap_used)]
#![allow(clippy::cast_possible_wrap)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]

use std::collections::HashSet;

use cf_tilegrid::{
    GridConfig, LineTraversal, Point2, Rect, TileCoord, TileGrid, WILDCARD_ID, collision_array,
    overlap,
};
use proptest::prelude::*;

/// Cells per axis in generated grids.
const CELLS: u32 = 32;

// =============================================================================
// Strategies
// =============================================================================

/// Generate a cell size.
fn arb_cell_size() -> impl Strategy<Value = u32> {
    1..=16u32
}

/// Build a square grid of `CELLS x CELLS` cells.
fn grid_with(cell_size: u32) -> TileGrid {
    TileGrid::new(GridConfig::new(CELLS * cell_size, CELLS * cell_size).with_cell_size(cell_size))
        .unwrap()
}

/// Generate a rectangle that may reach outside a 256x256 area or be degenerate.
fn arb_any_rect() -> impl Strategy<Value = Rect> {
    (-300..600i32, -300..600i32, -300..600i32, -300..600i32)
        .prop_map(|(a, b, c, d)| Rect::new(a, b, c, d))
}

/// Generate a non-empty rectangle inside the queryable part of a 256x256 grid
/// with 8-unit cells, which ends at the last cell's origin.
fn arb_inner_rect() -> impl Strategy<Value = Rect> {
    (0..247i32, 0..247i32).prop_flat_map(|(x, y)| {
        (x + 1..=248, y + 1..=248).prop_map(move |(max_x, max_y)| Rect::new(x, y, max_x, max_y))
    })
}

/// Generate a rectangle strictly inside cell `(cx, cy)` with its cell size.
///
/// The last column and row are left out since rectangles never reach them.
fn arb_rect_in_cell() -> impl Strategy<Value = (u32, TileCoord, Rect)> {
    (arb_cell_size(), 0..CELLS - 1, 0..CELLS - 1).prop_flat_map(|(cs, cx, cy)| {
        (0..cs, 0..cs).prop_flat_map(move |(ax, ay)| {
            (ax + 1..=cs, ay + 1..=cs).prop_map(move |(bx, by)| {
                let (ox, oy) = (cx * cs, cy * cs);
                let rect = Rect::new(
                    (ox + ax) as i32,
                    (oy + ay) as i32,
                    (ox + bx) as i32,
                    (oy + by) as i32,
                );
                (cs, TileCoord::new(cx as usize, cy as usize), rect)
            })
        })
    })
}

// =============================================================================
// Property Tests: Mapping
// =============================================================================

proptest! {
    /// A rectangle inside one cell touches exactly that cell.
    #[test]
    fn proptest_rect_in_one_cell((cs, coord, rect) in arb_rect_in_cell()) {
        let mut grid = grid_with(cs);
        let cells = collision_array(&grid, &rect, false);

        prop_assert_eq!(cells.len(), 1);
        prop_assert_eq!(cells[0].coord(), coord);

        grid.claim(&rect, "probe", 1);
        prop_assert!(overlap(&mut grid, &rect, Some("probe"), false));
        prop_assert_eq!(grid.occupied_count(), 1);
    }

    /// Spans that are an exact multiple of the cell size are not rounded up.
    #[test]
    fn proptest_exact_multiple_span(
        cs in arb_cell_size(),
        start in 0..CELLS / 2,
        offset in 0..16u32,
        n in 1..CELLS / 2,
    ) {
        let grid = grid_with(cs);
        let min = (start * cs + offset % cs) as i32;
        let max = min + (n * cs) as i32;

        let range = grid.map_rect(&Rect::new(min, 0, max, cs as i32));
        prop_assert!(!range.clamped);
        prop_assert_eq!(range.columns(), n as usize);
        prop_assert_eq!(range.start.x, start as usize);
    }

    /// Other spans cover `ceil(span / cell_size)` cells.
    #[test]
    fn proptest_partial_span_rounds_up(
        cs in 2..=16u32,
        start in 0..CELLS / 2,
        offset in 0..16u32,
        n in 0..CELLS / 2 - 1,
        remainder in 1..16u32,
    ) {
        let grid = grid_with(cs);
        let min = (start * cs + offset % cs) as i32;
        let span = n * cs + 1 + remainder % (cs - 1);
        let max = min + span as i32;

        let range = grid.map_rect(&Rect::new(0, min, cs as i32, max));
        prop_assert!(!range.clamped);
        prop_assert_eq!(range.rows(), span.div_ceil(cs) as usize);
    }

    /// Any rectangle maps to indices inside the grid, short of the last
    /// column and row.
    #[test]
    fn proptest_mapping_stays_in_bounds(cs in arb_cell_size(), rect in arb_any_rect()) {
        let grid = grid_with(cs);
        let range = grid.map_rect(&rect);

        prop_assert!(range.end.x <= grid.columns());
        prop_assert!(range.end.y <= grid.rows());
        if !range.is_empty() {
            prop_assert!(range.end.x < grid.columns());
            prop_assert!(range.end.y < grid.rows());
        }
        prop_assert_eq!(range.iter().len(), range.len());
        prop_assert_eq!(range.iter().count(), range.len());
        for coord in range {
            prop_assert!(grid.cell(coord).is_some());
        }
        if rect.is_degenerate() {
            prop_assert!(range.is_empty());
        }
    }

    /// Cells come out in row-major order without repeats.
    #[test]
    fn proptest_mapping_order(rect in arb_inner_rect()) {
        let grid = grid_with(8);
        let coords: Vec<_> = grid.map_rect(&rect).into_iter().collect();

        let mut sorted = coords.clone();
        sorted.sort();
        sorted.dedup();
        prop_assert_eq!(coords, sorted);
    }
}

// =============================================================================
// Property Tests: Claims
// =============================================================================

proptest! {
    /// Claim then release leaves only the other claims visible.
    #[test]
    fn proptest_claim_release_round_trip(rect in arb_inner_rect(), other in arb_inner_rect()) {
        let mut grid = grid_with(8);
        let mut reference = grid_with(8);
        grid.claim(&other, "b", 1);
        reference.claim(&other, "b", 1);

        grid.claim(&rect, "a", 1);
        grid.release(&rect, "a", 1);

        prop_assert!(!overlap(&mut grid, &rect, Some("a"), false));
        prop_assert_eq!(
            overlap(&mut grid, &rect, None, false),
            overlap(&mut reference, &rect, None, false)
        );
        prop_assert_eq!(grid.occupied_count(), reference.occupied_count());
    }

    /// Wildcard release removes every id of the label and nothing else.
    #[test]
    fn proptest_wildcard_release(rect in arb_inner_rect()) {
        let mut grid = grid_with(8);
        grid.claim(&rect, "a", 1);
        grid.claim(&rect, "a", 2);
        let b_cells = grid.claim(&rect, "b", 3).len();

        let removed = grid.release(&rect, "a", WILDCARD_ID);

        prop_assert_eq!(removed, 2 * b_cells);
        prop_assert!(!overlap(&mut grid, &rect, Some("a"), false));
        prop_assert!(overlap(&mut grid, &rect, Some("b"), false));
        prop_assert_eq!(grid.occupied_count(), b_cells);
    }

    /// Handle release touches exactly the claimed cells.
    #[test]
    fn proptest_handle_release_is_exact(rect in arb_inner_rect(), other in arb_inner_rect()) {
        let mut grid = grid_with(8);
        let handles = grid.claim(&rect, "a", 1);
        let others = grid.claim(&other, "a", 1);

        let claimed: HashSet<_> = handles.iter().map(|r| r.coord).collect();
        let shared = others.iter().filter(|r| claimed.contains(&r.coord)).count();

        let removed = grid.release_handles(&handles, "a", 1).unwrap();
        prop_assert_eq!(removed, handles.len() + shared);

        let expected: HashSet<_> = others
            .iter()
            .map(|r| r.coord)
            .filter(|coord| !claimed.contains(coord))
            .collect();
        let remaining: HashSet<_> = grid.occupied_cells().map(|c| c.coord()).collect();
        prop_assert_eq!(remaining, expected);
    }
}

// =============================================================================
// Property Tests: Line Traversal
// =============================================================================

proptest! {
    /// A line visits both endpoints through 8-connected steps.
    #[test]
    fn proptest_line_is_connected(x0 in -50..50i32, y0 in -50..50i32, x1 in -50..50i32, y1 in -50..50i32) {
        let (start, end) = (Point2::new(x0, y0), Point2::new(x1, y1));
        let points: Vec<_> = LineTraversal::new(start, end).collect();

        let expected_len = (x1 - x0).abs().max((y1 - y0).abs()) as usize + 1;
        prop_assert_eq!(points.len(), expected_len);
        prop_assert!(points.contains(&start));
        prop_assert!(points.contains(&end));

        for pair in points.windows(2) {
            prop_assert!((pair[1].x - pair[0].x).abs() <= 1);
            prop_assert!((pair[1].y - pair[0].y).abs() <= 1);
        }
    }
}
