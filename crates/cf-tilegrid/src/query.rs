//! Overlap queries over a tile grid.
//!
//! Every query maps its rectangle through [`TileGrid::map_rect`] and visits
//! the covered cells in row-major order (x outer, y inner). A cell *matches*
//! when it is occupied, or, with a label filter, when any of its claims carries
//! that label regardless of id.
//!
//! Only [`overlap`] writes the grid's last-collision cache; the remaining
//! queries leave it untouched.
//!
//! # Example
//!
//! ```
//! use cf_tilegrid::{TileGrid, Rect, overlap, last_collisions, collision_array};
//!
//! let mut grid = TileGrid::with_size(64, 64)?;
//! grid.claim(&Rect::new(16, 16, 24, 24), "player", 1);
//!
//! assert!(overlap(&mut grid, &Rect::new(0, 0, 32, 32), Some("player"), false));
//! assert_eq!(last_collisions(&grid).len(), 1);
//!
//! assert!(!overlap(&mut grid, &Rect::new(0, 0, 8, 8), None, false));
//! assert!(last_collisions(&grid).is_empty());
//!
//! assert_eq!(collision_array(&grid, &Rect::new(0, 0, 32, 32), false).len(), 16);
//! # Ok::<(), cf_tilegrid::TileError>(())
//! ```

use crate::grid::TileGrid;
use crate::mapper::CellRange;
use crate::rect::Rect;
use crate::tile::{Cell, TileCoord};

/// Outcome of a [`query`].
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct OverlapReport {
    /// Matching cells in visiting order.
    pub hits: Vec<TileCoord>,
    /// The range the rectangle mapped to, including clamp information.
    pub range: CellRange,
}

impl OverlapReport {
    /// Returns `true` if at least one cell matched.
    #[must_use]
    pub fn is_hit(&self) -> bool {
        !self.hits.is_empty()
    }
}

/// Iterates over every cell covered by `rect`.
pub fn query_cells<'a>(grid: &'a TileGrid, rect: &Rect) -> impl Iterator<Item = &'a Cell> {
    grid.map_rect(rect)
        .into_iter()
        .filter_map(move |coord| grid.cell(coord))
}

/// Finds the cells covered by `rect` that match `label`.
///
/// With `stop_at_first` the scan ends at the first match. The grid's
/// last-collision cache is not touched.
#[must_use]
pub fn query(grid: &TileGrid, rect: &Rect, label: Option<&str>, stop_at_first: bool) -> OverlapReport {
    let range = grid.map_rect(rect);
    let mut hits = Vec::new();

    for coord in range {
        if grid.cell(coord).is_some_and(|cell| cell.matches(label)) {
            hits.push(coord);
            if stop_at_first {
                break;
            }
        }
    }

    OverlapReport { hits, range }
}

/// Tests `rect` for matching cells and records them as the last collisions.
///
/// The cache is replaced on every call, never accumulated. Returns `true` if
/// any cell matched.
pub fn overlap(grid: &mut TileGrid, rect: &Rect, label: Option<&str>, stop_at_first: bool) -> bool {
    let report = query(grid, rect, label, stop_at_first);
    grid.last_collisions = report.hits;
    !grid.last_collisions.is_empty()
}

/// Returns the cells matched by the most recent [`overlap`] call.
///
/// The result is a snapshot in visiting order.
#[must_use]
pub fn last_collisions(grid: &TileGrid) -> Vec<&Cell> {
    grid.last_collisions
        .iter()
        .filter_map(|coord| grid.cell(*coord))
        .collect()
}

/// Returns the indices matched by the most recent [`overlap`] call.
#[must_use]
pub fn last_collision_coords(grid: &TileGrid) -> &[TileCoord] {
    &grid.last_collisions
}

/// Collects the cells covered by `rect`, optionally only the occupied ones.
#[must_use]
pub fn collision_array<'a>(grid: &'a TileGrid, rect: &Rect, only_occupied: bool) -> Vec<&'a Cell> {
    query_cells(grid, rect)
        .filter(|cell| !only_occupied || cell.is_occupied())
        .collect()
}

/// Checks whether any cell covered by `rect` matches `label`.
///
/// Short-circuits on the first match and leaves the cache untouched.
#[must_use]
pub fn any_claimed(grid: &TileGrid, rect: &Rect, label: Option<&str>) -> bool {
    query_cells(grid, rect).any(|cell| cell.matches(label))
}
