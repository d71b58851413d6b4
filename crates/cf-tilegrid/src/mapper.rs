//! Mapping from world rectangles to cell index ranges.
//!
//! Along each axis a rectangle covers `ceil((max - min) / cell_size)` cells,
//! starting at the cell that contains `min`:
//!
//! ```text
//! start = (min - min % cell_size) / cell_size
//! end   = start + ceil((max - min) / cell_size)      (exclusive)
//! ```
//!
//! Coordinates are first clamped to `[0, (cells - 1) * cell_size]` on each
//! axis. The far bound is the minimum corner of the last cell, so rectangle
//! queries never reach the last column or row; those cells are only
//! addressable by index. Out-of-range input is corrected rather than rejected,
//! and the correction is reported through [`CellRange::clamped`]. A rectangle
//! with `max < min` on either axis maps to an empty range.
//!
//! # Example
//!
//! ```
//! use std::num::NonZeroU32;
//! use cf_tilegrid::{map_rect, Rect, TileCoord};
//!
//! let cell_size = NonZeroU32::new(8).unwrap();
//! let range = map_rect(&Rect::new(16, 16, 24, 24), cell_size, 8, 8);
//!
//! assert_eq!(range.len(), 1);
//! assert_eq!(range.start, TileCoord::new(2, 2));
//! assert!(!range.clamped);
//! ```

use std::num::NonZeroU32;

use crate::rect::Rect;
use crate::tile::TileCoord;

/// An inclusive-start, exclusive-end range of cell indices.
///
/// Iterates in row-major order with x as the outer loop:
/// `(x0, y0), (x0, y1), ..., (x1, y0), ...`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct CellRange {
    /// First cell index (inclusive).
    pub start: TileCoord,
    /// One past the last cell index on each axis.
    pub end: TileCoord,
    /// Whether any input coordinate was clamped into the grid.
    pub clamped: bool,
    /// Whether the input rectangle had `max < min` on an axis.
    pub degenerate: bool,
}

impl CellRange {
    /// Creates a range from `start` (inclusive) to `end` (exclusive).
    #[must_use]
    pub const fn new(start: TileCoord, end: TileCoord) -> Self {
        Self {
            start,
            end,
            clamped: false,
            degenerate: false,
        }
    }

    /// Number of columns covered.
    #[must_use]
    pub const fn columns(&self) -> usize {
        self.end.x.saturating_sub(self.start.x)
    }

    /// Number of rows covered.
    #[must_use]
    pub const fn rows(&self) -> usize {
        self.end.y.saturating_sub(self.start.y)
    }

    /// Total number of cells covered.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.columns().saturating_mul(self.rows())
    }

    /// Returns `true` if no cell is covered.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.columns() == 0 || self.rows() == 0
    }

    /// Returns `true` if `coord` lies in the range.
    #[must_use]
    pub const fn contains(&self, coord: TileCoord) -> bool {
        coord.x >= self.start.x
            && coord.x < self.end.x
            && coord.y >= self.start.y
            && coord.y < self.end.y
    }

    /// Returns an iterator over the covered cell indices.
    #[must_use]
    pub const fn iter(&self) -> CellRangeIter {
        CellRangeIter {
            range: *self,
            current: if self.is_empty() {
                None
            } else {
                Some(self.start)
            },
        }
    }
}

impl IntoIterator for CellRange {
    type Item = TileCoord;
    type IntoIter = CellRangeIter;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl IntoIterator for &CellRange {
    type Item = TileCoord;
    type IntoIter = CellRangeIter;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Iterator over the cell indices of a [`CellRange`].
#[derive(Debug, Clone)]
pub struct CellRangeIter {
    range: CellRange,
    current: Option<TileCoord>,
}

impl Iterator for CellRangeIter {
    type Item = TileCoord;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.current?;

        let mut next = current;
        next.y += 1;
        if next.y >= self.range.end.y {
            next.y = self.range.start.y;
            next.x += 1;
            if next.x >= self.range.end.x {
                self.current = None;
                return Some(current);
            }
        }
        self.current = Some(next);

        Some(current)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.current.map_or(0, |current| {
            let rows = self.range.rows();
            let columns_after = self.range.end.x - current.x - 1;
            (self.range.end.y - current.y) + columns_after * rows
        });
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for CellRangeIter {}

/// Maps a world rectangle onto the cells of a `columns x rows` grid.
///
/// Each axis is clamped to `[0, (cells - 1) * cell_size]` before mapping.
#[must_use]
pub fn map_rect(rect: &Rect, cell_size: NonZeroU32, columns: usize, rows: usize) -> CellRange {
    if rect.is_degenerate() {
        return CellRange {
            degenerate: true,
            ..CellRange::default()
        };
    }

    let cell_size = i64::from(cell_size.get());
    let x = map_axis(rect.min.x, rect.max.x, cell_size, columns);
    let y = map_axis(rect.min.y, rect.max.y, cell_size, rows);

    CellRange {
        start: TileCoord::new(x.start, y.start),
        end: TileCoord::new(x.end, y.end),
        clamped: x.clamped || y.clamped,
        degenerate: false,
    }
}

struct AxisSpan {
    start: usize,
    end: usize,
    clamped: bool,
}

fn map_axis(min: i32, max: i32, cell_size: i64, cells: usize) -> AxisSpan {
    let extent = i64::try_from(cells.saturating_sub(1))
        .unwrap_or(i64::MAX)
        .saturating_mul(cell_size);
    let (min, max) = (i64::from(min), i64::from(max));
    let lo = min.clamp(0, extent);
    let hi = max.clamp(0, extent);

    let span = hi - lo;
    let count = if span % cell_size == 0 {
        span / cell_size
    } else {
        (span + cell_size) / cell_size
    };
    let start = (lo - lo % cell_size) / cell_size;

    // lo and hi are non-negative and bounded by the extent, so both ends fit
    let start = usize::try_from(start).unwrap_or(cells);
    let end = usize::try_from(count)
        .map_or(cells, |count| start.saturating_add(count))
        .min(cells);

    AxisSpan {
        start: start.min(end),
        end,
        clamped: lo != min || hi != max,
    }
}
