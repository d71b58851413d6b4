//! The tile grid and its cells.

use std::num::NonZeroU32;
use std::time::Instant;

use tracing::{debug, info};

use crate::config::GridConfig;
use crate::error::{TileError, TileResult};
use crate::mapper::{CellRange, map_rect};
use crate::rect::Rect;
use crate::tile::{Cell, TileCoord};

/// A reference to a cell that stays valid until the grid is re-initialised.
///
/// Resolve it with [`TileGrid::resolve`]. References taken before a call to
/// [`TileGrid::reinitialize`] are rejected with [`TileError::StaleHandle`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CellRef {
    /// Index of the referenced cell.
    pub coord: TileCoord,
    /// Grid generation the reference was issued in.
    pub generation: u64,
}

/// A fixed-size 2D occupancy grid.
///
/// The grid owns its cells, its cell size, and the cache of the most recent
/// overlap query. The cell size is fixed for the lifetime of the cell array;
/// changing it requires [`TileGrid::reinitialize`], which discards every
/// claim and invalidates all outstanding [`CellRef`]s.
///
/// # Example
///
/// ```
/// use cf_tilegrid::{GridConfig, Rect, TileCoord, TileGrid};
///
/// let grid = TileGrid::new(GridConfig::new(64, 48))?;
/// assert_eq!((grid.columns(), grid.rows()), (8, 6));
/// assert_eq!(grid.cell_rect(TileCoord::new(2, 1)), Rect::new(16, 8, 24, 16));
/// # Ok::<(), cf_tilegrid::TileError>(())
/// ```
#[derive(Debug, Clone)]
pub struct TileGrid {
    config: GridConfig,
    cell_size: NonZeroU32,
    columns: usize,
    rows: usize,
    /// Column-major: cell `(x, y)` lives at `x * rows + y`.
    cells: Vec<Cell>,
    generation: u64,
    pub(crate) last_collisions: Vec<TileCoord>,
}

impl TileGrid {
    /// Builds a grid from a configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the cell size is zero or the area holds no whole
    /// cell, see [`GridConfig::validate`].
    pub fn new(config: GridConfig) -> TileResult<Self> {
        let cell_size = config.validated_cell_size()?;
        let (columns, rows) = (config.columns(), config.rows());

        Ok(Self {
            config,
            cell_size,
            columns,
            rows,
            cells: build_cells(columns, rows),
            generation: 0,
            last_collisions: Vec::new(),
        })
    }

    /// Builds a grid over a `width x height` area with the default cell size.
    ///
    /// # Errors
    ///
    /// Returns [`TileError::InvalidDimensions`] if the area is smaller than
    /// one cell on either axis.
    pub fn with_size(width: u32, height: u32) -> TileResult<Self> {
        Self::new(GridConfig::new(width, height))
    }

    /// Rebuilds the cell array from a new configuration.
    ///
    /// All claims are dropped, the collision cache is cleared, and the
    /// generation advances so that existing [`CellRef`]s become stale. On
    /// error the grid is left untouched.
    ///
    /// # Errors
    ///
    /// Returns an error if `config` fails [`GridConfig::validate`].
    pub fn reinitialize(&mut self, config: GridConfig) -> TileResult<()> {
        let cell_size = config.validated_cell_size()?;
        let (columns, rows) = (config.columns(), config.rows());

        self.config = config;
        self.cell_size = cell_size;
        self.columns = columns;
        self.rows = rows;
        self.cells = build_cells(columns, rows);
        self.generation = self.generation.wrapping_add(1);
        self.last_collisions.clear();
        Ok(())
    }

    /// Drops every claim while keeping cells and outstanding references valid.
    pub fn clear(&mut self) {
        for cell in &mut self.cells {
            cell.clear();
        }
        self.last_collisions.clear();
    }

    /// Returns the configuration the grid was built from.
    #[must_use]
    pub const fn config(&self) -> &GridConfig {
        &self.config
    }

    /// Returns the cell size in world units.
    #[must_use]
    pub const fn cell_size(&self) -> u32 {
        self.cell_size.get()
    }

    /// Number of columns.
    #[must_use]
    pub const fn columns(&self) -> usize {
        self.columns
    }

    /// Number of rows.
    #[must_use]
    pub const fn rows(&self) -> usize {
        self.rows
    }

    /// Total number of cells.
    #[must_use]
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Always `false`; a valid grid has at least one cell.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Current generation, advanced by every [`reinitialize`](Self::reinitialize).
    #[must_use]
    pub const fn generation(&self) -> u64 {
        self.generation
    }

    /// Width and height of the far-edge strips not covered by any cell.
    #[must_use]
    pub const fn uncovered_extent(&self) -> (u32, u32) {
        let cell_size = self.cell_size.get();
        (self.config.width % cell_size, self.config.height % cell_size)
    }

    /// Returns the cell at `coord`, or `None` if it lies outside the grid.
    #[must_use]
    pub fn cell(&self, coord: TileCoord) -> Option<&Cell> {
        self.index(coord).map(|index| &self.cells[index])
    }

    pub(crate) fn cell_mut(&mut self, coord: TileCoord) -> Option<&mut Cell> {
        self.index(coord).map(|index| &mut self.cells[index])
    }

    /// Returns a reference to `coord` tagged with the current generation.
    ///
    /// # Errors
    ///
    /// Returns [`TileError::OutOfBounds`] if `coord` lies outside the grid.
    pub fn cell_ref(&self, coord: TileCoord) -> TileResult<CellRef> {
        self.index(coord)
            .map(|_| CellRef {
                coord,
                generation: self.generation,
            })
            .ok_or(TileError::OutOfBounds { coord })
    }

    /// Resolves a [`CellRef`] back into its cell.
    ///
    /// # Errors
    ///
    /// - [`TileError::StaleHandle`] if the reference predates the last
    ///   re-initialisation.
    /// - [`TileError::OutOfBounds`] if the index lies outside the grid.
    pub fn resolve(&self, cell_ref: CellRef) -> TileResult<&Cell> {
        self.check_generation(cell_ref.generation)?;
        self.cell(cell_ref.coord).ok_or(TileError::OutOfBounds {
            coord: cell_ref.coord,
        })
    }

    pub(crate) fn check_generation(&self, generation: u64) -> TileResult<()> {
        if generation == self.generation {
            Ok(())
        } else {
            debug!(
                handle = generation,
                current = self.generation,
                "rejecting stale cell reference"
            );
            Err(TileError::StaleHandle {
                handle: generation,
                current: self.generation,
            })
        }
    }

    /// Returns the world-space rectangle covered by the cell at `coord`.
    ///
    /// The position is always derived from the index, `index * cell_size`.
    #[must_use]
    pub fn cell_rect(&self, coord: TileCoord) -> Rect {
        let size = i64::from(self.cell_size.get());
        let world = |index: usize| {
            let offset = i64::try_from(index).map_or(i64::MAX, |i| i.saturating_mul(size));
            i32::try_from(offset).unwrap_or(i32::MAX)
        };
        Rect::new(
            world(coord.x),
            world(coord.y),
            world(coord.x.saturating_add(1)),
            world(coord.y.saturating_add(1)),
        )
    }

    /// Maps a world rectangle onto this grid's cells.
    ///
    /// Clamped and degenerate input is reported on the returned range and
    /// logged at debug level.
    #[must_use]
    pub fn map_rect(&self, rect: &Rect) -> CellRange {
        let range = map_rect(rect, self.cell_size, self.columns, self.rows);
        if range.degenerate {
            debug!(?rect, "degenerate rectangle maps to no cells");
        } else if range.clamped {
            debug!(?rect, ?range, "rectangle clamped to grid bounds");
        }
        range
    }

    /// Iterates over every cell in row-major order.
    pub fn cells(&self) -> impl Iterator<Item = &Cell> {
        self.cells.iter()
    }

    /// Iterates over every occupied cell in row-major order.
    pub fn occupied_cells(&self) -> impl Iterator<Item = &Cell> {
        self.cells.iter().filter(|cell| cell.is_occupied())
    }

    /// Number of occupied cells.
    #[must_use]
    pub fn occupied_count(&self) -> usize {
        self.occupied_cells().count()
    }

    pub(crate) fn cells_mut(&mut self) -> impl Iterator<Item = &mut Cell> {
        self.cells.iter_mut()
    }

    fn index(&self, coord: TileCoord) -> Option<usize> {
        (coord.x < self.columns && coord.y < self.rows).then(|| coord.x * self.rows + coord.y)
    }
}

fn build_cells(columns: usize, rows: usize) -> Vec<Cell> {
    let started = Instant::now();
    let cells: Vec<Cell> = (0..columns)
        .flat_map(|x| (0..rows).map(move |y| Cell::new(TileCoord::new(x, y))))
        .collect();
    info!(
        columns,
        rows,
        cells = cells.len(),
        elapsed = ?started.elapsed(),
        "built tile grid"
    );
    cells
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::config::HandleTracking;
    use crate::tile::Claim;

    fn grid() -> TileGrid {
        TileGrid::with_size(64, 64).unwrap()
    }

    #[test]
    fn test_grid_dimensions() {
        let grid = grid();
        assert_eq!(grid.columns(), 8);
        assert_eq!(grid.rows(), 8);
        assert_eq!(grid.len(), 64);
        assert!(!grid.is_empty());
        assert_eq!(grid.cell_size(), 8);
        assert_eq!(grid.generation(), 0);
    }

    #[test]
    fn test_grid_invalid_config() {
        assert_eq!(
            TileGrid::new(GridConfig::new(64, 64).with_cell_size(0)).unwrap_err(),
            TileError::InvalidCellSize(0)
        );
        assert!(matches!(
            TileGrid::with_size(64, 0),
            Err(TileError::InvalidDimensions { .. })
        ));
    }

    #[test]
    fn test_cells_know_their_index() {
        let grid = TileGrid::with_size(24, 16).unwrap();
        for cell in grid.cells() {
            assert_eq!(grid.cell(cell.coord()).unwrap().coord(), cell.coord());
        }
        let coords: Vec<_> = grid.cells().map(|c| c.coord().as_tuple()).collect();
        assert_eq!(coords, vec![(0, 0), (0, 1), (1, 0), (1, 1), (2, 0), (2, 1)]);
    }

    #[test]
    fn test_cell_out_of_bounds() {
        let grid = grid();
        assert!(grid.cell(TileCoord::new(8, 0)).is_none());
        assert_eq!(
            grid.cell_ref(TileCoord::new(0, 8)),
            Err(TileError::OutOfBounds {
                coord: TileCoord::new(0, 8)
            })
        );
    }

    #[test]
    fn test_cell_rect_derived_from_index() {
        let grid = TileGrid::new(GridConfig::new(100, 100).with_cell_size(10)).unwrap();
        assert_eq!(grid.cell_rect(TileCoord::new(3, 7)), Rect::new(30, 70, 40, 80));
    }

    #[test]
    fn test_cell_rect_saturates_for_huge_index() {
        let grid = grid();
        let rect = grid.cell_rect(TileCoord::new(usize::MAX, 0));
        assert_eq!(rect, Rect::new(i32::MAX, 0, i32::MAX, 8));
    }

    #[test]
    fn test_uncovered_extent() {
        let grid = TileGrid::with_size(70, 64).unwrap();
        assert_eq!(grid.columns(), 8);
        assert_eq!(grid.uncovered_extent(), (6, 0));
    }

    #[test]
    fn test_reinitialize_drops_claims_and_bumps_generation() {
        let mut grid = grid();
        let coord = TileCoord::new(1, 1);
        grid.cell_mut(coord).unwrap().push_claim(Claim::new("a", 1));
        let old_ref = grid.cell_ref(coord).unwrap();

        grid.reinitialize(GridConfig::new(32, 32).with_cell_size(4)).unwrap();

        assert_eq!(grid.generation(), 1);
        assert_eq!(grid.cell_size(), 4);
        assert_eq!(grid.occupied_count(), 0);
        assert!(matches!(
            grid.resolve(old_ref),
            Err(TileError::StaleHandle {
                handle: 0,
                current: 1
            })
        ));
    }

    #[test]
    fn test_reinitialize_error_leaves_grid_intact() {
        let mut grid = grid();
        let result = grid.reinitialize(GridConfig::new(0, 0));
        assert!(result.is_err());
        assert_eq!(grid.generation(), 0);
        assert_eq!(grid.len(), 64);
    }

    #[test]
    fn test_clear_keeps_references_valid() {
        let mut grid = grid();
        let coord = TileCoord::new(2, 3);
        grid.cell_mut(coord).unwrap().push_claim(Claim::new("a", 1));
        let cell_ref = grid.cell_ref(coord).unwrap();

        grid.clear();

        assert!(grid.resolve(cell_ref).unwrap().is_free());
        assert_eq!(grid.occupied_count(), 0);
    }

    #[test]
    fn test_config_is_retained() {
        let config = GridConfig::new(16, 16).with_handle_tracking(HandleTracking::Always);
        let grid = TileGrid::new(config).unwrap();
        assert_eq!(grid.config(), &config);
    }

    #[test]
    fn test_map_rect_uses_grid_cell_size() {
        let grid = TileGrid::new(GridConfig::new(64, 64).with_cell_size(16)).unwrap();
        let range = grid.map_rect(&Rect::new(16, 16, 24, 24));
        assert_eq!(range.start, TileCoord::new(1, 1));
        assert_eq!(range.len(), 1);
    }
}
