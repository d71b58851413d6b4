//! Claiming and releasing cells.
//!
//! A claim appends a `(label, id)` pair to every cell a rectangle covers.
//! Releases remove *all* matching pairs from a cell in one pass; an id of
//! [`WILDCARD_ID`](crate::WILDCARD_ID) matches every claim with the label.
//!
//! # Handle lifetime
//!
//! [`ClaimHandles`] are tied to the grid generation they were issued in. After
//! [`TileGrid::reinitialize`] they are stale and
//! [`TileGrid::release_handles`] rejects them without touching any cell.
//!
//! # Example
//!
//! ```
//! use cf_tilegrid::{Rect, TileGrid, WILDCARD_ID};
//!
//! let mut grid = TileGrid::with_size(64, 64)?;
//! let handles = grid.claim(&Rect::new(0, 0, 16, 8), "crate", 4);
//! assert_eq!(handles.len(), 2);
//!
//! grid.claim(&Rect::new(0, 0, 8, 8), "crate", 5);
//! assert_eq!(grid.release_handles(&handles, "crate", WILDCARD_ID)?, 3);
//! assert_eq!(grid.occupied_count(), 0);
//! # Ok::<(), cf_tilegrid::TileError>(())
//! ```

use tracing::debug;

use crate::error::TileResult;
use crate::grid::{CellRef, TileGrid};
use crate::query::any_claimed;
use crate::rect::Rect;
use crate::tile::{Claim, ClaimId};

/// The cells touched by a claim.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ClaimHandles {
    cells: Vec<CellRef>,
    generation: u64,
}

impl ClaimHandles {
    /// Number of referenced cells.
    #[must_use]
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Returns `true` if no cell is referenced.
    ///
    /// Claims with id `0` yield an empty set under
    /// [`HandleTracking::SuppressZeroId`](crate::HandleTracking::SuppressZeroId).
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Grid generation the handles were issued in.
    #[must_use]
    pub const fn generation(&self) -> u64 {
        self.generation
    }

    /// Iterates over the referenced cells in claim order.
    pub fn iter(&self) -> std::slice::Iter<'_, CellRef> {
        self.cells.iter()
    }

    /// Returns the references as a slice.
    #[must_use]
    pub fn as_slice(&self) -> &[CellRef] {
        &self.cells
    }
}

impl IntoIterator for ClaimHandles {
    type Item = CellRef;
    type IntoIter = std::vec::IntoIter<CellRef>;

    fn into_iter(self) -> Self::IntoIter {
        self.cells.into_iter()
    }
}

impl<'a> IntoIterator for &'a ClaimHandles {
    type Item = &'a CellRef;
    type IntoIter = std::slice::Iter<'a, CellRef>;

    fn into_iter(self) -> Self::IntoIter {
        self.cells.iter()
    }
}

impl TileGrid {
    /// Adds a `(label, id)` claim to every cell covered by `rect`.
    ///
    /// The claim is always applied. Whether the touched cells are reported
    /// depends on the grid's [`HandleTracking`](crate::HandleTracking) policy.
    pub fn claim(&mut self, rect: &Rect, label: &str, id: ClaimId) -> ClaimHandles {
        let range = self.map_rect(rect);
        let tracked = self.config().handle_tracking.tracks(id);
        let generation = self.generation();

        let mut cells = Vec::with_capacity(if tracked { range.len() } else { 0 });
        for coord in range {
            if let Some(cell) = self.cell_mut(coord) {
                cell.push_claim(Claim::new(label, id));
                if tracked {
                    cells.push(CellRef { coord, generation });
                }
            }
        }

        if !tracked && !range.is_empty() {
            debug!(label, id, cells = range.len(), "claim applied without handles");
        }

        ClaimHandles { cells, generation }
    }

    /// Claims `rect` only if none of its cells is occupied.
    ///
    /// Returns `None` and leaves the grid unchanged when any covered cell
    /// already holds a claim.
    pub fn claim_if_free(&mut self, rect: &Rect, label: &str, id: ClaimId) -> Option<ClaimHandles> {
        if any_claimed(self, rect, None) {
            return None;
        }
        Some(self.claim(rect, label, id))
    }

    /// Removes matching claims from every cell covered by `rect`.
    ///
    /// Returns the number of claims removed.
    pub fn release(&mut self, rect: &Rect, label: &str, id: ClaimId) -> usize {
        let mut removed = 0;
        for coord in self.map_rect(rect) {
            if let Some(cell) = self.cell_mut(coord) {
                removed += cell.release(label, id);
            }
        }
        removed
    }

    /// Removes matching claims from the cells referenced by `handles`.
    ///
    /// Returns the number of claims removed.
    ///
    /// # Errors
    ///
    /// Returns [`TileError::StaleHandle`](crate::TileError::StaleHandle) if
    /// the handles were issued before the last re-initialisation. No claim is
    /// removed in that case.
    pub fn release_handles(
        &mut self,
        handles: &ClaimHandles,
        label: &str,
        id: ClaimId,
    ) -> TileResult<usize> {
        self.check_generation(handles.generation)?;

        let mut removed = 0;
        for cell_ref in handles {
            if let Some(cell) = self.cell_mut(cell_ref.coord) {
                removed += cell.release(label, id);
            }
        }
        Ok(removed)
    }

    /// Removes matching claims from every cell in the grid.
    ///
    /// Returns the number of claims removed.
    pub fn release_everywhere(&mut self, label: &str, id: ClaimId) -> usize {
        self.cells_mut().map(|cell| cell.release(label, id)).sum()
    }
}
