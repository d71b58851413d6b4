//! Grid configuration.
//!
//! # Example
//!
//! ```
//! use cf_tilegrid::{GridConfig, HandleTracking};
//!
//! let config = GridConfig::new(640, 480)
//!     .with_cell_size(16)
//!     .with_handle_tracking(HandleTracking::Always);
//!
//! assert!(config.validate().is_ok());
//! assert_eq!(config.columns(), 40);
//! assert_eq!(config.rows(), 30);
//! ```

use std::num::NonZeroU32;

use crate::error::{TileError, TileResult};

/// Default cell size in world units.
pub const DEFAULT_CELL_SIZE: u32 = 8;

/// Which claims report the cells they touched.
///
/// By default a claim with id `0` is applied but returns no handles, so the
/// caller cannot release it by handle. [`HandleTracking::Always`] lifts that.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum HandleTracking {
    /// Claims with id `0` return an empty handle set.
    #[default]
    SuppressZeroId,
    /// Every claim returns the cells it touched.
    Always,
}

impl HandleTracking {
    /// Returns `true` if a claim with `id` should report its cells.
    #[must_use]
    pub const fn tracks(self, id: crate::ClaimId) -> bool {
        match self {
            Self::SuppressZeroId => id != 0,
            Self::Always => true,
        }
    }
}

/// Configuration for a [`TileGrid`](crate::TileGrid).
///
/// `width` and `height` are in world units. The grid holds
/// `floor(width / cell_size) x floor(height / cell_size)` cells; a strip
/// narrower than one cell at the far edges is not covered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct GridConfig {
    /// Width of the world area.
    pub width: u32,
    /// Height of the world area.
    pub height: u32,
    /// Edge length of a square cell.
    pub cell_size: u32,
    /// Handle reporting policy for claims.
    pub handle_tracking: HandleTracking,
}

impl GridConfig {
    /// Creates a configuration for a `width x height` area with the default
    /// cell size.
    #[must_use]
    pub const fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            cell_size: DEFAULT_CELL_SIZE,
            handle_tracking: HandleTracking::SuppressZeroId,
        }
    }

    /// Sets the cell size.
    #[must_use]
    pub const fn with_cell_size(mut self, cell_size: u32) -> Self {
        self.cell_size = cell_size;
        self
    }

    /// Sets the handle reporting policy.
    #[must_use]
    pub const fn with_handle_tracking(mut self, tracking: HandleTracking) -> Self {
        self.handle_tracking = tracking;
        self
    }

    /// Number of whole columns, or `0` for a zero cell size.
    #[must_use]
    pub fn columns(&self) -> usize {
        self.width
            .checked_div(self.cell_size)
            .map_or(0, |columns| usize::try_from(columns).unwrap_or(usize::MAX))
    }

    /// Number of whole rows, or `0` for a zero cell size.
    #[must_use]
    pub fn rows(&self) -> usize {
        self.height
            .checked_div(self.cell_size)
            .map_or(0, |rows| usize::try_from(rows).unwrap_or(usize::MAX))
    }

    /// Checks that the configuration describes at least one cell.
    ///
    /// # Errors
    ///
    /// - [`TileError::InvalidCellSize`] if `cell_size` is zero.
    /// - [`TileError::InvalidDimensions`] if either axis holds no whole cell.
    pub fn validate(&self) -> TileResult<()> {
        self.validated_cell_size().map(|_| ())
    }

    /// Returns the validated cell size.
    pub(crate) fn validated_cell_size(&self) -> TileResult<NonZeroU32> {
        let cell_size =
            NonZeroU32::new(self.cell_size).ok_or(TileError::InvalidCellSize(self.cell_size))?;
        if self.columns() == 0 || self.rows() == 0 {
            return Err(TileError::InvalidDimensions {
                width: self.width,
                height: self.height,
                cell_size: self.cell_size,
            });
        }
        Ok(cell_size)
    }
}

impl Default for GridConfig {
    fn default() -> Self {
        Self::new(0, 0)
    }
}
