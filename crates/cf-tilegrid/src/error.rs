//! Error types for tile grid operations.

use crate::tile::TileCoord;

/// Errors that can occur while building or using a [`TileGrid`](crate::TileGrid).
///
/// "Nothing was hit" is never an error; queries report it as `false` or an
/// empty result.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[non_exhaustive]
pub enum TileError {
    /// The cell size must be positive.
    #[error("cell size must be positive, got {0}")]
    InvalidCellSize(u32),

    /// The configured area does not contain a single whole cell.
    #[error("grid area {width}x{height} holds no whole {cell_size}-unit cell")]
    InvalidDimensions {
        /// Configured width in world units.
        width: u32,
        /// Configured height in world units.
        height: u32,
        /// Configured cell size in world units.
        cell_size: u32,
    },

    /// A handle was issued before the grid was last re-initialised.
    #[error("handle from grid generation {handle} used on generation {current}")]
    StaleHandle {
        /// Generation recorded in the handle.
        handle: u64,
        /// Current generation of the grid.
        current: u64,
    },

    /// A cell index lies outside the grid.
    #[error("cell {coord:?} is out of bounds")]
    OutOfBounds {
        /// The offending cell index.
        coord: TileCoord,
    },

    /// A swept object must have a positive width and height.
    #[error("object size must be positive, got {width}x{height}")]
    InvalidObjectSize {
        /// Object width in world units.
        width: i32,
        /// Object height in world units.
        height: i32,
    },
}

/// Result type for tile grid operations.
pub type TileResult<T> = std::result::Result<T, TileError>;
