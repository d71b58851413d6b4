//! Tile-based occupancy grid for CortenForge.
//!
//! This crate partitions a 2D world area into square cells and records which
//! entities currently occupy each cell. It answers broad-phase questions
//! cheaply, before any exact shape test runs:
//!
//! - [`TileGrid`] - Fixed-size grid of [`Cell`]s holding labelled claims
//! - [`Rect`] and [`map_rect`] - World rectangles and their covered cell range
//! - [`overlap`], [`collision_array`] - Rectangle queries with an optional label filter
//! - [`TileGrid::claim`] and [`TileGrid::release`] - Occupancy bookkeeping
//! - [`Sweep`] and [`sweep_check`] - Tunneling checks for fast movers
//!
//! # Layer 0 Crate
//!
//! This is a Layer 0 crate with **zero Bevy dependencies**. It performs
//! no I/O. Every operation is a synchronous scan over the cells a rectangle
//! covers.
//!
//! # Coordinate Systems
//!
//! World coordinates are `i32` values with the origin at the grid's minimum
//! corner. Cell `(x, y)` covers `[x * cell_size, (x + 1) * cell_size)` on
//! each axis. Rectangle coordinates are clamped to
//! `[0, (cells - 1) * cell_size]`, never rejected, so rectangle queries and
//! claims stop short of the last column and row; see [`CellRange::clamped`].
//!
//! # Example
//!
//! ```
//! use cf_tilegrid::{Rect, TileGrid, WILDCARD_ID, overlap};
//!
//! // 64x64 world units with the default 8-unit cells
//! let mut grid = TileGrid::with_size(64, 64)?;
//!
//! let player = Rect::new(16, 16, 24, 24);
//! grid.claim(&player, "player", 1);
//!
//! assert!(overlap(&mut grid, &player, Some("player"), false));
//! assert!(!overlap(&mut grid, &Rect::new(0, 0, 8, 8), None, false));
//!
//! grid.release(&player, "player", WILDCARD_ID);
//! assert!(!overlap(&mut grid, &player, Some("player"), false));
//! # Ok::<(), cf_tilegrid::TileError>(())
//! ```
//!
//! # Placement
//!
//! All mutation goes through `&mut TileGrid`, so a claim and the query that
//! verifies it cannot interleave with another caller.
//! [`TileGrid::claim_if_free`] performs both as one step:
//!
//! ```
//! use cf_tilegrid::{Rect, TileGrid};
//!
//! let mut grid = TileGrid::with_size(64, 64)?;
//! assert!(grid.claim_if_free(&Rect::new(0, 0, 16, 16), "tower", 1).is_some());
//! assert!(grid.claim_if_free(&Rect::new(8, 8, 24, 24), "tower", 2).is_none());
//! # Ok::<(), cf_tilegrid::TileError>(())
//! ```
//!
//! # Handles
//!
//! Claims return [`ClaimHandles`] for cheap release later. Handles are
//! checked against the grid generation, so using them after
//! [`TileGrid::reinitialize`] is an error rather than a dangling reference:
//!
//! ```
//! use cf_tilegrid::{GridConfig, Rect, TileError, TileGrid};
//!
//! let mut grid = TileGrid::with_size(64, 64)?;
//! let handles = grid.claim(&Rect::new(0, 0, 8, 8), "crate", 3);
//!
//! grid.reinitialize(GridConfig::new(128, 128))?;
//! assert!(matches!(
//!     grid.release_handles(&handles, "crate", 3),
//!     Err(TileError::StaleHandle { .. })
//! ));
//! # Ok::<(), cf_tilegrid::TileError>(())
//! ```

// Safety: Deny unwrap/expect in library code. Tests may use them (workspace warns).
#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

mod claim;
mod config;
mod error;
mod grid;
mod mapper;
mod query;
mod rect;
mod sweep;
mod tile;

// Re-export core types
pub use claim::ClaimHandles;
pub use config::{DEFAULT_CELL_SIZE, GridConfig, HandleTracking};
pub use error::{TileError, TileResult};
pub use grid::{CellRef, TileGrid};
pub use mapper::{CellRange, CellRangeIter, map_rect};
pub use query::{
    OverlapReport, any_claimed, collision_array, last_collision_coords, last_collisions, overlap,
    query, query_cells,
};
pub use rect::Rect;
pub use sweep::{LineTraversal, Sweep, sweep_check};
pub use tile::{Cell, Claim, ClaimId, TileCoord, WILDCARD_ID};

// Re-export nalgebra types for convenience
pub use nalgebra::{Point2, Vector2};
