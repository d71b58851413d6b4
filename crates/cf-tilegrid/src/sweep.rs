//! Swept-motion checks against a tile grid.
//!
//! A fast object can jump over a thin obstacle between two ticks. A sweep
//! checks the straight path between two positions for such tunneling.
//!
//! # Algorithm
//!
//! 1. The object's bounds at `from` and at `to` are tested first. Either one
//!    overlapping ends the check.
//! 2. Both endpoints are floored onto a grid whose cells are the size of the
//!    object.
//! 3. A Bresenham line is drawn between the two object-grid cells, both ends
//!    included, and each sampled cell is tested as a world rectangle
//!    `cell * object_size + offset`.
//!
//! # Approximation
//!
//! Sampling happens at object-size granularity, not at tile granularity, and
//! every sample is an axis-aligned rectangle snapped to the object grid. This
//! catches axis-aligned tunneling between samples; it is not a continuous
//! swept-shape intersection.
//!
//! # Example
//!
//! ```
//! use cf_tilegrid::{sweep_check, Point2, Rect, Sweep, TileGrid, Vector2};
//!
//! let mut grid = TileGrid::with_size(64, 64)?;
//! grid.claim(&Rect::new(40, 0, 48, 8), "wall", 1);
//!
//! let sweep = Sweep::new(Point2::new(0, 4), Point2::new(80, 4), Vector2::new(8, 8));
//! assert!(sweep_check(&mut grid, &sweep, None)?);
//! # Ok::<(), cf_tilegrid::TileError>(())
//! ```

use nalgebra::{Point2, Vector2};

use crate::error::{TileError, TileResult};
use crate::grid::TileGrid;
use crate::query::overlap;
use crate::rect::Rect;

/// A straight-line motion of an axis-aligned object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Sweep {
    /// Start position.
    pub from: Point2<i32>,
    /// End position.
    pub to: Point2<i32>,
    /// Offset from a position to the object's minimum corner.
    pub offset: Vector2<i32>,
    /// Width and height of the object.
    pub object_size: Vector2<i32>,
}

impl Sweep {
    /// Creates a sweep with no offset.
    #[must_use]
    pub fn new(from: Point2<i32>, to: Point2<i32>, object_size: Vector2<i32>) -> Self {
        Self {
            from,
            to,
            offset: Vector2::zeros(),
            object_size,
        }
    }

    /// Sets the offset applied to every sampled rectangle.
    #[must_use]
    pub fn with_offset(mut self, offset: Vector2<i32>) -> Self {
        self.offset = offset;
        self
    }

    /// Returns the object's bounds when positioned at `position`.
    #[must_use]
    pub fn bounds_at(&self, position: Point2<i32>) -> Rect {
        Rect::from_origin_size(position, self.object_size).translated(self.offset)
    }

    /// Returns the world rectangle of a cell on the object-size grid.
    #[must_use]
    pub fn sample_rect(&self, cell: Point2<i32>) -> Rect {
        let origin = Point2::new(
            cell.x.saturating_mul(self.object_size.x),
            cell.y.saturating_mul(self.object_size.y),
        );
        self.bounds_at(origin)
    }

    /// Returns the object-size grid cell containing `position`.
    ///
    /// # Errors
    ///
    /// Returns [`TileError::InvalidObjectSize`] if either side of the object
    /// is not positive.
    pub fn object_cell(&self, position: Point2<i32>) -> TileResult<Point2<i32>> {
        self.validate()?;
        Ok(Point2::new(
            position.x.div_euclid(self.object_size.x),
            position.y.div_euclid(self.object_size.y),
        ))
    }

    /// Returns the line of object-grid cells between the endpoints.
    ///
    /// # Errors
    ///
    /// Returns [`TileError::InvalidObjectSize`] if either side of the object
    /// is not positive.
    pub fn traverse(&self) -> TileResult<LineTraversal> {
        Ok(LineTraversal::new(
            self.object_cell(self.from)?,
            self.object_cell(self.to)?,
        ))
    }

    fn validate(&self) -> TileResult<()> {
        if self.object_size.x <= 0 || self.object_size.y <= 0 {
            return Err(TileError::InvalidObjectSize {
                width: self.object_size.x,
                height: self.object_size.y,
            });
        }
        Ok(())
    }
}

/// Iterator over the integer points of a Bresenham line.
///
/// Both endpoints are included. The line is always walked along its major
/// axis from the lower to the higher coordinate, so for lines that run
/// backwards the points come out from `end` to `start`.
///
/// # Example
///
/// ```
/// use cf_tilegrid::{LineTraversal, Point2};
///
/// let points: Vec<_> = LineTraversal::new(Point2::new(0, 0), Point2::new(4, 2))
///     .map(|p| (p.x, p.y))
///     .collect();
/// assert_eq!(points, vec![(0, 0), (1, 0), (2, 1), (3, 1), (4, 2)]);
/// ```
#[derive(Debug, Clone)]
pub struct LineTraversal {
    /// Whether x and y were swapped to walk along y.
    steep: bool,
    /// Current position on the major axis.
    major: i64,
    /// Last position on the major axis (inclusive).
    major_end: i64,
    /// Current position on the minor axis.
    minor: i64,
    /// Step on the minor axis (-1 or 1).
    minor_step: i64,
    /// Span along the major axis.
    delta_major: i64,
    /// Absolute span along the minor axis.
    delta_minor: i64,
    /// Accumulated error, scaled by `2 * delta_major`.
    error: i64,
}

impl LineTraversal {
    /// Creates a traversal from `start` to `end`.
    #[must_use]
    pub fn new(start: Point2<i32>, end: Point2<i32>) -> Self {
        let (mut x0, mut y0) = (i64::from(start.x), i64::from(start.y));
        let (mut x1, mut y1) = (i64::from(end.x), i64::from(end.y));

        let steep = (y1 - y0).abs() > (x1 - x0).abs();
        if steep {
            std::mem::swap(&mut x0, &mut y0);
            std::mem::swap(&mut x1, &mut y1);
        }
        if x0 > x1 {
            std::mem::swap(&mut x0, &mut x1);
            std::mem::swap(&mut y0, &mut y1);
        }

        Self {
            steep,
            major: x0,
            major_end: x1,
            minor: y0,
            minor_step: if y0 < y1 { 1 } else { -1 },
            delta_major: x1 - x0,
            delta_minor: (y1 - y0).abs(),
            error: 0,
        }
    }

    fn remaining(&self) -> usize {
        usize::try_from(self.major_end - self.major + 1).unwrap_or(0)
    }
}

impl Iterator for LineTraversal {
    type Item = Point2<i32>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.major > self.major_end {
            return None;
        }

        let (x, y) = if self.steep {
            (self.minor, self.major)
        } else {
            (self.major, self.minor)
        };

        self.major += 1;
        self.error += 2 * self.delta_minor;
        if self.error > self.delta_major {
            self.minor += self.minor_step;
            self.error -= 2 * self.delta_major;
        }

        // Every point lies between the two i32 endpoints.
        Some(Point2::new(narrow(x), narrow(y)))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.remaining();
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for LineTraversal {}

impl std::iter::FusedIterator for LineTraversal {}

fn narrow(value: i64) -> i32 {
    i32::try_from(value).unwrap_or(if value < 0 { i32::MIN } else { i32::MAX })
}

/// Checks whether an object moving along `sweep` passes through a matching
/// cell.
///
/// Every test is an [`overlap`] call, so afterwards the grid's last-collision
/// cache holds the result of the final test performed.
///
/// # Errors
///
/// Returns [`TileError::InvalidObjectSize`] if either side of the object is
/// not positive. The grid is not queried in that case.
pub fn sweep_check(grid: &mut TileGrid, sweep: &Sweep, label: Option<&str>) -> TileResult<bool> {
    let line = sweep.traverse()?;

    if overlap(grid, &sweep.bounds_at(sweep.from), label, false)
        || overlap(grid, &sweep.bounds_at(sweep.to), label, false)
    {
        return Ok(true);
    }

    for cell in line {
        if overlap(grid, &sweep.sample_rect(cell), label, false) {
            return Ok(true);
        }
    }
    Ok(false)
}
