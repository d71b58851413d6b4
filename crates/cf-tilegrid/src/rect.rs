//! Axis-aligned rectangles in integer world units.

use nalgebra::{Point2, Vector2};

/// An axis-aligned rectangle in world coordinates.
///
/// Unlike [`Rect::from_corners`], [`Rect::new`] keeps the corners exactly as
/// given, so a rectangle with `max < min` on an axis stays degenerate and
/// maps to an empty cell range.
///
/// # Example
///
/// ```
/// use cf_tilegrid::Rect;
///
/// let rect = Rect::new(16, 16, 24, 32);
/// assert_eq!(rect.width(), 8);
/// assert_eq!(rect.height(), 16);
/// assert!(!rect.is_degenerate());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Rect {
    /// Minimum corner.
    pub min: Point2<i32>,
    /// Maximum corner.
    pub max: Point2<i32>,
}

impl Rect {
    /// Creates a rectangle from its edges, without reordering.
    #[must_use]
    pub fn new(min_x: i32, min_y: i32, max_x: i32, max_y: i32) -> Self {
        Self {
            min: Point2::new(min_x, min_y),
            max: Point2::new(max_x, max_y),
        }
    }

    /// Creates a rectangle from two opposite corners in any order.
    ///
    /// # Example
    ///
    /// ```
    /// use cf_tilegrid::Rect;
    /// use nalgebra::Point2;
    ///
    /// let rect = Rect::from_corners(Point2::new(10, 0), Point2::new(0, 10));
    /// assert_eq!(rect, Rect::new(0, 0, 10, 10));
    /// ```
    #[must_use]
    pub fn from_corners(a: Point2<i32>, b: Point2<i32>) -> Self {
        Self {
            min: Point2::new(a.x.min(b.x), a.y.min(b.y)),
            max: Point2::new(a.x.max(b.x), a.y.max(b.y)),
        }
    }

    /// Creates a rectangle spanning `size` from `origin`.
    #[must_use]
    pub fn from_origin_size(origin: Point2<i32>, size: Vector2<i32>) -> Self {
        Self {
            min: origin,
            max: Point2::new(
                origin.x.saturating_add(size.x),
                origin.y.saturating_add(size.y),
            ),
        }
    }

    /// Returns this rectangle moved by `offset`.
    #[must_use]
    pub fn translated(&self, offset: Vector2<i32>) -> Self {
        Self::new(
            self.min.x.saturating_add(offset.x),
            self.min.y.saturating_add(offset.y),
            self.max.x.saturating_add(offset.x),
            self.max.y.saturating_add(offset.y),
        )
    }

    /// Signed span along x.
    #[must_use]
    pub fn width(&self) -> i64 {
        i64::from(self.max.x) - i64::from(self.min.x)
    }

    /// Signed span along y.
    #[must_use]
    pub fn height(&self) -> i64 {
        i64::from(self.max.y) - i64::from(self.min.y)
    }

    /// Returns `true` if `max < min` on either axis.
    #[must_use]
    pub fn is_degenerate(&self) -> bool {
        self.max.x < self.min.x || self.max.y < self.min.y
    }
}

impl Default for Rect {
    fn default() -> Self {
        Self::new(0, 0, 0, 0)
    }
}
