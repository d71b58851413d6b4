//! Cell coordinates, claims, and the cells that hold them.

/// Identifier attached to a claim alongside its label.
///
/// Values are opaque to the grid except for [`WILDCARD_ID`].
pub type ClaimId = i32;

/// Release-time id that matches every claim with the given label.
pub const WILDCARD_ID: ClaimId = -1;

/// Integer index of a cell in a [`TileGrid`](crate::TileGrid).
///
/// # Example
///
/// ```
/// use cf_tilegrid::TileCoord;
///
/// let coord = TileCoord::new(2, 3);
/// assert_eq!(coord.as_tuple(), (2, 3));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TileCoord {
    /// Column index.
    pub x: usize,
    /// Row index.
    pub y: usize,
}

impl TileCoord {
    /// Creates a new cell index.
    #[must_use]
    pub const fn new(x: usize, y: usize) -> Self {
        Self { x, y }
    }

    /// Returns the index as an `(x, y)` tuple.
    #[must_use]
    pub const fn as_tuple(self) -> (usize, usize) {
        (self.x, self.y)
    }
}

impl From<(usize, usize)> for TileCoord {
    fn from((x, y): (usize, usize)) -> Self {
        Self::new(x, y)
    }
}

/// One entity's hold on a cell.
///
/// Labels are not unique and identical `(label, id)` pairs may coexist in a
/// single cell.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Claim {
    /// Caller-chosen label, e.g. an entity kind.
    pub label: String,
    /// Caller-chosen id.
    pub id: ClaimId,
}

impl Claim {
    /// Creates a new claim.
    #[must_use]
    pub fn new(label: impl Into<String>, id: ClaimId) -> Self {
        Self {
            label: label.into(),
            id,
        }
    }

    /// Returns `true` if a release for `(label, id)` removes this claim.
    ///
    /// [`WILDCARD_ID`] ignores the stored id.
    #[must_use]
    pub fn matches(&self, label: &str, id: ClaimId) -> bool {
        self.label == label && (id == WILDCARD_ID || self.id == id)
    }
}

/// A single grid cell and the ordered claims placed on it.
///
/// A cell with no claims is *free*, otherwise it is *occupied*. Its
/// world-space rectangle is derived from the owning grid's cell size, see
/// [`TileGrid::cell_rect`](crate::TileGrid::cell_rect).
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Cell {
    coord: TileCoord,
    claims: Vec<Claim>,
}

impl Cell {
    pub(crate) const fn new(coord: TileCoord) -> Self {
        Self {
            coord,
            claims: Vec::new(),
        }
    }

    /// Returns this cell's index.
    #[must_use]
    pub const fn coord(&self) -> TileCoord {
        self.coord
    }

    /// Returns `true` if no claims are held.
    #[must_use]
    pub fn is_free(&self) -> bool {
        self.claims.is_empty()
    }

    /// Returns `true` if at least one claim is held.
    #[must_use]
    pub fn is_occupied(&self) -> bool {
        !self.claims.is_empty()
    }

    /// Returns `true` if any claim carries `label`, whatever its id.
    #[must_use]
    pub fn is_claimed_by(&self, label: &str) -> bool {
        self.claims.iter().any(|claim| claim.label == label)
    }

    /// Returns `true` if the cell matches an optional label filter.
    ///
    /// `None` matches any occupied cell.
    #[must_use]
    pub fn matches(&self, label: Option<&str>) -> bool {
        label.map_or_else(|| self.is_occupied(), |label| self.is_claimed_by(label))
    }

    /// Returns the claims in insertion order.
    #[must_use]
    pub fn claims(&self) -> &[Claim] {
        &self.claims
    }

    /// Returns the number of claims held.
    #[must_use]
    pub fn claim_count(&self) -> usize {
        self.claims.len()
    }

    pub(crate) fn push_claim(&mut self, claim: Claim) {
        self.claims.push(claim);
    }

    /// Removes every claim matching `(label, id)` and returns how many went.
    pub(crate) fn release(&mut self, label: &str, id: ClaimId) -> usize {
        let before = self.claims.len();
        self.claims.retain(|claim| !claim.matches(label, id));
        before - self.claims.len()
    }

    pub(crate) fn clear(&mut self) {
        self.claims.clear();
    }
}
