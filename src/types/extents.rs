//! Structured grid extents for a z-sweep.

use std::fmt;

use super::LineIndex;
use crate::error::{Result, SweepError};

/// Interior cell counts of a structured 3-D grid.
///
/// Lines run along z. Every per-line array carries one ghost row on each side
/// along z, so a line has `nz2 + 2` rows numbered `0..=nz2 + 1`; rows `0` and
/// `nz2 + 1` are the boundary rows.
///
/// # Example
///
/// ```
/// use sp_rs::types::Extents;
///
/// let ext = Extents::new(5, 4, 6).unwrap();
/// assert_eq!(ext.n_lines(), 20);
/// assert_eq!(ext.last_row(), 7);
/// assert!(Extents::new(5, 0, 6).is_err());
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Extents {
    nx2: usize,
    ny2: usize,
    nz2: usize,
}

impl Extents {
    /// Create validated extents.
    ///
    /// # Errors
    ///
    /// [`SweepError::InvalidExtents`] if any count is zero.
    pub fn new(nx2: usize, ny2: usize, nz2: usize) -> Result<Self> {
        if nx2 == 0 || ny2 == 0 || nz2 == 0 {
            return Err(SweepError::InvalidExtents { nx2, ny2, nz2 });
        }
        Ok(Self { nx2, ny2, nz2 })
    }

    /// Cubic extents (same interior count on every axis).
    pub fn cube(n: usize) -> Result<Self> {
        Self::new(n, n, n)
    }

    /// Interior cells along x.
    #[inline]
    pub fn nx2(&self) -> usize {
        self.nx2
    }

    /// Interior cells along y.
    #[inline]
    pub fn ny2(&self) -> usize {
        self.ny2
    }

    /// Interior cells along z.
    #[inline]
    pub fn nz2(&self) -> usize {
        self.nz2
    }

    /// Number of interior z-lines.
    #[inline]
    pub fn n_lines(&self) -> usize {
        self.nx2 * self.ny2
    }

    /// Rows per line including both boundary rows.
    #[inline]
    pub fn n_rows(&self) -> usize {
        self.nz2 + 2
    }

    /// Index of the upper boundary row (`nz2 + 1`).
    #[inline]
    pub fn last_row(&self) -> usize {
        self.nz2 + 1
    }

    /// Total cells stored per scalar field (lines × rows).
    #[inline]
    pub fn n_cells(&self) -> usize {
        self.n_lines() * self.n_rows()
    }

    /// Line index of interior line `(i, j)` (both 1-based).
    #[inline]
    pub fn line_index(&self, i: usize, j: usize) -> LineIndex {
        debug_assert!((1..=self.nx2).contains(&i), "i={} outside 1..={}", i, self.nx2);
        debug_assert!((1..=self.ny2).contains(&j), "j={} outside 1..={}", j, self.ny2);
        LineIndex::new((j - 1) * self.nx2 + (i - 1))
    }

    /// 1-based `(i, j)` of a line.
    #[inline]
    pub fn line_coords(&self, line: LineIndex) -> (usize, usize) {
        let l = line.get();
        (l % self.nx2 + 1, l / self.nx2 + 1)
    }

    /// Iterate over all interior lines.
    pub fn lines(&self) -> impl Iterator<Item = LineIndex> + ExactSizeIterator {
        LineIndex::iter(self.n_lines())
    }
}

impl fmt::Display for Extents {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}×{}×{}", self.nx2, self.ny2, self.nz2)
    }
}
