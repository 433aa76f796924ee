//! Banded coefficient storage for the three z-line systems.
//!
//! Each row of a line is a 5-wide band vector
//! `[sub-sub, sub, diagonal, super, super-super]`; see the `SUB_SUB` … `SUPER_SUPER`
//! constants for the positions.

use std::fmt;
use std::ops::Range;

use crate::error::{Result, SweepError};
use crate::types::{Extents, LineIndex};

/// One row of a pentadiagonal system.
pub type Band = [f64; 5];

/// Position of the sub-sub-diagonal coefficient in a [`Band`].
pub const SUB_SUB: usize = 0;
/// Position of the sub-diagonal coefficient.
pub const SUB: usize = 1;
/// Position of the diagonal coefficient.
pub const DIAG: usize = 2;
/// Position of the super-diagonal coefficient.
pub const SUPER: usize = 3;
/// Position of the super-super-diagonal coefficient.
pub const SUPER_SUPER: usize = 4;

/// The identity row used to close every line at `k = 0` and `k = nz2 + 1`.
pub const IDENTITY_ROW: Band = [0.0, 0.0, 1.0, 0.0, 0.0];

/// How the last row's diagonal is divided out in the closing step.
///
/// The base system multiplies by a precomputed reciprocal while the acoustic
/// systems divide directly. The two are not bit-identical, so the distinction
/// is kept to reproduce reference results exactly.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LastRowScaling {
    /// `r = (1 / d) * r`
    Reciprocal,
    /// `r = r / d`
    Divide,
}

impl LastRowScaling {
    /// Scale `value` by the inverse of `diag`.
    #[inline]
    pub fn apply(self, value: f64, diag: f64) -> f64 {
        match self {
            Self::Reciprocal => (1.0 / diag) * value,
            Self::Divide => value / diag,
        }
    }
}

/// Which of the three coupled systems a band set belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SystemKind {
    /// Entropy and shear waves: residual components 0, 1, 2.
    Base,
    /// Forward acoustic wave: residual component 3.
    PlusAcoustic,
    /// Backward acoustic wave: residual component 4.
    MinusAcoustic,
}

impl SystemKind {
    /// All systems in elimination order.
    pub const ALL: [SystemKind; 3] = [Self::Base, Self::PlusAcoustic, Self::MinusAcoustic];

    /// Residual components solved against this system.
    #[inline]
    pub fn components(self) -> Range<usize> {
        match self {
            Self::Base => 0..3,
            Self::PlusAcoustic => 3..4,
            Self::MinusAcoustic => 4..5,
        }
    }

    /// Scaling used when the last row's diagonal is divided out.
    #[inline]
    pub fn last_row_scaling(self) -> LastRowScaling {
        match self {
            Self::Base => LastRowScaling::Reciprocal,
            Self::PlusAcoustic | Self::MinusAcoustic => LastRowScaling::Divide,
        }
    }
}

impl fmt::Display for SystemKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Base => "base",
            Self::PlusAcoustic => "plus-acoustic",
            Self::MinusAcoustic => "minus-acoustic",
        };
        f.write_str(name)
    }
}

/// Band coefficients of one system for every interior z-line.
///
/// Rows are stored line-contiguous: `data[line * n_rows + k]`.
#[derive(Clone, Debug, PartialEq)]
pub struct BandedSystem {
    /// Band rows in line-contiguous layout
    pub data: Vec<Band>,
    /// Number of lines
    pub n_lines: usize,
    /// Rows per line (`nz2 + 2`)
    pub n_rows: usize,
}

impl BandedSystem {
    /// Create zeroed storage for the given extents.
    pub fn new(extents: &Extents) -> Self {
        Self {
            data: vec![[0.0; 5]; extents.n_cells()],
            n_lines: extents.n_lines(),
            n_rows: extents.n_rows(),
        }
    }

    /// Band row `k` of a line.
    #[inline]
    pub fn row(&self, line: LineIndex, k: usize) -> &Band {
        &self.data[line.get() * self.n_rows + k]
    }

    /// Mutable band row `k` of a line.
    #[inline]
    pub fn row_mut(&mut self, line: LineIndex, k: usize) -> &mut Band {
        &mut self.data[line.get() * self.n_rows + k]
    }

    /// All rows of a line.
    #[inline]
    pub fn line(&self, line: LineIndex) -> &[Band] {
        let start = line.get() * self.n_rows;
        &self.data[start..start + self.n_rows]
    }

    /// All rows of a line, mutably.
    #[inline]
    pub fn line_mut(&mut self, line: LineIndex) -> &mut [Band] {
        let start = line.get() * self.n_rows;
        &mut self.data[start..start + self.n_rows]
    }

    /// Whether this storage matches the extents.
    pub fn matches(&self, extents: &Extents) -> bool {
        self.n_lines == extents.n_lines()
            && self.n_rows == extents.n_rows()
            && self.data.len() == extents.n_cells()
    }

    /// Size in bytes of the band data.
    pub fn byte_len(&self) -> usize {
        self.data.len() * std::mem::size_of::<Band>()
    }

    /// Overwrite every row with the rows of `other`.
    ///
    /// # Errors
    ///
    /// [`SweepError::SyncMismatch`] if the two storages differ in size.
    pub fn copy_from(&mut self, other: &BandedSystem) -> Result<()> {
        if self.data.len() != other.data.len() || self.n_rows != other.n_rows {
            return Err(SweepError::SyncMismatch {
                source_rows: other.data.len(),
                dest_rows: self.data.len(),
            });
        }
        self.data.copy_from_slice(&other.data);
        Ok(())
    }
}

/// The three coupled coefficient systems of a z-sweep.
#[derive(Clone, Debug, PartialEq)]
pub struct CoefficientSystems {
    /// Base system (entropy and shear waves)
    pub base: BandedSystem,
    /// Plus-acoustic system
    pub plus: BandedSystem,
    /// Minus-acoustic system
    pub minus: BandedSystem,
}

impl CoefficientSystems {
    /// Allocate zeroed storage for all three systems.
    pub fn new(extents: &Extents) -> Self {
        Self {
            base: BandedSystem::new(extents),
            plus: BandedSystem::new(extents),
            minus: BandedSystem::new(extents),
        }
    }

    /// Borrow one system.
    #[inline]
    pub fn get(&self, kind: SystemKind) -> &BandedSystem {
        match kind {
            SystemKind::Base => &self.base,
            SystemKind::PlusAcoustic => &self.plus,
            SystemKind::MinusAcoustic => &self.minus,
        }
    }

    /// Mutably borrow one system.
    #[inline]
    pub fn get_mut(&mut self, kind: SystemKind) -> &mut BandedSystem {
        match kind {
            SystemKind::Base => &mut self.base,
            SystemKind::PlusAcoustic => &mut self.plus,
            SystemKind::MinusAcoustic => &mut self.minus,
        }
    }

    /// Check every system against the extents.
    pub fn check_extents(&self, extents: &Extents) -> Result<()> {
        for kind in SystemKind::ALL {
            let system = self.get(kind);
            if !system.matches(extents) {
                return Err(SweepError::dimension_mismatch(
                    "coefficient system",
                    format!("{} lines × {} rows", extents.n_lines(), extents.n_rows()),
                    format!("{} lines × {} rows ({})", system.n_lines, system.n_rows, kind),
                ));
            }
        }
        Ok(())
    }

    /// Total rows across all three systems.
    pub fn total_rows(&self) -> usize {
        self.base.data.len() + self.plus.data.len() + self.minus.data.len()
    }
}
