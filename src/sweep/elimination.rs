//! Block elimination of the pentadiagonal z-line systems.
//!
//! One routine solves any of the three systems against its own residual
//! components (see [`SystemKind::components`]):
//!
//! 1. **Forward pass** (`k = 1..=nz2`): normalize row `k-1`, then eliminate the
//!    sub band of row `k` and the sub-sub band of row `k+1` against it.
//! 2. **Closing step** (once): normalize row `nz2`, eliminate the sub band of
//!    row `nz2+1`, divide out its diagonal and substitute it back into row `nz2`.
//! 3. **Backward pass** (`k = nz2..=1`): substitute rows `k` and `k+1` into
//!    row `k-1`.
//!
//! The operand order of every update matches the reference solver so results
//! agree bit-for-bit. Within a line the recurrence is strictly sequential;
//! lines are independent.

use std::ops::Range;

use crate::constants::SweepConstants;
use crate::error::SweepError;
use crate::storage::{
    Band, LineSnapshot, Residual, SystemKind, DIAG, SUB, SUB_SUB, SUPER, SUPER_SUPER,
};
use crate::types::{Extents, LineIndex};

use super::coefficients::build_line;

/// A zero or non-finite pivot met while eliminating a line.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SingularRow {
    /// System being eliminated
    pub system: SystemKind,
    /// Row whose diagonal failed
    pub k: usize,
    /// Offending diagonal value
    pub value: f64,
}

impl SingularRow {
    /// Attach the line position and turn this into a crate error.
    pub fn into_error(self, line: LineIndex, extents: &Extents) -> SweepError {
        let (i, j) = extents.line_coords(line);
        SweepError::SingularPivot {
            line,
            i,
            j,
            k: self.k,
            system: self.system,
            value: self.value,
        }
    }
}

/// Per-line elimination statistics, reducible across lines.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LineStats {
    /// Lines folded into these statistics
    pub lines: usize,
    /// Smallest absolute pivot over interior rows
    pub min_pivot: f64,
}

impl LineStats {
    /// Neutral element for [`LineStats::merge`].
    pub const EMPTY: Self = Self {
        lines: 0,
        min_pivot: f64::INFINITY,
    };

    /// Combine statistics of disjoint line sets.
    #[inline]
    pub fn merge(self, other: Self) -> Self {
        Self {
            lines: self.lines + other.lines,
            min_pivot: self.min_pivot.min(other.min_pivot),
        }
    }
}

impl Default for LineStats {
    fn default() -> Self {
        Self::EMPTY
    }
}

/// Pivot checks for one system of one line. Every pivot is checked; only
/// interior rows `1..=nz2` count towards the minimum, since the identity
/// boundary rows always pivot on 1.
struct Pivots {
    system: SystemKind,
    nz2: usize,
    min: f64,
}

impl Pivots {
    #[inline]
    fn check(&mut self, d: f64, k: usize) -> Result<(), SingularRow> {
        if d == 0.0 || !d.is_finite() {
            return Err(SingularRow {
                system: self.system,
                k,
                value: d,
            });
        }
        if (1..=self.nz2).contains(&k) {
            self.min = self.min.min(d.abs());
        }
        Ok(())
    }
}

/// Divide row `k` by its diagonal: super bands and residual components.
#[inline]
fn normalize_row(
    bands: &mut [Band],
    rhs: &mut [Residual],
    k: usize,
    comps: &Range<usize>,
    pivots: &mut Pivots,
) -> Result<(), SingularRow> {
    pivots.check(bands[k][DIAG], k)?;
    let fac1 = 1.0 / bands[k][DIAG];
    bands[k][SUPER] = fac1 * bands[k][SUPER];
    bands[k][SUPER_SUPER] = fac1 * bands[k][SUPER_SUPER];
    for m in comps.clone() {
        rhs[k][m] = fac1 * rhs[k][m];
    }
    Ok(())
}

fn forward_pass(
    bands: &mut [Band],
    rhs: &mut [Residual],
    comps: &Range<usize>,
    pivots: &mut Pivots,
) -> Result<(), SingularRow> {
    let nz2 = bands.len() - 2;
    for k in 1..=nz2 {
        let (k1, k2) = (k, k + 1);
        normalize_row(bands, rhs, k - 1, comps, pivots)?;
        let (u3, u4) = (bands[k - 1][SUPER], bands[k - 1][SUPER_SUPER]);

        let sub = bands[k1][SUB];
        bands[k1][DIAG] = bands[k1][DIAG] - sub * u3;
        bands[k1][SUPER] = bands[k1][SUPER] - sub * u4;
        for m in comps.clone() {
            rhs[k1][m] = rhs[k1][m] - sub * rhs[k - 1][m];
        }

        let sub_sub = bands[k2][SUB_SUB];
        bands[k2][SUB] = bands[k2][SUB] - sub_sub * u3;
        bands[k2][DIAG] = bands[k2][DIAG] - sub_sub * u4;
        for m in comps.clone() {
            rhs[k2][m] = rhs[k2][m] - sub_sub * rhs[k - 1][m];
        }
    }
    Ok(())
}

/// Reduce the last two rows and solve the last one outright.
fn closing_step(
    bands: &mut [Band],
    rhs: &mut [Residual],
    kind: SystemKind,
    pivots: &mut Pivots,
) -> Result<(), SingularRow> {
    let comps = kind.components();
    let k1 = bands.len() - 2;
    let k2 = k1 + 1;

    normalize_row(bands, rhs, k1, &comps, pivots)?;

    let sub = bands[k2][SUB];
    bands[k2][DIAG] = bands[k2][DIAG] - sub * bands[k1][SUPER];
    bands[k2][SUPER] = bands[k2][SUPER] - sub * bands[k1][SUPER_SUPER];
    for m in comps.clone() {
        rhs[k2][m] = rhs[k2][m] - sub * rhs[k1][m];
    }

    let diag = bands[k2][DIAG];
    pivots.check(diag, k2)?;
    let scaling = kind.last_row_scaling();
    for m in comps.clone() {
        rhs[k2][m] = scaling.apply(rhs[k2][m], diag);
    }

    for m in comps {
        rhs[k1][m] = rhs[k1][m] - bands[k1][SUPER] * rhs[k2][m];
    }
    Ok(())
}

fn backward_pass(bands: &[Band], rhs: &mut [Residual], comps: &Range<usize>) {
    let nz2 = bands.len() - 2;
    for k in (1..=nz2).rev() {
        let (k1, k2) = (k, k + 1);
        for m in comps.clone() {
            rhs[k - 1][m] = rhs[k - 1][m]
                - bands[k - 1][SUPER] * rhs[k1][m]
                - bands[k - 1][SUPER_SUPER] * rhs[k2][m];
        }
    }
}

/// Solve one system of one line in place.
///
/// `bands` and `rhs` hold all `nz2 + 2` rows of the line. On success the
/// residual components of `kind` hold the solution and the bands hold the
/// eliminated factors. Returns the smallest absolute pivot over the interior
/// rows.
pub fn solve_system(
    bands: &mut [Band],
    rhs: &mut [Residual],
    kind: SystemKind,
) -> Result<f64, SingularRow> {
    debug_assert!(bands.len() >= 3);
    debug_assert_eq!(bands.len(), rhs.len());

    let comps = kind.components();
    let mut pivots = Pivots {
        system: kind,
        nz2: bands.len() - 2,
        min: f64::INFINITY,
    };
    forward_pass(bands, rhs, &comps, &mut pivots)?;
    closing_step(bands, rhs, kind, &mut pivots)?;
    backward_pass(bands, rhs, &comps);
    Ok(pivots.min)
}

/// Mutable band rows of the three systems for one line.
pub struct LineSystems<'a> {
    pub base: &'a mut [Band],
    pub plus: &'a mut [Band],
    pub minus: &'a mut [Band],
}

impl LineSystems<'_> {
    fn get_mut(&mut self, kind: SystemKind) -> &mut [Band] {
        match kind {
            SystemKind::Base => &mut *self.base,
            SystemKind::PlusAcoustic => &mut *self.plus,
            SystemKind::MinusAcoustic => &mut *self.minus,
        }
    }
}

/// Build and solve all three systems of one line.
///
/// The boundary rows of `systems` must already carry the identity closure.
pub fn solve_line(
    snap: &LineSnapshot<'_>,
    mut systems: LineSystems<'_>,
    rhs: &mut [Residual],
    c: &SweepConstants,
) -> Result<LineStats, SingularRow> {
    build_line(snap, systems.base, systems.plus, systems.minus, c);

    let mut min_pivot = f64::INFINITY;
    for kind in SystemKind::ALL {
        let pivot = solve_system(systems.get_mut(kind), rhs, kind)?;
        min_pivot = min_pivot.min(pivot);
    }
    Ok(LineStats {
        lines: 1,
        min_pivot,
    })
}
