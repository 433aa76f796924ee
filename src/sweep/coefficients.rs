//! Coefficient builder for the three z-line systems.
//!
//! For every interior row `k` the base system gets
//!
//! ```text
//! [0] = 0
//! [1] = -dttz2·w(k-1) - dttz1·rhos1(k-1)
//! [2] = 1 + c2dttz1·rhos1(k)
//! [3] =  dttz2·w(k+1) - dttz1·rhos1(k+1)
//! [4] = 0
//! ```
//!
//! followed by the fourth-difference dissipation stencil of [`StencilRow`].
//! The acoustic systems shift the sub and super bands by `∓dttz2·c` where `c`
//! is the neighbouring speed of sound.

use crate::constants::SweepConstants;
use crate::storage::{Band, LineSnapshot, DIAG, SUB, SUB_SUB, SUPER, SUPER_SUPER};

/// Viscosity-weighted bound on the effective diffusion coefficient of a cell.
///
/// ```text
/// ru1   = c3c4 · (1/ρ)
/// rhos1 = max(dz4 + con43·ru1, dz5 + c1c5·ru1, dzmax + ru1, dz1)
/// ```
#[inline]
pub fn viscous_bound(rho_i: f64, c: &SweepConstants) -> f64 {
    let ru1 = c.c3c4 * rho_i;
    f64::max(
        f64::max(c.dz4 + c.con43 * ru1, c.dz5 + c.c1c5 * ru1),
        f64::max(c.dzmax + ru1, c.dz1),
    )
}

/// Dissipation stencil variant applied to an interior row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StencilRow {
    /// `k == 1`: one-sided stencil next to the lower boundary.
    First,
    /// `k == 2`
    Second,
    /// `k == nz2 - 1`
    Penultimate,
    /// `k == nz2`: one-sided stencil next to the upper boundary.
    Last,
    /// Centred five-point stencil.
    Interior,
}

impl StencilRow {
    /// Classify row `k` of a line with `nz2` interior rows.
    ///
    /// The first match wins, so on short lines the lower-boundary variants
    /// take precedence (with `nz2 == 2`, row 1 is `First` and row 2 is `Second`).
    pub fn classify(k: usize, nz2: usize) -> Self {
        if k == 1 {
            Self::First
        } else if k == 2 {
            Self::Second
        } else if k + 1 == nz2 {
            Self::Penultimate
        } else if k == nz2 {
            Self::Last
        } else {
            Self::Interior
        }
    }

    /// Add the stencil weights to a base row.
    #[inline]
    pub fn apply(self, row: &mut Band, c: &SweepConstants) {
        match self {
            Self::First => {
                row[DIAG] = row[DIAG] + c.comz5;
                row[SUPER] = row[SUPER] - c.comz4;
                row[SUPER_SUPER] = row[SUPER_SUPER] + c.comz1;
            }
            Self::Second => {
                row[SUB] = row[SUB] - c.comz4;
                row[DIAG] = row[DIAG] + c.comz6;
                row[SUPER] = row[SUPER] - c.comz4;
                row[SUPER_SUPER] = row[SUPER_SUPER] + c.comz1;
            }
            Self::Penultimate => {
                row[SUB_SUB] = row[SUB_SUB] + c.comz1;
                row[SUB] = row[SUB] - c.comz4;
                row[DIAG] = row[DIAG] + c.comz6;
                row[SUPER] = row[SUPER] - c.comz4;
            }
            Self::Last => {
                row[SUB_SUB] = row[SUB_SUB] + c.comz1;
                row[SUB] = row[SUB] - c.comz4;
                row[DIAG] = row[DIAG] + c.comz5;
            }
            Self::Interior => {
                row[SUB_SUB] = row[SUB_SUB] + c.comz1;
                row[SUB] = row[SUB] - c.comz4;
                row[DIAG] = row[DIAG] + c.comz6;
                row[SUPER] = row[SUPER] - c.comz4;
                row[SUPER_SUPER] = row[SUPER_SUPER] + c.comz1;
            }
        }
    }
}

/// Base-system row `k` of a line, dissipation stencil included.
#[inline]
pub fn base_row(snap: &LineSnapshot<'_>, k: usize, nz2: usize, c: &SweepConstants) -> Band {
    let mut row = [0.0; 5];
    row[SUB] = -c.dttz2 * snap.ws[k - 1] - c.dttz1 * viscous_bound(snap.rho_i[k - 1], c);
    row[DIAG] = 1.0 + c.c2dttz1 * viscous_bound(snap.rho_i[k], c);
    row[SUPER] = c.dttz2 * snap.ws[k + 1] - c.dttz1 * viscous_bound(snap.rho_i[k + 1], c);

    StencilRow::classify(k, nz2).apply(&mut row, c);
    row
}

/// Acoustic rows derived from a base row: `(plus, minus)`.
#[inline]
pub fn acoustic_rows(
    base: &Band,
    speed_below: f64,
    speed_above: f64,
    c: &SweepConstants,
) -> (Band, Band) {
    let plus = [
        base[SUB_SUB],
        base[SUB] - c.dttz2 * speed_below,
        base[DIAG],
        base[SUPER] + c.dttz2 * speed_above,
        base[SUPER_SUPER],
    ];
    let minus = [
        base[SUB_SUB],
        base[SUB] + c.dttz2 * speed_below,
        base[DIAG],
        base[SUPER] - c.dttz2 * speed_above,
        base[SUPER_SUPER],
    ];
    (plus, minus)
}

/// Build the interior rows `1..=nz2` of all three systems for one line.
///
/// Boundary rows are not touched.
pub fn build_line(
    snap: &LineSnapshot<'_>,
    base: &mut [Band],
    plus: &mut [Band],
    minus: &mut [Band],
    c: &SweepConstants,
) {
    let nz2 = snap.n_rows() - 2;
    debug_assert_eq!(base.len(), snap.n_rows());
    debug_assert_eq!(plus.len(), snap.n_rows());
    debug_assert_eq!(minus.len(), snap.n_rows());

    for k in 1..=nz2 {
        let row = base_row(snap, k, nz2, c);
        let (p, m) = acoustic_rows(&row, snap.speed[k - 1], snap.speed[k + 1], c);
        base[k] = row;
        plus[k] = p;
        minus[k] = m;
    }
}
