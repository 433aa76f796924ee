//! Boundary closure of the z-line systems.
//!
//! Rows `k = 0` and `k = nz2 + 1` of every line of every system are set to the
//! identity row `[0, 0, 1, 0, 0]`. Interior rows are left untouched; they are
//! rebuilt by the coefficient builder on every sweep.

use crate::storage::{Band, CoefficientSystems, SystemKind, IDENTITY_ROW};
use crate::types::Extents;

/// Close both boundary rows of a single line.
#[inline]
pub fn close_line(rows: &mut [Band]) {
    debug_assert!(rows.len() >= 3, "a line needs at least one interior row");
    let last = rows.len() - 1;
    rows[0] = IDENTITY_ROW;
    rows[last] = IDENTITY_ROW;
}

/// Close every line of all three systems.
pub fn apply_boundary_closure(systems: &mut CoefficientSystems, extents: &Extents) {
    let n_rows = extents.n_rows();
    for kind in SystemKind::ALL {
        for rows in systems.get_mut(kind).data.chunks_mut(n_rows) {
            close_line(rows);
        }
    }
}

/// Parallel boundary closure. Lines are distributed over the rayon pool.
#[cfg(feature = "parallel")]
pub fn apply_boundary_closure_parallel(systems: &mut CoefficientSystems, extents: &Extents) {
    use rayon::prelude::*;

    let n_rows = extents.n_rows();
    for kind in SystemKind::ALL {
        systems
            .get_mut(kind)
            .data
            .par_chunks_mut(n_rows)
            .for_each(close_line);
    }
}

/// Whether every line of every system carries the identity closure.
pub fn is_closed(systems: &CoefficientSystems, extents: &Extents) -> bool {
    let n_rows = extents.n_rows();
    SystemKind::ALL.iter().all(|&kind| {
        systems
            .get(kind)
            .data
            .chunks(n_rows)
            .all(|rows| rows[0] == IDENTITY_ROW && rows[n_rows - 1] == IDENTITY_ROW)
    })
}
