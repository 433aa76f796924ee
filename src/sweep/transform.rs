//! Characteristic-to-conservative transform of the solved residual.
//!
//! After elimination the residual holds characteristic increments (entropy,
//! two shear, two acoustic). Multiplying by the local right-eigenvector matrix
//! of the z flux Jacobian gives conservative-variable increments:
//!
//! ```text
//! t1 = (β·u0 / c)·(r4 + r5)
//! t2 = r3 + t1
//! t3 = β·u0·(r4 - r5)
//!
//! out0 = t2
//! out1 = -u0·r2 + u·t2
//! out2 =  u0·r1 + v·t2
//! out3 =  w·t2 + t3
//! out4 =  u0·(-u·r2 + v·r1) + qs·t2 + γ·c²·t1 + w·t3
//! ```
//!
//! The transform is pointwise and linear in the residual.

use crate::constants::SweepConstants;
use crate::storage::{FieldStore, LineSnapshot, Residual};
use crate::types::LineIndex;

/// Local flow state entering the transform of one cell.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CellState {
    pub xvel: f64,
    pub yvel: f64,
    pub zvel: f64,
    /// Speed of sound
    pub ac: f64,
    /// First conservative variable
    pub u0: f64,
    /// Kinetic-energy term
    pub qs: f64,
}

impl CellState {
    /// State of row `k` of a line snapshot.
    #[inline]
    pub fn from_snapshot(snap: &LineSnapshot<'_>, k: usize) -> Self {
        Self {
            xvel: snap.us[k],
            yvel: snap.vs[k],
            zvel: snap.ws[k],
            ac: snap.speed[k],
            u0: snap.u0[k],
            qs: snap.qs[k],
        }
    }
}

/// Transform one residual from characteristic to conservative form.
#[inline]
pub fn characteristic_to_conservative(
    r: &Residual,
    cell: &CellState,
    c: &SweepConstants,
) -> Residual {
    let [r1, r2, r3, r4, r5] = *r;
    let ac2u = cell.ac * cell.ac;
    let btuz = c.bt * cell.u0;

    let t1 = btuz / cell.ac * (r4 + r5);
    let t2 = r3 + t1;
    let t3 = btuz * (r4 - r5);

    [
        t2,
        -cell.u0 * r2 + cell.xvel * t2,
        cell.u0 * r1 + cell.yvel * t2,
        cell.zvel * t2 + t3,
        cell.u0 * (-cell.xvel * r2 + cell.yvel * r1)
            + cell.qs * t2
            + c.c2iv * ac2u * t1
            + cell.zvel * t3,
    ]
}

/// Transform the interior rows `1..=nz2` of one line in place.
pub fn transform_line(snap: &LineSnapshot<'_>, rhs: &mut [Residual], c: &SweepConstants) {
    let nz2 = snap.n_rows() - 2;
    for k in 1..=nz2 {
        let cell = CellState::from_snapshot(snap, k);
        rhs[k] = characteristic_to_conservative(&rhs[k], &cell, c);
    }
}

/// Transform every interior cell of the field.
pub fn apply_characteristic_transform(fields: &mut FieldStore, c: &SweepConstants) {
    let n_rows = fields.extents().n_rows();
    let primitives = &fields.primitives;
    for (l, rhs) in fields.rhs.chunks_mut(n_rows).enumerate() {
        transform_line(&primitives.line(LineIndex::new(l)), rhs, c);
    }
}

/// Parallel transform over lines.
#[cfg(feature = "parallel")]
pub fn apply_characteristic_transform_parallel(fields: &mut FieldStore, c: &SweepConstants) {
    use rayon::prelude::*;

    let n_rows = fields.extents().n_rows();
    let primitives = &fields.primitives;
    fields
        .rhs
        .par_chunks_mut(n_rows)
        .enumerate()
        .for_each(|(l, rhs)| transform_line(&primitives.line(LineIndex::new(l)), rhs, c));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::FlowState;
    use crate::types::Extents;
    use approx::assert_relative_eq;

    fn moving_cell() -> CellState {
        CellState {
            xvel: 0.3,
            yvel: -0.2,
            zvel: 0.7,
            ac: 1.3,
            u0: 1.1,
            qs: 0.5 * (0.09 + 0.04 + 0.49),
        }
    }

    #[test]
    fn test_zero_in_zero_out() {
        let c = SweepConstants::default();
        let out = characteristic_to_conservative(&[0.0; 5], &moving_cell(), &c);
        assert_eq!(out, [0.0; 5]);
    }

    #[test]
    fn test_entropy_wave_at_rest() {
        // Only r3 set, fluid at rest: pure density perturbation
        let c = SweepConstants::default();
        let cell = CellState {
            xvel: 0.0,
            yvel: 0.0,
            zvel: 0.0,
            ac: 1.0,
            u0: 1.0,
            qs: 0.0,
        };
        let out = characteristic_to_conservative(&[0.0, 0.0, 2.0, 0.0, 0.0], &cell, &c);
        assert_eq!(out, [2.0, 0.0, 0.0, 0.0, 0.0]);
    }

    #[test]
    fn test_acoustic_pair_at_rest() {
        let c = SweepConstants::default();
        let cell = CellState {
            xvel: 0.0,
            yvel: 0.0,
            zvel: 0.0,
            ac: 2.0,
            u0: 1.0,
            qs: 0.0,
        };
        let out = characteristic_to_conservative(&[0.0, 0.0, 0.0, 1.0, 1.0], &cell, &c);
        let t1 = c.bt / 2.0 * 2.0;
        assert_relative_eq!(out[0], t1, epsilon = 1e-15);
        assert_eq!(out[3], 0.0);
        assert_relative_eq!(out[4], c.c2iv * 4.0 * t1, epsilon = 1e-14);
    }

    #[test]
    fn test_linearity() {
        let c = SweepConstants::default();
        let cell = moving_cell();
        let r = [0.4, -1.2, 0.9, 2.5, -0.3];
        let doubled = r.map(|v| 2.0 * v);

        let once = characteristic_to_conservative(&r, &cell, &c);
        let twice = characteristic_to_conservative(&doubled, &cell, &c);
        for m in 0..5 {
            assert_relative_eq!(twice[m], 2.0 * once[m], epsilon = 1e-14, max_relative = 1e-14);
        }
    }

    #[test]
    fn test_transform_skips_ghost_rows() {
        let ext = Extents::new(2, 1, 3).unwrap();
        let mut store = FieldStore::uniform(ext, FlowState::at_rest(1.0, 1.0));
        store.set_residual_from(|_, _, _| [0.0, 0.0, 1.0, 0.0, 0.0]);
        let c = SweepConstants::default();
        apply_characteristic_transform(&mut store, &c);

        assert_eq!(store.residual(1, 1, 0), &[0.0, 0.0, 1.0, 0.0, 0.0]);
        assert_eq!(store.residual(2, 1, 4), &[0.0, 0.0, 1.0, 0.0, 0.0]);
        assert_eq!(store.residual(2, 1, 2), &[1.0, 0.0, 0.0, 0.0, 0.0]);
    }

    #[test]
    #[cfg(feature = "parallel")]
    fn test_parallel_matches_serial() {
        let ext = Extents::new(4, 3, 5).unwrap();
        let mut serial = FieldStore::uniform(
            ext,
            FlowState {
                rho: 1.2,
                u: 0.1,
                v: 0.2,
                w: -0.3,
                speed: 1.1,
            },
        );
        serial.set_residual_from(|i, j, k| {
            let s = (i + 2 * j + 3 * k) as f64;
            [s, -s, 0.5 * s, 1.0 / (s + 1.0), 2.0]
        });
        let mut parallel = serial.clone();
        let c = SweepConstants::default();

        apply_characteristic_transform(&mut serial, &c);
        apply_characteristic_transform_parallel(&mut parallel, &c);
        assert_eq!(serial.rhs, parallel.rhs);
    }
}
