//! Primitive snapshot and residual field.
//!
//! [`FieldStore`] is the sweep's view of the flow field: a read-only
//! [`Primitives`] snapshot refreshed by the caller before each sweep, and the
//! read-write residual. The residual enters a sweep as the right-hand side of
//! the three banded systems and leaves it as the conservative-variable
//! increment.

use crate::error::{Result, SweepError};
use crate::types::{Extents, LineIndex};

/// Five-component residual of one cell.
pub type Residual = [f64; 5];

/// A uniform flow state used to fill a [`FieldStore`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FlowState {
    /// Density
    pub rho: f64,
    /// Velocity along x
    pub u: f64,
    /// Velocity along y
    pub v: f64,
    /// Velocity along z
    pub w: f64,
    /// Speed of sound
    pub speed: f64,
}

impl FlowState {
    /// Fluid at rest with the given density and sound speed.
    pub fn at_rest(rho: f64, speed: f64) -> Self {
        Self {
            rho,
            u: 0.0,
            v: 0.0,
            w: 0.0,
            speed,
        }
    }

    /// Kinetic-energy term `0.5·(u² + v² + w²)`.
    #[inline]
    pub fn qs(&self) -> f64 {
        0.5 * (self.u * self.u + self.v * self.v + self.w * self.w)
    }
}

impl Default for FlowState {
    fn default() -> Self {
        Self::at_rest(1.0, 1.0)
    }
}

/// Per-cell primitive variables, line-contiguous.
///
/// Index with `line * n_rows + k`; see [`Primitives::offset`].
#[derive(Clone, Debug, PartialEq)]
pub struct Primitives {
    /// Density reciprocal `1/ρ`
    pub rho_i: Vec<f64>,
    /// Velocity along x
    pub us: Vec<f64>,
    /// Velocity along y
    pub vs: Vec<f64>,
    /// Velocity along z
    pub ws: Vec<f64>,
    /// Speed of sound
    pub speed: Vec<f64>,
    /// Kinetic-energy term
    pub qs: Vec<f64>,
    /// First conservative variable (density)
    pub u0: Vec<f64>,
    /// Rows per line (`nz2 + 2`)
    pub n_rows: usize,
}

/// Read-only view of the primitive variables along one z-line.
///
/// Every slice has `nz2 + 2` entries, indexed by row `k`.
#[derive(Clone, Copy, Debug)]
pub struct LineSnapshot<'a> {
    pub rho_i: &'a [f64],
    pub us: &'a [f64],
    pub vs: &'a [f64],
    pub ws: &'a [f64],
    pub speed: &'a [f64],
    pub qs: &'a [f64],
    pub u0: &'a [f64],
}

impl<'a> LineSnapshot<'a> {
    /// Rows in the line.
    #[inline]
    pub fn n_rows(&self) -> usize {
        self.rho_i.len()
    }
}

impl Primitives {
    fn filled(n_cells: usize, n_rows: usize, state: FlowState) -> Self {
        Self {
            rho_i: vec![1.0 / state.rho; n_cells],
            us: vec![state.u; n_cells],
            vs: vec![state.v; n_cells],
            ws: vec![state.w; n_cells],
            speed: vec![state.speed; n_cells],
            qs: vec![state.qs(); n_cells],
            u0: vec![state.rho; n_cells],
            n_rows,
        }
    }

    /// Flat offset of row `k` of a line.
    #[inline]
    pub fn offset(&self, line: LineIndex, k: usize) -> usize {
        line.get() * self.n_rows + k
    }

    /// Borrow the primitive variables of one line.
    pub fn line(&self, line: LineIndex) -> LineSnapshot<'_> {
        let start = line.get() * self.n_rows;
        let range = start..start + self.n_rows;
        LineSnapshot {
            rho_i: &self.rho_i[range.clone()],
            us: &self.us[range.clone()],
            vs: &self.vs[range.clone()],
            ws: &self.ws[range.clone()],
            speed: &self.speed[range.clone()],
            qs: &self.qs[range.clone()],
            u0: &self.u0[range],
        }
    }

    /// Set the primitive state of a single cell.
    pub fn set_cell(&mut self, line: LineIndex, k: usize, state: FlowState) {
        let idx = self.offset(line, k);
        self.rho_i[idx] = 1.0 / state.rho;
        self.us[idx] = state.u;
        self.vs[idx] = state.v;
        self.ws[idx] = state.w;
        self.speed[idx] = state.speed;
        self.qs[idx] = state.qs();
        self.u0[idx] = state.rho;
    }

    fn arrays(&self) -> [(&'static str, usize); 7] {
        [
            ("rho_i", self.rho_i.len()),
            ("us", self.us.len()),
            ("vs", self.vs.len()),
            ("ws", self.ws.len()),
            ("speed", self.speed.len()),
            ("qs", self.qs.len()),
            ("u0", self.u0.len()),
        ]
    }
}

/// Per-cell state consumed and produced by a z-sweep.
#[derive(Clone, Debug, PartialEq)]
pub struct FieldStore {
    /// Read-only primitive snapshot
    pub primitives: Primitives,
    /// Residual (right-hand side on entry, increment on exit)
    pub rhs: Vec<Residual>,
    extents: Extents,
}

impl FieldStore {
    /// Fluid at rest with unit density and sound speed, zero residual.
    pub fn new(extents: Extents) -> Self {
        Self::uniform(extents, FlowState::default())
    }

    /// Uniform flow state everywhere (ghost rows included), zero residual.
    pub fn uniform(extents: Extents, state: FlowState) -> Self {
        let n_cells = extents.n_cells();
        Self {
            primitives: Primitives::filled(n_cells, extents.n_rows(), state),
            rhs: vec![[0.0; 5]; n_cells],
            extents,
        }
    }

    /// Extents this store was allocated for.
    #[inline]
    pub fn extents(&self) -> &Extents {
        &self.extents
    }

    /// Flat offset of cell `(i, j, k)` with 1-based `i`, `j` and `k ∈ [0, nz2+1]`.
    #[inline]
    pub fn offset(&self, i: usize, j: usize, k: usize) -> usize {
        self.primitives.offset(self.extents.line_index(i, j), k)
    }

    /// Residual of cell `(i, j, k)`.
    #[inline]
    pub fn residual(&self, i: usize, j: usize, k: usize) -> &Residual {
        &self.rhs[self.offset(i, j, k)]
    }

    /// Mutable residual of cell `(i, j, k)`.
    #[inline]
    pub fn residual_mut(&mut self, i: usize, j: usize, k: usize) -> &mut Residual {
        let idx = self.offset(i, j, k);
        &mut self.rhs[idx]
    }

    /// Residual rows of one line.
    pub fn line_residual(&self, line: LineIndex) -> &[Residual] {
        let start = line.get() * self.extents.n_rows();
        &self.rhs[start..start + self.extents.n_rows()]
    }

    /// Fill the residual from a function of `(i, j, k)`.
    pub fn set_residual_from(&mut self, mut f: impl FnMut(usize, usize, usize) -> Residual) {
        let ext = self.extents;
        for line in ext.lines() {
            let (i, j) = ext.line_coords(line);
            for k in 0..ext.n_rows() {
                let idx = self.primitives.offset(line, k);
                self.rhs[idx] = f(i, j, k);
            }
        }
    }

    /// Verify every array against the extents a sweep will run on.
    pub fn check_extents(&self, extents: &Extents) -> Result<()> {
        if self.extents != *extents {
            return Err(SweepError::dimension_mismatch(
                "field store",
                extents.to_string(),
                self.extents.to_string(),
            ));
        }
        if self.primitives.n_rows != extents.n_rows() {
            return Err(SweepError::dimension_mismatch(
                "primitives.n_rows",
                extents.n_rows().to_string(),
                self.primitives.n_rows.to_string(),
            ));
        }
        let n_cells = extents.n_cells();
        if self.rhs.len() != n_cells {
            return Err(SweepError::dimension_mismatch(
                "rhs",
                n_cells.to_string(),
                self.rhs.len().to_string(),
            ));
        }
        for (name, len) in self.primitives.arrays() {
            if len != n_cells {
                return Err(SweepError::dimension_mismatch(
                    name,
                    n_cells.to_string(),
                    len.to_string(),
                ));
            }
        }
        Ok(())
    }

    /// Maximum absolute residual component over interior cells.
    pub fn residual_max_abs(&self) -> f64 {
        let nz2 = self.extents.nz2();
        self.rhs
            .chunks(self.extents.n_rows())
            .flat_map(|line| line[1..=nz2].iter())
            .flat_map(|r| r.iter())
            .map(|v| v.abs())
            .fold(0.0, f64::max)
    }

    /// Whether every interior residual component is finite.
    pub fn residual_is_finite(&self) -> bool {
        let nz2 = self.extents.nz2();
        self.rhs
            .chunks(self.extents.n_rows())
            .flat_map(|line| line[1..=nz2].iter())
            .all(|r| r.iter().all(|v| v.is_finite()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_uniform_store() {
        let ext = Extents::new(2, 3, 4).unwrap();
        let state = FlowState {
            rho: 2.0,
            u: 1.0,
            v: 2.0,
            w: 2.0,
            speed: 3.0,
        };
        let store = FieldStore::uniform(ext, state);
        assert_eq!(store.rhs.len(), 6 * 6);
        assert_eq!(store.primitives.rho_i[0], 0.5);
        assert_eq!(store.primitives.u0[5], 2.0);
        assert_relative_eq!(store.primitives.qs[3], 4.5, epsilon = 1e-15);
        assert!(store.check_extents(&ext).is_ok());
    }

    #[test]
    fn test_line_snapshot() {
        let ext = Extents::new(2, 2, 3).unwrap();
        let mut store = FieldStore::new(ext);
        let line = ext.line_index(1, 2);
        store
            .primitives
            .set_cell(line, 2, FlowState::at_rest(4.0, 0.5));

        let snap = store.primitives.line(line);
        assert_eq!(snap.n_rows(), 5);
        assert_eq!(snap.rho_i[2], 0.25);
        assert_eq!(snap.speed[2], 0.5);
        assert_eq!(snap.rho_i[1], 1.0);
    }

    #[test]
    fn test_residual_access() {
        let ext = Extents::new(3, 2, 2).unwrap();
        let mut store = FieldStore::new(ext);
        store.residual_mut(3, 2, 1)[4] = -7.5;
        assert_eq!(store.residual(3, 2, 1)[4], -7.5);
        assert_eq!(store.residual_max_abs(), 7.5);
        assert!(store.residual_is_finite());

        store.residual_mut(1, 1, 2)[0] = f64::NAN;
        assert!(!store.residual_is_finite());
    }

    #[test]
    fn test_ghost_rows_ignored_by_diagnostics() {
        let ext = Extents::new(1, 1, 2).unwrap();
        let mut store = FieldStore::new(ext);
        store.residual_mut(1, 1, 0)[0] = f64::INFINITY;
        store.residual_mut(1, 1, 3)[0] = 100.0;
        assert!(store.residual_is_finite());
        assert_eq!(store.residual_max_abs(), 0.0);
    }

    #[test]
    fn test_set_residual_from() {
        let ext = Extents::new(2, 2, 2).unwrap();
        let mut store = FieldStore::new(ext);
        store.set_residual_from(|i, j, k| [i as f64, j as f64, k as f64, 0.0, 1.0]);
        assert_eq!(store.residual(2, 1, 3), &[2.0, 1.0, 3.0, 0.0, 1.0]);
    }

    #[test]
    fn test_check_extents_mismatch() {
        let ext = Extents::new(2, 2, 2).unwrap();
        let mut store = FieldStore::new(ext);
        store.primitives.speed.pop();
        let err = store.check_extents(&ext).unwrap_err();
        assert!(err.to_string().contains("speed"));

        let other = Extents::new(2, 2, 3).unwrap();
        assert!(FieldStore::new(ext).check_extents(&other).is_err());
    }

    #[test]
    fn test_check_extents_row_stride() {
        let ext = Extents::new(2, 2, 4).unwrap();
        let mut store = FieldStore::new(ext);
        store.primitives.n_rows = 3;

        let err = store.check_extents(&ext).unwrap_err();
        assert_eq!(
            err,
            SweepError::DimensionMismatch {
                what: "primitives.n_rows",
                expected: "6".to_string(),
                actual: "3".to_string(),
            }
        );
        assert!(err.is_configuration());
    }
}
