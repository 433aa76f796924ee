//! Execution contexts for the bulk-parallel sweep stages.
//!
//! A context runs the three stages that iterate over independent z-lines:
//! boundary closure, coefficient build plus elimination, and the
//! characteristic transform. [`SerialContext`] is the reference.
//! [`ParallelContext`] distributes lines over the rayon pool and produces
//! bit-identical results because every line is solved by the same sequential
//! routine.
//!
//! A context whose [`memory_space`](ExecutionContext::memory_space) is
//! [`MemorySpace::Separate`] writes into its own copy of the coefficient
//! storage. The driver then has to [`synchronize`](super::synchronize) that
//! copy into the solver's storage before elimination may start.
//!
//! # Example
//!
//! ```
//! use sp_rs::sweep::{ExecutionContext, MemorySpace, SerialContext, StagedClosure};
//!
//! let staged = StagedClosure::new(SerialContext);
//! assert_eq!(SerialContext.memory_space(), MemorySpace::Shared);
//! assert_eq!(staged.memory_space(), MemorySpace::Separate);
//! ```

use crate::constants::SweepConstants;
use crate::error::Result;
use crate::storage::{CoefficientSystems, FieldStore};
use crate::types::{Extents, LineIndex};

use super::boundary::apply_boundary_closure;
use super::elimination::{solve_line, LineStats, LineSystems};
use super::transform::apply_characteristic_transform;

/// Where a context keeps the coefficient storage it writes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MemorySpace {
    /// Writes land directly in the caller's storage.
    Shared,
    /// Writes land in a staging copy that must be transferred.
    Separate,
}

/// A backend for the line-parallel stages of a z-sweep.
pub trait ExecutionContext: Send + Sync {
    /// Short name used in log output.
    fn name(&self) -> &'static str;

    /// Memory space the context writes into.
    fn memory_space(&self) -> MemorySpace {
        MemorySpace::Shared
    }

    /// Set the boundary rows of every line of every system to the identity row.
    fn compute_boundary_closure(&self, systems: &mut CoefficientSystems, extents: &Extents);

    /// Build the interior rows and solve all three systems of every line.
    ///
    /// `systems` must already be closed. On success the residual of `fields`
    /// holds the characteristic solution.
    fn compute_elimination(
        &self,
        systems: &mut CoefficientSystems,
        fields: &mut FieldStore,
        constants: &SweepConstants,
    ) -> Result<LineStats>;

    /// Convert the solved residual to conservative increments.
    fn compute_transform(&self, fields: &mut FieldStore, constants: &SweepConstants);
}

/// Single-threaded reference context.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SerialContext;

impl ExecutionContext for SerialContext {
    fn name(&self) -> &'static str {
        "serial"
    }

    fn compute_boundary_closure(&self, systems: &mut CoefficientSystems, extents: &Extents) {
        apply_boundary_closure(systems, extents);
    }

    fn compute_elimination(
        &self,
        systems: &mut CoefficientSystems,
        fields: &mut FieldStore,
        constants: &SweepConstants,
    ) -> Result<LineStats> {
        let extents = *fields.extents();
        let n_rows = extents.n_rows();
        let CoefficientSystems { base, plus, minus } = systems;
        let primitives = &fields.primitives;

        let lines = base
            .data
            .chunks_mut(n_rows)
            .zip(plus.data.chunks_mut(n_rows))
            .zip(minus.data.chunks_mut(n_rows))
            .zip(fields.rhs.chunks_mut(n_rows))
            .enumerate();

        let mut stats = LineStats::EMPTY;
        for (l, (((base, plus), minus), rhs)) in lines {
            let line = LineIndex::new(l);
            let line_stats = solve_line(
                &primitives.line(line),
                LineSystems { base, plus, minus },
                rhs,
                constants,
            )
            .map_err(|e| e.into_error(line, &extents))?;
            stats = stats.merge(line_stats);
        }
        Ok(stats)
    }

    fn compute_transform(&self, fields: &mut FieldStore, constants: &SweepConstants) {
        apply_characteristic_transform(fields, constants);
    }
}

/// Line-parallel context on the global rayon pool.
///
/// When several lines fail, which one is reported depends on scheduling.
#[cfg(feature = "parallel")]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ParallelContext;

#[cfg(feature = "parallel")]
impl ExecutionContext for ParallelContext {
    fn name(&self) -> &'static str {
        "parallel"
    }

    fn compute_boundary_closure(&self, systems: &mut CoefficientSystems, extents: &Extents) {
        super::boundary::apply_boundary_closure_parallel(systems, extents);
    }

    fn compute_elimination(
        &self,
        systems: &mut CoefficientSystems,
        fields: &mut FieldStore,
        constants: &SweepConstants,
    ) -> Result<LineStats> {
        use rayon::prelude::*;

        let extents = *fields.extents();
        let n_rows = extents.n_rows();
        let CoefficientSystems { base, plus, minus } = systems;
        let primitives = &fields.primitives;

        base.data
            .par_chunks_mut(n_rows)
            .zip(plus.data.par_chunks_mut(n_rows))
            .zip(minus.data.par_chunks_mut(n_rows))
            .zip(fields.rhs.par_chunks_mut(n_rows))
            .enumerate()
            .map(|(l, (((base, plus), minus), rhs))| {
                let line = LineIndex::new(l);
                solve_line(
                    &primitives.line(line),
                    LineSystems { base, plus, minus },
                    rhs,
                    constants,
                )
                .map_err(|e| e.into_error(line, &extents))
            })
            .try_reduce(LineStats::default, |a, b| Ok(a.merge(b)))
    }

    fn compute_transform(&self, fields: &mut FieldStore, constants: &SweepConstants) {
        super::transform::apply_characteristic_transform_parallel(fields, constants);
    }
}

/// Wraps a context so that it writes into a staging copy of the coefficient
/// storage, as an accelerator with its own memory would.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StagedClosure<C> {
    inner: C,
}

impl<C: ExecutionContext> StagedClosure<C> {
    pub fn new(inner: C) -> Self {
        Self { inner }
    }

    /// The wrapped context.
    pub fn inner(&self) -> &C {
        &self.inner
    }
}

impl<C: ExecutionContext> ExecutionContext for StagedClosure<C> {
    fn name(&self) -> &'static str {
        "staged"
    }

    fn memory_space(&self) -> MemorySpace {
        MemorySpace::Separate
    }

    fn compute_boundary_closure(&self, systems: &mut CoefficientSystems, extents: &Extents) {
        self.inner.compute_boundary_closure(systems, extents);
    }

    fn compute_elimination(
        &self,
        systems: &mut CoefficientSystems,
        fields: &mut FieldStore,
        constants: &SweepConstants,
    ) -> Result<LineStats> {
        self.inner.compute_elimination(systems, fields, constants)
    }

    fn compute_transform(&self, fields: &mut FieldStore, constants: &SweepConstants) {
        self.inner.compute_transform(fields, constants);
    }
}

/// Context used by [`run_z_sweep`](super::run_z_sweep).
#[cfg(feature = "parallel")]
pub type DefaultContext = ParallelContext;

/// Context used by [`run_z_sweep`](super::run_z_sweep).
#[cfg(not(feature = "parallel"))]
pub type DefaultContext = SerialContext;
