//! The z-sweep driver.
//!
//! [`ZSweep`] chains the four stages:
//!
//! 1. boundary closure, in the closure context's memory space
//! 2. synchronization into the solver's storage, when that space is separate
//! 3. coefficient build and elimination per line
//! 4. characteristic transform
//!
//! All storage is validated against the driver's extents before any stage runs.

use tracing::{debug, debug_span, warn};

use crate::constants::SweepConstants;
use crate::error::Result;
use crate::storage::{CoefficientSystems, FieldStore};
use crate::types::Extents;

use super::context::{DefaultContext, ExecutionContext, MemorySpace};
use super::sync::{synchronize, SyncReceipt};

/// Summary of one completed z-sweep.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SweepReport {
    /// Lines solved
    pub lines: usize,
    /// Rows per line, boundary rows included
    pub rows_per_line: usize,
    /// Smallest absolute pivot over interior rows
    pub min_pivot: f64,
    /// Staged transfer, if the closure ran in a separate memory space
    pub transfer: Option<SyncReceipt>,
}

impl SweepReport {
    /// Whether the closure result had to be transferred.
    pub fn transferred(&self) -> bool {
        self.transfer.is_some()
    }
}

/// A reusable z-sweep over fixed extents.
///
/// # Example
///
/// ```
/// use sp_rs::sweep::{SerialContext, ZSweep};
/// use sp_rs::{CoefficientSystems, Extents, FieldStore, SweepConstants};
///
/// let ext = Extents::cube(4).unwrap();
/// let mut fields = FieldStore::new(ext);
/// let mut systems = CoefficientSystems::new(&ext);
/// let mut sweep = ZSweep::new(ext, SerialContext, SerialContext);
///
/// let report = sweep.run(&mut fields, &mut systems, &SweepConstants::default()).unwrap();
/// assert_eq!(report.lines, 16);
/// assert!(!report.transferred());
/// ```
#[derive(Debug, Clone)]
pub struct ZSweep<C, S = C> {
    extents: Extents,
    closure: C,
    solver: S,
    staging: Option<CoefficientSystems>,
}

impl<C: ExecutionContext, S: ExecutionContext> ZSweep<C, S> {
    /// Create a driver. Staging storage is allocated here when the closure
    /// context writes into a separate memory space.
    pub fn new(extents: Extents, closure: C, solver: S) -> Self {
        let staging = match closure.memory_space() {
            MemorySpace::Separate => Some(CoefficientSystems::new(&extents)),
            MemorySpace::Shared => None,
        };
        Self {
            extents,
            closure,
            solver,
            staging,
        }
    }

    pub fn extents(&self) -> &Extents {
        &self.extents
    }

    /// Run one sweep.
    ///
    /// On success the residual of `fields` holds the conservative-variable
    /// increment of the z-direction implicit correction.
    ///
    /// # Errors
    ///
    /// Configuration errors (mismatched storage, invalid constants) are
    /// returned before any storage is written. A singular pivot aborts the
    /// sweep, leaving the residual partially solved.
    pub fn run(
        &mut self,
        fields: &mut FieldStore,
        systems: &mut CoefficientSystems,
        constants: &SweepConstants,
    ) -> Result<SweepReport> {
        let extents = self.extents;
        fields.check_extents(&extents)?;
        systems.check_extents(&extents)?;
        constants.validate()?;

        let span = debug_span!(
            "z_sweep",
            %extents,
            closure = self.closure.name(),
            solver = self.solver.name()
        );
        let _enter = span.enter();

        let transfer = match self.staging.as_mut() {
            Some(staging) => {
                self.closure.compute_boundary_closure(staging, &extents);
                let receipt = synchronize(staging, systems)?;
                receipt.verify(systems)?;
                debug!(
                    rows = receipt.rows,
                    bytes = receipt.bytes,
                    "boundary closure synchronized"
                );
                Some(receipt)
            }
            None => {
                self.closure.compute_boundary_closure(systems, &extents);
                debug!("boundary closure applied");
                None
            }
        };

        let stats = match self.solver.compute_elimination(systems, fields, constants) {
            Ok(stats) => stats,
            Err(err) => {
                warn!(%err, "z-sweep elimination failed");
                return Err(err);
            }
        };
        debug!(lines = stats.lines, min_pivot = stats.min_pivot, "elimination done");

        self.solver.compute_transform(fields, constants);
        debug!("characteristic transform done");

        Ok(SweepReport {
            lines: stats.lines,
            rows_per_line: extents.n_rows(),
            min_pivot: stats.min_pivot,
            transfer,
        })
    }
}

/// Run one z-sweep with the default context.
///
/// Uses the rayon pool when the `parallel` feature is enabled, the serial
/// reference otherwise.
pub fn run_z_sweep(
    extents: &Extents,
    fields: &mut FieldStore,
    systems: &mut CoefficientSystems,
    constants: &SweepConstants,
) -> Result<SweepReport> {
    ZSweep::new(*extents, DefaultContext::default(), DefaultContext::default())
        .run(fields, systems, constants)
}
