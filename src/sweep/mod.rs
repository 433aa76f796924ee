//! The z-direction approximate-factorization sweep.
//!
//! For every interior z-line the sweep builds three pentadiagonal systems
//! (base, plus-acoustic, minus-acoustic), eliminates them against the
//! residual and converts the result from characteristic to conservative
//! variables. Stages run in order:
//!
//! - [`boundary`]: identity closure of the first and last row of every line
//! - [`coefficients`]: interior band rows from the local flow state
//! - [`elimination`]: forward elimination and back substitution
//! - [`transform`]: characteristic-to-conservative transform
//!
//! Lines are independent; the recurrence along z within a line is not.
//! [`ExecutionContext`] abstracts over how lines are scheduled and
//! [`ZSweep`] drives the stages.
//!
//! # Example
//!
//! ```
//! use sp_rs::sweep::run_z_sweep;
//! use sp_rs::{CoefficientSystems, Extents, FieldStore, SweepConstants};
//!
//! let ext = Extents::new(4, 4, 4).unwrap();
//! let mut fields = FieldStore::new(ext);
//! fields.residual_mut(2, 3, 2)[2] = 1.0;
//! let mut systems = CoefficientSystems::new(&ext);
//!
//! let report = run_z_sweep(&ext, &mut fields, &mut systems, &SweepConstants::default()).unwrap();
//! assert_eq!(report.lines, 16);
//! assert!(fields.residual_is_finite());
//! ```

pub mod boundary;
pub mod coefficients;
pub mod context;
pub mod driver;
pub mod elimination;
pub mod sync;
pub mod transform;

pub use boundary::{apply_boundary_closure, close_line, is_closed};
pub use coefficients::{acoustic_rows, base_row, build_line, viscous_bound, StencilRow};
pub use context::{DefaultContext, ExecutionContext, MemorySpace, SerialContext, StagedClosure};
pub use driver::{run_z_sweep, SweepReport, ZSweep};
pub use elimination::{solve_line, solve_system, LineStats, LineSystems, SingularRow};
pub use sync::{boundary_checksum, synchronize, SyncReceipt};
pub use transform::{
    apply_characteristic_transform, characteristic_to_conservative, transform_line, CellState,
};

#[cfg(feature = "parallel")]
pub use boundary::apply_boundary_closure_parallel;
#[cfg(feature = "parallel")]
pub use context::ParallelContext;
#[cfg(feature = "parallel")]
pub use transform::apply_characteristic_transform_parallel;
