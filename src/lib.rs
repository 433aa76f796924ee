//! # sp-rs
//!
//! The z-direction sweep of an implicit approximate-factorization solver for
//! the five-equation compressible Navier-Stokes system on a structured 3-D
//! grid.
//!
//! One sweep, for every grid line running along z:
//! - closes the three banded systems with identity boundary rows
//! - builds their interior rows from viscosity-weighted wave-speed bounds and
//!   a fourth-difference dissipation stencil
//! - eliminates them against the residual (pentadiagonal Thomas algorithm)
//! - maps the solution from characteristic to conservative variables
//!
//! Lines are independent and run in parallel under the `parallel` feature.
//!
//! # Example
//!
//! ```
//! use sp_rs::{run_z_sweep, CoefficientSystems, Extents, FieldStore, FlowState, SweepConstants};
//!
//! let ext = Extents::new(4, 4, 4).unwrap();
//! let mut fields = FieldStore::uniform(ext, FlowState::at_rest(1.0, 1.0));
//! fields.set_residual_from(|_, _, k| [0.0, 0.0, k as f64, 0.0, 0.0]);
//! let mut systems = CoefficientSystems::new(&ext);
//!
//! let report = run_z_sweep(&ext, &mut fields, &mut systems, &SweepConstants::default())?;
//! assert_eq!(report.rows_per_line, 6);
//! # Ok::<(), sp_rs::SweepError>(())
//! ```

pub mod constants;
pub mod error;
pub mod storage;
pub mod sweep;
pub mod types;

// Re-export main types for convenience
pub use constants::{ProblemClass, SweepConstants};
pub use error::{Result, SweepError};
pub use storage::{
    Band, BandedSystem, CoefficientSystems, FieldStore, FlowState, LineSnapshot, Primitives,
    Residual, SystemKind,
};
pub use sweep::{
    run_z_sweep, synchronize, ExecutionContext, LineStats, MemorySpace, SerialContext,
    StagedClosure, SweepReport, SyncReceipt, ZSweep,
};
pub use types::{Extents, LineIndex};

#[cfg(feature = "parallel")]
pub use sweep::ParallelContext;
