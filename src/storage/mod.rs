//! Storage owned by the surrounding application and borrowed by a sweep.
//!
//! - [`bands`]: the three banded coefficient systems
//! - [`fields`]: the primitive snapshot and the residual field
//!
//! Every array is line-contiguous: all `nz2 + 2` rows of line `L` are stored
//! back to back, starting at `L * (nz2 + 2)`. This makes a line a plain slice,
//! so lines can be handed to independent workers with `chunks_mut`.

pub mod bands;
pub mod fields;

pub use bands::{
    Band, BandedSystem, CoefficientSystems, LastRowScaling, SystemKind, DIAG, IDENTITY_ROW, SUB,
    SUB_SUB, SUPER, SUPER_SUPER,
};
pub use fields::{FieldStore, FlowState, LineSnapshot, Primitives, Residual};
