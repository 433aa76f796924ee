//! Strongly-typed grid types for safer APIs.
//!
//! - **Newtypes prevent mix-ups**: a [`LineIndex`] cannot be passed where a
//!   row number `k` is expected.
//! - **Validated construction**: [`Extents`] rejects empty grids up front, so
//!   every downstream component may assume `nx2, ny2, nz2 >= 1`.
//!
//! # Example
//!
//! ```
//! use sp_rs::types::{Extents, LineIndex};
//!
//! let extents = Extents::new(4, 3, 8).unwrap();
//! assert_eq!(extents.n_lines(), 12);
//! assert_eq!(extents.n_rows(), 10); // nz2 + two ghost rows
//!
//! let line = extents.line_index(2, 1);
//! assert_eq!(line, LineIndex::new(1));
//! assert_eq!(extents.line_coords(line), (2, 1));
//! ```

mod extents;
mod indices;

pub use extents::Extents;
pub use indices::LineIndex;
