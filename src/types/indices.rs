//! Strongly-typed index newtypes.

use std::fmt;

/// Macro to generate index newtypes with common functionality.
macro_rules! define_index {
    (
        $(#[$meta:meta])*
        $name:ident, $display_prefix:literal
    ) => {
        $(#[$meta])*
        #[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
        #[repr(transparent)]
        pub struct $name(usize);

        impl $name {
            /// Create a new index.
            #[inline]
            pub const fn new(index: usize) -> Self {
                Self(index)
            }

            /// Get the raw index value.
            #[inline]
            pub const fn get(self) -> usize {
                self.0
            }

            /// First index (0).
            pub const ZERO: Self = Self(0);

            /// Create an iterator over [0, n) indices.
            pub fn iter(n: usize) -> impl Iterator<Item = $name> + ExactSizeIterator {
                (0..n).map($name)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}{}", $display_prefix, self.0)
            }
        }

        impl From<usize> for $name {
            #[inline]
            fn from(index: usize) -> Self {
                Self(index)
            }
        }

        impl From<$name> for usize {
            #[inline]
            fn from(idx: $name) -> usize {
                idx.0
            }
        }
    };
}

define_index!(
    /// Index of a z-line among the interior lines of a grid.
    ///
    /// Lines are numbered `j`-major: interior line `(i, j)` with
    /// `1 <= i <= nx2`, `1 <= j <= ny2` has index `(j - 1) * nx2 + (i - 1)`.
    /// Use [`Extents::line_index`](super::Extents::line_index) to build one.
    ///
    /// # Example
    ///
    /// ```
    /// use sp_rs::types::LineIndex;
    ///
    /// let line = LineIndex::new(7);
    /// assert_eq!(line.get(), 7);
    /// assert_eq!(line.to_string(), "L7");
    /// ```
    LineIndex,
    "L"
);
