//! Transfer of coefficient storage between memory spaces.
//!
//! When the boundary closure runs in a [`Separate`](super::MemorySpace::Separate)
//! memory space its result lives in a staging copy. [`synchronize`] is the
//! barrier between that producer and the elimination stage: it is called only
//! after the closure has returned, and it copies the full arrays of all three
//! systems. The returned [`SyncReceipt`] lets the consumer check that what it
//! holds is what was sent.

use crate::error::{Result, SweepError};
use crate::storage::{Band, BandedSystem, CoefficientSystems, SystemKind};

/// Record of one completed transfer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SyncReceipt {
    /// Band rows copied across all three systems
    pub rows: usize,
    /// Bytes copied
    pub bytes: usize,
    /// Sum over every coefficient of every boundary row
    pub boundary_checksum: f64,
}

impl SyncReceipt {
    /// Check that `systems` carries the boundary rows this receipt recorded.
    ///
    /// # Errors
    ///
    /// [`SweepError::SyncVerification`] if the checksums differ.
    pub fn verify(&self, systems: &CoefficientSystems) -> Result<()> {
        let actual = boundary_checksum(systems);
        if actual != self.boundary_checksum {
            return Err(SweepError::SyncVerification {
                expected: self.boundary_checksum,
                actual,
            });
        }
        Ok(())
    }
}

fn system_boundary_sum(system: &BandedSystem) -> f64 {
    let last = system.n_rows - 1;
    let row_sum = |row: &Band| row.iter().sum::<f64>();
    system
        .data
        .chunks(system.n_rows)
        .map(|rows| row_sum(&rows[0]) + row_sum(&rows[last]))
        .sum()
}

/// Checksum of the boundary rows of all three systems.
pub fn boundary_checksum(systems: &CoefficientSystems) -> f64 {
    SystemKind::ALL
        .iter()
        .map(|&kind| system_boundary_sum(systems.get(kind)))
        .sum()
}

/// Copy every system of `src` into `dst`.
///
/// Sizes are checked for all three systems before anything is written, so a
/// mismatch leaves `dst` untouched.
///
/// # Errors
///
/// [`SweepError::SyncMismatch`] if any pair of systems differs in size.
pub fn synchronize(src: &CoefficientSystems, dst: &mut CoefficientSystems) -> Result<SyncReceipt> {
    for kind in SystemKind::ALL {
        let (s, d) = (src.get(kind), dst.get(kind));
        if s.data.len() != d.data.len() || s.n_rows != d.n_rows {
            return Err(SweepError::SyncMismatch {
                source_rows: s.data.len(),
                dest_rows: d.data.len(),
            });
        }
    }

    let mut bytes = 0;
    for kind in SystemKind::ALL {
        let s = src.get(kind);
        dst.get_mut(kind).copy_from(s)?;
        bytes += s.byte_len();
    }

    Ok(SyncReceipt {
        rows: src.total_rows(),
        bytes,
        boundary_checksum: boundary_checksum(src),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::IDENTITY_ROW;
    use crate::sweep::boundary::apply_boundary_closure;
    use crate::types::Extents;

    #[test]
    fn test_synchronize_copies_closure() {
        let ext = Extents::new(3, 2, 4).unwrap();
        let mut staging = CoefficientSystems::new(&ext);
        apply_boundary_closure(&mut staging, &ext);

        let mut dst = CoefficientSystems::new(&ext);
        let receipt = synchronize(&staging, &mut dst).unwrap();

        assert_eq!(dst, staging);
        assert_eq!(receipt.rows, 3 * ext.n_cells());
        assert_eq!(receipt.bytes, 3 * ext.n_cells() * 40);
        // One unit diagonal per boundary row: two rows per line per system
        assert_eq!(receipt.boundary_checksum, (3 * 2 * ext.n_lines()) as f64);
        assert!(receipt.verify(&dst).is_ok());
    }

    #[test]
    fn test_verify_detects_stale_destination() {
        let ext = Extents::new(2, 2, 2).unwrap();
        let mut staging = CoefficientSystems::new(&ext);
        apply_boundary_closure(&mut staging, &ext);
        let mut dst = CoefficientSystems::new(&ext);
        let receipt = synchronize(&staging, &mut dst).unwrap();

        *dst.plus.row_mut(ext.line_index(1, 2), 0) = [0.0; 5];
        let err = receipt.verify(&dst).unwrap_err();
        assert!(matches!(err, SweepError::SyncVerification { .. }));
        // Raised after the destination was written
        assert!(!err.is_configuration());
    }

    #[test]
    fn test_size_mismatch_leaves_destination_untouched() {
        let big = Extents::new(2, 2, 3).unwrap();
        let small = Extents::new(2, 2, 2).unwrap();
        let mut src = CoefficientSystems::new(&big);
        apply_boundary_closure(&mut src, &big);
        let mut dst = CoefficientSystems::new(&small);

        let err = synchronize(&src, &mut dst).unwrap_err();
        assert_eq!(
            err,
            SweepError::SyncMismatch {
                source_rows: big.n_cells(),
                dest_rows: small.n_cells()
            }
        );
        assert!(dst.base.data.iter().all(|row| *row != IDENTITY_ROW));
    }
}
