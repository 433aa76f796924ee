//! Process-wide constants for the z-sweep.
//!
//! [`SweepConstants`] gathers the stencil weights, timestep factors, viscous
//! bound constants and equation-of-state constants read by every stage of the
//! sweep. It is passed explicitly into each component; nothing in the crate
//! reads ambient global state, so sweeps stay reentrant.
//!
//! # Derivation
//!
//! [`SweepConstants::derive`] computes everything from the number of z grid
//! points (boundary planes included) and the timestep:
//!
//! ```text
//! dnzm1   = 1 / (nz - 1)
//! tz1     = 1 / dnzm1²          tz2 = 1 / (2·dnzm1)
//! dttz1   = dt·tz1              dttz2 = dt·tz2        c2dttz1 = 2·dttz1
//! dssp    = 0.25·max(dx1, dy1, dz1)
//! comz1   = dt·dssp             comz4 = 4·comz1
//! comz5   = 5·comz1             comz6 = 6·comz1
//! ```
//!
//! # Example
//!
//! ```
//! use sp_rs::{ProblemClass, SweepConstants};
//!
//! let class = ProblemClass::S;
//! let consts = SweepConstants::for_class(class);
//! assert_eq!(consts.c2dttz1, 2.0 * consts.dttz1);
//! assert!(consts.validate().is_ok());
//! ```

use crate::error::{Result, SweepError};

/// Ratio of specific heats.
pub const C1: f64 = 1.4;
/// `c1 - 1`.
pub const C2: f64 = 0.4;
/// Inverse Reynolds-number scaling of the viscous terms.
pub const C3: f64 = 0.1;
/// Viscous coefficient multiplier.
pub const C4: f64 = 1.0;
/// Heat-conduction coefficient multiplier.
pub const C5: f64 = 1.4;

/// Fourth-difference dissipation coefficients along x and y.
const DX1: f64 = 0.75;
const DY1: f64 = 0.75;

/// Constants read by every stage of a z-sweep.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SweepConstants {
    /// `dt·tz1`: viscous timestep factor.
    pub dttz1: f64,
    /// `dt·tz2`: convective timestep factor.
    pub dttz2: f64,
    /// `2·dttz1`: diagonal timestep factor.
    pub c2dttz1: f64,

    /// Dissipation stencil weight (`dt·dssp`).
    pub comz1: f64,
    /// `4·comz1`.
    pub comz4: f64,
    /// `5·comz1`, one-sided diagonal weight.
    pub comz5: f64,
    /// `6·comz1`, centred diagonal weight.
    pub comz6: f64,

    /// Second-order dissipation along z, first equation.
    pub dz1: f64,
    /// Second-order dissipation along z, fourth equation.
    pub dz4: f64,
    /// Second-order dissipation along z, fifth equation.
    pub dz5: f64,
    /// `max(dz3, dz4)`.
    pub dzmax: f64,

    /// `c3·c4`.
    pub c3c4: f64,
    /// `4/3`.
    pub con43: f64,
    /// `c1·c5`.
    pub c1c5: f64,

    /// `β = sqrt(0.5)`, eigenvector scaling of the characteristic transform.
    pub bt: f64,
    /// `γ = 1/c2`, enthalpy factor of the characteristic transform.
    pub c2iv: f64,
}

impl SweepConstants {
    /// Derive all constants from the number of z grid points `nz`
    /// (boundary planes included, so `nz = nz2 + 2`) and the timestep `dt`.
    ///
    /// # Errors
    ///
    /// [`SweepError::InvalidConstants`] if `nz < 3` or `dt` is not a positive
    /// finite number.
    pub fn derive(nz: usize, dt: f64) -> Result<Self> {
        if nz < 3 {
            return Err(SweepError::InvalidConstants(format!(
                "need at least 3 z grid points, got {}",
                nz
            )));
        }
        if !(dt.is_finite() && dt > 0.0) {
            return Err(SweepError::InvalidConstants(format!(
                "timestep must be positive and finite, got {}",
                dt
            )));
        }

        Ok(Self::from_grid(nz, dt))
    }

    fn from_grid(nz: usize, dt: f64) -> Self {
        let dnzm1 = 1.0 / (nz as f64 - 1.0);
        let tz1 = 1.0 / (dnzm1 * dnzm1);
        let tz2 = 1.0 / (2.0 * dnzm1);

        let (dz1, dz3, dz4, dz5) = (1.0, 1.0, 1.0, 1.0);
        let dssp = 0.25 * DX1.max(DY1.max(dz1));
        let dtdssp = dt * dssp;

        let dttz1 = dt * tz1;
        Self {
            dttz1,
            dttz2: dt * tz2,
            c2dttz1: 2.0 * dttz1,
            comz1: dtdssp,
            comz4: 4.0 * dtdssp,
            comz5: 5.0 * dtdssp,
            comz6: 6.0 * dtdssp,
            dz1,
            dz4,
            dz5,
            dzmax: f64::max(dz3, dz4),
            c3c4: C3 * C4,
            con43: 4.0 / 3.0,
            c1c5: C1 * C5,
            bt: 0.5_f64.sqrt(),
            c2iv: 1.0 / C2,
        }
    }

    /// Constants for a benchmark problem class.
    pub fn for_class(class: ProblemClass) -> Self {
        let (_, _, nz) = class.grid_points();
        Self::from_grid(nz, class.dt())
    }

    /// Override the timestep factors (`c2dttz1` follows `dttz1`).
    pub fn with_timestep_factors(mut self, dttz1: f64, dttz2: f64) -> Self {
        self.dttz1 = dttz1;
        self.dttz2 = dttz2;
        self.c2dttz1 = 2.0 * dttz1;
        self
    }

    /// Override the dissipation stencil weights from a base weight `comz1`.
    pub fn with_dissipation(mut self, comz1: f64) -> Self {
        self.comz1 = comz1;
        self.comz4 = 4.0 * comz1;
        self.comz5 = 5.0 * comz1;
        self.comz6 = 6.0 * comz1;
        self
    }

    /// Override the viscous ratio `c3·c4`. Zero removes the density-dependent
    /// part of the viscous bound.
    pub fn with_c3c4(mut self, c3c4: f64) -> Self {
        self.c3c4 = c3c4;
        self
    }

    /// Check that every constant is finite and the diagonal-scaling factors
    /// are non-negative.
    pub fn validate(&self) -> Result<()> {
        let named = [
            ("dttz1", self.dttz1),
            ("dttz2", self.dttz2),
            ("c2dttz1", self.c2dttz1),
            ("comz1", self.comz1),
            ("comz4", self.comz4),
            ("comz5", self.comz5),
            ("comz6", self.comz6),
            ("dz1", self.dz1),
            ("dz4", self.dz4),
            ("dz5", self.dz5),
            ("dzmax", self.dzmax),
            ("c3c4", self.c3c4),
            ("con43", self.con43),
            ("c1c5", self.c1c5),
            ("bt", self.bt),
            ("c2iv", self.c2iv),
        ];
        for (name, value) in named {
            if !value.is_finite() {
                return Err(SweepError::InvalidConstants(format!(
                    "{} is not finite ({})",
                    name, value
                )));
            }
        }
        for (name, value) in [("dttz1", self.dttz1), ("comz1", self.comz1)] {
            if value < 0.0 {
                return Err(SweepError::InvalidConstants(format!(
                    "{} must be non-negative, got {}",
                    name, value
                )));
            }
        }
        Ok(())
    }
}

impl Default for SweepConstants {
    fn default() -> Self {
        Self::for_class(ProblemClass::S)
    }
}

/// Benchmark problem classes of the surrounding application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProblemClass {
    /// 12³ grid points.
    S,
    /// 36³ grid points.
    W,
    /// 64³ grid points.
    A,
    /// 102³ grid points.
    B,
    /// 162³ grid points.
    C,
}

impl ProblemClass {
    /// Grid points per axis, boundary planes included.
    pub fn grid_points(self) -> (usize, usize, usize) {
        let n = match self {
            Self::S => 12,
            Self::W => 36,
            Self::A => 64,
            Self::B => 102,
            Self::C => 162,
        };
        (n, n, n)
    }

    /// Timestep of the class.
    pub fn dt(self) -> f64 {
        match self {
            Self::S => 0.015,
            Self::W => 0.0015,
            Self::A => 0.0015,
            Self::B => 0.001,
            Self::C => 0.00067,
        }
    }

    /// Number of time steps the application runs for this class.
    pub fn iterations(self) -> usize {
        match self {
            Self::S => 100,
            _ => 400,
        }
    }

    /// Interior cell counts `(nx2, ny2, nz2)`.
    pub fn interior(self) -> (usize, usize, usize) {
        let (nx, ny, nz) = self.grid_points();
        (nx - 2, ny - 2, nz - 2)
    }
}
