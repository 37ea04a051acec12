// One-dimensional electromagnetic PIC particle advance: Boris push plus
// charge-conserving current deposition, run in parallel over a fixed
// pool of workers with private current buffers merged after a barrier.

// We use a type alias for f64/Float to easily support
// double and single precision.
#[cfg(feature = "dprec")]
pub type Float = f64;

#[cfg(not(feature = "dprec"))]
pub type Float = f32;

// Tolerance used when comparing grids built with different summation
// orders.
#[cfg(feature = "dprec")]
pub const E_TOL: Float = 1E-10;

#[cfg(not(feature = "dprec"))]
pub const E_TOL: Float = 1E-5;

pub mod accum;
pub mod config;
pub mod error;
pub mod flds;
pub mod prtls;
pub mod simulation;

pub use crate::accum::{AccumBuffers, MergeDiscipline};
pub use crate::config::{Config, ParallelParams, SpeciesParams};
pub use crate::error::{AdvanceError, Result};
pub use crate::flds::{field::GridDim, Current, Emf};
pub use crate::prtls::{interp::Interpolation, BcType, Particle, Species};
pub use crate::simulation::{advance, AdvanceOptions, StepReport, Workers};

#[cfg(test)]
pub(crate) fn build_test_species() -> Species {
    // A small periodic species that unit tests can fill with particles.
    let params = SpeciesParams {
        name: "test".to_string(),
        q: -1.0,
        m_q: -1.0,
        dt: 0.5,
        dx: 1.0,
        nx: 16,
        bc_type: BcType::Periodic,
        n_sort: 0,
        moving_window: false,
    };
    Species::new(&params).expect("test species parameters are valid")
}
