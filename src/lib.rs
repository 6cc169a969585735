#[cfg(all(feature = "dim3", feature = "f64"))]
pub extern crate parry3d_f64 as parry;

pub extern crate nalgebra as na;

#[macro_use]
extern crate log;

#[cfg(feature = "serde")]
#[macro_use]
extern crate serde;

pub mod prelude {
    pub use crate::dynamics::models::*;
    pub use crate::dynamics::solver::*;
    pub use crate::dynamics::*;
    pub use crate::math::*;
    pub use crate::pipelines::*;
}

pub mod math {
    pub use super::parry::math::*;

    /// Values whose magnitude is below this threshold are treated as numerically zero
    /// by the plasticity correction.
    pub const NOISE_FLOOR: Real = 5.0e-22;

    /// The interaction cutoff, relative to the particle radius.
    pub const CUTOFF_FACTOR: Real = 1.2;
}

pub mod dynamics;
pub mod pipelines;
pub mod utils;
