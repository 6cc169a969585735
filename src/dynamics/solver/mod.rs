pub use self::elastic_force::{elastic_bond_update, BondSide};
pub use self::equivalent_stress::{equivalent_stress_of, mean_stress_of};
pub use self::error::McaError;
pub use self::force_assembly::{pair_forces, PairForces};
pub use self::mca_solver::{McaSolver, StepReport};
pub use self::plasticity::{correct_particle, PlasticCorrection};
pub use self::solver_parameters::{ComputeFlags, McaParameters};

mod elastic_force;
mod equivalent_stress;
mod error;
mod force_assembly;
mod mca_solver;
mod plasticity;
mod solver_parameters;
