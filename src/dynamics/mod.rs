pub use self::bond::BondHalf;
pub use self::particle::Particle;
pub use self::particle_set::ParticleSet;
pub use self::topology::{BondLink, BondPair, BondTopology};

mod bond;
pub mod models;
mod particle;
mod particle_set;
pub mod solver;
mod topology;
