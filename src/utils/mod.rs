pub use self::physics::*;
pub use self::rotations::*;

mod physics;
mod rotations;
