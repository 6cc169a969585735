pub use self::coefficients::parse_type_range;
pub use self::material_table::{MaterialPair, MaterialTable, PairSettings};
pub use self::restart::Communicator;

mod coefficients;
mod material_table;
mod restart;
