mod alphabet;
mod generator;

pub use alphabet::*;
pub use generator::*;
