pub mod coord;
pub mod geodesy;

pub use coord::*;
pub use geodesy::*;
