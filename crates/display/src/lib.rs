pub mod aggregate;
pub mod markers;
pub mod mode;
pub mod proximity;
pub mod region;
pub mod style;

pub use aggregate::*;
pub use markers::*;
pub use mode::*;
pub use proximity::*;
pub use region::*;
pub use style::*;
