pub mod country;
pub mod dataset;
pub mod filter;
pub mod member;

pub use country::*;
pub use dataset::*;
pub use filter::*;
pub use member::*;
