pub mod bubble;
pub mod engine;
pub mod navigation;
pub mod viewport_index;

pub use bubble::*;
pub use engine::*;
pub use navigation::*;
pub use viewport_index::*;
