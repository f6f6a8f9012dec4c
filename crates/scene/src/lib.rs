pub mod regions;
pub mod shape;

pub use regions::*;
pub use shape::*;
