pub mod rng;
pub mod strategies;

pub use rng::*;
pub use strategies::*;
