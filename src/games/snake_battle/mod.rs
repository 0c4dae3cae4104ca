//! Snake battle: two snakes, one grid, last one alive wins.

pub mod logic;
pub mod types;

pub use logic::*;
pub use types::*;
