//! Harmonic Flight: a two-lane cooperative runner.

pub mod logic;
pub mod types;

pub use logic::*;
pub use types::*;
