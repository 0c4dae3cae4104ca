//! Just Fight: cooperative boxing against a shared monster.

pub mod logic;
pub mod types;

pub use logic::*;
pub use types::*;
