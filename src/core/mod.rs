//! Core timing primitives shared by all three games.

pub mod constants;
pub mod timeline;

pub use constants::*;
pub use timeline::Timeline;
