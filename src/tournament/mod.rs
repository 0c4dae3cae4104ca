//! Tournament mode: one session runs both players through all three games,
//! then lands on the leaderboard.

pub mod logic;
pub mod store;
pub mod types;

pub use store::TournamentStore;
pub use types::*;
