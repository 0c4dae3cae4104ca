//! Two-player terminal minigames: a lane runner, a snake battle and a
//! cooperative boxing rhythm game, with a tournament leaderboard.

pub mod build_info;
pub mod config;
pub mod core;
pub mod games;
pub mod tournament;
pub mod utils;
