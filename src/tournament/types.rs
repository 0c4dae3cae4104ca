//! Tournament session and leaderboard records.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::games::{GameKind, GameScores};
use crate::utils::StoreError;

pub const SESSION_KEY: &str = "session";
pub const LEADERBOARD_KEY: &str = "leaderboard";
pub const LEADERBOARD_CAPACITY: usize = 10;

#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    /// No session on disk, or the stored one could not be read.
    #[error("no tournament session in progress")]
    SessionAbsent,
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// One player's running tally.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerRecord {
    pub name: String,
    pub scores: BTreeMap<GameKind, u32>,
    pub total: u32,
}

impl PlayerRecord {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            scores: GameKind::ALL.iter().map(|&kind| (kind, 0)).collect(),
            total: 0,
        }
    }

    pub fn score(&self, game: GameKind) -> u32 {
        self.scores.get(&game).copied().unwrap_or(0)
    }

    pub fn recompute_total(&mut self) {
        self.total = self.scores.values().sum();
    }
}

/// One tournament run across all three games.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub player1: PlayerRecord,
    pub player2: PlayerRecord,
    /// Index into `GameKind::ALL`; equal to its length once all games are played.
    pub current_stage: usize,
    /// Unix seconds.
    pub started_at: i64,
}

/// Where a session stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Game(GameKind),
    Complete,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaderboardEntry {
    pub player1: String,
    pub player2: String,
    pub player1_total: u32,
    pub player2_total: u32,
    pub scores: BTreeMap<GameKind, GameScores>,
    pub duration_secs: u64,
    /// RFC 3339 completion time.
    pub date: String,
}

impl LeaderboardEntry {
    pub fn combined_total(&self) -> u32 {
        self.player1_total + self.player2_total
    }
}

/// Completed sessions, best combined total first.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Leaderboard {
    pub entries: Vec<LeaderboardEntry>,
}

/// Result of finalizing a session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Completion {
    pub entry: LeaderboardEntry,
    /// Zero-based rank, or `None` if the entry did not make the board.
    pub rank: Option<usize>,
    pub leaderboard: Leaderboard,
}
