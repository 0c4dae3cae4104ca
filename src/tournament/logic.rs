//! Pure session bookkeeping: scoring, stage order and leaderboard ranking.
//! Storage lives in `store`.

use chrono::{DateTime, Utc};
use std::collections::BTreeMap;

use super::types::*;
use crate::config::clean_name;
use crate::games::{GameKind, GameScores};

pub fn new_session(player1: &str, player2: &str, now: DateTime<Utc>) -> Session {
    Session {
        player1: PlayerRecord::new(&clean_name(player1, "Player 1")),
        player2: PlayerRecord::new(&clean_name(player2, "Player 2")),
        current_stage: 0,
        started_at: now.timestamp(),
    }
}

/// Record one game's scores and recompute both totals. Replaying a game
/// overwrites its earlier score.
pub fn record_scores(session: &mut Session, game: GameKind, scores: GameScores) {
    session.player1.scores.insert(game, scores.player1);
    session.player2.scores.insert(game, scores.player2);
    session.player1.recompute_total();
    session.player2.recompute_total();
}

pub fn current_stage(session: &Session) -> Stage {
    match GameKind::from_stage(session.current_stage) {
        Some(game) => Stage::Game(game),
        None => Stage::Complete,
    }
}

/// Move to the next game in tournament order.
pub fn advance_stage(session: &mut Session) -> Stage {
    session.current_stage = (session.current_stage + 1).min(GameKind::ALL.len());
    current_stage(session)
}

/// Leaderboard entry for a finished session.
pub fn finalize(session: &Session, now: DateTime<Utc>) -> LeaderboardEntry {
    let scores: BTreeMap<GameKind, GameScores> = GameKind::ALL
        .iter()
        .map(|&game| {
            (
                game,
                GameScores {
                    player1: session.player1.score(game),
                    player2: session.player2.score(game),
                },
            )
        })
        .collect();
    let duration_secs = u64::try_from(now.timestamp() - session.started_at).unwrap_or(0);
    LeaderboardEntry {
        player1: session.player1.name.clone(),
        player2: session.player2.name.clone(),
        player1_total: session.player1.total,
        player2_total: session.player2.total,
        scores,
        duration_secs,
        date: now.to_rfc3339(),
    }
}

/// Insert `entry` keeping the board sorted by combined total (descending,
/// earlier entries first on ties) and capped at `LEADERBOARD_CAPACITY`.
/// Returns the entry's rank if it made the board.
pub fn insert_entry(board: &mut Leaderboard, entry: LeaderboardEntry) -> Option<usize> {
    let total = entry.combined_total();
    let rank = board
        .entries
        .iter()
        .take_while(|e| e.combined_total() >= total)
        .count();
    board.entries.insert(rank, entry);
    board.entries.truncate(LEADERBOARD_CAPACITY);
    (rank < LEADERBOARD_CAPACITY).then_some(rank)
}
