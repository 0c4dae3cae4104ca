//! Session and leaderboard persistence on top of `JsonStore`.

use chrono::Utc;
use tracing::{info, warn};

use super::logic;
use super::types::*;
use crate::games::{GameKind, GameScores};
use crate::utils::{JsonStore, StoreError};

#[derive(Debug, Clone)]
pub struct TournamentStore {
    store: JsonStore,
}

impl TournamentStore {
    pub fn new(store: JsonStore) -> Self {
        Self { store }
    }

    /// Begin a new session, replacing any unfinished one.
    pub fn start_new_session(&self, player1: &str, player2: &str) -> Result<Session, StoreError> {
        let session = logic::new_session(player1, player2, Utc::now());
        self.store.put(SESSION_KEY, &session)?;
        info!(
            player1 = %session.player1.name,
            player2 = %session.player2.name,
            "tournament started"
        );
        Ok(session)
    }

    /// The session in progress. Missing or unreadable sessions are
    /// `SessionAbsent`.
    pub fn current_session(&self) -> Result<Session, SessionError> {
        match self.store.get::<Session>(SESSION_KEY) {
            Ok(Some(session)) => Ok(session),
            Ok(None) => Err(SessionError::SessionAbsent),
            Err(StoreError::Corrupt { key, source }) => {
                warn!(key = %key, error = %source, "discarding unreadable tournament session");
                Err(SessionError::SessionAbsent)
            }
            Err(e) => Err(e.into()),
        }
    }

    pub fn has_session(&self) -> bool {
        self.current_session().is_ok()
    }

    /// Write one game's scores into the session.
    pub fn update_session_score(
        &self,
        game: GameKind,
        scores: GameScores,
    ) -> Result<Session, SessionError> {
        let mut session = self.current_session()?;
        logic::record_scores(&mut session, game, scores);
        self.store.put(SESSION_KEY, &session)?;
        info!(
            game = ?game,
            p1 = scores.player1,
            p2 = scores.player2,
            p1_total = session.player1.total,
            p2_total = session.player2.total,
            "tournament score recorded"
        );
        Ok(session)
    }

    /// Step the session to the next game. Returns `Stage::Complete` after the last one.
    pub fn advance_to_next_game(&self) -> Result<Stage, SessionError> {
        let mut session = self.current_session()?;
        let stage = logic::advance_stage(&mut session);
        self.store.put(SESSION_KEY, &session)?;
        Ok(stage)
    }

    /// Finalize the session into the leaderboard and remove it.
    pub fn complete_session(&self) -> Result<Completion, SessionError> {
        let session = self.current_session()?;
        let entry = logic::finalize(&session, Utc::now());
        let mut leaderboard = self.leaderboard();
        let rank = logic::insert_entry(&mut leaderboard, entry.clone());
        self.store.put(LEADERBOARD_KEY, &leaderboard)?;
        self.store.remove(SESSION_KEY)?;
        info!(
            combined = entry.combined_total(),
            rank = ?rank,
            duration_secs = entry.duration_secs,
            "tournament completed"
        );
        Ok(Completion {
            entry,
            rank,
            leaderboard,
        })
    }

    /// Drop an unfinished session.
    pub fn abandon_session(&self) -> Result<(), StoreError> {
        self.store.remove(SESSION_KEY)
    }

    /// The saved leaderboard; empty if missing or unreadable.
    pub fn leaderboard(&self) -> Leaderboard {
        self.store.get_or_default(LEADERBOARD_KEY)
    }
}
