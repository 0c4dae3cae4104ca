//! The three two-player games and the enum the app loop drives them through.

pub mod boxing;
pub mod runner;
pub mod snake_battle;

use serde::{Deserialize, Serialize};

use boxing::{BoxingGame, BoxingResult};
use runner::{Lane, RunnerGame, RunnerResult};
use snake_battle::{SnakeBattleGame, SnakeBattleResult};

/// One of the two people at the keyboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Player {
    One,
    Two,
}

impl Player {
    pub const ALL: [Player; 2] = [Player::One, Player::Two];

    pub fn index(self) -> usize {
        match self {
            Player::One => 0,
            Player::Two => 1,
        }
    }

    pub fn other(self) -> Player {
        match self {
            Player::One => Player::Two,
            Player::Two => Player::One,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Player::One => "Player 1",
            Player::Two => "Player 2",
        }
    }
}

/// The three games, in tournament order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GameKind {
    Runner,
    SnakeBattle,
    Boxing,
}

impl GameKind {
    pub const ALL: [GameKind; 3] = [GameKind::Runner, GameKind::SnakeBattle, GameKind::Boxing];

    pub fn title(self) -> &'static str {
        match self {
            GameKind::Runner => "Harmonic Flight",
            GameKind::SnakeBattle => "Snake Battle",
            GameKind::Boxing => "Just Fight",
        }
    }

    pub fn from_stage(stage: usize) -> Option<GameKind> {
        GameKind::ALL.get(stage).copied()
    }
}

/// Per-player result of a finished game as the tournament records it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct GameScores {
    pub player1: u32,
    pub player2: u32,
}

impl GameScores {
    /// The one team score a game earns, booked on player one's side.
    pub fn team(score: u32) -> Self {
        Self {
            player1: score,
            player2: 0,
        }
    }
}

/// How a finished game ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameOutcome {
    Runner(RunnerResult),
    SnakeBattle(SnakeBattleResult),
    Boxing(BoxingResult),
}

impl GameOutcome {
    pub fn is_forfeit(&self) -> bool {
        matches!(
            self,
            GameOutcome::Runner(RunnerResult::Forfeit)
                | GameOutcome::SnakeBattle(SnakeBattleResult::Forfeit)
                | GameOutcome::Boxing(BoxingResult::Forfeit)
        )
    }

    /// One-line summary for the game-over overlay.
    pub fn headline(&self) -> String {
        match self {
            GameOutcome::Runner(RunnerResult::Crashed(event)) => {
                let lane = match event.lane {
                    Lane::Top => "top",
                    Lane::Bottom => "bottom",
                };
                format!("Crashed in the {} lane", lane)
            }
            GameOutcome::SnakeBattle(SnakeBattleResult::Winner(player)) => {
                format!("{} wins!", player.label())
            }
            GameOutcome::SnakeBattle(SnakeBattleResult::Draw) => "Draw!".to_string(),
            GameOutcome::Boxing(BoxingResult::Victory) => "Monster defeated!".to_string(),
            GameOutcome::Boxing(BoxingResult::Defeat) => "The monster wins...".to_string(),
            _ => "Forfeited".to_string(),
        }
    }
}

/// Knobs the app applies when launching a game.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LaunchOptions {
    pub snake_grid_size: i16,
    /// Release runner crouches on a timer; set when the terminal cannot
    /// report key releases.
    pub crouch_auto_release: bool,
}

impl Default for LaunchOptions {
    fn default() -> Self {
        Self {
            snake_grid_size: snake_battle::DEFAULT_GRID_SIZE,
            crouch_auto_release: true,
        }
    }
}

/// The game currently on screen.
#[derive(Debug, Clone)]
pub enum ActiveGame {
    Runner(Box<RunnerGame>),
    SnakeBattle(Box<SnakeBattleGame>),
    Boxing(Box<BoxingGame>),
}

impl ActiveGame {
    pub fn start(kind: GameKind, options: LaunchOptions) -> Self {
        let mut rng = rand::thread_rng();
        match kind {
            GameKind::Runner => ActiveGame::Runner(Box::new(RunnerGame::new(
                options.crouch_auto_release,
                &mut rng,
            ))),
            GameKind::SnakeBattle => ActiveGame::SnakeBattle(Box::new(SnakeBattleGame::new(
                options.snake_grid_size,
                &mut rng,
            ))),
            GameKind::Boxing => ActiveGame::Boxing(Box::new(BoxingGame::new())),
        }
    }

    pub fn kind(&self) -> GameKind {
        match self {
            ActiveGame::Runner(_) => GameKind::Runner,
            ActiveGame::SnakeBattle(_) => GameKind::SnakeBattle,
            ActiveGame::Boxing(_) => GameKind::Boxing,
        }
    }

    /// Advance the game by `dt_ms`. Returns true if anything changed.
    pub fn tick(&mut self, dt_ms: u64) -> bool {
        let mut rng = rand::thread_rng();
        match self {
            ActiveGame::Runner(game) => runner::tick_runner(game, dt_ms, &mut rng),
            ActiveGame::SnakeBattle(game) => {
                let changed = snake_battle::tick_snake_battle(game, dt_ms, &mut rng);
                snake_battle::update_visuals(game);
                changed
            }
            ActiveGame::Boxing(game) => boxing::tick_boxing(game, dt_ms, &mut rng),
        }
    }

    pub fn outcome(&self) -> Option<GameOutcome> {
        match self {
            ActiveGame::Runner(game) => game.game_result.map(GameOutcome::Runner),
            ActiveGame::SnakeBattle(game) => game.game_result.map(GameOutcome::SnakeBattle),
            ActiveGame::Boxing(game) => game.game_result.map(GameOutcome::Boxing),
        }
    }

    pub fn is_finished(&self) -> bool {
        self.outcome().is_some()
    }

    /// Scores as recorded by the tournament. Each game yields one team
    /// score; Snake battle counts the winner's food, or the higher of the
    /// two on a draw.
    pub fn scores(&self) -> GameScores {
        match self {
            ActiveGame::Runner(game) => GameScores::team(game.display_score()),
            ActiveGame::SnakeBattle(game) => GameScores::team(match game.game_result {
                Some(SnakeBattleResult::Winner(player)) => game.snake(player).score,
                _ => game.snakes[0].score.max(game.snakes[1].score),
            }),
            ActiveGame::Boxing(game) => GameScores::team(game.total_score()),
        }
    }

    /// A fresh game of the same kind. Snake battle keeps its win tally.
    pub fn rematch(&self) -> Self {
        let mut rng = rand::thread_rng();
        match self {
            ActiveGame::Runner(game) => ActiveGame::Runner(Box::new(RunnerGame::new(
                game.crouch_auto_release,
                &mut rng,
            ))),
            ActiveGame::SnakeBattle(game) => {
                ActiveGame::SnakeBattle(Box::new(game.rematch(&mut rng)))
            }
            ActiveGame::Boxing(_) => ActiveGame::Boxing(Box::new(BoxingGame::new())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_player_helpers() {
        assert_eq!(Player::One.other(), Player::Two);
        assert_eq!(Player::Two.index(), 1);
        assert_eq!(Player::ALL.len(), 2);
    }

    #[test]
    fn test_tournament_order() {
        assert_eq!(GameKind::from_stage(0), Some(GameKind::Runner));
        assert_eq!(GameKind::from_stage(1), Some(GameKind::SnakeBattle));
        assert_eq!(GameKind::from_stage(2), Some(GameKind::Boxing));
        assert_eq!(GameKind::from_stage(3), None);
    }

    #[test]
    fn test_snake_battle_credits_winner_food_only() {
        let mut rng = rand::thread_rng();
        let mut battle = SnakeBattleGame::new(snake_battle::DEFAULT_GRID_SIZE, &mut rng);
        battle.snakes[0].score = 7;
        battle.snakes[1].score = 3;

        battle.game_result = Some(SnakeBattleResult::Winner(Player::Two));
        let active = ActiveGame::SnakeBattle(Box::new(battle.clone()));
        assert_eq!(active.scores(), GameScores::team(3));

        battle.game_result = Some(SnakeBattleResult::Draw);
        let active = ActiveGame::SnakeBattle(Box::new(battle));
        assert_eq!(active.scores(), GameScores::team(7));
    }

    #[test]
    fn test_boxing_credits_score_plus_bonus_once() {
        let mut game = BoxingGame::new();
        game.score = 40;
        game.timing_bonus = 15;
        let scores = ActiveGame::Boxing(Box::new(game)).scores();
        assert_eq!(scores, GameScores { player1: 55, player2: 0 });
    }

    #[test]
    fn test_start_matches_kind() {
        for kind in GameKind::ALL {
            let game = ActiveGame::start(kind, LaunchOptions::default());
            assert_eq!(game.kind(), kind);
            assert!(!game.is_finished());
            assert_eq!(game.scores(), GameScores::default());
        }
    }

    #[test]
    fn test_outcome_headlines() {
        assert_eq!(
            GameOutcome::SnakeBattle(SnakeBattleResult::Winner(Player::Two)).headline(),
            "Player 2 wins!"
        );
        assert!(GameOutcome::Boxing(BoxingResult::Forfeit).is_forfeit());
        assert!(!GameOutcome::Boxing(BoxingResult::Victory).is_forfeit());
    }

    #[test]
    fn test_game_kind_serializes_snake_case() {
        let json = serde_json::to_string(&GameKind::SnakeBattle).unwrap();
        assert_eq!(json, "\"snake_battle\"");
    }
}
