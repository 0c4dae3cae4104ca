//! Screen state machine: menu, tournament setup, games and the leaderboard.

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind};
use harmony::config::{clean_name, Settings, MAX_NAME_LEN};
use harmony::core::GAME_OVER_GRACE_MS;
use harmony::games::runner::HIGH_SCORE_KEY;
use harmony::games::{boxing, runner, snake_battle, ActiveGame, GameKind, Player};
use harmony::tournament::{logic, Leaderboard, SessionError, Stage, TournamentStore};
use harmony::utils::JsonStore;
use tracing::{info, warn};

use crate::input::{map_boxing_key, map_runner_key, map_snake_battle_key};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuItem {
    Play(GameKind),
    NewTournament,
    ResumeTournament,
    Leaderboard,
    Quit,
}

impl MenuItem {
    pub fn label(self) -> &'static str {
        match self {
            MenuItem::Play(kind) => kind.title(),
            MenuItem::NewTournament => "New Tournament",
            MenuItem::ResumeTournament => "Resume Tournament",
            MenuItem::Leaderboard => "Leaderboard",
            MenuItem::Quit => "Quit",
        }
    }
}

/// Both player names being typed before a tournament.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NameEntry {
    pub names: [String; 2],
    pub focus: Player,
}

/// A game on screen, free play or part of the tournament.
#[derive(Debug, Clone)]
pub struct Match {
    pub game: ActiveGame,
    pub tournament: bool,
    /// Time since the game ended; keys are ignored for a short grace period.
    pub since_finished_ms: Option<u64>,
}

impl Match {
    fn new(game: ActiveGame, tournament: bool) -> Self {
        Self {
            game,
            tournament,
            since_finished_ms: None,
        }
    }

    pub fn accepts_dismissal(&self) -> bool {
        self.since_finished_ms.is_some_and(|ms| ms >= GAME_OVER_GRACE_MS)
    }
}

#[derive(Debug, Clone)]
pub enum Screen {
    Menu { selected: usize },
    TournamentSetup(NameEntry),
    Playing(Box<Match>),
    Leaderboard {
        board: Leaderboard,
        highlight: Option<usize>,
    },
}

pub struct App {
    pub screen: Screen,
    store: JsonStore,
    pub tournament: TournamentStore,
    pub settings: Settings,
    key_release_supported: bool,
    pub runner_best: u32,
    /// An unfinished tournament is on disk; refreshed when the menu opens.
    resumable: bool,
    /// One-line message shown on the menu.
    pub notice: Option<String>,
    pub should_quit: bool,
}

impl App {
    pub fn new(store: JsonStore, settings: Settings, key_release_supported: bool) -> Self {
        let runner_best = store.get_or_default::<u32>(HIGH_SCORE_KEY);
        let tournament = TournamentStore::new(store.clone());
        Self {
            screen: Screen::Menu { selected: 0 },
            resumable: tournament.has_session(),
            tournament,
            store,
            settings,
            key_release_supported,
            runner_best,
            notice: None,
            should_quit: false,
        }
    }

    pub fn menu_items(&self) -> Vec<MenuItem> {
        let mut items: Vec<MenuItem> = GameKind::ALL.iter().map(|&k| MenuItem::Play(k)).collect();
        if self.resumable {
            items.push(MenuItem::ResumeTournament);
        }
        items.push(MenuItem::NewTournament);
        items.push(MenuItem::Leaderboard);
        items.push(MenuItem::Quit);
        items
    }

    pub fn play(&mut self, kind: GameKind) {
        self.launch(kind, false);
    }

    pub fn open_tournament_setup(&mut self) {
        self.screen = Screen::TournamentSetup(NameEntry {
            names: [
                self.settings.player1_name.clone(),
                self.settings.player2_name.clone(),
            ],
            focus: Player::One,
        });
    }

    pub fn open_leaderboard(&mut self) {
        self.screen = Screen::Leaderboard {
            board: self.tournament.leaderboard(),
            highlight: None,
        };
    }

    fn open_menu(&mut self) {
        self.resumable = self.tournament.has_session();
        self.screen = Screen::Menu { selected: 0 };
    }

    fn launch(&mut self, kind: GameKind, tournament: bool) {
        let options = self.settings.launch_options(self.key_release_supported);
        info!(game = ?kind, tournament, "launching game");
        self.screen = Screen::Playing(Box::new(Match::new(
            ActiveGame::start(kind, options),
            tournament,
        )));
    }

    fn report(&mut self, context: &str, error: impl std::fmt::Display) {
        warn!(error = %error, "{}", context);
        self.notice = Some(format!("{}: {}", context, error));
    }

    /// Advance the active game by `dt_ms`.
    pub fn tick(&mut self, dt_ms: u64) {
        let Screen::Playing(current) = &mut self.screen else {
            return;
        };
        if let Some(ms) = current.since_finished_ms.as_mut() {
            *ms += dt_ms;
            return;
        }
        current.game.tick(dt_ms);
        if current.game.is_finished() {
            current.since_finished_ms = Some(0);
            self.on_game_finished();
        }
    }

    /// Runs once when a game ends: high score and tournament bookkeeping.
    fn on_game_finished(&mut self) {
        let Screen::Playing(current) = &self.screen else {
            return;
        };
        let kind = current.game.kind();
        let scores = current.game.scores();
        let tournament = current.tournament;
        let Some(outcome) = current.game.outcome() else {
            return;
        };
        info!(
            game = ?kind,
            outcome = %outcome.headline(),
            p1 = scores.player1,
            p2 = scores.player2,
            "game finished"
        );

        if kind == GameKind::Runner && scores.player1 > self.runner_best {
            self.runner_best = scores.player1;
            if let Err(e) = self.store.put(HIGH_SCORE_KEY, &self.runner_best) {
                self.report("Could not save high score", e);
            }
        }

        if !tournament {
            return;
        }
        if outcome.is_forfeit() {
            if let Err(e) = self.tournament.abandon_session() {
                self.report("Could not drop tournament", e);
            }
            self.notice = Some("Tournament abandoned.".to_string());
            return;
        }
        if let Err(e) = self.tournament.update_session_score(kind, scores) {
            self.report("Could not record score", e);
        }
    }

    pub fn handle_key(&mut self, key: KeyEvent) {
        match self.screen {
            Screen::Playing(_) => self.handle_playing_key(key),
            _ if key.kind != KeyEventKind::Press => {}
            Screen::Menu { .. } => self.handle_menu_key(key.code),
            Screen::TournamentSetup(_) => self.handle_setup_key(key.code),
            Screen::Leaderboard { .. } => {
                if matches!(
                    key.code,
                    KeyCode::Esc | KeyCode::Enter | KeyCode::Char(' ') | KeyCode::Char('q')
                ) {
                    self.notice = None;
                    self.open_menu();
                }
            }
        }
    }

    fn handle_menu_key(&mut self, code: KeyCode) {
        let items = self.menu_items();
        let Screen::Menu { selected } = &mut self.screen else {
            return;
        };
        match code {
            KeyCode::Up | KeyCode::Char('w') => {
                *selected = selected.checked_sub(1).unwrap_or(items.len() - 1);
            }
            KeyCode::Down | KeyCode::Char('s') => {
                *selected = (*selected + 1) % items.len();
            }
            KeyCode::Enter | KeyCode::Char(' ') => {
                let item = items[(*selected).min(items.len() - 1)];
                self.notice = None;
                self.select(item);
            }
            KeyCode::Esc | KeyCode::Char('q') => self.should_quit = true,
            _ => {}
        }
    }

    fn select(&mut self, item: MenuItem) {
        match item {
            MenuItem::Play(kind) => self.play(kind),
            MenuItem::NewTournament => self.open_tournament_setup(),
            MenuItem::ResumeTournament => self.resume_tournament(),
            MenuItem::Leaderboard => self.open_leaderboard(),
            MenuItem::Quit => self.should_quit = true,
        }
    }

    fn handle_setup_key(&mut self, code: KeyCode) {
        let Screen::TournamentSetup(entry) = &mut self.screen else {
            return;
        };
        let idx = entry.focus.index();
        match code {
            KeyCode::Esc => self.open_menu(),
            KeyCode::Tab | KeyCode::Up | KeyCode::Down => entry.focus = entry.focus.other(),
            KeyCode::Backspace => {
                entry.names[idx].pop();
            }
            KeyCode::Char(c) if !c.is_control() => {
                if entry.names[idx].chars().count() < MAX_NAME_LEN {
                    entry.names[idx].push(c);
                }
            }
            KeyCode::Enter if entry.focus == Player::One => entry.focus = Player::Two,
            KeyCode::Enter => {
                let player1 = clean_name(&entry.names[0], &self.settings.player1_name);
                let player2 = clean_name(&entry.names[1], &self.settings.player2_name);
                self.start_tournament(&player1, &player2);
            }
            _ => {}
        }
    }

    fn start_tournament(&mut self, player1: &str, player2: &str) {
        match self.tournament.start_new_session(player1, player2) {
            Ok(session) => match logic::current_stage(&session) {
                Stage::Game(kind) => self.launch(kind, true),
                Stage::Complete => self.finish_tournament(),
            },
            Err(e) => {
                self.report("Could not start tournament", e);
                self.open_menu();
            }
        }
    }

    pub fn resume_tournament(&mut self) {
        match self.tournament.current_session() {
            Ok(session) => match logic::current_stage(&session) {
                Stage::Game(kind) => self.launch(kind, true),
                Stage::Complete => self.finish_tournament(),
            },
            Err(SessionError::SessionAbsent) => self.open_tournament_setup(),
            Err(e) => {
                self.report("Could not load tournament", e);
                self.open_menu();
            }
        }
    }

    fn finish_tournament(&mut self) {
        match self.tournament.complete_session() {
            Ok(completion) => {
                self.notice = Some(match completion.rank {
                    Some(rank) => format!(
                        "{} & {} placed #{} with {} points!",
                        completion.entry.player1,
                        completion.entry.player2,
                        rank + 1,
                        completion.entry.combined_total()
                    ),
                    None => format!(
                        "{} & {} scored {} points.",
                        completion.entry.player1,
                        completion.entry.player2,
                        completion.entry.combined_total()
                    ),
                });
                self.screen = Screen::Leaderboard {
                    board: completion.leaderboard,
                    highlight: completion.rank,
                };
            }
            Err(e) => {
                self.report("Could not finish tournament", e);
                self.open_menu();
            }
        }
    }

    /// After a tournament game: the next game, or the leaderboard.
    fn continue_tournament(&mut self) {
        match self.tournament.advance_to_next_game() {
            Ok(Stage::Game(kind)) => self.launch(kind, true),
            Ok(Stage::Complete) => self.finish_tournament(),
            Err(e) => {
                self.report("Tournament interrupted", e);
                self.open_menu();
            }
        }
    }

    fn handle_playing_key(&mut self, key: KeyEvent) {
        let Screen::Playing(current) = &mut self.screen else {
            return;
        };

        if current.since_finished_ms.is_some() {
            if key.kind != KeyEventKind::Press || !current.accepts_dismissal() {
                return;
            }
            let forfeited = current.game.outcome().is_some_and(|o| o.is_forfeit());
            match (current.tournament, key.code) {
                (true, _) if forfeited => self.open_menu(),
                (true, KeyCode::Char(' ') | KeyCode::Enter) => self.continue_tournament(),
                (false, KeyCode::Char(' ') | KeyCode::Enter) => {
                    current.game = current.game.rematch();
                    current.since_finished_ms = None;
                }
                (false, KeyCode::Esc) => self.open_menu(),
                _ => {}
            }
            return;
        }

        match &mut current.game {
            ActiveGame::Runner(game) => {
                if let Some(input) = map_runner_key(key) {
                    runner::process_input(game, input);
                }
            }
            ActiveGame::SnakeBattle(game) => {
                if let Some(input) = map_snake_battle_key(key) {
                    snake_battle::process_input(game, input);
                }
            }
            ActiveGame::Boxing(game) => {
                if let Some(input) = map_boxing_key(key) {
                    boxing::process_input(game, input, &mut rand::thread_rng());
                }
            }
        }

        // Forfeit resolves on input, not on a tick.
        if current.game.is_finished() {
            current.since_finished_ms = Some(0);
            self.on_game_finished();
        }
    }
}
