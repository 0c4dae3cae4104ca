//! Terminal rendering for every screen.

pub mod boxing_scene;
pub mod game_common;
pub mod leaderboard_scene;
pub mod menu_scene;
pub mod runner_scene;
pub mod snake_battle_scene;

use crate::app::{App, Match, Screen};
use game_common::{render_game_over_overlay, GameOverText};
use harmony::games::ActiveGame;
use ratatui::{layout::Rect, Frame};

/// Draw the current screen.
pub fn draw(frame: &mut Frame, app: &App) {
    let area = frame.size();
    match &app.screen {
        Screen::Menu { selected } => menu_scene::render_menu(
            frame,
            area,
            &app.menu_items(),
            *selected,
            app.notice.as_deref(),
        ),
        Screen::TournamentSetup(entry) => menu_scene::render_tournament_setup(frame, area, entry),
        Screen::Playing(current) => render_match(frame, area, current, app.runner_best),
        Screen::Leaderboard { board, highlight } => leaderboard_scene::render_leaderboard(
            frame,
            area,
            board,
            *highlight,
            app.notice.as_deref(),
        ),
    }
}

fn render_match(frame: &mut Frame, area: Rect, current: &Match, runner_best: u32) {
    match &current.game {
        ActiveGame::Runner(game) => {
            runner_scene::render_runner_scene(frame, area, game, runner_best)
        }
        ActiveGame::SnakeBattle(game) => {
            snake_battle_scene::render_snake_battle_scene(frame, area, game)
        }
        ActiveGame::Boxing(game) => boxing_scene::render_boxing_scene(frame, area, game),
    }

    // The final frame stays visible under the result.
    if current.since_finished_ms.is_some() {
        let text = match &current.game {
            ActiveGame::Runner(game) => runner_scene::game_over_text(game),
            ActiveGame::SnakeBattle(game) => snake_battle_scene::game_over_text(game),
            ActiveGame::Boxing(game) => boxing_scene::game_over_text(game),
        };
        render_game_over(frame, area, current, &text);
    }
}

fn render_game_over(frame: &mut Frame, area: Rect, current: &Match, text: &GameOverText) {
    let forfeited = current.game.outcome().is_some_and(|o| o.is_forfeit());
    let controls: &[(&str, &str)] = if !current.accepts_dismissal() {
        &[]
    } else if current.tournament && forfeited {
        &[("[Enter]", "Menu")]
    } else if current.tournament {
        &[("[Enter]", "Next game")]
    } else {
        &[("[Space]", "Rematch"), ("[Esc]", "Menu")]
    };
    render_game_over_overlay(
        frame,
        centered(area, 52, 11),
        text.result_type,
        &text.title,
        &text.message,
        &text.score_line,
        controls,
    );
}

/// A `width` x `height` box centered in `area`, shrunk to fit.
fn centered(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect::new(
        area.x + (area.width - width) / 2,
        area.y + (area.height - height) / 2,
        width,
        height,
    )
}
