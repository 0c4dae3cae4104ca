//! Harmonic Flight rendering.
//!
//! The stage is simulated in 800x400 stage pixels and scaled onto the play
//! field through a cell buffer. Each lane gets its ground line; runners and
//! obstacles are drawn as filled boxes at their scaled hitbox positions.

use super::game_common::{
    create_game_layout, info_line, render_center_prompt, render_forfeit_status_bar,
    render_info_panel_frame, render_status_bar, CellBuffer, GameOverText, GameResultType,
};
use harmony::games::runner::{
    Lane, LaneMode, ObstacleKind, RunnerGame, RunnerPose, RunnerResult, BOTTOM_LANE_GROUND,
    RUNNER_WIDTH, RUNNER_X, STAGE_HEIGHT, STAGE_WIDTH, TOP_LANE_GROUND,
};
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

const GROUND_CHAR: char = '▓';
const GROUND_SUB: char = '░';
const RUNNER_CHAR: char = '█';
const GROUND_OBSTACLE_CHARS: [char; 3] = ['▲', '■', '♣'];
const FLYING_OBSTACLE_CHARS: [char; 4] = ['◆', '▼', '●', '✦'];

const TOP_LANE_COLOR: Color = Color::LightCyan;
const BOTTOM_LANE_COLOR: Color = Color::LightMagenta;

fn lane_color(lane: Lane) -> Color {
    match lane {
        Lane::Top => TOP_LANE_COLOR,
        Lane::Bottom => BOTTOM_LANE_COLOR,
    }
}

fn mode_color(mode: LaneMode) -> Color {
    match mode {
        LaneMode::Harmony => Color::LightGreen,
        LaneMode::Disharmony => Color::LightRed,
    }
}

/// Render the runner scene. `best` is the saved high score.
pub fn render_runner_scene(frame: &mut Frame, area: Rect, game: &RunnerGame, best: u32) {
    let layout = create_game_layout(frame, area, " Harmonic Flight ", Color::LightCyan, 12, 22);

    render_play_field(frame, layout.content, game);

    if game.waiting_to_start {
        render_center_prompt(frame, layout.content, "[ Press Space to Start ]");
    } else if game.paused {
        render_center_prompt(frame, layout.content, "[ Paused ]");
    }

    render_status_bar_content(frame, layout.status_bar, game);
    render_info_panel(frame, layout.info_panel, game, best);
}

/// Stage-pixel to cell mapping for one render.
struct Scale {
    x: f64,
    y: f64,
}

impl Scale {
    fn col(&self, x: f64) -> i32 {
        (x * self.x).floor() as i32
    }

    fn row(&self, y: f64) -> i32 {
        (y * self.y).floor() as i32
    }
}

/// Cell span covering `[start, start + len)`; at least one cell wide.
fn cell_span(start: f64, len: f64, scale: f64) -> (i32, i32) {
    let from = (start * scale).floor() as i32;
    let to = ((start + len) * scale).ceil() as i32;
    (from, (to - from).max(1))
}

fn render_play_field(frame: &mut Frame, area: Rect, game: &RunnerGame) {
    if area.height < 6 || area.width < 20 {
        return;
    }

    let mut buffer = CellBuffer::new(area.width, area.height);
    let scale = Scale {
        x: area.width as f64 / STAGE_WIDTH,
        y: (area.height - 1) as f64 / STAGE_HEIGHT,
    };

    // Ground lines scroll at half the obstacle speed.
    let offset = scale.col(game.background_x);
    for ground in [TOP_LANE_GROUND, BOTTOM_LANE_GROUND] {
        let row = scale.row(ground);
        for col in 0..area.width as i32 {
            let ch = if (col + offset).rem_euclid(6) == 0 {
                GROUND_SUB
            } else {
                GROUND_CHAR
            };
            buffer.put(col, row, ch, Color::Rgb(90, 90, 110));
        }
    }

    for obstacle in &game.obstacles {
        let (col, width) = cell_span(obstacle.x, obstacle.width, scale.x);
        let (row, height) = cell_span(obstacle.y, obstacle.height, scale.y);
        let (ch, color) = match obstacle.kind {
            ObstacleKind::Ground => (
                GROUND_OBSTACLE_CHARS[obstacle.variant as usize % GROUND_OBSTACLE_CHARS.len()],
                Color::Yellow,
            ),
            ObstacleKind::Flying => (
                FLYING_OBSTACLE_CHARS[obstacle.variant as usize % FLYING_OBSTACLE_CHARS.len()],
                Color::LightRed,
            ),
        };
        // Ground obstacles sink into the floor; keep the ground line visible.
        let ground_row = scale.row(obstacle.lane.ground_y());
        let height = height.min(ground_row - row).max(1);
        buffer.fill(col, row, width, height, ch, color);
    }

    for lane in Lane::ALL {
        let runner = game.runner(lane);
        let (col, width) = cell_span(RUNNER_X, RUNNER_WIDTH, scale.x);
        let row = scale.row(runner.y);
        let bottom_row = scale.row(lane.ground_y()) - 1;
        let airborne_bottom = scale.row(runner.bottom()).min(bottom_row);
        let last_row = if runner.is_airborne() {
            airborne_bottom
        } else {
            bottom_row
        };
        let ch = if runner.pose == RunnerPose::Crouching {
            '▄'
        } else {
            RUNNER_CHAR
        };
        buffer.fill(col, row, width, last_row.max(row) - row + 1, ch, lane_color(lane));
    }

    let score = format!("Score: {}", game.display_score());
    buffer.text(
        area.width as i32 - score.chars().count() as i32 - 1,
        0,
        &score,
        Color::White,
    );

    if game.mode_banner_frames > 0 {
        let banner = format!("~ {} ~", game.mode.label());
        let col = (area.width as i32 - banner.chars().count() as i32) / 2;
        buffer.text(col, 0, &banner, mode_color(game.mode));
    }

    buffer.render(frame, area);
}

fn render_status_bar_content(frame: &mut Frame, area: Rect, game: &RunnerGame) {
    if game.waiting_to_start {
        render_status_bar(
            frame,
            area,
            "Ready",
            Color::LightCyan,
            &[("[Space]", "Start"), ("[Esc]", "Forfeit")],
        );
        return;
    }

    if render_forfeit_status_bar(frame, area, game.forfeit_pending) {
        return;
    }

    if game.paused {
        render_status_bar(
            frame,
            area,
            "Paused",
            Color::Yellow,
            &[("[Space]", "Resume"), ("[Esc]", "Forfeit")],
        );
        return;
    }

    render_status_bar(
        frame,
        area,
        "Fly together!",
        mode_color(game.mode),
        &[
            ("[W/S]", "Top jump/duck"),
            ("[Up/Down]", "Bottom jump/duck"),
            ("[Space]", "Pause"),
        ],
    );
}

fn render_info_panel(frame: &mut Frame, area: Rect, game: &RunnerGame, best: u32) {
    let inner = render_info_panel_frame(frame, area);

    let lines: Vec<Line> = vec![
        Line::from(vec![
            Span::styled("Mode: ", Style::default().fg(Color::DarkGray)),
            Span::styled(
                game.mode.label(),
                Style::default()
                    .fg(mode_color(game.mode))
                    .add_modifier(Modifier::BOLD),
            ),
        ]),
        info_line("Score", game.display_score().to_string(), Color::White),
        info_line("Best", best.max(game.display_score()).to_string(), Color::Yellow),
        info_line("Obstacles", game.obstacle_pairs.to_string(), Color::White),
        info_line("Speed", format!("{:.1}", game.speed), Color::White),
        Line::from(""),
        Line::from(Span::styled(
            "Legend:",
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(vec![
            Span::styled(format!(" {RUNNER_CHAR} "), Style::default().fg(TOP_LANE_COLOR)),
            Span::styled("Player 1 (top)", Style::default().fg(Color::DarkGray)),
        ]),
        Line::from(vec![
            Span::styled(
                format!(" {RUNNER_CHAR} "),
                Style::default().fg(BOTTOM_LANE_COLOR),
            ),
            Span::styled("Player 2 (bottom)", Style::default().fg(Color::DarkGray)),
        ]),
        Line::from(vec![
            Span::styled(" ▲ ", Style::default().fg(Color::Yellow)),
            Span::styled("Jump it", Style::default().fg(Color::DarkGray)),
        ]),
        Line::from(vec![
            Span::styled(" ◆ ", Style::default().fg(Color::LightRed)),
            Span::styled("Duck it", Style::default().fg(Color::DarkGray)),
        ]),
    ];

    frame.render_widget(Paragraph::new(lines), inner);
}

pub fn game_over_text(game: &RunnerGame) -> GameOverText {
    let score_line = format!("Score: {}", game.display_score());
    match game.game_result {
        Some(RunnerResult::Crashed(event)) => {
            let who = match event.lane {
                Lane::Top => "Player 1",
                Lane::Bottom => "Player 2",
            };
            let what = match event.kind {
                ObstacleKind::Ground => "tripped over a ground obstacle",
                ObstacleKind::Flying => "flew into a flying obstacle",
            };
            GameOverText {
                result_type: GameResultType::Loss,
                title: "FLIGHT OVER".to_string(),
                message: format!("{} {}.", who, what),
                score_line,
            }
        }
        _ => GameOverText::forfeit(score_line),
    }
}
