//! Snake battle rendering.
//!
//! Uses half-block pixel rendering. Each grid cell maps to a colored pixel;
//! pairs of vertical pixels are packed into one terminal row using `▀`
//! with fg=top, bg=bottom. Segments are drawn at their eased visual
//! positions, rounded to the nearest cell.

use super::game_common::{
    create_game_layout, info_line, render_center_prompt, render_forfeit_status_bar,
    render_info_panel_frame, render_status_bar, GameOverText, GameResultType,
};
use harmony::games::snake_battle::{
    DeathCause, FoodKind, Snake, SnakeBattleGame, SnakeBattleResult, SPEED_BOOST_MS,
};
use harmony::games::Player;
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

const BORDER_H: char = '─';
const BORDER_V: char = '│';
const BORDER_TL: char = '┌';
const BORDER_TR: char = '┐';
const BORDER_BL: char = '└';
const BORDER_BR: char = '┘';
const HALF_TOP: char = '▀';
const FULL_BLOCK: char = '█';

const EMPTY_BG: Color = Color::Rgb(12, 12, 18);
const DEAD_COLOR: Color = Color::Rgb(70, 70, 70);

/// Head color and the bright/dim ends of the body gradient.
struct Palette {
    head: Color,
    bright: (f64, f64, f64),
    dim: (f64, f64, f64),
}

const PALETTES: [Palette; 2] = [
    Palette {
        head: Color::Rgb(100, 255, 100),
        bright: (50.0, 220.0, 50.0),
        dim: (20.0, 80.0, 20.0),
    },
    Palette {
        head: Color::Rgb(120, 180, 255),
        bright: (60.0, 120.0, 240.0),
        dim: (20.0, 40.0, 100.0),
    },
];

fn player_color(player: Player) -> Color {
    PALETTES[player.index()].head
}

fn food_color(kind: FoodKind) -> Color {
    match kind {
        FoodKind::Apple => Color::Rgb(255, 70, 50),
        FoodKind::Banana => Color::Rgb(255, 220, 60),
        FoodKind::Pear => Color::Rgb(170, 255, 90),
    }
}

fn food_name(kind: FoodKind) -> &'static str {
    match kind {
        FoodKind::Apple => "Apple +1",
        FoodKind::Banana => "Banana +2",
        FoodKind::Pear => "Pear: boost",
    }
}

pub fn render_snake_battle_scene(frame: &mut Frame, area: Rect, game: &SnakeBattleGame) {
    let layout = create_game_layout(frame, area, " Snake Battle ", Color::LightGreen, 10, 22);

    render_play_field(frame, layout.content, game);

    if game.waiting_to_start {
        render_center_prompt(frame, layout.content, "[ Press Space to Start ]");
    } else if game.paused {
        render_center_prompt(frame, layout.content, "[ Paused ]");
    }

    render_status_bar_content(frame, layout.status_bar, game);
    render_info_panel(frame, layout.info_panel, game);
}

fn body_color(palette: &Palette, index: usize, len: usize) -> Color {
    let t = index as f64 / (len - 1).max(1) as f64;
    let r = (palette.bright.0 * (1.0 - t) + palette.dim.0 * t) as u8;
    let g = (palette.bright.1 * (1.0 - t) + palette.dim.1 * t) as u8;
    let b = (palette.bright.2 * (1.0 - t) + palette.dim.2 * t) as u8;
    Color::Rgb(r, g, b)
}

fn paint_snake(pixels: &mut [Vec<Option<Color>>], snake: &Snake, palette: &Palette) {
    let len = snake.len();
    // Tail first so the head wins overlaps.
    for (i, seg) in snake.body.iter().enumerate().rev() {
        let x = seg.visual_x.round();
        let y = seg.visual_y.round();
        if x < 0.0 || y < 0.0 {
            continue;
        }
        let color = if !snake.alive {
            DEAD_COLOR
        } else if i == 0 {
            palette.head
        } else {
            body_color(palette, i, len)
        };
        if let Some(cell) = pixels
            .get_mut(y as usize)
            .and_then(|row| row.get_mut(x as usize))
        {
            *cell = Some(color);
        }
    }
}

fn render_play_field(frame: &mut Frame, area: Rect, game: &SnakeBattleGame) {
    if area.height < 3 || area.width < 5 {
        return;
    }

    let grid = game.grid_size.max(0) as usize;
    let border_color = Color::Rgb(80, 80, 80);

    let mut pixels: Vec<Vec<Option<Color>>> = vec![vec![None; grid]; grid];

    let food = game.food.position;
    if let Some(cell) = pixels
        .get_mut(food.y as usize)
        .and_then(|row| row.get_mut(food.x as usize))
    {
        let pulse = ((game.tick_count % 20) as f64 / 20.0 * std::f64::consts::PI * 2.0).sin();
        *cell = Some(match food_color(game.food.kind) {
            Color::Rgb(r, g, b) => Color::Rgb(
                r,
                (g as f64 * (0.85 + pulse * 0.15)) as u8,
                (b as f64 * (0.85 + pulse * 0.15)) as u8,
            ),
            other => other,
        });
    }

    for player in Player::ALL {
        paint_snake(&mut pixels, game.snake(player), &PALETTES[player.index()]);
    }

    let content_rows = grid.div_ceil(2);
    let render_w = ((grid + 2) as u16).min(area.width);
    let inner_w = render_w as usize - 2;

    let x_off = area.x + (area.width.saturating_sub(render_w)) / 2;
    let y_off = area.y;

    // Top border with both scores
    {
        let scores = format!(
            " {} : {} ",
            game.snake(Player::One).score,
            game.snake(Player::Two).score
        );
        let pad_before = inner_w.saturating_sub(scores.len()) / 2;
        let pad_after = inner_w.saturating_sub(pad_before + scores.len());

        let border = Style::default().fg(border_color);
        let spans = vec![
            Span::styled(BORDER_TL.to_string(), border),
            Span::styled(BORDER_H.to_string().repeat(pad_before), border),
            Span::styled(scores, Style::default().fg(Color::White)),
            Span::styled(BORDER_H.to_string().repeat(pad_after), border),
            Span::styled(BORDER_TR.to_string(), border),
        ];
        frame.render_widget(
            Paragraph::new(Line::from(spans)),
            Rect::new(x_off, y_off, render_w, 1),
        );
    }

    let empty_row: Vec<Option<Color>> = vec![None; grid];
    for term_row in 0..content_rows {
        let top_gy = term_row * 2;
        let bot_gy = term_row * 2 + 1;
        let top_row = pixels.get(top_gy).unwrap_or(&empty_row);
        let bot_row = pixels.get(bot_gy).unwrap_or(&empty_row);

        let mut spans: Vec<Span> = vec![Span::styled(
            BORDER_V.to_string(),
            Style::default().fg(border_color),
        )];

        let mut cur_fg = Color::Reset;
        let mut cur_bg = Color::Reset;
        let mut cur_text = String::new();

        for (&top_c, &bot_c) in top_row.iter().zip(bot_row.iter()).take(inner_w) {
            let fg = top_c.unwrap_or(EMPTY_BG);
            let bg = bot_c.unwrap_or(EMPTY_BG);

            if fg != cur_fg || bg != cur_bg {
                if !cur_text.is_empty() {
                    spans.push(Span::styled(
                        std::mem::take(&mut cur_text),
                        Style::default().fg(cur_fg).bg(cur_bg),
                    ));
                }
                cur_fg = fg;
                cur_bg = bg;
            }
            cur_text.push(HALF_TOP);
        }
        if !cur_text.is_empty() {
            spans.push(Span::styled(
                cur_text,
                Style::default().fg(cur_fg).bg(cur_bg),
            ));
        }

        spans.push(Span::styled(
            BORDER_V.to_string(),
            Style::default().fg(border_color),
        ));

        let row_y = y_off + 1 + term_row as u16;
        if row_y < area.y + area.height {
            frame.render_widget(
                Paragraph::new(Line::from(spans)),
                Rect::new(x_off, row_y, render_w, 1),
            );
        }
    }

    let bot_y = y_off + 1 + content_rows as u16;
    if bot_y < area.y + area.height {
        let mut s = String::new();
        s.push(BORDER_BL);
        s.push_str(&BORDER_H.to_string().repeat(inner_w));
        s.push(BORDER_BR);
        frame.render_widget(
            Paragraph::new(Line::from(Span::styled(
                s,
                Style::default().fg(border_color),
            ))),
            Rect::new(x_off, bot_y, render_w, 1),
        );
    }
}

fn render_status_bar_content(frame: &mut Frame, area: Rect, game: &SnakeBattleGame) {
    if game.waiting_to_start {
        render_status_bar(
            frame,
            area,
            "Ready",
            Color::LightGreen,
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
        "Battle!",
        Color::Green,
        &[
            ("[WASD]", "Player 1"),
            ("[Arrows]", "Player 2"),
            ("[Space]", "Pause"),
        ],
    );
}

fn snake_lines(game: &SnakeBattleGame, player: Player) -> Vec<Line<'static>> {
    let snake = game.snake(player);
    let color = player_color(player);
    let mut lines = vec![
        Line::from(Span::styled(
            format!("{FULL_BLOCK} {}", player.label()),
            Style::default().fg(color).add_modifier(Modifier::BOLD),
        )),
        info_line(" Score", snake.score.to_string(), Color::White),
        info_line(" Length", snake.len().to_string(), Color::White),
    ];
    if snake.is_boosted() {
        let secs = snake.boost_remaining_ms as f64 / 1000.0;
        let filled = (snake.boost_remaining_ms * 8 / SPEED_BOOST_MS) as usize;
        lines.push(Line::from(vec![
            Span::styled(" Boost ", Style::default().fg(Color::DarkGray)),
            Span::styled("▮".repeat(filled), Style::default().fg(Color::LightYellow)),
            Span::styled(format!(" {secs:.1}s"), Style::default().fg(Color::White)),
        ]));
    } else if !snake.alive {
        lines.push(info_line(" Status", "down".to_string(), Color::Red));
    }
    lines
}

fn render_info_panel(frame: &mut Frame, area: Rect, game: &SnakeBattleGame) {
    let inner = render_info_panel_frame(frame, area);

    let mut lines: Vec<Line> = Vec::new();
    lines.extend(snake_lines(game, Player::One));
    lines.push(Line::from(""));
    lines.extend(snake_lines(game, Player::Two));
    lines.push(Line::from(""));
    lines.push(info_line(
        "Wins",
        format!("{} - {}", game.wins[0], game.wins[1]),
        Color::White,
    ));
    lines.push(info_line("Draws", game.draws.to_string(), Color::White));
    lines.push(info_line(
        "Grid",
        format!("{0}x{0}", game.grid_size),
        Color::White,
    ));
    lines.push(Line::from(""));
    for kind in [FoodKind::Apple, FoodKind::Banana, FoodKind::Pear] {
        lines.push(Line::from(vec![
            Span::styled(format!(" {FULL_BLOCK} "), Style::default().fg(food_color(kind))),
            Span::styled(food_name(kind), Style::default().fg(Color::DarkGray)),
        ]));
    }

    frame.render_widget(Paragraph::new(lines), inner);
}

fn death_text(cause: Option<DeathCause>) -> &'static str {
    match cause {
        Some(DeathCause::Wall) => "hit the wall",
        Some(DeathCause::OwnBody) => "bit its own tail",
        Some(DeathCause::OtherSnake) => "ran into the other snake",
        Some(DeathCause::HeadOn) => "collided head-on",
        None => "survived",
    }
}

pub fn game_over_text(game: &SnakeBattleGame) -> GameOverText {
    let score_line = format!(
        "Score {} : {}   Wins {} - {}",
        game.snake(Player::One).score,
        game.snake(Player::Two).score,
        game.wins[0],
        game.wins[1]
    );
    match game.game_result {
        Some(SnakeBattleResult::Winner(player)) => GameOverText {
            result_type: GameResultType::Win,
            title: format!("{} WINS!", player.label().to_uppercase()),
            message: format!(
                "{}'s snake {}.",
                player.other().label(),
                death_text(game.snake(player.other()).death)
            ),
            score_line,
        },
        Some(SnakeBattleResult::Draw) => GameOverText {
            result_type: GameResultType::Draw,
            title: "DRAW".to_string(),
            message: format!(
                "Both snakes went down: {}.",
                death_text(game.snake(Player::One).death)
            ),
            score_line,
        },
        _ => GameOverText::forfeit(score_line),
    }
}
