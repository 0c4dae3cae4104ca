//! Just Fight rendering: two boxers flank the monster, each with a cue lane
//! sliding toward their target marker.

use super::game_common::{
    create_game_layout, info_line, render_center_prompt, render_forfeit_status_bar,
    render_info_panel_frame, render_status_bar, CellBuffer, GameOverText, GameResultType,
};
use harmony::games::boxing::{
    BoxerState, BoxingGame, BoxingResult, Cue, MonsterState, Move, RoundState, Side,
    MONSTER_MAX_HEALTH, PLAYER_MAX_HEALTH, PLAYER_ONE_TARGET_X, PLAYER_TWO_TARGET_X, STAGE_WIDTH,
};
use harmony::games::Player;
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

const TARGET_CHAR: char = '◎';
const BAR_FILLED: char = '█';
const BAR_EMPTY: char = '░';

const PLAYER_COLORS: [Color; 2] = [Color::LightCyan, Color::LightMagenta];

const MONSTER_IDLE: [&str; 4] = [" /\\_/\\ ", "( o.o )", " /|#|\\ ", "  / \\  "];
const MONSTER_ATTACK_LEFT: [&str; 4] = [" /\\_/\\ ", "( >.< )", "<=|#|\\ ", "  / \\  "];
const MONSTER_ATTACK_RIGHT: [&str; 4] = [" /\\_/\\ ", "( >.< )", " /|#|=>", "  / \\  "];
const MONSTER_HURT: [&str; 4] = [" /\\_/\\ ", "( x.x )", " \\|#|/ ", "  / \\  "];
const MONSTER_DYING: [&str; 4] = ["       ", " /\\_/\\ ", "( x_x )", "~~~~~~~"];
const MONSTER_DEAD: [&str; 4] = ["       ", "       ", "       ", " _x_x_ "];
const MONSTER_LAUGHING: [&str; 4] = [" /\\_/\\ ", "( ^o^ )", "\\ |#| /", "  / \\  "];

const BOXER_IDLE: [&str; 3] = [" o ", "/|\\", "/ \\"];
const BOXER_HIGH_KICK: [&str; 3] = [" o_", "/| ", "/  "];
const BOXER_LOW_KICK: [&str; 3] = [" o ", "/|\\", "/ _"];
const BOXER_LEFT_PUNCH: [&str; 3] = [" o ", "-|\\", "/ \\"];
const BOXER_RIGHT_PUNCH: [&str; 3] = [" o ", "/|-", "/ \\"];
const BOXER_INJURED: [&str; 3] = [" x ", "\\|/", "/ \\"];

pub fn render_boxing_scene(frame: &mut Frame, area: Rect, game: &BoxingGame) {
    let layout = create_game_layout(frame, area, " Just Fight ", Color::LightRed, 14, 22);

    render_stage(frame, layout.content, game);

    if game.waiting_to_start {
        render_center_prompt(frame, layout.content, "[ Press Space to Start ]");
    } else if game.paused {
        render_center_prompt(frame, layout.content, "[ Paused ]");
    }

    render_status_bar_content(frame, layout.status_bar, game);
    render_info_panel(frame, layout.info_panel, game);
}

/// Green above 60%, yellow above 30%, red below.
pub fn health_color(health: i32, max: i32) -> Color {
    let pct = health.max(0) * 100 / max.max(1);
    if pct > 60 {
        Color::Green
    } else if pct > 30 {
        Color::Yellow
    } else {
        Color::Red
    }
}

fn health_bar(buffer: &mut CellBuffer, col: i32, row: i32, width: i32, health: i32, max: i32) {
    let filled = (health.max(0) * width / max.max(1)).min(width);
    let color = health_color(health, max);
    for i in 0..width {
        if i < filled {
            buffer.put(col + i, row, BAR_FILLED, color);
        } else {
            buffer.put(col + i, row, BAR_EMPTY, Color::Rgb(50, 50, 50));
        }
    }
}

fn monster_sprite(state: MonsterState) -> [&'static str; 4] {
    match state {
        MonsterState::Idle => MONSTER_IDLE,
        MonsterState::Attacking(Side::Left) => MONSTER_ATTACK_LEFT,
        MonsterState::Attacking(Side::Right) => MONSTER_ATTACK_RIGHT,
        MonsterState::Hurt => MONSTER_HURT,
        MonsterState::Dying => MONSTER_DYING,
        MonsterState::Dead => MONSTER_DEAD,
        MonsterState::Laughing => MONSTER_LAUGHING,
    }
}

fn monster_color(state: MonsterState) -> Color {
    match state {
        MonsterState::Hurt | MonsterState::Dying => Color::LightRed,
        MonsterState::Dead => Color::DarkGray,
        MonsterState::Attacking(_) => Color::Red,
        MonsterState::Laughing => Color::LightYellow,
        MonsterState::Idle => Color::Magenta,
    }
}

fn boxer_sprite(state: BoxerState) -> [&'static str; 3] {
    match state {
        BoxerState::Idle => BOXER_IDLE,
        BoxerState::Attacking(Move::HighKick) => BOXER_HIGH_KICK,
        BoxerState::Attacking(Move::LowKick) => BOXER_LOW_KICK,
        BoxerState::Attacking(Move::LeftPunch) => BOXER_LEFT_PUNCH,
        BoxerState::Attacking(Move::RightPunch) => BOXER_RIGHT_PUNCH,
        BoxerState::Injured => BOXER_INJURED,
    }
}

/// Short text over a boxer's head for the current round.
fn round_indicator(round: RoundState) -> Option<(&'static str, Color)> {
    match round {
        RoundState::Awaiting => None,
        RoundState::HitCorrect { early: true } => Some(("EARLY!", Color::LightYellow)),
        RoundState::HitCorrect { early: false } => Some(("HIT!", Color::LightGreen)),
        RoundState::HitWrong => Some(("WRONG", Color::LightRed)),
        RoundState::TimedOut => Some(("TOO SLOW", Color::Red)),
    }
}

fn stage_col(x: f64, width: u16) -> i32 {
    (x / STAGE_WIDTH * width as f64).round() as i32
}

fn draw_cue(buffer: &mut CellBuffer, cue: &Cue, row: i32, color: Color) {
    let target = stage_col(cue.target_x, buffer.width);
    buffer.put(target, row, TARGET_CHAR, Color::DarkGray);
    let col = stage_col(cue.x, buffer.width);
    let cue_color = if cue.arrived { Color::White } else { color };
    buffer.put(col, row, cue.required.arrow(), cue_color);
    buffer.text(
        col - cue.required.label().len() as i32 / 2,
        row + 1,
        cue.required.label(),
        Color::DarkGray,
    );
}

fn render_stage(frame: &mut Frame, area: Rect, game: &BoxingGame) {
    if area.height < 12 || area.width < 40 {
        return;
    }

    let mut buffer = CellBuffer::new(area.width, area.height);
    let w = area.width as i32;
    let center = w / 2;

    // Monster health across the top
    let bar_width = (w / 2).max(10);
    buffer.text(center - bar_width / 2, 0, "MONSTER", Color::White);
    health_bar(
        &mut buffer,
        center - bar_width / 2,
        1,
        bar_width,
        game.monster_health,
        MONSTER_MAX_HEALTH,
    );

    // Cue lanes
    for player in Player::ALL {
        if let Some(cue) = &game.cues[player.index()] {
            draw_cue(&mut buffer, cue, 3, PLAYER_COLORS[player.index()]);
        }
    }

    // Monster sprite centered
    let sprite_row = area.height as i32 - 5;
    let monster = monster_sprite(game.monster_state);
    for (i, line) in monster.iter().enumerate() {
        buffer.text(
            center - 3,
            sprite_row + i as i32 - 1,
            line,
            monster_color(game.monster_state),
        );
    }

    // Boxers at their targets
    for player in Player::ALL {
        let boxer = game.boxer(player);
        let target = match player {
            Player::One => PLAYER_ONE_TARGET_X,
            Player::Two => PLAYER_TWO_TARGET_X,
        };
        let col = stage_col(target, area.width) - 1;
        let color = if boxer.state == BoxerState::Injured {
            Color::Red
        } else {
            PLAYER_COLORS[player.index()]
        };
        for (i, line) in boxer_sprite(boxer.state).iter().enumerate() {
            buffer.text(col, sprite_row + i as i32, line, color);
        }
        if let Some((label, label_color)) = round_indicator(boxer.round) {
            buffer.text(
                col + 1 - label.len() as i32 / 2,
                sprite_row - 2,
                label,
                label_color,
            );
        }
        health_bar(
            &mut buffer,
            col - 3,
            sprite_row + 3,
            9,
            boxer.health,
            PLAYER_MAX_HEALTH,
        );
    }

    buffer.render(frame, area);
}

fn render_status_bar_content(frame: &mut Frame, area: Rect, game: &BoxingGame) {
    if game.waiting_to_start {
        render_status_bar(
            frame,
            area,
            "Ready",
            Color::LightRed,
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
        "Strike together!",
        Color::LightRed,
        &[
            ("[WASD]", "Player 1"),
            ("[Arrows]", "Player 2"),
            ("[Space]", "Pause"),
        ],
    );
}

fn render_info_panel(frame: &mut Frame, area: Rect, game: &BoxingGame) {
    let inner = render_info_panel_frame(frame, area);

    let mut lines: Vec<Line> = vec![
        info_line("Round", game.round.to_string(), Color::White),
        Line::from(vec![
            Span::styled("Score: ", Style::default().fg(Color::DarkGray)),
            Span::styled(
                game.total_score().to_string(),
                Style::default()
                    .fg(Color::White)
                    .add_modifier(Modifier::BOLD),
            ),
        ]),
        info_line(" Bonus", game.timing_bonus.to_string(), Color::LightYellow),
        info_line(
            "Monster",
            format!("{}/{}", game.monster_display_health(), MONSTER_MAX_HEALTH),
            health_color(game.monster_health, MONSTER_MAX_HEALTH),
        ),
    ];
    for player in Player::ALL {
        let boxer = game.boxer(player);
        lines.push(info_line(
            player.label(),
            format!("{}/{}", boxer.display_health(), PLAYER_MAX_HEALTH),
            health_color(boxer.health, PLAYER_MAX_HEALTH),
        ));
    }
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        "Strikes:",
        Style::default()
            .fg(Color::Yellow)
            .add_modifier(Modifier::BOLD),
    )));
    for mv in Move::ALL {
        lines.push(Line::from(vec![
            Span::styled(format!(" {} ", mv.arrow()), Style::default().fg(Color::White)),
            Span::styled(mv.label(), Style::default().fg(Color::DarkGray)),
        ]));
    }

    frame.render_widget(Paragraph::new(lines), inner);
}

pub fn game_over_text(game: &BoxingGame) -> GameOverText {
    let score_line = format!(
        "Score: {} ({} bonus)",
        game.total_score(),
        game.timing_bonus
    );
    match game.game_result {
        Some(BoxingResult::Victory) => GameOverText {
            result_type: GameResultType::Win,
            title: "MONSTER DEFEATED!".to_string(),
            message: format!("Teamwork won it in {} rounds.", game.round),
            score_line,
        },
        Some(BoxingResult::Defeat) => GameOverText {
            result_type: GameResultType::Loss,
            title: "KNOCKED OUT".to_string(),
            message: "The monster laughs over its beaten challengers.".to_string(),
            score_line,
        },
        _ => GameOverText::forfeit(score_line),
    }
}
