//! Leaderboard of completed tournaments.

use harmony::games::{GameKind, GameScores};
use harmony::tournament::{Leaderboard, LeaderboardEntry};
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

use super::game_common::controls_line;

/// `m:ss`, or `h:mm:ss` past an hour.
pub fn format_duration(secs: u64) -> String {
    let (h, m, s) = (secs / 3600, (secs % 3600) / 60, secs % 60);
    if h > 0 {
        format!("{}:{:02}:{:02}", h, m, s)
    } else {
        format!("{}:{:02}", m, s)
    }
}

fn game_cell(entry: &LeaderboardEntry, kind: GameKind) -> u32 {
    let GameScores { player1, player2 } = entry.scores.get(&kind).copied().unwrap_or_default();
    player1 + player2
}

fn entry_lines(rank: usize, entry: &LeaderboardEntry, highlighted: bool) -> Vec<Line<'static>> {
    let medal = match rank {
        0 => Color::Yellow,
        1 => Color::Gray,
        2 => Color::LightRed,
        _ => Color::White,
    };
    let style = if highlighted {
        Style::default()
            .fg(Color::Black)
            .bg(Color::LightYellow)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(medal)
    };
    let team = format!("{} & {}", entry.player1, entry.player2);
    let date = entry.date.get(..10).unwrap_or(entry.date.as_str()).to_string();

    vec![
        Line::from(vec![
            Span::styled(format!("{:>2}. {:<36}", rank + 1, team), style),
            Span::styled(
                format!("{:>6}", entry.combined_total()),
                style.add_modifier(Modifier::BOLD),
            ),
        ]),
        Line::from(Span::styled(
            format!(
                "    {} {}  {} {}  {} {}   {}  {}",
                GameKind::Runner.title(),
                game_cell(entry, GameKind::Runner),
                GameKind::SnakeBattle.title(),
                game_cell(entry, GameKind::SnakeBattle),
                GameKind::Boxing.title(),
                game_cell(entry, GameKind::Boxing),
                format_duration(entry.duration_secs),
                date,
            ),
            Style::default().fg(Color::DarkGray),
        )),
    ]
}

pub fn render_leaderboard(
    frame: &mut Frame,
    area: Rect,
    board: &Leaderboard,
    highlight: Option<usize>,
    notice: Option<&str>,
) {
    frame.render_widget(Clear, area);

    let block = Block::default()
        .title(" Leaderboard ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Yellow));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints([
            Constraint::Length(1), // Notice
            Constraint::Min(3),
            Constraint::Length(1), // Controls
        ])
        .split(inner);

    if let Some(notice) = notice {
        frame.render_widget(
            Paragraph::new(notice.to_string())
                .style(Style::default().fg(Color::LightYellow))
                .alignment(Alignment::Center),
            chunks[0],
        );
    }

    let lines: Vec<Line> = if board.entries.is_empty() {
        vec![Line::from(Span::styled(
            "No tournaments completed yet.",
            Style::default().fg(Color::DarkGray),
        ))]
    } else {
        board
            .entries
            .iter()
            .enumerate()
            .flat_map(|(rank, entry)| entry_lines(rank, entry, highlight == Some(rank)))
            .collect()
    };
    frame.render_widget(Paragraph::new(lines), chunks[1]);

    frame.render_widget(
        Paragraph::new(controls_line(&[("[Esc/Enter]", "Back")])).alignment(Alignment::Center),
        chunks[2],
    );
}
