//! Main menu and tournament name entry.

use crate::app::{MenuItem, NameEntry};
use harmony::build_info;
use harmony::games::{GameKind, Player};
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, Paragraph},
    Frame,
};

use super::game_common::controls_line;

fn blurb(item: MenuItem) -> &'static str {
    match item {
        MenuItem::Play(GameKind::Runner) => "Two runners, two lanes. Jump and duck in sync.",
        MenuItem::Play(GameKind::SnakeBattle) => "Two snakes, one grid. Last one moving wins.",
        MenuItem::Play(GameKind::Boxing) => "Strike on cue together to fell the monster.",
        MenuItem::NewTournament => "All three games back to back, onto the leaderboard.",
        MenuItem::ResumeTournament => "Pick up the unfinished tournament.",
        MenuItem::Leaderboard => "Best tournament teams.",
        MenuItem::Quit => "",
    }
}

pub fn render_menu(
    frame: &mut Frame,
    area: Rect,
    items: &[MenuItem],
    selected: usize,
    notice: Option<&str>,
) {
    frame.render_widget(Clear, area);

    let block = Block::default()
        .title(" Harmony ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints([
            Constraint::Length(2), // Title
            Constraint::Min(items.len() as u16 + 1),
            Constraint::Length(2), // Description + notice
            Constraint::Length(1), // Controls
            Constraint::Length(1), // Version
        ])
        .split(inner);

    let title = Paragraph::new("Two players, one keyboard")
        .style(
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )
        .alignment(Alignment::Center);
    frame.render_widget(title, chunks[0]);

    let list_items: Vec<ListItem> = items
        .iter()
        .enumerate()
        .map(|(i, item)| {
            let (prefix, style) = if i == selected {
                (
                    "> ",
                    Style::default()
                        .fg(Color::Yellow)
                        .add_modifier(Modifier::BOLD),
                )
            } else {
                ("  ", Style::default().fg(Color::White))
            };
            ListItem::new(format!("{}{}", prefix, item.label())).style(style)
        })
        .collect();
    let list_width = 24.min(chunks[1].width);
    let list_area = Rect {
        x: chunks[1].x + (chunks[1].width - list_width) / 2,
        width: list_width,
        ..chunks[1]
    };
    frame.render_widget(List::new(list_items), list_area);

    let mut info = Vec::new();
    if let Some(item) = items.get(selected) {
        info.push(Line::from(Span::styled(
            blurb(*item),
            Style::default().fg(Color::DarkGray),
        )));
    }
    if let Some(notice) = notice {
        info.push(Line::from(Span::styled(
            notice.to_string(),
            Style::default().fg(Color::LightYellow),
        )));
    }
    frame.render_widget(
        Paragraph::new(info).alignment(Alignment::Center),
        chunks[2],
    );

    frame.render_widget(
        Paragraph::new(controls_line(&[
            ("[↑/↓]", "Navigate"),
            ("[Enter]", "Select"),
            ("[q]", "Quit"),
        ]))
        .alignment(Alignment::Center),
        chunks[3],
    );

    frame.render_widget(
        Paragraph::new(build_info::version_line())
            .style(Style::default().fg(Color::DarkGray))
            .alignment(Alignment::Right),
        chunks[4],
    );
}

pub fn render_tournament_setup(frame: &mut Frame, area: Rect, entry: &NameEntry) {
    frame.render_widget(Clear, area);

    let block = Block::default()
        .title(" New Tournament ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Yellow));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(2)
        .constraints([
            Constraint::Length(2), // Title
            Constraint::Length(3), // Player 1
            Constraint::Length(3), // Player 2
            Constraint::Length(2), // Order
            Constraint::Min(0),
            Constraint::Length(1), // Controls
        ])
        .split(inner);

    let title = Paragraph::new("Enter both player names")
        .style(
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        )
        .alignment(Alignment::Center);
    frame.render_widget(title, chunks[0]);

    for player in Player::ALL {
        let focused = entry.focus == player;
        let name = &entry.names[player.index()];
        let text = if focused {
            format!("{}_", name)
        } else {
            name.clone()
        };
        let border = if focused { Color::Yellow } else { Color::DarkGray };
        let field = Paragraph::new(text)
            .block(
                Block::default()
                    .title(format!(" {} ", player.label()))
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(border)),
            )
            .style(Style::default().fg(Color::White));
        frame.render_widget(field, chunks[1 + player.index()]);
    }

    let order = GameKind::ALL
        .iter()
        .map(|kind| kind.title())
        .collect::<Vec<_>>()
        .join("  →  ");
    frame.render_widget(
        Paragraph::new(order)
            .style(Style::default().fg(Color::DarkGray))
            .alignment(Alignment::Center),
        chunks[3],
    );

    frame.render_widget(
        Paragraph::new(controls_line(&[
            ("[Tab]", "Switch"),
            ("[Enter]", "Next/Start"),
            ("[Esc]", "Back"),
        ]))
        .alignment(Alignment::Center),
        chunks[5],
    );
}
