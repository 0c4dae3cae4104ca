//! Shared UI components for the games.

use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

/// Layout areas returned by `create_game_layout`.
pub struct GameLayout {
    /// Main content area (stage/grid) - top left, inside outer border
    pub content: Rect,
    /// Status bar area (2 lines) - bottom left, inside outer border
    pub status_bar: Rect,
    /// Info panel area - right side, with its own border
    pub info_panel: Rect,
}

/// Create a standardized game layout with outer border.
///
/// ```text
/// ┌─ Title ─────────────────────────┬─ Info ──────┐
/// │                                 │             │
/// │   [content area]                │  [info]     │
/// │                                 │             │
/// │ [status bar - 2 lines]          │             │
/// └─────────────────────────────────┴─────────────┘
/// ```
pub fn create_game_layout(
    frame: &mut Frame,
    area: Rect,
    title: &str,
    border_color: Color,
    content_min_height: u16,
    info_panel_width: u16,
) -> GameLayout {
    frame.render_widget(Clear, area);

    let block = Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border_color));

    let inner = block.inner(area);
    frame.render_widget(block, area);

    // Horizontal split: content area (left) | info panel (right)
    let h_chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Min(20), Constraint::Length(info_panel_width)])
        .split(inner);

    // Left side: content (top) + status bar (bottom 2 lines)
    let v_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(content_min_height), Constraint::Length(2)])
        .split(h_chunks[0]);

    GameLayout {
        content: v_chunks[0],
        status_bar: v_chunks[1],
        info_panel: h_chunks[1],
    }
}

/// Render a standardized status bar (2 lines: status message + controls).
///
/// `controls` is a slice of (key, action) pairs, e.g. `[("[Space]", "Pause")]`.
pub fn render_status_bar(
    frame: &mut Frame,
    area: Rect,
    status_text: &str,
    status_color: Color,
    controls: &[(&str, &str)],
) {
    if area.height < 1 {
        return;
    }

    let status = Paragraph::new(status_text)
        .style(Style::default().fg(status_color))
        .alignment(Alignment::Center);
    frame.render_widget(status, Rect { height: 1, ..area });

    if area.height >= 2 && !controls.is_empty() {
        frame.render_widget(
            Paragraph::new(controls_line(controls)).alignment(Alignment::Center),
            Rect {
                y: area.y + 1,
                height: 1,
                ..area
            },
        );
    }
}

/// `[Key] Action` pairs as one styled line.
pub fn controls_line(controls: &[(&str, &str)]) -> Line<'static> {
    let mut spans = Vec::new();
    for (i, (key, action)) in controls.iter().enumerate() {
        if i > 0 {
            spans.push(Span::raw("  "));
        }
        spans.push(Span::styled(key.to_string(), Style::default().fg(Color::White)));
        spans.push(Span::styled(
            format!(" {}", action),
            Style::default().fg(Color::DarkGray),
        ));
    }
    Line::from(spans)
}

/// Game result type for the shared overlay.
#[derive(Clone, Copy, PartialEq, Eq)]
pub enum GameResultType {
    Win,
    Loss,
    Draw,
    Forfeit,
}

impl GameResultType {
    pub fn color(self) -> Color {
        match self {
            GameResultType::Win => Color::Green,
            GameResultType::Loss => Color::Red,
            GameResultType::Draw => Color::Yellow,
            GameResultType::Forfeit => Color::Gray,
        }
    }
}

/// What the game-over overlay says about a finished game.
pub struct GameOverText {
    pub result_type: GameResultType,
    pub title: String,
    pub message: String,
    pub score_line: String,
}

impl GameOverText {
    pub fn forfeit(score_line: String) -> Self {
        Self {
            result_type: GameResultType::Forfeit,
            title: "FORFEITED".to_string(),
            message: "The game was abandoned.".to_string(),
            score_line,
        }
    }
}

/// Render the game over box over whatever is already drawn in `area`.
///
/// Title (bold, colored by result), a message, a score line and the
/// controls that leave the screen. `controls` is empty during the grace
/// period after a game ends.
pub fn render_game_over_overlay(
    frame: &mut Frame,
    area: Rect,
    result_type: GameResultType,
    title: &str,
    message: &str,
    score_line: &str,
    controls: &[(&str, &str)],
) {
    frame.render_widget(Clear, area);

    let title_color = result_type.color();

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(title_color));

    let inner = block.inner(area);
    frame.render_widget(block, area);

    let content_height: u16 = 7;
    let y_offset = inner.y + (inner.height.saturating_sub(content_height)) / 2;

    let lines = vec![
        Line::from(Span::styled(
            title.to_string(),
            Style::default()
                .fg(title_color)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(Span::styled(
            message.to_string(),
            Style::default().fg(Color::White),
        )),
        Line::from(""),
        Line::from(Span::styled(
            score_line.to_string(),
            Style::default().fg(Color::Cyan),
        )),
        Line::from(""),
        controls_line(controls),
    ];

    let text = Paragraph::new(lines).alignment(Alignment::Center);
    frame.render_widget(
        text,
        Rect::new(inner.x, y_offset, inner.width, content_height.min(inner.height)),
    );
}

/// Render an info panel frame with standard " Info " title and DarkGray border.
///
/// Returns the inner Rect for content rendering.
pub fn render_info_panel_frame(frame: &mut Frame, area: Rect) -> Rect {
    let block = Block::default()
        .title(" Info ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray));
    let inner = block.inner(area);
    frame.render_widget(block, area);
    inner
}

/// `label value` line for info panels.
pub fn info_line(label: &str, value: String, value_color: Color) -> Line<'static> {
    Line::from(vec![
        Span::styled(format!("{}: ", label), Style::default().fg(Color::DarkGray)),
        Span::styled(value, Style::default().fg(value_color)),
    ])
}

pub const FORFEIT_STATUS_TEXT: &str = "Forfeit game?";
pub const FORFEIT_STATUS_COLOR: Color = Color::Red;
pub const FORFEIT_CONTROLS: &[(&str, &str)] = &[("[Esc]", "Confirm"), ("[Any]", "Cancel")];

/// Render the forfeit confirmation status bar if pending. Returns true if it
/// was drawn.
pub fn render_forfeit_status_bar(frame: &mut Frame, area: Rect, forfeit_pending: bool) -> bool {
    if !forfeit_pending {
        return false;
    }
    render_status_bar(
        frame,
        area,
        FORFEIT_STATUS_TEXT,
        FORFEIT_STATUS_COLOR,
        FORFEIT_CONTROLS,
    );
    true
}

/// Render a bold one-line prompt centered on the play field.
pub fn render_center_prompt(frame: &mut Frame, area: Rect, prompt: &str) {
    if area.height < 3 || area.width < prompt.chars().count() as u16 {
        return;
    }

    let width = prompt.chars().count() as u16;
    let x = area.x + area.width.saturating_sub(width) / 2;
    let y = area.y + area.height / 2;

    let line = Paragraph::new(Line::from(Span::styled(
        prompt.to_string(),
        Style::default()
            .fg(Color::White)
            .add_modifier(Modifier::BOLD),
    )));
    frame.render_widget(line, Rect::new(x, y, width, 1));
}

/// Cell in a render buffer with foreground and background colors.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct Cell {
    pub ch: char,
    pub fg: Color,
    pub bg: Color,
}

impl Default for Cell {
    fn default() -> Self {
        Self {
            ch: ' ',
            fg: Color::Reset,
            bg: Color::Reset,
        }
    }
}

/// A 2D grid of cells drawn into, then stamped row by row as Paragraphs.
/// Writes outside the grid are dropped.
pub struct CellBuffer {
    pub width: u16,
    pub height: u16,
    rows: Vec<Vec<Cell>>,
}

impl CellBuffer {
    pub fn new(width: u16, height: u16) -> Self {
        Self {
            width,
            height,
            rows: vec![vec![Cell::default(); width as usize]; height as usize],
        }
    }

    pub fn put(&mut self, col: i32, row: i32, ch: char, fg: Color) {
        if let Some(cell) = self.cell_mut(col, row) {
            cell.ch = ch;
            cell.fg = fg;
        }
    }

    pub fn text(&mut self, col: i32, row: i32, text: &str, fg: Color) {
        for (i, ch) in text.chars().enumerate() {
            self.put(col + i as i32, row, ch, fg);
        }
    }

    /// Fill a rectangle of cells, clipped to the buffer.
    pub fn fill(&mut self, col: i32, row: i32, width: i32, height: i32, ch: char, fg: Color) {
        for dy in 0..height {
            for dx in 0..width {
                self.put(col + dx, row + dy, ch, fg);
            }
        }
    }

    fn cell_mut(&mut self, col: i32, row: i32) -> Option<&mut Cell> {
        if col < 0 || row < 0 {
            return None;
        }
        self.rows
            .get_mut(row as usize)
            .and_then(|r| r.get_mut(col as usize))
    }

    /// Stamp the buffer into `area`, batching runs of equal style into spans.
    pub fn render(&self, frame: &mut Frame, area: Rect) {
        let height = self.height.min(area.height);
        let width = self.width.min(area.width);

        for (row_idx, row_data) in self.rows.iter().enumerate().take(height as usize) {
            let mut spans: Vec<Span> = Vec::new();
            let mut current_fg = Color::Reset;
            let mut current_bg = Color::Reset;
            let mut current_text = String::new();

            for &cell in row_data.iter().take(width as usize) {
                if (cell.fg != current_fg || cell.bg != current_bg) && !current_text.is_empty() {
                    spans.push(Span::styled(
                        std::mem::take(&mut current_text),
                        Style::default().fg(current_fg).bg(current_bg),
                    ));
                }
                current_fg = cell.fg;
                current_bg = cell.bg;
                current_text.push(cell.ch);
            }
            if !current_text.is_empty() {
                spans.push(Span::styled(
                    current_text,
                    Style::default().fg(current_fg).bg(current_bg),
                ));
            }

            let row_area = Rect::new(area.x, area.y + row_idx as u16, width, 1);
            frame.render_widget(Paragraph::new(Line::from(spans)), row_area);
        }
    }
}
