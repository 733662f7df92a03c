use std::collections::VecDeque;

use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use super::display::{DisplayBoard, DisplayCell};
use crate::game::{Outcome, Player, Scoreboard, TurnState};

/// Everything the game screen shows, borrowed from the app for one frame.
pub struct GameView<'a> {
    pub state: TurnState,
    pub display: &'a DisplayBoard,
    pub human: Player,
    pub bot: &'a str,
    pub selected_column: usize,
    pub score: Scoreboard,
    pub message: Option<&'a str>,
    pub history: &'a VecDeque<String>,
}

pub fn render(frame: &mut Frame, view: &GameView) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Min(view.display.height() as u16 + 5), // Board + history
            Constraint::Length(3), // Message
            Constraint::Length(4), // Controls
        ])
        .split(frame.area());

    let middle = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Min(30), Constraint::Length(32)])
        .split(rows[1]);

    render_header(frame, view, rows[0]);
    render_board(frame, view.display, view.selected_column, middle[0]);
    render_history(frame, view.history, middle[1]);
    render_message(frame, view.message, rows[2]);
    render_controls(frame, view, rows[3]);
}

fn player_color(player: Player) -> Color {
    match player {
        Player::Red => Color::Red,
        Player::Yellow => Color::Yellow,
    }
}

fn render_header(frame: &mut Frame, view: &GameView, area: Rect) {
    let (status, color) = match view.state {
        TurnState::Awaiting(player) if player == view.human => {
            (format!("Your turn ({})", player.name()), player_color(player))
        }
        TurnState::Awaiting(player) => {
            (format!("{} is thinking", view.bot), player_color(player))
        }
        TurnState::Terminal(Outcome::Win(player)) => {
            (format!("Game Over  |  {} wins", player.name()), player_color(player))
        }
        TurnState::Terminal(_) => ("Game Over  |  Draw".to_string(), Color::White),
    };

    let score = if view.score.played > 0 {
        format!(
            "  |  You have won {} of {} games",
            view.score.wins(view.human),
            view.score.played
        )
    } else {
        String::new()
    };

    let header = Paragraph::new(format!("{status}  |  vs {}{score}", view.bot))
        .style(Style::default().fg(color).add_modifier(Modifier::BOLD))
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title("Connect Four"),
        );

    frame.render_widget(header, area);
}

fn render_board(frame: &mut Frame, display: &DisplayBoard, selected_column: usize, area: Rect) {
    let width = display.width();
    let mut lines = Vec::new();

    // Column numbers with selection indicator
    let mut col_line = vec![Span::raw("   ")]; // Padding (3 chars to match "  ║")
    for col in 0..width {
        let label = format!("{:^3}", col + 1);
        if col == selected_column {
            col_line.push(Span::styled(
                label,
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD | Modifier::UNDERLINED),
            ));
        } else {
            col_line.push(Span::raw(label));
        }
    }
    col_line.push(Span::raw("  ")); // Suffix padding to match " ║"
    lines.push(Line::from(col_line));

    let rule = "═".repeat(3 * width + 1);
    lines.push(Line::from(format!("  ╔{rule}╗")));

    for row in 0..display.height() {
        let mut row_spans = vec![Span::raw("  ║")];

        for col in 0..width {
            let (symbol, style) = match display.cell(row, col) {
                DisplayCell::Empty => (" . ", Style::default().fg(Color::DarkGray)),
                DisplayCell::Chip(player) => (" ● ", Style::default().fg(player_color(player))),
                DisplayCell::Preview(player) => (
                    " ○ ",
                    Style::default()
                        .fg(player_color(player))
                        .add_modifier(Modifier::DIM),
                ),
            };
            row_spans.push(Span::styled(symbol, style));
        }

        row_spans.push(Span::raw(" ║"));
        lines.push(Line::from(row_spans));
    }

    lines.push(Line::from(format!("  ╚{rule}╝")));

    // Selection indicator
    let mut indicator_line = vec![Span::raw("   ")]; // Align with board (3 chars to match "  ║")
    for col in 0..width {
        if col == selected_column {
            indicator_line.push(Span::styled(" ▲ ", Style::default().fg(Color::Cyan)));
        } else {
            indicator_line.push(Span::raw("   "));
        }
    }
    indicator_line.push(Span::raw("  ")); // Suffix padding to match " ║"
    lines.push(Line::from(indicator_line));

    let board_widget = Paragraph::new(lines).alignment(Alignment::Center);
    frame.render_widget(board_widget, area);
}

fn render_history(frame: &mut Frame, history: &VecDeque<String>, area: Rect) {
    let lines: Vec<Line> = history.iter().map(|entry| Line::from(entry.as_str())).collect();
    let widget = Paragraph::new(lines).block(Block::default().borders(Borders::ALL).title("Moves"));
    frame.render_widget(widget, area);
}

fn render_message(frame: &mut Frame, message: Option<&str>, area: Rect) {
    let msg_widget = Paragraph::new(message.unwrap_or(""))
        .style(Style::default().fg(Color::Yellow))
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL));

    frame.render_widget(msg_widget, area);
}

fn render_controls(frame: &mut Frame, view: &GameView, area: Rect) {
    let line1 = Line::from("←/→: Move  |  Enter: Drop  |  R: Restart  |  Q: Quit");
    let line2 = Line::from(vec![
        Span::styled(
            "You",
            Style::default()
                .fg(player_color(view.human))
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw(format!(" play {}  |  B: switch network", view.human.name())),
    ]);

    let controls = Paragraph::new(vec![line1, line2])
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title("Controls"),
        );

    frame.render_widget(controls, area);
}
