use chatterbox_core::{MessageRow, Sender};
use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Paragraph},
};
use unicode_segmentation::UnicodeSegmentation;

use super::app::{AppMode, ChatApp};

const PLACEHOLDER: &str = "send a message to textbox";

pub fn render(frame: &mut Frame, app: &mut ChatApp) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // Header
            Constraint::Min(1),    // Messages
            Constraint::Length(3), // Input
            Constraint::Length(1), // Status bar
        ])
        .split(frame.area());

    render_header(frame, app, chunks[0]);
    render_messages(frame, app, chunks[1]);
    render_input(frame, app, chunks[2]);
    render_status_bar(frame, app, chunks[3]);
}

fn render_header(frame: &mut Frame, app: &ChatApp, area: Rect) {
    let title = format!(
        "cbx chat - {}  ({} messages)",
        app.responder_label,
        app.messages().len()
    );

    let header = Paragraph::new(title).style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD));

    frame.render_widget(header, area);
}

/// Splits `text` into lines of at most `width` terminal columns, breaking
/// between grapheme clusters. Every source line, including an empty one,
/// yields at least one output line. A single cluster wider than `width` gets
/// a line of its own.
fn wrap(text: &str, width: usize) -> Vec<String> {
    let width = width.max(1);
    let mut out = Vec::new();

    for line in text.split('\n') {
        let mut current = String::new();
        let mut used = 0;

        for grapheme in line.graphemes(true) {
            let w = Span::raw(grapheme).width();
            if used + w > width && !current.is_empty() {
                out.push(std::mem::take(&mut current));
                used = 0;
            }
            current.push_str(grapheme);
            used += w;
        }

        out.push(current);
    }

    out
}

/// Lays out message rows as terminal lines: a sender label, the wrapped
/// text, then a blank separator. User messages are right-aligned.
pub fn message_lines<'a>(rows: impl Iterator<Item = MessageRow<'a>>, width: usize) -> Vec<Line<'static>> {
    let text_width = width.saturating_sub(2);
    let mut lines = Vec::new();

    for row in rows {
        let (label, style, alignment) = match row.sender {
            Sender::User => ("You", Style::default().fg(Color::Green), Alignment::Right),
            Sender::Bot => ("Bot", Style::default().fg(Color::Blue), Alignment::Left),
        };

        lines.push(
            Line::from(Span::styled(label, style.add_modifier(Modifier::BOLD))).alignment(alignment),
        );

        for chunk in wrap(row.text, text_width) {
            let padded = match row.sender {
                Sender::User => format!("{}  ", chunk),
                Sender::Bot => format!("  {}", chunk),
            };
            lines.push(Line::from(padded).alignment(alignment));
        }

        lines.push(Line::from(""));
    }

    lines
}

fn render_messages(frame: &mut Frame, app: &mut ChatApp, area: Rect) {
    let inner_width = area.width.saturating_sub(2) as usize;
    let mut lines = message_lines(app.view.rows(app.messages()), inner_width);

    if app.mode == AppMode::Loading {
        lines.push(Line::from(Span::styled(
            "Bot is typing...",
            Style::default().fg(Color::Yellow).add_modifier(Modifier::ITALIC),
        )));
    }

    if let Some(ref error) = app.last_error {
        lines.push(Line::from(Span::styled(
            format!("Error: {}", error),
            Style::default().fg(Color::Red),
        )));
    }

    let visible_height = area.height.saturating_sub(2) as usize; // Account for borders
    let scroll = app.view.scroll_mut().set_extent(lines.len(), visible_height);

    let paragraph = Paragraph::new(Text::from(lines))
        .block(Block::default().borders(Borders::ALL).title("Messages"))
        .scroll((scroll as u16, 0));

    frame.render_widget(paragraph, area);
}

fn render_input(frame: &mut Frame, app: &ChatApp, area: Rect) {
    let input_block = Block::default().borders(Borders::ALL).title("Input");
    let inner = input_block.inner(area);
    let inner_width = inner.width as usize;

    let draft = app.input.pending();
    let column = Span::raw(app.input.before_cursor()).width();
    let hscroll = (column + 1).saturating_sub(inner_width);

    let paragraph = if draft.is_empty() {
        Paragraph::new(PLACEHOLDER).style(Style::default().fg(Color::DarkGray))
    } else {
        Paragraph::new(draft.to_string()).scroll((0, hscroll as u16))
    };

    frame.render_widget(paragraph.block(input_block), area);

    if app.mode == AppMode::Chat && !inner.is_empty() {
        let cursor_x = inner.x + column.saturating_sub(hscroll) as u16;
        frame.set_cursor_position((cursor_x, inner.y));
    }
}

fn render_status_bar(frame: &mut Frame, app: &ChatApp, area: Rect) {
    let status = match app.mode {
        AppMode::Chat => "Enter: Send  Ctrl+↑/↓ PgUp/PgDn: Scroll  Esc: Quit",
        AppMode::Loading => "Waiting for reply...  Esc: Quit",
    };

    let status_bar = Paragraph::new(status).style(Style::default().fg(Color::DarkGray));

    frame.render_widget(status_bar, area);
}
