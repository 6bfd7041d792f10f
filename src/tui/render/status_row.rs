use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::tui::app::{App, Screen};
use crate::util::unicode::truncate_to_width;

use super::helpers::{dim, spans_width};

/// Render the status row (bottom of screen): error, message or loading on
/// the left, key hints on the right when they fit.
pub fn render_status_row(frame: &mut Frame, app: &App, area: Rect) {
    let bg = app.theme.background;
    let width = area.width as usize;

    let mut spans = Vec::new();
    if let Some(error) = &app.error {
        spans.push(Span::styled(
            truncate_to_width(&format!(" {error}"), width),
            Style::default().fg(app.theme.red).bg(bg),
        ));
    } else if let Some(message) = &app.message {
        spans.push(Span::styled(
            truncate_to_width(&format!(" {message}"), width),
            Style::default().fg(app.theme.green).bg(bg),
        ));
    } else if app.loading {
        spans.push(Span::styled(
            " Loading\u{2026}",
            Style::default().fg(app.theme.yellow).bg(bg),
        ));
    }

    let hint = key_hints(app);
    let content_width = spans_width(&spans);
    let hint_width = hint.chars().count() + 1;
    if content_width + hint_width < width {
        let padding = width - content_width - hint_width;
        spans.push(Span::styled(" ".repeat(padding), Style::default().bg(bg)));
        spans.push(Span::styled(format!("{hint} "), dim(app)));
    }

    let paragraph = Paragraph::new(Line::from(spans)).style(Style::default().bg(bg));
    frame.render_widget(paragraph, area);
}

fn key_hints(app: &App) -> &'static str {
    match app.screen {
        Screen::Config => "Enter connect  Tab next  ^F settings  ^D forget  Esc quit",
        Screen::Settings => "Space toggle  Tab next  ^S save  Esc back",
        Screen::Board if app.board.delete.is_some() => "Enter delete  Esc cancel",
        Screen::Board => {
            "j/k move  h/l page  Enter open  c new  d delete  a mine/all  r refresh  q quit"
        }
        Screen::Create => "Tab next  \u{2190}/\u{2192} type  Enter create  Esc back",
        Screen::Detail => match &app.detail {
            Some(d) if d.editing => "Enter done  Tab next  ^S save  Esc cancel",
            _ => "e edit  v comments  r related  i iteration  p planning  u links  ^S save  Esc back",
        },
    }
}
