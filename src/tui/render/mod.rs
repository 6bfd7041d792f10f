pub mod board_view;
pub mod config_view;
pub mod create_view;
pub mod detail_view;
mod helpers;
pub mod settings_view;
pub mod status_row;

#[cfg(test)]
pub mod test_helpers;

use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph};

use super::app::{App, Screen};
use helpers::{dim, heading, spans_width};

/// Main render function: dispatches to the screen renderers
pub fn render(frame: &mut Frame, app: &App) {
    let area = frame.area();

    // Background fill
    let bg_style = Style::default().bg(app.theme.background);
    frame.render_widget(Block::default().style(bg_style), area);

    // Layout: title bar (2 rows) | content | status row (1 row)
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2),
            Constraint::Min(1),
            Constraint::Length(1),
        ])
        .split(area);

    render_title_bar(frame, app, chunks[0]);

    match app.screen {
        Screen::Config => config_view::render_config_view(frame, app, chunks[1]),
        Screen::Settings => settings_view::render_settings_view(frame, app, chunks[1]),
        Screen::Board => board_view::render_board_view(frame, app, chunks[1]),
        Screen::Create => create_view::render_create_view(frame, app, chunks[1]),
        Screen::Detail => detail_view::render_detail_view(frame, app, chunks[1]),
    }

    status_row::render_status_row(frame, app, chunks[2]);
}

/// App name and session on the first row, a separator on the second.
fn render_title_bar(frame: &mut Frame, app: &App, area: Rect) {
    let width = area.width as usize;
    let mut spans = vec![Span::styled(" workboard", heading(app))];
    if let Some(session) = &app.session {
        let mut scope = format!("  {}/{}", session.organization, session.project);
        if !session.team.is_empty() {
            scope.push_str(&format!(" \u{00B7} {}", session.team));
        }
        spans.push(Span::styled(scope, dim(app)));
    }

    let (status, color) = if app.connected {
        ("\u{25CF} connected ", app.theme.green)
    } else {
        ("\u{25CB} offline ", app.theme.dim)
    };
    let used = spans_width(&spans) + status.chars().count();
    if used < width {
        spans.push(Span::styled(" ".repeat(width - used), dim(app)));
        spans.push(Span::styled(
            status,
            Style::default().fg(color).bg(app.theme.background),
        ));
    }

    let lines = vec![
        Line::from(spans),
        Line::from(Span::styled("\u{2500}".repeat(width), dim(app))),
    ];
    frame.render_widget(Paragraph::new(lines).style(dim(app)), area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_helpers::*;

    #[test]
    fn full_frame_has_title_content_and_status() {
        let mut app = board_app(vec![work_item(3, "Tidy backlog", "Task", "New")]);
        app.set_message("Created work item #3");
        let output = render_to_string(100, TERM_H, |frame, _| render(frame, &app));
        assert!(output.contains("workboard"));
        assert!(output.contains("contoso/Web"));
        assert!(output.contains("connected"));
        assert!(output.contains("Tidy backlog"));
        assert!(output.contains("Created work item #3"));
    }

    #[test]
    fn error_replaces_message_in_status_row() {
        let mut app = board_app(Vec::new());
        app.set_message("hello");
        app.set_error("title does not match - deletion cancelled");
        let output = render_to_string(100, TERM_H, |frame, _| render(frame, &app));
        assert!(output.contains("title does not match - deletion cancelled"));
        assert!(!output.contains("hello"));
    }
}
