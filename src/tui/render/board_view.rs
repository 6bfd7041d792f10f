use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::model::WorkItem;
use crate::tui::app::App;
use crate::util::unicode::{display_width, fit_width, truncate_to_width};

use super::helpers::{base, dim, heading, input_spans};

const ID_W: usize = 7;
const TYPE_W: usize = 12;
const STATE_W: usize = 12;
const ASSIGNEE_W: usize = 18;

/// Render the work item list for the current page
pub fn render_board_view(frame: &mut Frame, app: &App, area: Rect) {
    let board = &app.board;
    let mut lines: Vec<Line> = Vec::new();

    let scope = if board.show_all || app.username().is_empty() {
        "All work items"
    } else {
        "My work items"
    };
    let mut page = format!("Page {}", board.page + 1);
    if board.has_more {
        page.push_str(" \u{00B7} more \u{2192}");
    }
    let title = format!(" {scope}");
    let pad = (area.width as usize).saturating_sub(display_width(&title) + display_width(&page) + 1);
    lines.push(Line::from(vec![
        Span::styled(title, heading(app)),
        Span::styled(" ".repeat(pad), base(app)),
        Span::styled(page, dim(app)),
    ]));

    let header = format!(
        " {}{}{}{}Title",
        fit_width("ID", ID_W),
        fit_width("Type", TYPE_W),
        fit_width("State", STATE_W),
        fit_width("Assigned To", ASSIGNEE_W),
    );
    lines.push(Line::from(Span::styled(
        header,
        dim(app).add_modifier(Modifier::UNDERLINED),
    )));

    // Rows left after the two header lines and the delete prompt
    let prompt_rows = if board.delete.is_some() { 2 } else { 0 };
    let rows = (area.height as usize).saturating_sub(2 + prompt_rows);

    if board.items.is_empty() {
        let text = if app.loading {
            " Loading\u{2026}"
        } else {
            " No work items"
        };
        lines.push(Line::from(Span::styled(text, dim(app))));
    } else {
        let offset = (board.cursor + 1).saturating_sub(rows);
        for (i, item) in board.items.iter().enumerate().skip(offset).take(rows) {
            lines.push(item_line(app, item, i == board.cursor, area.width as usize));
        }
    }

    if let Some(confirm) = &board.delete {
        while lines.len() + prompt_rows < area.height as usize {
            lines.push(Line::from(""));
        }
        lines.push(Line::from(Span::styled(
            format!(
                " Delete #{} permanently? Type its title to confirm: {}",
                confirm.item_id,
                truncate_to_width(&confirm.title, 40)
            ),
            Style::default().fg(app.theme.red).bg(app.theme.background),
        )));
        let mut spans = vec![Span::styled(" > ", base(app))];
        spans.extend(input_spans(app, &confirm.input, true));
        lines.push(Line::from(spans));
    }

    frame.render_widget(Paragraph::new(lines).style(base(app)), area);
}

fn item_line(app: &App, item: &WorkItem, selected: bool, width: usize) -> Line<'static> {
    let bg = if selected {
        app.theme.selection_bg
    } else {
        app.theme.background
    };
    let f = &item.fields;
    let fixed = 1 + ID_W + TYPE_W + STATE_W + ASSIGNEE_W;
    let title_w = width.saturating_sub(fixed);

    let mut title_style = Style::default().fg(app.theme.text_bright).bg(bg);
    if selected {
        title_style = title_style.add_modifier(Modifier::BOLD);
    }
    Line::from(vec![
        Span::styled(
            if selected { "\u{25B8}" } else { " " },
            Style::default().fg(app.theme.highlight).bg(bg),
        ),
        Span::styled(
            fit_width(&item.id.to_string(), ID_W),
            Style::default().fg(app.theme.dim).bg(bg),
        ),
        Span::styled(
            fit_width(&f.work_item_type, TYPE_W),
            Style::default()
                .fg(app.theme.type_color(&f.work_item_type))
                .bg(bg),
        ),
        Span::styled(
            fit_width(&f.state, STATE_W),
            Style::default().fg(app.theme.state_color(&f.state)).bg(bg),
        ),
        Span::styled(
            fit_width(item.assignee_name(), ASSIGNEE_W),
            Style::default().fg(app.theme.text).bg(bg),
        ),
        Span::styled(fit_width(&f.title, title_w), title_style),
    ])
}
