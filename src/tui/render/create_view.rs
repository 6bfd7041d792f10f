use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::tui::app::{App, CreateField};

use super::helpers::{base, dim, field_line, heading, input_spans};

const LABEL_WIDTH: usize = 14;

pub fn render_create_view(frame: &mut Frame, app: &App, area: Rect) {
    let form = &app.create;
    let mut lines = vec![
        Line::from(Span::styled(" New work item", heading(app))),
        Line::from(""),
    ];

    let inputs = [
        (CreateField::Title, "Title", &form.title),
        (CreateField::Description, "Description", &form.description),
        (CreateField::Priority, "Priority", &form.priority),
        (CreateField::Assignee, "Assigned To", &form.assignee),
    ];
    for (field, label, input) in inputs {
        let focused = form.focus == field;
        lines.push(field_line(
            app,
            label,
            LABEL_WIDTH,
            input_spans(app, input, focused),
            focused,
        ));
    }

    let type_name = app.type_name(form.type_index);
    let type_focused = form.focus == CreateField::Type;
    let arrows = if type_focused { dim(app) } else { base(app) };
    lines.push(field_line(
        app,
        "Type",
        LABEL_WIDTH,
        vec![
            Span::styled(if type_focused { "\u{25C2} " } else { "" }, arrows),
            Span::styled(
                type_name.to_string(),
                Style::default()
                    .fg(app.theme.type_color(type_name))
                    .bg(app.theme.background),
            ),
            Span::styled(if type_focused { " \u{25B8}" } else { "" }, arrows),
        ],
        type_focused,
    ));

    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        " Priority 1 is highest; anything outside 1-4 leaves it unset.",
        dim(app),
    )));

    frame.render_widget(Paragraph::new(lines).style(base(app)), area);
}
