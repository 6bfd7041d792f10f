use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::tui::app::App;

use super::helpers::{base, dim, field_line, heading, input_spans};

const LABEL_WIDTH: usize = 26;

pub fn render_settings_view(frame: &mut Frame, app: &App, area: Rect) {
    let form = &app.settings_form;
    let check = |on: bool| if on { "[x]" } else { "[ ]" };

    let lines = vec![
        Line::from(Span::styled(" Settings", heading(app))),
        Line::from(""),
        field_line(
            app,
            "Show all work items",
            LABEL_WIDTH,
            vec![Span::styled(check(form.show_all), base(app))],
            form.focus == 0,
        ),
        field_line(
            app,
            "Change notifications",
            LABEL_WIDTH,
            vec![Span::styled(check(form.notifications), base(app))],
            form.focus == 1,
        ),
        field_line(
            app,
            "Work items per page",
            LABEL_WIDTH,
            input_spans(app, &form.max_items, form.focus == 2),
            form.focus == 2,
        ),
        Line::from(""),
        Line::from(Span::styled(
            " Changes apply after saving with Ctrl+S.",
            dim(app),
        )),
    ];

    frame.render_widget(Paragraph::new(lines).style(base(app)), area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::AppSettings;
    use crate::tui::render::test_helpers::*;

    #[test]
    fn shows_current_values() {
        let mut app = App::new(AppSettings::default(), None);
        app.settings_form.show_all = true;
        let output = render_to_string(TERM_W, TERM_H, |frame, area| {
            render_settings_view(frame, &app, area);
        });
        assert!(output.contains("Show all work items"));
        assert!(output.contains("[x]"));
        assert!(output.contains("50"));
    }
}
