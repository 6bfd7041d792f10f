use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::tui::app::{App, CONFIG_LABELS};

use super::helpers::{base, dim, field_line, heading, input_spans};

const LABEL_WIDTH: usize = 22;

/// Connection form
pub fn render_config_view(frame: &mut Frame, app: &App, area: Rect) {
    let mut lines = vec![
        Line::from(Span::styled(" Connect to Azure DevOps", heading(app))),
        Line::from(""),
    ];

    for (i, (label, input)) in CONFIG_LABELS.iter().zip(&app.config.inputs).enumerate() {
        let focused = i == app.config.focus;
        let mut value = input_spans(app, input, focused);
        if input.is_empty() && !focused && matches!(i, 2 | 3) {
            value.push(Span::styled("(optional)", dim(app)));
        }
        lines.push(field_line(app, label, LABEL_WIDTH, value, focused));
    }

    lines.push(Line::from(""));
    let note = if app.connected {
        " Connected. Enter reconnects with the values above."
    } else {
        " The token needs read and write access to work items."
    };
    lines.push(Line::from(Span::styled(note, dim(app))));

    let paragraph = Paragraph::new(lines).style(base(app));
    frame.render_widget(paragraph, area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{AppSettings, Credentials};
    use crate::tui::render::test_helpers::*;

    #[test]
    fn shows_labels_and_masks_token() {
        let app = App::new(
            AppSettings::default(),
            Some(Credentials {
                organization: "contoso".into(),
                project: "Web".into(),
                token: "s3cret-token".into(),
                username: "ada@contoso.com".into(),
                ..Default::default()
            }),
        );
        let output = render_to_string(TERM_W, TERM_H, |frame, area| {
            render_config_view(frame, &app, area);
        });
        assert!(output.contains("Organization"));
        assert!(output.contains("contoso"));
        assert!(output.contains("Personal Access Token"));
        assert!(!output.contains("s3cret-token"));
        assert!(output.contains("(optional)"));
    }
}
