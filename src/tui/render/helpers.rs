use chrono::DateTime;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};

use crate::tui::app::App;
use crate::tui::text_input::TextInput;
use crate::util::unicode::{self, fit_width};

/// Compute total display width of a slice of spans
pub(super) fn spans_width(spans: &[Span]) -> usize {
    spans
        .iter()
        .map(|s| unicode::display_width(&s.content))
        .sum()
}

pub(super) fn base(app: &App) -> Style {
    Style::default().fg(app.theme.text).bg(app.theme.background)
}

pub(super) fn dim(app: &App) -> Style {
    Style::default().fg(app.theme.dim).bg(app.theme.background)
}

pub(super) fn heading(app: &App) -> Style {
    Style::default()
        .fg(app.theme.text_bright)
        .bg(app.theme.background)
        .add_modifier(Modifier::BOLD)
}

/// Spans for an input's contents, with a bar cursor when focused.
pub(super) fn input_spans(app: &App, input: &TextInput, focused: bool) -> Vec<Span<'static>> {
    let shown = input.display();
    let style = if focused {
        Style::default()
            .fg(app.theme.text_bright)
            .bg(app.theme.background)
    } else {
        base(app)
    };
    if !focused {
        return vec![Span::styled(shown, style)];
    }
    let before = input.value()[..input.cursor()].chars().count();
    let split = shown
        .char_indices()
        .nth(before)
        .map_or(shown.len(), |(i, _)| i);
    vec![
        Span::styled(shown[..split].to_string(), style),
        Span::styled(
            "\u{258C}",
            Style::default()
                .fg(app.theme.highlight)
                .bg(app.theme.background),
        ),
        Span::styled(shown[split..].to_string(), style),
    ]
}

/// ` ▸ Label      value` row used by every form.
pub(super) fn field_line(
    app: &App,
    label: &str,
    label_width: usize,
    value: Vec<Span<'static>>,
    focused: bool,
) -> Line<'static> {
    let marker = if focused { " \u{25B8} " } else { "   " };
    let label_style = if focused {
        Style::default()
            .fg(app.theme.highlight)
            .bg(app.theme.background)
    } else {
        dim(app)
    };
    let mut spans = vec![
        Span::styled(marker, label_style),
        Span::styled(fit_width(label, label_width), label_style),
        Span::styled(" ", base(app)),
    ];
    spans.extend(value);
    Line::from(spans)
}

/// `Jan 02` from an RFC 3339 timestamp; the raw text when it does not parse.
pub(super) fn short_date(timestamp: &str) -> String {
    DateTime::parse_from_rfc3339(timestamp)
        .map(|dt| dt.format("%b %d").to_string())
        .unwrap_or_else(|_| timestamp.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn short_date_formats_month_and_day() {
        assert_eq!(short_date("2026-01-02T10:00:00Z"), "Jan 02");
        assert_eq!(short_date("2026-11-30T23:59:59.123+01:00"), "Nov 30");
        assert_eq!(short_date("yesterday"), "yesterday");
    }

    #[test]
    fn focused_input_splits_at_cursor() {
        let app = App::new(Default::default(), None);
        let mut input = TextInput::with_value("abc");
        input.handle_key(crossterm::event::KeyEvent::new(
            crossterm::event::KeyCode::Left,
            crossterm::event::KeyModifiers::NONE,
        ));
        let spans = input_spans(&app, &input, true);
        let texts: Vec<&str> = spans.iter().map(|s| s.content.as_ref()).collect();
        assert_eq!(texts, vec!["ab", "\u{258C}", "c"]);
    }

    #[test]
    fn masked_input_never_shows_value() {
        let app = App::new(Default::default(), None);
        let input = {
            let mut i = TextInput::masked();
            i.set("secret");
            i
        };
        let spans = input_spans(&app, &input, true);
        let text: String = spans.iter().map(|s| s.content.as_ref()).collect();
        assert!(!text.contains("secret"));
        assert_eq!(text.chars().filter(|c| *c == '\u{2022}').count(), 6);
    }
}
