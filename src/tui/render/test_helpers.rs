use ratatui::Terminal;
use ratatui::backend::TestBackend;
use ratatui::layout::Rect;

use crate::model::{AppSettings, Credentials, WorkItem};
use crate::tui::app::{App, DetailState, Screen};

pub const TERM_W: u16 = 80;
pub const TERM_H: u16 = 24;

/// Render into an in-memory buffer and return plain text (no styles).
pub fn render_to_string<F>(w: u16, h: u16, f: F) -> String
where
    F: FnOnce(&mut ratatui::Frame, Rect),
{
    let backend = TestBackend::new(w, h);
    let mut terminal = Terminal::new(backend).unwrap();
    terminal
        .draw(|frame| {
            let area = frame.area();
            f(frame, area);
        })
        .unwrap();

    let buf = terminal.backend().buffer().clone();
    let w = buf.area.width as usize;
    let lines: Vec<String> = buf
        .content
        .chunks(w)
        .map(|row| {
            let s: String = row.iter().map(|cell| cell.symbol()).collect();
            s.trim_end().to_string()
        })
        .collect();

    // Trim trailing blank lines
    let end = lines
        .iter()
        .rposition(|l| !l.is_empty())
        .map_or(0, |i| i + 1);
    lines[..end].join("\n")
}

pub fn credentials() -> Credentials {
    Credentials {
        organization: "contoso".into(),
        project: "Web".into(),
        token: "pat".into(),
        username: "ada@contoso.com".into(),
        ..Default::default()
    }
}

pub fn work_item(id: i64, title: &str, work_item_type: &str, state: &str) -> WorkItem {
    let mut item = WorkItem {
        id,
        rev: 1,
        ..Default::default()
    };
    item.fields.title = title.into();
    item.fields.work_item_type = work_item_type.into();
    item.fields.state = state.into();
    item
}

/// A connected App on the Board screen showing `items`.
pub fn board_app(items: Vec<WorkItem>) -> App {
    let mut app = App::new(AppSettings::default(), Some(credentials()));
    app.session = Some(credentials());
    app.connected = true;
    app.screen = Screen::Board;
    app.board.items = items;
    app
}

/// A connected App on the Detail screen for `item`.
pub fn detail_app(item: WorkItem) -> App {
    let mut app = board_app(vec![item.clone()]);
    app.detail = Some(DetailState::new(item));
    app.screen = Screen::Detail;
    app
}
