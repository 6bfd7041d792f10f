use crossterm::event::{KeyCode, KeyEvent};

use crate::model::NewWorkItem;
use crate::tui::app::{App, CreateField, Screen};
use crate::tui::event::{Effect, Op};

use super::cycle;

pub(super) fn handle_key(app: &mut App, key: KeyEvent) -> Vec<Effect> {
    let types = app.work_item_types.len();
    let form = &mut app.create;
    let position = CreateField::ALL
        .iter()
        .position(|f| *f == form.focus)
        .unwrap_or(0);

    match key.code {
        KeyCode::Esc => {
            app.screen = Screen::Board;
            Vec::new()
        }
        KeyCode::Tab | KeyCode::Down => {
            form.focus = CreateField::ALL[cycle(position, CreateField::ALL.len(), true)];
            Vec::new()
        }
        KeyCode::BackTab | KeyCode::Up => {
            form.focus = CreateField::ALL[cycle(position, CreateField::ALL.len(), false)];
            Vec::new()
        }
        KeyCode::Left | KeyCode::Char('h') if form.focus == CreateField::Type => {
            form.type_index = cycle(form.type_index, types, false);
            Vec::new()
        }
        KeyCode::Right | KeyCode::Char('l') | KeyCode::Char(' ')
            if form.focus == CreateField::Type =>
        {
            form.type_index = cycle(form.type_index, types, true);
            Vec::new()
        }
        KeyCode::Enter => submit(app),
        _ => {
            if let Some(input) = form.focused_input() {
                input.handle_key(key);
            }
            Vec::new()
        }
    }
}

fn submit(app: &mut App) -> Vec<Effect> {
    if app.loading {
        return Vec::new();
    }
    let form = &app.create;
    let title = form.title.value().trim().to_string();
    if title.is_empty() {
        app.set_error("Title is required");
        return Vec::new();
    }
    let priority = form
        .priority
        .value()
        .trim()
        .parse::<i64>()
        .ok()
        .filter(|p| (1..=4).contains(p))
        .unwrap_or(0);
    let new = NewWorkItem {
        work_item_type: app.type_name(form.type_index).to_string(),
        title,
        description: form.description.value().trim().to_string(),
        priority,
        assigned_to: form.assignee.value().trim().to_string(),
    };
    app.loading = true;
    vec![Effect::Backend(Op::CreateItem(new))]
}
