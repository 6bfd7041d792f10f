use crossterm::event::{KeyCode, KeyEvent};

use crate::client::query::PageRequest;
use crate::tui::app::{App, CreateForm, DeleteConfirm, Screen};
use crate::tui::event::{Effect, Op};
use crate::tui::text_input::TextInput;

use super::{detail, quit, step};

pub(super) fn handle_key(app: &mut App, key: KeyEvent) -> Vec<Effect> {
    if app.board.delete.is_some() {
        return handle_delete_confirm(app, key);
    }

    let len = app.board.items.len();
    match key.code {
        KeyCode::Char('q') => quit(app),
        KeyCode::Char('j') | KeyCode::Down => {
            app.board.cursor = step(app.board.cursor, len, true);
            Vec::new()
        }
        KeyCode::Char('k') | KeyCode::Up => {
            app.board.cursor = step(app.board.cursor, len, false);
            Vec::new()
        }
        KeyCode::Home | KeyCode::Char('g') => {
            app.board.cursor = 0;
            Vec::new()
        }
        KeyCode::End | KeyCode::Char('G') => {
            app.board.cursor = len.saturating_sub(1);
            Vec::new()
        }
        KeyCode::Char('l') | KeyCode::Right | KeyCode::PageDown => {
            if app.board.has_more && !app.loading {
                fetch_page(app, app.board.page + 1)
            } else {
                Vec::new()
            }
        }
        KeyCode::Char('h') | KeyCode::Left | KeyCode::PageUp => {
            if app.board.page > 0 && !app.loading {
                fetch_page(app, app.board.page - 1)
            } else {
                Vec::new()
            }
        }
        KeyCode::Char('r') => fetch_page(app, app.board.page),
        KeyCode::Char('a') => {
            if app.username().is_empty() {
                return Vec::new();
            }
            app.board.show_all = !app.board.show_all;
            app.board.cursor = 0;
            app.set_message(if app.board.show_all {
                "Showing all work items"
            } else {
                "Showing my work items"
            });
            fetch_page(app, 0)
        }
        KeyCode::Char('c') | KeyCode::Char('n') => {
            app.create = CreateForm::new(app.username(), &app.work_item_types);
            app.screen = Screen::Create;
            Vec::new()
        }
        KeyCode::Char('e') | KeyCode::Enter => match app.board.selected().cloned() {
            Some(item) => detail::open(app, item),
            None => Vec::new(),
        },
        KeyCode::Char('o') => {
            let url = app.board.selected().and_then(|item| app.web_url(item.id));
            url.map(Effect::OpenUrl).into_iter().collect()
        }
        KeyCode::Char('d') | KeyCode::Delete => {
            if let Some(item) = app.board.selected() {
                app.board.delete = Some(DeleteConfirm {
                    item_id: item.id,
                    title: item.fields.title.clone(),
                    input: TextInput::new(),
                });
            }
            Vec::new()
        }
        _ => Vec::new(),
    }
}

/// Request page `index` of the board listing.
pub(super) fn fetch_page(app: &mut App, index: usize) -> Vec<Effect> {
    app.loading = true;
    vec![Effect::Backend(Op::FetchItems {
        query: app.board_query(),
        page: PageRequest::new(app.settings.page_size(), index),
    })]
}

/// Deletion proceeds only when the typed text equals the title exactly.
fn handle_delete_confirm(app: &mut App, key: KeyEvent) -> Vec<Effect> {
    let Some(confirm) = app.board.delete.as_mut() else {
        return Vec::new();
    };
    match key.code {
        KeyCode::Esc => {
            app.board.delete = None;
            Vec::new()
        }
        KeyCode::Enter => {
            let Some(confirm) = app.board.delete.take() else {
                return Vec::new();
            };
            if confirm.input.value() == confirm.title {
                tracing::info!(id = confirm.item_id, "deleting work item");
                app.loading = true;
                vec![Effect::Backend(Op::DeleteItem(confirm.item_id))]
            } else {
                app.set_error("title does not match - deletion cancelled");
                Vec::new()
            }
        }
        _ => {
            confirm.input.handle_key(key);
            Vec::new()
        }
    }
}
