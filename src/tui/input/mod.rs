mod board;
mod config;
mod create;
mod detail;
mod remote;
mod settings;

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use super::app::{App, Screen};
use super::event::{Effect, Event};

/// Apply one event to the app and return the work it asks for.
pub fn update(app: &mut App, event: Event) -> Vec<Effect> {
    match event {
        Event::Key(key) => handle_key(app, key),
        Event::Remote(outcome) => remote::handle_outcome(app, outcome),
    }
}

/// Handle a key event on the current screen
pub fn handle_key(app: &mut App, key: KeyEvent) -> Vec<Effect> {
    if key.kind != KeyEventKind::Press || matches!(key.code, KeyCode::Modifier(_)) {
        return Vec::new();
    }
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        return quit(app);
    }

    // A fresh key press dismisses the previous status line
    app.error = None;
    app.message = None;

    match app.screen {
        Screen::Config => config::handle_key(app, key),
        Screen::Settings => settings::handle_key(app, key),
        Screen::Board => board::handle_key(app, key),
        Screen::Create => create::handle_key(app, key),
        Screen::Detail => detail::handle_key(app, key),
    }
}

fn quit(app: &mut App) -> Vec<Effect> {
    app.should_quit = true;
    vec![Effect::Quit]
}

fn ctrl(key: &KeyEvent, c: char) -> bool {
    key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char(c)
}

/// Step a cursor by one within `len` entries.
fn step(cursor: usize, len: usize, forward: bool) -> usize {
    if len == 0 {
        0
    } else if forward {
        (cursor + 1).min(len - 1)
    } else {
        cursor.saturating_sub(1)
    }
}

/// Step a focus index by one, wrapping around.
fn cycle(index: usize, len: usize, forward: bool) -> usize {
    if len == 0 {
        0
    } else if forward {
        (index + 1) % len
    } else {
        (index + len - 1) % len
    }
}
