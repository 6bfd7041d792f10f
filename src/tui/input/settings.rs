use crossterm::event::{KeyCode, KeyEvent};

use crate::tui::app::{App, Screen, SettingsForm};
use crate::tui::event::Effect;

use super::{ctrl, cycle};

pub(super) fn handle_key(app: &mut App, key: KeyEvent) -> Vec<Effect> {
    if ctrl(&key, 's') {
        let settings = app.settings_form.to_settings(&app.settings);
        app.settings = settings.clone();
        app.board.show_all = settings.default_show_all;
        app.settings_form = SettingsForm::from_settings(&settings);
        return vec![Effect::SaveSettings(settings)];
    }

    let form = &mut app.settings_form;
    match key.code {
        KeyCode::Esc => app.screen = Screen::Config,
        KeyCode::Tab | KeyCode::Down => form.focus = cycle(form.focus, SettingsForm::FIELDS, true),
        KeyCode::BackTab | KeyCode::Up => {
            form.focus = cycle(form.focus, SettingsForm::FIELDS, false)
        }
        KeyCode::Char(' ') | KeyCode::Enter if form.focus == 0 => form.show_all = !form.show_all,
        KeyCode::Char(' ') | KeyCode::Enter if form.focus == 1 => {
            form.notifications = !form.notifications
        }
        _ if form.focus == 2 => {
            form.max_items.handle_key(key);
        }
        _ => {}
    }
    Vec::new()
}
