use crossterm::event::{KeyCode, KeyEvent};

use crate::tui::app::{App, CONFIG_LABELS, ConfigForm, Screen, SettingsForm};
use crate::tui::event::Effect;

use super::{ctrl, cycle, quit};

pub(super) fn handle_key(app: &mut App, key: KeyEvent) -> Vec<Effect> {
    if ctrl(&key, 'd') {
        app.config = ConfigForm::default();
        app.session = None;
        app.connected = false;
        app.set_message("Stored credentials cleared");
        return vec![Effect::ClearCredentials];
    }
    if ctrl(&key, 'f') {
        app.settings_form = SettingsForm::from_settings(&app.settings);
        app.screen = Screen::Settings;
        return Vec::new();
    }

    match key.code {
        KeyCode::Esc => quit(app),
        KeyCode::Tab | KeyCode::Down => {
            app.config.focus = cycle(app.config.focus, CONFIG_LABELS.len(), true);
            Vec::new()
        }
        KeyCode::BackTab | KeyCode::Up => {
            app.config.focus = cycle(app.config.focus, CONFIG_LABELS.len(), false);
            Vec::new()
        }
        KeyCode::Enter => connect(app),
        _ => {
            app.config.focused_mut().handle_key(key);
            Vec::new()
        }
    }
}

fn connect(app: &mut App) -> Vec<Effect> {
    if app.loading {
        return Vec::new();
    }
    let credentials = app.config.credentials();
    if !credentials.is_complete() {
        app.set_error("Organization, project, token and username are required");
        return Vec::new();
    }
    tracing::info!(organization = %credentials.organization, project = %credentials.project, "connecting");
    app.loading = true;
    app.connected = false;
    app.session = Some(credentials.clone());
    vec![
        Effect::SaveCredentials(credentials.clone()),
        Effect::Connect(credentials),
    ]
}
