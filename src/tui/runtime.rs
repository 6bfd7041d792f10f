//! Terminal setup, the event loop, and the worker threads that carry out
//! effects. Everything here is glue: state changes live in `input`.

use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, Receiver, Sender};
use std::thread;
use std::time::Duration;

use crossterm::event::{self as term, KeyEventKind};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;

use crate::client::{Client, ClientError};
use crate::io::config_io::{load_settings_from, save_settings_to, settings_path};
use crate::io::credential_store::{CredentialStore, FileCredentialStore};
use crate::model::AppSettings;

use super::app::App;
use super::event::{Effect, Event, Op, Outcome};
use super::{input, render};

const INPUT_POLL: Duration = Duration::from_millis(50);

/// Run the TUI with settings and credentials kept in `config_dir`.
pub fn run(config_dir: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let settings_file = settings_path(config_dir);
    let settings = load_settings_from(&settings_file).unwrap_or_else(|e| {
        tracing::warn!(error = %e, "using default settings");
        AppSettings::default()
    });
    let store = FileCredentialStore::in_dir(config_dir);
    let mut app = App::new(settings, store.load());

    let (tx, rx) = mpsc::channel();
    let mut runtime = Runtime::new(tx, Box::new(store), settings_file);
    runtime.apply(app.init());

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;
    terminal.clear()?;

    // Install panic hook to restore terminal on panic
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
        original_hook(panic_info);
    }));

    let result = run_event_loop(&mut terminal, &mut app, &mut runtime, &rx);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

fn run_event_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    runtime: &mut Runtime,
    outcomes: &Receiver<Outcome>,
) -> Result<(), Box<dyn std::error::Error>> {
    loop {
        terminal.draw(|frame| render::render(frame, app))?;

        if term::poll(INPUT_POLL)?
            && let term::Event::Key(key) = term::read()?
            && key.kind == KeyEventKind::Press
        {
            let effects = input::update(app, Event::Key(key));
            runtime.apply(effects);
        }

        while let Ok(outcome) = outcomes.try_recv() {
            let effects = input::update(app, Event::Remote(outcome));
            runtime.apply(effects);
        }

        if app.should_quit {
            break;
        }
    }
    Ok(())
}

/// Carries out effects. Backend calls run on their own thread and report
/// back through the channel, one outcome per call.
struct Runtime {
    tx: Sender<Outcome>,
    client: Option<Client>,
    store: Box<dyn CredentialStore>,
    settings_file: PathBuf,
}

impl Runtime {
    fn new(tx: Sender<Outcome>, store: Box<dyn CredentialStore>, settings_file: PathBuf) -> Self {
        Runtime {
            tx,
            client: None,
            store,
            settings_file,
        }
    }

    fn apply(&mut self, effects: Vec<Effect>) {
        for effect in effects {
            self.apply_one(effect);
        }
    }

    fn apply_one(&mut self, effect: Effect) {
        match effect {
            Effect::Connect(credentials) => {
                self.client = Some(Client::connect(&credentials));
                self.spawn(Op::TestConnection);
            }
            Effect::Backend(op) => self.spawn(op),
            Effect::ScheduleTick(delay) => {
                let tx = self.tx.clone();
                thread::spawn(move || {
                    thread::sleep(delay);
                    let _ = tx.send(Outcome::Tick);
                });
            }
            Effect::SaveCredentials(credentials) => {
                let result = self.store.save(&credentials).map_err(|e| e.to_string());
                let _ = self.tx.send(Outcome::CredentialsSaved(result));
            }
            Effect::ClearCredentials => {
                self.client = None;
                let result = self.store.clear().map_err(|e| e.to_string());
                let _ = self.tx.send(Outcome::CredentialsSaved(result));
            }
            Effect::SaveSettings(settings) => {
                let result =
                    save_settings_to(&self.settings_file, &settings).map_err(|e| e.to_string());
                let _ = self.tx.send(Outcome::SettingsSaved(result));
            }
            Effect::OpenUrl(url) => open_in_browser(&url),
            Effect::Bell => {
                let mut stdout = io::stdout();
                let _ = stdout.write_all(b"\x07");
                let _ = stdout.flush();
            }
            Effect::Quit => {}
        }
    }

    fn spawn(&self, op: Op) {
        let Some(client) = self.client.clone() else {
            let _ = self.tx.send(op.failed(ClientError::NotConnected));
            return;
        };
        let tx = self.tx.clone();
        thread::spawn(move || {
            let _ = tx.send(execute(&client, op));
        });
    }
}

/// Run one backend operation to completion.
pub fn execute(client: &Client, op: Op) -> Outcome {
    tracing::debug!(?op, "executing");
    match op {
        Op::TestConnection => Outcome::Connected(client.test_connection()),
        Op::FetchItems { query, page } => Outcome::ItemsFetched {
            page,
            result: client.list_items(&query, page),
        },
        Op::FetchTypes => Outcome::TypesFetched(client.work_item_types()),
        Op::CreateItem(new) => Outcome::ItemCreated(client.create_item(&new)),
        Op::FetchComments(item_id) => Outcome::CommentsFetched {
            item_id,
            result: client.comments(item_id),
        },
        Op::AddComment { item_id, text } => Outcome::CommentAdded {
            item_id,
            result: client.add_comment(item_id, &text),
        },
        Op::UpdateItem { item_id, edit } => Outcome::ItemUpdated(client.update_item(item_id, &edit)),
        Op::FetchRelated(item_id) => Outcome::RelatedFetched {
            item_id,
            result: client.related_items(item_id),
        },
        Op::CreateRelated {
            anchor_id,
            as_child,
            item,
        } => {
            let result = if as_child {
                client.create_item_with_parent(&item, anchor_id)
            } else {
                client.create_parent_of(&item, anchor_id)
            };
            Outcome::RelatedCreated {
                anchor_id,
                as_child,
                result,
            }
        }
        Op::RemoveLink {
            item_id,
            target_id,
            direction,
        } => Outcome::LinkRemoved {
            item_id,
            result: client.find_and_remove_relation(item_id, target_id, direction),
        },
        Op::DeleteItem(item_id) => Outcome::ItemDeleted {
            item_id,
            result: client.delete_item(item_id),
        },
        Op::FetchIterations => Outcome::IterationsFetched(client.iterations()),
        Op::UpdateIteration { item_id, path } => {
            Outcome::IterationUpdated(client.update_iteration(item_id, &path))
        }
        Op::FetchPlanningFields(work_item_type) => Outcome::PlanningFieldsFetched {
            result: client.discover_planning_fields(&work_item_type),
            work_item_type,
        },
        Op::UpdatePlanning { item_id, values } => {
            Outcome::PlanningUpdated(client.update_planning(item_id, &values))
        }
        Op::FetchHyperlinks(item_id) => Outcome::HyperlinksFetched {
            item_id,
            result: client.hyperlinks(item_id),
        },
        Op::AddHyperlink {
            item_id,
            url,
            comment,
        } => Outcome::HyperlinkAdded {
            item_id,
            result: client.add_hyperlink(item_id, &url, &comment),
        },
        Op::RemoveHyperlink { item_id, url } => Outcome::HyperlinkRemoved {
            item_id,
            result: client.remove_hyperlink(item_id, &url),
        },
        Op::PollChanges { assignee, window } => {
            Outcome::ChangesDetected(client.recently_changed(&assignee, window))
        }
    }
}

fn open_in_browser(url: &str) {
    #[cfg(target_os = "macos")]
    let result = std::process::Command::new("open").arg(url).spawn();

    #[cfg(target_os = "windows")]
    let result = std::process::Command::new("rundll32")
        .args(["url.dll,FileProtocolHandler", url])
        .spawn();

    #[cfg(all(unix, not(target_os = "macos")))]
    let result = std::process::Command::new("xdg-open").arg(url).spawn();

    if let Err(e) = result {
        tracing::warn!(url, error = %e, "could not open browser");
    }
}
