use crate::client::ClientError;
use crate::tui::app::{App, CreateForm, PlanningForm, RelatedFlow, Screen, Section};
use crate::tui::event::{Effect, Op, Outcome};
use crate::watch::{CHANGE_WINDOW, POLL_INTERVAL, TickContext};

use super::board::fetch_page;

/// Fold the result of a background operation into the app.
pub(super) fn handle_outcome(app: &mut App, outcome: Outcome) -> Vec<Effect> {
    match outcome {
        Outcome::Connected(Ok(())) => {
            tracing::info!("connected");
            app.connected = true;
            app.screen = Screen::Board;
            app.board.cursor = 0;
            app.board.delete = None;
            let mut effects = fetch_page(app, 0);
            effects.push(Effect::Backend(Op::FetchTypes));
            effects
        }
        Outcome::Connected(Err(e)) => {
            tracing::warn!(error = %e, "connection failed");
            app.connected = false;
            app.set_error(format!("Connection failed: {e}"));
            Vec::new()
        }

        Outcome::ItemsFetched { page, result } => {
            app.loading = false;
            match result {
                Ok(listing) => {
                    app.watcher.seed(&listing.items);
                    let board = &mut app.board;
                    board.items = listing.items;
                    board.page = page.index;
                    board.has_more = listing.has_more;
                    board.cursor = board.cursor.min(board.items.len().saturating_sub(1));
                }
                Err(e) => app.set_error(format!("Failed to load work items: {e}")),
            }
            Vec::new()
        }
        Outcome::TypesFetched(result) => {
            match result {
                Ok(types) if !types.is_empty() => {
                    app.work_item_types = types;
                    let username = app.username().to_string();
                    app.create = CreateForm::new(&username, &app.work_item_types);
                }
                Ok(_) => {}
                Err(e) => tracing::warn!(error = %e, "could not load work item types"),
            }
            Vec::new()
        }
        Outcome::ItemCreated(result) => match result {
            Ok(item) => {
                tracing::info!(id = item.id, "created work item");
                app.set_message(format!("Created work item #{}", item.id));
                app.screen = Screen::Board;
                let username = app.username().to_string();
                app.create = CreateForm::new(&username, &app.work_item_types);
                app.board.cursor = 0;
                fetch_page(app, 0)
            }
            Err(e) => fail(app, "Failed to create work item", e),
        },

        Outcome::CommentsFetched { item_id, result } => {
            if let Some(detail) = app.detail.as_mut()
                && detail.item.id == item_id
            {
                detail.comments_loading = false;
                match result {
                    Ok(comments) => detail.comments = comments,
                    Err(e) => tracing::warn!(item_id, error = %e, "could not load comments"),
                }
            }
            Vec::new()
        }
        Outcome::CommentAdded { item_id, result } => match result {
            Ok(_) => {
                app.loading = false;
                app.set_message("Comment added");
                match app.detail.as_mut() {
                    Some(detail) if detail.item.id == item_id => {
                        detail.comment.clear();
                        detail.editing = false;
                        vec![Effect::Backend(Op::FetchComments(item_id))]
                    }
                    _ => Vec::new(),
                }
            }
            Err(e) => fail(app, "Failed to add comment", e),
        },
        Outcome::ItemUpdated(result) => match result {
            Ok(item) => {
                app.loading = false;
                app.set_message("Work item updated");
                app.board.replace(&item);
                if let Some(detail) = app.detail.as_mut()
                    && detail.item.id == item.id
                {
                    detail.item = item;
                }
                Vec::new()
            }
            Err(e) => fail(app, "Failed to update work item", e),
        },

        Outcome::RelatedFetched { item_id, result } => {
            if let Some(detail) = app.detail.as_mut()
                && detail.item.id == item_id
            {
                detail.related_loading = false;
                match result {
                    Ok(related) => {
                        detail.related = related;
                        if let Section::Related(panel) = &mut detail.section {
                            panel.cursor = panel.cursor.min(detail.related.len().saturating_sub(1));
                        }
                    }
                    Err(e) => tracing::warn!(item_id, error = %e, "could not load related items"),
                }
            }
            Vec::new()
        }
        Outcome::RelatedCreated {
            anchor_id,
            as_child,
            result,
        } => match result {
            Ok(item) => {
                app.loading = false;
                let relation = if as_child { "child" } else { "parent" };
                app.set_message(format!("Created {relation} #{}", item.id));
                if let Some(detail) = app.detail.as_mut()
                    && let Section::Related(panel) = &mut detail.section
                {
                    panel.flow = RelatedFlow::Browsing;
                }
                vec![Effect::Backend(Op::FetchRelated(anchor_id))]
            }
            Err(e) => fail(app, "Failed to create related item", e),
        },
        Outcome::LinkRemoved { item_id, result } => match result {
            Ok(item) => {
                app.loading = false;
                app.set_message("Link removed");
                if let Some(detail) = app.detail.as_mut()
                    && detail.item.id == item_id
                {
                    detail.item = item;
                    if let Section::Related(panel) = &mut detail.section {
                        panel.cursor = 0;
                    }
                }
                vec![Effect::Backend(Op::FetchRelated(item_id))]
            }
            Err(e) => fail(app, "Failed to remove link", e),
        },
        Outcome::ItemDeleted { item_id, result } => match result {
            Ok(()) => {
                tracing::info!(id = item_id, "deleted work item");
                app.set_message(format!("Deleted work item #{item_id}"));
                app.board.cursor = 0;
                fetch_page(app, app.board.page)
            }
            Err(e) => fail(app, "Failed to delete work item", e),
        },

        Outcome::IterationsFetched(result) => {
            app.cache.iterations_pending = false;
            match result {
                Ok(iterations) => app.cache.iterations = Some(iterations),
                Err(e) => tracing::warn!(error = %e, "could not load iterations"),
            }
            Vec::new()
        }
        Outcome::IterationUpdated(result) => match result {
            Ok(item) => {
                app.loading = false;
                app.set_message(format!("Iteration set to {}", item.fields.iteration_path));
                app.board.replace(&item);
                if let Some(detail) = app.detail.as_mut()
                    && detail.item.id == item.id
                {
                    detail.item = item;
                }
                Vec::new()
            }
            Err(e) => fail(app, "Failed to update iteration", e),
        },
        Outcome::PlanningFieldsFetched {
            work_item_type,
            result,
        } => {
            match result {
                Ok(fields) => {
                    let count = fields.len();
                    app.cache.planning.insert(work_item_type.clone(), fields);
                    if let Some(detail) = app.detail.as_mut()
                        && detail.item.fields.work_item_type == work_item_type
                        && let Section::Planning(form) = &mut detail.section
                        && form.loading
                    {
                        *form = PlanningForm::with_fields(count);
                        if count == 0 {
                            app.set_message(format!("No planning fields for {work_item_type}"));
                        }
                    }
                }
                Err(e) => {
                    tracing::warn!(work_item_type, error = %e, "could not load planning fields");
                    if let Some(detail) = app.detail.as_mut()
                        && let Section::Planning(form) = &mut detail.section
                    {
                        form.loading = false;
                    }
                }
            }
            Vec::new()
        }
        Outcome::PlanningUpdated(result) => match result {
            Ok(item) => {
                app.loading = false;
                app.set_message("Planning updated");
                app.board.replace(&item);
                if let Some(detail) = app.detail.as_mut()
                    && detail.item.id == item.id
                {
                    detail.item = item;
                    detail.section = Section::Collapsed;
                }
                Vec::new()
            }
            Err(e) => fail(app, "Failed to update planning", e),
        },

        Outcome::HyperlinksFetched { item_id, result } => {
            if let Some(detail) = app.detail.as_mut()
                && detail.item.id == item_id
            {
                match result {
                    Ok(links) => {
                        detail.hyperlinks = links;
                        if let Some(panel) = detail.links.as_mut() {
                            panel.cursor = panel.cursor.min(detail.hyperlinks.len().saturating_sub(1));
                        }
                    }
                    Err(e) => tracing::warn!(item_id, error = %e, "could not load hyperlinks"),
                }
            }
            Vec::new()
        }
        Outcome::HyperlinkAdded { item_id, result } => match result {
            Ok(_) => {
                app.loading = false;
                app.set_message("Link added");
                if let Some(detail) = app.detail.as_mut()
                    && let Some(panel) = detail.links.as_mut()
                {
                    panel.flow = Default::default();
                }
                vec![Effect::Backend(Op::FetchHyperlinks(item_id))]
            }
            Err(e) => fail(app, "Failed to add link", e),
        },
        Outcome::HyperlinkRemoved { item_id, result } => match result {
            Ok(_) => {
                app.loading = false;
                app.set_message("Link removed");
                if let Some(detail) = app.detail.as_mut()
                    && let Some(panel) = detail.links.as_mut()
                {
                    panel.cursor = 0;
                }
                vec![Effect::Backend(Op::FetchHyperlinks(item_id))]
            }
            Err(e) => fail(app, "Failed to remove link", e),
        },

        Outcome::Tick => tick(app),
        Outcome::ChangesDetected(result) => match result {
            Ok(items) => {
                let alerts = app.watcher.absorb(&items);
                match alerts.as_slice() {
                    [] => Vec::new(),
                    [alert] => {
                        app.set_message(alert.message());
                        vec![Effect::Bell]
                    }
                    [first, rest @ ..] => {
                        app.set_message(format!("{} (+{} more)", first.message(), rest.len()));
                        vec![Effect::Bell]
                    }
                }
            }
            Err(e) => {
                tracing::debug!(error = %e, "change poll failed");
                app.watcher.check_failed();
                Vec::new()
            }
        },

        Outcome::CredentialsSaved(result) => {
            if let Err(e) = result {
                tracing::warn!(error = %e, "could not store credentials");
                app.error = Some(format!("Could not store credentials: {e}"));
            }
            Vec::new()
        }
        Outcome::SettingsSaved(result) => {
            match result {
                Ok(()) => app.set_message("Settings saved"),
                Err(e) => app.set_error(format!("Could not save settings: {e}")),
            }
            Vec::new()
        }
    }
}

/// Start a change poll when conditions allow. The timer is always re-armed.
fn tick(app: &mut App) -> Vec<Effect> {
    let ctx = TickContext {
        connected: app.connected,
        on_config_screen: matches!(app.screen, Screen::Config | Screen::Settings),
        notifications_enabled: app.settings.enable_notifications,
        has_user: !app.username().is_empty(),
    };
    let mut effects = Vec::new();
    match app.watcher.begin_check(ctx) {
        Ok(()) => effects.push(Effect::Backend(Op::PollChanges {
            assignee: app.username().to_string(),
            window: CHANGE_WINDOW,
        })),
        Err(reason) => tracing::trace!(?reason, "skipping change poll"),
    }
    effects.push(Effect::ScheduleTick(POLL_INTERVAL));
    effects
}

fn fail(app: &mut App, context: &str, error: ClientError) -> Vec<Effect> {
    tracing::warn!(error = %error, "{context}");
    app.set_error(format!("{context}: {error}"));
    Vec::new()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::{ItemQuery, Page, PageRequest};
    use crate::model::{AppSettings, Credentials, IdentityRef, WorkItem};
    use pretty_assertions::assert_eq;

    fn connected_app() -> App {
        let creds = Credentials {
            organization: "contoso".into(),
            project: "Web".into(),
            token: "pat".into(),
            username: "ada@contoso.com".into(),
            ..Default::default()
        };
        let mut app = App::new(AppSettings::default(), Some(creds.clone()));
        app.session = Some(creds);
        app.connected = true;
        app.screen = Screen::Board;
        app
    }

    fn item(id: i64, rev: i64) -> WorkItem {
        let mut w = WorkItem {
            id,
            rev,
            ..Default::default()
        };
        w.fields.title = format!("Item {id}");
        w
    }

    #[test]
    fn connected_loads_first_page_and_types() {
        let mut app = connected_app();
        app.screen = Screen::Config;
        let effects = handle_outcome(&mut app, Outcome::Connected(Ok(())));
        assert_eq!(app.screen, Screen::Board);
        assert_eq!(
            effects,
            vec![
                Effect::Backend(Op::FetchItems {
                    query: ItemQuery::assigned_to("ada@contoso.com"),
                    page: PageRequest::new(50, 0),
                }),
                Effect::Backend(Op::FetchTypes),
            ]
        );
    }

    #[test]
    fn connection_failure_stays_on_config() {
        let mut app = App::new(AppSettings::default(), None);
        app.loading = true;
        handle_outcome(
            &mut app,
            Outcome::Connected(Err(ClientError::api(401, "Unauthorized"))),
        );
        assert_eq!(app.screen, Screen::Config);
        assert!(!app.loading);
        assert!(
            app.error
                .as_deref()
                .is_some_and(|e| e.starts_with("Connection failed"))
        );
    }

    #[test]
    fn fetched_page_clamps_cursor() {
        let mut app = connected_app();
        app.board.cursor = 9;
        handle_outcome(
            &mut app,
            Outcome::ItemsFetched {
                page: PageRequest::new(50, 1),
                result: Ok(Page {
                    items: vec![item(1, 1), item(2, 1)],
                    has_more: false,
                }),
            },
        );
        assert_eq!(app.board.cursor, 1);
        assert_eq!(app.board.page, 1);
        assert_eq!(app.watcher.known_revision(2), Some(1));
    }

    #[test]
    fn tick_always_rearms() {
        let mut app = App::new(AppSettings::default(), None);
        assert_eq!(
            handle_outcome(&mut app, Outcome::Tick),
            vec![Effect::ScheduleTick(POLL_INTERVAL)]
        );

        let mut app = connected_app();
        let effects = handle_outcome(&mut app, Outcome::Tick);
        assert_eq!(effects.len(), 2);
        assert_eq!(effects[1], Effect::ScheduleTick(POLL_INTERVAL));

        // A poll is still in flight, so only the timer comes back
        assert_eq!(
            handle_outcome(&mut app, Outcome::Tick),
            vec![Effect::ScheduleTick(POLL_INTERVAL)]
        );
    }

    #[test]
    fn tick_is_quiet_when_notifications_are_off() {
        let mut app = connected_app();
        app.settings.enable_notifications = false;
        assert_eq!(
            handle_outcome(&mut app, Outcome::Tick),
            vec![Effect::ScheduleTick(POLL_INTERVAL)]
        );
    }

    #[test]
    fn newer_revision_rings_the_bell() {
        let mut app = connected_app();
        app.watcher.seed(&[item(5, 2)]);
        handle_outcome(&mut app, Outcome::Tick);

        let mut changed = item(5, 3);
        changed.fields.changed_by = Some(IdentityRef {
            display_name: "Grace".into(),
            unique_name: "grace@contoso.com".into(),
        });
        let effects = handle_outcome(&mut app, Outcome::ChangesDetected(Ok(vec![changed])));
        assert_eq!(effects, vec![Effect::Bell]);
        assert_eq!(
            app.message.as_deref(),
            Some("#5 'Item 5' was updated by Grace")
        );
    }

    #[test]
    fn failed_poll_allows_the_next_one() {
        let mut app = connected_app();
        handle_outcome(&mut app, Outcome::Tick);
        handle_outcome(
            &mut app,
            Outcome::ChangesDetected(Err(ClientError::Transport("offline".into()))),
        );
        assert_eq!(handle_outcome(&mut app, Outcome::Tick).len(), 2);
    }

    #[test]
    fn stale_comment_results_are_ignored() {
        let mut app = connected_app();
        app.detail = Some(crate::tui::app::DetailState::new(item(1, 1)));
        handle_outcome(
            &mut app,
            Outcome::CommentsFetched {
                item_id: 2,
                result: Ok(vec![Default::default()]),
            },
        );
        let detail = app.detail.as_ref().expect("detail");
        assert!(detail.comments.is_empty());
        assert!(detail.comments_loading);
    }

    #[test]
    fn deleted_item_refreshes_current_page() {
        let mut app = connected_app();
        app.board.page = 2;
        let effects = handle_outcome(
            &mut app,
            Outcome::ItemDeleted {
                item_id: 4,
                result: Ok(()),
            },
        );
        assert_eq!(app.message.as_deref(), Some("Deleted work item #4"));
        assert!(matches!(
            effects.as_slice(),
            [Effect::Backend(Op::FetchItems { page, .. })] if page.index == 2
        ));
    }

    #[test]
    fn iteration_fetch_failure_is_quiet() {
        let mut app = connected_app();
        let mut detail = crate::tui::app::DetailState::new(item(1, 1));
        detail.section = Section::Iteration { cursor: 0 };
        app.detail = Some(detail);
        app.cache.iterations_pending = true;

        let effects = handle_outcome(
            &mut app,
            Outcome::IterationsFetched(Err(ClientError::Transport("blip".into()))),
        );
        assert!(effects.is_empty());
        assert!(app.error.is_none());
        assert!(!app.cache.iterations_pending);
        assert!(app.cache.iterations.is_none());
        let detail = app.detail.as_ref().expect("detail");
        assert!(matches!(detail.section, Section::Iteration { .. }));
    }

    #[test]
    fn planning_fetch_failure_stops_loading_without_error() {
        let mut app = connected_app();
        let mut work_item = item(1, 1);
        work_item.fields.work_item_type = "Task".into();
        let mut detail = crate::tui::app::DetailState::new(work_item);
        detail.section = Section::Planning(PlanningForm::pending());
        app.detail = Some(detail);

        handle_outcome(
            &mut app,
            Outcome::PlanningFieldsFetched {
                work_item_type: "Task".into(),
                result: Err(ClientError::Transport("blip".into())),
            },
        );
        assert!(app.error.is_none());
        assert!(!app.cache.planning.contains_key("Task"));
        let detail = app.detail.as_ref().expect("detail");
        match &detail.section {
            Section::Planning(form) => assert!(!form.loading),
            other => panic!("planning section closed: {other:?}"),
        }
    }
}
