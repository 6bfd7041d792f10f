use crossterm::event::{KeyCode, KeyEvent};
use indexmap::IndexMap;

use crate::client::links::validate_hyperlink;
use crate::model::{NewWorkItem, WorkItem};
use crate::tui::app::{
    App, DetailCache, DetailField, DetailState, DraftField, LinksFlow, LinksPanel, PlanningForm,
    RELATED_PRIORITY, RelatedDraft, RelatedFlow, RelatedPanel, Screen, Section, SectionKind,
    iteration_display_order,
};
use crate::tui::event::{Effect, Op};
use crate::tui::text_input::TextInput;
use crate::util::number::parse_lenient;

use super::{ctrl, cycle, step};

const DRAFT_FIELDS: [DraftField; 3] = [DraftField::Title, DraftField::Assignee, DraftField::Type];

/// Show `item` on the Detail screen and start loading its comments and
/// related items.
pub(super) fn open(app: &mut App, item: WorkItem) -> Vec<Effect> {
    let id = item.id;
    tracing::debug!(id, "opening work item");
    app.detail = Some(DetailState::new(item));
    app.screen = Screen::Detail;
    vec![
        Effect::Backend(Op::FetchComments(id)),
        Effect::Backend(Op::FetchRelated(id)),
    ]
}

pub(super) fn handle_key(app: &mut App, key: KeyEvent) -> Vec<Effect> {
    let Some(detail) = app.detail.as_ref() else {
        app.screen = Screen::Board;
        return Vec::new();
    };

    if key.code == KeyCode::Esc {
        return escape(app);
    }
    if ctrl(&key, 's') {
        return save(app);
    }

    let adding_link = matches!(
        detail.links,
        Some(LinksPanel {
            flow: LinksFlow::Adding { .. },
            ..
        })
    );
    if adding_link {
        return link_form_key(app, key);
    }

    match &detail.section {
        Section::Related(RelatedPanel {
            flow: RelatedFlow::ConfirmUnlink { .. },
            ..
        }) => return confirm_unlink_key(app, key),
        Section::Related(RelatedPanel {
            flow: RelatedFlow::Creating(_),
            ..
        }) => return draft_key(app, key),
        Section::Planning(form) if !form.inputs.is_empty() => return planning_key(app, key),
        _ => {}
    }

    if detail.editing {
        return editing_key(app, key);
    }
    if let Some(effects) = section_key(app, key) {
        return effects;
    }
    if let Some(effects) = links_key(app, key) {
        return effects;
    }
    base_key(app, key)
}

/// Esc backs out one level: an open form, then field editing, then the
/// expanded section, then the links panel, then the screen itself.
fn escape(app: &mut App) -> Vec<Effect> {
    let Some(detail) = app.detail.as_mut() else {
        return Vec::new();
    };
    if let Some(links) = detail.links.as_mut()
        && matches!(links.flow, LinksFlow::Adding { .. })
    {
        links.flow = LinksFlow::Browsing;
        return Vec::new();
    }
    if let Section::Related(panel) = &mut detail.section
        && !matches!(panel.flow, RelatedFlow::Browsing)
    {
        panel.flow = RelatedFlow::Browsing;
        return Vec::new();
    }
    if detail.editing {
        detail.editing = false;
        return Vec::new();
    }
    if detail.section.kind().is_some() {
        detail.section = Section::Collapsed;
        return Vec::new();
    }
    if detail.links.is_some() {
        detail.links = None;
        return Vec::new();
    }

    app.detail = None;
    app.cache = DetailCache::default();
    app.screen = Screen::Board;
    Vec::new()
}

fn save(app: &mut App) -> Vec<Effect> {
    if app.loading {
        return Vec::new();
    }
    let Some(detail) = app.detail.as_mut() else {
        return Vec::new();
    };
    let edit = detail.edit();
    if edit.title.is_empty() {
        app.set_error("Title is required");
        return Vec::new();
    }
    detail.editing = false;
    let item_id = detail.item.id;
    app.loading = true;
    vec![Effect::Backend(Op::UpdateItem { item_id, edit })]
}

fn link_form_key(app: &mut App, key: KeyEvent) -> Vec<Effect> {
    let Some(detail) = app.detail.as_mut() else {
        return Vec::new();
    };
    let item_id = detail.item.id;
    let Some(LinksPanel {
        flow: LinksFlow::Adding {
            url,
            comment,
            on_comment,
        },
        ..
    }) = detail.links.as_mut()
    else {
        return Vec::new();
    };

    match key.code {
        KeyCode::Tab | KeyCode::BackTab | KeyCode::Up | KeyCode::Down => {
            *on_comment = !*on_comment;
            Vec::new()
        }
        KeyCode::Enter => {
            let url = url.value().trim().to_string();
            let comment = comment.value().trim().to_string();
            if let Err(e) = validate_hyperlink(&url, &comment) {
                app.set_error(e.to_string());
                return Vec::new();
            }
            if app.loading {
                return Vec::new();
            }
            app.loading = true;
            vec![Effect::Backend(Op::AddHyperlink {
                item_id,
                url,
                comment,
            })]
        }
        _ => {
            if *on_comment {
                comment.handle_key(key);
            } else {
                url.handle_key(key);
            }
            Vec::new()
        }
    }
}

/// `y` confirms the pending unlink; any other key cancels it.
fn confirm_unlink_key(app: &mut App, key: KeyEvent) -> Vec<Effect> {
    let Some(detail) = app.detail.as_mut() else {
        return Vec::new();
    };
    let item_id = detail.item.id;
    let Section::Related(panel) = &mut detail.section else {
        return Vec::new();
    };
    let RelatedFlow::ConfirmUnlink {
        target_id,
        direction,
    } = std::mem::take(&mut panel.flow)
    else {
        return Vec::new();
    };

    if matches!(key.code, KeyCode::Char('y') | KeyCode::Char('Y')) {
        tracing::info!(item_id, target_id, ?direction, "removing hierarchy link");
        app.loading = true;
        vec![Effect::Backend(Op::RemoveLink {
            item_id,
            target_id,
            direction,
        })]
    } else {
        app.set_message("Unlink cancelled");
        Vec::new()
    }
}

fn draft_key(app: &mut App, key: KeyEvent) -> Vec<Effect> {
    let types = app.work_item_types.len();
    let Some(detail) = app.detail.as_mut() else {
        return Vec::new();
    };
    let anchor_id = detail.item.id;
    let Section::Related(RelatedPanel {
        flow: RelatedFlow::Creating(draft),
        ..
    }) = &mut detail.section
    else {
        return Vec::new();
    };
    let position = DRAFT_FIELDS
        .iter()
        .position(|f| *f == draft.focus)
        .unwrap_or(0);

    match key.code {
        KeyCode::Tab | KeyCode::Down => {
            draft.focus = DRAFT_FIELDS[cycle(position, DRAFT_FIELDS.len(), true)];
        }
        KeyCode::BackTab | KeyCode::Up => {
            draft.focus = DRAFT_FIELDS[cycle(position, DRAFT_FIELDS.len(), false)];
        }
        KeyCode::Left if draft.focus == DraftField::Type => {
            draft.type_index = cycle(draft.type_index, types, false);
        }
        KeyCode::Right | KeyCode::Char(' ') if draft.focus == DraftField::Type => {
            draft.type_index = cycle(draft.type_index, types, true);
        }
        KeyCode::Enter => {
            let title = draft.title.value().trim().to_string();
            let assigned_to = draft.assignee.value().trim().to_string();
            let (as_child, type_index) = (draft.as_child, draft.type_index);
            if title.is_empty() {
                app.set_error("Title is required");
                return Vec::new();
            }
            if app.loading {
                return Vec::new();
            }
            let item = NewWorkItem {
                work_item_type: app.type_name(type_index).to_string(),
                title,
                description: String::new(),
                priority: RELATED_PRIORITY,
                assigned_to,
            };
            app.loading = true;
            return vec![Effect::Backend(Op::CreateRelated {
                anchor_id,
                as_child,
                item,
            })];
        }
        _ => match draft.focus {
            DraftField::Title => {
                draft.title.handle_key(key);
            }
            DraftField::Assignee => {
                draft.assignee.handle_key(key);
            }
            DraftField::Type => {}
        },
    }
    Vec::new()
}

fn planning_key(app: &mut App, key: KeyEvent) -> Vec<Effect> {
    let Some(detail) = app.detail.as_mut() else {
        return Vec::new();
    };
    let item_id = detail.item.id;
    let work_item_type = detail.item.fields.work_item_type.clone();
    let Section::Planning(form) = &mut detail.section else {
        return Vec::new();
    };
    let count = form.inputs.len();

    match key.code {
        KeyCode::Tab | KeyCode::Down => form.focus = cycle(form.focus, count, true),
        KeyCode::BackTab | KeyCode::Up => form.focus = cycle(form.focus, count, false),
        KeyCode::Enter => {
            let fields = app
                .cache
                .planning
                .get(&work_item_type)
                .map(Vec::as_slice)
                .unwrap_or_default();
            // Unparseable input leaves its field unset
            let values: IndexMap<String, f64> = fields
                .iter()
                .zip(&form.inputs)
                .filter_map(|(field, input)| {
                    parse_lenient(input.value()).map(|v| (field.reference_name.clone(), v))
                })
                .collect();
            if values.is_empty() || app.loading {
                return Vec::new();
            }
            app.loading = true;
            return vec![Effect::Backend(Op::UpdatePlanning { item_id, values })];
        }
        _ => {
            if let Some(input) = form.inputs.get_mut(form.focus) {
                input.handle_key(key);
            }
        }
    }
    Vec::new()
}

fn editing_key(app: &mut App, key: KeyEvent) -> Vec<Effect> {
    let loading = app.loading;
    let Some(detail) = app.detail.as_mut() else {
        return Vec::new();
    };
    let focus = detail.focus;
    match key.code {
        KeyCode::Enter if focus == DetailField::Comment => {
            let text = detail.comment.value().trim().to_string();
            if text.is_empty() {
                detail.editing = false;
                return Vec::new();
            }
            if loading {
                return Vec::new();
            }
            let item_id = detail.item.id;
            app.loading = true;
            vec![Effect::Backend(Op::AddComment { item_id, text })]
        }
        KeyCode::Enter => {
            detail.editing = false;
            Vec::new()
        }
        KeyCode::Tab | KeyCode::BackTab => {
            detail.editing = false;
            detail.focus = next_field(focus, key.code == KeyCode::Tab);
            Vec::new()
        }
        _ => {
            detail.field_mut(focus).handle_key(key);
            Vec::new()
        }
    }
}

/// Keys for the expanded section. `None` when the key is not one of them.
fn section_key(app: &mut App, key: KeyEvent) -> Option<Vec<Effect>> {
    let username = app.username().to_string();
    let detail = app.detail.as_mut()?;
    let down = matches!(key.code, KeyCode::Char('j') | KeyCode::Down);
    let up = matches!(key.code, KeyCode::Char('k') | KeyCode::Up);

    match &mut detail.section {
        Section::Comments { scroll } if down || up => {
            *scroll = step(*scroll, detail.comments.len(), down);
            Some(Vec::new())
        }
        Section::Related(panel) => {
            let entries = detail.related.entries();
            if down || up {
                panel.cursor = step(panel.cursor, entries.len(), down);
                return Some(Vec::new());
            }
            match key.code {
                KeyCode::Enter => {
                    let Some((_, target)) = entries.get(panel.cursor) else {
                        return Some(Vec::new());
                    };
                    let target = (*target).clone();
                    Some(open(app, target))
                }
                KeyCode::Char('d') | KeyCode::Delete => {
                    let Some((direction, target)) = entries.get(panel.cursor) else {
                        return Some(Vec::new());
                    };
                    panel.flow = RelatedFlow::ConfirmUnlink {
                        target_id: target.id,
                        direction: *direction,
                    };
                    Some(Vec::new())
                }
                KeyCode::Char('n') | KeyCode::Char('N') => {
                    let as_child = key.code == KeyCode::Char('n');
                    panel.flow = RelatedFlow::Creating(RelatedDraft::new(
                        as_child,
                        &username,
                        &app.work_item_types,
                    ));
                    Some(Vec::new())
                }
                _ => None,
            }
        }
        Section::Iteration { cursor } => {
            let iterations = app.cache.iterations.as_deref().unwrap_or_default();
            let ordered = iteration_display_order(iterations, &detail.item.fields.iteration_path);
            if down || up {
                *cursor = step(*cursor, ordered.len(), down);
                return Some(Vec::new());
            }
            if key.code != KeyCode::Enter {
                return None;
            }
            let Some(choice) = ordered.get(*cursor) else {
                return Some(Vec::new());
            };
            let path = choice.path.clone();
            let item_id = detail.item.id;
            detail.section = Section::Collapsed;
            if path == detail.item.fields.iteration_path {
                return Some(Vec::new());
            }
            app.loading = true;
            Some(vec![Effect::Backend(Op::UpdateIteration { item_id, path })])
        }
        _ => None,
    }
}

/// Keys for the links panel when no section claims them.
fn links_key(app: &mut App, key: KeyEvent) -> Option<Vec<Effect>> {
    let detail = app.detail.as_mut()?;
    let item_id = detail.item.id;
    let count = detail.hyperlinks.len();
    let panel = detail.links.as_mut()?;
    match key.code {
        KeyCode::Char('j') | KeyCode::Down => panel.cursor = step(panel.cursor, count, true),
        KeyCode::Char('k') | KeyCode::Up => panel.cursor = step(panel.cursor, count, false),
        KeyCode::Char('a') => {
            panel.flow = LinksFlow::Adding {
                url: TextInput::new(),
                comment: TextInput::new(),
                on_comment: false,
            };
        }
        KeyCode::Char('d') | KeyCode::Delete => {
            let url = detail.hyperlinks.get(panel.cursor)?.url.clone();
            if app.loading {
                return Some(Vec::new());
            }
            app.loading = true;
            return Some(vec![Effect::Backend(Op::RemoveHyperlink { item_id, url })]);
        }
        _ => return None,
    }
    Some(Vec::new())
}

fn base_key(app: &mut App, key: KeyEvent) -> Vec<Effect> {
    let Some(detail) = app.detail.as_mut() else {
        return Vec::new();
    };
    let item_id = detail.item.id;
    match key.code {
        KeyCode::Tab | KeyCode::Char('j') | KeyCode::Down => {
            detail.focus = next_field(detail.focus, true);
        }
        KeyCode::BackTab | KeyCode::Char('k') | KeyCode::Up => {
            detail.focus = next_field(detail.focus, false);
        }
        KeyCode::Enter | KeyCode::Char('e') => detail.editing = true,
        KeyCode::Char('v') => {
            toggle(detail, SectionKind::Comments, Section::Comments { scroll: 0 });
        }
        KeyCode::Char('r') => {
            toggle(detail, SectionKind::Related, Section::Related(RelatedPanel::default()));
        }
        KeyCode::Char('i') => {
            toggle(detail, SectionKind::Iteration, Section::Iteration { cursor: 0 });
            let open = detail.section.is_expanded(SectionKind::Iteration);
            if open && app.cache.iterations.is_none() && !app.cache.iterations_pending {
                app.cache.iterations_pending = true;
                return vec![Effect::Backend(Op::FetchIterations)];
            }
        }
        KeyCode::Char('p') => {
            if detail.section.is_expanded(SectionKind::Planning) {
                detail.section = Section::Collapsed;
                return Vec::new();
            }
            let work_item_type = detail.item.fields.work_item_type.clone();
            match app.cache.planning.get(&work_item_type) {
                Some(fields) => {
                    detail.section = Section::Planning(PlanningForm::with_fields(fields.len()));
                }
                None => {
                    detail.section = Section::Planning(PlanningForm::pending());
                    return vec![Effect::Backend(Op::FetchPlanningFields(work_item_type))];
                }
            }
        }
        KeyCode::Char('u') => {
            if detail.links.take().is_none() {
                detail.links = Some(LinksPanel::default());
                return vec![Effect::Backend(Op::FetchHyperlinks(item_id))];
            }
        }
        KeyCode::Char('o') => return app.web_url(item_id).map(Effect::OpenUrl).into_iter().collect(),
        _ => {}
    }
    Vec::new()
}

fn toggle(detail: &mut DetailState, kind: SectionKind, open: Section) {
    detail.section = if detail.section.is_expanded(kind) {
        Section::Collapsed
    } else {
        open
    };
}

fn next_field(field: DetailField, forward: bool) -> DetailField {
    let position = DetailField::ALL
        .iter()
        .position(|f| *f == field)
        .unwrap_or(0);
    DetailField::ALL[cycle(position, DetailField::ALL.len(), forward)]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{AppSettings, Credentials, Iteration, PlanningField};
    use crossterm::event::KeyModifiers;
    use pretty_assertions::assert_eq;

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn item(id: i64, title: &str) -> WorkItem {
        let mut w = WorkItem {
            id,
            rev: 1,
            ..Default::default()
        };
        w.fields.title = title.into();
        w.fields.work_item_type = "Task".into();
        w.fields.iteration_path = "Web\\S1".into();
        w
    }

    fn app_on_detail() -> App {
        let mut app = App::new(
            AppSettings::default(),
            Some(Credentials {
                organization: "contoso".into(),
                project: "Web".into(),
                token: "pat".into(),
                username: "ada@contoso.com".into(),
                ..Default::default()
            }),
        );
        app.session = Some(app.config.credentials());
        app.connected = true;
        open(&mut app, item(7, "Fix login"));
        app
    }

    fn detail(app: &App) -> &DetailState {
        app.detail.as_ref().expect("detail open")
    }

    #[test]
    fn opening_fetches_comments_and_related() {
        let mut app = App::new(AppSettings::default(), None);
        let effects = open(&mut app, item(3, "x"));
        assert_eq!(app.screen, Screen::Detail);
        assert_eq!(
            effects,
            vec![
                Effect::Backend(Op::FetchComments(3)),
                Effect::Backend(Op::FetchRelated(3)),
            ]
        );
    }

    #[test]
    fn opening_one_section_closes_the_other() {
        let mut app = app_on_detail();
        handle_key(&mut app, press(KeyCode::Char('v')));
        assert!(detail(&app).section.is_expanded(SectionKind::Comments));
        handle_key(&mut app, press(KeyCode::Char('r')));
        assert!(detail(&app).section.is_expanded(SectionKind::Related));
        assert!(!detail(&app).section.is_expanded(SectionKind::Comments));
    }

    #[test]
    fn links_panel_coexists_with_sections() {
        let mut app = app_on_detail();
        handle_key(&mut app, press(KeyCode::Char('v')));
        let effects = handle_key(&mut app, press(KeyCode::Char('u')));
        assert_eq!(effects, vec![Effect::Backend(Op::FetchHyperlinks(7))]);
        assert!(detail(&app).links.is_some());
        assert!(detail(&app).section.is_expanded(SectionKind::Comments));
    }

    #[test]
    fn iterations_are_fetched_once() {
        let mut app = app_on_detail();
        let effects = handle_key(&mut app, press(KeyCode::Char('i')));
        assert_eq!(effects, vec![Effect::Backend(Op::FetchIterations)]);
        handle_key(&mut app, press(KeyCode::Char('i')));
        let effects = handle_key(&mut app, press(KeyCode::Char('i')));
        assert!(effects.is_empty());
    }

    #[test]
    fn choosing_an_iteration_updates_and_collapses() {
        let mut app = app_on_detail();
        app.cache.iterations = Some(vec![
            Iteration {
                name: "S1".into(),
                path: "Web\\S1".into(),
                ..Default::default()
            },
            Iteration {
                name: "S2".into(),
                path: "Web\\S2".into(),
                ..Default::default()
            },
        ]);
        handle_key(&mut app, press(KeyCode::Char('i')));
        handle_key(&mut app, press(KeyCode::Char('j')));
        let effects = handle_key(&mut app, press(KeyCode::Enter));
        assert_eq!(
            effects,
            vec![Effect::Backend(Op::UpdateIteration {
                item_id: 7,
                path: "Web\\S2".into(),
            })]
        );
        assert!(detail(&app).section.kind().is_none());
    }

    #[test]
    fn empty_planning_submit_sends_nothing() {
        let mut app = app_on_detail();
        app.cache.planning.insert(
            "Task".into(),
            vec![PlanningField {
                reference_name: "Microsoft.VSTS.Scheduling.RemainingWork".into(),
                display_name: "Remaining Work".into(),
                value: None,
            }],
        );
        handle_key(&mut app, press(KeyCode::Char('p')));
        assert!(handle_key(&mut app, press(KeyCode::Enter)).is_empty());

        handle_key(&mut app, press(KeyCode::Char('4')));
        let effects = handle_key(&mut app, press(KeyCode::Enter));
        let mut values = IndexMap::new();
        values.insert("Microsoft.VSTS.Scheduling.RemainingWork".to_string(), 4.0);
        assert_eq!(
            effects,
            vec![Effect::Backend(Op::UpdatePlanning { item_id: 7, values })]
        );
    }

    #[test]
    fn planning_without_cache_fetches_fields() {
        let mut app = app_on_detail();
        let effects = handle_key(&mut app, press(KeyCode::Char('p')));
        assert_eq!(
            effects,
            vec![Effect::Backend(Op::FetchPlanningFields("Task".into()))]
        );
        assert!(matches!(&detail(&app).section, Section::Planning(f) if f.loading));
    }

    #[test]
    fn unlink_requires_y() {
        let mut app = app_on_detail();
        if let Some(d) = app.detail.as_mut() {
            d.related.children = vec![item(8, "child")];
        }
        handle_key(&mut app, press(KeyCode::Char('r')));
        handle_key(&mut app, press(KeyCode::Char('d')));
        assert!(handle_key(&mut app, press(KeyCode::Char('x'))).is_empty());

        handle_key(&mut app, press(KeyCode::Char('d')));
        let effects = handle_key(&mut app, press(KeyCode::Char('y')));
        assert_eq!(
            effects,
            vec![Effect::Backend(Op::RemoveLink {
                item_id: 7,
                target_id: 8,
                direction: crate::model::LinkDirection::Child,
            })]
        );
    }

    #[test]
    fn creating_a_parent_uses_related_priority() {
        let mut app = app_on_detail();
        handle_key(&mut app, press(KeyCode::Char('r')));
        handle_key(&mut app, press(KeyCode::Char('N')));
        for c in "Epic work".chars() {
            handle_key(&mut app, press(KeyCode::Char(c)));
        }
        let effects = handle_key(&mut app, press(KeyCode::Enter));
        let [Effect::Backend(Op::CreateRelated {
            anchor_id,
            as_child,
            item,
        })] = effects.as_slice()
        else {
            panic!("expected CreateRelated, got {effects:?}");
        };
        assert_eq!(*anchor_id, 7);
        assert!(!as_child);
        assert_eq!(item.title, "Epic work");
        assert_eq!(item.priority, RELATED_PRIORITY);
        assert_eq!(item.assigned_to, "ada@contoso.com");
    }

    #[test]
    fn invalid_hyperlink_is_rejected_locally() {
        let mut app = app_on_detail();
        handle_key(&mut app, press(KeyCode::Char('u')));
        handle_key(&mut app, press(KeyCode::Char('a')));
        for c in "ftp://x".chars() {
            handle_key(&mut app, press(KeyCode::Char(c)));
        }
        assert!(handle_key(&mut app, press(KeyCode::Enter)).is_empty());
        assert!(
            app.error
                .as_deref()
                .is_some_and(|e| e.contains("invalid URL scheme"))
        );
    }

    #[test]
    fn escape_unwinds_one_level_at_a_time() {
        let mut app = app_on_detail();
        handle_key(&mut app, press(KeyCode::Char('u')));
        handle_key(&mut app, press(KeyCode::Char('v')));
        handle_key(&mut app, press(KeyCode::Char('e')));

        handle_key(&mut app, press(KeyCode::Esc));
        assert!(!detail(&app).editing);
        handle_key(&mut app, press(KeyCode::Esc));
        assert!(detail(&app).section.kind().is_none());
        handle_key(&mut app, press(KeyCode::Esc));
        assert!(detail(&app).links.is_none());
        let effects = handle_key(&mut app, press(KeyCode::Esc));
        assert!(effects.is_empty());
        assert_eq!(app.screen, Screen::Board);
        assert!(app.detail.is_none());
    }

    #[test]
    fn comment_field_enter_posts() {
        let mut app = app_on_detail();
        if let Some(d) = app.detail.as_mut() {
            d.focus = DetailField::Comment;
        }
        handle_key(&mut app, press(KeyCode::Enter));
        for c in "done".chars() {
            handle_key(&mut app, press(KeyCode::Char(c)));
        }
        let effects = handle_key(&mut app, press(KeyCode::Enter));
        assert_eq!(
            effects,
            vec![Effect::Backend(Op::AddComment {
                item_id: 7,
                text: "done".into(),
            })]
        );
    }

    #[test]
    fn enter_on_empty_section_does_not_start_editing() {
        let mut app = app_on_detail();
        handle_key(&mut app, press(KeyCode::Char('r')));
        assert!(handle_key(&mut app, press(KeyCode::Enter)).is_empty());
        assert!(handle_key(&mut app, press(KeyCode::Char('d'))).is_empty());
        assert!(!detail(&app).editing);
        assert!(matches!(detail(&app).section, Section::Related(_)));

        handle_key(&mut app, press(KeyCode::Char('i')));
        assert!(handle_key(&mut app, press(KeyCode::Enter)).is_empty());
        assert!(!detail(&app).editing);
        assert!(matches!(detail(&app).section, Section::Iteration { .. }));
    }
}
