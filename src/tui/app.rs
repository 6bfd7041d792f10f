use std::collections::HashMap;

use crate::client::{ItemQuery, PageRequest};
use crate::model::{
    AppSettings, Comment, Credentials, Hyperlink, ItemEdit, Iteration, LinkDirection,
    PlanningField, Related, WorkItem,
};
use crate::watch::{ChangeWatcher, POLL_INTERVAL};

use super::event::Effect;
use super::text_input::TextInput;
use super::theme::Theme;

/// Work item types offered before the server list arrives.
pub const DEFAULT_WORK_ITEM_TYPES: [&str; 5] = ["Bug", "Task", "User Story", "Feature", "Epic"];

/// Priority given to items created from the related panel.
pub const RELATED_PRIORITY: i64 = 2;

/// Which screen is currently displayed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Config,
    Settings,
    Board,
    Create,
    Detail,
}

pub const CONFIG_LABELS: [&str; 6] = [
    "Organization",
    "Project",
    "Team",
    "Area Path",
    "Personal Access Token",
    "Username",
];

/// Connection form. Input order follows `CONFIG_LABELS`.
#[derive(Debug, Clone)]
pub struct ConfigForm {
    pub inputs: [TextInput; 6],
    pub focus: usize,
}

impl Default for ConfigForm {
    fn default() -> Self {
        ConfigForm {
            inputs: [
                TextInput::new(),
                TextInput::new(),
                TextInput::new(),
                TextInput::new(),
                TextInput::masked(),
                TextInput::new(),
            ],
            focus: 0,
        }
    }
}

impl ConfigForm {
    pub fn from_credentials(c: &Credentials) -> Self {
        let mut form = Self::default();
        let values = [
            &c.organization,
            &c.project,
            &c.team,
            &c.area_path,
            &c.token,
            &c.username,
        ];
        for (input, value) in form.inputs.iter_mut().zip(values) {
            input.set(value.as_str());
        }
        form
    }

    pub fn credentials(&self) -> Credentials {
        let v = |i: usize| self.inputs[i].value().trim().to_string();
        Credentials {
            organization: v(0),
            project: v(1),
            team: v(2),
            area_path: v(3),
            token: v(4),
            username: v(5),
        }
    }

    pub fn focused_mut(&mut self) -> &mut TextInput {
        &mut self.inputs[self.focus]
    }
}

/// Preferences form: two toggles and the page size.
#[derive(Debug, Clone)]
pub struct SettingsForm {
    pub focus: usize,
    pub show_all: bool,
    pub notifications: bool,
    pub max_items: TextInput,
}

impl SettingsForm {
    pub const FIELDS: usize = 3;

    pub fn from_settings(s: &AppSettings) -> Self {
        SettingsForm {
            focus: 0,
            show_all: s.default_show_all,
            notifications: s.enable_notifications,
            max_items: TextInput::with_value(s.max_work_items.to_string()),
        }
    }

    /// Settings described by the form. An invalid page size keeps `previous`.
    pub fn to_settings(&self, previous: &AppSettings) -> AppSettings {
        let max_work_items = self
            .max_items
            .value()
            .trim()
            .parse::<usize>()
            .ok()
            .filter(|n| *n > 0)
            .unwrap_or(previous.max_work_items);
        AppSettings {
            default_show_all: self.show_all,
            enable_notifications: self.notifications,
            max_work_items,
        }
    }
}

/// Typed-title confirmation before deleting a work item.
#[derive(Debug, Clone)]
pub struct DeleteConfirm {
    pub item_id: i64,
    pub title: String,
    pub input: TextInput,
}

#[derive(Debug, Clone, Default)]
pub struct BoardState {
    pub items: Vec<WorkItem>,
    pub cursor: usize,
    pub page: usize,
    pub has_more: bool,
    pub show_all: bool,
    pub delete: Option<DeleteConfirm>,
}

impl BoardState {
    pub fn selected(&self) -> Option<&WorkItem> {
        self.items.get(self.cursor)
    }

    /// Swap in a fresher copy of an item if it is on the current page.
    pub fn replace(&mut self, item: &WorkItem) {
        if let Some(slot) = self.items.iter_mut().find(|w| w.id == item.id) {
            *slot = item.clone();
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CreateField {
    Title,
    Description,
    Priority,
    Assignee,
    Type,
}

impl CreateField {
    pub const ALL: [CreateField; 5] = [
        CreateField::Title,
        CreateField::Description,
        CreateField::Priority,
        CreateField::Assignee,
        CreateField::Type,
    ];
}

/// Standalone creation form.
#[derive(Debug, Clone)]
pub struct CreateForm {
    pub title: TextInput,
    pub description: TextInput,
    pub priority: TextInput,
    pub assignee: TextInput,
    pub type_index: usize,
    pub focus: CreateField,
}

impl CreateForm {
    pub fn new(assignee: &str, types: &[String]) -> Self {
        CreateForm {
            title: TextInput::new(),
            description: TextInput::new(),
            priority: TextInput::with_value("2"),
            assignee: TextInput::with_value(assignee),
            type_index: default_type_index(types),
            focus: CreateField::Title,
        }
    }

    pub fn focused_input(&mut self) -> Option<&mut TextInput> {
        match self.focus {
            CreateField::Title => Some(&mut self.title),
            CreateField::Description => Some(&mut self.description),
            CreateField::Priority => Some(&mut self.priority),
            CreateField::Assignee => Some(&mut self.assignee),
            CreateField::Type => None,
        }
    }
}

/// Prefer "Task" as the initial type, else the first one.
pub fn default_type_index(types: &[String]) -> usize {
    types.iter().position(|t| t == "Task").unwrap_or(0)
}

/// Editable fields on the Detail screen, in focus order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DetailField {
    Title,
    State,
    Assignee,
    Tags,
    Comment,
}

impl DetailField {
    pub const ALL: [DetailField; 5] = [
        DetailField::Title,
        DetailField::State,
        DetailField::Assignee,
        DetailField::Tags,
        DetailField::Comment,
    ];

    pub fn label(self) -> &'static str {
        match self {
            DetailField::Title => "Title",
            DetailField::State => "State",
            DetailField::Assignee => "Assigned To",
            DetailField::Tags => "Tags",
            DetailField::Comment => "Comment",
        }
    }
}

/// The expandable Detail sections. Holding them in one enum means at most one
/// is ever open.
#[derive(Debug, Clone, Default)]
pub enum Section {
    #[default]
    Collapsed,
    Comments {
        scroll: usize,
    },
    Related(RelatedPanel),
    Iteration {
        cursor: usize,
    },
    Planning(PlanningForm),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SectionKind {
    Comments,
    Related,
    Iteration,
    Planning,
}

impl Section {
    pub fn kind(&self) -> Option<SectionKind> {
        match self {
            Section::Collapsed => None,
            Section::Comments { .. } => Some(SectionKind::Comments),
            Section::Related(_) => Some(SectionKind::Related),
            Section::Iteration { .. } => Some(SectionKind::Iteration),
            Section::Planning(_) => Some(SectionKind::Planning),
        }
    }

    pub fn is_expanded(&self, kind: SectionKind) -> bool {
        self.kind() == Some(kind)
    }
}

#[derive(Debug, Clone, Default)]
pub struct RelatedPanel {
    pub cursor: usize,
    pub flow: RelatedFlow,
}

#[derive(Debug, Clone, Default)]
pub enum RelatedFlow {
    #[default]
    Browsing,
    ConfirmUnlink {
        target_id: i64,
        direction: LinkDirection,
    },
    Creating(RelatedDraft),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DraftField {
    Title,
    Assignee,
    Type,
}

/// Form for creating a parent or child of the open item.
#[derive(Debug, Clone)]
pub struct RelatedDraft {
    pub as_child: bool,
    pub title: TextInput,
    pub assignee: TextInput,
    pub type_index: usize,
    pub focus: DraftField,
}

impl RelatedDraft {
    pub fn new(as_child: bool, assignee: &str, types: &[String]) -> Self {
        RelatedDraft {
            as_child,
            title: TextInput::new(),
            assignee: TextInput::with_value(assignee),
            type_index: default_type_index(types),
            focus: DraftField::Title,
        }
    }
}

/// Planning inputs, one per discovered field of the item's type. Empty while
/// the field list is loading.
#[derive(Debug, Clone, Default)]
pub struct PlanningForm {
    pub focus: usize,
    pub inputs: Vec<TextInput>,
    pub loading: bool,
}

impl PlanningForm {
    pub fn with_fields(count: usize) -> Self {
        PlanningForm {
            focus: 0,
            inputs: vec![TextInput::new(); count],
            loading: false,
        }
    }

    pub fn pending() -> Self {
        PlanningForm {
            loading: true,
            ..Default::default()
        }
    }
}

/// External-links panel. Lives beside `Section`, not inside it, so it can be
/// open together with any section.
#[derive(Debug, Clone, Default)]
pub struct LinksPanel {
    pub cursor: usize,
    pub flow: LinksFlow,
}

#[derive(Debug, Clone, Default)]
pub enum LinksFlow {
    #[default]
    Browsing,
    Adding {
        url: TextInput,
        comment: TextInput,
        on_comment: bool,
    },
}

/// Everything shown on the Detail screen for one work item.
#[derive(Debug, Clone)]
pub struct DetailState {
    pub item: WorkItem,
    pub title: TextInput,
    pub state: TextInput,
    pub assignee: TextInput,
    pub tags: TextInput,
    pub comment: TextInput,
    pub focus: DetailField,
    pub editing: bool,
    pub comments: Vec<Comment>,
    pub comments_loading: bool,
    pub related: Related,
    pub related_loading: bool,
    pub hyperlinks: Vec<Hyperlink>,
    pub section: Section,
    pub links: Option<LinksPanel>,
}

impl DetailState {
    pub fn new(item: WorkItem) -> Self {
        let f = &item.fields;
        DetailState {
            title: TextInput::with_value(f.title.as_str()),
            state: TextInput::with_value(f.state.as_str()),
            assignee: TextInput::with_value(
                f.assigned_to
                    .as_ref()
                    .map_or("", |who| who.unique_name.as_str()),
            ),
            tags: TextInput::with_value(f.tags.as_str()),
            comment: TextInput::new(),
            focus: DetailField::Title,
            editing: false,
            comments: Vec::new(),
            comments_loading: true,
            related: Related::default(),
            related_loading: true,
            hyperlinks: Vec::new(),
            section: Section::Collapsed,
            links: None,
            item,
        }
    }

    pub fn field_mut(&mut self, field: DetailField) -> &mut TextInput {
        match field {
            DetailField::Title => &mut self.title,
            DetailField::State => &mut self.state,
            DetailField::Assignee => &mut self.assignee,
            DetailField::Tags => &mut self.tags,
            DetailField::Comment => &mut self.comment,
        }
    }

    pub fn field(&self, field: DetailField) -> &TextInput {
        match field {
            DetailField::Title => &self.title,
            DetailField::State => &self.state,
            DetailField::Assignee => &self.assignee,
            DetailField::Tags => &self.tags,
            DetailField::Comment => &self.comment,
        }
    }

    pub fn edit(&self) -> ItemEdit {
        ItemEdit {
            title: self.title.value().trim().to_string(),
            state: self.state.value().trim().to_string(),
            assigned_to: self.assignee.value().trim().to_string(),
            tags: self.tags.value().trim().to_string(),
        }
    }

    /// Most recent comment by creation time, falling back to list order.
    pub fn latest_comment(&self) -> Option<&Comment> {
        self.comments
            .iter()
            .enumerate()
            .max_by(|(ia, a), (ib, b)| {
                a.created_date
                    .cmp(&b.created_date)
                    .then_with(|| ia.cmp(ib))
            })
            .map(|(_, c)| c)
    }
}

/// Lookups cached while the user stays on Detail screens.
#[derive(Debug, Clone, Default)]
pub struct DetailCache {
    pub iterations: Option<Vec<Iteration>>,
    pub iterations_pending: bool,
    /// Planning fields per work item type
    pub planning: HashMap<String, Vec<PlanningField>>,
}

/// Iterations with the item's current one first; the rest keep their order.
pub fn iteration_display_order<'a>(
    iterations: &'a [Iteration],
    current_path: &str,
) -> Vec<&'a Iteration> {
    let current = iterations.iter().filter(|it| it.path == current_path);
    let rest = iterations.iter().filter(|it| it.path != current_path);
    current.chain(rest).collect()
}

/// Main application state
pub struct App {
    pub screen: Screen,
    pub should_quit: bool,
    pub theme: Theme,
    pub settings: AppSettings,
    /// Credentials of the active (or connecting) session
    pub session: Option<Credentials>,
    pub connected: bool,
    pub loading: bool,
    pub error: Option<String>,
    pub message: Option<String>,
    pub config: ConfigForm,
    pub settings_form: SettingsForm,
    pub board: BoardState,
    pub create: CreateForm,
    pub detail: Option<DetailState>,
    pub cache: DetailCache,
    pub work_item_types: Vec<String>,
    pub watcher: ChangeWatcher,
}

impl App {
    pub fn new(settings: AppSettings, stored: Option<Credentials>) -> Self {
        let config = stored
            .as_ref()
            .map(ConfigForm::from_credentials)
            .unwrap_or_default();
        let work_item_types: Vec<String> =
            DEFAULT_WORK_ITEM_TYPES.iter().map(|s| s.to_string()).collect();
        let username = stored.as_ref().map_or("", |c| c.username.as_str());
        App {
            screen: Screen::Config,
            should_quit: false,
            theme: Theme::default(),
            settings_form: SettingsForm::from_settings(&settings),
            board: BoardState {
                show_all: settings.default_show_all,
                ..Default::default()
            },
            create: CreateForm::new(username, &work_item_types),
            settings,
            session: None,
            connected: false,
            loading: false,
            error: None,
            message: None,
            config,
            detail: None,
            cache: DetailCache::default(),
            work_item_types,
            watcher: ChangeWatcher::new(),
        }
    }

    /// Effects to run once at startup.
    pub fn init(&self) -> Vec<Effect> {
        vec![Effect::ScheduleTick(POLL_INTERVAL)]
    }

    pub fn username(&self) -> &str {
        self.session.as_ref().map_or("", |c| c.username.as_str())
    }

    /// Board filter: the user's own items unless showing everything.
    pub fn board_query(&self) -> ItemQuery {
        if self.board.show_all || self.username().is_empty() {
            ItemQuery::default()
        } else {
            ItemQuery::assigned_to(self.username())
        }
    }

    pub fn page_request(&self, index: usize) -> PageRequest {
        PageRequest::new(self.settings.page_size(), index)
    }

    /// Browser URL for a work item in the current session.
    pub fn web_url(&self, id: i64) -> Option<String> {
        self.session.as_ref().map(|c| {
            crate::client::work_item_web_url(&c.organization, &c.project, id)
        })
    }

    pub fn set_error(&mut self, error: impl Into<String>) {
        self.loading = false;
        self.message = None;
        self.error = Some(error.into());
    }

    pub fn set_message(&mut self, message: impl Into<String>) {
        self.error = None;
        self.message = Some(message.into());
    }

    pub fn type_name(&self, index: usize) -> &str {
        self.work_item_types
            .get(index)
            .map_or("Task", |s| s.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn iteration(name: &str) -> Iteration {
        Iteration {
            id: name.into(),
            name: name.into(),
            path: format!("Web\\{name}"),
            attributes: None,
        }
    }

    #[test]
    fn current_iteration_moves_first() {
        let its = vec![iteration("S1"), iteration("S2"), iteration("S3")];
        let names: Vec<&str> = iteration_display_order(&its, "Web\\S2")
            .iter()
            .map(|i| i.name.as_str())
            .collect();
        assert_eq!(names, vec!["S2", "S1", "S3"]);
    }

    #[test]
    fn unknown_iteration_keeps_order() {
        let its = vec![iteration("S1"), iteration("S2")];
        let names: Vec<&str> = iteration_display_order(&its, "")
            .iter()
            .map(|i| i.name.as_str())
            .collect();
        assert_eq!(names, vec!["S1", "S2"]);
    }

    #[test]
    fn config_form_round_trips_credentials() {
        let creds = Credentials {
            organization: "contoso".into(),
            project: "Web".into(),
            team: String::new(),
            area_path: String::new(),
            token: "pat".into(),
            username: "ada".into(),
        };
        let form = ConfigForm::from_credentials(&creds);
        assert!(form.inputs[4].masked);
        assert_eq!(form.credentials(), creds);
    }

    #[test]
    fn settings_form_keeps_previous_on_bad_number() {
        let previous = AppSettings::default();
        let mut form = SettingsForm::from_settings(&previous);
        form.max_items.set("zero");
        assert_eq!(form.to_settings(&previous).max_work_items, 50);
        form.max_items.set("25");
        assert_eq!(form.to_settings(&previous).max_work_items, 25);
    }

    #[test]
    fn latest_comment_by_date() {
        let mut detail = DetailState::new(WorkItem::default());
        detail.comments = vec![
            Comment {
                id: 1,
                created_date: "2026-01-02T10:00:00Z".into(),
                ..Default::default()
            },
            Comment {
                id: 2,
                created_date: "2026-01-01T10:00:00Z".into(),
                ..Default::default()
            },
        ];
        assert_eq!(detail.latest_comment().map(|c| c.id), Some(1));
    }

    #[test]
    fn board_query_filters_to_user_unless_show_all() {
        let mut app = App::new(AppSettings::default(), None);
        app.session = Some(Credentials {
            username: "ada".into(),
            ..Default::default()
        });
        assert_eq!(app.board_query(), ItemQuery::assigned_to("ada"));
        app.board.show_all = true;
        assert_eq!(app.board_query(), ItemQuery::default());
    }
}
