use std::time::Duration;

use crossterm::event::KeyEvent;
use indexmap::IndexMap;

use crate::client::{ClientError, ItemQuery, Page, PageRequest};
use crate::model::{
    AppSettings, Comment, Credentials, Hyperlink, ItemEdit, Iteration, LinkDirection,
    NewWorkItem, PlanningField, Related, WorkItem,
};

/// Everything the state machine reacts to.
#[derive(Debug)]
pub enum Event {
    Key(KeyEvent),
    Remote(Outcome),
}

type Result<T> = std::result::Result<T, ClientError>;

/// Completion of one asynchronous operation, or a timer firing.
#[derive(Debug)]
pub enum Outcome {
    Connected(Result<()>),
    ItemsFetched {
        page: PageRequest,
        result: Result<Page<WorkItem>>,
    },
    TypesFetched(Result<Vec<String>>),
    ItemCreated(Result<WorkItem>),
    CommentsFetched {
        item_id: i64,
        result: Result<Vec<Comment>>,
    },
    CommentAdded {
        item_id: i64,
        result: Result<Comment>,
    },
    ItemUpdated(Result<WorkItem>),
    RelatedFetched {
        item_id: i64,
        result: Result<Related>,
    },
    RelatedCreated {
        anchor_id: i64,
        as_child: bool,
        result: Result<WorkItem>,
    },
    LinkRemoved {
        item_id: i64,
        result: Result<WorkItem>,
    },
    ItemDeleted {
        item_id: i64,
        result: Result<()>,
    },
    IterationsFetched(Result<Vec<Iteration>>),
    IterationUpdated(Result<WorkItem>),
    PlanningFieldsFetched {
        work_item_type: String,
        result: Result<Vec<PlanningField>>,
    },
    PlanningUpdated(Result<WorkItem>),
    HyperlinksFetched {
        item_id: i64,
        result: Result<Vec<Hyperlink>>,
    },
    HyperlinkAdded {
        item_id: i64,
        result: Result<WorkItem>,
    },
    HyperlinkRemoved {
        item_id: i64,
        result: Result<WorkItem>,
    },
    Tick,
    ChangesDetected(Result<Vec<WorkItem>>),
    CredentialsSaved(std::result::Result<(), String>),
    SettingsSaved(std::result::Result<(), String>),
}

/// A backend call to run off the event loop.
#[derive(Debug, Clone, PartialEq)]
pub enum Op {
    TestConnection,
    FetchItems {
        query: ItemQuery,
        page: PageRequest,
    },
    FetchTypes,
    CreateItem(NewWorkItem),
    FetchComments(i64),
    AddComment {
        item_id: i64,
        text: String,
    },
    UpdateItem {
        item_id: i64,
        edit: ItemEdit,
    },
    FetchRelated(i64),
    /// Create an item linked to `anchor_id`: as its child, or as its parent.
    CreateRelated {
        anchor_id: i64,
        as_child: bool,
        item: NewWorkItem,
    },
    RemoveLink {
        item_id: i64,
        target_id: i64,
        direction: LinkDirection,
    },
    DeleteItem(i64),
    FetchIterations,
    UpdateIteration {
        item_id: i64,
        path: String,
    },
    FetchPlanningFields(String),
    UpdatePlanning {
        item_id: i64,
        values: IndexMap<String, f64>,
    },
    FetchHyperlinks(i64),
    AddHyperlink {
        item_id: i64,
        url: String,
        comment: String,
    },
    RemoveHyperlink {
        item_id: i64,
        url: String,
    },
    PollChanges {
        assignee: String,
        window: Duration,
    },
}

impl Op {
    /// The outcome reported when the operation could not run at all.
    pub fn failed(self, error: ClientError) -> Outcome {
        match self {
            Op::TestConnection => Outcome::Connected(Err(error)),
            Op::FetchItems { page, .. } => Outcome::ItemsFetched {
                page,
                result: Err(error),
            },
            Op::FetchTypes => Outcome::TypesFetched(Err(error)),
            Op::CreateItem(_) => Outcome::ItemCreated(Err(error)),
            Op::FetchComments(item_id) => Outcome::CommentsFetched {
                item_id,
                result: Err(error),
            },
            Op::AddComment { item_id, .. } => Outcome::CommentAdded {
                item_id,
                result: Err(error),
            },
            Op::UpdateItem { .. } => Outcome::ItemUpdated(Err(error)),
            Op::FetchRelated(item_id) => Outcome::RelatedFetched {
                item_id,
                result: Err(error),
            },
            Op::CreateRelated {
                anchor_id,
                as_child,
                ..
            } => Outcome::RelatedCreated {
                anchor_id,
                as_child,
                result: Err(error),
            },
            Op::RemoveLink { item_id, .. } => Outcome::LinkRemoved {
                item_id,
                result: Err(error),
            },
            Op::DeleteItem(item_id) => Outcome::ItemDeleted {
                item_id,
                result: Err(error),
            },
            Op::FetchIterations => Outcome::IterationsFetched(Err(error)),
            Op::UpdateIteration { .. } => Outcome::IterationUpdated(Err(error)),
            Op::FetchPlanningFields(work_item_type) => Outcome::PlanningFieldsFetched {
                work_item_type,
                result: Err(error),
            },
            Op::UpdatePlanning { .. } => Outcome::PlanningUpdated(Err(error)),
            Op::FetchHyperlinks(item_id) => Outcome::HyperlinksFetched {
                item_id,
                result: Err(error),
            },
            Op::AddHyperlink { item_id, .. } => Outcome::HyperlinkAdded {
                item_id,
                result: Err(error),
            },
            Op::RemoveHyperlink { item_id, .. } => Outcome::HyperlinkRemoved {
                item_id,
                result: Err(error),
            },
            Op::PollChanges { .. } => Outcome::ChangesDetected(Err(error)),
        }
    }
}

/// Work the runtime performs on behalf of the state machine.
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    /// Replace the session client and verify the connection.
    Connect(Credentials),
    Backend(Op),
    /// Deliver `Outcome::Tick` after the delay.
    ScheduleTick(Duration),
    SaveCredentials(Credentials),
    ClearCredentials,
    SaveSettings(AppSettings),
    OpenUrl(String),
    Bell,
    Quit,
}

impl Effect {
    pub fn is_backend(&self) -> bool {
        matches!(self, Effect::Backend(_) | Effect::Connect(_))
    }
}
