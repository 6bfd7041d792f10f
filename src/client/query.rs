//! WIQL construction and offset pagination over an endpoint that only
//! supports a result cap.

use chrono::{DateTime, SecondsFormat, Utc};

/// Maximum number of IDs per batched fetch.
pub const BATCH_SIZE: usize = 200;

/// Filters for the board listing.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ItemQuery {
    pub work_item_type: Option<String>,
    pub assigned_to: Option<String>,
}

impl ItemQuery {
    pub fn assigned_to(user: impl Into<String>) -> Self {
        ItemQuery {
            assigned_to: Some(user.into()),
            ..Default::default()
        }
    }
}

/// A zero-based page of `size` items.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PageRequest {
    pub size: usize,
    pub index: usize,
}

impl PageRequest {
    pub fn new(size: usize, index: usize) -> Self {
        PageRequest { size, index }
    }

    pub fn skip(&self) -> usize {
        self.size * self.index
    }

    /// Number of IDs to request so that this page is covered.
    pub fn fetch_count(&self) -> usize {
        self.size * (self.index + 1)
    }

    /// The IDs belonging to this page. Empty when the page starts past the end.
    pub fn slice<'a, T>(&self, ids: &'a [T]) -> &'a [T] {
        let start = self.skip();
        if self.size == 0 || start >= ids.len() {
            return &[];
        }
        let end = (start + self.size).min(ids.len());
        &ids[start..end]
    }

    /// More pages may follow when this one came back full.
    pub fn has_more(&self, returned: usize) -> bool {
        self.size > 0 && returned == self.size
    }
}

/// A fetched page of work items.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub has_more: bool,
}

/// Quote a WIQL string literal.
pub fn quote(value: &str) -> String {
    format!("'{}'", value.replace('\'', "''"))
}

/// The board listing query, newest changes first.
pub fn list_query(project: &str, area_path: &str, query: &ItemQuery) -> String {
    let mut wiql = format!(
        "SELECT [System.Id] FROM WorkItems WHERE [System.TeamProject] = {}",
        quote(project)
    );
    if let Some(kind) = query.work_item_type.as_deref().filter(|s| !s.is_empty()) {
        wiql.push_str(&format!(" AND [System.WorkItemType] = {}", quote(kind)));
    }
    if let Some(user) = query.assigned_to.as_deref().filter(|s| !s.is_empty()) {
        wiql.push_str(&format!(" AND [System.AssignedTo] = {}", quote(user)));
    }
    push_area_clause(&mut wiql, area_path);
    wiql.push_str(" ORDER BY [System.ChangedDate] DESC");
    wiql
}

/// Items assigned to `user`, changed by someone else since `since`.
pub fn recent_changes_query(
    project: &str,
    area_path: &str,
    user: &str,
    since: DateTime<Utc>,
) -> String {
    let mut wiql = format!(
        "SELECT [System.Id] FROM WorkItems WHERE [System.TeamProject] = {} \
         AND [System.AssignedTo] = {} AND [System.ChangedBy] <> {} \
         AND [System.ChangedDate] >= {}",
        quote(project),
        quote(user),
        quote(user),
        quote(&since.to_rfc3339_opts(SecondsFormat::Secs, true)),
    );
    push_area_clause(&mut wiql, area_path);
    wiql.push_str(" ORDER BY [System.ChangedDate] DESC");
    wiql
}

fn push_area_clause(wiql: &mut String, area_path: &str) {
    if !area_path.is_empty() {
        wiql.push_str(&format!(" AND [System.AreaPath] UNDER {}", quote(area_path)));
    }
}
