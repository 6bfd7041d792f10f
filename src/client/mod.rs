//! Synchronous client for the work-tracking REST API.

pub mod error;
pub mod links;
pub mod planning;
pub mod query;
pub mod relations;
pub mod transport;

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::{Value, json};

use crate::model::{
    Comment, Credentials, Hyperlink, ItemEdit, Iteration, LinkDirection, NewWorkItem,
    PlanningField, REL_CHILD, REL_HYPERLINK, REL_PARENT, Related, WorkItem,
};

pub use error::ClientError;
pub use query::{ItemQuery, Page, PageRequest};
pub use transport::{HttpRequest, HttpResponse, Method, Transport, UreqTransport};

use planning::TypeField;
use transport::{JSON, JSON_PATCH};

const API_VERSION: &str = "api-version=7.0";
const COMMENTS_API_VERSION: &str = "api-version=7.0-preview.3";

#[derive(Deserialize)]
struct ListResponse<T> {
    #[serde(default = "Vec::new")]
    value: Vec<T>,
}

#[derive(Deserialize)]
struct WiqlResponse {
    #[serde(default, rename = "workItems")]
    work_items: Vec<WiqlRef>,
}

#[derive(Deserialize)]
struct WiqlRef {
    id: i64,
}

#[derive(Deserialize)]
struct CommentList {
    #[serde(default)]
    comments: Vec<Comment>,
}

#[derive(Deserialize)]
struct TypeName {
    name: String,
}

/// A connection to one organization/project. Cheap to clone; clones share
/// the transport.
#[derive(Clone)]
pub struct Client {
    organization: String,
    project: String,
    team: String,
    area_path: String,
    authorization: String,
    transport: Arc<dyn Transport>,
}

impl fmt::Debug for Client {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Client")
            .field("organization", &self.organization)
            .field("project", &self.project)
            .field("team", &self.team)
            .field("area_path", &self.area_path)
            .field("authorization", &"<redacted>")
            .finish_non_exhaustive()
    }
}

impl Client {
    pub fn new(credentials: &Credentials, transport: Arc<dyn Transport>) -> Self {
        let token = STANDARD.encode(format!(":{}", credentials.token));
        Client {
            organization: credentials.organization.clone(),
            project: credentials.project.clone(),
            team: credentials.team.clone(),
            area_path: credentials.area_path.clone(),
            authorization: format!("Basic {token}"),
            transport,
        }
    }

    pub fn connect(credentials: &Credentials) -> Self {
        Self::new(credentials, Arc::new(UreqTransport::new()))
    }

    pub fn base_url(&self) -> String {
        format!("https://dev.azure.com/{}/{}", self.organization, self.project)
    }

    /// Team-scoped URL, used for queries and team settings.
    pub fn team_url(&self) -> String {
        if self.team.is_empty() {
            self.base_url()
        } else {
            format!("{}/{}", self.base_url(), self.team)
        }
    }

    /// Browser URL of a work item.
    pub fn web_url(&self, id: i64) -> String {
        work_item_web_url(&self.organization, &self.project, id)
    }

    fn item_api_url(&self, id: i64) -> String {
        format!("{}/_apis/wit/workItems/{id}", self.base_url())
    }

    // ── transport helpers ───────────────────────────────────────────

    fn send(&self, request: HttpRequest, ok: &[u16]) -> Result<String, ClientError> {
        tracing::debug!(method = request.method.as_str(), url = %request.url, "request");
        let response = self.transport.send(&request, &self.authorization)?;
        if ok.contains(&response.status) {
            Ok(response.body)
        } else {
            tracing::warn!(status = response.status, url = %request.url, "request failed");
            Err(ClientError::api(response.status, &response.body))
        }
    }

    fn get_json<T: DeserializeOwned>(&self, url: String) -> Result<T, ClientError> {
        let body = self.send(HttpRequest::get(url), &[200])?;
        Ok(serde_json::from_str(&body)?)
    }

    fn post_json<T: DeserializeOwned>(&self, url: String, body: &Value) -> Result<T, ClientError> {
        let request = HttpRequest::with_body(Method::Post, url, JSON, body.to_string());
        let body = self.send(request, &[200, 201])?;
        Ok(serde_json::from_str(&body)?)
    }

    fn patch_item(&self, url: String, ops: &[Value]) -> Result<WorkItem, ClientError> {
        let request =
            HttpRequest::with_body(Method::Patch, url, JSON_PATCH, Value::from(ops.to_vec()).to_string());
        let body = self.send(request, &[200])?;
        Ok(serde_json::from_str(&body)?)
    }

    fn patch(&self, id: i64, ops: &[Value]) -> Result<WorkItem, ClientError> {
        let url = format!("{}?{API_VERSION}", self.item_api_url(id));
        self.patch_item(url, ops)
    }

    // ── connection ──────────────────────────────────────────────────

    /// Verify the credentials by reading the project record.
    pub fn test_connection(&self) -> Result<(), ClientError> {
        let url = format!(
            "https://dev.azure.com/{}/_apis/projects/{}?{API_VERSION}",
            self.organization, self.project
        );
        self.send(HttpRequest::get(url), &[200]).map(|_| ())
    }

    // ── queries ─────────────────────────────────────────────────────

    /// Run a WIQL query and return matching IDs, at most `top` when given.
    pub fn query_ids(&self, wiql: &str, top: Option<usize>) -> Result<Vec<i64>, ClientError> {
        let mut url = format!("{}/_apis/wit/wiql?{API_VERSION}", self.team_url());
        if let Some(top) = top {
            url.push_str(&format!("&$top={top}"));
        }
        let response: WiqlResponse = self.post_json(url, &json!({ "query": wiql }))?;
        Ok(response.work_items.into_iter().map(|r| r.id).collect())
    }

    /// Fetch full records with relations, in batches.
    pub fn items_by_ids(&self, ids: &[i64]) -> Result<Vec<WorkItem>, ClientError> {
        let mut items = Vec::with_capacity(ids.len());
        for chunk in ids.chunks(query::BATCH_SIZE) {
            let joined = chunk
                .iter()
                .map(i64::to_string)
                .collect::<Vec<_>>()
                .join(",");
            let url = format!(
                "{}/_apis/wit/workitems?ids={joined}&$expand=relations&{API_VERSION}",
                self.base_url()
            );
            let response: ListResponse<WorkItem> = self.get_json(url)?;
            items.extend(response.value);
        }
        Ok(items)
    }

    /// One page of the board listing. The query endpoint only caps results,
    /// so enough IDs are requested to cover the page and sliced locally.
    pub fn list_items(
        &self,
        query: &ItemQuery,
        page: PageRequest,
    ) -> Result<Page<WorkItem>, ClientError> {
        let wiql = query::list_query(&self.project, &self.area_path, query);
        let ids = self.query_ids(&wiql, Some(page.fetch_count()))?;
        let slice = page.slice(&ids);
        if slice.is_empty() {
            return Ok(Page::default());
        }
        let items = self.items_by_ids(slice)?;
        Ok(Page {
            has_more: page.has_more(items.len()),
            items,
        })
    }

    pub fn get_item(&self, id: i64) -> Result<WorkItem, ClientError> {
        let url = format!(
            "{}/_apis/wit/workitems/{id}?$expand=relations&{API_VERSION}",
            self.base_url()
        );
        self.get_json(url)
    }

    /// Items assigned to `assignee` that someone else changed within the window.
    pub fn recently_changed(
        &self,
        assignee: &str,
        window: Duration,
    ) -> Result<Vec<WorkItem>, ClientError> {
        let window = chrono::Duration::from_std(window)
            .unwrap_or_else(|_| chrono::Duration::minutes(5));
        self.recently_changed_since(assignee, Utc::now() - window)
    }

    pub fn recently_changed_since(
        &self,
        assignee: &str,
        since: DateTime<Utc>,
    ) -> Result<Vec<WorkItem>, ClientError> {
        if assignee.is_empty() {
            return Ok(Vec::new());
        }
        let wiql = query::recent_changes_query(&self.project, &self.area_path, assignee, since);
        let url = format!(
            "{}/_apis/wit/wiql?{API_VERSION}&timePrecision=true",
            self.team_url()
        );
        let response: WiqlResponse = self.post_json(url, &json!({ "query": wiql }))?;
        let ids: Vec<i64> = response.work_items.into_iter().map(|r| r.id).collect();
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        self.items_by_ids(&ids)
    }

    pub fn work_item_types(&self) -> Result<Vec<String>, ClientError> {
        let url = format!("{}/_apis/wit/workitemtypes?{API_VERSION}", self.base_url());
        let response: ListResponse<TypeName> = self.get_json(url)?;
        Ok(response.value.into_iter().map(|t| t.name).collect())
    }

    // ── create / update / delete ────────────────────────────────────

    fn creation_ops(&self, new: &NewWorkItem) -> Vec<Value> {
        let mut ops = vec![add_field("System.Title", json!(new.title))];
        if !new.description.is_empty() {
            ops.push(add_field("System.Description", json!(new.description)));
        }
        if new.priority > 0 {
            ops.push(add_field("Microsoft.VSTS.Common.Priority", json!(new.priority)));
        }
        if !self.area_path.is_empty() {
            ops.push(add_field("System.AreaPath", json!(self.area_path)));
        }
        if !new.assigned_to.is_empty() {
            ops.push(add_field("System.AssignedTo", json!(new.assigned_to)));
        }
        ops
    }

    fn post_creation(&self, work_item_type: &str, ops: &[Value]) -> Result<WorkItem, ClientError> {
        let url = format!(
            "{}/_apis/wit/workitems/${}?{API_VERSION}",
            self.base_url(),
            urlencoding::encode(work_item_type)
        );
        let request = HttpRequest::with_body(
            Method::Post,
            url,
            JSON_PATCH,
            Value::from(ops.to_vec()).to_string(),
        );
        let body = self.send(request, &[200, 201])?;
        Ok(serde_json::from_str(&body)?)
    }

    pub fn create_item(&self, new: &NewWorkItem) -> Result<WorkItem, ClientError> {
        self.post_creation(&new.work_item_type, &self.creation_ops(new))
    }

    /// Create an item as a child of `parent_id`, with the link embedded in the
    /// creation request.
    pub fn create_item_with_parent(
        &self,
        new: &NewWorkItem,
        parent_id: i64,
    ) -> Result<WorkItem, ClientError> {
        let mut ops = self.creation_ops(new);
        ops.push(add_relation(REL_PARENT, &self.item_api_url(parent_id), None));
        self.post_creation(&new.work_item_type, &ops)
    }

    /// Create an item, then make `child_id` its child.
    pub fn create_parent_of(
        &self,
        new: &NewWorkItem,
        child_id: i64,
    ) -> Result<WorkItem, ClientError> {
        let created = self.create_item(new)?;
        self.add_child_link(created.id, child_id)
    }

    /// Add a forward hierarchy link from `parent_id` to `child_id`.
    pub fn add_child_link(&self, parent_id: i64, child_id: i64) -> Result<WorkItem, ClientError> {
        let op = add_relation(REL_CHILD, &self.item_api_url(child_id), None);
        self.patch(parent_id, &[op])
    }

    pub fn update_item(&self, id: i64, edit: &ItemEdit) -> Result<WorkItem, ClientError> {
        let mut ops = Vec::new();
        if !edit.title.is_empty() {
            ops.push(replace_field("System.Title", json!(edit.title)));
        }
        if !edit.state.is_empty() {
            ops.push(replace_field("System.State", json!(edit.state)));
        }
        ops.push(replace_field("System.AssignedTo", json!(edit.assigned_to)));
        ops.push(replace_field("System.Tags", json!(edit.tags)));
        self.patch(id, &ops)
    }

    pub fn delete_item(&self, id: i64) -> Result<(), ClientError> {
        let url = format!("{}/_apis/wit/workitems/{id}?{API_VERSION}", self.base_url());
        self.send(HttpRequest::delete(url), &[200, 204]).map(|_| ())
    }

    // ── relations ───────────────────────────────────────────────────

    /// Remove the relation at `index`. Indices shift after every removal.
    pub fn remove_relation(&self, id: i64, index: usize) -> Result<WorkItem, ClientError> {
        let op = json!({ "op": "remove", "path": format!("/relations/{index}") });
        self.patch(id, &[op])
    }

    /// Remove the hierarchy link from `item_id` to `target_id`.
    ///
    /// Relations are re-read first and removed by position. There is no
    /// compare-and-swap: a concurrent edit between the read and the patch can
    /// shift positions and remove the wrong link.
    pub fn find_and_remove_relation(
        &self,
        item_id: i64,
        target_id: i64,
        direction: LinkDirection,
    ) -> Result<WorkItem, ClientError> {
        let item = self.get_item(item_id)?;
        let index = relations::find_hierarchy_link(&item.relations, target_id, direction)
            .ok_or_else(|| ClientError::NotFound("relation not found".into()))?;
        self.remove_relation(item_id, index)
    }

    /// Parent and children with their own fields. Failures fetching the linked
    /// items leave them out rather than failing the whole call.
    pub fn related_items(&self, id: i64) -> Result<Related, ClientError> {
        let item = self.get_item(id)?;
        let (parent_id, child_ids) = relations::hierarchy_ids(&item.relations);

        let parent = parent_id.and_then(|pid| match self.get_item(pid) {
            Ok(parent) => Some(parent),
            Err(e) => {
                tracing::warn!(id = pid, error = %e, "could not fetch parent");
                None
            }
        });
        let children = if child_ids.is_empty() {
            Vec::new()
        } else {
            self.items_by_ids(&child_ids).unwrap_or_else(|e| {
                tracing::warn!(id, error = %e, "could not fetch children");
                Vec::new()
            })
        };
        Ok(Related { parent, children })
    }

    // ── comments ────────────────────────────────────────────────────

    pub fn comments(&self, id: i64) -> Result<Vec<Comment>, ClientError> {
        let url = format!(
            "{}/_apis/wit/workitems/{id}/comments?{COMMENTS_API_VERSION}",
            self.base_url()
        );
        let list: CommentList = self.get_json(url)?;
        Ok(list.comments)
    }

    pub fn add_comment(&self, id: i64, text: &str) -> Result<Comment, ClientError> {
        let url = format!(
            "{}/_apis/wit/workitems/{id}/comments?{COMMENTS_API_VERSION}",
            self.base_url()
        );
        self.post_json(url, &json!({ "text": text }))
    }

    // ── iterations ──────────────────────────────────────────────────

    pub fn iterations(&self) -> Result<Vec<Iteration>, ClientError> {
        let url = format!(
            "{}/_apis/work/teamsettings/iterations?{API_VERSION}",
            self.team_url()
        );
        let response: ListResponse<Iteration> = self.get_json(url)?;
        Ok(response.value)
    }

    pub fn update_iteration(&self, id: i64, path: &str) -> Result<WorkItem, ClientError> {
        self.patch(id, &[replace_field("System.IterationPath", json!(path))])
    }

    // ── planning ────────────────────────────────────────────────────

    pub fn type_fields(&self, work_item_type: &str) -> Result<Vec<TypeField>, ClientError> {
        let url = format!(
            "{}/_apis/wit/workitemtypes/{}/fields?{API_VERSION}",
            self.base_url(),
            urlencoding::encode(work_item_type)
        );
        let response: ListResponse<TypeField> = self.get_json(url)?;
        Ok(response.value)
    }

    /// Writable scheduling fields available on a work item type.
    pub fn discover_planning_fields(
        &self,
        work_item_type: &str,
    ) -> Result<Vec<PlanningField>, ClientError> {
        Ok(planning::select_planning_fields(&self.type_fields(work_item_type)?))
    }

    pub fn update_planning(
        &self,
        id: i64,
        values: &IndexMap<String, f64>,
    ) -> Result<WorkItem, ClientError> {
        if values.is_empty() {
            return Err(ClientError::Validation("no planning updates specified".into()));
        }
        let ops: Vec<Value> = values
            .iter()
            .map(|(field, value)| add_field(field, json!(value)))
            .collect();
        self.patch(id, &ops)
    }

    // ── hyperlinks ──────────────────────────────────────────────────

    pub fn hyperlinks(&self, id: i64) -> Result<Vec<Hyperlink>, ClientError> {
        Ok(relations::hyperlinks(&self.get_item(id)?.relations))
    }

    pub fn add_hyperlink(&self, id: i64, url: &str, comment: &str) -> Result<WorkItem, ClientError> {
        links::validate_hyperlink(url, comment)?;
        let attributes = (!comment.is_empty()).then(|| json!({ "comment": comment }));
        self.patch(id, &[add_relation(REL_HYPERLINK, url.trim(), attributes)])
    }

    /// Remove the hyperlink with exactly this URL.
    pub fn remove_hyperlink(&self, id: i64, url: &str) -> Result<WorkItem, ClientError> {
        let item = self.get_item(id)?;
        let index = relations::find_hyperlink(&item.relations, url).ok_or_else(|| {
            ClientError::NotFound(format!("hyperlink {url} not found in work item {id}"))
        })?;
        self.remove_relation(id, index)
    }
}

/// Browser URL of a work item, without needing a client.
pub fn work_item_web_url(organization: &str, project: &str, id: i64) -> String {
    format!("https://dev.azure.com/{organization}/{project}/_workitems/edit/{id}")
}

fn add_field(name: &str, value: Value) -> Value {
    json!({ "op": "add", "path": format!("/fields/{name}"), "value": value })
}

fn replace_field(name: &str, value: Value) -> Value {
    json!({ "op": "replace", "path": format!("/fields/{name}"), "value": value })
}

fn add_relation(rel: &str, url: &str, attributes: Option<Value>) -> Value {
    let mut value = json!({ "rel": rel, "url": url });
    if let Some(attributes) = attributes {
        value["attributes"] = attributes;
    }
    json!({ "op": "add", "path": "/relations/-", "value": value })
}
