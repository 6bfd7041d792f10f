use serde::{Deserialize, Serialize};

/// Relation tag pointing from a child to its parent.
pub const REL_PARENT: &str = "System.LinkTypes.Hierarchy-Reverse";
/// Relation tag pointing from a parent to one of its children.
pub const REL_CHILD: &str = "System.LinkTypes.Hierarchy-Forward";
pub const REL_HYPERLINK: &str = "Hyperlink";
pub const REL_ARTIFACT: &str = "ArtifactLink";

/// A work item as returned by the batched fetch endpoint.
///
/// `rev` increases by at least one on every successful mutation; the change
/// watcher relies on `new_rev > known_rev` as its only change signal.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct WorkItem {
    pub id: i64,
    #[serde(default)]
    pub rev: i64,
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub fields: WorkItemFields,
    #[serde(default)]
    pub relations: Vec<Relation>,
}

impl WorkItem {
    pub fn title(&self) -> &str {
        &self.fields.title
    }

    pub fn assignee_name(&self) -> &str {
        self.fields
            .assigned_to
            .as_ref()
            .map_or("", |who| who.display_name.as_str())
    }

    /// Current value of a scheduling field by its reference name.
    pub fn planning_value(&self, reference_name: &str) -> Option<f64> {
        let f = &self.fields;
        match reference_name {
            "Microsoft.VSTS.Scheduling.StoryPoints" => f.story_points,
            "Microsoft.VSTS.Scheduling.OriginalEstimate" => f.original_estimate,
            "Microsoft.VSTS.Scheduling.RemainingWork" => f.remaining_work,
            "Microsoft.VSTS.Scheduling.CompletedWork" => f.completed_work,
            "Microsoft.VSTS.Scheduling.Effort" => f.effort,
            _ => None,
        }
    }
}

/// The field bag of a work item. Unknown fields are ignored.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct WorkItemFields {
    #[serde(rename = "System.Title", default)]
    pub title: String,
    #[serde(rename = "System.State", default)]
    pub state: String,
    #[serde(rename = "System.WorkItemType", default)]
    pub work_item_type: String,
    #[serde(rename = "System.AssignedTo", default, skip_serializing_if = "Option::is_none")]
    pub assigned_to: Option<IdentityRef>,
    #[serde(rename = "System.Description", default)]
    pub description: String,
    #[serde(rename = "System.AreaPath", default)]
    pub area_path: String,
    #[serde(rename = "System.IterationPath", default)]
    pub iteration_path: String,
    #[serde(rename = "Microsoft.VSTS.Common.Priority", default)]
    pub priority: i64,
    #[serde(rename = "System.Tags", default)]
    pub tags: String,
    #[serde(rename = "System.CommentCount", default)]
    pub comment_count: i64,
    #[serde(rename = "System.ChangedDate", default)]
    pub changed_date: String,
    #[serde(rename = "System.ChangedBy", default, skip_serializing_if = "Option::is_none")]
    pub changed_by: Option<IdentityRef>,
    #[serde(rename = "Microsoft.VSTS.Scheduling.StoryPoints", default, skip_serializing_if = "Option::is_none")]
    pub story_points: Option<f64>,
    #[serde(rename = "Microsoft.VSTS.Scheduling.OriginalEstimate", default, skip_serializing_if = "Option::is_none")]
    pub original_estimate: Option<f64>,
    #[serde(rename = "Microsoft.VSTS.Scheduling.RemainingWork", default, skip_serializing_if = "Option::is_none")]
    pub remaining_work: Option<f64>,
    #[serde(rename = "Microsoft.VSTS.Scheduling.CompletedWork", default, skip_serializing_if = "Option::is_none")]
    pub completed_work: Option<f64>,
    #[serde(rename = "Microsoft.VSTS.Scheduling.Effort", default, skip_serializing_if = "Option::is_none")]
    pub effort: Option<f64>,
}

/// A user reference embedded in fields and comments.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IdentityRef {
    #[serde(default)]
    pub display_name: String,
    #[serde(default)]
    pub unique_name: String,
}

/// Classification of a relation's type tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RelationKind {
    Parent,
    Child,
    Hyperlink,
    Artifact,
    Other,
}

/// A typed, directed link from one work item to a target URL.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Relation {
    pub rel: String,
    pub url: String,
    #[serde(default)]
    pub attributes: serde_json::Map<String, serde_json::Value>,
}

impl Relation {
    pub fn kind(&self) -> RelationKind {
        match self.rel.as_str() {
            REL_PARENT => RelationKind::Parent,
            REL_CHILD => RelationKind::Child,
            REL_HYPERLINK => RelationKind::Hyperlink,
            REL_ARTIFACT => RelationKind::Artifact,
            _ => RelationKind::Other,
        }
    }

    /// The work item ID in the URL's trailing path segment, if numeric.
    pub fn target_id(&self) -> Option<i64> {
        work_item_id_from_url(&self.url)
    }

    /// A string attribute such as `name` or `comment`, empty when absent.
    pub fn attribute(&self, key: &str) -> &str {
        self.attributes
            .get(key)
            .and_then(|v| v.as_str())
            .unwrap_or("")
    }
}

/// Parse the trailing path segment of a work item URL as an ID.
pub fn work_item_id_from_url(url: &str) -> Option<i64> {
    let segment = url.trim_end_matches('/').rsplit('/').next()?;
    segment.parse().ok()
}

/// Direction of a hierarchy link, relative to the item holding it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkDirection {
    /// The target is this item's parent.
    Parent,
    /// The target is one of this item's children.
    Child,
}

impl LinkDirection {
    pub fn rel_type(self) -> &'static str {
        match self {
            LinkDirection::Parent => REL_PARENT,
            LinkDirection::Child => REL_CHILD,
        }
    }
}

/// A comment on a work item. Bodies are rich text (HTML).
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    #[serde(default)]
    pub id: i64,
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub created_by: IdentityRef,
    #[serde(default)]
    pub created_date: String,
}

/// A named time-box in the team's schedule.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Iteration {
    #[serde(default)]
    pub id: String,
    pub name: String,
    pub path: String,
    #[serde(default)]
    pub attributes: Option<IterationAttributes>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IterationAttributes {
    #[serde(default)]
    pub start_date: Option<String>,
    #[serde(default)]
    pub finish_date: Option<String>,
    #[serde(default)]
    pub time_frame: String,
}

/// A numeric scheduling field available on a work item type.
#[derive(Debug, Clone, PartialEq)]
pub struct PlanningField {
    pub reference_name: String,
    pub display_name: String,
    pub value: Option<f64>,
}

/// An external link attached to a work item.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Hyperlink {
    pub url: String,
    pub name: String,
    pub comment: String,
}

/// Parent and children of a work item, fetched with their own fields.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Related {
    pub parent: Option<WorkItem>,
    pub children: Vec<WorkItem>,
}

impl Related {
    /// Flattened view used by the related-items cursor: parent first.
    pub fn entries(&self) -> Vec<(LinkDirection, &WorkItem)> {
        let mut out = Vec::with_capacity(self.children.len() + 1);
        if let Some(parent) = &self.parent {
            out.push((LinkDirection::Parent, parent));
        }
        out.extend(self.children.iter().map(|c| (LinkDirection::Child, c)));
        out
    }

    pub fn len(&self) -> usize {
        self.children.len() + usize::from(self.parent.is_some())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Input for creating a work item.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct NewWorkItem {
    pub work_item_type: String,
    pub title: String,
    pub description: String,
    /// Zero means unset.
    pub priority: i64,
    pub assigned_to: String,
}

/// The editable fields of the Detail screen.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ItemEdit {
    pub title: String,
    pub state: String,
    pub assigned_to: String,
    pub tags: String,
}
