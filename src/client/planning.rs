use serde::Deserialize;

use crate::model::{PlanningField, WorkItem};

const SCHEDULING_PREFIX: &str = "Microsoft.VSTS.Scheduling.";

/// Scheduling fields surfaced in the planning editor, in display order.
pub const PLANNING_FIELDS: [(&str, &str); 5] = [
    ("StoryPoints", "Story Points"),
    ("OriginalEstimate", "Original Estimate (hours)"),
    ("RemainingWork", "Remaining Work (hours)"),
    ("CompletedWork", "Completed Work (hours)"),
    ("Effort", "Effort"),
];

/// One entry of a work item type's field schema.
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TypeField {
    pub reference_name: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub always_required: bool,
    #[serde(default)]
    pub read_only: bool,
}

/// Keep the writable allow-listed fields, ordered as in `PLANNING_FIELDS`.
pub fn select_planning_fields(schema: &[TypeField]) -> Vec<PlanningField> {
    PLANNING_FIELDS
        .iter()
        .filter_map(|(suffix, display)| {
            let reference = format!("{SCHEDULING_PREFIX}{suffix}");
            schema
                .iter()
                .find(|f| f.reference_name == reference && !f.read_only)
                .map(|_| PlanningField {
                    reference_name: reference,
                    display_name: (*display).to_string(),
                    value: None,
                })
        })
        .collect()
}

/// Copy the item's current values into a discovered field list.
pub fn with_current_values(fields: &[PlanningField], item: &WorkItem) -> Vec<PlanningField> {
    fields
        .iter()
        .map(|f| PlanningField {
            value: item.planning_value(&f.reference_name),
            ..f.clone()
        })
        .collect()
}
