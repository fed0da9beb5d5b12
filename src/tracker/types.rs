use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A Jira issue as returned by the search endpoint.
///
/// Custom fields are kept as raw JSON under their tracker id and read through
/// [`super::fields::FieldMap`], so column code never names an opaque id.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Issue {
    /// Issue key (e.g., "RVS-1234")
    pub key: String,
    pub fields: IssueFields,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct IssueFields {
    #[serde(default)]
    pub summary: String,
    pub status: Option<Status>,
    /// Due date as `YYYY-MM-DD`
    pub duedate: Option<String>,
    /// Creation timestamp (e.g., "2023-05-01T10:00:00.000+0000")
    pub created: Option<String>,
    pub updated: Option<String>,
    #[serde(default)]
    pub labels: Vec<String>,
    #[serde(default)]
    pub subtasks: Vec<SubIssue>,
    #[serde(default)]
    pub issuelinks: Vec<IssueLink>,
    /// Every other field, keyed by tracker id (e.g., "customfield_10402")
    #[serde(flatten)]
    pub custom: HashMap<String, Value>,
}

impl IssueFields {
    /// Status name, or an empty string when the tracker omitted it.
    pub fn status_name(&self) -> &str {
        self.status.as_ref().map_or("", |s| s.name.as_str())
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Status {
    pub name: String,
}

/// A sub-task or linked issue; only key, summary and status are used.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubIssue {
    pub key: String,
    #[serde(default)]
    pub fields: SubIssueFields,
}

impl SubIssue {
    pub fn status_name(&self) -> &str {
        self.fields
            .status
            .as_ref()
            .map_or("", |s| s.name.as_str())
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SubIssueFields {
    #[serde(default)]
    pub summary: String,
    pub status: Option<Status>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IssueLink {
    pub outward_issue: Option<SubIssue>,
    pub inward_issue: Option<SubIssue>,
}

/// One page of `/rest/api/2/search`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchPage {
    #[serde(default)]
    pub start_at: usize,
    #[serde(default)]
    pub total: usize,
    #[serde(default)]
    pub issues: Vec<Issue>,
}

/// Entry of `/rest/api/2/field`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FieldInfo {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub custom: bool,
}
