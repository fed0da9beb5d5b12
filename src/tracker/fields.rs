use chrono::NaiveDate;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{Result, SyncError};
use crate::transform::values::join_option_values;

use super::types::Issue;

/// Stable domain names for the tracker's custom fields.
///
/// The tracker addresses these by opaque ids such as `customfield_10402`;
/// the mapping lives in configuration and is resolved once per run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Field {
    IsFastTrack,
    IsaOrNonIsa,
    GroupsIo,
    #[serde(rename = "github")]
    GitHub,
    GoverningCommittee,
    PublicReview,
    BoardReviewPlannedApproval,
    GroupCharter,
    GroupType,
    DottedLineGoverningCommittee,
    GroupLifecycleStartingDate,
    CreationDate,
    DisbandingDate,
    Chair,
    ChairStartingDate,
    ChairEndDate,
    ViceChair,
    ViceChairStartingDate,
    ViceChairEndDate,
    ActingChair,
    ActingViceChair,
}

const DEFAULT_FIELD_IDS: &[(Field, &str)] = &[
    (Field::IsFastTrack, "customfield_10406"),
    (Field::IsaOrNonIsa, "customfield_10440"),
    (Field::GroupsIo, "customfield_10507"),
    (Field::GitHub, "customfield_10401"),
    (Field::GoverningCommittee, "customfield_10402"),
    (Field::PublicReview, "customfield_10508"),
    (Field::BoardReviewPlannedApproval, "customfield_10451"),
    (Field::GroupCharter, "customfield_10524"),
    (Field::GroupType, "customfield_10515"),
    (Field::DottedLineGoverningCommittee, "customfield_10516"),
    (Field::GroupLifecycleStartingDate, "customfield_10518"),
    (Field::CreationDate, "customfield_10514"),
    (Field::DisbandingDate, "customfield_10513"),
    (Field::Chair, "customfield_10511"),
    (Field::ChairStartingDate, "customfield_10519"),
    (Field::ChairEndDate, "customfield_10520"),
    (Field::ViceChair, "customfield_10512"),
    (Field::ViceChairStartingDate, "customfield_10521"),
    (Field::ViceChairEndDate, "customfield_10522"),
    (Field::ActingChair, "customfield_10509"),
    (Field::ActingViceChair, "customfield_10510"),
];

/// Domain field name to tracker field id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldMap {
    ids: IndexMap<Field, String>,
}

impl Default for FieldMap {
    fn default() -> Self {
        Self {
            ids: DEFAULT_FIELD_IDS
                .iter()
                .map(|(field, id)| (*field, (*id).to_string()))
                .collect(),
        }
    }
}

impl FieldMap {
    /// Built-in ids with `overrides` applied on top.
    ///
    /// An empty id in `overrides` removes the mapping, which makes any
    /// pipeline that needs the field fail at startup.
    pub fn with_overrides(overrides: &IndexMap<Field, String>) -> Self {
        let mut map = Self::default();
        for (field, id) in overrides {
            if id.trim().is_empty() {
                map.ids.shift_remove(field);
            } else {
                map.ids.insert(*field, id.trim().to_string());
            }
        }
        map
    }

    pub fn id(&self, field: Field) -> Option<&str> {
        self.ids.get(&field).map(String::as_str)
    }

    /// Domain field mapped to a tracker id, if any.
    pub fn field_for_id(&self, id: &str) -> Option<Field> {
        self.ids
            .iter()
            .find(|(_, mapped)| mapped.as_str() == id)
            .map(|(field, _)| *field)
    }

    /// Verifies that every field in `required` has a tracker id.
    ///
    /// # Errors
    ///
    /// Returns a configuration error naming all unmapped fields.
    pub fn require(&self, required: &[Field]) -> Result<()> {
        let missing: Vec<String> = required
            .iter()
            .filter(|field| !self.ids.contains_key(*field))
            .map(|field| format!("{field:?}"))
            .collect();

        if missing.is_empty() {
            Ok(())
        } else {
            Err(SyncError::Config(format!(
                "no tracker field id mapped for: {}",
                missing.join(", ")
            )))
        }
    }

    /// Raw JSON value of a custom field; `None` when absent or null.
    pub fn value<'a>(&self, issue: &'a Issue, field: Field) -> Option<&'a Value> {
        let id = self.id(field)?;
        issue.fields.custom.get(id).filter(|v| !v.is_null())
    }

    /// Cell text for a custom field; absent fields render as an empty cell.
    pub fn text(&self, issue: &Issue, field: Field) -> String {
        self.value(issue, field).map(render_value).unwrap_or_default()
    }

    /// Display strings of a multi-select field.
    ///
    /// `None` when the field is absent; a single option yields one entry.
    pub fn options(&self, issue: &Issue, field: Field) -> Option<Vec<String>> {
        match self.value(issue, field)? {
            Value::Array(items) => Some(
                items
                    .iter()
                    .filter(|item| !item.is_null())
                    .map(render_value)
                    .collect(),
            ),
            other => Some(vec![render_value(other)]),
        }
    }

    /// Date-valued custom field.
    ///
    /// # Errors
    ///
    /// Returns [`SyncError::InvalidDate`] when the value is present but not a
    /// `YYYY-MM-DD` date.
    pub fn date(&self, issue: &Issue, field: Field) -> Result<Option<NaiveDate>> {
        let Some(value) = self.value(issue, field) else {
            return Ok(None);
        };
        let text = render_value(value);
        parse_date(&text)
            .map(Some)
            .ok_or_else(|| SyncError::InvalidDate {
                field: format!("{field:?}"),
                value: text,
            })
    }
}

/// Parses the date part of a tracker date or timestamp string.
pub fn parse_date(text: &str) -> Option<NaiveDate> {
    let date_part = text.split('T').next().unwrap_or(text);
    NaiveDate::parse_from_str(date_part.trim(), "%Y-%m-%d").ok()
}

/// Renders a custom field value as cell text.
///
/// Option and user objects render as their display value; lists go through
/// the multi-value formatter.
pub fn render_value(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Array(items) => {
            let names: Vec<String> = items
                .iter()
                .filter(|item| !item.is_null())
                .map(render_value)
                .collect();
            join_option_values(Some(names.as_slice()))
        }
        Value::Object(map) => ["value", "displayName", "name"]
            .iter()
            .find_map(|key| map.get(*key).and_then(Value::as_str))
            .map_or_else(|| value.to_string(), ToString::to_string),
    }
}
