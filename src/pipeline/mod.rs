//! Declarative row assembly shared by every export variant.
//!
//! A variant is an ordered list of [`Column`]s plus an acceptance rule. Each
//! accepted issue becomes one row, computed independently of every other row.

mod columns;
pub mod runner;
pub mod staging;

use std::fmt;

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::error::{Result, SyncError};
use crate::tracker::fields::parse_date;
use crate::tracker::links::browse_url;
use crate::tracker::{Field, FieldMap, Issue};

pub use runner::{PipelineRunner, RunOptions};

/// The export variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PipelineKind {
    /// Specifications with lifecycle derivations
    Specs,
    /// Specifications with the reduced column set
    SpecsBasic,
    /// Working groups
    Groups,
}

impl PipelineKind {
    pub fn spec(self) -> &'static PipelineSpec {
        match self {
            Self::Specs => &columns::SPECS,
            Self::SpecsBasic => &columns::SPECS_BASIC,
            Self::Groups => &columns::GROUPS,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Specs => "specs",
            Self::SpecsBasic => "specs-basic",
            Self::Groups => "groups",
        }
    }
}

impl fmt::Display for PipelineKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Which issues a variant turns into rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Acceptance {
    /// Only issues with at least one sub-task
    WithSubtasks,
    /// Only issues without any sub-task
    WithoutSubtasks,
}

impl Acceptance {
    pub fn accepts(self, issue: &Issue) -> bool {
        let has_subtasks = !issue.fields.subtasks.is_empty();
        match self {
            Self::WithSubtasks => has_subtasks,
            Self::WithoutSubtasks => !has_subtasks,
        }
    }
}

pub type CellFn = fn(&RowContext<'_>) -> Result<String>;

/// How a column obtains its cell.
#[derive(Clone, Copy)]
pub enum Source {
    /// Custom field value rendered as text
    Custom(Field),
    /// Value computed from the issue
    Derived(CellFn),
}

#[derive(Clone, Copy)]
pub struct Column {
    pub header: &'static str,
    pub source: Source,
}

impl Column {
    pub const fn custom(header: &'static str, field: Field) -> Self {
        Self {
            header,
            source: Source::Custom(field),
        }
    }

    pub const fn derived(header: &'static str, cell: CellFn) -> Self {
        Self {
            header,
            source: Source::Derived(cell),
        }
    }

    fn cell(&self, ctx: &RowContext<'_>) -> Result<String> {
        match self.source {
            Source::Custom(field) => Ok(ctx.text(field)),
            Source::Derived(cell) => cell(ctx),
        }
    }
}

/// A complete export variant.
pub struct PipelineSpec {
    pub accepts: Acceptance,
    pub columns: &'static [Column],
    /// Fields read by derived columns
    pub derived_fields: &'static [Field],
}

impl PipelineSpec {
    pub fn header(&self) -> Vec<String> {
        self.columns.iter().map(|c| c.header.to_string()).collect()
    }

    /// Every custom field this variant reads.
    pub fn required_fields(&self) -> Vec<Field> {
        let mut fields: Vec<Field> = self
            .columns
            .iter()
            .filter_map(|column| match column.source {
                Source::Custom(field) => Some(field),
                Source::Derived(_) => None,
            })
            .collect();
        for field in self.derived_fields {
            if !fields.contains(field) {
                fields.push(*field);
            }
        }
        fields
    }

    /// Builds the output table for `issues`, in tracker order.
    ///
    /// # Errors
    ///
    /// Fails on the first row that cannot be assembled, such as a status
    /// outside the known phase tables.
    pub fn assemble(
        &self,
        issues: &[Issue],
        fields: &FieldMap,
        browse_base: &str,
        now: NaiveDateTime,
    ) -> Result<Table> {
        let header = self.header();
        let rows = issues
            .iter()
            .filter(|issue| self.accepts.accepts(issue))
            .map(|issue| {
                let ctx = RowContext {
                    issue,
                    fields,
                    browse_base,
                    now,
                };
                self.columns
                    .iter()
                    .map(|column| column.cell(&ctx))
                    .collect::<Result<Vec<String>>>()
            })
            .collect::<Result<Vec<Vec<String>>>>()?;

        debug_assert!(rows.iter().all(|row| row.len() == header.len()));
        Ok(Table { header, rows })
    }
}

/// Header plus one row per accepted issue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Table {
    pub header: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

/// Everything a column needs to compute the cell for one issue.
pub struct RowContext<'a> {
    pub issue: &'a Issue,
    pub fields: &'a FieldMap,
    pub browse_base: &'a str,
    pub now: NaiveDateTime,
}

impl RowContext<'_> {
    pub fn today(&self) -> NaiveDate {
        self.now.date()
    }

    pub fn issue_url(&self) -> String {
        browse_url(self.browse_base, &self.issue.key)
    }

    pub fn text(&self, field: Field) -> String {
        self.fields.text(self.issue, field)
    }

    pub fn options(&self, field: Field) -> Option<Vec<String>> {
        self.fields.options(self.issue, field)
    }

    pub fn date(&self, field: Field) -> Result<Option<NaiveDate>> {
        self.fields.date(self.issue, field)
    }

    pub fn status(&self) -> &str {
        self.issue.fields.status_name()
    }

    /// # Errors
    ///
    /// Returns [`SyncError::InvalidDate`] for a due date that is not
    /// `YYYY-MM-DD`.
    pub fn due_date(&self) -> Result<Option<NaiveDate>> {
        match self.issue.fields.duedate.as_deref() {
            None => Ok(None),
            Some(raw) => parse_date(raw)
                .map(Some)
                .ok_or_else(|| SyncError::InvalidDate {
                    field: "duedate".to_string(),
                    value: raw.to_string(),
                }),
        }
    }
}
