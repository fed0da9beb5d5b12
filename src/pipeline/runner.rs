use chrono::{NaiveDateTime, Utc};
use log::{info, warn};

use crate::config::PipelineSettings;
use crate::error::Result;
use crate::output::PhaseProgress;
use crate::report::{PublishStatus, RunReport};
use crate::sheets::client::SheetsClient;
use crate::sheets::range::range_name;
use crate::tracker::{FieldMap, JiraClient};

use super::staging::{read_rows, write_table};
use super::{PipelineKind, Table};

/// Where the staged block is uploaded.
pub struct Publisher {
    pub sheets: SheetsClient,
    pub spreadsheet_id: String,
}

pub struct RunOptions {
    /// Reference time for every date derivation in the run
    pub now: NaiveDateTime,
    pub show_progress: bool,
}

/// Result of a run: the report plus the staged table for previews.
pub struct RunOutcome {
    pub report: RunReport,
    pub table: Table,
}

/// Query, Transform, Stage, Publish for one export variant.
pub struct PipelineRunner {
    kind: PipelineKind,
    settings: PipelineSettings,
    fields: FieldMap,
    jira: JiraClient,
    publisher: Option<Publisher>,
}

impl PipelineRunner {
    /// # Errors
    ///
    /// Returns [`crate::error::SyncError::Config`] when a custom field the
    /// variant reads has no tracker id.
    pub fn new(
        kind: PipelineKind,
        settings: PipelineSettings,
        fields: FieldMap,
        jira: JiraClient,
        publisher: Option<Publisher>,
    ) -> Result<Self> {
        fields.require(&kind.spec().required_fields())?;
        Ok(Self {
            kind,
            settings,
            fields,
            jira,
            publisher,
        })
    }

    /// Runs every phase in order. Any failure aborts the run; a failure
    /// after staging leaves the staging file in place.
    ///
    /// # Errors
    ///
    /// Propagates the first tracker, transform, staging or publish error.
    pub async fn run(&self, options: &RunOptions) -> Result<RunOutcome> {
        let spec = self.kind.spec();
        info!(
            "Running {} export for project {} into sheet {}",
            self.kind, self.settings.project, self.settings.sheet
        );

        let progress = PhaseProgress::start(
            options.show_progress,
            format!("Querying Jira project {}", self.settings.project),
        );
        let issues = self.jira.search_all(&self.settings.jql).await?;
        if issues.is_empty() {
            warn!("No issues matched: {}", self.settings.jql);
        }

        let progress = progress.advance(
            format!("Fetched {} issues", issues.len()),
            "Building rows",
        );
        let table = spec.assemble(
            &issues,
            &self.fields,
            &self.jira.browse_base(),
            options.now,
        )?;
        info!(
            "Built {} rows from {} issues",
            table.rows.len(),
            issues.len()
        );

        let staging_file = &self.settings.staging_file;
        let progress = progress.advance(
            format!("Built {} rows", table.rows.len()),
            format!("Writing {}", staging_file.display()),
        );
        write_table(staging_file, &table)?;
        let values = read_rows(staging_file)?;
        let range = range_name(&self.settings.sheet, &values);

        let publish = if let Some(publisher) = &self.publisher {
            let progress = progress.advance(
                format!("Staged {} rows", values.len()),
                format!("Updating {range}"),
            );
            let summary = publisher
                .sheets
                .update_values(&publisher.spreadsheet_id, &range, &values)
                .await?;
            progress.finish(format!(
                "Updated {} rows x {} columns",
                summary.updated_rows, summary.updated_columns
            ));
            PublishStatus::Published {
                updated_range: summary.updated_range,
                updated_rows: summary.updated_rows,
                updated_columns: summary.updated_columns,
                updated_cells: summary.updated_cells,
            }
        } else {
            info!("Dry run: {range} not published");
            progress
                .advance(format!("Staged {} rows", values.len()), "Publishing")
                .skip("dry run");
            PublishStatus::Skipped
        };

        let report = RunReport {
            pipeline: self.kind,
            project: self.settings.project.clone(),
            jql: self.settings.jql.clone(),
            sheet: self.settings.sheet.clone(),
            completed_at: Utc::now(),
            issues_fetched: issues.len(),
            rows_written: table.rows.len(),
            columns: table.header.len(),
            staging_file: staging_file.display().to_string(),
            range,
            publish,
        };

        Ok(RunOutcome { report, table })
    }
}
