use std::fmt::Write;

use crate::pipeline::Table;
use crate::report::{PublishStatus, RunReport};
use crate::tracker::types::FieldInfo;
use crate::tracker::FieldMap;
use crate::transform::dates::{DUE_DATE_NOT_SET, NO_END_DATE, NO_START_DATE};
use crate::transform::subtasks::NO_NEXT_SUBTASK;

use super::styling::{paint, Tone};
use super::tables::{create_table, cyan_header, preview_cell, sentinel_aware_cell};

const PREVIEW_COLUMNS: usize = 6;
const PREVIEW_CELL_CHARS: usize = 40;
const SENTINELS: &[&str] = &[DUE_DATE_NOT_SET, NO_START_DATE, NO_END_DATE, NO_NEXT_SUBTASK];

/// Prints the run overview and, when `preview_rows` is non-zero, the first
/// staged rows.
pub fn print_summary(report: &RunReport, table: &Table, preview_rows: usize) {
    println!("{}", render_summary(report));
    if preview_rows > 0 {
        println!("{}", render_preview(table, preview_rows));
    }
}

/// Prints the tracker's custom fields next to their configured domain names.
pub fn print_fields(fields: &[FieldInfo], map: &FieldMap) {
    println!("{}", render_fields(fields, map));
}

fn add_section_header(output: &mut String, emoji: &str, title: &str) {
    let _ = writeln!(
        output,
        "{} {}",
        paint(Tone::Heading, emoji),
        paint(Tone::Heading, title).underlined()
    );
}

fn render_summary(report: &RunReport) -> String {
    let mut output = String::new();

    add_section_header(&mut output, "📊", "Overview");

    let publish_line = match &report.publish {
        PublishStatus::Published {
            updated_range,
            updated_rows,
            updated_columns,
            updated_cells,
        } => paint(
            Tone::Done,
            format!(
                "{updated_cells} cells ({updated_rows} rows x {updated_columns} columns) in {updated_range}"
            ),
        ),
        PublishStatus::Skipped => paint(Tone::Pending, "skipped (dry run)".to_string()),
    };

    let _ = write!(
        output,
        "  {} {}\n  {} {}\n  {} {}\n  {} {}\n  {} {}\n  {} {}\n  {} {}\n  {} {}\n\n",
        paint(Tone::Muted, "Pipeline:"),
        paint(Tone::Value, report.pipeline),
        paint(Tone::Muted, "Project:"),
        paint(Tone::Value, &report.project),
        paint(Tone::Muted, "Issues fetched:"),
        paint(Tone::Pending, report.issues_fetched),
        paint(Tone::Muted, "Rows written:"),
        paint(Tone::Pending, report.rows_written),
        paint(Tone::Muted, "Skipped by sub-task rule:"),
        paint(Tone::Pending, report.issues_skipped()),
        paint(Tone::Muted, "Staging file:"),
        paint(Tone::Value, &report.staging_file),
        paint(Tone::Muted, "Range:"),
        paint(Tone::Value, &report.range),
        paint(Tone::Muted, "Published:"),
        publish_line,
    );
    let _ = writeln!(
        output,
        "  {} {}",
        paint(Tone::Muted, "Completed:"),
        paint(Tone::Muted, report.completed_at.format("%Y-%m-%d %H:%M UTC"))
    );

    output
}

/// First `limit` rows of the staged table, narrowed to the leading columns.
fn render_preview(table: &Table, limit: usize) -> String {
    let mut output = String::new();
    add_section_header(&mut output, "🔎", "Preview");

    if table.rows.is_empty() {
        let _ = writeln!(output, "{}", paint(Tone::Pending, "No rows were produced."));
        return output;
    }

    let width = table.header.len().min(PREVIEW_COLUMNS);
    let mut preview = create_table();
    preview.set_header(cyan_header(&table.header[..width]));
    for row in table.rows.iter().take(limit) {
        preview.add_row(
            row.iter()
                .take(width)
                .map(|cell| sentinel_aware_cell(cell, PREVIEW_CELL_CHARS, SENTINELS)),
        );
    }
    let _ = writeln!(output, "{preview}");

    if table.rows.len() > limit {
        let _ = writeln!(
            output,
            "{}",
            paint(Tone::Muted, format!("… {} more rows", table.rows.len() - limit))
        );
    }
    if table.header.len() > width {
        let _ = writeln!(
            output,
            "{}",
            paint(
                Tone::Muted,
                format!(
                    "… {} more columns in the staging file",
                    table.header.len() - width
                )
            )
        );
    }

    output
}

fn render_fields(fields: &[FieldInfo], map: &FieldMap) -> String {
    let mut output = String::new();
    add_section_header(&mut output, "🏷️", "Custom Fields");

    let mut listing = create_table();
    listing.set_header(cyan_header(&["Id", "Name", "Mapped As"]));

    let mut custom: Vec<&FieldInfo> = fields.iter().filter(|f| f.custom).collect();
    custom.sort_by(|a, b| a.name.cmp(&b.name));

    for field in &custom {
        let mapped = map
            .field_for_id(&field.id)
            .map(|domain| format!("{domain:?}"))
            .unwrap_or_default();
        listing.add_row(vec![
            preview_cell(&field.id, PREVIEW_CELL_CHARS),
            preview_cell(&field.name, PREVIEW_CELL_CHARS),
            preview_cell(&mapped, PREVIEW_CELL_CHARS),
        ]);
    }

    let _ = writeln!(output, "{listing}");
    let _ = writeln!(
        output,
        "{}",
        paint(Tone::Muted, format!("{} custom fields", custom.len()))
    );
    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::PipelineKind;
    use chrono::Utc;

    fn report(publish: PublishStatus) -> RunReport {
        RunReport {
            pipeline: PipelineKind::Specs,
            project: "RVS".to_string(),
            jql: "project = RVS".to_string(),
            sheet: "Specifications".to_string(),
            completed_at: Utc::now(),
            issues_fetched: 5,
            rows_written: 4,
            columns: 19,
            staging_file: "specs.csv".to_string(),
            range: "Specifications!A1:S5".to_string(),
            publish,
        }
    }

    fn table(rows: usize) -> Table {
        let header: Vec<String> = (1..=8).map(|i| format!("Column {i}")).collect();
        Table {
            rows: (0..rows)
                .map(|r| (1..=8).map(|c| format!("r{r}c{c}")).collect())
                .collect(),
            header,
        }
    }

    #[test]
    fn test_render_summary_published() {
        let output = render_summary(&report(PublishStatus::Published {
            updated_range: "Specifications!A1:S5".to_string(),
            updated_rows: 5,
            updated_columns: 19,
            updated_cells: 95,
        }));

        assert!(output.contains("Overview"));
        assert!(output.contains("specs"));
        assert!(output.contains("Rows written:"));
        assert!(output.contains("95 cells (5 rows x 19 columns) in Specifications!A1:S5"));
    }

    #[test]
    fn test_render_summary_dry_run() {
        let output = render_summary(&report(PublishStatus::Skipped));
        assert!(output.contains("skipped (dry run)"));
        assert!(output.contains("Specifications!A1:S5"));
    }

    #[test]
    fn test_render_preview_limits_rows_and_columns() {
        let output = render_preview(&table(4), 2);

        assert!(output.contains("Column 6"));
        assert!(!output.contains("Column 7"));
        assert!(output.contains("r1c1"));
        assert!(!output.contains("r2c1"));
        assert!(output.contains("2 more rows"));
        assert!(output.contains("2 more columns"));
    }

    #[test]
    fn test_render_preview_empty_table() {
        let output = render_preview(&table(0), 5);
        assert!(output.contains("No rows were produced."));
    }

    #[test]
    fn test_render_fields_marks_mapped_ids() {
        let fields = vec![
            FieldInfo {
                id: "customfield_10402".to_string(),
                name: "Governing Committee".to_string(),
                custom: true,
            },
            FieldInfo {
                id: "customfield_77777".to_string(),
                name: "Budget".to_string(),
                custom: true,
            },
            FieldInfo {
                id: "summary".to_string(),
                name: "Summary".to_string(),
                custom: false,
            },
        ];

        let output = render_fields(&fields, &FieldMap::default());

        assert!(output.contains("GoverningCommittee"));
        assert!(output.contains("customfield_77777"));
        assert!(!output.contains("summary"));
        assert!(output.contains("2 custom fields"));
    }
}
