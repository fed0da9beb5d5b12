use crate::error::Result;
use crate::tracker::links::outward_links;
use crate::tracker::Field;
use crate::transform::dates::{
    days_until_end_of_quarter, elapsed_since, quarter_year_label, remaining_days, QuarterYear,
    DUE_DATE_NOT_SET,
};
use crate::transform::phase::{GROUP_PHASES, SPECIFICATION_PHASES};
use crate::transform::subtasks::{next_outstanding, NextSubtask, COMPLETED_STATUSES};
use crate::transform::values::join_option_values;
use crate::transform::waiver::granted_waivers;

use super::{Acceptance, Column, PipelineSpec, RowContext};

const SPECIFICATION_DONE: &str = "Specification Done";

pub(super) static SPECS: PipelineSpec = PipelineSpec {
    accepts: Acceptance::WithSubtasks,
    columns: &[
        Column::derived("Jira URL", jira_url),
        Column::derived("Summary", summary),
        Column::derived("Status", status),
        Column::derived("Next Phase", next_specification_phase),
        Column::derived("Created", created),
        Column::derived("Updated", updated),
        Column::derived("Due Date", due_date),
        Column::derived("Waivers", waivers),
        Column::custom("Is Fast Track?", Field::IsFastTrack),
        Column::custom("ISA or NON-ISA?", Field::IsaOrNonIsa),
        Column::custom("Groups.io", Field::GroupsIo),
        Column::custom("GitHub", Field::GitHub),
        Column::custom("Governing Committee", Field::GoverningCommittee),
        Column::custom("Public Review", Field::PublicReview),
        Column::custom(
            "Board Review Planned Approval",
            Field::BoardReviewPlannedApproval,
        ),
        Column::derived(
            "Board Review Planned Approval (Quarter-Year)",
            board_review_quarter,
        ),
        Column::derived(
            "Days Until Board Review Planned Approval",
            days_until_board_review,
        ),
        Column::derived("Next Not Started Sub-Task Name", next_subtask_name),
        Column::derived("Next Not Started Sub-Task URL", next_subtask_url),
    ],
    derived_fields: &[],
};

pub(super) static SPECS_BASIC: PipelineSpec = PipelineSpec {
    accepts: Acceptance::WithSubtasks,
    columns: &[
        Column::derived("Jira URL", jira_url),
        Column::derived("Summary", summary),
        Column::derived("Status", status),
        Column::derived("Created", created),
        Column::derived("Updated", updated),
        Column::derived("Due Date", due_date),
        Column::custom("Is Fast Track?", Field::IsFastTrack),
        Column::custom("ISA or NON-ISA?", Field::IsaOrNonIsa),
        Column::custom("Groups.io", Field::GroupsIo),
        Column::custom("GitHub", Field::GitHub),
        Column::custom("Governing Committee", Field::GoverningCommittee),
        Column::custom("Public Review", Field::PublicReview),
        Column::custom(
            "Board Review Planned Approval",
            Field::BoardReviewPlannedApproval,
        ),
        Column::derived(
            "Board Review Planned Approval (Quarter-Year)",
            board_review_quarter,
        ),
        Column::derived("Next Not Started Sub-Task", next_subtask_link),
    ],
    derived_fields: &[],
};

pub(super) static GROUPS: PipelineSpec = PipelineSpec {
    accepts: Acceptance::WithoutSubtasks,
    columns: &[
        Column::derived("Jira URL", jira_url),
        Column::derived("Summary", summary),
        Column::custom("Group Charter", Field::GroupCharter),
        Column::derived("Group Current Phase", status),
        Column::derived("Group Next Phase", next_group_phase),
        Column::custom("Group Type", Field::GroupType),
        Column::custom("Governing Committee", Field::GoverningCommittee),
        Column::derived(
            "Dotted-line Governing Committee",
            dotted_line_committees,
        ),
        Column::custom(
            "Group Lifecycle Starting Date",
            Field::GroupLifecycleStartingDate,
        ),
        Column::derived(
            "Days since Group Lifecycle Starting Date",
            days_since_lifecycle_start,
        ),
        Column::custom("Creation Date", Field::CreationDate),
        Column::custom("Disbanding Date", Field::DisbandingDate),
        Column::custom("Chair", Field::Chair),
        Column::custom("Chair Starting Date", Field::ChairStartingDate),
        Column::custom("Chair End Date", Field::ChairEndDate),
        Column::derived("Remaining days for Chair", chair_remaining),
        Column::custom("Vice-chair", Field::ViceChair),
        Column::custom("Vice-chair Starting Date", Field::ViceChairStartingDate),
        Column::custom("Vice-chair End Date", Field::ViceChairEndDate),
        Column::derived("Remaining days for Vice-chair", vice_chair_remaining),
        Column::custom("Acting Chair", Field::ActingChair),
        Column::custom("Acting Vice-chair", Field::ActingViceChair),
        Column::derived("Linked Specifications", linked_specifications),
    ],
    derived_fields: &[
        Field::DottedLineGoverningCommittee,
        Field::GroupLifecycleStartingDate,
        Field::ChairEndDate,
        Field::ViceChairEndDate,
    ],
};

/// Date part of a tracker timestamp.
fn date_part(timestamp: Option<&str>) -> String {
    timestamp
        .and_then(|t| t.split('T').next())
        .unwrap_or_default()
        .to_string()
}

fn jira_url(ctx: &RowContext<'_>) -> Result<String> {
    Ok(ctx.issue_url())
}

fn summary(ctx: &RowContext<'_>) -> Result<String> {
    Ok(ctx.issue.fields.summary.clone())
}

fn status(ctx: &RowContext<'_>) -> Result<String> {
    Ok(ctx.status().to_string())
}

fn next_specification_phase(ctx: &RowContext<'_>) -> Result<String> {
    SPECIFICATION_PHASES.next_phase(ctx.status())
}

fn next_group_phase(ctx: &RowContext<'_>) -> Result<String> {
    GROUP_PHASES.next_phase(ctx.status())
}

fn created(ctx: &RowContext<'_>) -> Result<String> {
    Ok(date_part(ctx.issue.fields.created.as_deref()))
}

fn updated(ctx: &RowContext<'_>) -> Result<String> {
    Ok(date_part(ctx.issue.fields.updated.as_deref()))
}

fn due_date(ctx: &RowContext<'_>) -> Result<String> {
    Ok(ctx.issue.fields.duedate.clone().unwrap_or_default())
}

fn waivers(ctx: &RowContext<'_>) -> Result<String> {
    Ok(granted_waivers(&ctx.issue.fields.labels))
}

fn board_review_quarter(ctx: &RowContext<'_>) -> Result<String> {
    Ok(quarter_year_label(ctx.due_date()?))
}

fn days_until_board_review(ctx: &RowContext<'_>) -> Result<String> {
    if ctx.status() == SPECIFICATION_DONE {
        return Ok("0".to_string());
    }
    Ok(match ctx.due_date()? {
        Some(due) => days_until_end_of_quarter(QuarterYear::of(due), ctx.today()).to_string(),
        None => DUE_DATE_NOT_SET.to_string(),
    })
}

fn next_subtask(ctx: &RowContext<'_>) -> NextSubtask {
    next_outstanding(
        ctx.browse_base,
        &ctx.issue.fields.subtasks,
        COMPLETED_STATUSES,
    )
}

fn next_subtask_name(ctx: &RowContext<'_>) -> Result<String> {
    Ok(next_subtask(ctx).title().to_string())
}

fn next_subtask_url(ctx: &RowContext<'_>) -> Result<String> {
    Ok(next_subtask(ctx).url().to_string())
}

fn next_subtask_link(ctx: &RowContext<'_>) -> Result<String> {
    Ok(next_subtask(ctx).formula())
}

fn dotted_line_committees(ctx: &RowContext<'_>) -> Result<String> {
    Ok(join_option_values(
        ctx.options(Field::DottedLineGoverningCommittee).as_deref(),
    ))
}

fn days_since_lifecycle_start(ctx: &RowContext<'_>) -> Result<String> {
    let start = ctx.date(Field::GroupLifecycleStartingDate)?;
    Ok(elapsed_since(start, ctx.now).to_string())
}

fn chair_remaining(ctx: &RowContext<'_>) -> Result<String> {
    Ok(remaining_days(ctx.date(Field::ChairEndDate)?, ctx.now).to_string())
}

fn vice_chair_remaining(ctx: &RowContext<'_>) -> Result<String> {
    Ok(remaining_days(ctx.date(Field::ViceChairEndDate)?, ctx.now).to_string())
}

fn linked_specifications(ctx: &RowContext<'_>) -> Result<String> {
    Ok(outward_links(ctx.browse_base, ctx.issue))
}
