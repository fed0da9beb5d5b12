use crate::tracker::links::{browse_url, hyperlink_formula};
use crate::tracker::types::SubIssue;

pub const NO_NEXT_SUBTASK: &str = "There is no next sub-task";

/// Sub-task statuses that count as finished work.
pub const COMPLETED_STATUSES: &[&str] = &[
    "Approved",
    "AR Approved",
    "Resolved",
    "Done",
    "Not Required to Freeze",
    "AR Review Not Required",
    "Not Required",
    "Not Required for Ratification-Ready",
    "Ecosystem Development Done",
    "Not Required for Ecosystem",
    "Freeze Waiver Granted",
    "Ratification-Ready Waiver Granted",
];

/// The next piece of outstanding work under a parent issue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NextSubtask {
    Outstanding { url: String, title: String },
    Finished,
}

impl NextSubtask {
    pub fn title(&self) -> &str {
        match self {
            Self::Outstanding { title, .. } => title,
            Self::Finished => NO_NEXT_SUBTASK,
        }
    }

    pub fn url(&self) -> &str {
        match self {
            Self::Outstanding { url, .. } => url,
            Self::Finished => NO_NEXT_SUBTASK,
        }
    }

    /// Single-cell rendering as a spreadsheet `HYPERLINK` formula.
    pub fn formula(&self) -> String {
        match self {
            Self::Outstanding { url, title } => hyperlink_formula(url, title),
            Self::Finished => NO_NEXT_SUBTASK.to_string(),
        }
    }
}

/// First sub-task, in tracker order, whose status is not in `completed`.
pub fn next_outstanding(
    browse_base: &str,
    subtasks: &[SubIssue],
    completed: &[&str],
) -> NextSubtask {
    subtasks
        .iter()
        .find(|subtask| !completed.iter().any(|done| *done == subtask.status_name()))
        .map_or(NextSubtask::Finished, |subtask| NextSubtask::Outstanding {
            url: browse_url(browse_base, &subtask.key),
            title: subtask.fields.summary.clone(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tracker::types::{Status, SubIssueFields};

    const BASE: &str = "https://jira.riscv.org";

    fn subtask(key: &str, summary: &str, status: &str) -> SubIssue {
        SubIssue {
            key: key.to_string(),
            fields: SubIssueFields {
                summary: summary.to_string(),
                status: Some(Status {
                    name: status.to_string(),
                }),
            },
        }
    }

    #[test]
    fn returns_first_incomplete_subtask() {
        let subtasks = vec![
            subtask("RVS-1", "A", "Done"),
            subtask("RVS-2", "B", "In Progress"),
            subtask("RVS-3", "C", "Done"),
        ];

        let next = next_outstanding(BASE, &subtasks, &["Done"]);

        assert_eq!(
            next,
            NextSubtask::Outstanding {
                url: "https://jira.riscv.org/browse/RVS-2".to_string(),
                title: "B".to_string(),
            }
        );
    }

    #[test]
    fn all_complete_yields_sentinel() {
        let subtasks = vec![subtask("RVS-1", "A", "Done"), subtask("RVS-3", "C", "Done")];

        let next = next_outstanding(BASE, &subtasks, &["Done"]);

        assert_eq!(next, NextSubtask::Finished);
        assert_eq!(next.title(), NO_NEXT_SUBTASK);
        assert_eq!(next.url(), NO_NEXT_SUBTASK);
        assert_eq!(next.formula(), NO_NEXT_SUBTASK);
    }

    #[test]
    fn empty_list_yields_sentinel() {
        assert_eq!(
            next_outstanding(BASE, &[], COMPLETED_STATUSES),
            NextSubtask::Finished
        );
    }

    #[test]
    fn waiver_statuses_count_as_complete() {
        let subtasks = vec![
            subtask("RVS-1", "Freeze", "Freeze Waiver Granted"),
            subtask("RVS-2", "Ratify", "Ratification-Ready Waiver Granted"),
            subtask("RVS-3", "Ecosystem", "Open"),
        ];

        let next = next_outstanding(BASE, &subtasks, COMPLETED_STATUSES);

        assert_eq!(next.title(), "Ecosystem");
    }

    #[test]
    fn formula_embeds_link_and_title() {
        let next = NextSubtask::Outstanding {
            url: "https://jira.riscv.org/browse/RVS-2".to_string(),
            title: "Write the \"Zfa\" tests".to_string(),
        };

        assert_eq!(
            next.formula(),
            r#"=HYPERLINK("https://jira.riscv.org/browse/RVS-2", "Write the ""Zfa"" tests")"#
        );
    }
}
