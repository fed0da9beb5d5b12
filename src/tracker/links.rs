use super::types::Issue;

pub const NO_LINKED_SPECIFICATION: &str = "No Specification is linked to the group yet.";

/// Web URL of an issue.
///
/// # Arguments
///
/// * `base_url` - Tracker base URL (e.g., <https://jira.riscv.org>)
/// * `key` - Issue key (e.g., "RVS-1234")
///
/// # Returns
///
/// Browse URL (e.g., <https://jira.riscv.org/browse/RVS-1234>)
pub fn browse_url(base_url: &str, key: &str) -> String {
    format!("{}/browse/{key}", base_url.trim_end_matches('/'))
}

/// Spreadsheet `HYPERLINK` formula showing `label` and linking to `url`.
///
/// Double quotes are doubled, as the sheet formula grammar requires.
pub fn hyperlink_formula(url: &str, label: &str) -> String {
    format!(
        "=HYPERLINK(\"{}\", \"{}\")",
        url.replace('"', "\"\""),
        label.replace('"', "\"\"")
    )
}

/// Browse URLs of every outward-linked issue, one per line.
pub fn outward_links(base_url: &str, issue: &Issue) -> String {
    let links: Vec<String> = issue
        .fields
        .issuelinks
        .iter()
        .filter_map(|link| link.outward_issue.as_ref())
        .map(|linked| browse_url(base_url, &linked.key))
        .collect();

    if links.is_empty() {
        NO_LINKED_SPECIFICATION.to_string()
    } else {
        links.join("\n ")
    }
}
