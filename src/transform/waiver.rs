pub const NO_WAIVER: &str = "No Waiver";

/// Labels recording a granted waiver, joined with `" and "` in input order.
pub fn granted_waivers<S: AsRef<str>>(labels: &[S]) -> String {
    let granted: Vec<&str> = labels
        .iter()
        .map(AsRef::as_ref)
        .filter(|label| label.to_lowercase().contains("granted"))
        .collect();

    if granted.is_empty() {
        NO_WAIVER.to_string()
    } else {
        granted.join(" and ")
    }
}
