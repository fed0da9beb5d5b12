/// Renders a multi-select value list as an English enumeration.
///
/// An absent list renders as `"None"`, while a present-but-empty list renders
/// as an empty cell. Two values are joined with `" and "`; three or more use
/// commas with a final `" and "` (e.g., `"A, B and C"`).
pub fn join_option_values<S: AsRef<str>>(values: Option<&[S]>) -> String {
    let Some(values) = values else {
        return "None".to_string();
    };

    match values {
        [] => String::new(),
        [only] => only.as_ref().to_string(),
        [first, second] => format!("{} and {}", first.as_ref(), second.as_ref()),
        [init @ .., last] => {
            let head = init
                .iter()
                .map(AsRef::as_ref)
                .collect::<Vec<&str>>()
                .join(", ");
            format!("{head} and {}", last.as_ref())
        }
    }
}
