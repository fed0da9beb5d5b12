/// Spreadsheet column letters for a 1-indexed column number.
///
/// 1 → `A`, 26 → `Z`, 27 → `AA`; 0 yields an empty string.
pub fn column_letters(mut column: usize) -> String {
    let mut letters = Vec::new();
    while column > 0 {
        let remainder = (column - 1) % 26;
        column = (column - 1) / 26;
        #[allow(clippy::cast_possible_truncation)]
        letters.push(char::from(b'A' + remainder as u8));
    }
    letters.iter().rev().collect()
}

/// A1-notation range covering `values`, anchored at `A1` of `sheet`.
///
/// The width is taken from the first row, matching the rectangular block
/// produced by the staging file.
pub fn range_name<S>(sheet: &str, values: &[Vec<S>]) -> String {
    let rows = values.len();
    let columns = values.first().map_or(0, Vec::len);
    format!("{sheet}!A1:{}{rows}", column_letters(columns))
}
