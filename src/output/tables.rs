use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Cell, Color as TableColor, ContentArrangement, Table};

/// Table and cell creation helpers
pub fn create_table() -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic);
    table
}

pub fn cyan_header<S: AsRef<str>>(labels: &[S]) -> Vec<Cell> {
    labels
        .iter()
        .map(|label| Cell::new(label.as_ref()).fg(TableColor::Cyan))
        .collect()
}

/// Preview cell, shortened to `max_chars` characters.
pub fn preview_cell(text: &str, max_chars: usize) -> Cell {
    if text.chars().count() <= max_chars {
        return Cell::new(text);
    }
    let shortened: String = text.chars().take(max_chars.saturating_sub(1)).collect();
    Cell::new(format!("{shortened}…"))
}

/// Sentinel cells such as "Due Date is not set" render dimmed.
pub fn sentinel_aware_cell(text: &str, max_chars: usize, sentinels: &[&str]) -> Cell {
    let cell = preview_cell(text, max_chars);
    if sentinels.contains(&text) {
        cell.fg(TableColor::DarkGrey)
    } else {
        cell
    }
}
