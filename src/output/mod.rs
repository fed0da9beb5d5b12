mod progress;
mod styling;
mod summary;
mod tables;

pub use progress::PhaseProgress;
use styling::{paint, Tone};
pub use summary::{print_fields, print_summary};

/// Prints the `jirasheets` banner to stderr.
pub fn print_banner() {
    eprintln!(
        r"
{} {}
  {}
",
        paint(Tone::Brand, "📋 jirasheets"),
        paint(Tone::Muted, env!("CARGO_PKG_VERSION")),
        paint(Tone::Muted, "Jira to Google Sheets exporter")
    );
}
