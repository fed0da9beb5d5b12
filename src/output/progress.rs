use std::time::Duration;

use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};

use super::styling::{paint, Tone};

const PHASES: [&str; 4] = ["Query", "Transform", "Stage", "Publish"];

/// Spinner per pipeline phase: Query, Transform, Stage, Publish.
///
/// Drawing is disabled for hidden trackers so library callers and tests stay
/// quiet.
pub struct PhaseProgress {
    pb: ProgressBar,
    phase: usize,
    visible: bool,
}

impl PhaseProgress {
    /// Starts the Query phase.
    pub fn start(visible: bool, message: impl Into<String>) -> Self {
        if visible {
            eprintln!(
                "{}  {}",
                paint(Tone::Heading, "⚙️"),
                paint(Tone::Heading, "Phases").underlined()
            );
        }
        Self {
            pb: create_spinner(visible, phase_message(0, &message.into())),
            phase: 0,
            visible,
        }
    }

    /// Finishes the current phase with `done` and starts the next one.
    pub fn advance(self, done: impl AsRef<str>, next: impl Into<String>) -> Self {
        self.finish_current(done.as_ref());
        let phase = (self.phase + 1).min(PHASES.len() - 1);
        Self {
            pb: create_spinner(self.visible, phase_message(phase, &next.into())),
            phase,
            visible: self.visible,
        }
    }

    /// Marks the current phase as skipped and ends tracking.
    pub fn skip(self, reason: impl AsRef<str>) {
        let label = format!(
            "Phase {}/{}: {} skipped ({})",
            self.phase + 1,
            PHASES.len(),
            PHASES[self.phase],
            reason.as_ref()
        );
        self.pb.finish_with_message(paint(Tone::Muted, label).to_string());
        if self.visible {
            eprintln!();
        }
    }

    /// Finishes the last phase.
    pub fn finish(self, done: impl AsRef<str>) {
        self.finish_current(done.as_ref());
        if self.visible {
            eprintln!();
        }
    }

    fn finish_current(&self, done: &str) {
        let label = format!("Phase {}/{}: {done} ✓", self.phase + 1, PHASES.len());
        self.pb.finish_with_message(paint(Tone::Done, label).to_string());
    }
}

fn phase_message(phase: usize, message: &str) -> String {
    let label = format!("Phase {}/{}: {message}", phase + 1, PHASES.len());
    paint(Tone::Pending, label).to_string()
}

fn create_spinner(visible: bool, message: String) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    if visible {
        pb.set_draw_target(ProgressDrawTarget::stderr());
    } else {
        pb.set_draw_target(ProgressDrawTarget::hidden());
    }
    if let Ok(style) = ProgressStyle::default_spinner().template("  {msg} {spinner}") {
        pb.set_style(style);
    }
    pb.set_message(message);
    if visible {
        pb.enable_steady_tick(Duration::from_millis(100));
    }
    pb
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_phases_advance_and_saturate() {
        let progress = PhaseProgress::start(false, "Querying Jira");
        assert_eq!(progress.phase, 0);

        let progress = progress
            .advance("Fetched 3 issues", "Building rows")
            .advance("Built 2 rows", "Writing staging file")
            .advance("Staged 3 rows", "Updating sheet");
        assert_eq!(progress.phase, 3);

        let progress = progress.advance("Done", "Nothing left");
        assert_eq!(progress.phase, 3);
        progress.finish("Updated sheet");
    }

    #[test]
    fn test_phase_message_counts_from_one() {
        console::set_colors_enabled(false);
        assert_eq!(phase_message(1, "Building rows"), "Phase 2/4: Building rows");
    }
}
