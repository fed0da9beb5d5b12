use std::fmt::Display;

use console::{style, StyledObject};

/// Terminal tones shared by the banner, phase spinners and summaries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    /// Section titles
    Heading,
    /// Finished phases and published ranges
    Done,
    /// Running phases, counts and dry-run notices
    Pending,
    /// Names and paths
    Value,
    Muted,
    Brand,
}

pub fn paint(tone: Tone, text: impl Display) -> StyledObject<String> {
    let styled = style(text.to_string());
    match tone {
        Tone::Heading => styled.bright(),
        Tone::Done => styled.bright().green(),
        Tone::Pending => styled.bright().yellow(),
        Tone::Value => styled.cyan(),
        Tone::Muted => styled.dim(),
        Tone::Brand => styled.magenta().bold(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_paint_keeps_text() {
        let painted = paint(Tone::Done, "Updated 12 cells");
        assert!(painted.to_string().contains("Updated 12 cells"));
    }
}
