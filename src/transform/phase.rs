use crate::error::{Result, SyncError};

/// Value of a phase table entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NextPhase {
    Single(&'static str),
    /// Several possible next phases, rendered joined with `" or "`.
    Either(&'static [&'static str]),
}

impl NextPhase {
    fn render(self) -> String {
        match self {
            Self::Single(phase) => phase.to_string(),
            Self::Either(phases) => phases.join(" or "),
        }
    }
}

/// Ordered keyword table mapping a workflow status to its next phase.
///
/// Lookup is a case-insensitive substring match and the first matching key
/// wins, so entry order matters when keys overlap.
#[derive(Debug, Clone, Copy)]
pub struct PhaseTable {
    entries: &'static [(&'static str, NextPhase)],
}

/// Lifecycle of a specification.
pub const SPECIFICATION_PHASES: PhaseTable = PhaseTable {
    entries: &[
        ("inception", NextPhase::Single("Planning")),
        ("planning", NextPhase::Single("Development")),
        ("development", NextPhase::Single("Freeze")),
        ("freeze", NextPhase::Single("Ratification-Ready")),
        (
            "ratification-ready",
            NextPhase::Either(&["Ecosystem Development", "Specification Completed"]),
        ),
        (
            "ecosystem development",
            NextPhase::Single("Specification Completed"),
        ),
        ("specification done", NextPhase::Single("No Next Phase")),
    ],
};

/// Lifecycle of a working group.
pub const GROUP_PHASES: PhaseTable = PhaseTable {
    entries: &[
        ("inception", NextPhase::Single("Group Kickoff")),
        ("kickoff", NextPhase::Single("Group Formation")),
        ("formation", NextPhase::Single("Group Active")),
        ("active", NextPhase::Single("Group Disbanded")),
        ("disbanded", NextPhase::Single("No Next Phase")),
    ],
};

impl PhaseTable {
    /// Resolves the next phase for a free-text status.
    ///
    /// # Errors
    ///
    /// Returns [`SyncError::UnrecognizedPhase`] when no keyword matches. The
    /// tracker workflow has changed in that case, so the run must stop.
    pub fn next_phase(&self, current: &str) -> Result<String> {
        let lowered = current.to_lowercase();

        self.entries
            .iter()
            .find(|(keyword, _)| lowered.contains(keyword))
            .map(|(_, next)| next.render())
            .ok_or_else(|| SyncError::UnrecognizedPhase(current.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[cfg(test)]
    mod specification_phases {
        use super::*;

        #[test]
        fn maps_each_phase_to_its_successor() {
            let cases = [
                ("Inception", "Planning"),
                ("Planning", "Development"),
                ("Development", "Freeze"),
                ("Freeze Review", "Ratification-Ready"),
                ("Specification Done", "No Next Phase"),
            ];

            for (status, expected) in cases {
                assert_eq!(
                    SPECIFICATION_PHASES.next_phase(status).unwrap(),
                    expected,
                    "status {status}"
                );
            }
        }

        #[test]
        fn alternatives_are_joined_with_or() {
            assert_eq!(
                SPECIFICATION_PHASES
                    .next_phase("RATIFICATION-READY")
                    .unwrap(),
                "Ecosystem Development or Specification Completed"
            );
        }

        #[test]
        fn first_matching_key_wins() {
            // "development" precedes "ecosystem development" in the table
            assert_eq!(
                SPECIFICATION_PHASES
                    .next_phase("Ecosystem Development")
                    .unwrap(),
                "Freeze"
            );
        }

        #[test]
        fn unknown_status_is_an_error() {
            let err = SPECIFICATION_PHASES.next_phase("Triage").unwrap_err();
            assert!(
                matches!(&err, SyncError::UnrecognizedPhase(s) if s == "Triage"),
                "unexpected error: {err}"
            );
        }
    }

    #[cfg(test)]
    mod group_phases {
        use super::*;

        #[test]
        fn maps_group_lifecycle() {
            assert_eq!(GROUP_PHASES.next_phase("Kickoff").unwrap(), "Group Formation");
            assert_eq!(
                GROUP_PHASES.next_phase("Group Formation").unwrap(),
                "Group Active"
            );
            assert_eq!(GROUP_PHASES.next_phase("Active").unwrap(), "Group Disbanded");
            assert_eq!(GROUP_PHASES.next_phase("Disbanded").unwrap(), "No Next Phase");
        }

        #[test]
        fn unknown_group_status_is_an_error() {
            assert!(GROUP_PHASES.next_phase("").is_err());
            assert!(GROUP_PHASES.next_phase("Paused").is_err());
        }
    }
}
