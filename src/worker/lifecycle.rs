//! Worker lifecycle states.

use std::fmt;

use serde::Serialize;

/// Where a worker version is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum WorkerState {
    /// Created, nothing run yet.
    #[default]
    Parsed,
    /// Install handler running.
    Installing,
    /// Manifest cached, waiting for activation.
    Installed,
    /// Activate handler running.
    Activating,
    /// Active and controlling pages.
    Activated,
    /// Install failed or replaced by a newer version.
    Redundant,
}

impl WorkerState {
    /// Returns true if moving to `next` is a legal transition.
    pub fn can_transition_to(self, next: WorkerState) -> bool {
        use WorkerState::*;

        matches!(
            (self, next),
            (Parsed, Installing)
                | (Installing, Installed)
                | (Installed, Activating)
                | (Activating, Activated)
                | (_, Redundant)
        )
    }
}

impl fmt::Display for WorkerState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            WorkerState::Parsed => "parsed",
            WorkerState::Installing => "installing",
            WorkerState::Installed => "installed",
            WorkerState::Activating => "activating",
            WorkerState::Activated => "activated",
            WorkerState::Redundant => "redundant",
        };
        f.write_str(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_forward_transitions() {
        assert!(WorkerState::Parsed.can_transition_to(WorkerState::Installing));
        assert!(WorkerState::Installing.can_transition_to(WorkerState::Installed));
        assert!(WorkerState::Installed.can_transition_to(WorkerState::Activating));
        assert!(WorkerState::Activating.can_transition_to(WorkerState::Activated));
    }

    #[test]
    fn test_cannot_skip_install() {
        assert!(!WorkerState::Parsed.can_transition_to(WorkerState::Activating));
        assert!(!WorkerState::Installing.can_transition_to(WorkerState::Activated));
        assert!(!WorkerState::Redundant.can_transition_to(WorkerState::Installing));
    }

    #[test]
    fn test_any_state_can_become_redundant() {
        assert!(WorkerState::Installing.can_transition_to(WorkerState::Redundant));
        assert!(WorkerState::Activated.can_transition_to(WorkerState::Redundant));
    }

    #[test]
    fn test_display() {
        assert_eq!(WorkerState::Activated.to_string(), "activated");
        assert_eq!(
            serde_json::to_string(&WorkerState::Redundant).unwrap(),
            "\"redundant\""
        );
    }
}
