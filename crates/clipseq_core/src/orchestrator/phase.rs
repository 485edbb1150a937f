//! Run lifecycle.
//!
//! ```text
//! Idle → Planning → Concatenating → Probing → Done
//!            └──────────┴──────────────┴──→ Failed
//! ```

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RunPhase {
    #[default]
    Idle,
    Planning,
    Concatenating,
    Probing,
    Done,
    Failed,
}

impl RunPhase {
    pub fn can_transition_to(self, next: RunPhase) -> bool {
        use RunPhase::*;
        matches!(
            (self, next),
            (Idle, Planning)
                | (Planning, Concatenating)
                | (Concatenating, Probing)
                | (Probing, Done)
                | (Planning | Concatenating | Probing, Failed)
        )
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, RunPhase::Done | RunPhase::Failed)
    }

    pub fn name(self) -> &'static str {
        match self {
            RunPhase::Idle => "Idle",
            RunPhase::Planning => "Planning",
            RunPhase::Concatenating => "Concatenating",
            RunPhase::Probing => "Probing",
            RunPhase::Done => "Done",
            RunPhase::Failed => "Failed",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn happy_path_is_linear() {
        let path = [
            RunPhase::Idle,
            RunPhase::Planning,
            RunPhase::Concatenating,
            RunPhase::Probing,
            RunPhase::Done,
        ];
        for pair in path.windows(2) {
            assert!(pair[0].can_transition_to(pair[1]), "{:?}", pair);
        }
        assert!(!RunPhase::Idle.can_transition_to(RunPhase::Concatenating));
        assert!(!RunPhase::Probing.can_transition_to(RunPhase::Planning));
    }

    #[test]
    fn failed_only_from_active_phases() {
        assert!(RunPhase::Planning.can_transition_to(RunPhase::Failed));
        assert!(RunPhase::Concatenating.can_transition_to(RunPhase::Failed));
        assert!(RunPhase::Probing.can_transition_to(RunPhase::Failed));
        assert!(!RunPhase::Idle.can_transition_to(RunPhase::Failed));
        assert!(!RunPhase::Done.can_transition_to(RunPhase::Failed));
        assert!(RunPhase::Failed.is_terminal());
    }
}
