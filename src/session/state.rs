use crate::roles::Role;
use serde::{Deserialize, Serialize};

/// Sync session lifecycle states.
///
/// `Stopped` is terminal: a finished or aborted session cannot be
/// restarted, a new one must be created.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionState {
    Idle,
    Active { role: Role },
    Stopped,
}

impl SessionState {
    /// Check if transition from current state to target state is valid
    pub fn can_transition_to(&self, target: &SessionState) -> bool {
        use SessionState::*;

        matches!(
            (self, target),
            // From Idle
            (Idle, Active { .. }) |

            // From Active: stop request, budget exhaustion, or device failure
            (Active { .. }, Stopped)
        )
    }

    /// Get human-readable state name
    pub fn name(&self) -> &str {
        match self {
            Self::Idle => "Idle",
            Self::Active { .. } => "Active",
            Self::Stopped => "Stopped",
        }
    }
}

impl Default for SessionState {
    fn default() -> Self {
        Self::Idle
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_idle_activates() {
        let idle = SessionState::Idle;
        let active = SessionState::Active {
            role: Role::Coordinator,
        };

        assert!(idle.can_transition_to(&active));
        assert!(!active.can_transition_to(&idle));
    }

    #[test]
    fn test_no_direct_idle_to_stopped() {
        assert!(!SessionState::Idle.can_transition_to(&SessionState::Stopped));
    }

    #[test]
    fn test_stopped_is_terminal() {
        let stopped = SessionState::Stopped;
        let active = SessionState::Active {
            role: Role::Participant(1),
        };

        assert!(active.can_transition_to(&stopped));
        assert!(!stopped.can_transition_to(&active));
        assert!(!stopped.can_transition_to(&SessionState::Idle));
    }
}
