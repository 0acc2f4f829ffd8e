//! Worker lifecycle
//!
//! State machine for a gateway instance. Fetch interception only happens
//! once the worker is activated.

/// Worker lifecycle states
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkerState {
    /// Initial state, nothing installed yet.
    Parsed,
    /// Install event in progress (precache running).
    Installing,
    /// Precache complete, ready to activate.
    Installed,
    /// Activate event in progress (stale cache cleanup).
    Activating,
    /// Active and controlling clients.
    Activated,
    /// Replaced or unregistered.
    Redundant,
}

impl WorkerState {
    /// Whether fetch events are intercepted in this state.
    pub fn can_intercept(&self) -> bool {
        matches!(self, WorkerState::Activated)
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, WorkerState::Redundant)
    }
}

impl std::fmt::Display for WorkerState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            WorkerState::Parsed => "parsed",
            WorkerState::Installing => "installing",
            WorkerState::Installed => "installed",
            WorkerState::Activating => "activating",
            WorkerState::Activated => "activated",
            WorkerState::Redundant => "redundant",
        };
        write!(f, "{name}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_activated_intercepts() {
        assert!(WorkerState::Activated.can_intercept());
        assert!(!WorkerState::Parsed.can_intercept());
        assert!(!WorkerState::Installed.can_intercept());
        assert!(!WorkerState::Redundant.can_intercept());
    }

    #[test]
    fn test_terminal_state() {
        assert!(WorkerState::Redundant.is_terminal());
        assert!(!WorkerState::Activated.is_terminal());
    }

    #[test]
    fn test_display() {
        assert_eq!(WorkerState::Installing.to_string(), "installing");
        assert_eq!(WorkerState::Activated.to_string(), "activated");
    }
}
