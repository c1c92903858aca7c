use serde::{Deserialize, Serialize};

/// Session lifecycle states
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionState {
    /// Transport acquired, reads allowed
    Open,
    /// Transport failed or was closed underneath a read; only `close` is meaningful
    Failed,
    /// Transport released
    Closed,
}

impl SessionState {
    /// Check if transition from current state to target state is valid
    pub fn can_transition_to(&self, target: SessionState) -> bool {
        use SessionState::*;

        matches!(
            (self, target),
            (Open, Failed) | (Open, Closed) | (Failed, Closed) | (Closed, Closed)
        )
    }

    pub fn accepts_reads(&self) -> bool {
        matches!(self, SessionState::Open)
    }
}
