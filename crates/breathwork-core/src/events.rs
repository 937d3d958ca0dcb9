use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::timer::{PhaseKind, SessionConfig, Snapshot};

/// Every state change of a session produces an Event.
/// The presentation layer reacts to them; headless mode prints them.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Event {
    SessionStarted {
        session_id: Uuid,
        config: SessionConfig,
        at: DateTime<Utc>,
    },
    PhaseChanged {
        from: PhaseKind,
        to: PhaseKind,
        /// Session time at which the boundary was crossed.
        session_elapsed_secs: f64,
        at: DateTime<Utc>,
    },
    CycleCompleted {
        cycles: u64,
        session_elapsed_secs: f64,
        at: DateTime<Utc>,
    },
    /// Finite session reached its total duration.
    SessionCompleted {
        session_elapsed_secs: f64,
        cycles: u64,
        at: DateTime<Utc>,
    },
    /// Session ended early on request.
    SessionStopped {
        session_elapsed_secs: f64,
        cycles: u64,
        at: DateTime<Utc>,
    },
    StateSnapshot {
        snapshot: Snapshot,
        at: DateTime<Utc>,
    },
}

impl Event {
    /// Wrap a snapshot taken now.
    pub fn snapshot(snapshot: Snapshot) -> Self {
        Event::StateSnapshot {
            snapshot,
            at: Utc::now(),
        }
    }

    /// True for the events that end a session.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            Event::SessionCompleted { .. } | Event::SessionStopped { .. }
        )
    }
}
