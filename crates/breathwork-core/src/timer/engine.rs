//! Phase cycle timer.
//!
//! The timer is a delta-driven state machine. It does not read a clock or
//! spawn threads - the caller feeds it the seconds elapsed since the
//! previous frame through `tick()`.
//!
//! ## State Transitions
//!
//! ```text
//! Running -> Completed   (finite total reached inside tick)
//! Running -> Stopped     (stop())
//! ```
//!
//! Completed and Stopped are terminal: `tick()` and `stop()` do nothing.
//!
//! ## Usage
//!
//! ```ignore
//! let mut timer = PhaseTimer::new(config);
//! // Once per frame:
//! for event in timer.tick(dt_secs) { /* PhaseChanged, SessionCompleted, ... */ }
//! let view = timer.snapshot();
//! ```

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use uuid::Uuid;

use super::pattern::{PhaseKind, SessionConfig, TotalDuration};
use crate::events::Event;

/// Slack for float accumulation when a phase ends on the completion instant.
const BOUNDARY_EPSILON: f64 = 1e-9;

/// Cycles a single tick reports transition by transition before the rest
/// are folded into one `CycleCompleted`.
const MAX_REPORTED_CYCLES: f64 = 1024.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimerStatus {
    Running,
    Completed,
    Stopped,
}

impl TimerStatus {
    pub fn is_terminal(self) -> bool {
        !matches!(self, TimerStatus::Running)
    }
}

/// Read-only view of the timer for presentation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub status: TimerStatus,
    pub phase: PhaseKind,
    pub phase_elapsed_secs: f64,
    pub phase_remaining_secs: f64,
    pub phase_duration_secs: f64,
    /// 0.0 ..= 1.0 progress within the current phase.
    pub phase_progress: f64,
    /// 0.0 ..= 1.0 position within the current cycle.
    pub cycle_progress: f64,
    pub session_elapsed_secs: f64,
    /// `None` when the session is unbounded.
    pub total_remaining_secs: Option<f64>,
    pub cycles_completed: u64,
}

/// Core breathing timer. One instance per session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PhaseTimer {
    session_id: Uuid,
    config: SessionConfig,
    status: TimerStatus,
    phase: PhaseKind,
    /// Seconds spent in the current phase.
    phase_elapsed: f64,
    /// Seconds since the session started. Never decreases.
    session_elapsed: f64,
    cycles_completed: u64,
}

impl PhaseTimer {
    /// Create a running timer at the start of Inhale.
    pub fn new(config: SessionConfig) -> Self {
        Self {
            session_id: Uuid::new_v4(),
            config,
            status: TimerStatus::Running,
            phase: PhaseKind::Inhale,
            phase_elapsed: 0.0,
            session_elapsed: 0.0,
            cycles_completed: 0,
        }
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn session_id(&self) -> Uuid {
        self.session_id
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn status(&self) -> TimerStatus {
        self.status
    }

    pub fn is_finished(&self) -> bool {
        self.status.is_terminal()
    }

    pub fn current_phase(&self) -> PhaseKind {
        self.phase
    }

    pub fn phase_elapsed(&self) -> f64 {
        self.phase_elapsed
    }

    pub fn session_elapsed(&self) -> f64 {
        self.session_elapsed
    }

    pub fn cycles_completed(&self) -> u64 {
        self.cycles_completed
    }

    pub fn phase_remaining(&self) -> f64 {
        (self.config.phases[self.phase] - self.phase_elapsed).max(0.0)
    }

    /// Remaining session time, `None` when unbounded.
    pub fn total_remaining(&self) -> Option<f64> {
        self.config
            .total
            .as_secs()
            .map(|total| (total - self.session_elapsed).max(0.0))
    }

    pub fn snapshot(&self) -> Snapshot {
        let phases = &self.config.phases;
        let duration = phases[self.phase];
        let cycle = phases.cycle_secs();
        Snapshot {
            status: self.status,
            phase: self.phase,
            phase_elapsed_secs: self.phase_elapsed,
            phase_remaining_secs: self.phase_remaining(),
            phase_duration_secs: duration,
            phase_progress: (self.phase_elapsed / duration).clamp(0.0, 1.0),
            cycle_progress: ((phases.offset_of(self.phase) + self.phase_elapsed) / cycle)
                .clamp(0.0, 1.0),
            session_elapsed_secs: self.session_elapsed,
            total_remaining_secs: self.total_remaining(),
            cycles_completed: self.cycles_completed,
        }
    }

    /// Event announcing this session.
    pub fn started_event(&self) -> Event {
        Event::SessionStarted {
            session_id: self.session_id,
            config: self.config,
            at: Utc::now(),
        }
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Advance the clocks by `elapsed_secs`.
    ///
    /// Negative or non-finite input counts as zero. Returns the phase
    /// changes, cycle wraps and (at most once) the completion produced by
    /// this tick, in order.
    pub fn tick(&mut self, elapsed_secs: f64) -> Vec<Event> {
        let mut events = Vec::new();
        if self.status != TimerStatus::Running {
            return events;
        }

        let mut dt = if elapsed_secs.is_finite() && elapsed_secs > 0.0 {
            elapsed_secs
        } else {
            0.0
        };

        let mut completing = false;
        if let TotalDuration::Finite(total) = self.config.total {
            let left = (total - self.session_elapsed).max(0.0);
            if dt >= left {
                dt = left;
                completing = true;
            }
        }

        self.phase_elapsed += dt;
        self.session_elapsed += dt;
        self.advance_phases(completing, &mut events);

        if completing {
            if let Some(total) = self.config.total.as_secs() {
                self.session_elapsed = total;
            }
            self.status = TimerStatus::Completed;
            info!(
                session_id = %self.session_id,
                cycles = self.cycles_completed,
                "breathing session completed"
            );
            events.push(Event::SessionCompleted {
                session_elapsed_secs: self.session_elapsed,
                cycles: self.cycles_completed,
                at: Utc::now(),
            });
        }

        events
    }

    /// End the session now. Returns `None` if it had already ended.
    pub fn stop(&mut self) -> Option<Event> {
        if self.status != TimerStatus::Running {
            return None;
        }
        self.status = TimerStatus::Stopped;
        info!(
            session_id = %self.session_id,
            elapsed_secs = self.session_elapsed,
            "breathing session stopped"
        );
        Some(Event::SessionStopped {
            session_elapsed_secs: self.session_elapsed,
            cycles: self.cycles_completed,
            at: Utc::now(),
        })
    }

    // ── Internal ─────────────────────────────────────────────────────

    /// Carry overshoot across as many phase boundaries as `phase_elapsed`
    /// covers, reporting every crossing. On the completing tick, a phase
    /// ending exactly at the completion instant is left in place.
    fn advance_phases(&mut self, completing: bool, events: &mut Vec<Event>) {
        let cycle = self.config.phases.cycle_secs();
        let span = if completing {
            self.phase_elapsed - BOUNDARY_EPSILON
        } else {
            self.phase_elapsed
        };
        let whole = (span / cycle).floor();
        if whole > MAX_REPORTED_CYCLES {
            // Only the last cycle is walked phase by phase; the rest are
            // counted in a single CycleCompleted.
            let skipped = whole - 1.0;
            self.phase_elapsed = (self.phase_elapsed - skipped * cycle).max(0.0);
            self.cycles_completed += skipped as u64;
            debug!(skipped_cycles = skipped, "tick spanned many cycles");
            events.push(Event::CycleCompleted {
                cycles: self.cycles_completed,
                session_elapsed_secs: self.session_elapsed - self.phase_elapsed,
                at: Utc::now(),
            });
        }

        loop {
            let duration = self.config.phases[self.phase];
            if self.phase_elapsed < duration {
                break;
            }
            if completing && self.phase_elapsed - duration <= BOUNDARY_EPSILON {
                break;
            }

            self.phase_elapsed -= duration;
            let from = self.phase;
            self.phase = from.next();
            debug!(from = ?from, to = ?self.phase, "phase changed");
            events.push(Event::PhaseChanged {
                from,
                to: self.phase,
                session_elapsed_secs: self.session_elapsed - self.phase_elapsed,
                at: Utc::now(),
            });

            if self.phase == PhaseKind::Inhale {
                self.cycles_completed += 1;
                events.push(Event::CycleCompleted {
                    cycles: self.cycles_completed,
                    session_elapsed_secs: self.session_elapsed - self.phase_elapsed,
                    at: Utc::now(),
                });
            }
        }
    }
}
