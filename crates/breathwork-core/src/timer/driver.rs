//! Frame driver: turns a real-time clock into timer ticks.
//!
//! A [`FrameDriver`] is the owned handle for one running session. The
//! presentation loop calls [`FrameDriver::frame`] once per rendered frame;
//! the first frame only records a baseline. Dropping the handle while the
//! session is still running stops it.

use std::cell::Cell;
use std::rc::Rc;
use std::time::{Duration, Instant};

use serde::Serialize;
use tracing::debug;
use uuid::Uuid;

use super::engine::{PhaseTimer, Snapshot, TimerStatus};
use super::pattern::SessionConfig;
use crate::events::Event;

/// Monotonic time source.
pub trait Clock {
    fn now(&self) -> Instant;
}

/// Wall clock backed by [`Instant::now`].
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

/// Hand-advanced clock for tests and deterministic replay.
///
/// Clones share the same time, so a test can keep one and hand another to
/// the driver.
#[derive(Debug, Clone)]
pub struct ManualClock {
    now: Rc<Cell<Instant>>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self {
            now: Rc::new(Cell::new(Instant::now())),
        }
    }

    pub fn advance(&self, by: Duration) {
        self.now.set(self.now.get() + by);
    }

    /// Negative or non-finite amounts leave the clock where it is.
    pub fn advance_secs(&self, secs: f64) {
        if secs.is_finite() && secs > 0.0 {
            self.advance(Duration::from_secs_f64(secs));
        }
    }
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Instant {
        self.now.get()
    }
}

/// Outcome of a finished session.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SessionSummary {
    pub session_id: Uuid,
    pub status: TimerStatus,
    pub session_elapsed_secs: f64,
    pub cycles_completed: u64,
    pub frames: u64,
}

/// Owned handle for one session, driven frame by frame.
#[derive(Debug)]
pub struct FrameDriver<C: Clock = SystemClock> {
    timer: PhaseTimer,
    clock: C,
    last_frame: Option<Instant>,
    frames: u64,
}

impl<C: Clock> FrameDriver<C> {
    pub fn start(config: SessionConfig, clock: C) -> Self {
        let timer = PhaseTimer::new(config);
        debug!(session_id = %timer.session_id(), "frame driver started");
        Self {
            timer,
            clock,
            last_frame: None,
            frames: 0,
        }
    }

    /// Advance by the time since the previous frame.
    ///
    /// The first frame emits `SessionStarted` and advances nothing.
    pub fn frame(&mut self) -> Vec<Event> {
        let now = self.clock.now();
        let events = match self.last_frame {
            None => vec![self.timer.started_event()],
            Some(last) => self
                .timer
                .tick(now.saturating_duration_since(last).as_secs_f64()),
        };
        self.last_frame = Some(now);
        self.frames += 1;
        events
    }

    pub fn snapshot(&self) -> Snapshot {
        self.timer.snapshot()
    }

    pub fn timer(&self) -> &PhaseTimer {
        &self.timer
    }

    pub fn is_finished(&self) -> bool {
        self.timer.is_finished()
    }

    pub fn stop(&mut self) -> Option<Event> {
        self.timer.stop()
    }

    pub fn summary(&self) -> SessionSummary {
        SessionSummary {
            session_id: self.timer.session_id(),
            status: self.timer.status(),
            session_elapsed_secs: self.timer.session_elapsed(),
            cycles_completed: self.timer.cycles_completed(),
            frames: self.frames,
        }
    }

    /// Release the handle, stopping the session if it is still running.
    pub fn finish(mut self) -> SessionSummary {
        self.timer.stop();
        self.summary()
    }
}

impl<C: Clock> Drop for FrameDriver<C> {
    fn drop(&mut self) {
        if self.timer.stop().is_some() {
            debug!(session_id = %self.timer.session_id(), "session handle dropped while running");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::timer::pattern::{PhaseDurations, PhaseKind, TotalDuration};

    fn config(total: TotalDuration) -> SessionConfig {
        SessionConfig::new(PhaseDurations::new(1.0, 1.0, 1.0, 1.0).unwrap(), total)
    }

    #[test]
    fn first_frame_is_a_baseline() {
        let clock = ManualClock::new();
        let mut driver = FrameDriver::start(config(TotalDuration::Unbounded), clock.clone());
        clock.advance_secs(0.5);
        let events = driver.frame();
        assert_eq!(events.len(), 1);
        assert!(matches!(events[0], Event::SessionStarted { .. }));
        assert_eq!(driver.timer().session_elapsed(), 0.0);
    }

    #[test]
    fn later_frames_tick_by_clock_delta() {
        let clock = ManualClock::new();
        let mut driver = FrameDriver::start(config(TotalDuration::Unbounded), clock.clone());
        driver.frame();
        clock.advance_secs(0.25);
        driver.frame();
        clock.advance_secs(1.0);
        let events = driver.frame();
        assert!((driver.timer().session_elapsed() - 1.25).abs() < 1e-9);
        assert_eq!(driver.snapshot().phase, PhaseKind::HoldFull);
        assert!(events
            .iter()
            .any(|e| matches!(e, Event::PhaseChanged { to: PhaseKind::HoldFull, .. })));
    }

    #[test]
    fn finishes_when_total_reached() {
        let clock = ManualClock::new();
        let mut driver = FrameDriver::start(config(TotalDuration::Finite(2.0)), clock.clone());
        driver.frame();
        clock.advance_secs(3.0);
        let events = driver.frame();
        assert!(driver.is_finished());
        assert!(events.iter().any(Event::is_terminal));

        let summary = driver.finish();
        assert_eq!(summary.status, TimerStatus::Completed);
        assert_eq!(summary.session_elapsed_secs, 2.0);
        assert_eq!(summary.frames, 2);
    }

    #[test]
    fn finish_stops_a_running_session() {
        let clock = ManualClock::new();
        let mut driver = FrameDriver::start(config(TotalDuration::Unbounded), clock.clone());
        driver.frame();
        clock.advance_secs(1.5);
        driver.frame();
        let summary = driver.finish();
        assert_eq!(summary.status, TimerStatus::Stopped);
        assert!((summary.session_elapsed_secs - 1.5).abs() < 1e-9);
    }

    #[test]
    fn manual_clock_ignores_bad_amounts() {
        let clock = ManualClock::new();
        let start = clock.now();
        clock.advance_secs(-1.0);
        clock.advance_secs(f64::NAN);
        clock.advance_secs(f64::INFINITY);
        assert_eq!(clock.now(), start);
        clock.advance_secs(0.5);
        assert_eq!(clock.now() - start, Duration::from_millis(500));
    }

    #[test]
    fn frames_after_stop_do_not_advance() {
        let clock = ManualClock::new();
        let mut driver = FrameDriver::start(config(TotalDuration::Unbounded), clock.clone());
        driver.frame();
        assert!(driver.stop().is_some());
        clock.advance_secs(5.0);
        assert!(driver.frame().is_empty());
        assert_eq!(driver.timer().session_elapsed(), 0.0);
    }
}
