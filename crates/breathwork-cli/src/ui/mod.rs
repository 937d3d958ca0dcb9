//! Session front-ends.
//!
//! Both the interactive terminal view and the headless JSON stream sit
//! behind [`SessionUi`], so `commands::session::drive` runs one loop for
//! either.

pub mod bars;
pub mod dial;
pub mod headless;
pub mod tui;

use std::io;
use std::time::Duration;

use breathwork_core::{CycleGeometry, Event, IndicatorStyle, PhaseDurations, PhaseKind, Snapshot};
use ratatui::style::Color;

pub trait SessionUi {
    /// Called for every event the timer emits, in order.
    fn on_event(&mut self, event: &Event) -> io::Result<()>;

    /// Called once per frame after the events of that frame.
    fn render(&mut self, snapshot: &Snapshot) -> io::Result<()>;

    /// Block for up to `timeout`; returns true if the user asked to stop.
    fn wait_for_stop(&mut self, timeout: Duration) -> io::Result<bool>;

    fn cleanup(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// What the interactive view needs to know besides the snapshot.
#[derive(Debug, Clone)]
pub struct ViewOptions {
    pub style: IndicatorStyle,
    pub show_labels: bool,
    pub phases: PhaseDurations,
    pub geometry: CycleGeometry,
}

impl ViewOptions {
    pub fn new(style: IndicatorStyle, show_labels: bool, phases: &PhaseDurations) -> Self {
        Self {
            style,
            show_labels,
            phases: *phases,
            geometry: CycleGeometry::new(phases),
        }
    }
}

pub fn phase_color(phase: PhaseKind) -> Color {
    match phase {
        PhaseKind::Inhale => Color::Cyan,
        PhaseKind::HoldFull => Color::Green,
        PhaseKind::Exhale => Color::Magenta,
        PhaseKind::HoldEmpty => Color::Yellow,
    }
}

/// Seconds with one decimal, e.g. `3.2s`.
pub fn format_secs(secs: f64) -> String {
    format!("{:.1}s", secs.max(0.0))
}
