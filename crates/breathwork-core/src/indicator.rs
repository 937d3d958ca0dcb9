//! Indicator geometry shared by every renderer.
//!
//! A cycle is laid out as four consecutive segments, one per phase, sized
//! in proportion to the phase durations. Circular renderers read the
//! segments as arcs, linear ones as bar spans; both place the indicator at
//! [`Snapshot::cycle_progress`].
//!
//! Angles are in degrees, 0° at 12 o'clock, growing clockwise. The screen
//! offset is applied in one place, [`polar_to_xy`].

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::timer::{PhaseDurations, PhaseKind, Snapshot};

/// How the session indicator is drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IndicatorStyle {
    #[default]
    Circle,
    Linear,
}

impl FromStr for IndicatorStyle {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "circle" | "circular" | "dial" => Ok(IndicatorStyle::Circle),
            "linear" | "bar" | "bars" => Ok(IndicatorStyle::Linear),
            _ => Err(ValidationError::Unparsable {
                input: s.to_string(),
                expected: "'circle' or 'linear'",
            }),
        }
    }
}

impl fmt::Display for IndicatorStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IndicatorStyle::Circle => f.write_str("circle"),
            IndicatorStyle::Linear => f.write_str("linear"),
        }
    }
}

/// One phase's share of the cycle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Segment {
    pub phase: PhaseKind,
    /// Where the phase starts, as a fraction of the cycle.
    pub start_fraction: f64,
    /// How much of the cycle the phase covers.
    pub span_fraction: f64,
}

impl Segment {
    pub fn end_fraction(&self) -> f64 {
        self.start_fraction + self.span_fraction
    }

    pub fn start_degrees(&self) -> f64 {
        self.start_fraction * 360.0
    }

    pub fn sweep_degrees(&self) -> f64 {
        self.span_fraction * 360.0
    }

    pub fn mid_degrees(&self) -> f64 {
        (self.start_fraction + self.span_fraction / 2.0) * 360.0
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CycleGeometry {
    segments: [Segment; 4],
}

impl CycleGeometry {
    pub fn new(phases: &PhaseDurations) -> Self {
        let cycle = phases.cycle_secs();
        let segments = PhaseKind::ALL.map(|phase| Segment {
            phase,
            start_fraction: phases.offset_of(phase) / cycle,
            span_fraction: phases[phase] / cycle,
        });
        Self { segments }
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    pub fn segment(&self, phase: PhaseKind) -> &Segment {
        &self.segments[phase.index()]
    }

    /// The segment covering `fraction` of the cycle (clamped to `0..=1`).
    pub fn segment_at(&self, fraction: f64) -> &Segment {
        let fraction = fraction.clamp(0.0, 1.0);
        self.segments
            .iter()
            .find(|s| fraction < s.end_fraction())
            .unwrap_or(&self.segments[3])
    }

    /// Indicator position as a fraction of the cycle.
    pub fn indicator_fraction(snapshot: &Snapshot) -> f64 {
        snapshot.cycle_progress.clamp(0.0, 1.0)
    }

    pub fn indicator_degrees(snapshot: &Snapshot) -> f64 {
        Self::indicator_fraction(snapshot) * 360.0
    }

    /// Midpoint of a phase's arc at `radius`, in screen coordinates.
    pub fn label_position(&self, phase: PhaseKind, center: (f64, f64), radius: f64) -> (f64, f64) {
        polar_to_xy(center, radius, self.segment(phase).mid_degrees())
    }
}

/// Convert a clockwise-from-top angle to screen coordinates (y grows down).
pub fn polar_to_xy(center: (f64, f64), radius: f64, degrees: f64) -> (f64, f64) {
    let radians = (degrees - 90.0).to_radians();
    (
        center.0 + radius * radians.cos(),
        center.1 + radius * radians.sin(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::timer::{PhaseTimer, SessionConfig, TotalDuration};

    const EPS: f64 = 1e-9;

    fn close(a: (f64, f64), b: (f64, f64)) -> bool {
        (a.0 - b.0).abs() < EPS && (a.1 - b.1).abs() < EPS
    }

    fn durations() -> PhaseDurations {
        PhaseDurations::new(4.0, 2.0, 4.0, 2.0).unwrap()
    }

    #[test]
    fn segments_cover_the_full_circle_in_order() {
        let geometry = CycleGeometry::new(&durations());
        let total: f64 = geometry.segments().iter().map(Segment::sweep_degrees).sum();
        assert!((total - 360.0).abs() < EPS);

        let hold_full = geometry.segment(PhaseKind::HoldFull);
        assert!((hold_full.start_degrees() - 120.0).abs() < EPS);
        assert!((hold_full.sweep_degrees() - 60.0).abs() < EPS);
        assert!((geometry.segment(PhaseKind::HoldEmpty).end_fraction() - 1.0).abs() < EPS);
    }

    #[test]
    fn polar_zero_points_up_and_ninety_points_right() {
        assert!(close(polar_to_xy((100.0, 100.0), 90.0, 0.0), (100.0, 10.0)));
        assert!(close(polar_to_xy((100.0, 100.0), 90.0, 90.0), (190.0, 100.0)));
        assert!(close(polar_to_xy((0.0, 0.0), 1.0, 180.0), (0.0, 1.0)));
    }

    #[test]
    fn indicator_tracks_cycle_progress() {
        let config = SessionConfig::new(durations(), TotalDuration::Unbounded);
        let mut timer = PhaseTimer::new(config);
        assert_eq!(CycleGeometry::indicator_degrees(&timer.snapshot()), 0.0);

        timer.tick(6.0);
        assert!((CycleGeometry::indicator_degrees(&timer.snapshot()) - 180.0).abs() < EPS);
    }

    #[test]
    fn label_sits_mid_arc() {
        let geometry = CycleGeometry::new(&PhaseDurations::box_breathing());
        // Inhale spans 0..90 degrees, so its label sits at 45.
        let (x, y) = geometry.label_position(PhaseKind::Inhale, (0.0, 0.0), 1.0);
        let expected = polar_to_xy((0.0, 0.0), 1.0, 45.0);
        assert!(close((x, y), expected));
        assert!(x > 0.0 && y < 0.0);
    }

    #[test]
    fn segment_at_maps_fractions_to_phases() {
        let geometry = CycleGeometry::new(&durations());
        assert_eq!(geometry.segment_at(0.0).phase, PhaseKind::Inhale);
        assert_eq!(geometry.segment_at(0.4).phase, PhaseKind::HoldFull);
        assert_eq!(geometry.segment_at(0.6).phase, PhaseKind::Exhale);
        assert_eq!(geometry.segment_at(0.99).phase, PhaseKind::HoldEmpty);
        assert_eq!(geometry.segment_at(1.0).phase, PhaseKind::HoldEmpty);
    }

    #[test]
    fn style_parses_aliases() {
        assert_eq!("dial".parse::<IndicatorStyle>().unwrap(), IndicatorStyle::Circle);
        assert_eq!("Linear".parse::<IndicatorStyle>().unwrap(), IndicatorStyle::Linear);
        assert!("hexagon".parse::<IndicatorStyle>().is_err());
    }
}
