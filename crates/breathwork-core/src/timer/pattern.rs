//! Breathing pattern model: phase kinds, per-phase durations and the
//! immutable session configuration handed to the timer.

use std::fmt;
use std::ops::Index;
use std::str::FromStr;

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::ValidationError;

/// One of the four breathing sub-states.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PhaseKind {
    Inhale,
    HoldFull,
    Exhale,
    HoldEmpty,
}

impl PhaseKind {
    /// All phases in cycle order.
    pub const ALL: [PhaseKind; 4] = [
        PhaseKind::Inhale,
        PhaseKind::HoldFull,
        PhaseKind::Exhale,
        PhaseKind::HoldEmpty,
    ];

    /// The phase that follows this one; HoldEmpty wraps to Inhale.
    pub fn next(self) -> Self {
        match self {
            PhaseKind::Inhale => PhaseKind::HoldFull,
            PhaseKind::HoldFull => PhaseKind::Exhale,
            PhaseKind::Exhale => PhaseKind::HoldEmpty,
            PhaseKind::HoldEmpty => PhaseKind::Inhale,
        }
    }

    /// Position within the cycle (0..4).
    pub fn index(self) -> usize {
        match self {
            PhaseKind::Inhale => 0,
            PhaseKind::HoldFull => 1,
            PhaseKind::Exhale => 2,
            PhaseKind::HoldEmpty => 3,
        }
    }

    /// Human-readable label. Every phase has its own.
    pub fn label(self) -> &'static str {
        match self {
            PhaseKind::Inhale => "Breath In",
            PhaseKind::HoldFull => "Hold Full",
            PhaseKind::Exhale => "Breath Out",
            PhaseKind::HoldEmpty => "Hold Empty",
        }
    }

    /// Field name used in configuration files and error messages.
    pub fn key(self) -> &'static str {
        match self {
            PhaseKind::Inhale => "inhale",
            PhaseKind::HoldFull => "hold_full",
            PhaseKind::Exhale => "exhale",
            PhaseKind::HoldEmpty => "hold_empty",
        }
    }
}

impl fmt::Display for PhaseKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Named-field form of [`PhaseDurations`], as it appears in TOML and JSON.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PhaseTable {
    pub inhale: f64,
    pub hold_full: f64,
    pub exhale: f64,
    pub hold_empty: f64,
}

/// Seconds spent in each phase, keyed by [`PhaseKind`].
///
/// Every duration is finite and strictly positive; the only way to build
/// one is through [`PhaseDurations::new`] (or deserialization, which goes
/// through the same check).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "PhaseTable", into = "PhaseTable")]
pub struct PhaseDurations {
    secs: [f64; 4],
}

impl PhaseDurations {
    pub fn new(
        inhale: f64,
        hold_full: f64,
        exhale: f64,
        hold_empty: f64,
    ) -> Result<Self, ValidationError> {
        let secs = [inhale, hold_full, exhale, hold_empty];
        for kind in PhaseKind::ALL {
            let value = secs[kind.index()];
            if !(value.is_finite() && value > 0.0) {
                return Err(ValidationError::NonPositiveDuration {
                    field: kind.key().to_string(),
                    value,
                });
            }
        }
        Ok(Self { secs })
    }

    /// Equal four-second phases.
    pub fn box_breathing() -> Self {
        Self { secs: [4.0; 4] }
    }

    pub fn get(&self, kind: PhaseKind) -> f64 {
        self.secs[kind.index()]
    }

    /// Length of one full cycle in seconds.
    pub fn cycle_secs(&self) -> f64 {
        self.secs.iter().sum()
    }

    /// Seconds from the start of a cycle to the start of `kind`.
    pub fn offset_of(&self, kind: PhaseKind) -> f64 {
        self.secs[..kind.index()].iter().sum()
    }

    pub fn iter(&self) -> impl Iterator<Item = (PhaseKind, f64)> + '_ {
        PhaseKind::ALL.into_iter().map(move |kind| (kind, self.get(kind)))
    }
}

impl Default for PhaseDurations {
    fn default() -> Self {
        Self::box_breathing()
    }
}

impl Index<PhaseKind> for PhaseDurations {
    type Output = f64;

    fn index(&self, kind: PhaseKind) -> &f64 {
        &self.secs[kind.index()]
    }
}

impl TryFrom<PhaseTable> for PhaseDurations {
    type Error = ValidationError;

    fn try_from(t: PhaseTable) -> Result<Self, Self::Error> {
        Self::new(t.inhale, t.hold_full, t.exhale, t.hold_empty)
    }
}

impl From<PhaseDurations> for PhaseTable {
    fn from(d: PhaseDurations) -> Self {
        Self {
            inhale: d[PhaseKind::Inhale],
            hold_full: d[PhaseKind::HoldFull],
            exhale: d[PhaseKind::Exhale],
            hold_empty: d[PhaseKind::HoldEmpty],
        }
    }
}

const INFINITE: &str = "infinite";

/// Total session length: a positive number of seconds or unbounded.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum TotalDuration {
    Finite(f64),
    #[default]
    Unbounded,
}

impl TotalDuration {
    pub fn finite(secs: f64) -> Result<Self, ValidationError> {
        if secs.is_finite() && secs > 0.0 {
            Ok(TotalDuration::Finite(secs))
        } else {
            Err(ValidationError::NonPositiveDuration {
                field: "total".into(),
                value: secs,
            })
        }
    }

    /// Seconds, or `None` when unbounded.
    pub fn as_secs(&self) -> Option<f64> {
        match self {
            TotalDuration::Finite(secs) => Some(*secs),
            TotalDuration::Unbounded => None,
        }
    }

    pub fn is_unbounded(&self) -> bool {
        matches!(self, TotalDuration::Unbounded)
    }
}

impl FromStr for TotalDuration {
    type Err = ValidationError;

    /// Accepts a number of seconds or one of `infinite`, `inf`, `infinity`,
    /// `unbounded` (case-insensitive).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let input = s.trim().to_lowercase();
        match input.as_str() {
            INFINITE | "inf" | "infinity" | "unbounded" => Ok(TotalDuration::Unbounded),
            _ => {
                let secs: f64 = input.parse().map_err(|_| ValidationError::Unparsable {
                    input: s.to_string(),
                    expected: "seconds or 'infinite'",
                })?;
                TotalDuration::finite(secs)
            }
        }
    }
}

impl fmt::Display for TotalDuration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TotalDuration::Finite(secs) => write!(f, "{secs}"),
            TotalDuration::Unbounded => f.write_str(INFINITE),
        }
    }
}

impl Serialize for TotalDuration {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            TotalDuration::Finite(secs) => serializer.serialize_f64(*secs),
            TotalDuration::Unbounded => serializer.serialize_str(INFINITE),
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawTotal {
    Secs(f64),
    Text(String),
}

impl<'de> Deserialize<'de> for TotalDuration {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        match RawTotal::deserialize(deserializer)? {
            RawTotal::Secs(secs) => TotalDuration::finite(secs).map_err(D::Error::custom),
            RawTotal::Text(text) => text.parse().map_err(D::Error::custom),
        }
    }
}

/// Everything the timer needs to run one session. Immutable once built.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SessionConfig {
    pub phases: PhaseDurations,
    pub total: TotalDuration,
}

impl SessionConfig {
    pub fn new(phases: PhaseDurations, total: TotalDuration) -> Self {
        Self { phases, total }
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self::new(PhaseDurations::default(), TotalDuration::Unbounded)
    }
}

/// A named breathing pattern shipped with the application.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Preset {
    pub name: &'static str,
    pub description: &'static str,
    pub phases: PhaseDurations,
}

/// Built-in presets, in display order.
pub fn builtin_presets() -> Vec<Preset> {
    let preset = |name, description, secs: [f64; 4]| Preset {
        name,
        description,
        phases: PhaseDurations { secs },
    };
    vec![
        preset("box", "Equal four-second phases", [4.0, 4.0, 4.0, 4.0]),
        preset("calm", "Long exhale for winding down", [4.0, 2.0, 6.0, 2.0]),
        preset("coherent", "Slow, even breathing near six breaths a minute", [5.0, 0.5, 4.5, 0.5]),
        preset("energize", "Short, quick cycles", [2.0, 1.0, 2.0, 1.0]),
    ]
}

/// Look up a built-in preset by name (case-insensitive).
pub fn builtin_preset(name: &str) -> Option<Preset> {
    builtin_presets()
        .into_iter()
        .find(|p| p.name.eq_ignore_ascii_case(name))
}
