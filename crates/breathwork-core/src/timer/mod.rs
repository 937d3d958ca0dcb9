mod driver;
mod engine;
mod pattern;

pub use driver::{Clock, FrameDriver, ManualClock, SessionSummary, SystemClock};
pub use engine::{PhaseTimer, Snapshot, TimerStatus};
pub use pattern::{
    builtin_preset, builtin_presets, PhaseDurations, PhaseKind, PhaseTable, Preset,
    SessionConfig, TotalDuration,
};
