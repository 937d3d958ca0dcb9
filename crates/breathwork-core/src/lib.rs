//! # Breathwork Core Library
//!
//! This library provides the core logic for the Breathwork guided-breathing
//! timer. All behaviour lives here; the `breathwork` CLI is a thin terminal
//! layer over it.
//!
//! ## Architecture
//!
//! - **Timer**: a delta-driven phase cycle state machine
//!   (Inhale → Hold Full → Exhale → Hold Empty → Inhale) plus a frame
//!   driver that feeds it from a real-time clock
//! - **Indicator**: cycle geometry shared by the circular and linear views
//! - **Storage**: TOML-based configuration and presets
//!
//! ## Key Components
//!
//! - [`PhaseTimer`]: Core timer state machine
//! - [`FrameDriver`]: Owned session handle, one `frame()` per rendered frame
//! - [`CycleGeometry`]: Segment and indicator placement
//! - [`Config`]: Application configuration management

pub mod error;
pub mod events;
pub mod indicator;
pub mod storage;
pub mod timer;

pub use error::{ConfigError, CoreError, ValidationError};
pub use events::Event;
pub use indicator::{CycleGeometry, IndicatorStyle, Segment};
pub use storage::{Config, PatternConfig};
pub use timer::{
    FrameDriver, PhaseDurations, PhaseKind, PhaseTimer, SessionConfig, Snapshot, SystemClock,
    TimerStatus, TotalDuration,
};
