use std::io;
use std::time::Duration;

use breathwork_core::timer::{Clock, SessionSummary};
use breathwork_core::{
    Config, FrameDriver, IndicatorStyle, PatternConfig, SystemClock, TimerStatus, TotalDuration,
};
use clap::Args;
use tracing::{info, warn};

use crate::ui::headless::HeadlessUi;
use crate::ui::tui::TuiUi;
use crate::ui::{SessionUi, ViewOptions};

const MAX_FPS: u32 = 240;

#[derive(Args, Debug, Default)]
pub struct StartArgs {
    /// Inhale duration in seconds
    #[arg(long)]
    pub inhale: Option<f64>,
    /// Hold-after-inhale duration in seconds
    #[arg(long)]
    pub hold_full: Option<f64>,
    /// Exhale duration in seconds
    #[arg(long)]
    pub exhale: Option<f64>,
    /// Hold-after-exhale duration in seconds
    #[arg(long)]
    pub hold_empty: Option<f64>,
    /// Session length in seconds, or "infinite"
    #[arg(long)]
    pub total: Option<TotalDuration>,
    /// Start from a named preset (see `breathwork presets`)
    #[arg(long, short)]
    pub preset: Option<String>,
    /// Indicator style: circle or linear
    #[arg(long)]
    pub view: Option<IndicatorStyle>,
    /// Frames per second
    #[arg(long)]
    pub fps: Option<u32>,
    /// Print events as JSON lines instead of drawing the terminal UI
    #[arg(long)]
    pub headless: bool,
    /// With --headless, also print a StateSnapshot line every frame
    #[arg(long, requires = "headless")]
    pub snapshots: bool,
}

/// Pattern precedence: explicit flags, then `--preset`, then the stored
/// default preset or `[pattern]`.
fn resolve_pattern(
    config: &Config,
    args: &StartArgs,
) -> Result<PatternConfig, Box<dyn std::error::Error>> {
    let mut pattern = match &args.preset {
        Some(name) => config.preset(name)?,
        None => config.base_pattern()?,
    };
    if let Some(v) = args.inhale {
        pattern.inhale = v;
    }
    if let Some(v) = args.hold_full {
        pattern.hold_full = v;
    }
    if let Some(v) = args.exhale {
        pattern.exhale = v;
    }
    if let Some(v) = args.hold_empty {
        pattern.hold_empty = v;
    }
    if let Some(total) = args.total {
        pattern.total = total;
    }
    Ok(pattern)
}

fn frame_interval(fps: u32) -> Duration {
    Duration::from_secs_f64(1.0 / f64::from(fps.clamp(1, MAX_FPS)))
}

/// One loop for every front-end: frame, render, then wait for the next
/// frame or a stop request.
pub fn drive<U: SessionUi, C: Clock>(
    ui: &mut U,
    driver: &mut FrameDriver<C>,
    interval: Duration,
) -> io::Result<()> {
    loop {
        for event in driver.frame() {
            ui.on_event(&event)?;
        }
        ui.render(&driver.snapshot())?;
        if driver.is_finished() {
            return Ok(());
        }
        if ui.wait_for_stop(interval)? {
            if let Some(event) = driver.stop() {
                ui.on_event(&event)?;
            }
            return Ok(());
        }
    }
}

fn format_elapsed(secs: f64) -> String {
    let whole = secs.round() as u64;
    let (m, s) = (whole / 60, whole % 60);
    if m > 0 {
        format!("{m}m {s:02}s")
    } else {
        format!("{s}s")
    }
}

fn describe(summary: &SessionSummary) -> String {
    let verb = match summary.status {
        TimerStatus::Completed => "completed",
        TimerStatus::Stopped | TimerStatus::Running => "stopped",
    };
    let cycles = summary.cycles_completed;
    format!(
        "Session {verb} after {} ({cycles} cycle{})",
        format_elapsed(summary.session_elapsed_secs),
        if cycles == 1 { "" } else { "s" }
    )
}

pub fn run(args: StartArgs) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load().unwrap_or_else(|e| {
        warn!("could not load config, using defaults: {e}");
        Config::default()
    });

    let pattern = resolve_pattern(&config, &args)?;
    let session = pattern.to_session_config()?;
    let style = args.view.unwrap_or(config.display.view);
    let interval = frame_interval(args.fps.unwrap_or(config.display.fps));

    info!(
        total = %session.total,
        view = %style,
        headless = args.headless,
        "starting breathing session"
    );

    let mut driver = FrameDriver::start(session, SystemClock);
    if args.headless {
        let mut ui = HeadlessUi::new(io::stdout(), args.snapshots);
        drive(&mut ui, &mut driver, interval)?;
        ui.cleanup()?;
        // stdout carries only JSON lines
        eprintln!("{}", describe(&driver.finish()));
    } else {
        let view = ViewOptions::new(style, config.display.show_labels, &session.phases);
        let mut ui = TuiUi::new(view)?;
        let result = drive(&mut ui, &mut driver, interval);
        ui.cleanup()?;
        result?;
        println!("{}", describe(&driver.finish()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use breathwork_core::timer::ManualClock;
    use breathwork_core::{Event, PhaseDurations, SessionConfig, Snapshot};

    #[test]
    fn flags_override_preset_values() {
        let config = Config::default();
        let args = StartArgs {
            preset: Some("calm".into()),
            inhale: Some(3.0),
            total: Some(TotalDuration::Finite(60.0)),
            ..StartArgs::default()
        };
        let pattern = resolve_pattern(&config, &args).unwrap();
        assert_eq!(pattern.inhale, 3.0);
        assert_eq!(pattern.exhale, 6.0);
        assert_eq!(pattern.total, TotalDuration::Finite(60.0));
    }

    #[test]
    fn unknown_preset_is_an_error() {
        let args = StartArgs {
            preset: Some("nope".into()),
            ..StartArgs::default()
        };
        let err = resolve_pattern(&Config::default(), &args).unwrap_err();
        assert!(err.to_string().contains("nope"));
    }

    #[test]
    fn fps_is_clamped() {
        assert_eq!(frame_interval(0), Duration::from_secs(1));
        assert_eq!(frame_interval(10_000), frame_interval(MAX_FPS));
    }

    #[test]
    fn summary_reads_naturally() {
        let clock = ManualClock::new();
        let config = SessionConfig::new(PhaseDurations::box_breathing(), TotalDuration::Unbounded);
        let mut driver = FrameDriver::start(config, clock.clone());
        driver.frame();
        clock.advance_secs(20.0);
        driver.frame();
        assert_eq!(
            describe(&driver.finish()),
            "Session stopped after 20s (1 cycle)"
        );

        let driver = FrameDriver::start(config, ManualClock::new());
        assert_eq!(describe(&driver.finish()), "Session stopped after 0s (0 cycles)");
    }

    #[test]
    fn elapsed_uses_minutes_past_a_minute() {
        assert_eq!(format_elapsed(125.2), "2m 05s");
        assert_eq!(format_elapsed(59.4), "59s");
    }

    /// Records what the loop hands it and asks to stop after `stop_after`
    /// waits.
    struct RecordingUi {
        events: Vec<Event>,
        renders: Vec<Snapshot>,
        waits: usize,
        stop_after: usize,
    }

    impl SessionUi for RecordingUi {
        fn on_event(&mut self, event: &Event) -> io::Result<()> {
            self.events.push(event.clone());
            Ok(())
        }

        fn render(&mut self, snapshot: &Snapshot) -> io::Result<()> {
            self.renders.push(*snapshot);
            Ok(())
        }

        fn wait_for_stop(&mut self, _timeout: Duration) -> io::Result<bool> {
            self.waits += 1;
            Ok(self.waits >= self.stop_after)
        }
    }

    #[test]
    fn drive_stops_on_request() {
        let clock = ManualClock::new();
        let config = SessionConfig::new(PhaseDurations::box_breathing(), TotalDuration::Unbounded);
        let mut driver = FrameDriver::start(config, clock);
        let mut ui = RecordingUi {
            events: Vec::new(),
            renders: Vec::new(),
            waits: 0,
            stop_after: 3,
        };
        drive(&mut ui, &mut driver, Duration::ZERO).unwrap();
        assert_eq!(ui.renders.len(), 3);
        assert!(matches!(ui.events.first(), Some(Event::SessionStarted { .. })));
        assert!(matches!(ui.events.last(), Some(Event::SessionStopped { .. })));
        assert!(driver.is_finished());
    }
}
