use std::io::{self, Write};
use std::thread;
use std::time::Duration;

use breathwork_core::{Event, Snapshot};

use super::SessionUi;

/// Writes each timer event as one JSON line; never asks to stop.
///
/// With `snapshots` on, every rendered frame also becomes a
/// `StateSnapshot` line.
pub struct HeadlessUi<W: Write> {
    out: W,
    snapshots: bool,
}

impl<W: Write> HeadlessUi<W> {
    pub fn new(out: W, snapshots: bool) -> Self {
        Self { out, snapshots }
    }

    fn write_event(&mut self, event: &Event) -> io::Result<()> {
        serde_json::to_writer(&mut self.out, event)?;
        self.out.write_all(b"\n")?;
        self.out.flush()
    }
}

impl<W: Write> SessionUi for HeadlessUi<W> {
    fn on_event(&mut self, event: &Event) -> io::Result<()> {
        self.write_event(event)
    }

    fn render(&mut self, snapshot: &Snapshot) -> io::Result<()> {
        if self.snapshots {
            self.write_event(&Event::snapshot(*snapshot))?;
        }
        Ok(())
    }

    fn wait_for_stop(&mut self, timeout: Duration) -> io::Result<bool> {
        thread::sleep(timeout);
        Ok(false)
    }

    fn cleanup(&mut self) -> io::Result<()> {
        self.out.flush()
    }
}
