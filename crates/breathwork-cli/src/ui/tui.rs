//! Full-screen terminal view.
//!
//! `TuiUi` owns the terminal for the life of the session: raw mode and the
//! alternate screen are entered in `new` and left in `cleanup`, which also
//! runs on drop so an early return or panic still hands the terminal back.

use std::io::{self, Stdout};
use std::time::Duration;

use breathwork_core::{Event, IndicatorStyle, Snapshot};
use crossterm::{
    event::{self, Event as TermEvent, KeyCode, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Paragraph};

use super::{bars, dial, format_secs, phase_color, SessionUi, ViewOptions};

pub struct TuiUi {
    terminal: Option<Terminal<CrosstermBackend<Stdout>>>,
    view: ViewOptions,
}

impl TuiUi {
    pub fn new(view: ViewOptions) -> io::Result<Self> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        if let Err(e) = execute!(stdout, EnterAlternateScreen) {
            disable_raw_mode().ok();
            return Err(e);
        }
        let mut terminal = Terminal::new(CrosstermBackend::new(stdout))?;
        terminal.hide_cursor()?;
        terminal.clear()?;
        Ok(Self {
            terminal: Some(terminal),
            view,
        })
    }
}

fn is_stop_key(code: KeyCode, modifiers: KeyModifiers) -> bool {
    match code {
        KeyCode::Char('q') | KeyCode::Esc => true,
        KeyCode::Char('c') => modifiers.contains(KeyModifiers::CONTROL),
        _ => false,
    }
}

fn status_line(snapshot: &Snapshot) -> Line<'static> {
    let dim = Style::default().fg(Color::DarkGray);
    let mut spans = vec![
        Span::styled("Time in phase ", dim),
        Span::raw(format_secs(snapshot.phase_remaining_secs)),
    ];
    if let Some(remaining) = snapshot.total_remaining_secs {
        spans.push(Span::styled("   Total remaining ", dim));
        spans.push(Span::raw(format_secs(remaining)));
    }
    spans.push(Span::styled("   Cycles ", dim));
    spans.push(Span::raw(snapshot.cycles_completed.to_string()));
    spans.push(Span::styled("   q / Esc to stop", dim));
    Line::from(spans)
}

fn draw(frame: &mut Frame, snapshot: &Snapshot, view: &ViewOptions) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Min(0),    // Indicator
            Constraint::Length(1), // Status bar
        ])
        .split(frame.area());

    let color = phase_color(snapshot.phase);
    let header = Paragraph::new(Line::from(Span::styled(
        snapshot.phase.label(),
        Style::default().fg(color).add_modifier(Modifier::BOLD),
    )))
    .alignment(Alignment::Center)
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(color))
            .title(" breathwork "),
    );
    frame.render_widget(header, chunks[0]);

    match view.style {
        IndicatorStyle::Circle => dial::render(frame, chunks[1], snapshot, view),
        IndicatorStyle::Linear => bars::render(frame, chunks[1], snapshot, view),
    }

    frame.render_widget(Paragraph::new(status_line(snapshot)), chunks[2]);
}

impl SessionUi for TuiUi {
    fn on_event(&mut self, event: &Event) -> io::Result<()> {
        tracing::trace!(?event, "timer event");
        Ok(())
    }

    fn render(&mut self, snapshot: &Snapshot) -> io::Result<()> {
        let view = &self.view;
        if let Some(terminal) = self.terminal.as_mut() {
            terminal.draw(|frame| draw(frame, snapshot, view))?;
        }
        Ok(())
    }

    fn wait_for_stop(&mut self, timeout: Duration) -> io::Result<bool> {
        if event::poll(timeout)? {
            if let TermEvent::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press && is_stop_key(key.code, key.modifiers) {
                    return Ok(true);
                }
            }
        }
        Ok(false)
    }

    fn cleanup(&mut self) -> io::Result<()> {
        if let Some(mut terminal) = self.terminal.take() {
            disable_raw_mode()?;
            execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
            terminal.show_cursor()?;
        }
        Ok(())
    }
}

impl Drop for TuiUi {
    fn drop(&mut self) {
        let _ = self.cleanup();
    }
}
