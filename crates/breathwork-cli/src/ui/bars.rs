//! Linear view: a gauge per phase, a strip for the whole cycle and a
//! session gauge when the session has an end.

use breathwork_core::{CycleGeometry, PhaseKind, Snapshot};
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Gauge, Paragraph};
use ratatui::Frame;

use super::{format_secs, phase_color, ViewOptions};

/// Fill ratio for a phase's own gauge: full once passed, live for the
/// current phase, empty otherwise.
fn phase_ratio(phase: PhaseKind, snapshot: &Snapshot) -> f64 {
    let current = snapshot.phase.index();
    let ratio = match phase.index() {
        i if i < current => 1.0,
        i if i == current => snapshot.phase_progress,
        _ => 0.0,
    };
    ratio.clamp(0.0, 1.0)
}

fn session_ratio(snapshot: &Snapshot) -> Option<f64> {
    let remaining = snapshot.total_remaining_secs?;
    let total = snapshot.session_elapsed_secs + remaining;
    if total <= 0.0 {
        return Some(1.0);
    }
    Some((snapshot.session_elapsed_secs / total).clamp(0.0, 1.0))
}

/// One cell per column, coloured by the phase under it, with a dot at the
/// indicator position.
fn cycle_strip(geometry: &CycleGeometry, snapshot: &Snapshot, width: u16) -> Line<'static> {
    let width = usize::from(width);
    if width == 0 {
        return Line::default();
    }
    let position = CycleGeometry::indicator_fraction(snapshot);
    let dot = ((position * width as f64) as usize).min(width - 1);
    let spans: Vec<Span<'static>> = (0..width)
        .map(|col| {
            let fraction = (col as f64 + 0.5) / width as f64;
            let color = phase_color(geometry.segment_at(fraction).phase);
            if col == dot {
                Span::styled(
                    "●",
                    Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
                )
            } else {
                Span::styled("━", Style::default().fg(color))
            }
        })
        .collect();
    Line::from(spans)
}

pub fn render(frame: &mut Frame, area: Rect, snapshot: &Snapshot, view: &ViewOptions) {
    let session = session_ratio(snapshot);
    let mut constraints = vec![Constraint::Length(3); PhaseKind::ALL.len()];
    constraints.push(Constraint::Length(3));
    if session.is_some() {
        constraints.push(Constraint::Length(3));
    }
    constraints.push(Constraint::Min(0));
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints(constraints)
        .split(area);

    for (row, phase) in PhaseKind::ALL.into_iter().enumerate() {
        let title = if view.show_labels {
            format!(" {} ({}) ", phase.label(), format_secs(view.phases[phase]))
        } else {
            String::new()
        };
        let mut border = Style::default().fg(phase_color(phase));
        if phase == snapshot.phase {
            border = border.add_modifier(Modifier::BOLD);
        }
        let gauge = Gauge::default()
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(border)
                    .title(title),
            )
            .gauge_style(Style::default().fg(phase_color(phase)))
            .ratio(phase_ratio(phase, snapshot))
            .label("");
        frame.render_widget(gauge, rows[row]);
    }

    let strip_area = rows[PhaseKind::ALL.len()];
    let strip = Paragraph::new(cycle_strip(
        &view.geometry,
        snapshot,
        strip_area.width.saturating_sub(2),
    ))
    .block(Block::default().borders(Borders::ALL).title(" Cycle "));
    frame.render_widget(strip, strip_area);

    if let Some(ratio) = session {
        let gauge = Gauge::default()
            .block(Block::default().borders(Borders::ALL).title(" Session "))
            .gauge_style(Style::default().fg(Color::Blue))
            .ratio(ratio);
        frame.render_widget(gauge, rows[PhaseKind::ALL.len() + 1]);
    }
}
