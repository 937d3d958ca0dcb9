//! Circular view: one coloured arc per phase, clockwise from the top, with
//! a dot riding the ring at the current cycle position.

use breathwork_core::indicator::polar_to_xy;
use breathwork_core::{CycleGeometry, PhaseKind, Snapshot};
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::symbols::Marker;
use ratatui::text::Span;
use ratatui::widgets::canvas::{Canvas, Circle, Points};
use ratatui::Frame;

use super::{format_secs, phase_color, ViewOptions};

const BOUND: f64 = 1.3;
const RING_RADIUS: f64 = 1.0;
const LABEL_RADIUS: f64 = 0.72;
const DOT_RADIUS: f64 = 0.08;

/// Ring points for one arc, already flipped into canvas space (y up).
fn arc_points(start_degrees: f64, sweep_degrees: f64, radius: f64) -> Vec<(f64, f64)> {
    let steps = (sweep_degrees.ceil() as usize).max(2);
    (0..=steps)
        .map(|i| {
            let degrees = start_degrees + sweep_degrees * i as f64 / steps as f64;
            flip(polar_to_xy((0.0, 0.0), radius, degrees))
        })
        .collect()
}

fn flip((x, y): (f64, f64)) -> (f64, f64) {
    (x, -y)
}

/// Largest area inside `area` that draws as a circle rather than an oval.
/// Terminal cells are roughly twice as tall as they are wide.
fn square_area(area: Rect) -> Rect {
    let width = area.width.min(area.height.saturating_mul(2));
    let height = (width / 2).min(area.height);
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}

pub fn render(frame: &mut Frame, area: Rect, snapshot: &Snapshot, view: &ViewOptions) {
    let area = square_area(area);
    if area.width < 4 || area.height < 2 {
        return;
    }
    // Canvas units per terminal column, for centring text.
    let unit_per_col = 2.0 * BOUND / f64::from(area.width);
    let geometry = &view.geometry;

    let arcs: Vec<(PhaseKind, Vec<(f64, f64)>)> = geometry
        .segments()
        .iter()
        .map(|s| {
            (
                s.phase,
                arc_points(s.start_degrees(), s.sweep_degrees(), RING_RADIUS),
            )
        })
        .collect();
    let active: Vec<(f64, f64)> = {
        let s = geometry.segment(snapshot.phase);
        arc_points(s.start_degrees(), s.sweep_degrees(), RING_RADIUS - 0.04)
    };
    let (dot_x, dot_y) = flip(polar_to_xy(
        (0.0, 0.0),
        RING_RADIUS,
        CycleGeometry::indicator_degrees(snapshot),
    ));

    let canvas = Canvas::default()
        .marker(Marker::Braille)
        .x_bounds([-BOUND, BOUND])
        .y_bounds([-BOUND, BOUND])
        .paint(move |ctx| {
            for (phase, coords) in &arcs {
                ctx.draw(&Points {
                    coords,
                    color: phase_color(*phase),
                });
            }
            ctx.draw(&Points {
                coords: &active,
                color: phase_color(snapshot.phase),
            });
            ctx.draw(&Circle {
                x: dot_x,
                y: dot_y,
                radius: DOT_RADIUS,
                color: Color::White,
            });
            ctx.layer();

            if view.show_labels {
                for phase in PhaseKind::ALL {
                    let (x, y) = flip(geometry.label_position(phase, (0.0, 0.0), LABEL_RADIUS));
                    let label = phase.label();
                    let half = label.chars().count() as f64 * unit_per_col / 2.0;
                    let mut style = Style::default().fg(phase_color(phase));
                    if phase == snapshot.phase {
                        style = style.add_modifier(Modifier::BOLD);
                    }
                    ctx.print(x - half, y, Span::styled(label, style));
                }
            }

            let remaining = format_secs(snapshot.phase_remaining_secs);
            let half = remaining.chars().count() as f64 * unit_per_col / 2.0;
            ctx.print(
                -half,
                0.0,
                Span::styled(
                    remaining,
                    Style::default()
                        .fg(phase_color(snapshot.phase))
                        .add_modifier(Modifier::BOLD),
                ),
            );
        });

    frame.render_widget(canvas, area);
}
