//! Status line rendering.

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::state::AppState;

/// Renders the debug status line (F12).
pub fn render_debug_status_line(app: &AppState, frame: &mut Frame, area: Rect) {
    let snapshot = app.status_line.snapshot();
    let sequencer = &app.sequencer;
    let index = sequencer.current_index();
    let phase = sequencer
        .phase(index)
        .map_or_else(|| "-".to_string(), |phase| format!("{phase:?}"));
    let timer = sequencer
        .slideshow()
        .timer_generation()
        .map_or_else(|| "off".to_string(), |generation| format!("#{generation}"));

    let dim = Style::default().fg(Color::DarkGray);
    let line = Line::from(vec![
        Span::styled(format!(" {:>5.1} fps ", snapshot.fps), dim),
        Span::styled(
            format!(
                "│ {} {}/{} {phase} ",
                sequencer.current_kind(),
                index + 1,
                sequencer.deck().len()
            ),
            dim,
        ),
        Span::styled(
            format!(
                "│ lock {} │ epoch {} │ photo timer {timer} ",
                if sequencer.is_transitioning() { "held" } else { "free" },
                sequencer.epoch()
            ),
            dim,
        ),
        Span::styled(
            format!(
                "│ particles {} (peak {}) │ music {} ",
                app.particles.len(),
                snapshot.peak_particles,
                if app.music.playing { "on" } else { "off" }
            ),
            dim,
        ),
    ]);
    frame.render_widget(Paragraph::new(line), area);
}
