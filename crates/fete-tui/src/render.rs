//! Pure view/render functions for the TUI.
//!
//! This module contains all rendering logic. Functions here:
//! - Take `&AppState` by immutable reference
//! - Draw to a ratatui Frame
//! - Never mutate state or return effects

use ratatui::Frame;
use ratatui::layout::{Alignment, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{LineGauge, Paragraph};

use crate::common::ScreenLayout;
use crate::common::layout::{NEXT_LABEL, PREV_LABEL};
use crate::particles::spawn::PALETTE;
use crate::sections;
use crate::state::AppState;
use crate::statusline::render_debug_status_line;

/// Renders the entire TUI to the frame.
pub fn render(app: &AppState, frame: &mut Frame) {
    let layout = ScreenLayout::new(frame.area(), app.show_debug_status);

    render_progress(app, frame, layout.progress);
    sections::render_section(app, frame, layout.stage);
    // Particles float above the section content.
    frame.render_widget(app.particles.layer(app.now), layout.stage);
    render_nav(app, frame, &layout);

    if app.show_debug_status {
        render_debug_status_line(app, frame, layout.debug);
    }
}

fn render_progress(app: &AppState, frame: &mut Frame, area: Rect) {
    let sequencer = &app.sequencer;
    let gauge = LineGauge::default()
        .ratio(sequencer.progress().clamp(0.0, 1.0))
        .label(format!(
            "{}/{}",
            sequencer.current_index() + 1,
            sequencer.deck().len()
        ))
        .filled_style(Style::default().fg(PALETTE[0]))
        .unfilled_style(Style::default().add_modifier(Modifier::DIM));
    frame.render_widget(gauge, area);
}

fn render_nav(app: &AppState, frame: &mut Frame, layout: &ScreenLayout) {
    let sequencer = &app.sequencer;
    let enabled = Style::default().fg(PALETTE[3]).add_modifier(Modifier::BOLD);
    let disabled = Style::default().add_modifier(Modifier::DIM);

    let dots: Vec<Span> = (0..sequencer.deck().len())
        .map(|i| {
            if i == sequencer.current_index() {
                Span::styled("● ", Style::default().fg(PALETTE[0]))
            } else {
                Span::styled("○ ", disabled)
            }
        })
        .collect();
    frame.render_widget(
        Paragraph::new(Line::from(dots)).alignment(Alignment::Center),
        layout.nav,
    );

    let prev_style = if sequencer.can_go_previous() {
        enabled
    } else {
        disabled
    };
    let next_style = if sequencer.can_go_next() {
        enabled
    } else {
        disabled
    };
    frame.render_widget(
        Paragraph::new(Span::styled(PREV_LABEL, prev_style)),
        layout.prev_button,
    );
    frame.render_widget(
        Paragraph::new(Span::styled(NEXT_LABEL, next_style)),
        layout.next_button,
    );
}
