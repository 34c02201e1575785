//! Section content rendering.
//!
//! Only the current section is drawn. Its presentation phase picks the style:
//! a leaving section is dimmed, an entering one is drawn without emphasis
//! until its entrance finishes.

use std::time::Duration;

use fete_core::deck::SectionKind;
use fete_core::sequencer::Phase;
use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Borders, Paragraph, Wrap};

use crate::common::layout::{REPLAY_LABEL, SURPRISE_LABEL, action_button, photo_dots};
use crate::common::text::fit;
use crate::particles::spawn::{CLOSING_HEARTS, HEART_BEAT_STAGGER, PALETTE};
use crate::state::AppState;

const PINK: Color = PALETTE[0];
const GOLD: Color = PALETTE[1];
const PURPLE: Color = PALETTE[3];

/// One full heartbeat of a closing heart.
const HEART_BEAT: Duration = Duration::from_millis(1500);

const TYPING_CURSOR: &str = "▌";

pub fn render_section(app: &AppState, frame: &mut Frame, area: Rect) {
    let sequencer = &app.sequencer;
    let Some(phase) = sequencer.phase(sequencer.current_index()) else {
        return;
    };
    if phase == Phase::Hidden {
        return;
    }
    let base = phase_style(phase);

    match sequencer.current_kind() {
        SectionKind::Opening => render_opening(app, frame, area, base),
        SectionKind::Reveal => render_reveal(app, frame, area, base),
        SectionKind::Photos => render_photos(app, frame, area, base),
        SectionKind::Message => render_message(app, frame, area, base),
        SectionKind::Surprise => render_surprise(app, frame, area, base),
        SectionKind::Closing => render_closing(app, frame, area, base),
    }
}

fn phase_style(phase: Phase) -> Style {
    match phase {
        Phase::Leaving => Style::default().add_modifier(Modifier::DIM),
        Phase::Entering => Style::default().add_modifier(Modifier::ITALIC),
        Phase::Active | Phase::Hidden => Style::default(),
    }
}

/// Rect of `height` rows vertically centered in `area`.
fn middle(area: Rect, height: u16) -> Rect {
    let [_, middle, _] = Layout::vertical([
        Constraint::Fill(1),
        Constraint::Length(height.min(area.height)),
        Constraint::Fill(1),
    ])
    .areas(area);
    middle
}

fn centered_text(frame: &mut Frame, area: Rect, lines: Vec<Line<'_>>, base: Style) {
    let width = area.width.max(1);
    let height = lines
        .iter()
        .map(|line| {
            u16::try_from(line.width())
                .unwrap_or(u16::MAX)
                .div_ceil(width)
                .max(1)
        })
        .fold(0u16, u16::saturating_add);
    let paragraph = Paragraph::new(lines)
        .style(base)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true });
    frame.render_widget(paragraph, middle(area, height));
}

fn render_opening(app: &AppState, frame: &mut Frame, area: Rect, base: Style) {
    let lines = vec![
        Line::styled("✦  ✦  ✦", Style::default().fg(GOLD)),
        Line::default(),
        Line::styled(
            "A little something",
            Style::default().add_modifier(Modifier::BOLD),
        ),
        Line::from(format!("for {}", app.content.recipient)),
        Line::default(),
        Line::styled("press → to begin", Style::default().add_modifier(Modifier::DIM)),
    ];
    centered_text(frame, area, lines, base);
}

fn render_reveal(app: &AppState, frame: &mut Frame, area: Rect, base: Style) {
    let lines = vec![
        Line::styled(
            app.content.headline.clone(),
            Style::default().fg(PINK).add_modifier(Modifier::BOLD),
        ),
        Line::default(),
        Line::styled(
            app.content.recipient.clone(),
            Style::default().fg(GOLD).add_modifier(Modifier::ITALIC),
        ),
        Line::default(),
        Line::from(app.content.date.clone()),
    ];
    centered_text(frame, area, lines, base);
}

fn render_photos(app: &AppState, frame: &mut Frame, area: Rect, base: Style) {
    let reel = app.sequencer.slideshow();
    if reel.count() == 0 {
        centered_text(frame, area, vec![Line::from("No photos yet")], base);
        return;
    }

    let [_, frame_area, _] = Layout::horizontal([
        Constraint::Percentage(20),
        Constraint::Percentage(60),
        Constraint::Percentage(20),
    ])
    .areas(middle(area, 7));
    let caption = app
        .content
        .photos
        .get(reel.index())
        .map_or("", String::as_str);
    let title = format!(" Photo {}/{} ", reel.index() + 1, reel.count());
    let inner_width = frame_area.width.saturating_sub(4) as usize;
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(PINK))
        .title(title);
    let photo = Paragraph::new(vec![
        Line::default(),
        Line::styled("♥", Style::default().fg(PINK)),
        Line::default(),
        Line::from(fit(caption, inner_width)),
    ])
    .style(base)
    .alignment(Alignment::Center)
    .block(block);
    frame.render_widget(photo, frame_area);

    for (i, dot) in photo_dots(area, reel.count()).into_iter().enumerate() {
        let (glyph, style) = if i == reel.index() {
            ("●", Style::default().fg(PINK))
        } else {
            ("○", Style::default().add_modifier(Modifier::DIM))
        };
        frame.render_widget(Paragraph::new(Span::styled(glyph, style)), dot);
    }
}

fn render_message(app: &AppState, frame: &mut Frame, area: Rect, base: Style) {
    let message = app.sequencer.message();
    let mut spans = vec![Span::raw(message.visible_text())];
    if message.cursor_visible() {
        spans.push(Span::styled(TYPING_CURSOR, Style::default().fg(PINK)));
    }

    let [_, column, _] = Layout::horizontal([
        Constraint::Percentage(15),
        Constraint::Percentage(70),
        Constraint::Percentage(15),
    ])
    .areas(area);
    let [_, body, _] = Layout::vertical([
        Constraint::Length(1),
        Constraint::Min(3),
        Constraint::Length(1),
    ])
    .areas(column);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(PURPLE))
        .title(" A letter for you ");
    let paragraph = Paragraph::new(Line::from(spans))
        .style(base)
        .wrap(Wrap { trim: false })
        .block(block);
    frame.render_widget(paragraph, body);
}

fn render_surprise(app: &AppState, frame: &mut Frame, area: Rect, base: Style) {
    let surprise = app.sequencer.surprise();

    if surprise.message_visible() {
        let lines = vec![
            Line::styled(
                "Surprise!",
                Style::default().fg(GOLD).add_modifier(Modifier::BOLD),
            ),
            Line::default(),
            Line::from(app.content.surprise_message.clone()),
        ];
        centered_text(frame, area, lines, base);
    } else {
        let [prompt, _] =
            Layout::vertical([Constraint::Percentage(50), Constraint::Fill(1)]).areas(area);
        centered_text(
            frame,
            prompt,
            vec![Line::from("One more thing…")],
            base.add_modifier(Modifier::ITALIC),
        );
    }

    if surprise.button_visible() {
        let style = if surprise.button_pressed() {
            Style::default().fg(Color::Black).bg(GOLD)
        } else {
            Style::default().fg(GOLD).add_modifier(Modifier::BOLD)
        };
        let button = Paragraph::new(Span::styled(SURPRISE_LABEL, style));
        frame.render_widget(button, action_button(area, SURPRISE_LABEL));
    }
}

fn render_closing(app: &AppState, frame: &mut Frame, area: Rect, base: Style) {
    let lines = vec![
        Line::styled(
            app.content.closing_note.clone(),
            Style::default().fg(PINK).add_modifier(Modifier::BOLD),
        ),
        Line::default(),
        hearts_line(app.closing_hearts_since, app.now),
    ];
    centered_text(frame, area, lines, base);

    let button = Paragraph::new(Span::styled(
        REPLAY_LABEL,
        Style::default().fg(PURPLE).add_modifier(Modifier::BOLD),
    ));
    frame.render_widget(button, action_button(area, REPLAY_LABEL));
}

/// Closing hearts: heart `i` starts beating `i * 200ms` after the section was
/// entered, then pulses once per beat.
fn hearts_line(since: Option<Duration>, now: Duration) -> Line<'static> {
    let mut spans = Vec::with_capacity(CLOSING_HEARTS * 2);
    for i in 0..CLOSING_HEARTS {
        let start = since.map(|since| since + HEART_BEAT_STAGGER * i as u32);
        let span = match start.and_then(|start| now.checked_sub(start)) {
            Some(age) => {
                let beat = age.as_millis() % HEART_BEAT.as_millis();
                let style = if beat < 300 {
                    Style::default().fg(PINK).add_modifier(Modifier::BOLD)
                } else {
                    Style::default().fg(PINK)
                };
                Span::styled("♥", style)
            }
            None => Span::styled("♡", Style::default().add_modifier(Modifier::DIM)),
        };
        if i > 0 {
            spans.push(Span::raw(" "));
        }
        spans.push(span);
    }
    Line::from(spans)
}
