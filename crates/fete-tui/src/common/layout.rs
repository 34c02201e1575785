//! Screen layout shared by the renderer and mouse hit-testing.
//!
//! Both sides compute rectangles from the same terminal size, so a click is
//! matched against exactly what was drawn without the renderer having to
//! record anything.

use ratatui::layout::{Constraint, Layout, Position, Rect};

use super::text::columns;

pub const PREV_LABEL: &str = "‹ prev";
pub const NEXT_LABEL: &str = "next ›";
pub const SURPRISE_LABEL: &str = "[ ✦ Open your surprise ✦ ]";
pub const REPLAY_LABEL: &str = "[ ↺ Replay ]";

/// Height of the debug status line (when enabled).
const DEBUG_STATUS_HEIGHT: u16 = 1;

/// Gap between two photo indicator dots.
const DOT_SPACING: u16 = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScreenLayout {
    /// Progress bar across the top.
    pub progress: Rect,
    /// Section content and particles.
    pub stage: Rect,
    /// Navigation bar with the previous/next buttons.
    pub nav: Rect,
    pub debug: Rect,
    pub prev_button: Rect,
    pub next_button: Rect,
}

impl ScreenLayout {
    pub fn new(area: Rect, show_debug_status: bool) -> Self {
        let debug_height = if show_debug_status {
            DEBUG_STATUS_HEIGHT
        } else {
            0
        };
        let [progress, stage, nav, debug] = Layout::vertical([
            Constraint::Length(1),
            Constraint::Min(1),
            Constraint::Length(1),
            Constraint::Length(debug_height),
        ])
        .areas(area);

        let prev_width = columns(PREV_LABEL).min(nav.width);
        let next_width = columns(NEXT_LABEL).min(nav.width);
        let prev_button = Rect::new(nav.x.saturating_add(1), nav.y, prev_width, nav.height)
            .intersection(nav);
        let next_button = Rect::new(
            nav.right().saturating_sub(next_width + 1),
            nav.y,
            next_width,
            nav.height,
        )
        .intersection(nav);

        Self {
            progress,
            stage,
            nav,
            debug,
            prev_button,
            next_button,
        }
    }
}

/// Centered button on the lower part of the stage.
pub fn action_button(stage: Rect, label: &str) -> Rect {
    let width = columns(label).min(stage.width);
    let x = stage.x + (stage.width - width) / 2;
    let y = stage.y + stage.height.saturating_mul(3) / 4;
    Rect::new(x, y.min(stage.bottom().saturating_sub(1)), width, 1).intersection(stage)
}

/// One single-cell rectangle per photo indicator, centered near the bottom
/// of the stage.
pub fn photo_dots(stage: Rect, count: usize) -> Vec<Rect> {
    if count == 0 || stage.height < 3 {
        return Vec::new();
    }
    let count = u16::try_from(count).unwrap_or(u16::MAX);
    let total = count.saturating_mul(DOT_SPACING).saturating_sub(1);
    let x0 = stage.x + stage.width.saturating_sub(total) / 2;
    let y = stage.bottom() - 2;
    (0..count)
        .map(|i| Rect::new(x0.saturating_add(i * DOT_SPACING), y, 1, 1))
        .filter(|dot| dot.x < stage.right())
        .collect()
}

pub fn hit(rect: Rect, col: u16, row: u16) -> bool {
    rect.contains(Position::new(col, row))
}

/// Center of `rect`, as a fraction of `area`.
pub fn center_fraction(area: Rect, rect: Rect) -> (f32, f32) {
    let width = f32::from(area.width.max(1));
    let height = f32::from(area.height.max(1));
    (
        (f32::from(rect.x.saturating_sub(area.x)) + f32::from(rect.width) / 2.0) / width,
        (f32::from(rect.y.saturating_sub(area.y)) + f32::from(rect.height) / 2.0) / height,
    )
}
