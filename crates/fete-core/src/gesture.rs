//! Horizontal swipe recognition.

use crate::deck::Direction;

/// Tracks a press/release pair and turns a long enough horizontal drag into
/// a navigation direction.
///
/// Dragging towards the left means "next"; dragging towards the right means
/// "previous". Movement shorter than the threshold is ignored, as is a
/// release without a recorded press.
#[derive(Debug, Clone, Copy)]
pub struct SwipeTracker {
    threshold: u16,
    start_x: Option<u16>,
}

impl SwipeTracker {
    pub fn new(threshold: u16) -> Self {
        Self {
            threshold,
            start_x: None,
        }
    }

    pub fn press(&mut self, x: u16) {
        self.start_x = Some(x);
    }

    /// Ends the gesture, returning the swipe direction if the drag was long
    /// enough.
    pub fn release(&mut self, x: u16) -> Option<Direction> {
        let start = self.start_x.take()?;
        classify(start, x, self.threshold)
    }

    pub fn is_tracking(&self) -> bool {
        self.start_x.is_some()
    }
}

/// Classifies a drag from `start` to `end`.
///
/// The distance must strictly exceed `threshold`.
pub fn classify(start: u16, end: u16, threshold: u16) -> Option<Direction> {
    if u32::from(end) + u32::from(threshold) < u32::from(start) {
        Some(Direction::Next)
    } else if u32::from(end) > u32::from(start) + u32::from(threshold) {
        Some(Direction::Previous)
    } else {
        None
    }
}
