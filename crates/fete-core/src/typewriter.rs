//! Character-by-character message reveal.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RevealPhase {
    NotStarted,
    Typing,
    Done,
}

/// Outcome of one typing step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeStep {
    /// A character was revealed; schedule the next step.
    Typed,
    /// Nothing was left to reveal; the message is now complete.
    Finished,
    /// Not typing (never started, already done, or reset).
    Idle,
}

#[derive(Debug, Clone)]
pub struct MessageReveal {
    text: String,
    /// Byte offset of the revealed prefix (always on a char boundary).
    shown: usize,
    phase: RevealPhase,
    cursor_visible: bool,
}

impl MessageReveal {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            shown: 0,
            phase: RevealPhase::NotStarted,
            cursor_visible: true,
        }
    }

    /// Starts typing. Returns false if the reveal already ran (or is running).
    pub fn start(&mut self) -> bool {
        if self.phase != RevealPhase::NotStarted {
            return false;
        }
        self.phase = RevealPhase::Typing;
        self.shown = 0;
        true
    }

    pub fn type_next(&mut self) -> TypeStep {
        if self.phase != RevealPhase::Typing {
            return TypeStep::Idle;
        }
        match self.text[self.shown..].chars().next() {
            Some(c) => {
                self.shown += c.len_utf8();
                TypeStep::Typed
            }
            None => {
                self.phase = RevealPhase::Done;
                TypeStep::Finished
            }
        }
    }

    pub fn hide_cursor(&mut self) {
        if self.phase == RevealPhase::Done {
            self.cursor_visible = false;
        }
    }

    /// Clears the rendered text and allows the reveal to run again.
    pub fn reset(&mut self) {
        self.shown = 0;
        self.phase = RevealPhase::NotStarted;
        self.cursor_visible = true;
    }

    pub fn visible_text(&self) -> &str {
        &self.text[..self.shown]
    }

    pub fn full_text(&self) -> &str {
        &self.text
    }

    pub fn phase(&self) -> RevealPhase {
        self.phase
    }

    pub fn is_complete(&self) -> bool {
        self.phase == RevealPhase::Done
    }

    pub fn cursor_visible(&self) -> bool {
        self.cursor_visible
    }
}
