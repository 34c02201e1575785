//! Section identities and the ordered deck walked by the sequencer.
//!
//! Section-entry side effects are looked up by section *kind*, never by
//! position, so a deck can be reordered or shortened without touching the
//! sequencer.

use std::fmt;

use anyhow::{Result, bail};
use serde::{Deserialize, Serialize};

/// One full-screen stage of the greeting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SectionKind {
    Opening,
    Reveal,
    Photos,
    Message,
    Surprise,
    Closing,
}

/// Side effect dispatched when a section becomes current.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryAction {
    /// One-shot confetti burst. Safe to fire on every entry.
    ConfettiBurst,
    /// Start the recurring photo auto-advance.
    StartSlideshow,
    /// Start the character-by-character message reveal (once per session).
    RevealMessage,
    /// One-shot closing heart sequence.
    ClosingHearts,
}

impl SectionKind {
    /// Entry hook for this section, if it has one.
    pub fn entry_action(self) -> Option<EntryAction> {
        match self {
            SectionKind::Reveal => Some(EntryAction::ConfettiBurst),
            SectionKind::Photos => Some(EntryAction::StartSlideshow),
            SectionKind::Message => Some(EntryAction::RevealMessage),
            SectionKind::Closing => Some(EntryAction::ClosingHearts),
            SectionKind::Opening | SectionKind::Surprise => None,
        }
    }

    pub fn all() -> &'static [SectionKind] {
        &[
            SectionKind::Opening,
            SectionKind::Reveal,
            SectionKind::Photos,
            SectionKind::Message,
            SectionKind::Surprise,
            SectionKind::Closing,
        ]
    }

    pub fn name(self) -> &'static str {
        match self {
            SectionKind::Opening => "opening",
            SectionKind::Reveal => "reveal",
            SectionKind::Photos => "photos",
            SectionKind::Message => "message",
            SectionKind::Surprise => "surprise",
            SectionKind::Closing => "closing",
        }
    }
}

impl fmt::Display for SectionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Signed navigation step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Previous,
    Next,
}

impl Direction {
    /// Applies this step to `index`, returning `None` when the result would
    /// leave `0..len`.
    pub fn step(self, index: usize, len: usize) -> Option<usize> {
        let target = match self {
            Direction::Previous => index.checked_sub(1)?,
            Direction::Next => index.checked_add(1)?,
        };
        (target < len).then_some(target)
    }
}

/// Ordered, non-empty, immutable list of sections.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Deck {
    sections: Vec<SectionKind>,
}

impl Deck {
    /// Builds a deck from an ordered list of sections.
    ///
    /// # Errors
    /// Returns an error if `sections` is empty.
    pub fn new(sections: Vec<SectionKind>) -> Result<Self> {
        if sections.is_empty() {
            bail!("a deck needs at least one section");
        }
        Ok(Self { sections })
    }

    pub fn len(&self) -> usize {
        self.sections.len()
    }

    /// True if the deck has no sections. `Deck::new` never builds one.
    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<SectionKind> {
        self.sections.get(index).copied()
    }

    pub fn last_index(&self) -> usize {
        self.sections.len() - 1
    }

    pub fn position(&self, kind: SectionKind) -> Option<usize> {
        self.sections.iter().position(|k| *k == kind)
    }

    pub fn iter(&self) -> impl Iterator<Item = SectionKind> + '_ {
        self.sections.iter().copied()
    }
}

impl Default for Deck {
    fn default() -> Self {
        Self {
            sections: SectionKind::all().to_vec(),
        }
    }
}
