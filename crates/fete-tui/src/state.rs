//! Application state composition.
//!
//! ```text
//! AppState
//! ├── sequencer: Sequencer      (sections, lock, reel, message, surprise)
//! ├── content: Content          (texts from config)
//! ├── particles: ParticleField  (all live decorations)
//! ├── ambience: Ambience        (periodic heart / ambient spawns)
//! ├── swipe: SwipeTracker       (mouse drag in progress)
//! ├── music: MusicState         (toggle flag + track)
//! └── status_line               (debug bar counters)
//! ```
//!
//! The reducer is the only writer. The renderer reads it by shared reference.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::Result;
use fete_core::config::Config;
use fete_core::gesture::SwipeTracker;
use fete_core::sequencer::Sequencer;
use rand::SeedableRng;
use rand::rngs::StdRng;
use ratatui::layout::Rect;

use crate::common::ScreenLayout;
use crate::features::particles::ParticleField;
use crate::features::particles::spawn::{AMBIENT_PERIOD, HEART_PERIOD};
use crate::statusline::StatusLineAccumulator;

/// Texts shown by the sections, taken from config.
#[derive(Debug, Clone)]
pub struct Content {
    pub recipient: String,
    pub date: String,
    pub headline: String,
    pub surprise_message: String,
    pub closing_note: String,
    pub photos: Vec<String>,
}

impl Content {
    pub fn from_config(config: &Config) -> Self {
        Self {
            recipient: config.recipient.clone(),
            date: config.date.clone(),
            headline: config.headline.clone(),
            surprise_message: config.surprise_message.clone(),
            closing_note: config.closing_note.clone(),
            photos: config.photos.clone(),
        }
    }
}

/// Due times of the session-long periodic spawners.
#[derive(Debug, Clone, Copy)]
pub struct Ambience {
    pub next_heart: Duration,
    pub next_ambient: Duration,
}

impl Default for Ambience {
    fn default() -> Self {
        Self {
            next_heart: HEART_PERIOD,
            next_ambient: AMBIENT_PERIOD,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct MusicState {
    pub playing: bool,
    pub track: Option<PathBuf>,
}

pub struct AppState {
    pub sequencer: Sequencer,
    pub content: Content,
    pub particles: ParticleField,
    pub ambience: Ambience,
    pub swipe: SwipeTracker,
    pub music: MusicState,
    pub status_line: StatusLineAccumulator,
    pub show_debug_status: bool,
    pub should_quit: bool,
    /// Time since the runtime started, refreshed by every `Frame` event.
    pub now: Duration,
    /// Terminal size from the last `Frame` event.
    pub size: (u16, u16),
    /// When the closing hearts started beating.
    pub closing_hearts_since: Option<Duration>,
    pub(crate) rng: StdRng,
}

impl AppState {
    /// Creates the state for a new session.
    ///
    /// # Errors
    /// Returns an error if the configured deck is empty.
    pub fn new(config: &Config) -> Result<Self> {
        Self::with_rng(config, StdRng::from_os_rng())
    }

    /// Creates the state with a caller-provided random source.
    ///
    /// # Errors
    /// Returns an error if the configured deck is empty.
    pub fn with_rng(config: &Config, rng: StdRng) -> Result<Self> {
        Ok(Self {
            sequencer: Sequencer::from_config(config)?,
            content: Content::from_config(config),
            particles: ParticleField::default(),
            ambience: Ambience::default(),
            swipe: SwipeTracker::new(config.swipe_threshold),
            music: MusicState {
                playing: false,
                track: config.music.clone(),
            },
            status_line: StatusLineAccumulator::new(),
            show_debug_status: false,
            should_quit: false,
            now: Duration::ZERO,
            size: (0, 0),
            closing_hearts_since: None,
            rng,
        })
    }

    pub fn area(&self) -> Rect {
        Rect::new(0, 0, self.size.0, self.size.1)
    }

    /// Layout of the last frame, for hit-testing.
    pub fn layout(&self) -> ScreenLayout {
        ScreenLayout::new(self.area(), self.show_debug_status)
    }
}
