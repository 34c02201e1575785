//! UI effect types.
//!
//! Effects are commands returned by the reducer that the runtime executes.
//! They cover timers and audio only; the reducer never sleeps, spawns, or
//! touches a device itself.
//!
//! ## Timer Effects
//!
//! `Schedule` is one-shot: the runtime sleeps and posts `UiEvent::Deferred`.
//! The photo timer is recurring and owned by the runtime through a
//! cancellation token, so `StartSlideshowTimer` always cancels whatever timer
//! is still alive before spawning the new one.

use std::path::PathBuf;
use std::time::Duration;

use fete_core::sequencer::Deferred;
use fete_core::slideshow::TimerGeneration;

/// Effects returned by the reducer for the runtime to execute.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UiEffect {
    /// Quit the application.
    Quit,

    /// Feed `deferred` back to the sequencer after `delay`.
    Schedule { delay: Duration, deferred: Deferred },

    /// Start the recurring photo timer.
    StartSlideshowTimer {
        generation: TimerGeneration,
        period: Duration,
    },

    /// Stop the photo timer with this generation (no-op if it already stopped).
    CancelSlideshowTimer { generation: TimerGeneration },

    /// Start looping the background track.
    PlayMusic { path: Option<PathBuf> },

    StopMusic,
}
