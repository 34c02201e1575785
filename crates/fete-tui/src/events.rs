//! UI event types.
//!
//! Everything the reducer reacts to arrives as a `UiEvent`: terminal input,
//! frame/tick cadence from the runtime, and timer callbacks posted to the
//! inbox by the runtime's timer tasks.

use std::time::Duration;

use crossterm::event::Event;
use fete_core::sequencer::Deferred;
use fete_core::slideshow::TimerGeneration;

#[derive(Debug, Clone)]
pub enum UiEvent {
    /// Animation heartbeat. Only ticks mark the frame dirty.
    Tick,
    /// Prepended to every batch with the current terminal size and the time
    /// elapsed since the runtime started.
    Frame {
        width: u16,
        height: u16,
        now: Duration,
    },
    Terminal(Event),
    /// A deferred sequencer step whose delay elapsed.
    Deferred(Deferred),
    /// One period of the photo auto-advance timer.
    SlideshowTick { generation: TimerGeneration },
}
