//! Core library for fete: the section sequencer and everything it drives.
//!
//! Nothing in this crate touches the terminal or spawns tasks. Time only
//! enters through the deferred steps the host feeds back to the sequencer.

pub mod config;
pub mod deck;
pub mod gesture;
pub mod interrupt;
pub mod logging;
pub mod sequencer;
pub mod slideshow;
pub mod surprise;
pub mod typewriter;
