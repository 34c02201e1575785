//! Status line feature slice.
//!
//! Debug bar (toggled with F12) showing frame rate next to the sequencer's
//! internals: current section and phase, lock, epoch, photo timer and
//! particle count.
//!
//! ## Module Structure
//!
//! - `state.rs`: StatusLineAccumulator (mutable counters) and StatusLine (immutable snapshot)
//! - `render.rs`: Status line rendering

mod render;
mod state;

pub use render::render_debug_status_line;
pub use state::{StatusLine, StatusLineAccumulator};
