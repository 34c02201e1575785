//! Feature slices of the TUI.

pub mod particles;
pub mod sections;
pub mod statusline;
