//! Shared helpers for rendering and hit-testing.

pub mod layout;
pub mod text;

pub use layout::ScreenLayout;
