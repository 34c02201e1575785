//! Ctrl+C handling outside raw mode.
//!
//! While the TUI is in raw mode Ctrl+C arrives as a key event and the reducer
//! quits. Before/after that (or if raw mode could not be entered) SIGINT
//! lands here: the first one raises a flag the event loop polls, the second
//! restores the terminal and exits with status 130.

use std::sync::OnceLock;
use std::sync::atomic::{AtomicBool, Ordering};

use anyhow::{Context, Result};

static INTERRUPTED: AtomicBool = AtomicBool::new(false);
static RESTORE_HOOK: OnceLock<Box<dyn Fn() + Send + Sync>> = OnceLock::new();

/// Exit status used after an interrupt.
pub const INTERRUPTED_EXIT_CODE: i32 = 130;

#[derive(Debug)]
pub struct InterruptedError;

impl std::fmt::Display for InterruptedError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Interrupted")
    }
}

impl std::error::Error for InterruptedError {}

/// Registers the process-wide Ctrl+C handler.
///
/// # Errors
/// Returns an error if a handler is already registered.
pub fn init() -> Result<()> {
    ctrlc::set_handler(trigger).context("Failed to install Ctrl+C handler")
}

/// Records an interrupt; a second one forces exit.
pub fn trigger() {
    if INTERRUPTED.swap(true, Ordering::SeqCst) {
        // process::exit skips Drop, so restore the terminal by hand.
        if let Some(hook) = RESTORE_HOOK.get() {
            hook();
        }
        std::process::exit(INTERRUPTED_EXIT_CODE);
    }
}

pub fn is_interrupted() -> bool {
    INTERRUPTED.load(Ordering::SeqCst)
}

pub fn reset() {
    INTERRUPTED.store(false, Ordering::SeqCst);
}

/// Registers the hook run on the forced exit path. Only the first call wins.
pub fn set_restore_hook<F>(hook: F)
where
    F: Fn() + Send + Sync + 'static,
{
    let _ = RESTORE_HOOK.set(Box::new(hook));
}
