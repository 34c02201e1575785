//! Full-screen terminal rendition of the fete greeting.

pub mod common;
pub mod effects;
pub mod events;
pub mod features;
pub mod render;
pub mod runtime;
pub mod state;
pub mod terminal;
pub mod update;

use std::io::{IsTerminal, stdout};

use anyhow::Result;
pub use features::{particles, sections, statusline};
use fete_core::config::Config;
pub use runtime::TuiRuntime;
use tracing::info;

/// Runs the experience until the user quits.
///
/// Must be called from within a tokio runtime: timers are tokio tasks.
///
/// # Errors
/// Returns an error if stdout is not a terminal, the config describes an
/// empty deck, or the terminal fails.
pub async fn run_experience(config: &Config) -> Result<()> {
    if !stdout().is_terminal() {
        anyhow::bail!(
            "fete needs an interactive terminal.\n\
             Use `fete sections` to inspect the configured deck instead."
        );
    }

    let mut runtime = TuiRuntime::new(config)?;
    runtime.run()?;
    info!("Experience closed");
    Ok(())
}
