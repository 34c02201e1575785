//! Default command: runs the full-screen experience.

use anyhow::{Context, Result};
use fete_core::config::{Config, paths};
use fete_core::logging;
use tracing::info;

pub async fn run(config: &Config) -> Result<()> {
    let log_path = paths::log_path();
    let _guard = logging::init(&log_path)
        .with_context(|| format!("init logging at {}", log_path.display()))?;
    info!(recipient = %config.recipient, sections = config.sections.len(), "Starting fete");

    fete_tui::run_experience(config).await?;

    println!("Made with love for {}. ♥", config.recipient);
    Ok(())
}
