//! CLI entry and dispatch.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use fete_core::config::Config;
use fete_core::interrupt;

mod commands;

#[derive(Parser)]
#[command(name = "fete")]
#[command(version)]
#[command(about = "An animated greeting for someone special, right in the terminal")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    #[command(flatten)]
    overrides: Overrides,
}

/// Per-run overrides layered on top of the config file.
#[derive(clap::Args, Debug, Clone, Default)]
struct Overrides {
    /// Who the greeting is for
    #[arg(long, value_name = "NAME")]
    recipient: Option<String>,

    /// Date line shown under the headline
    #[arg(long)]
    date: Option<String>,

    /// Stay on the opening section until someone navigates
    #[arg(long = "no-auto-advance")]
    no_auto_advance: bool,

    /// WAV file played by the music toggle
    #[arg(long, value_name = "WAV")]
    music: Option<PathBuf>,
}

impl Overrides {
    fn apply(self, config: &mut Config) {
        if let Some(recipient) = self.recipient {
            config.recipient = recipient;
        }
        if let Some(date) = self.date {
            config.date = date;
        }
        if self.no_auto_advance {
            config.startup_auto_advance = false;
        }
        if self.music.is_some() {
            config.music = self.music;
        }
    }
}

#[derive(clap::Subcommand)]
enum Commands {
    /// Manage configuration
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
    /// Print the configured section order
    Sections,
}

#[derive(clap::Subcommand)]
enum ConfigCommands {
    /// Show the path to the config file
    Path,
    /// Initialize a default config file (if not present)
    Init,
    /// Generate a fresh config from Rust defaults (for xtask)
    Generate,
}

pub fn run() -> Result<()> {
    let cli = Cli::parse();

    interrupt::init()?;

    // one tokio runtime for everything
    let rt = tokio::runtime::Runtime::new().context("create tokio runtime")?;

    rt.block_on(async move { dispatch(cli).await })
}

async fn dispatch(cli: Cli) -> Result<()> {
    let Cli { command, overrides } = cli;

    match command {
        Some(Commands::Config { command }) => match command {
            ConfigCommands::Path => {
                commands::config::path();
                Ok(())
            }
            ConfigCommands::Init => commands::config::init(),
            ConfigCommands::Generate => commands::config::generate(),
        },
        Some(Commands::Sections) => {
            let config = load_config(overrides)?;
            commands::sections::run(&config)
        }
        // default to the experience itself
        None => {
            let config = load_config(overrides)?;
            commands::show::run(&config).await
        }
    }
}

fn load_config(overrides: Overrides) -> Result<Config> {
    let mut config = Config::load().context("load config")?;
    overrides.apply(&mut config);
    Ok(config)
}
