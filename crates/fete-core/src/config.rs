//! Configuration management for fete.
//!
//! Loads configuration from ${FETE_HOME}/config.toml with sensible defaults.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::deck::{Deck, SectionKind};

pub mod paths {
    //! Path resolution for fete configuration and log files.
    //!
    //! FETE_HOME resolution order:
    //! 1. FETE_HOME environment variable (if set)
    //! 2. ~/.config/fete (default)
    //! 3. ./.fete when no home directory can be determined

    use std::path::PathBuf;

    /// Returns the fete home directory.
    pub fn fete_home() -> PathBuf {
        if let Ok(home) = std::env::var("FETE_HOME") {
            return PathBuf::from(home);
        }

        dirs::home_dir().map_or_else(
            || PathBuf::from(".fete"),
            |h| h.join(".config").join("fete"),
        )
    }

    /// Returns the path to the config.toml file.
    pub fn config_path() -> PathBuf {
        fete_home().join("config.toml")
    }

    /// Returns the path to the log file.
    pub fn log_path() -> PathBuf {
        fete_home().join("fete.log")
    }
}

fn default_config_template() -> &'static str {
    include_str!("../default_config.toml")
}

/// Transition and timer durations, in milliseconds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimingConfig {
    /// Exit animation of the outgoing section before the index commits.
    pub exit_ms: u64,
    /// Entrance animation of the incoming section; the lock is held until it ends.
    pub enter_ms: u64,
    /// Delay before the startup sequence force-displays the first section.
    pub startup_display_ms: u64,
    /// Delay (from init) before leaving the opening section automatically.
    pub startup_advance_ms: u64,
    /// Photo auto-advance period.
    pub slideshow_period_ms: u64,
    /// Delay between revealed message characters.
    pub type_char_ms: u64,
    /// How long the cursor stays after the message is fully revealed.
    pub cursor_linger_ms: u64,
}

impl TimingConfig {
    pub fn exit(&self) -> Duration {
        Duration::from_millis(self.exit_ms)
    }

    pub fn enter(&self) -> Duration {
        Duration::from_millis(self.enter_ms)
    }

    pub fn startup_display(&self) -> Duration {
        Duration::from_millis(self.startup_display_ms)
    }

    pub fn startup_advance(&self) -> Duration {
        Duration::from_millis(self.startup_advance_ms)
    }

    pub fn slideshow_period(&self) -> Duration {
        Duration::from_millis(self.slideshow_period_ms)
    }

    pub fn type_char(&self) -> Duration {
        Duration::from_millis(self.type_char_ms)
    }

    pub fn cursor_linger(&self) -> Duration {
        Duration::from_millis(self.cursor_linger_ms)
    }
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            exit_ms: 800,
            enter_ms: 1200,
            startup_display_ms: 500,
            startup_advance_ms: 5000,
            slideshow_period_ms: 4000,
            type_char_ms: 50,
            cursor_linger_ms: 1000,
        }
    }
}

/// Main configuration structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Who the greeting is for.
    pub recipient: String,

    /// Date line shown on the reveal section.
    pub date: String,

    /// Reveal headline.
    pub headline: String,

    /// Text revealed on the message section.
    pub message: String,

    /// Text shown after the surprise is revealed.
    pub surprise_message: String,

    /// Final words on the closing section.
    pub closing_note: String,

    /// One caption per slideshow photo.
    pub photos: Vec<String>,

    /// Section order.
    pub sections: Vec<SectionKind>,

    /// Leave the opening section automatically if nobody navigates first.
    pub startup_auto_advance: bool,

    /// Horizontal drag distance (columns) recognized as a swipe.
    pub swipe_threshold: u16,

    /// Optional WAV file for the music toggle.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub music: Option<PathBuf>,

    /// Transition and timer durations.
    pub timings: TimingConfig,
}

impl Config {
    const DEFAULT_RECIPIENT: &str = "my beautiful angel";
    const DEFAULT_DATE: &str = "September 29, 2025";
    const DEFAULT_HEADLINE: &str = "Happy Birthday";
    const DEFAULT_MESSAGE: &str = "My dearest love, every moment with you feels like a beautiful dream come true. You bring so much joy, laughter, and warmth into my life. Your smile lights up my world, and your love gives me strength every single day. On this special day, I want you to know how incredibly grateful I am to have you by my side. You are not just my girlfriend, you are my best friend, my partner, and the love of my life. I promise to cherish every moment we share together and to love you more with each passing day. Happy Birthday, my beautiful angel! 💕";
    const DEFAULT_SURPRISE_MESSAGE: &str = "Pack your bags: this weekend is ours. 💝";
    const DEFAULT_CLOSING_NOTE: &str = "Forever yours, today and always.";
    const DEFAULT_SWIPE_THRESHOLD: u16 = 50;

    /// Loads configuration from the default config path.
    pub fn load() -> Result<Self> {
        Self::load_from(&paths::config_path())
    }

    /// Loads configuration from a specific path.
    /// Returns defaults if file doesn't exist.
    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let contents = fs::read_to_string(path)
                .with_context(|| format!("Failed to read config from {}", path.display()))?;
            let config: Config = toml::from_str(&contents)
                .with_context(|| format!("Failed to parse config from {}", path.display()))?;
            config
                .validate()
                .with_context(|| format!("Invalid config at {}", path.display()))?;
            Ok(config)
        } else {
            Ok(Config::default())
        }
    }

    /// Rejects values the runtime cannot run with.
    ///
    /// # Errors
    /// Returns an error if `timings.slideshow_period_ms` is zero.
    pub fn validate(&self) -> Result<()> {
        if self.timings.slideshow_period_ms == 0 {
            anyhow::bail!("`timings.slideshow_period_ms` must be greater than 0");
        }
        Ok(())
    }

    /// Builds the section deck described by `sections`.
    ///
    /// # Errors
    /// Returns an error if the configured section list is empty.
    pub fn deck(&self) -> Result<Deck> {
        Deck::new(self.sections.clone()).context("Invalid `sections` in config")
    }

    /// Creates a new config file with the commented default template.
    pub fn init(path: &Path) -> Result<()> {
        if path.exists() {
            anyhow::bail!("Config file already exists at {}", path.display());
        }

        Self::write_config(path, default_config_template())
    }

    /// Generates a fresh config TOML from Rust defaults.
    ///
    /// Uses the embedded template for structure/comments and merges
    /// generated values from `Config::default()` into it.
    pub fn generate() -> Result<String> {
        use toml_edit::{DocumentMut, Item};

        fn merge(target: &mut toml_edit::Table, source: &toml_edit::Table) {
            for (key, value) in source.iter() {
                match value {
                    Item::Value(v) => {
                        target[key] = Item::Value(v.clone());
                    }
                    Item::Table(src_table) => {
                        if let Some(Item::Table(target_table)) = target.get_mut(key) {
                            merge(target_table, src_table);
                        } else {
                            target[key] = Item::Table(src_table.clone());
                        }
                    }
                    Item::ArrayOfTables(arr) => {
                        target[key] = Item::ArrayOfTables(arr.clone());
                    }
                    Item::None => {}
                }
            }
        }

        let config = Config::default();
        let generated_toml =
            toml::to_string(&config).context("Failed to serialize default config to TOML")?;

        let mut doc: DocumentMut = default_config_template()
            .parse()
            .context("Failed to parse default config template")?;
        let generated_doc: DocumentMut = generated_toml
            .parse()
            .context("Failed to parse generated config")?;

        merge(doc.as_table_mut(), generated_doc.as_table());

        Ok(doc.to_string())
    }

    /// Writes config content to a file, creating parent directories as needed.
    /// Uses atomic write (temp file + rename) to prevent corruption.
    fn write_config(path: &Path, content: &str) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory {}", parent.display()))?;
        }

        let tmp_path = path.with_extension("toml.tmp");
        fs::write(&tmp_path, content)
            .with_context(|| format!("Failed to write config to {}", tmp_path.display()))?;
        fs::rename(&tmp_path, path).with_context(|| {
            format!(
                "Failed to rename {} to {}",
                tmp_path.display(),
                path.display()
            )
        })?;

        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            recipient: Self::DEFAULT_RECIPIENT.to_string(),
            date: Self::DEFAULT_DATE.to_string(),
            headline: Self::DEFAULT_HEADLINE.to_string(),
            message: Self::DEFAULT_MESSAGE.to_string(),
            surprise_message: Self::DEFAULT_SURPRISE_MESSAGE.to_string(),
            closing_note: Self::DEFAULT_CLOSING_NOTE.to_string(),
            photos: vec![
                "The day we met".to_string(),
                "Our first trip together".to_string(),
                "Sunday mornings".to_string(),
                "Every day since".to_string(),
            ],
            sections: SectionKind::all().to_vec(),
            startup_auto_advance: true,
            swipe_threshold: Self::DEFAULT_SWIPE_THRESHOLD,
            music: None,
            timings: TimingConfig::default(),
        }
    }
}
