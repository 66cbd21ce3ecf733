use std::path::PathBuf;

use derive_more::From;
use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use racecore::{Configuration, Language, WpmBasis, config::DEFAULT_COUNTDOWN_SECONDS};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::snippets::{SnippetError, SnippetLibrary};

pub mod theme;

/// Prefix of environment variables overriding settings, e.g. `CODERACERS_LANGUAGE=go`
const ENV_PREFIX: &str = "CODERACERS_";

#[derive(Debug, Deserialize, Serialize)]
#[serde(default)]
pub struct Settings {
    /// Seconds on the countdown
    pub countdown_seconds: u32,
    /// What words-per-minute is divided by
    pub wpm_basis: WpmBasis,
    /// Language of the first snippet
    pub language: Language,
    /// A TOML file with snippets to use instead of the bundled ones
    pub snippets_file: Option<PathBuf>,
    /// Where logs are written, defaults to `coderacers.log` in the config directory
    pub log_file: Option<PathBuf>,
    pub theme: theme::Theme,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            countdown_seconds: DEFAULT_COUNTDOWN_SECONDS,
            wpm_basis: WpmBasis::default(),
            language: Language::JavaScript,
            snippets_file: None,
            log_file: None,
            theme: theme::Theme::default(),
        }
    }
}

impl Settings {
    /// The engine configuration described by these settings
    pub const fn session_configuration(&self) -> Configuration {
        Configuration {
            countdown_seconds: self.countdown_seconds,
            wpm_basis: self.wpm_basis,
        }
    }
}

#[derive(Debug, From, Error)]
pub enum ConfigError {
    #[error(
        "Failed to get configuration directory. Please specify the location using the `--config <path>` flag"
    )]
    NoDirectory,

    #[error("Failed to create config directory: {0}")]
    CreateDirectory(std::io::Error),

    #[error("Failed to parse config: {0}")]
    Parse(Box<figment::Error>),

    #[error("Failed to load snippets: {0}")]
    Snippets(SnippetError),
}

#[derive(Debug)]
pub struct Config {
    pub settings: Settings,
    pub snippets: SnippetLibrary,
    pub config_dir: PathBuf,
}

impl Config {
    /// Load the settings file and the snippet library
    ///
    /// Settings are layered: defaults, then `settings.toml` in the config directory, then
    /// `CODERACERS_*` environment variables.
    pub fn get(override_path: Option<PathBuf>) -> Result<Self, ConfigError> {
        // Check for toml file location
        let config_dir = override_path
            .or_else(|| {
                ProjectDirs::from("com", "CodeRacers", "CodeRacers")
                    .map(|dirs| dirs.config_dir().to_path_buf())
            })
            .ok_or(ConfigError::NoDirectory)?;

        // Ensure path exists
        if !config_dir.exists() {
            std::fs::create_dir_all(&config_dir)?;
        }

        let settings = Self::figment(&config_dir)
            .extract::<Settings>()
            .map_err(Box::new)?;

        let snippets = match &settings.snippets_file {
            Some(path) => SnippetLibrary::from_file(path)?,
            None => SnippetLibrary::bundled()?,
        };

        Ok(Self {
            settings,
            snippets,
            config_dir,
        })
    }

    fn figment(config_dir: &std::path::Path) -> Figment {
        // Grab default configuration
        let mut figment = Figment::from(Serialized::defaults(Settings::default()));

        let settings_toml = config_dir.join("settings.toml");
        if settings_toml.exists() {
            figment = figment.merge(Toml::file(settings_toml));
        }

        figment.merge(Env::prefixed(ENV_PREFIX))
    }

    /// Where logs should be written
    pub fn log_file(&self) -> PathBuf {
        self.settings
            .log_file
            .clone()
            .unwrap_or_else(|| self.config_dir.join("coderacers.log"))
    }

    /// Default settings with the bundled snippets, touching nothing on disk
    #[cfg(test)]
    pub fn for_tests() -> Self {
        Self {
            settings: Settings::default(),
            snippets: SnippetLibrary::bundled().expect("bundled snippets parse"),
            config_dir: std::env::temp_dir(),
        }
    }
}
