use std::path::PathBuf;

use clap::Parser;
use derive_more::From;
use racecore::{Language, SnippetProvider};
use thiserror::Error;

mod app;
mod config;
mod highlighter;
mod logging;
mod page;
mod snippets;
mod utils;

use config::{Config, ConfigError};
use snippets::{SnippetError, SnippetLibrary};

/// Race the clock typing real source code
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Directory holding `settings.toml`
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Language of the first snippet
    #[arg(short, long)]
    language: Option<Language>,

    /// A TOML file with snippets to use instead of the bundled ones
    #[arg(short, long)]
    snippets: Option<PathBuf>,

    /// Seconds on the countdown
    #[arg(long)]
    countdown: Option<u32>,

    /// Print the languages that have snippets and exit
    #[arg(long, default_value_t = false)]
    list_languages: bool,
}

#[derive(Debug, From, Error)]
enum AppError {
    #[error(transparent)]
    Config(ConfigError),

    #[error(transparent)]
    Snippets(SnippetError),

    #[error("{0}")]
    Io(std::io::Error),
}

fn main() -> Result<(), AppError> {
    let cli = Cli::parse();

    let mut config = Config::get(cli.config)?;

    if let Some(path) = &cli.snippets {
        config.snippets = SnippetLibrary::from_file(path)?;
    }
    if let Some(countdown) = cli.countdown {
        config.settings.countdown_seconds = countdown;
    }

    if cli.list_languages {
        for language in config.snippets.languages() {
            println!("{language}");
        }
        return Ok(());
    }

    logging::init(&config.log_file())?;

    let language = cli.language.unwrap_or(config.settings.language);
    tracing::info!(
        %language,
        snippets = config.snippets.len(),
        countdown = config.settings.countdown_seconds,
        "Starting"
    );

    app::App::new(config, language).run()?;

    Ok(())
}
