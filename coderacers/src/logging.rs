use std::fs::File;
use std::path::Path;
use std::sync::Mutex;

use tracing_subscriber::EnvFilter;

/// Filter used when `RUST_LOG` isn't set
const DEFAULT_FILTER: &str = "info";

/// Send logs to `path`, as the terminal belongs to the interface
///
/// The file is truncated on every start. Levels are controlled through `RUST_LOG`.
pub fn init(path: &Path) -> std::io::Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)?;
    }

    let file = File::create(path)?;
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    // Fails only if a subscriber is already installed, in which case that one keeps logging
    if tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .try_init()
        .is_err()
    {
        tracing::debug!("Global subscriber already installed");
    }

    tracing::info!(path = %path.display(), "Logging initialized");
    Ok(())
}
