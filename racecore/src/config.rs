//! # Configuration Module - Runtime Behavior Settings
//!
//! ```rust
//! use racecore::config::{Configuration, WpmBasis};
//!
//! // Use default configuration
//! let config = Configuration::default();
//! assert_eq!(config.countdown_seconds, 15);
//!
//! // Custom configuration
//! let config = Configuration {
//!     countdown_seconds: 60,
//!     wpm_basis: WpmBasis::Remaining,
//! };
//! ```

use serde::{Deserialize, Serialize};

/// Seconds on the countdown when a session is created
pub const DEFAULT_COUNTDOWN_SECONDS: u32 = 15;

/// The duration words-per-minute is divided by
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WpmBasis {
    /// Time between the first accepted key and completion
    #[default]
    Elapsed,
    /// Seconds left on the countdown at completion
    Remaining,
}

/// Runtime configuration of a typing session
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Configuration {
    /// Countdown budget in seconds
    ///
    /// **Default**: 15 seconds
    pub countdown_seconds: u32,
    /// Which duration WPM is calculated against
    ///
    /// **Default**: [`WpmBasis::Elapsed`]
    pub wpm_basis: WpmBasis,
}

impl Default for Configuration {
    fn default() -> Self {
        Self {
            countdown_seconds: DEFAULT_COUNTDOWN_SECONDS,
            wpm_basis: WpmBasis::default(),
        }
    }
}
