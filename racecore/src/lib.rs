//! # racecore - the engine behind timed code-typing exercises
//!
//! A user is shown a source-code snippet and must reproduce it character by character
//! before a countdown runs out. This crate owns everything between the raw key event and the
//! final score:
//!
//! - [`input_handler`]: turns key events into edits of the typed buffer
//! - [`highlight`]: flattens a highlighter's span tree into one style entry per character
//! - [`render`]: classifies every snippet position as correct, incorrect, cursor or pending
//! - [`countdown`]: the one-second countdown and the [`Clock`] it reads time from
//! - [`session`]: the state machine tying it all together
//! - [`math`]: words-per-minute and accuracy
//!
//! ```rust
//! use racecore::{CodeSnippet, KeyInput, Language, TypingSession};
//!
//! let snippet = CodeSnippet::new(1, Language::Rust, "fn");
//! let mut session = TypingSession::new(snippet).unwrap();
//! session.set_focused(true);
//!
//! session.handle_key(KeyInput::char('f'));
//! session.handle_key(KeyInput::char('n'));
//!
//! assert!(session.is_completed());
//! assert_eq!(session.result().unwrap().accuracy, 100.0);
//! ```

pub mod buffer;
pub mod config;
pub mod countdown;
pub mod highlight;
pub mod input_handler;
pub mod math;
pub mod render;
pub mod session;
pub mod snippet;

pub use config::{Configuration, WpmBasis};
pub use countdown::{Clock, Countdown, ManualClock, SystemClock, Tick};
pub use highlight::{
    CharacterInfo, HighlightNode, Highlighted, Highlighter, StyleAttributes, Stylesheet,
};
pub use input_handler::{Key, KeyInput, KeyOutcome, Modifiers};
pub use math::TypingResult;
pub use render::{CharacterState, RenderedCharacter};
pub use session::{Phase, SessionError, TypingSession};
pub use snippet::{CodeSnippet, Language, SnippetProvider};

/// Characters per word when converting typed characters into words-per-minute
const AVERAGE_WORD_LENGTH: usize = 5;

// Types for more general type-safety
type Seconds = f64;
type Minutes = f64;

// Get the minutes elapsed from a timestamp
pub(crate) fn minutes(seconds: Seconds) -> Minutes {
    seconds / 60.0
}
