//! # Session Module - The typing session state machine
//!
//! A [`TypingSession`] owns everything about one attempt at typing a snippet: the typed
//! buffer, the focus flag, the countdown and the final result. It wires the input handler,
//! the renderer and the countdown together and decides when the attempt is over.
//!
//! ## Session Lifecycle
//!
#![doc = simple_mermaid::mermaid!("../diagrams/session_lifecycle.mmd")]
//!
//! A session completes either when the typed buffer spells out the snippet exactly, or when
//! the countdown reaches zero. Both paths stop the countdown, score the attempt and notify the
//! completion callback exactly once.
//!
//! ## Usage Example
//!
//! ```rust
//! use racecore::{CodeSnippet, KeyInput, Language, ManualClock, TypingSession};
//! use web_time::Duration;
//!
//! let clock = ManualClock::new();
//! let snippet = CodeSnippet::new(1, Language::Python, "pass");
//! let mut session = TypingSession::new(snippet)
//!     .unwrap()
//!     .with_clock(clock.clone());
//!
//! session.set_focused(true);
//! session.handle_key(KeyInput::char('p'));
//! assert!(session.is_started());
//!
//! clock.advance(Duration::from_secs(2));
//! session.poll();
//! assert_eq!(session.remaining_seconds(), 13);
//! ```

use web_time::{Duration, Instant};

use crate::buffer::Buffer;
use crate::config::Configuration;
use crate::countdown::{Clock, Countdown, SystemClock, Tick};
use crate::highlight::{CharacterInfo, Highlighter};
use crate::input_handler::{InputHandler, KeyInput, KeyOutcome};
use crate::math::TypingResult;
use crate::render::{Classifier, LineContext, LineRenderConfig, RenderedCharacter, render_lines};
use crate::snippet::{CodeSnippet, Language};

/// Errors creating a session
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum SessionError {
    #[error("No {language} snippet available")]
    EmptySnippet { language: Language },
}

/// Where a session is in its lifecycle
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Waiting for the first key
    #[default]
    Idle,
    /// The countdown is running
    Running,
    /// Finished, the result is available
    Completed,
}

/// Why a session completed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Completion {
    Typed,
    Expired,
}

type CompletionCallback = Box<dyn FnMut(&TypingResult)>;

/// A single attempt at typing a snippet
///
/// # Examples
///
/// ```rust
/// use racecore::{CodeSnippet, Key, KeyInput, Language, TypingSession};
///
/// let snippet = CodeSnippet::new(1, Language::Rust, "ab");
/// let mut session = TypingSession::new(snippet).unwrap();
///
/// // Keys are ignored until the session is focused
/// session.handle_key(KeyInput::char('a'));
/// assert_eq!(session.typed(), "");
///
/// session.set_focused(true);
/// session.handle_key(KeyInput::char('x'));
/// session.handle_key(KeyInput::new(Key::Backspace));
/// assert_eq!(session.typed(), "");
/// ```
pub struct TypingSession {
    /// Snippet text and style information
    text_buffer: Buffer,
    /// The typed buffer
    input_handler: InputHandler,
    countdown: Countdown,
    clock: Box<dyn Clock>,
    config: Configuration,
    phase: Phase,
    focused: bool,
    /// When the first key was accepted
    started_at: Option<Instant>,
    result: Option<TypingResult>,
    on_complete: Option<CompletionCallback>,
}

impl std::fmt::Debug for TypingSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TypingSession")
            .field("text_buffer", &self.text_buffer)
            .field("input_handler", &self.input_handler)
            .field("countdown", &self.countdown)
            .field("config", &self.config)
            .field("phase", &self.phase)
            .field("focused", &self.focused)
            .field("started_at", &self.started_at)
            .field("result", &self.result)
            .finish_non_exhaustive()
    }
}

impl TypingSession {
    /// Create an idle session for `snippet`
    ///
    /// Fails if the snippet is empty, as there would be nothing to type.
    pub fn new(snippet: CodeSnippet) -> Result<Self, SessionError> {
        let language = snippet.language;
        let text_buffer = Buffer::new(snippet).ok_or(SessionError::EmptySnippet { language })?;
        let config = Configuration::default();

        Ok(Self {
            text_buffer,
            input_handler: InputHandler::new(),
            countdown: Countdown::new(config.countdown_seconds),
            clock: Box::new(SystemClock),
            config,
            phase: Phase::Idle,
            focused: false,
            started_at: None,
            result: None,
            on_complete: None,
        })
    }

    /// Configure the session (builder pattern)
    ///
    /// Resets the countdown to the configured budget.
    pub fn with_configuration(mut self, config: Configuration) -> Self {
        self.countdown = Countdown::new(config.countdown_seconds);
        self.config = config;
        self
    }

    /// Read time from `clock` instead of the system clock
    pub fn with_clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Box::new(clock);
        self
    }

    /// Extract per-character styles from `highlighter`
    pub fn with_highlighter(mut self, highlighter: &dyn Highlighter) -> Self {
        self.text_buffer.apply_highlighting(highlighter);
        self
    }

    /// Call `callback` with the result every time the session completes
    pub fn on_complete(mut self, callback: impl FnMut(&TypingResult) + 'static) -> Self {
        self.on_complete = Some(Box::new(callback));
        self
    }

    pub const fn phase(&self) -> Phase {
        self.phase
    }

    /// True while the countdown is running
    pub fn is_started(&self) -> bool {
        self.phase == Phase::Running
    }

    pub fn is_completed(&self) -> bool {
        self.phase == Phase::Completed
    }

    pub const fn is_focused(&self) -> bool {
        self.focused
    }

    pub fn set_focused(&mut self, focused: bool) {
        self.focused = focused;
    }

    pub const fn snippet(&self) -> &CodeSnippet {
        self.text_buffer.snippet()
    }

    pub fn character_info(&self) -> Option<&[CharacterInfo]> {
        self.text_buffer.character_info()
    }

    pub const fn config(&self) -> &Configuration {
        &self.config
    }

    /// The typed buffer
    pub fn typed(&self) -> String {
        self.input_handler.typed()
    }

    /// Get the number of characters currently typed
    pub fn input_len(&self) -> usize {
        self.input_handler.input_len()
    }

    /// Get the total number of characters in the snippet
    pub fn text_len(&self) -> usize {
        self.text_buffer.text_len()
    }

    /// Returns the current character awaiting input
    pub fn current_character(&self) -> Option<char> {
        self.text_buffer
            .current_character(self.input_handler.input_len())
    }

    pub const fn remaining_seconds(&self) -> u32 {
        self.countdown.remaining()
    }

    /// The result, once the session has completed
    pub const fn result(&self) -> Option<&TypingResult> {
        self.result.as_ref()
    }

    /// Time since the first accepted key, frozen at completion
    pub fn time_elapsed(&self) -> Duration {
        match (&self.result, self.started_at) {
            (Some(result), _) => result.elapsed,
            (None, Some(started_at)) => self.clock.now().saturating_duration_since(started_at),
            (None, None) => Duration::ZERO,
        }
    }

    /// Get the typing completion percentage
    ///
    /// Returns a value between 0.0 and 100.0 representing how much of the
    /// snippet has been typed so far.
    pub fn completion_percentage(&self) -> f64 {
        (self.input_len() as f64 / self.text_len() as f64) * 100.0
    }

    /// Process a key event
    ///
    /// Keys are ignored while the session is unfocused or completed. The first accepted key
    /// starts the countdown.
    pub fn handle_key(&mut self, key: KeyInput) -> KeyOutcome {
        if self.is_completed() || !self.focused {
            return KeyOutcome::default();
        }

        let outcome = self.input_handler.process(&key, self.text_buffer.text_len());
        if !outcome.is_accepted() {
            return outcome;
        }

        if self.phase == Phase::Idle {
            self.start();
        }

        if self.input_handler.matches(self.text_buffer.characters()) {
            self.complete(Completion::Typed);
        }

        outcome
    }

    /// Deliver a single countdown tick from the host
    pub fn tick(&mut self) -> Option<Tick> {
        if self.phase != Phase::Running {
            return None;
        }

        let tick = self.countdown.tick();
        if tick == Some(Tick::Expired) {
            self.complete(Completion::Expired);
        }
        tick
    }

    /// Fire every countdown tick that became due according to the session's clock
    ///
    /// Hosts call this regularly from their event loop.
    pub fn poll(&mut self) -> Option<Tick> {
        if self.phase != Phase::Running {
            return None;
        }

        let tick = self.countdown.poll(self.clock.now());
        if tick == Some(Tick::Expired) {
            self.complete(Completion::Expired);
        }
        tick
    }

    /// Return to an idle session for the same snippet
    ///
    /// Extracted character styles are kept, as the snippet didn't change.
    pub fn restart(&mut self) {
        self.input_handler.clear();
        self.countdown.reset();
        self.phase = Phase::Idle;
        self.started_at = None;
        self.result = None;
        tracing::debug!(
            snippet = self.snippet().id,
            countdown = self.countdown.budget(),
            "Session restarted"
        );
    }

    /// Switch to a new snippet and return to idle
    ///
    /// The session is left untouched if the snippet is empty.
    pub fn select_snippet(
        &mut self,
        snippet: CodeSnippet,
        highlighter: Option<&dyn Highlighter>,
    ) -> Result<(), SessionError> {
        let language = snippet.language;
        let mut text_buffer =
            Buffer::new(snippet).ok_or(SessionError::EmptySnippet { language })?;

        if let Some(highlighter) = highlighter {
            text_buffer.apply_highlighting(highlighter);
        }

        self.text_buffer = text_buffer;
        self.restart();
        Ok(())
    }

    fn start(&mut self) {
        let now = self.clock.now();
        self.phase = Phase::Running;
        self.started_at = Some(now);
        self.countdown.start(now);
        tracing::debug!(
            snippet = self.snippet().id,
            countdown = self.countdown.remaining(),
            "Session started"
        );
    }

    fn complete(&mut self, reason: Completion) {
        let now = self.clock.now();
        self.phase = Phase::Completed;
        self.countdown.stop();

        let clock_elapsed = self
            .started_at
            .map(|started_at| now.saturating_duration_since(started_at))
            .unwrap_or_default();
        // Hosts may deliver ticks without the clock moving, each one still took a second
        let elapsed = clock_elapsed.max(Duration::from_secs(self.countdown.elapsed().into()));

        let result = TypingResult::calculate(
            self.input_handler.input(),
            self.text_buffer.characters(),
            elapsed,
            self.countdown.remaining(),
            self.config.wpm_basis,
        );

        tracing::info!(
            snippet = self.snippet().id,
            ?reason,
            wpm = result.wpm,
            accuracy = result.accuracy,
            "Session completed"
        );

        self.result = Some(result);
        if let Some(callback) = self.on_complete.as_mut() {
            callback(&result);
        }
    }

    /// Render the snippet using a generic renderer function
    pub fn render<Char, F: FnMut(RenderedCharacter) -> Char>(&self, renderer: F) -> Vec<Char> {
        self.render_iter().map(renderer).collect()
    }

    /// Create an iterator over classified snippet characters
    pub fn render_iter(&self) -> Classifier<'_> {
        Classifier::new(
            self.text_buffer.characters(),
            self.input_handler.input(),
            self.text_buffer.character_info(),
            self.focused,
        )
    }

    /// Render the snippet as lines
    ///
    /// Breaks the snippet into lines according to the configuration and applies
    /// the provided renderer function to each line.
    pub fn render_lines<Line, F: FnMut(LineContext) -> Option<Line>>(
        &self,
        line_renderer: F,
        config: LineRenderConfig,
    ) -> Vec<Line> {
        render_lines(self.render_iter(), &config, line_renderer)
    }
}
