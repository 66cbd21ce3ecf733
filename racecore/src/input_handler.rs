//! # Input Handler Module - Keystroke Processing
//!
//! Turns raw key events into edits of the typed buffer. The buffer only ever holds a prefix
//! attempt of the snippet and never grows beyond the snippet's length.
//!
//! ## Transition Table
//!
//! Keys are evaluated in this order:
//!
//! | Key                    | Edit                                                   |
//! |------------------------|--------------------------------------------------------|
//! | Ctrl/Meta + Backspace  | Remove the last word and any whitespace following it   |
//! | Backspace              | Remove the last character                              |
//! | Enter                  | Append `\n`                                            |
//! | Tab                    | Append two spaces, suppress the host's default action  |
//! | Printable character    | Append the character                                   |
//!
//! ```rust
//! use racecore::input_handler::InputHandler;
//! use racecore::{Key, KeyInput};
//!
//! let mut handler = InputHandler::new();
//!
//! handler.process(&KeyInput::char('a'), 4);
//! let outcome = handler.process(&KeyInput::new(Key::Tab), 4);
//!
//! assert!(outcome.prevent_default);
//! assert_eq!(handler.typed(), "a  ");
//! ```

/// A key as reported by the host
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Char(char),
    Backspace,
    Enter,
    Tab,
    /// Any key without meaning to the typing session (arrows, function keys...)
    Other,
}

/// Modifier keys held during a key event
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Modifiers {
    pub ctrl: bool,
    /// Cmd on macOS
    pub meta: bool,
}

/// A key event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyInput {
    pub key: Key,
    pub modifiers: Modifiers,
}

impl KeyInput {
    pub const fn new(key: Key) -> Self {
        Self {
            key,
            modifiers: Modifiers {
                ctrl: false,
                meta: false,
            },
        }
    }

    pub const fn char(character: char) -> Self {
        Self::new(Key::Char(character))
    }

    pub const fn with_ctrl(mut self) -> Self {
        self.modifiers.ctrl = true;
        self
    }

    pub const fn with_meta(mut self) -> Self {
        self.modifiers.meta = true;
        self
    }

    /// The platform "delete previous word" shortcut
    pub const fn is_word_deletion(&self) -> bool {
        matches!(self.key, Key::Backspace) && (self.modifiers.ctrl || self.modifiers.meta)
    }
}

/// How a key changed the typed buffer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Edit {
    /// This many characters were appended
    Inserted(usize),
    /// This many characters were removed
    Deleted(usize),
}

/// The result of processing a key
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct KeyOutcome {
    /// `None` if the key was ignored
    pub edit: Option<Edit>,
    /// The host should suppress its default handling of the key (e.g. focus navigation on Tab)
    pub prevent_default: bool,
}

impl KeyOutcome {
    const IGNORED: Self = Self {
        edit: None,
        prevent_default: false,
    };

    const fn edit(edit: Edit) -> Self {
        Self {
            edit: Some(edit),
            prevent_default: false,
        }
    }

    /// Returns true if the key was recognized by the session
    pub const fn is_accepted(&self) -> bool {
        self.edit.is_some()
    }
}

/// Owns the typed buffer and applies key events to it
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct InputHandler {
    /// All characters typed so far in the current session
    input: Vec<char>,
}

impl InputHandler {
    pub const fn new() -> Self {
        Self { input: vec![] }
    }

    /// Check if no characters have been typed yet
    pub fn is_input_empty(&self) -> bool {
        self.input.is_empty()
    }

    /// Get the number of characters typed so far
    pub fn input_len(&self) -> usize {
        self.input.len()
    }

    pub fn input(&self) -> &[char] {
        &self.input
    }

    pub fn typed(&self) -> String {
        self.input.iter().collect()
    }

    /// Check if the buffer spells out `text` exactly
    pub fn matches(&self, text: &[char]) -> bool {
        self.input == text
    }

    pub fn clear(&mut self) {
        self.input.clear();
    }

    /// Apply a key to the buffer
    ///
    /// `text_len` is the length of the snippet; the buffer never grows beyond it.
    pub fn process(&mut self, key: &KeyInput, text_len: usize) -> KeyOutcome {
        if key.is_word_deletion() {
            return KeyOutcome::edit(Edit::Deleted(self.delete_word()));
        }

        match key.key {
            Key::Backspace => {
                KeyOutcome::edit(Edit::Deleted(usize::from(self.input.pop().is_some())))
            }
            Key::Enter => KeyOutcome::edit(Edit::Inserted(self.append(&['\n'], text_len))),
            Key::Tab => KeyOutcome {
                edit: Some(Edit::Inserted(self.append(&[' ', ' '], text_len))),
                prevent_default: true,
            },
            Key::Char(character) if !character.is_control() => {
                KeyOutcome::edit(Edit::Inserted(self.append(&[character], text_len)))
            }
            Key::Char(_) | Key::Other => KeyOutcome::IGNORED,
        }
    }

    /// Append as many of `characters` as fit, returning how many were appended
    fn append(&mut self, characters: &[char], text_len: usize) -> usize {
        let room = text_len.saturating_sub(self.input.len());
        let appended = characters.len().min(room);
        self.input.extend_from_slice(&characters[..appended]);
        appended
    }

    /// Remove the trailing word together with any whitespace after it
    ///
    /// A buffer without any non-whitespace character is left untouched.
    fn delete_word(&mut self) -> usize {
        let len = self.input.len();

        let Some(word_end) = self.input.iter().rposition(|c| !c.is_whitespace()) else {
            return 0;
        };

        let word_start = self.input[..word_end]
            .iter()
            .rposition(|c| c.is_whitespace())
            .map_or(0, |index| index + 1);

        self.input.truncate(word_start);
        len - word_start
    }
}
