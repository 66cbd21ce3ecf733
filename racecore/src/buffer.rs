//! # Buffer Module - Snippet text and its style information
//!
//! The buffer keeps the snippet split into characters together with the per-character style
//! information extracted from a highlighter. Both are index-aligned:
//!
//! ```text
//! Characters:    [f]  [n]  [ ]  [m]  [a]  [i]  [n]
//! Style classes: [kw] [kw] []   [ti] [ti] [ti] [ti]
//! ```
//!
//! Style information is only computed when a highlighter is applied and is dropped together
//! with the buffer when the snippet changes.

use crate::highlight::{CharacterInfo, Highlighter, character_info_for};
use crate::snippet::CodeSnippet;

/// Snippet text with optional per-character style information
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Buffer {
    snippet: CodeSnippet,
    /// The snippet text as characters
    characters: Vec<char>,
    /// Style information, index-aligned with `characters`
    character_info: Option<Vec<CharacterInfo>>,
}

impl Buffer {
    /// Create a new buffer from a snippet
    ///
    /// # Returns
    ///
    /// `None` if the snippet is empty, otherwise an unstyled `Buffer`.
    pub fn new(snippet: CodeSnippet) -> Option<Self> {
        if snippet.is_empty() {
            return None;
        }

        let characters = snippet.snippet.chars().collect();

        Some(Self {
            snippet,
            characters,
            character_info: None,
        })
    }

    pub const fn snippet(&self) -> &CodeSnippet {
        &self.snippet
    }

    /// Get the total number of characters in the buffer
    pub fn text_len(&self) -> usize {
        self.characters.len()
    }

    pub fn characters(&self) -> &[char] {
        &self.characters
    }

    /// Get a character by its index in the buffer
    pub fn get_character(&self, index: usize) -> Option<char> {
        self.characters.get(index).copied()
    }

    /// Get the character that should be typed next
    ///
    /// Returns the character at the current input position, or the last
    /// character if the input has reached the end of the buffer.
    pub fn current_character(&self, input_len: usize) -> Option<char> {
        self.characters
            .get(input_len)
            .or_else(|| self.characters.last())
            .copied()
    }

    pub fn character_info(&self) -> Option<&[CharacterInfo]> {
        self.character_info.as_deref()
    }

    /// Highlight the snippet and store the extracted style information
    pub fn apply_highlighting(&mut self, highlighter: &dyn Highlighter) {
        let info = character_info_for(highlighter, self.snippet.language, &self.snippet.snippet);
        tracing::debug!(
            snippet = self.snippet.id,
            characters = info.len(),
            "Extracted character styles"
        );
        self.character_info = Some(info);
    }
}
