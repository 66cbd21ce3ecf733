//! # Snippet Module - The text a user has to reproduce
//!
//! A [`CodeSnippet`] is the ground truth of a typing session: its text, including every
//! newline and space, is what the typed buffer is compared against. Snippets are supplied by
//! a [`SnippetProvider`], keyed by [`Language`].

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString, IntoStaticStr};

/// Languages a snippet can be written in
///
/// The string form is the lowercase identifier used by snippet files and highlighters.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    EnumIter,
    IntoStaticStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum Language {
    JavaScript,
    Python,
    Java,
    CSharp,
    Php,
    Ruby,
    Go,
    TypeScript,
    C,
    Swift,
    Kotlin,
    Rust,
    Scala,
    Elixir,
    Haskell,
    Clojure,
}

/// A piece of source code to be typed
///
/// Immutable once selected. Lengths are counted in `char`s, so multi-byte characters count
/// as one position each.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CodeSnippet {
    pub id: u32,
    pub language: Language,
    pub snippet: String,
}

impl CodeSnippet {
    pub fn new(id: u32, language: Language, snippet: impl Into<String>) -> Self {
        Self {
            id,
            language,
            snippet: snippet.into(),
        }
    }

    /// Number of characters the user has to type
    pub fn len(&self) -> usize {
        self.snippet.chars().count()
    }

    pub fn is_empty(&self) -> bool {
        self.snippet.is_empty()
    }
}

/// Supplies snippets on demand
///
/// The engine treats everything it receives from a provider as read-only input.
pub trait SnippetProvider {
    /// Returns a snippet for the given language, if one is available
    fn snippet(&self, language: Language) -> Option<CodeSnippet>;

    /// Languages this provider has at least one snippet for
    fn languages(&self) -> Vec<Language>;
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use super::*;

    #[test]
    fn test_language_identifiers() {
        assert_eq!(Language::CSharp.to_string(), "csharp");
        assert_eq!(Language::JavaScript.to_string(), "javascript");
        assert_eq!(Language::from_str("Rust").unwrap(), Language::Rust);
        assert_eq!(Language::from_str("typescript").unwrap(), Language::TypeScript);
        assert!(Language::from_str("cobol").is_err());
    }

    #[test]
    fn test_snippet_length_counts_chars() {
        let snippet = CodeSnippet::new(1, Language::Python, "print('é')");
        assert_eq!(snippet.len(), 10);
        assert!(!snippet.is_empty());
        assert!(CodeSnippet::new(2, Language::Go, "").is_empty());
    }
}
