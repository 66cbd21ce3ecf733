use std::path::Path;

use derive_more::From;
use racecore::{CodeSnippet, Language, SnippetProvider};
use serde::Deserialize;
use thiserror::Error;

const BUNDLED_SNIPPETS: &str = include_str!("../snippets.toml");

#[derive(Debug, From, Error)]
pub enum SnippetError {
    #[error("Failed to read snippets file: {0}")]
    ReadFile(std::io::Error),

    #[error("Failed to parse snippets: {0}")]
    Parse(toml::de::Error),
}

/// A table of snippets, grouped by nothing but their language tag
#[derive(Debug, Default, Clone, Deserialize)]
pub struct SnippetLibrary {
    #[serde(default)]
    snippets: Vec<CodeSnippet>,
}

impl SnippetLibrary {
    /// The snippets shipped with the binary
    pub fn bundled() -> Result<Self, SnippetError> {
        Self::parse(BUNDLED_SNIPPETS)
    }

    pub fn from_file(path: &Path) -> Result<Self, SnippetError> {
        let contents = std::fs::read_to_string(path)?;
        let library = Self::parse(&contents)?;
        tracing::info!(
            path = %path.display(),
            snippets = library.snippets.len(),
            "Loaded snippets"
        );
        Ok(library)
    }

    fn parse(contents: &str) -> Result<Self, SnippetError> {
        let mut library: Self = toml::from_str(contents)?;
        // Empty snippets can never be typed to completion
        library.snippets.retain(|snippet| !snippet.is_empty());
        Ok(library)
    }

    pub fn len(&self) -> usize {
        self.snippets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.snippets.is_empty()
    }

    /// The snippet of `language` following the one with `id`, wrapping around
    ///
    /// Falls back to the first snippet of the language if `id` isn't one of them.
    pub fn next_after(&self, language: Language, id: u32) -> Option<CodeSnippet> {
        let candidates: Vec<&CodeSnippet> = self
            .snippets
            .iter()
            .filter(|snippet| snippet.language == language)
            .collect();

        let next = candidates
            .iter()
            .position(|snippet| snippet.id == id)
            .map_or(0, |index| (index + 1) % candidates.len());

        candidates.get(next).map(|snippet| (*snippet).clone())
    }

    /// The language after `language` that has snippets, wrapping around
    pub fn next_language(&self, language: Language) -> Option<Language> {
        let languages = self.languages();
        let next = languages
            .iter()
            .position(|candidate| *candidate == language)
            .map_or(0, |index| (index + 1) % languages.len());
        languages.get(next).copied()
    }
}

impl SnippetProvider for SnippetLibrary {
    fn snippet(&self, language: Language) -> Option<CodeSnippet> {
        self.snippets
            .iter()
            .find(|snippet| snippet.language == language)
            .cloned()
    }

    fn languages(&self) -> Vec<Language> {
        let mut languages: Vec<Language> =
            self.snippets.iter().map(|snippet| snippet.language).collect();
        languages.sort_unstable();
        languages.dedup();
        languages
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    const LIBRARY: &str = r#"
        [[snippets]]
        id = 1
        language = "rust"
        snippet = "fn main() {}"

        [[snippets]]
        id = 2
        language = "go"
        snippet = "package main"

        [[snippets]]
        id = 3
        language = "rust"
        snippet = "let x = 1;"

        [[snippets]]
        id = 4
        language = "python"
        snippet = ""
    "#;

    #[test]
    fn test_bundled_snippets() {
        let library = SnippetLibrary::bundled().unwrap();
        assert!(!library.is_empty());

        for language in [Language::JavaScript, Language::Python, Language::Rust, Language::Go] {
            let snippet = library.snippet(language).unwrap();
            assert_eq!(snippet.language, language);
            assert!(!snippet.is_empty());
        }
    }

    #[test]
    fn test_empty_snippets_are_dropped() {
        let library = SnippetLibrary::parse(LIBRARY).unwrap();
        assert_eq!(library.len(), 3);
        assert!(library.snippet(Language::Python).is_none());
        assert_eq!(library.languages(), vec![Language::Go, Language::Rust]);
    }

    #[rstest]
    #[case(Language::Rust, 1, Some(3))]
    #[case(Language::Rust, 3, Some(1))]
    #[case(Language::Rust, 99, Some(1))]
    #[case(Language::Go, 2, Some(2))]
    #[case(Language::Python, 4, None)]
    fn test_next_after(#[case] language: Language, #[case] id: u32, #[case] expected: Option<u32>) {
        let library = SnippetLibrary::parse(LIBRARY).unwrap();
        assert_eq!(
            library.next_after(language, id).map(|snippet| snippet.id),
            expected
        );
    }

    #[test]
    fn test_next_language() {
        let library = SnippetLibrary::parse(LIBRARY).unwrap();
        assert_eq!(library.next_language(Language::Go), Some(Language::Rust));
        assert_eq!(library.next_language(Language::Rust), Some(Language::Go));
        assert_eq!(library.next_language(Language::Haskell), Some(Language::Go));
        assert_eq!(SnippetLibrary::default().next_language(Language::Go), None);
    }

    #[test]
    fn test_invalid_library() {
        let error = SnippetLibrary::parse("snippets = 3").unwrap_err();
        assert!(matches!(error, SnippetError::Parse(_)));
    }
}
