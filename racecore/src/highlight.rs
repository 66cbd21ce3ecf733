//! # Highlight Module - Per-character style extraction
//!
//! Syntax highlighting is done by an external [`Highlighter`]. It hands back a tree of styled
//! spans, one tree per row, plus a stylesheet mapping class names to style attributes. This
//! module folds that tree into a flat list of [`CharacterInfo`], one entry per character of
//! the snippet, which the renderer later merges with the typing state.
//!
//! ```text
//! Element(hljs-keyword) ─ Text("fn")        ─▶ [f: hljs-keyword] [n: hljs-keyword]
//! Text(" ")                                 ─▶ [ : ""]
//! Element(hljs-title)   ─ Text("main")      ─▶ [m: hljs-title] [a: ..] [i: ..] [n: ..]
//! ```
//!
//! Only the shape of the tree matters: text nodes carry literal substrings, element nodes
//! carry class names, an optional color and children.

use std::collections::{BTreeMap, HashMap};

use crate::render::PENDING_CLASS;
use crate::snippet::Language;

/// CSS-like style properties, e.g. `color -> #7e7887`
pub type StyleAttributes = BTreeMap<String, String>;

/// Style attributes keyed by class name
pub type Stylesheet = HashMap<String, StyleAttributes>;

/// A node in a highlighter's span tree
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HighlightNode {
    /// A literal piece of the snippet
    Text(String),
    /// A styled span
    Element {
        class_names: Vec<String>,
        color: Option<String>,
        children: Vec<HighlightNode>,
    },
}

impl HighlightNode {
    pub fn text(value: impl Into<String>) -> Self {
        Self::Text(value.into())
    }

    /// An element with a single class and no explicit color
    pub fn element(class_name: impl Into<String>, children: Vec<HighlightNode>) -> Self {
        Self::Element {
            class_names: vec![class_name.into()],
            color: None,
            children,
        }
    }
}

/// Output of a [`Highlighter`]
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Highlighted {
    pub rows: Vec<HighlightNode>,
    pub stylesheet: Stylesheet,
}

/// Turns source text into a styled span tree
pub trait Highlighter {
    /// Highlights `text` as `language`. `None` means no usable tree could be produced.
    fn highlight(&self, language: Language, text: &str) -> Option<Highlighted>;
}

/// Style information for a single snippet character
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CharacterInfo {
    pub character: char,
    /// Space separated class names, may be empty
    pub style_class: String,
    pub style_attributes: StyleAttributes,
}

impl CharacterInfo {
    /// A character without any highlighting
    pub fn plain(character: char) -> Self {
        Self {
            character,
            style_class: String::new(),
            style_attributes: StyleAttributes::new(),
        }
    }
}

/// The style context handed down from the nearest enclosing element
struct StyleContext<'a> {
    class_name: String,
    color: Option<&'a str>,
}

/// Flatten highlighted rows into one [`CharacterInfo`] per character
///
/// The result holds as many entries as there are characters in all text nodes together.
pub fn extract_characters(highlighted: &Highlighted) -> Vec<CharacterInfo> {
    let root = StyleContext {
        class_name: String::new(),
        color: None,
    };

    highlighted
        .rows
        .iter()
        .fold(Vec::new(), |mut characters, row| {
            traverse(row, &root, &highlighted.stylesheet, &mut characters);
            characters
        })
}

fn traverse<'a>(
    node: &'a HighlightNode,
    context: &StyleContext<'a>,
    stylesheet: &Stylesheet,
    characters: &mut Vec<CharacterInfo>,
) {
    match node {
        HighlightNode::Text(value) => {
            let mut attributes = stylesheet
                .get(&context.class_name)
                .cloned()
                .unwrap_or_default();

            if let Some(color) = context.color {
                attributes
                    .entry("color".to_string())
                    .or_insert_with(|| color.to_string());
            }

            characters.extend(value.chars().map(|character| CharacterInfo {
                character,
                style_class: context.class_name.clone(),
                style_attributes: attributes.clone(),
            }));
        }
        HighlightNode::Element {
            class_names,
            color,
            children,
        } => {
            // The pending marker belongs to the renderer and must never become a lookup key
            let class_name = class_names
                .iter()
                .filter(|name| name.as_str() != PENDING_CLASS)
                .map(String::as_str)
                .collect::<Vec<_>>()
                .join(" ");

            let child_context = StyleContext {
                class_name,
                color: color.as_deref().or(context.color),
            };

            for child in children {
                traverse(child, &child_context, stylesheet, characters);
            }
        }
    }
}

/// Highlight `text` and extract its characters, falling back to unstyled characters
///
/// The fallback is used when the highlighter produces nothing, or when the extracted
/// characters don't line up with `text`.
pub fn character_info_for(
    highlighter: &dyn Highlighter,
    language: Language,
    text: &str,
) -> Vec<CharacterInfo> {
    let extracted = highlighter
        .highlight(language, text)
        .map(|highlighted| extract_characters(&highlighted));

    match extracted {
        Some(characters)
            if characters
                .iter()
                .map(|info| info.character)
                .eq(text.chars()) =>
        {
            characters
        }
        Some(characters) => {
            tracing::warn!(
                %language,
                extracted = characters.len(),
                expected = text.chars().count(),
                "Highlighted text does not match the snippet, falling back to plain characters"
            );
            text.chars().map(CharacterInfo::plain).collect()
        }
        None => {
            tracing::warn!(%language, "Highlighter returned no tree, falling back to plain characters");
            text.chars().map(CharacterInfo::plain).collect()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stylesheet() -> Stylesheet {
        let mut stylesheet = Stylesheet::new();
        stylesheet.insert(
            "kw".to_string(),
            StyleAttributes::from([("color".to_string(), "#955ae7".to_string())]),
        );
        stylesheet
    }

    struct FixedHighlighter(Option<Highlighted>);

    impl Highlighter for FixedHighlighter {
        fn highlight(&self, _language: Language, _text: &str) -> Option<Highlighted> {
            self.0.clone()
        }
    }

    #[test]
    fn test_extract_single_class() {
        let highlighted = Highlighted {
            rows: vec![HighlightNode::element(
                "kw",
                vec![HighlightNode::text("ab")],
            )],
            stylesheet: stylesheet(),
        };

        let characters = extract_characters(&highlighted);
        assert_eq!(characters.len(), 2);
        assert!(characters.iter().all(|info| info.style_class == "kw"));
        assert_eq!(characters[0].character, 'a');
        assert_eq!(characters[1].character, 'b');
        assert_eq!(characters[1].style_attributes["color"], "#955ae7");
    }

    #[test]
    fn test_extract_nested_and_multiple_rows() {
        let highlighted = Highlighted {
            rows: vec![
                HighlightNode::Element {
                    class_names: vec![],
                    color: Some("#ffffff".to_string()),
                    children: vec![
                        HighlightNode::element("kw", vec![HighlightNode::text("fn")]),
                        HighlightNode::text(" x\n"),
                    ],
                },
                HighlightNode::text("}"),
            ],
            stylesheet: stylesheet(),
        };

        let characters = extract_characters(&highlighted);
        assert_eq!(characters.len(), 6);

        // Keyword characters keep the stylesheet color over the inherited one
        assert_eq!(characters[0].style_class, "kw");
        assert_eq!(characters[0].style_attributes["color"], "#955ae7");

        // Text directly in the row element inherits its color but has no class
        assert_eq!(characters[2].style_class, "");
        assert_eq!(characters[2].style_attributes["color"], "#ffffff");
        assert_eq!(characters[4].character, '\n');

        // Text outside of any element is unstyled
        assert_eq!(characters[5], CharacterInfo::plain('}'));
    }

    #[test]
    fn test_pending_marker_is_filtered() {
        let highlighted = Highlighted {
            rows: vec![HighlightNode::Element {
                class_names: vec![PENDING_CLASS.to_string(), "kw".to_string()],
                color: None,
                children: vec![HighlightNode::text("a")],
            }],
            stylesheet: stylesheet(),
        };

        let characters = extract_characters(&highlighted);
        assert_eq!(characters[0].style_class, "kw");
        assert_eq!(characters[0].style_attributes["color"], "#955ae7");
    }

    #[test]
    fn test_unknown_class_has_empty_attributes() {
        let highlighted = Highlighted {
            rows: vec![HighlightNode::element("unknown", vec![HighlightNode::text("z")])],
            stylesheet: stylesheet(),
        };

        let characters = extract_characters(&highlighted);
        assert_eq!(characters[0].style_class, "unknown");
        assert!(characters[0].style_attributes.is_empty());
    }

    #[test]
    fn test_fallback_without_tree() {
        let characters = character_info_for(&FixedHighlighter(None), Language::Rust, "ab");
        assert_eq!(
            characters,
            vec![CharacterInfo::plain('a'), CharacterInfo::plain('b')]
        );
    }

    #[test]
    fn test_fallback_on_mismatched_tree() {
        let highlighted = Highlighted {
            rows: vec![HighlightNode::element("kw", vec![HighlightNode::text("abc")])],
            stylesheet: stylesheet(),
        };

        let characters =
            character_info_for(&FixedHighlighter(Some(highlighted)), Language::Rust, "ab");
        assert_eq!(characters.len(), 2);
        assert!(characters.iter().all(|info| info.style_class.is_empty()));
    }
}
