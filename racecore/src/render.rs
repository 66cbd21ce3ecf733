//! # Render Module - Character classification
//!
//! Every position of the snippet is classified against the typed buffer and merged with the
//! style extracted by the [`highlight`](crate::highlight) module:
//!
//! ```text
//! snippet:  f n · m a i n
//! typed:    f x
//!           ^ ^ ^ ^^^^^^^
//!           │ │ │ └ Pending   (base style, faded)
//!           │ │ └── Cursor    (active cursor marker while focused)
//!           │ └──── Incorrect (incorrect marker merged into the base style)
//!           └────── Correct   (base style)
//! ```
//!
//! Classification is a pure function of the snippet, the typed buffer, the extracted
//! character information and the focus flag.

use crate::highlight::{CharacterInfo, StyleAttributes};

/// Class merged into typed characters that don't match the snippet
pub const INCORRECT_CLASS: &str = "text-red-500 bg-red-800";
/// Class merged into the character under the cursor while the session is focused
pub const CURSOR_CLASS: &str = "current-char";
/// Marker class for characters that haven't been reached yet
pub const PENDING_CLASS: &str = "pending-char";
/// Opacity applied to pending characters
pub const PENDING_OPACITY: &str = "0.5";

/// Utility class prefixes where a later class replaces an earlier one of the same prefix
const CONFLICT_GROUPS: [&str; 3] = ["text-", "bg-", "opacity-"];

/// The render state of a single snippet position
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CharacterState {
    /// Typed and matching the snippet
    Correct,
    /// Typed but not matching the snippet
    Incorrect,
    /// The next position to be typed
    Cursor,
    /// Not reached yet
    Pending,
}

/// Everything a host needs to draw one snippet character
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedCharacter {
    pub index: usize,
    /// The snippet character at `index`
    pub character: char,
    pub state: CharacterState,
    /// What to draw for the character. Whitespace is made visible.
    pub glyph: String,
    pub style_class: String,
    pub style_attributes: StyleAttributes,
}

impl RenderedCharacter {
    pub const fn has_cursor(&self) -> bool {
        matches!(self.state, CharacterState::Cursor)
    }
}

/// The glyph drawn for a snippet character
pub fn display_glyph(character: char) -> String {
    match character {
        '\n' => "↵\n".to_string(),
        ' ' => "·".to_string(),
        other => other.to_string(),
    }
}

fn conflict_group(class: &str) -> Option<&'static str> {
    CONFLICT_GROUPS
        .into_iter()
        .find(|prefix| class.starts_with(*prefix))
}

/// Merge two space separated class lists
///
/// Later classes win: exact duplicates collapse into one, and utility classes of the same
/// conflict group (`text-*`, `bg-*`, `opacity-*`) replace the earlier one.
pub fn merge_classes(base: &str, extra: &str) -> String {
    let mut merged: Vec<&str> = Vec::new();

    for class in base.split_whitespace().chain(extra.split_whitespace()) {
        let group = conflict_group(class);
        merged.retain(|existing| {
            *existing != class && (group.is_none() || conflict_group(existing) != group)
        });
        merged.push(class);
    }

    merged.join(" ")
}

/// Merge two attribute sets, values from `extra` win
pub fn merge_attributes(base: &StyleAttributes, extra: StyleAttributes) -> StyleAttributes {
    let mut merged = base.clone();
    merged.extend(extra);
    merged
}

/// Classify a single snippet position
pub fn classify_character(
    index: usize,
    character: char,
    typed: &[char],
    info: Option<&CharacterInfo>,
    focused: bool,
) -> RenderedCharacter {
    let (base_class, base_attributes) = info
        .map(|info| (info.style_class.as_str(), &info.style_attributes))
        .unwrap_or(("", &EMPTY_ATTRIBUTES));

    let (state, style_class, style_attributes) = match typed.get(index) {
        Some(typed_char) if *typed_char == character => (
            CharacterState::Correct,
            merge_classes(base_class, ""),
            base_attributes.clone(),
        ),
        Some(_) => (
            CharacterState::Incorrect,
            merge_classes(base_class, INCORRECT_CLASS),
            base_attributes.clone(),
        ),
        None if index == typed.len() => (
            CharacterState::Cursor,
            merge_classes(base_class, if focused { CURSOR_CLASS } else { "" }),
            base_attributes.clone(),
        ),
        None => (
            CharacterState::Pending,
            merge_classes(base_class, PENDING_CLASS),
            merge_attributes(
                base_attributes,
                StyleAttributes::from([("opacity".to_string(), PENDING_OPACITY.to_string())]),
            ),
        ),
    };

    RenderedCharacter {
        index,
        character,
        state,
        glyph: display_glyph(character),
        style_class,
        style_attributes,
    }
}

static EMPTY_ATTRIBUTES: StyleAttributes = StyleAttributes::new();

/// Classify every position of `snippet` against `typed`
///
/// `character_info`, when given, must be index-aligned with `snippet`. Missing entries are
/// treated as unstyled characters.
pub fn classify(
    snippet: &[char],
    typed: &[char],
    character_info: Option<&[CharacterInfo]>,
    focused: bool,
) -> Vec<RenderedCharacter> {
    Classifier::new(snippet, typed, character_info, focused).collect()
}

/// Iterator over classified snippet characters
pub struct Classifier<'a> {
    snippet: &'a [char],
    typed: &'a [char],
    character_info: Option<&'a [CharacterInfo]>,
    focused: bool,
    index: usize,
}

impl<'a> Classifier<'a> {
    pub const fn new(
        snippet: &'a [char],
        typed: &'a [char],
        character_info: Option<&'a [CharacterInfo]>,
        focused: bool,
    ) -> Self {
        Self {
            snippet,
            typed,
            character_info,
            focused,
            index: 0,
        }
    }
}

impl ExactSizeIterator for Classifier<'_> {}

impl std::iter::FusedIterator for Classifier<'_> {}

impl Iterator for Classifier<'_> {
    type Item = RenderedCharacter;

    fn next(&mut self) -> Option<Self::Item> {
        let character = *self.snippet.get(self.index)?;
        let info = self
            .character_info
            .and_then(|characters| characters.get(self.index));

        let rendered =
            classify_character(self.index, character, self.typed, info, self.focused);

        self.index += 1;
        Some(rendered)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.snippet.len().saturating_sub(self.index);
        (remaining, Some(remaining))
    }
}

/// A line of rendered characters
pub struct LineContext {
    /// Offset of this line relative to the line holding the cursor
    pub active_line_offset: isize,
    pub contents: Vec<RenderedCharacter>,
}

/// Configuration for line rendering behavior
pub struct LineRenderConfig {
    /// Maximum number of characters per line, `None` for no limit
    pub line_length: Option<usize>,
    /// Whether to break after newline characters (\n)
    pub break_at_newlines: bool,
}

impl LineRenderConfig {
    pub const fn new() -> Self {
        Self {
            line_length: None,
            break_at_newlines: true,
        }
    }

    pub const fn with_line_length(mut self, line_length: usize) -> Self {
        self.line_length = Some(line_length);
        self
    }

    pub const fn with_newline_breaking(mut self, break_at_newlines: bool) -> Self {
        self.break_at_newlines = break_at_newlines;
        self
    }
}

impl Default for LineRenderConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Group rendered characters into lines and hand each one to `line_renderer`
///
/// Lines for which the renderer returns `None` are skipped.
pub fn render_lines<Line, F: FnMut(LineContext) -> Option<Line>>(
    characters: impl Iterator<Item = RenderedCharacter>,
    config: &LineRenderConfig,
    mut line_renderer: F,
) -> Vec<Line> {
    let mut lines: Vec<Vec<RenderedCharacter>> = Vec::new();
    let mut current_line = Vec::new();
    let mut cursor_line = None;

    for rendered in characters {
        if rendered.has_cursor() {
            cursor_line = Some(lines.len());
        }

        if config
            .line_length
            .is_some_and(|length| current_line.len() >= length)
        {
            lines.push(std::mem::take(&mut current_line));
            if rendered.has_cursor() {
                cursor_line = Some(lines.len());
            }
        }

        let is_newline = rendered.character == '\n';
        current_line.push(rendered);

        if config.break_at_newlines && is_newline {
            lines.push(std::mem::take(&mut current_line));
        }
    }

    if !current_line.is_empty() {
        lines.push(current_line);
    }

    // A fully typed snippet has no cursor, it rests on the last line
    let cursor_line = cursor_line.unwrap_or_else(|| lines.len().saturating_sub(1));

    lines
        .into_iter()
        .enumerate()
        .filter_map(|(index, contents)| {
            line_renderer(LineContext {
                active_line_offset: index as isize - cursor_line as isize,
                contents,
            })
        })
        .collect()
}
