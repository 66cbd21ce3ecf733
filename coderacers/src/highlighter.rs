//! A small keyword highlighter
//!
//! Every language gets a table of keywords, type names and a line comment prefix. Lines are
//! scanned left to right into tokens, and each token becomes an `hljs-*` element inside one
//! row element per line. Newlines stay in the rows, so the tree covers every snippet character.

use std::collections::HashMap;

use racecore::{HighlightNode, Highlighted, Highlighter, Language, StyleAttributes, Stylesheet};

/// Color of text outside any token
const BASE_COLOR: &str = "#8b8792";

/// Lexical tables for one language
struct Grammar {
    keywords: &'static [&'static str],
    types: &'static [&'static str],
    literals: &'static [&'static str],
    line_comment: &'static str,
    quotes: &'static [char],
}

const C_LITERALS: &[&str] = &["true", "false", "null"];

fn grammar(language: Language) -> Grammar {
    match language {
        Language::JavaScript | Language::TypeScript => Grammar {
            keywords: &[
                "function", "return", "const", "let", "var", "if", "else", "for", "while", "of",
                "in", "new", "class", "extends", "import", "export", "from", "async", "await",
                "interface", "type", "typeof", "this", "throw", "try", "catch",
            ],
            types: &["number", "string", "boolean", "any", "void", "unknown"],
            literals: &["true", "false", "null", "undefined"],
            line_comment: "//",
            quotes: &['"', '\'', '`'],
        },
        Language::Python => Grammar {
            keywords: &[
                "def", "return", "for", "in", "if", "elif", "else", "while", "import", "from",
                "as", "class", "with", "lambda", "yield", "pass", "and", "or", "not", "is",
                "try", "except", "raise",
            ],
            types: &["int", "float", "str", "bool", "list", "dict", "tuple", "set"],
            literals: &["True", "False", "None"],
            line_comment: "#",
            quotes: &['"', '\''],
        },
        Language::Java | Language::CSharp => Grammar {
            keywords: &[
                "public", "private", "protected", "static", "final", "class", "interface",
                "return", "if", "else", "for", "while", "new", "void", "var", "using",
                "namespace", "this", "throw", "try", "catch",
            ],
            types: &["int", "long", "double", "float", "boolean", "bool", "char", "string"],
            literals: C_LITERALS,
            line_comment: "//",
            quotes: &['"', '\''],
        },
        Language::Php => Grammar {
            keywords: &[
                "function", "return", "echo", "if", "else", "foreach", "as", "class", "public",
                "private", "new", "fn",
            ],
            types: &["int", "string", "float", "bool", "array"],
            literals: C_LITERALS,
            line_comment: "//",
            quotes: &['"', '\''],
        },
        Language::Ruby => Grammar {
            keywords: &[
                "def", "end", "do", "if", "elsif", "else", "unless", "while", "class", "module",
                "return", "puts", "yield", "require",
            ],
            types: &[],
            literals: &["true", "false", "nil"],
            line_comment: "#",
            quotes: &['"', '\''],
        },
        Language::Go => Grammar {
            keywords: &[
                "func", "return", "if", "else", "for", "range", "var", "const", "type",
                "struct", "interface", "package", "import", "defer", "go", "chan", "map",
            ],
            types: &["int", "int64", "string", "bool", "error", "byte", "rune", "float64"],
            literals: &["true", "false", "nil"],
            line_comment: "//",
            quotes: &['"', '\'', '`'],
        },
        Language::C => Grammar {
            keywords: &[
                "return", "if", "else", "for", "while", "struct", "typedef", "static", "const",
                "sizeof", "switch", "case", "break",
            ],
            types: &["int", "char", "void", "float", "double", "long", "unsigned"],
            literals: &["NULL"],
            line_comment: "//",
            quotes: &['"', '\''],
        },
        Language::Swift | Language::Kotlin | Language::Scala => Grammar {
            keywords: &[
                "let", "var", "val", "func", "fun", "def", "return", "if", "else", "for", "in",
                "while", "class", "struct", "object", "import", "guard", "when",
            ],
            types: &["Int", "String", "Boolean", "Bool", "Double", "Unit"],
            literals: &["true", "false", "nil", "null"],
            line_comment: "//",
            quotes: &['"'],
        },
        Language::Rust => Grammar {
            keywords: &[
                "fn", "let", "mut", "const", "static", "use", "mod", "pub", "impl", "trait",
                "struct", "enum", "type", "where", "for", "in", "if", "else", "match", "loop",
                "while", "return", "self", "Self", "as", "ref", "move",
            ],
            types: &[
                "bool", "char", "str", "u8", "u32", "u64", "usize", "i32", "i64", "f64", "String",
                "Vec", "Option", "Result",
            ],
            literals: &["true", "false"],
            line_comment: "//",
            quotes: &['"'],
        },
        Language::Elixir => Grammar {
            keywords: &["def", "defp", "defmodule", "do", "end", "fn", "case", "when", "if"],
            types: &[],
            literals: &["true", "false", "nil"],
            line_comment: "#",
            quotes: &['"'],
        },
        Language::Haskell => Grammar {
            keywords: &["let", "in", "where", "case", "of", "if", "then", "else", "data", "do"],
            types: &["Int", "Integer", "String", "Bool", "Maybe"],
            literals: &["True", "False"],
            line_comment: "--",
            quotes: &['"'],
        },
        Language::Clojure => Grammar {
            keywords: &["defn", "def", "let", "fn", "if", "do", "loop", "recur", "ns"],
            types: &[],
            literals: &["true", "false", "nil"],
            line_comment: ";",
            quotes: &['"'],
        },
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TokenKind {
    Keyword,
    Type,
    Literal,
    String,
    Number,
    Comment,
    Title,
}

impl TokenKind {
    const ALL: [Self; 7] = [
        Self::Keyword,
        Self::Type,
        Self::Literal,
        Self::String,
        Self::Number,
        Self::Comment,
        Self::Title,
    ];

    const fn class_name(self) -> &'static str {
        match self {
            Self::Keyword => "hljs-keyword",
            Self::Type => "hljs-type",
            Self::Literal => "hljs-literal",
            Self::String => "hljs-string",
            Self::Number => "hljs-number",
            Self::Comment => "hljs-comment",
            Self::Title => "hljs-title",
        }
    }

    // Atelier Cave Dark
    const fn color(self) -> &'static str {
        match self {
            Self::Keyword => "#955ae7",
            Self::Type => "#a06e3b",
            Self::Literal | Self::Number => "#aa573c",
            Self::String => "#2a9292",
            Self::Comment => "#7e7887",
            Self::Title => "#576ddb",
        }
    }
}

fn is_word_start(character: char) -> bool {
    character.is_alphabetic() || character == '_' || character == '$'
}

fn is_word(character: char) -> bool {
    character.is_alphanumeric() || character == '_' || character == '$'
}

type Token = (Option<TokenKind>, String);

fn push(tokens: &mut Vec<Token>, plain: &mut String, kind: TokenKind, text: String) {
    if !plain.is_empty() {
        tokens.push((None, std::mem::take(plain)));
    }
    tokens.push((Some(kind), text));
}

/// Split a single line, without its newline, into plain runs and tokens
fn tokenize_line(grammar: &Grammar, line: &str) -> Vec<Token> {
    let characters: Vec<char> = line.chars().collect();
    let comment: Vec<char> = grammar.line_comment.chars().collect();
    let mut tokens = Vec::new();
    let mut plain = String::new();
    let mut position = 0;

    while let Some(&character) = characters.get(position) {
        let rest = &characters[position..];

        if !comment.is_empty() && rest.starts_with(&comment) {
            push(&mut tokens, &mut plain, TokenKind::Comment, rest.iter().collect());
            break;
        }

        let end = if grammar.quotes.contains(&character) {
            let mut end = position + 1;
            while let Some(&next) = characters.get(end) {
                end += 1;
                if next == '\\' {
                    end += 1;
                } else if next == character {
                    break;
                }
            }
            let end = end.min(characters.len());
            push(
                &mut tokens,
                &mut plain,
                TokenKind::String,
                characters[position..end].iter().collect(),
            );
            end
        } else if character.is_ascii_digit() {
            let end = position
                + rest
                    .iter()
                    .take_while(|next| next.is_ascii_alphanumeric() || **next == '.' || **next == '_')
                    .count();
            push(
                &mut tokens,
                &mut plain,
                TokenKind::Number,
                characters[position..end].iter().collect(),
            );
            end
        } else if is_word_start(character) {
            let end = position + rest.iter().take_while(|next| is_word(**next)).count();
            let word: String = characters[position..end].iter().collect();

            let calls = characters[end..]
                .iter()
                .find(|next| !next.is_whitespace())
                .is_some_and(|next| *next == '(');

            let kind = if grammar.keywords.contains(&word.as_str()) {
                Some(TokenKind::Keyword)
            } else if grammar.literals.contains(&word.as_str()) {
                Some(TokenKind::Literal)
            } else if grammar.types.contains(&word.as_str()) {
                Some(TokenKind::Type)
            } else if calls {
                Some(TokenKind::Title)
            } else {
                None
            };

            match kind {
                Some(kind) => push(&mut tokens, &mut plain, kind, word),
                None => plain.push_str(&word),
            }
            end
        } else {
            plain.push(character);
            position + 1
        };

        position = end;
    }

    if !plain.is_empty() {
        tokens.push((None, plain));
    }

    tokens
}

/// Highlights snippets with per-language keyword tables
#[derive(Debug, Default, Clone, Copy)]
pub struct KeywordHighlighter;

impl KeywordHighlighter {
    pub fn stylesheet() -> Stylesheet {
        TokenKind::ALL
            .into_iter()
            .map(|kind| {
                let attributes =
                    StyleAttributes::from([("color".to_string(), kind.color().to_string())]);
                (kind.class_name().to_string(), attributes)
            })
            .collect::<HashMap<_, _>>()
    }
}

impl Highlighter for KeywordHighlighter {
    fn highlight(&self, language: Language, text: &str) -> Option<Highlighted> {
        let grammar = grammar(language);

        let rows = text
            .split_inclusive('\n')
            .map(|line| {
                let (content, newline) = match line.strip_suffix('\n') {
                    Some(content) => (content, true),
                    None => (line, false),
                };

                let mut children: Vec<HighlightNode> = tokenize_line(&grammar, content)
                    .into_iter()
                    .map(|(kind, text)| match kind {
                        Some(kind) => {
                            HighlightNode::element(kind.class_name(), vec![HighlightNode::text(text)])
                        }
                        None => HighlightNode::text(text),
                    })
                    .collect();

                if newline {
                    children.push(HighlightNode::text("\n"));
                }

                HighlightNode::Element {
                    class_names: Vec::new(),
                    color: Some(BASE_COLOR.to_string()),
                    children,
                }
            })
            .collect();

        Some(Highlighted {
            rows,
            stylesheet: Self::stylesheet(),
        })
    }
}
