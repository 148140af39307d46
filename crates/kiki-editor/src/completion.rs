//! Word completion for Insert mode.
//!
//! Tab looks at the identifier prefix left of the cursor (letters, digits,
//! `_`), asks a [`CompletionProvider`] for candidates, and opens a
//! [`CompletionMenu`]. Accepting a candidate replaces the prefix.
//!
//! The built-in [`KeywordProvider`] knows a few keywords and snippets per
//! [`Language`] and also offers identifiers already present in the
//! document.

use std::collections::BTreeSet;
use std::fmt;
use std::path::Path;

use crate::document::Document;
use crate::position::Position;

/// Most candidates a menu shows.
pub const MAX_ITEMS: usize = 10;

// ---------------------------------------------------------------------------
// Language
// ---------------------------------------------------------------------------

/// File type, detected from the extension.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Language {
    Rust,
    Go,
    Python,
    JavaScript,
    #[default]
    Text,
}

impl Language {
    #[must_use]
    pub fn detect(path: Option<&Path>) -> Self {
        let ext = path
            .and_then(Path::extension)
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase);
        match ext.as_deref() {
            Some("rs") => Self::Rust,
            Some("go") => Self::Go,
            Some("py") => Self::Python,
            Some("js" | "jsx" | "ts" | "tsx" | "mjs") => Self::JavaScript,
            _ => Self::Text,
        }
    }

    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Rust => "Rust",
            Self::Go => "Go",
            Self::Python => "Python",
            Self::JavaScript => "JavaScript",
            Self::Text => "Text",
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// ---------------------------------------------------------------------------
// Completion
// ---------------------------------------------------------------------------

/// One candidate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Completion {
    pub text: String,
    pub description: String,
}

impl Completion {
    #[must_use]
    pub fn new(text: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            description: description.into(),
        }
    }
}

/// Source of completion candidates.
pub trait CompletionProvider {
    /// Candidates whose text starts with `prefix`, ignoring case.
    fn complete(&self, language: Language, prefix: &str, doc: &Document) -> Vec<Completion>;
}

#[inline]
#[must_use]
pub fn is_ident_char(ch: char) -> bool {
    ch.is_ascii_alphanumeric() || ch == '_'
}

/// The identifier run ending at `col` in `line`: its start column and text.
#[must_use]
pub fn identifier_prefix(line: &str, col: usize) -> (usize, String) {
    let before: Vec<char> = line.chars().take(col).collect();
    let len = before
        .iter()
        .rev()
        .take_while(|c| is_ident_char(**c))
        .count();
    let start = before.len() - len;
    (start, before[start..].iter().collect())
}

fn starts_with_ignore_case(text: &str, prefix: &str) -> bool {
    text.to_lowercase().starts_with(&prefix.to_lowercase())
}

// ---------------------------------------------------------------------------
// KeywordProvider
// ---------------------------------------------------------------------------

const RUST: &[(&str, &str)] = &[
    ("fn", "function declaration"),
    ("struct", "struct declaration"),
    ("enum", "enum declaration"),
    ("impl", "implementation block"),
    ("trait", "trait declaration"),
    ("let", "variable binding"),
    ("mut", "mutable binding"),
    ("match", "match expression"),
    ("loop", "loop expression"),
    ("while", "while loop"),
    ("for", "for loop"),
    ("return", "return expression"),
    ("println!()", "print line macro"),
    ("vec![]", "vector macro"),
    ("Some()", "Some variant"),
    ("None", "None variant"),
    ("Ok()", "Ok variant"),
    ("Err()", "Err variant"),
];

const GO: &[(&str, &str)] = &[
    ("func", "function declaration"),
    ("type", "type declaration"),
    ("struct", "struct declaration"),
    ("interface", "interface declaration"),
    ("range", "range clause"),
    ("return", "return statement"),
    ("package", "package declaration"),
    ("import", "import declaration"),
    ("string", "string type"),
    ("error", "error type"),
    ("fmt.Println()", "print line"),
    ("append()", "append builtin"),
];

const PYTHON: &[(&str, &str)] = &[
    ("def", "function definition"),
    ("class", "class definition"),
    ("import", "import statement"),
    ("from", "import from"),
    ("return", "return statement"),
    ("lambda", "anonymous function"),
    ("print()", "print builtin"),
    ("self", "instance reference"),
    ("None", "null value"),
];

const JAVASCRIPT: &[(&str, &str)] = &[
    ("function", "function declaration"),
    ("const", "constant declaration"),
    ("let", "variable declaration"),
    ("return", "return statement"),
    ("async", "async function"),
    ("await", "await expression"),
    ("console.log()", "log to console"),
    ("undefined", "undefined value"),
];

/// Keyword tables plus identifiers from the document.
#[derive(Debug, Clone, Copy, Default)]
pub struct KeywordProvider;

impl KeywordProvider {
    const fn table(language: Language) -> &'static [(&'static str, &'static str)] {
        match language {
            Language::Rust => RUST,
            Language::Go => GO,
            Language::Python => PYTHON,
            Language::JavaScript => JAVASCRIPT,
            Language::Text => &[],
        }
    }
}

impl CompletionProvider for KeywordProvider {
    fn complete(&self, language: Language, prefix: &str, doc: &Document) -> Vec<Completion> {
        if prefix.is_empty() {
            return Vec::new();
        }
        let mut out: Vec<Completion> = Self::table(language)
            .iter()
            .filter(|(text, _)| *text != prefix && starts_with_ignore_case(text, prefix))
            .map(|(text, desc)| Completion::new(*text, *desc))
            .collect();

        let words: BTreeSet<&str> = doc
            .lines()
            .iter()
            .flat_map(|line| line.split(|c: char| !is_ident_char(c)))
            .filter(|w| w.chars().count() > 2 && *w != prefix && starts_with_ignore_case(w, prefix))
            .collect();
        for word in words {
            if !out.iter().any(|c| c.text == word) {
                out.push(Completion::new(word, "in document"));
            }
        }

        out.truncate(MAX_ITEMS);
        out
    }
}

// ---------------------------------------------------------------------------
// CompletionMenu
// ---------------------------------------------------------------------------

/// An open completion popup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompletionMenu {
    items: Vec<Completion>,
    selected: usize,
    /// Where the replaced prefix starts.
    anchor: Position,
}

impl CompletionMenu {
    /// `None` when there is nothing to show.
    #[must_use]
    pub fn new(items: Vec<Completion>, anchor: Position) -> Option<Self> {
        (!items.is_empty()).then_some(Self {
            items,
            selected: 0,
            anchor,
        })
    }

    #[must_use]
    pub fn items(&self) -> &[Completion] {
        &self.items
    }

    #[must_use]
    pub const fn selected_index(&self) -> usize {
        self.selected
    }

    #[must_use]
    pub fn selected(&self) -> &Completion {
        &self.items[self.selected]
    }

    #[must_use]
    pub const fn anchor(&self) -> Position {
        self.anchor
    }

    pub fn select_next(&mut self) {
        self.selected = (self.selected + 1) % self.items.len();
    }

    pub fn select_previous(&mut self) {
        let n = self.items.len();
        self.selected = (self.selected + n - 1) % n;
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
