//! Restricted INI parsing with non-fatal diagnostics.
//!
//! Malformed content never aborts a parse. Every anomaly is recorded as a
//! [`Diagnostic`] so that a later validation pass can decide what is fatal.

use std::borrow::Cow;
use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};

use indexmap::IndexMap;

/// Key/value pairs of a single section, in file order.
pub type Section = IndexMap<String, String>;

/// All sections of a document, in file order.
pub type Sections = IndexMap<String, Section>;

/// A line-level structural anomaly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    /// 1-based line number
    pub line: usize,
    pub kind: DiagnosticKind,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DiagnosticKind {
    DuplicateSection {
        section: String,
        first_line: usize,
    },
    DuplicateKey {
        section: String,
        key: String,
        first_line: usize,
    },
    KeyOutsideSection {
        text: String,
    },
    EmptyKey {
        text: String,
    },
    InvalidFormat {
        text: String,
    },
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Line {}: ", self.line)?;
        match &self.kind {
            DiagnosticKind::DuplicateSection {
                section,
                first_line,
            } => write!(
                f,
                "Duplicate section [{section}] (first defined at line {first_line})"
            ),
            DiagnosticKind::DuplicateKey {
                section,
                key,
                first_line,
            } => write!(
                f,
                "Duplicate key '{key}' in section '[{section}]' (first defined at line {first_line})"
            ),
            DiagnosticKind::KeyOutsideSection { text } => {
                write!(f, "Key outside section '{text}'")
            }
            DiagnosticKind::EmptyKey { text } => write!(f, "Empty key in '{text}'"),
            DiagnosticKind::InvalidFormat { text } => write!(f, "Invalid format '{text}'"),
        }
    }
}

/// Result of parsing one INI source.
///
/// The document is immutable once built. Data anomalies are available through
/// [`duplicates`](Self::duplicates) and [`invalid_lines`](Self::invalid_lines).
#[derive(Debug, Clone, PartialEq)]
pub struct ConfigDocument {
    source_path: PathBuf,
    sections: Sections,
    duplicates: Vec<Diagnostic>,
    invalid_lines: Vec<Diagnostic>,
}

impl ConfigDocument {
    /// Parse `text` line by line. Never fails.
    pub fn parse(source_path: impl Into<PathBuf>, text: &str) -> Self {
        let mut parser = Parser::default();
        for (idx, line) in split_lines(text).enumerate() {
            parser.process_line(line.trim(), idx + 1);
        }

        Self {
            source_path: source_path.into(),
            sections: parser.sections,
            duplicates: parser.duplicates,
            invalid_lines: parser.invalid_lines,
        }
    }

    pub fn get(&self, section: &str, key: &str) -> Option<&str> {
        self.sections
            .get(section)
            .and_then(|s| s.get(key))
            .map(String::as_str)
    }

    /// Like [`get`](Self::get) but falls back to `default`.
    pub fn get_or<'a>(&'a self, section: &str, key: &str, default: &'a str) -> &'a str {
        self.get(section, key).unwrap_or(default)
    }

    pub fn sections(&self) -> &Sections {
        &self.sections
    }

    /// A section's pairs, or an empty map if the section does not exist.
    pub fn section(&self, name: &str) -> Cow<'_, Section> {
        match self.sections.get(name) {
            Some(section) => Cow::Borrowed(section),
            None => Cow::Owned(Section::new()),
        }
    }

    pub fn has_section(&self, name: &str) -> bool {
        self.sections.contains_key(name)
    }

    pub fn duplicates(&self) -> &[Diagnostic] {
        &self.duplicates
    }

    pub fn invalid_lines(&self) -> &[Diagnostic] {
        &self.invalid_lines
    }

    /// Both diagnostic channels merged in line order.
    pub fn diagnostics(&self) -> impl Iterator<Item = &Diagnostic> {
        let mut all: Vec<&Diagnostic> = self
            .duplicates
            .iter()
            .chain(self.invalid_lines.iter())
            .collect();
        all.sort_by_key(|d| d.line);
        all.into_iter()
    }

    /// True when no duplicates and no invalid lines were recorded.
    pub fn is_valid(&self) -> bool {
        self.duplicates.is_empty() && self.invalid_lines.is_empty()
    }

    pub fn source_path(&self) -> &Path {
        &self.source_path
    }
}

/// Split on `\n`, `\r\n` or a lone `\r`. A final terminator does not start
/// another line.
fn split_lines(text: &str) -> impl Iterator<Item = &str> {
    let mut rest = text;
    std::iter::from_fn(move || {
        if rest.is_empty() {
            return None;
        }
        let Some(end) = rest.find(|c: char| c == '\r' || c == '\n') else {
            return Some(std::mem::take(&mut rest));
        };
        let line = &rest[..end];
        let width = if rest[end..].starts_with("\r\n") { 2 } else { 1 };
        rest = &rest[end + width..];
        Some(line)
    })
}

/// Line classifier state. `current` is the most recently opened section.
#[derive(Default)]
struct Parser {
    sections: Sections,
    duplicates: Vec<Diagnostic>,
    invalid_lines: Vec<Diagnostic>,
    current: Option<String>,
    section_lines: HashMap<String, usize>,
    key_lines: HashMap<(String, String), usize>,
}

impl Parser {
    fn process_line(&mut self, line: &str, line_num: usize) {
        if line.is_empty() || line.starts_with(';') || line.starts_with('#') {
            return;
        }

        if let Some(name) = line.strip_prefix('[').and_then(|l| l.strip_suffix(']')) {
            self.process_section(name, line_num);
        } else if line.contains('=') {
            self.process_key_value(line, line_num);
        } else {
            self.invalid_lines.push(Diagnostic {
                line: line_num,
                kind: DiagnosticKind::InvalidFormat {
                    text: line.to_string(),
                },
            });
        }
    }

    fn process_section(&mut self, name: &str, line_num: usize) {
        if let Some(&first_line) = self.section_lines.get(name) {
            self.duplicates.push(Diagnostic {
                line: line_num,
                kind: DiagnosticKind::DuplicateSection {
                    section: name.to_string(),
                    first_line,
                },
            });
        } else {
            self.section_lines.insert(name.to_string(), line_num);
            self.sections.insert(name.to_string(), Section::new());
        }
        self.current = Some(name.to_string());
    }

    fn process_key_value(&mut self, line: &str, line_num: usize) {
        let Some(current) = self.current.as_deref() else {
            self.invalid_lines.push(Diagnostic {
                line: line_num,
                kind: DiagnosticKind::KeyOutsideSection {
                    text: line.to_string(),
                },
            });
            return;
        };

        // Caller guarantees at least one '='
        let (key, value) = line.split_once('=').unwrap_or((line, ""));
        let (key, value) = (key.trim(), value.trim());

        if key.is_empty() {
            self.invalid_lines.push(Diagnostic {
                line: line_num,
                kind: DiagnosticKind::EmptyKey {
                    text: line.to_string(),
                },
            });
            return;
        }

        let slot = (current.to_string(), key.to_string());
        if let Some(&first_line) = self.key_lines.get(&slot) {
            self.duplicates.push(Diagnostic {
                line: line_num,
                kind: DiagnosticKind::DuplicateKey {
                    section: current.to_string(),
                    key: key.to_string(),
                    first_line,
                },
            });
            return;
        }

        self.sections
            .entry(current.to_string())
            .or_default()
            .insert(key.to_string(), value.to_string());
        self.key_lines.insert(slot, line_num);
    }
}
