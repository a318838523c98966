use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

// ═══════════════════════════════════════════════════════════════════════════════
// PARSE ERROR
// ═══════════════════════════════════════════════════════════════════════════════

/// The JavaScript parser could not produce a tree.
///
/// `message` holds one `input:LINE:COLUMN: ERROR - text` line per parser
/// diagnostic, followed by an error count.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
#[error("{message}")]
pub struct ParseError {
    pub message: String,
}

impl ParseError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// A single parser diagnostic positioned in the parsed text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyntaxIssue {
    pub line: usize,
    pub column: usize,
    pub message: String,
}

impl SyntaxIssue {
    /// Resolves a byte offset into 1-based line and column numbers.
    pub fn at_offset(source: &str, offset: usize, message: impl Into<String>) -> Self {
        let offset = offset.min(source.len());
        let before = source.get(..offset).unwrap_or(source);
        let line = before.matches('\n').count() + 1;
        let column = match before.rfind('\n') {
            Some(newline) => before[newline + 1..].chars().count() + 1,
            None => before.chars().count() + 1,
        };
        Self {
            line,
            column,
            message: message.into(),
        }
    }
}

impl ParseError {
    pub fn from_issues(source_name: &str, issues: &[SyntaxIssue]) -> Self {
        let mut lines: Vec<String> = issues
            .iter()
            .map(|issue| {
                format!(
                    "{}:{}:{}: ERROR - {}",
                    source_name, issue.line, issue.column, issue.message
                )
            })
            .collect();
        let plural = if issues.len() == 1 { "" } else { "s" };
        lines.push(format!("{} error{}", issues.len(), plural));
        Self::new(lines.join("\n"))
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// RENAME ERROR
// ═══════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Error)]
pub enum RenameError {
    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid rename map: {reason}")]
    InvalidRenameMap { reason: String },

    #[error("unsupported input file '{path}': expected an .html or .js file")]
    UnsupportedInput { path: String },
}

// ═══════════════════════════════════════════════════════════════════════════════
// DIAGNOSTICS SINK
// ═══════════════════════════════════════════════════════════════════════════════

/// A non-fatal problem: the offending text was left unmodified.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Diagnostic {
    /// The template expression (or other fragment) that could not be renamed.
    pub source: String,
    pub message: String,
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "could not rename '{}': {}", self.source, self.message)
    }
}

/// Collects non-fatal diagnostics so the caller decides how to report them.
#[derive(Debug, Clone, Default)]
pub struct Diagnostics {
    entries: Vec<Diagnostic>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, source: &str, error: &ParseError) {
        self.entries.push(Diagnostic {
            source: source.to_string(),
            message: error.message.clone(),
        });
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Diagnostic> {
        self.entries.iter()
    }

    pub fn into_vec(self) -> Vec<Diagnostic> {
        self.entries
    }
}
