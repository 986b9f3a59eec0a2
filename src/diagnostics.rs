//! Structured parser diagnostics.
//!
//! Parsers report warnings and notes into a [`Diagnostics`] collector passed
//! to them explicitly; nothing is captured from process-wide output streams.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Note,
    Warning,
    Error,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Note => write!(f, "note"),
            Self::Warning => write!(f, "warning"),
            Self::Error => write!(f, "error"),
        }
    }
}

/// One diagnostic record, optionally tied to a source line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    pub severity: Severity,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line: Option<usize>,
    pub message: String,
}

impl std::fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.line {
            Some(line) => write!(f, "{}: line {}: {}", self.severity, line, self.message),
            None => write!(f, "{}: {}", self.severity, self.message),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Diagnostics {
    records: Vec<Diagnostic>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, diagnostic: Diagnostic) {
        self.records.push(diagnostic);
    }

    pub fn warn(&mut self, line: Option<usize>, message: impl Into<String>) {
        self.push(Diagnostic {
            severity: Severity::Warning,
            line,
            message: message.into(),
        });
    }

    pub fn note(&mut self, line: Option<usize>, message: impl Into<String>) {
        self.push(Diagnostic {
            severity: Severity::Note,
            line,
            message: message.into(),
        });
    }

    pub fn records(&self) -> &[Diagnostic] {
        &self.records
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Warnings and errors; notes are not counted.
    pub fn has_problems(&self) -> bool {
        self.records.iter().any(|d| d.severity >= Severity::Warning)
    }
}

impl Extend<Diagnostic> for Diagnostics {
    fn extend<I: IntoIterator<Item = Diagnostic>>(&mut self, iter: I) {
        self.records.extend(iter);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_with_and_without_line() {
        let mut diags = Diagnostics::new();
        diags.warn(Some(7), "unreachable code");
        diags.note(None, "parsed with defaults");
        let rendered: Vec<String> = diags.records().iter().map(ToString::to_string).collect();
        assert_eq!(rendered, vec!["warning: line 7: unreachable code", "note: parsed with defaults"]);
    }

    #[test]
    fn notes_are_not_problems() {
        let mut diags = Diagnostics::new();
        diags.note(None, "fine");
        assert!(!diags.has_problems());
        diags.warn(None, "hmm");
        assert!(diags.has_problems());
    }
}
