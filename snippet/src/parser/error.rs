use std::fmt;
use std::ops::Range;

use codespan_reporting::diagnostic::{Diagnostic, Label, Severity};

/// A snippet payload that cannot be turned into an action: invalid JSON, wrong
/// value types, a missing required key or an empty command.
#[derive(Debug, Clone)]
pub struct MalformedDirective {
    pub message: String,
    pub span: Range<usize>,
    pub file_id: usize,
    pub notes: Vec<String>,
}

impl MalformedDirective {
    pub fn new(message: impl Into<String>, span: Range<usize>, file_id: usize) -> Self {
        MalformedDirective {
            message: message.into(),
            span,
            file_id,
            notes: Vec::new(),
        }
    }

    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.notes.push(note.into());
        self
    }

    /// Convert to a codespan-reporting Diagnostic for display.
    pub fn to_diagnostic(&self) -> Diagnostic<usize> {
        Diagnostic::new(Severity::Error)
            .with_message(format!("malformed snippet: {}", self.message))
            .with_labels(vec![Label::primary(self.file_id, self.span.clone())])
            .with_notes(self.notes.clone())
    }
}

impl fmt::Display for MalformedDirective {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "malformed snippet: {}", self.message)
    }
}

impl std::error::Error for MalformedDirective {}
