use std::fmt;
use std::ops::Range;

use codespan_reporting::diagnostic::{Diagnostic, Label, Severity};
use snippet::parser::MalformedDirective;

#[derive(Debug)]
pub enum RunError {
    /// A `show` path could not be read.
    FileUnavailable { path: String, reason: String },
    /// A command could not be launched, or a `run` command did not succeed.
    ProcessInvocationFailure {
        command: String,
        failure: InvocationFailure,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InvocationFailure {
    Launch(String),
    Status(i32),
    Signal,
}

impl fmt::Display for RunError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RunError::FileUnavailable { path, reason } => {
                write!(f, "cannot read '{}': {}", path, reason)
            }
            RunError::ProcessInvocationFailure { command, failure } => match failure {
                InvocationFailure::Launch(reason) => {
                    write!(f, "cannot launch '{}': {}", command, reason)
                }
                InvocationFailure::Status(code) => {
                    write!(f, "'{}' exited with status {}", command, code)
                }
                InvocationFailure::Signal => {
                    write!(f, "'{}' was terminated by a signal", command)
                }
            },
        }
    }
}

impl std::error::Error for RunError {}

/// A stage failure pinned to the snippet that caused it.
#[derive(Debug)]
pub struct DiagnosticError {
    pub error: RunError,
    pub span: Range<usize>,
    pub source_id: usize,
}

impl DiagnosticError {
    pub fn to_diagnostic(&self) -> Diagnostic<usize> {
        Diagnostic::new(Severity::Error)
            .with_message(self.error.to_string())
            .with_labels(vec![
                Label::primary(self.source_id, self.span.clone())
                    .with_message("while processing this snippet"),
            ])
    }
}

impl fmt::Display for DiagnosticError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.error.fmt(f)
    }
}

impl std::error::Error for DiagnosticError {}

/// Why a document could not be compiled. Either way nothing is written for it.
#[derive(Debug)]
pub enum DocumentError {
    Malformed(Vec<MalformedDirective>),
    Run(DiagnosticError),
}

impl DocumentError {
    pub fn to_diagnostics(&self) -> Vec<Diagnostic<usize>> {
        match self {
            DocumentError::Malformed(errors) => {
                errors.iter().map(MalformedDirective::to_diagnostic).collect()
            }
            DocumentError::Run(error) => vec![error.to_diagnostic()],
        }
    }
}

impl fmt::Display for DocumentError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DocumentError::Malformed(errors) => {
                let messages: Vec<String> = errors.iter().map(|e| e.to_string()).collect();
                write!(f, "{}", messages.join("; "))
            }
            DocumentError::Run(error) => error.fmt(f),
        }
    }
}

impl std::error::Error for DocumentError {}

impl From<DiagnosticError> for DocumentError {
    fn from(error: DiagnosticError) -> Self {
        DocumentError::Run(error)
    }
}
