use std::ops::Range;

use crate::action::Action;

/// One `snippet` fence found in a document, before its payload is decoded.
#[derive(Debug, Clone, PartialEq)]
pub struct Directive {
    /// Exact source text of the fence, delimiters included.
    pub text: String,
    /// Byte span of `text` in the source.
    pub span: Range<usize>,
    /// The object literal between the fences.
    pub payload: String,
    /// Byte offset of `payload` in the source.
    pub payload_start: usize,
}

impl Directive {
    /// Opening fence, including the newline that ends it.
    pub const OPEN: &'static str = "```snippet\n";
    /// Closing fence, including the newline that precedes it.
    pub const CLOSE: &'static str = "\n```";

    pub fn payload_span(&self) -> Range<usize> {
        self.payload_start..self.payload_start + self.payload.len()
    }

    /// 1-based line of the opening fence.
    pub fn line(&self, source: &str) -> usize {
        source[..self.span.start.min(source.len())]
            .bytes()
            .filter(|&b| b == b'\n')
            .count()
            + 1
    }
}

/// A directive together with the action decoded from its payload.
#[derive(Debug, Clone, PartialEq)]
pub struct Snippet {
    pub directive: Directive,
    pub action: Action,
}
