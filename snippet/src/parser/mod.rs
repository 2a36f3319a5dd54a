pub mod decoder;
pub mod error;
mod scanner;

pub use error::MalformedDirective;
pub use scanner::scan;

use crate::Page;
use crate::action::Shorthand;
use crate::directive::{Directive, Snippet};

/// Parser entry point.
pub struct Parser {
    source: String,
    file_id: usize,
    shorthand: Shorthand,
}

impl Parser {
    pub fn new(source: String, file_id: usize) -> Self {
        Parser {
            source,
            file_id,
            shorthand: Shorthand::default(),
        }
    }

    /// Use `shorthand` to expand `code` directives instead of gcc/a.out.
    pub fn with_shorthand(mut self, shorthand: Shorthand) -> Self {
        self.shorthand = shorthand;
        self
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    /// Hand the source text back, e.g. to start substituting into it.
    pub fn into_source(self) -> String {
        self.source
    }

    /// Find the directives without decoding them.
    pub fn scan(&self) -> Vec<Directive> {
        scanner::scan(&self.source)
    }

    /// Scan and decode every directive. All malformed directives are reported
    /// together; a single one makes the whole page unusable.
    pub fn parse(&self) -> Result<Page, Vec<MalformedDirective>> {
        let mut snippets = Vec::new();
        let mut errors = Vec::new();

        for directive in self.scan() {
            match decoder::decode(&directive, &self.shorthand, self.file_id) {
                Ok(action) => snippets.push(Snippet { directive, action }),
                Err(error) => errors.push(error),
            }
        }

        if errors.is_empty() {
            Ok(Page {
                snippets,
                source_id: self.file_id,
            })
        } else {
            Err(errors)
        }
    }
}
