//! Syntax layer of the snippet compiler.
//!
//! A Markdown document may embed fenced blocks tagged `snippet` whose body is a
//! JSON object describing how to build, show, run and clean up a small code
//! example. This crate finds those blocks ([`parser::scan`]) and decodes them into
//! typed [`action::Action`]s. Nothing here touches the filesystem or spawns
//! processes; see the `runner` crate for that.

pub mod action;
pub mod directive;
pub mod parser;

use crate::directive::Snippet;

/// The decoded snippets of one document, in order of appearance.
#[derive(Debug, Clone)]
pub struct Page {
    pub snippets: Vec<Snippet>,
    /// The source file ID (for error reporting with codespan-reporting).
    pub source_id: usize,
}

impl Page {
    pub fn is_empty(&self) -> bool {
        self.snippets.is_empty()
    }
}
