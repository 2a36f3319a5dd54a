use snippet::action::Shorthand;
use snippet::parser::Parser;

use crate::document::Document;
use crate::error::{DiagnosticError, DocumentError};
use crate::host::Host;
use crate::stage::{BuildFailurePolicy, StageExecutor};
use crate::transcript::{ListingStyle, render};

/// Knobs that shape how snippets expand, execute and render.
#[derive(Debug, Clone, Default)]
pub struct Options {
    pub shorthand: Shorthand,
    pub listing: ListingStyle,
    pub on_build_failure: BuildFailurePolicy,
}

/// Compile one document: run every snippet in order and replace each with its
/// transcript.
///
/// All snippets are decoded before the first one runs, so a malformed snippet
/// anywhere in the document means nothing is executed. Any other error stops
/// at the offending snippet. Either way no partial text is returned.
pub fn compile_document<H: Host>(
    source: String,
    source_id: usize,
    host: &mut H,
    options: &Options,
) -> Result<String, DocumentError> {
    let parser = Parser::new(source, source_id).with_shorthand(options.shorthand.clone());
    let page = parser.parse().map_err(DocumentError::Malformed)?;
    let lines: Vec<usize> = page
        .snippets
        .iter()
        .map(|s| s.directive.line(parser.source()))
        .collect();

    let mut document = Document::new(parser.into_source());
    let mut executor = StageExecutor::new(host, options.on_build_failure);

    for (snippet, line) in page.snippets.iter().zip(lines) {
        tracing::info!(line, silent = snippet.action.is_silent(), "running snippet");
        let results = executor
            .execute(&snippet.action)
            .map_err(|error| DiagnosticError {
                error,
                span: snippet.directive.span.clone(),
                source_id,
            })?;
        let transcript = render(&results, snippet.action.visibility, &options.listing);
        document = document.substitute(&snippet.directive.text, &transcript);
    }

    Ok(document.into_string())
}
