use pulldown_cmark::{CodeBlockKind, Event, Options, Parser as CmarkParser, Tag, TagEnd};

use crate::directive::Directive;

const INFO_STRING: &str = "snippet";

/// Find every snippet directive in `source`, first to last.
///
/// A directive is a fence written exactly as `` ```snippet\n{...}\n``` ``:
/// three backticks, the bare `snippet` info string, and a body that starts
/// with `{` and ends with `}`. Other `snippet` fences are left alone.
pub fn scan(source: &str) -> Vec<Directive> {
    let mut directives = Vec::new();
    let mut events = CmarkParser::new_ext(source, Options::empty()).into_offset_iter();

    while let Some((event, range)) = events.next() {
        let Event::Start(Tag::CodeBlock(CodeBlockKind::Fenced(info))) = event else {
            continue;
        };
        if &*info != INFO_STRING {
            continue;
        }

        let mut body = String::new();
        for (event, _) in events.by_ref() {
            match event {
                Event::Text(text) => body.push_str(&text),
                Event::End(TagEnd::CodeBlock) => break,
                _ => {}
            }
        }

        match match_fence(source, range.start, &body) {
            Some(directive) => directives.push(directive),
            None => tracing::debug!(
                offset = range.start,
                "skipping snippet fence without a bare object literal"
            ),
        }
    }

    directives
}

fn match_fence(source: &str, start: usize, body: &str) -> Option<Directive> {
    let payload = body.strip_suffix('\n')?;
    if !payload.starts_with('{') || !payload.ends_with('}') {
        return None;
    }

    let text = format!("{}{}{}", Directive::OPEN, payload, Directive::CLOSE);
    if !source[start..].starts_with(&text) {
        return None;
    }

    Some(Directive {
        span: start..start + text.len(),
        text,
        payload: payload.to_string(),
        payload_start: start + Directive::OPEN.len(),
    })
}
