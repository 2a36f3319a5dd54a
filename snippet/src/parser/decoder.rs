use std::ops::Range;

use serde_json::{Map, Value};

use crate::action::{Action, CommandLine, Shorthand, Visibility};
use crate::directive::Directive;
use crate::parser::error::MalformedDirective;

const STAGES: [&str; 4] = ["build", "show", "run", "clean"];

/// Decode a directive's payload into an action.
///
/// A `code` key selects the single-file shorthand and wins over any explicit
/// stage lists, which are then not looked at. Otherwise `build` and `show`
/// are required and `run`/`clean` default to empty. Unknown keys are
/// ignored and a repeated key keeps its last value.
pub fn decode(
    directive: &Directive,
    shorthand: &Shorthand,
    file_id: usize,
) -> Result<Action, MalformedDirective> {
    let mut payload: Map<String, Value> = serde_json::from_str(&directive.payload)
        .map_err(|e| json_error(directive, &e, file_id))?;

    if let Some(code) = payload.remove("code") {
        let path = match code {
            Value::String(path) => path,
            other => {
                return Err(MalformedDirective::new(
                    format!("`code` must be a file name, found {}", other),
                    directive.payload_span(),
                    file_id,
                ));
            }
        };
        let ignored: Vec<&str> = STAGES
            .into_iter()
            .filter(|key| payload.contains_key(*key))
            .collect();
        if !ignored.is_empty() {
            tracing::warn!(
                code = %path,
                ignored = ?ignored,
                "snippet has both `code` and explicit stages; using `code`"
            );
        }
        return shorthand
            .expand(&path)
            .map_err(|msg| MalformedDirective::new(msg, directive.payload_span(), file_id));
    }

    let build = string_list(directive, &mut payload, "build", file_id)?
        .ok_or_else(|| missing_key(directive, "build", file_id))?;
    let show = string_list(directive, &mut payload, "show", file_id)?
        .ok_or_else(|| missing_key(directive, "show", file_id))?;
    let run = string_list(directive, &mut payload, "run", file_id)?.unwrap_or_default();
    let clean = string_list(directive, &mut payload, "clean", file_id)?.unwrap_or_default();

    Ok(Action {
        build: commands(directive, "build", build, file_id)?,
        show,
        run: commands(directive, "run", run, file_id)?,
        clean: commands(directive, "clean", clean, file_id)?,
        visibility: Visibility::Echo,
    })
}

/// Take `key` out of the payload as a list of strings, if present.
fn string_list(
    directive: &Directive,
    payload: &mut Map<String, Value>,
    key: &str,
    file_id: usize,
) -> Result<Option<Vec<String>>, MalformedDirective> {
    payload
        .remove(key)
        .map(|value| {
            serde_json::from_value(value).map_err(|e| {
                MalformedDirective::new(
                    format!("`{}` must be a list of strings: {}", key, e),
                    directive.payload_span(),
                    file_id,
                )
            })
        })
        .transpose()
}

fn commands(
    directive: &Directive,
    stage: &str,
    lines: Vec<String>,
    file_id: usize,
) -> Result<Vec<CommandLine>, MalformedDirective> {
    lines
        .iter()
        .enumerate()
        .map(|(i, line)| {
            CommandLine::parse(line).ok_or_else(|| {
                MalformedDirective::new(
                    format!("`{}` command #{} is empty", stage, i + 1),
                    directive.payload_span(),
                    file_id,
                )
            })
        })
        .collect()
}

fn missing_key(directive: &Directive, key: &str, file_id: usize) -> MalformedDirective {
    MalformedDirective::new(
        format!("missing required key `{}`", key),
        directive.payload_span(),
        file_id,
    )
    .with_note("list `build` and `show` explicitly, or use `{\"code\": \"<file>\"}`")
}

fn json_error(
    directive: &Directive,
    error: &serde_json::Error,
    file_id: usize,
) -> MalformedDirective {
    let text = error.to_string();
    // serde_json positions are relative to the payload; the span carries the
    // real location instead.
    let location = format!(" at line {} column {}", error.line(), error.column());
    let message = text.strip_suffix(&location).unwrap_or(&text).to_string();

    MalformedDirective::new(message, json_error_span(directive, error), file_id)
}

fn json_error_span(directive: &Directive, error: &serde_json::Error) -> Range<usize> {
    if error.line() == 0 {
        return directive.payload_span();
    }
    let payload = &directive.payload;
    let offset = line_column_offset(payload, error.line(), error.column());
    let width = payload[offset..].chars().next().map_or(0, char::len_utf8);
    let start = directive.payload_start + offset;
    start..start + width
}

/// Byte offset of a 1-based line/column pair, clamped to a char boundary.
fn line_column_offset(text: &str, line: usize, column: usize) -> usize {
    let line_start: usize = text
        .split_inclusive('\n')
        .take(line.saturating_sub(1))
        .map(str::len)
        .sum();
    let mut offset = (line_start + column.saturating_sub(1)).min(text.len());
    while !text.is_char_boundary(offset) {
        offset -= 1;
    }
    offset
}
