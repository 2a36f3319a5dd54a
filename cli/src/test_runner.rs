//! `snippets test`: regression tests for documents.
//!
//! A `.test.md` file starts with TOML frontmatter between `---` lines; the
//! rest is the document to compile. Commands run in the test file's directory.

use std::path::{Path, PathBuf};

use serde::Deserialize;

use runner::{DocumentError, Options, SystemHost, compile_document};

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TestConfig {
    /// Human-readable test description.
    pub description: Option<String>,

    /// The whole compiled document (trimmed comparison).
    pub expect_output: Option<String>,

    /// Substrings the compiled document must contain.
    pub expect_contains: Vec<String>,

    /// The fatal error's message must contain this substring.
    pub expect_error: Option<String>,

    /// Decoding must fail.
    pub expect_malformed: bool,
}

/// Split a `.test.md` file into its config and document.
fn parse_test_file(content: &str) -> Result<(TestConfig, &str), String> {
    let content = content.trim_start_matches('\u{feff}');
    let rest = content
        .strip_prefix("---\n")
        .or_else(|| content.strip_prefix("---\r\n"))
        .ok_or("missing opening --- frontmatter delimiter")?;

    let (frontmatter, document) = if let Some(document) = rest.strip_prefix("---") {
        ("", document)
    } else {
        rest.split_once("\n---")
            .ok_or("missing closing --- frontmatter delimiter")?
    };
    let document = document
        .strip_prefix("\r\n")
        .or_else(|| document.strip_prefix('\n'))
        .unwrap_or(document);

    let config: TestConfig =
        toml::from_str(frontmatter).map_err(|e| format!("TOML parse error: {}", e))?;
    Ok((config, document))
}

pub enum TestOutcome {
    Pass,
    Fail(String),
}

pub struct TestResult {
    pub path: PathBuf,
    pub description: Option<String>,
    pub outcome: TestOutcome,
}

impl TestResult {
    fn label(&self) -> String {
        self.description.clone().unwrap_or_else(|| {
            self.path
                .file_name()
                .and_then(|s| s.to_str())
                .map(|s| s.trim_end_matches(".test.md").to_string())
                .unwrap_or_else(|| "?".to_string())
        })
    }
}

/// Snippets in a test file run next to it. A bare file name has an empty
/// parent, which means the current directory.
fn working_dir(path: &Path) -> PathBuf {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    }
}

fn run_single_test(path: &Path, options: &Options) -> TestResult {
    let fail = |description: Option<String>, reason: String| TestResult {
        path: path.to_path_buf(),
        description,
        outcome: TestOutcome::Fail(reason),
    };

    let content = match std::fs::read_to_string(path) {
        Ok(c) => c,
        Err(e) => return fail(None, format!("cannot read file: {}", e)),
    };
    let (config, document) = match parse_test_file(&content) {
        Ok(pair) => pair,
        Err(e) => return fail(None, format!("frontmatter error: {}", e)),
    };

    let mut host = SystemHost::new(working_dir(path));
    let result = compile_document(document.to_string(), 0, &mut host, options);

    let failure = check(&config, result);
    TestResult {
        path: path.to_path_buf(),
        description: config.description,
        outcome: failure.map_or(TestOutcome::Pass, TestOutcome::Fail),
    }
}

/// Compare a compile result with the expectations. Returns `Some(reason)` on mismatch.
fn check(config: &TestConfig, result: Result<String, DocumentError>) -> Option<String> {
    if config.expect_malformed {
        return match result {
            Err(DocumentError::Malformed(_)) => None,
            Err(e) => Some(format!("expected a malformed snippet, got: {}", e)),
            Ok(_) => Some("expected a malformed snippet, but compiling succeeded".into()),
        };
    }

    let output = match (&config.expect_error, result) {
        (Some(expected), Err(e)) => {
            let message = e.to_string();
            return (!message.contains(expected.as_str())).then(|| {
                format!("expected error containing \"{}\", got: {}", expected, message)
            });
        }
        (Some(expected), Ok(_)) => {
            return Some(format!(
                "expected error containing \"{}\", but compiling succeeded",
                expected
            ));
        }
        (None, Err(e)) => return Some(format!("unexpected error: {}", e)),
        (None, Ok(output)) => output,
    };

    if let Some(expected) = &config.expect_output {
        if output.trim() != expected.trim() {
            return Some(format!(
                "output mismatch\n  expected:\n{}\n  actual:\n{}",
                indent(expected.trim()),
                indent(output.trim())
            ));
        }
    }

    config
        .expect_contains
        .iter()
        .find(|needle| !output.contains(needle.as_str()))
        .map(|needle| {
            format!(
                "output does not contain {:?}\n  actual:\n{}",
                needle,
                indent(output.trim())
            )
        })
}

fn indent(text: &str) -> String {
    text.lines()
        .map(|line| format!("    {}", line))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Collect `.test.md` files under `dir`, sorted.
fn discover(dir: &Path) -> Vec<PathBuf> {
    let mut found = Vec::new();
    collect_tests(dir, &mut found);
    found.sort();
    found
}

fn collect_tests(dir: &Path, out: &mut Vec<PathBuf>) {
    let Ok(entries) = std::fs::read_dir(dir) else {
        return;
    };
    for entry in entries.flatten() {
        let path = entry.path();
        if path.is_dir() {
            collect_tests(&path, out);
        } else if path
            .file_name()
            .and_then(|n| n.to_str())
            .is_some_and(|name| name.ends_with(".test.md"))
        {
            out.push(path);
        }
    }
}

fn paint(text: &str, code: &str, no_color: bool) -> String {
    if no_color {
        text.to_string()
    } else {
        format!("\x1b[{}m{}\x1b[0m", code, text)
    }
}

/// Run a single `.test.md` file or every one below a directory.
/// Returns exit code: 0 = all pass, 1 = any failure.
pub fn run_tests(path: &Path, options: &Options, no_color: bool) -> i32 {
    let files = if path.is_file() {
        vec![path.to_path_buf()]
    } else {
        discover(path)
    };
    if files.is_empty() {
        eprintln!("no .test.md files found in {}", path.display());
        return 1;
    }

    let mut failures = Vec::new();
    for file in &files {
        let result = run_single_test(file, options);
        if matches!(result.outcome, TestOutcome::Pass) {
            eprintln!("  {}  {}", paint("PASS", "32", no_color), result.label());
        } else {
            eprintln!("  {}  {}", paint("FAIL", "31", no_color), result.label());
            failures.push(result);
        }
    }

    if !failures.is_empty() {
        eprintln!();
        eprintln!("failures:");
        for failure in &failures {
            eprintln!();
            eprintln!("  --- {} ---", failure.path.display());
            if let TestOutcome::Fail(reason) = &failure.outcome {
                for line in reason.lines() {
                    eprintln!("  {}", line);
                }
            }
        }
    }

    let passed = files.len() - failures.len();
    eprintln!();
    if failures.is_empty() {
        eprintln!(
            "test result: {}. {} passed, 0 failed",
            paint("ok", "32", no_color),
            passed
        );
        0
    } else {
        eprintln!(
            "test result: {}. {} passed, {} failed (of {})",
            paint("FAILED", "31", no_color),
            passed,
            failures.len(),
            files.len()
        );
        1
    }
}
