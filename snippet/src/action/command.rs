use std::fmt;

/// A command line split on whitespace into a program and its arguments.
///
/// There is no shell in between: quotes, pipes, globs and `$VAR` are passed
/// through as literal argument text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandLine {
    text: String,
    program: String,
    args: Vec<String>,
}

impl CommandLine {
    /// Tokenize `text`. Returns `None` when it holds no tokens at all.
    pub fn parse(text: &str) -> Option<Self> {
        let mut tokens = text.split_whitespace();
        let program = tokens.next()?.to_string();
        Some(CommandLine {
            text: text.to_string(),
            program,
            args: tokens.map(str::to_string).collect(),
        })
    }

    /// The command exactly as written in the directive.
    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    pub fn args(&self) -> &[String] {
        &self.args
    }
}

impl fmt::Display for CommandLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}
