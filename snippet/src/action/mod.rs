pub mod command;
pub mod shorthand;

pub use command::CommandLine;
pub use shorthand::Shorthand;

/// Whether build and run command lines are echoed into the transcript.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Visibility {
    /// Build blocks are rendered and run blocks start with `$ <command>`.
    Echo,
    /// Build blocks are dropped and run blocks hold only program output.
    Silent,
}

/// What one snippet asks for: four stages executed in order.
#[derive(Debug, Clone, PartialEq)]
pub struct Action {
    /// Commands whose diagnostics (stderr) end up in the transcript.
    pub build: Vec<CommandLine>,
    /// Files listed verbatim.
    pub show: Vec<String>,
    /// Commands whose stdout ends up in the transcript.
    pub run: Vec<CommandLine>,
    /// Commands run for their side effects only.
    pub clean: Vec<CommandLine>,
    pub visibility: Visibility,
}

impl Action {
    pub fn is_silent(&self) -> bool {
        self.visibility == Visibility::Silent
    }
}
