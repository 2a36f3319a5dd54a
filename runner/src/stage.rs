use snippet::action::{Action, CommandLine};

use crate::error::{InvocationFailure, RunError};
use crate::host::{Host, Output};

/// What to do with the run stage after a build command reported diagnostics.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum BuildFailurePolicy {
    /// Keep going: show, run and clean all execute after a failed build.
    #[default]
    Continue,
    /// Skip the run stage. Show and clean still execute.
    SkipRun,
}

/// One build command and whatever it wrote to stderr.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildRecord {
    pub command: String,
    pub diagnostic: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BuildStage {
    pub records: Vec<BuildRecord>,
    /// Set when a command produced diagnostics; later build commands were skipped.
    pub failed: bool,
}

/// A file listed by the show stage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Listing {
    pub path: String,
    pub content: String,
}

/// The captured stdout of one run command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunCapture {
    pub command: String,
    pub stdout: String,
}

/// Everything one snippet produced that may end up in its transcript.
/// The clean stage leaves nothing behind.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StageResults {
    pub build: BuildStage,
    pub show: Vec<Listing>,
    pub run: Vec<RunCapture>,
}

/// Runs the build, show, run and clean stages of an action, in that order.
pub struct StageExecutor<'h, H: Host> {
    host: &'h mut H,
    policy: BuildFailurePolicy,
}

impl<'h, H: Host> StageExecutor<'h, H> {
    pub fn new(host: &'h mut H, policy: BuildFailurePolicy) -> Self {
        StageExecutor { host, policy }
    }

    pub fn execute(&mut self, action: &Action) -> Result<StageResults, RunError> {
        let build = self.build(&action.build)?;
        let show = self.show(&action.show)?;
        let run = if build.failed && self.policy == BuildFailurePolicy::SkipRun {
            tracing::info!("build failed; skipping run stage");
            Vec::new()
        } else {
            self.run(&action.run)?
        };
        self.clean(&action.clean);

        Ok(StageResults { build, show, run })
    }

    fn build(&mut self, commands: &[CommandLine]) -> Result<BuildStage, RunError> {
        let mut stage = BuildStage::default();

        for command in commands {
            tracing::debug!(command = %command, "build");
            let output = self.invoke(command)?;
            let diagnostic = (!output.stderr.is_empty()).then(|| decode(&output.stderr));
            let failed = diagnostic.is_some();
            stage.records.push(BuildRecord {
                command: command.text().to_string(),
                diagnostic,
            });
            if failed {
                tracing::info!(command = %command, "build reported diagnostics");
                stage.failed = true;
                break;
            }
        }

        Ok(stage)
    }

    fn show(&mut self, paths: &[String]) -> Result<Vec<Listing>, RunError> {
        paths
            .iter()
            .map(|path| {
                tracing::debug!(path = %path, "show");
                let content = self.host.read_to_string(path).map_err(|e| {
                    RunError::FileUnavailable {
                        path: path.clone(),
                        reason: e.to_string(),
                    }
                })?;
                Ok(Listing {
                    path: path.clone(),
                    content,
                })
            })
            .collect()
    }

    fn run(&mut self, commands: &[CommandLine]) -> Result<Vec<RunCapture>, RunError> {
        let mut captures = Vec::new();

        for command in commands {
            tracing::debug!(command = %command, "run");
            let output = self.invoke(command)?;
            if !output.stderr.is_empty() {
                tracing::warn!(
                    command = %command,
                    stderr = %decode(&output.stderr).trim_end(),
                    "run command wrote to stderr"
                );
            }
            match output.status {
                Some(0) => {}
                Some(code) => return Err(failure(command, InvocationFailure::Status(code))),
                None => return Err(failure(command, InvocationFailure::Signal)),
            }
            captures.push(RunCapture {
                command: command.text().to_string(),
                stdout: decode(&output.stdout),
            });
        }

        Ok(captures)
    }

    fn clean(&mut self, commands: &[CommandLine]) {
        for command in commands {
            tracing::debug!(command = %command, "clean");
            match self.host.invoke(command) {
                Ok(output) if !output.success() => {
                    tracing::debug!(command = %command, status = ?output.status, "clean command failed");
                }
                Ok(_) => {}
                Err(e) => {
                    tracing::warn!(command = %command, error = %e, "cannot launch clean command");
                }
            }
        }
    }

    fn invoke(&mut self, command: &CommandLine) -> Result<Output, RunError> {
        self.host
            .invoke(command)
            .map_err(|e| failure(command, InvocationFailure::Launch(e.to_string())))
    }
}

fn failure(command: &CommandLine, failure: InvocationFailure) -> RunError {
    RunError::ProcessInvocationFailure {
        command: command.text().to_string(),
        failure,
    }
}

fn decode(bytes: &[u8]) -> String {
    String::from_utf8_lossy(bytes).into_owned()
}
