use std::io;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use snippet::action::CommandLine;

/// What a finished process left behind.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Output {
    /// Exit code, or `None` when the process was killed by a signal.
    pub status: Option<i32>,
    pub stdout: Vec<u8>,
    pub stderr: Vec<u8>,
}

impl Output {
    pub fn success(&self) -> bool {
        self.status == Some(0)
    }
}

/// The side effects a snippet may have on the machine.
///
/// Everything the stage executor does to the outside world goes through this
/// trait, so tests can swap in a scripted host.
pub trait Host {
    /// Run `command` to completion, capturing its output streams.
    /// An `Err` means the process could not be launched at all.
    fn invoke(&mut self, command: &CommandLine) -> io::Result<Output>;

    /// Read a whole text file.
    fn read_to_string(&mut self, path: &str) -> io::Result<String>;
}

/// Runs real processes and reads real files, relative to a working directory.
#[derive(Debug, Clone)]
pub struct SystemHost {
    working_dir: PathBuf,
}

impl SystemHost {
    /// The working directory is made absolute up front. Children change into
    /// it before resolving their own program path, so a relative directory
    /// would otherwise be applied twice. An empty path means the current
    /// directory.
    pub fn new(working_dir: impl Into<PathBuf>) -> Self {
        let working_dir = working_dir.into();
        let working_dir = if working_dir.as_os_str().is_empty() {
            PathBuf::from(".")
        } else {
            working_dir
        };
        SystemHost {
            working_dir: std::path::absolute(&working_dir).unwrap_or(working_dir),
        }
    }

    pub fn working_dir(&self) -> &Path {
        &self.working_dir
    }

    /// Programs given as a relative path (`./a.out`, `bin/tool`) resolve
    /// against the working directory; bare names go through PATH.
    fn program_path(&self, program: &str) -> PathBuf {
        let path = Path::new(program);
        if path.is_relative() && path.components().count() > 1 {
            self.working_dir.join(path)
        } else {
            path.to_path_buf()
        }
    }
}

impl Default for SystemHost {
    fn default() -> Self {
        SystemHost::new(".")
    }
}

impl Host for SystemHost {
    fn invoke(&mut self, command: &CommandLine) -> io::Result<Output> {
        let output = Command::new(self.program_path(command.program()))
            .args(command.args())
            .current_dir(&self.working_dir)
            .stdin(Stdio::null())
            .output()?;
        Ok(Output {
            status: output.status.code(),
            stdout: output.stdout,
            stderr: output.stderr,
        })
    }

    fn read_to_string(&mut self, path: &str) -> io::Result<String> {
        std::fs::read_to_string(self.working_dir.join(path))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_working_dir_is_the_current_directory() {
        let host = SystemHost::new("");
        assert!(host.working_dir().is_absolute());
        assert_eq!(
            host.working_dir(),
            std::path::absolute(".").unwrap().as_path()
        );
    }

    #[test]
    fn relative_working_dir_is_made_absolute() {
        let host = SystemHost::new("sub");
        assert!(host.working_dir().is_absolute());
        assert!(host.working_dir().ends_with("sub"));
        assert_eq!(
            host.program_path("./prog"),
            host.working_dir().join("./prog")
        );
        assert_eq!(host.program_path("true"), PathBuf::from("true"));
    }
}
