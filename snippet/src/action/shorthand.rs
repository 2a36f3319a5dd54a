use crate::action::{Action, CommandLine, Visibility};

/// Toolchain used to expand `{"code": "<path>"}` directives.
///
/// The expansion compiles the file with `compiler`, lists it, runs
/// `./<artifact>` and finally removes the artifact.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Shorthand {
    pub compiler: String,
    pub artifact: String,
}

impl Default for Shorthand {
    fn default() -> Self {
        Shorthand {
            compiler: "gcc".to_string(),
            artifact: "a.out".to_string(),
        }
    }
}

impl Shorthand {
    /// Build the silent action for a single source file.
    pub fn expand(&self, path: &str) -> Result<Action, String> {
        Ok(Action {
            build: vec![command(&format!("{} {}", self.compiler, path))?],
            show: vec![path.to_string()],
            run: vec![command(&format!("./{}", self.artifact))?],
            clean: vec![command(&format!("rm {}", self.artifact))?],
            visibility: Visibility::Silent,
        })
    }
}

fn command(text: &str) -> Result<CommandLine, String> {
    CommandLine::parse(text)
        .ok_or_else(|| format!("shorthand expands to an empty command: {:?}", text))
}
