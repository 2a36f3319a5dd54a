//! `snippets.toml`: toolchain and rendering settings.

use std::path::Path;

use serde::Deserialize;

use runner::{BuildFailurePolicy, ListingStyle, Options};
use snippet::action::Shorthand;

/// Config file picked up from the current directory when `--config` is not given.
pub const CONFIG_FILENAME: &str = "snippets.toml";

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub shorthand: ShorthandConfig,
    pub listing: ListingConfig,
    pub build: BuildConfig,
}

/// Toolchain behind `{"code": "<file>"}` snippets.
#[derive(Debug, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ShorthandConfig {
    pub compiler: String,
    pub artifact: String,
}

impl Default for ShorthandConfig {
    fn default() -> Self {
        let shorthand = Shorthand::default();
        ShorthandConfig {
            compiler: shorthand.compiler,
            artifact: shorthand.artifact,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ListingConfig {
    pub language: String,
    pub comment: String,
}

impl Default for ListingConfig {
    fn default() -> Self {
        let style = ListingStyle::default();
        ListingConfig {
            language: style.language,
            comment: style.comment,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BuildConfig {
    pub on_failure: OnBuildFailure,
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum OnBuildFailure {
    #[default]
    Continue,
    SkipRun,
}

impl Config {
    /// Load `explicit` if given, else `snippets.toml` if it exists, else defaults.
    pub fn load(explicit: Option<&Path>) -> Result<Config, String> {
        let path = match explicit {
            Some(path) => path,
            None if Path::new(CONFIG_FILENAME).is_file() => Path::new(CONFIG_FILENAME),
            None => return Ok(Config::default()),
        };

        let text = std::fs::read_to_string(path)
            .map_err(|e| format!("cannot read '{}': {}", path.display(), e))?;
        Config::parse(&text).map_err(|e| format!("{}: {}", path.display(), e))
    }

    pub fn parse(text: &str) -> Result<Config, String> {
        let config: Config = toml::from_str(text).map_err(|e| e.to_string())?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), String> {
        if self.shorthand.compiler.trim().is_empty() {
            return Err("shorthand.compiler must not be empty".into());
        }
        let artifact = &self.shorthand.artifact;
        if artifact.is_empty() || artifact.contains(char::is_whitespace) {
            return Err(format!(
                "shorthand.artifact must be a single file name, got {:?}",
                artifact
            ));
        }
        Ok(())
    }

    pub fn options(&self) -> Options {
        Options {
            shorthand: Shorthand {
                compiler: self.shorthand.compiler.clone(),
                artifact: self.shorthand.artifact.clone(),
            },
            listing: ListingStyle {
                language: self.listing.language.clone(),
                comment: self.listing.comment.clone(),
            },
            on_build_failure: match self.build.on_failure {
                OnBuildFailure::Continue => BuildFailurePolicy::Continue,
                OnBuildFailure::SkipRun => BuildFailurePolicy::SkipRun,
            },
        }
    }
}
