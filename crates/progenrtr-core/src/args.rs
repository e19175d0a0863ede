//! Arguments of one CLI invocation, independent of the argument parser

use std::path::PathBuf;

/// What the invocation asked for
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Generate a project from a template
    Generate(GenerateArgs),
    /// List known project types, optionally for a single language
    List { language: Option<String> },
}

/// Arguments for the generate command
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerateArgs {
    /// Language the template is listed under
    pub language: String,

    /// Project type within that language
    pub project_type: String,

    /// Directory to create the project in
    pub path: PathBuf,
}

/// Parsed CLI arguments handed to the config resolver
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvocationArgs {
    /// Explicit config file, bypassing the search of default locations
    pub config: Option<PathBuf>,

    pub command: Command,
}

impl InvocationArgs {
    pub fn new(command: Command) -> Self {
        Self {
            config: None,
            command,
        }
    }

    pub fn with_config(mut self, config: impl Into<PathBuf>) -> Self {
        self.config = Some(config.into());
        self
    }

    /// The explicit config path, if one was given and is non-empty
    pub fn explicit_config(&self) -> Option<&PathBuf> {
        self.config
            .as_ref()
            .filter(|path| !path.as_os_str().is_empty())
    }
}
