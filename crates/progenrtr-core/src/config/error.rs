//! Error types for configuration loading, lookup and resolution

use std::path::PathBuf;

/// Result type for configuration operations
pub type Result<T> = std::result::Result<T, ConfigError>;

/// Errors that can occur while loading, viewing or resolving configuration
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The bundled fallback configuration is not on disk
    #[error("necessary file '{path}' not available")]
    MissingFallback { path: PathBuf },

    /// A config file path does not reference an existing regular file
    #[error("config file not found at '{path}'")]
    NotFound { path: PathBuf },

    #[error("failed to read config file '{path}'")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{path}:{line}: file contains no section headers: {content:?}")]
    MissingSectionHeader {
        path: PathBuf,
        line: usize,
        content: String,
    },

    /// Lines that are neither a section header nor a `key = value` pair
    #[error("source contains parsing errors: '{path}'{}", format_parse_lines(.lines))]
    Parse {
        path: PathBuf,
        lines: Vec<(usize, String)>,
    },

    #[error("bad value substitution in [{section}] '{option}': references '{reference}' which is not defined")]
    MissingReference {
        section: String,
        option: String,
        reference: String,
    },

    #[error("bad interpolation syntax in [{section}] '{option}': {message}")]
    InterpolationSyntax {
        section: String,
        option: String,
        message: String,
    },

    #[error("interpolation cycle in [{section}] '{option}': {}", .chain.join(" -> "))]
    ReferenceCycle {
        section: String,
        option: String,
        chain: Vec<String>,
    },

    #[error("interpolation in [{section}] '{option}' exceeds the maximum depth of {max_depth}")]
    InterpolationDepth {
        section: String,
        option: String,
        max_depth: usize,
    },

    /// Strict attribute-style lookup of an absent name
    #[error("'{name}' not found in config")]
    AttributeNotFound { name: String },

    /// Subscript-style lookup of an absent key or section
    #[error("key '{name}' not found")]
    KeyNotFound { name: String },

    /// A found config file could not be turned into a catalog
    #[error("invalid config file '{path}'")]
    CatalogBuild {
        path: PathBuf,
        #[source]
        source: Box<ConfigError>,
    },
}

impl ConfigError {
    /// Wrap a load or build failure for `path` as a catalog build failure
    pub fn catalog_build(path: impl Into<PathBuf>, source: ConfigError) -> Self {
        Self::CatalogBuild {
            path: path.into(),
            source: Box::new(source),
        }
    }
}

fn format_parse_lines(lines: &[(usize, String)]) -> String {
    lines
        .iter()
        .map(|(line, content)| format!("\n\t[line {:2}]: {:?}", line, content))
        .collect()
}
