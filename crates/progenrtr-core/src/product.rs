//! Product configuration trait for CLI binaries
//!
//! This trait defines the identity of the binary and the names it expects to
//! find in its configuration files.

use std::path::PathBuf;

/// Configuration trait for the scaffolding CLI
///
/// A product defines:
/// - Product identity (name, display name)
/// - Where the bundled fallback configuration lives
/// - Which sections and keys carry the language list and candidate paths
/// - How freshly generated repositories are initialised
pub trait ProductConfig: Clone + Send + Sync + 'static {
    /// Internal product name (used for CLI command, env vars)
    fn name(&self) -> &'static str;

    /// Human-readable display name
    fn display_name(&self) -> &'static str;

    /// CLI description shown in help text
    fn cli_description(&self) -> &'static str;

    /// Bundled fallback configuration used when no other config is found
    fn default_fallback_config(&self) -> PathBuf;

    /// Environment variable name for overriding the fallback config path
    fn fallback_config_env(&self) -> &'static str;

    /// Section holding the language list
    fn catalog_section(&self) -> &'static str {
        "ProGenrtr"
    }

    /// Key in [`ProductConfig::catalog_section`] listing known languages
    fn languages_key(&self) -> &'static str {
        "languages"
    }

    /// Section of the fallback config holding search metadata
    fn meta_section(&self) -> &'static str {
        "META"
    }

    /// Key in [`ProductConfig::meta_section`] listing candidate config paths
    fn candidates_key(&self) -> &'static str {
        "cfgpaths"
    }

    /// Branch a generated project starts on
    fn initial_branch(&self) -> &'static str {
        "master"
    }

    /// Message of the empty commit marking the start of a generated project
    fn initial_commit_message(&self) -> &'static str {
        "#===>[BEGIN]<===#"
    }

    /// Fallback config path, honouring the override environment variable
    fn fallback_config_path(&self) -> PathBuf {
        std::env::var_os(self.fallback_config_env())
            .filter(|value| !value.is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(|| self.default_fallback_config())
    }
}
