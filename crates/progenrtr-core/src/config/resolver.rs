//! Layered config discovery
//!
//! The `ConfigResolver` decides which config file provides the catalog:
//! 1. An explicit `--config` path, if given
//! 2. Otherwise the first existing file among the candidate paths listed in
//!    the fallback config's `META` section
//! 3. Otherwise the bundled fallback config itself
//!
//! The fallback config must always exist, even when it ends up unused.
//! A candidate that exists but cannot be loaded is an error; later candidates
//! are not tried.

use super::catalog::{split_list, Catalog, CatalogBuilder};
use super::error::{ConfigError, Result};
use super::store::RawStore;
use super::view::StructuredView;
use crate::args::InvocationArgs;
use crate::product::ProductConfig;
use colored::Colorize;
use std::path::{Path, PathBuf};

/// Which file the catalog was built from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    /// Given on the command line
    Explicit(PathBuf),
    /// First existing candidate from the fallback's search list
    Discovered(PathBuf),
    /// No candidate existed
    Fallback(PathBuf),
}

impl ConfigSource {
    pub fn path(&self) -> &Path {
        match self {
            ConfigSource::Explicit(path)
            | ConfigSource::Discovered(path)
            | ConfigSource::Fallback(path) => path,
        }
    }
}

/// Result of resolving the configuration for one invocation
#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    pub catalog: Catalog,
    pub args: InvocationArgs,
    pub source: ConfigSource,
}

impl ResolvedConfig {
    /// Source location registered for `language` / `project_type`
    pub fn project_source(&self, language: &str, project_type: &str) -> Result<&str> {
        let projects = self.catalog.get(language)?;
        Ok(projects.get(project_type)?.as_str())
    }
}

/// Resolves the catalog for an invocation
pub struct ConfigResolver {
    builder: CatalogBuilder,
    meta_section: String,
    candidates_key: String,
    fallback_path: PathBuf,

    /// Override for the home directory used to expand `~` (used for testing).
    /// When `None`, the user's home directory is used via `dirs::home_dir()`.
    home_dir_override: Option<PathBuf>,
}

impl ConfigResolver {
    /// Create a resolver using the product's section names and fallback path
    pub fn new<C: ProductConfig>(config: &C) -> Self {
        Self {
            builder: CatalogBuilder::from_config(config),
            meta_section: config.meta_section().to_string(),
            candidates_key: config.candidates_key().to_string(),
            fallback_path: config.fallback_config_path(),
            home_dir_override: None,
        }
    }

    /// Use a different fallback config file
    pub fn with_fallback_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.fallback_path = path.into();
        self
    }

    /// Expand `~` in candidate paths against `home` instead of the user's home
    pub fn with_home_dir(mut self, home: impl Into<PathBuf>) -> Self {
        self.home_dir_override = Some(home.into());
        self
    }

    /// Resolve the catalog for `args`
    ///
    /// Every call starts from scratch; nothing is carried over from earlier calls.
    pub fn resolve(&self, args: InvocationArgs) -> Result<ResolvedConfig> {
        self.ensure_fallback_exists()?;

        let (catalog, source) = match args.explicit_config() {
            Some(path) => {
                tracing::debug!(path = %path.display(), "using explicit config");
                (self.catalog_from(path)?, ConfigSource::Explicit(path.clone()))
            }
            None => match self.discover()? {
                Some(found) => found,
                None => {
                    eprintln!(
                        "{} expected config not found, using fallback '{}'",
                        "Warning:".yellow(),
                        self.fallback_path.display()
                    );
                    (
                        self.catalog_from(&self.fallback_path)?,
                        ConfigSource::Fallback(self.fallback_path.clone()),
                    )
                }
            },
        };

        tracing::debug!(source = %source.path().display(), languages = catalog.len(), "config resolved");
        Ok(ResolvedConfig {
            catalog,
            args,
            source,
        })
    }

    /// Candidate config paths from the fallback's metadata, `~` expanded, in search order
    pub fn candidate_paths(&self) -> Result<Vec<PathBuf>> {
        let store = RawStore::load(&self.fallback_path)
            .map_err(|e| ConfigError::catalog_build(&self.fallback_path, e))?;
        let meta = StructuredView::from_section(&store, &self.meta_section)
            .map_err(|e| ConfigError::catalog_build(&self.fallback_path, e))?;
        let listed = meta
            .get(&self.candidates_key)
            .map_err(|e| ConfigError::catalog_build(&self.fallback_path, e))?;

        Ok(split_list(&listed.replace('\n', ""))
            .iter()
            .map(|entry| self.expand_home(entry))
            .collect())
    }

    fn ensure_fallback_exists(&self) -> Result<()> {
        if self.fallback_path.exists() {
            Ok(())
        } else {
            Err(ConfigError::MissingFallback {
                path: self.fallback_path.clone(),
            })
        }
    }

    /// Catalog from the first existing candidate, if any
    fn discover(&self) -> Result<Option<(Catalog, ConfigSource)>> {
        for candidate in self.candidate_paths()? {
            if !candidate.is_file() {
                tracing::debug!(path = %candidate.display(), "candidate config not present");
                continue;
            }

            tracing::debug!(path = %candidate.display(), "using discovered config");
            let catalog = self.catalog_from(&candidate)?;
            return Ok(Some((catalog, ConfigSource::Discovered(candidate))));
        }

        Ok(None)
    }

    /// Load `path` and build its catalog; anything but a missing file is a build failure
    fn catalog_from(&self, path: &Path) -> Result<Catalog> {
        let store = RawStore::load(path).map_err(|e| match e {
            ConfigError::NotFound { .. } => e,
            other => ConfigError::catalog_build(path, other),
        })?;

        self.builder
            .build(&store)
            .map_err(|e| ConfigError::catalog_build(path, e))
    }

    fn home_dir(&self) -> Option<String> {
        self.home_dir_override
            .clone()
            .or_else(dirs::home_dir)
            .map(|home| home.to_string_lossy().into_owned())
    }

    fn expand_home(&self, entry: &str) -> PathBuf {
        PathBuf::from(shellexpand::tilde_with_context(entry, || self.home_dir()).into_owned())
    }
}
