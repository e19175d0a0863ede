//! Configuration loading and resolution
//!
//! This module provides:
//! - An INI-style key/value store with `${...}` interpolation (RawStore)
//! - Read-only views with strict and defaulted access (StructuredView)
//! - The language -> project type catalog (Catalog, CatalogBuilder)
//! - Layered discovery of the config file to use (ConfigResolver)

pub mod catalog;
pub mod error;
pub mod resolver;
pub mod store;
pub mod view;

pub use catalog::{Catalog, CatalogBuilder, LanguageProjects};
pub use error::{ConfigError, Result};
pub use resolver::{ConfigResolver, ConfigSource, ResolvedConfig};
pub use store::RawStore;
pub use view::StructuredView;
