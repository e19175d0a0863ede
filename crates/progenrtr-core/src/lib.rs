//! ProGenrtr Core - Shared library for the project generator CLI
//!
//! This library resolves which configuration file to use, builds the
//! language -> project type -> template catalog from it, and generates new
//! projects from the templates it lists.
//!
//! # Architecture
//!
//! The library is organized into layers:
//!
//! - **Layer 1: Config** - INI loading with interpolation, read-only views, the catalog
//! - **Layer 2: Resolution** - `ConfigResolver` searching the layered config locations
//! - **Layer 3: Commands** - project generation and listing on top of a `ResolvedConfig`
//!
//! # Example Usage
//!
//! ```ignore
//! use progenrtr_core::{Command, ConfigResolver, InvocationArgs, ProductConfig};
//!
//! let resolved = ConfigResolver::new(&MyConfig)
//!     .resolve(InvocationArgs::new(Command::List { language: None }))?;
//! let source = resolved.project_source("rust", "cli")?;
//! ```

pub mod args;
pub mod config;
pub mod listing;
pub mod product;
pub mod templates;

// Re-export main types for convenience
pub use args::{Command, GenerateArgs, InvocationArgs};
pub use config::{
    Catalog, CatalogBuilder, ConfigError, ConfigResolver, ConfigSource, RawStore, ResolvedConfig,
    StructuredView,
};
pub use listing::list_projects;
pub use product::ProductConfig;
pub use templates::{ProjectGenerator, TemplateSource};
