//! Template sources and project generation
//!
//! This module provides:
//! - Classification of catalog source locations (TemplateSource)
//! - Cloning a template, stripping its git metadata and re-initialising it
//!   as a fresh repository (ProjectGenerator)

pub mod generator;
pub mod source;

pub use generator::{clean_project, clone_template, reinitialise_project, ProjectGenerator};
pub use source::TemplateSource;
