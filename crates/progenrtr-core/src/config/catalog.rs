//! Language -> project type -> source location catalog

use super::error::Result;
use super::store::RawStore;
use super::view::StructuredView;
use crate::product::ProductConfig;

/// Prefix of the per-language sections listing project types
pub const PROJECT_SECTION_PREFIX: &str = "project.";

/// Project type -> source location pairs for one language
pub type LanguageProjects = StructuredView<String>;

/// Language -> project types, in the order the languages are listed
pub type Catalog = StructuredView<LanguageProjects>;

/// Name of the section holding `language`'s project types
pub fn project_section(language: &str) -> String {
    format!("{}{}", PROJECT_SECTION_PREFIX, language)
}

/// Split a comma separated config value into trimmed, non-empty entries
pub fn split_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .map(str::to_string)
        .collect()
}

/// Builds a [`Catalog`] from a loaded store
#[derive(Debug, Clone)]
pub struct CatalogBuilder {
    section: String,
    languages_key: String,
}

impl CatalogBuilder {
    pub fn new(section: impl Into<String>, languages_key: impl Into<String>) -> Self {
        Self {
            section: section.into(),
            languages_key: languages_key.into(),
        }
    }

    /// Builder using the section and key names of a product
    pub fn from_config<C: ProductConfig>(config: &C) -> Self {
        Self::new(config.catalog_section(), config.languages_key())
    }

    /// Build the catalog of every listed language that has a project section
    ///
    /// Listed languages without a `project.<language>` section are skipped.
    /// A missing catalog section or languages key is an error.
    pub fn build(&self, store: &RawStore) -> Result<Catalog> {
        let meta = StructuredView::from_section(store, &self.section)?;
        let languages = split_list(meta.get(&self.languages_key)?);

        let mut catalog = Vec::with_capacity(languages.len());
        for language in languages {
            let section = project_section(&language);
            if !store.has_section(&section) {
                tracing::debug!(%language, "no project section for listed language, skipping");
                continue;
            }
            let projects = StructuredView::from_section(store, &section)?;
            catalog.push((language, projects));
        }

        Ok(StructuredView::from_mapping(catalog))
    }
}
