//! Listing of the project types known to the catalog

use crate::config::{Catalog, LanguageProjects};
use anyhow::{anyhow, Result};
use colored::Colorize;
use std::io::Write;

/// Print the projects of `language`, or of every language when `None`
pub fn list_projects<W: Write>(catalog: &Catalog, language: Option<&str>, out: &mut W) -> Result<()> {
    match language {
        None => {
            writeln!(out, "Listing all known projects for all known languages")?;
            for (language, projects) in catalog.iter() {
                writeln!(out, "- {}", language.bold())?;
                write_projects(projects, out)?;
            }
        }
        Some(language) => {
            let projects = catalog
                .get(language)
                .map_err(|e| anyhow!("Language {}", e))?;
            write_projects(projects, out)?;
        }
    }

    Ok(())
}

fn write_projects<W: Write>(projects: &LanguageProjects, out: &mut W) -> Result<()> {
    for (index, (project_type, source)) in projects.iter().enumerate() {
        writeln!(out, "   {}. {} ({})", index + 1, project_type, source)?;
    }
    Ok(())
}
