//! Project generation: clone a template, strip its history, start a fresh repository

use super::source::TemplateSource;
use crate::args::GenerateArgs;
use crate::config::ResolvedConfig;
use crate::product::ProductConfig;
use anyhow::{Context, Result};
use colored::Colorize;
use git2::build::RepoBuilder;
use git2::{Oid, Repository, RepositoryInitOptions, Signature};
use std::fs;
use std::path::{Path, PathBuf};

/// Version control files removed from the top level of a cloned template
const VCS_FILES: &[&str] = &[".gitignore", ".gitattributes", ".gitmodules"];

/// Generates projects from the templates in a resolved catalog
pub struct ProjectGenerator<'a, C: ProductConfig> {
    config: &'a C,
}

impl<'a, C: ProductConfig> ProjectGenerator<'a, C> {
    pub fn new(config: &'a C) -> Self {
        Self { config }
    }

    /// Look up the template for `args` and create the project at `args.path`
    pub fn run(&self, resolved: &ResolvedConfig, args: &GenerateArgs) -> Result<Oid> {
        let location = resolved
            .project_source(&args.language, &args.project_type)
            .with_context(|| {
                format!(
                    "No '{}' project template for language '{}'",
                    args.project_type, args.language
                )
            })?;
        let source = TemplateSource::parse(location)?;

        clone_template(&source, &args.path)?;
        println!("{} {} -> {}", "Cloned".green(), source, args.path.display());

        for removed in clean_project(&args.path)? {
            println!("Removed: {}", removed.display());
        }
        println!("project template cleaned");

        let commit = reinitialise_project(&args.path, self.config)?;
        println!(
            "{} {}",
            self.config.display_name().bold(),
            "Project Initialised".green().bold()
        );

        Ok(commit)
    }
}

/// Clone the template repository into `target`
pub fn clone_template(source: &TemplateSource, target: &Path) -> Result<()> {
    tracing::debug!(%source, remote = source.is_remote(), target = %target.display(), "cloning template");

    if let Some(parent) = target.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
    }

    RepoBuilder::new()
        .clone(&source.clone_location(), target)
        .with_context(|| format!("could not clone project repo from {}", source))?;

    Ok(())
}

/// Remove the template's git metadata; returns the removed paths
pub fn clean_project(path: &Path) -> Result<Vec<PathBuf>> {
    let mut removed = Vec::new();

    let git_dir = path.join(".git");
    if git_dir.exists() {
        fs::remove_dir_all(&git_dir)
            .with_context(|| format!("Failed to remove {}", git_dir.display()))?;
        removed.push(git_dir);
    }

    for name in VCS_FILES {
        let file = path.join(name);
        if file.exists() {
            fs::remove_file(&file)
                .with_context(|| format!("Failed to remove {}", file.display()))?;
            removed.push(file);
        }
    }

    Ok(removed)
}

/// Initialise a fresh repository at `path` with an empty marker commit
///
/// The repository starts on the product's initial branch. The commit is
/// signed with the user's git identity, or the product's own when none is set.
pub fn reinitialise_project<C: ProductConfig>(path: &Path, config: &C) -> Result<Oid> {
    let mut opts = RepositoryInitOptions::new();
    opts.initial_head(config.initial_branch());

    let repo = Repository::init_opts(path, &opts)
        .with_context(|| format!("Failed to initialise repository at {}", path.display()))?;

    let signature = match repo.signature() {
        Ok(signature) => signature,
        Err(_) => Signature::now(config.name(), &format!("{}@localhost", config.name()))?,
    };

    let tree_id = repo.index()?.write_tree()?;
    let tree = repo.find_tree(tree_id)?;
    let commit = repo
        .commit(
            Some("HEAD"),
            &signature,
            &signature,
            config.initial_commit_message(),
            &tree,
            &[],
        )
        .context("Failed to create initial commit")?;

    tracing::debug!(%commit, path = %path.display(), "project initialised");
    Ok(commit)
}
