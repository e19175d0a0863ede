//! Template source locations as written in the catalog

use anyhow::{Context, Result};
use std::fmt;
use std::path::PathBuf;
use url::Url;

/// Template source - a remote repository or a local directory
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TemplateSource {
    /// URL with a scheme git understands (https, ssh, git, file, ...)
    Remote(Url),
    /// scp-like remote such as `git@github.com:org/repo.git`
    Scp(String),
    Local(PathBuf),
}

impl TemplateSource {
    /// Classify a catalog source location
    pub fn parse(location: &str) -> Result<Self> {
        let location = location.trim();
        if location.is_empty() {
            anyhow::bail!("Template source location is empty");
        }

        if location.contains("://") {
            let url = Url::parse(location)
                .with_context(|| format!("Invalid template URL: {}", location))?;
            return Ok(Self::Remote(url));
        }

        if is_scp_like(location) {
            return Ok(Self::Scp(location.to_string()));
        }

        Ok(Self::local(location))
    }

    /// Create a local template source, expanding a leading `~`
    pub fn local(path: &str) -> Self {
        Self::Local(PathBuf::from(shellexpand::tilde(path).into_owned()))
    }

    /// The string handed to git when cloning
    pub fn clone_location(&self) -> String {
        match self {
            TemplateSource::Remote(url) => url.to_string(),
            TemplateSource::Scp(location) => location.clone(),
            TemplateSource::Local(path) => path.to_string_lossy().into_owned(),
        }
    }

    pub fn is_remote(&self) -> bool {
        !matches!(self, TemplateSource::Local(_))
    }
}

impl fmt::Display for TemplateSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.clone_location())
    }
}

/// `[user@]host:path` with no slash before the colon
///
/// Single letter hosts are Windows drive letters.
fn is_scp_like(location: &str) -> bool {
    match location.split_once(':') {
        Some((host, path)) => {
            host.len() > 1 && !host.contains(|c: char| c == '/' || c == '\\') && !path.is_empty()
        }
        None => false,
    }
}
