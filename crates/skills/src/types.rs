//! Core types for the skill cache and its install links.

use std::fmt;
use std::path::PathBuf;

/// A downloaded skill: a directory in the cache root, identified by its name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Skill {
    /// Directory name, derived from the repository's short name
    pub name: String,

    /// Absolute path of the skill inside the cache
    pub path: PathBuf,
}

impl fmt::Display for Skill {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

/// A single link operation that did not succeed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkFailure {
    /// Path of the link that could not be created or removed
    pub path: PathBuf,

    /// Underlying error message
    pub reason: String,
}

/// Outcome of installing the cache into one agent directory.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InstallReport {
    /// Agent directory after home expansion
    pub agent_dir: PathBuf,

    /// Skills that received a new link
    pub installed: Vec<String>,

    /// Skills whose name was already taken in the agent directory
    pub skipped: Vec<String>,

    /// Skills whose link could not be created
    pub failed: Vec<(String, LinkFailure)>,
}

impl InstallReport {
    pub fn installed_count(&self) -> usize {
        self.installed.len()
    }

    /// True when nothing new was linked
    pub fn is_noop(&self) -> bool {
        self.installed.is_empty()
    }
}

/// Outcome of removing a skill's links from agent directories.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UnlinkReport {
    /// Links that were removed
    pub removed: Vec<PathBuf>,

    /// Entries named after the skill that are not links and were left alone
    pub preserved: Vec<PathBuf>,

    /// Links that could not be removed
    pub failed: Vec<LinkFailure>,
}

/// Errors that can occur when managing skills.
#[derive(Debug, thiserror::Error)]
pub enum SkillError {
    #[error("invalid repository format: expected 'github.com/owner/repo' or 'owner/repo', got '{0}'")]
    InvalidSpec(String),

    #[error("skill '{0}' already exists")]
    AlreadyExists(String),

    #[error("failed to clone repository {url}: {reason}")]
    FetchFailed { url: String, reason: String },

    #[error("skill '{0}' not found")]
    NotFound(String),

    #[error("no skills downloaded yet (cache {} does not exist)", .0.display())]
    NoSkillsYet(PathBuf),

    #[error("failed to {context} {}: {source}", path.display())]
    Io {
        context: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Core(#[from] skillman_core::Error),
}

impl SkillError {
    pub(crate) fn io(context: &'static str, path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io { context, path: path.into(), source }
    }

    pub(crate) fn fetch_failed(url: impl Into<String>, reason: impl ToString) -> Self {
        Self::FetchFailed { url: url.into(), reason: reason.to_string() }
    }
}

/// Result type for skill operations.
pub type Result<T> = std::result::Result<T, SkillError>;
