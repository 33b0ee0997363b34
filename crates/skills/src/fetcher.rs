use std::path::Path;
use std::process::{Command, Stdio};

use crate::types::{Result, SkillError};

/// Capability that materializes a remote repository at a local path.
pub trait RepoFetcher {
    /// Fetch `url` into `destination`, which must not exist yet.
    fn fetch(&self, url: &str, destination: &Path) -> Result<()>;
}

/// Clones with the `git` executable found on `PATH`.
///
/// Output from git is passed straight through to the terminal.
#[derive(Debug, Clone)]
pub struct GitCli {
    program: String,
}

impl GitCli {
    pub fn new() -> Self {
        Self { program: "git".to_string() }
    }

    /// Use a different git executable
    pub fn with_program(program: impl Into<String>) -> Self {
        Self { program: program.into() }
    }
}

impl Default for GitCli {
    fn default() -> Self {
        Self::new()
    }
}

impl RepoFetcher for GitCli {
    fn fetch(&self, url: &str, destination: &Path) -> Result<()> {
        tracing::debug!(program = %self.program, url, destination = %destination.display(), "running git clone");

        let status = Command::new(&self.program)
            .arg("clone")
            .arg(url)
            .arg(destination)
            .stdin(Stdio::null())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .status()
            .map_err(|e| SkillError::fetch_failed(url, format!("failed to run {}: {}", self.program, e)))?;

        if !status.success() {
            let reason = match status.code() {
                Some(code) => format!("{} exited with status {}", self.program, code),
                None => format!("{} was terminated by a signal", self.program),
            };
            return Err(SkillError::fetch_failed(url, reason));
        }

        Ok(())
    }
}
