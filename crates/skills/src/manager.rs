use std::fs;
use std::path::PathBuf;

use skillman_core::Paths;

use crate::fetcher::{GitCli, RepoFetcher};
use crate::linker;
use crate::reference::RepoRef;
use crate::repository::{DirRepository, SkillRepository, is_valid_skill_name};
use crate::types::{InstallReport, Result, Skill, SkillError, UnlinkReport};

/// Entry point for the skill lifecycle: download, list, install and delete.
#[derive(Debug, Clone)]
pub struct SkillManager<R = DirRepository, F = GitCli> {
    paths: Paths,
    repo: R,
    fetcher: F,
}

impl SkillManager<DirRepository, GitCli> {
    /// Manager over the default cache root, cloning with git
    pub fn new(paths: Paths) -> Self {
        let repo = DirRepository::new(paths.skills_cache_root());
        Self { paths, repo, fetcher: GitCli::new() }
    }
}

impl<R: SkillRepository, F: RepoFetcher> SkillManager<R, F> {
    pub fn with_parts(paths: Paths, repo: R, fetcher: F) -> Self {
        Self { paths, repo, fetcher }
    }

    pub fn repository(&self) -> &R {
        &self.repo
    }

    /// All downloaded skills, sorted by name
    pub fn list(&self) -> Result<Vec<Skill>> {
        self.repo.list()
    }

    /// Clone `spec` (`[github.com/]owner/name`) into the cache as skill `name`.
    pub fn download(&self, spec: &str) -> Result<Skill> {
        let repo_ref = RepoRef::parse(spec)?;
        let name = repo_ref.name();

        if self.repo.is_occupied(name) {
            return Err(SkillError::AlreadyExists(name.to_string()));
        }

        self.repo.ensure_root()?;

        let url = repo_ref.clone_url();
        let destination = self.repo.skill_path(name);
        tracing::info!(repo = %repo_ref, url = %url, destination = %destination.display(), "downloading skill");

        if let Err(err) = self.fetcher.fetch(&url, &destination) {
            self.discard_partial(&destination);
            return Err(err);
        }

        Ok(Skill { name: name.to_string(), path: destination })
    }

    /// Link every cached skill into an agent directory (`~/` is expanded).
    pub fn install(&self, agent_dir: &str) -> Result<InstallReport> {
        let agent_dir = self.paths.expand(agent_dir);
        linker::install_links(&self.repo, &agent_dir)
    }

    /// Remove a skill's links from the given agent directories, then the skill itself.
    ///
    /// Fails with [`SkillError::NotFound`] before touching anything when the
    /// skill is not in the cache.
    pub fn delete<'a, I>(&self, name: &str, agent_dirs: I) -> Result<UnlinkReport>
    where
        I: IntoIterator<Item = &'a str>,
    {
        if !is_valid_skill_name(name) || !self.repo.contains(name) {
            return Err(SkillError::NotFound(name.to_string()));
        }

        let agent_dirs: Vec<PathBuf> = agent_dirs.into_iter().map(|dir| self.paths.expand(dir)).collect();
        let report = linker::remove_links(name, &agent_dirs);

        self.repo.remove(name)?;
        Ok(report)
    }

    fn discard_partial(&self, destination: &std::path::Path) {
        if !destination.exists() {
            return;
        }
        if let Err(e) = fs::remove_dir_all(destination) {
            tracing::warn!(path = %destination.display(), error = %e, "failed to clean up partial clone");
        }
    }
}
