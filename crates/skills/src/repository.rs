//! The local skill cache.
//!
//! A skill exists exactly when a directory with its name exists under the
//! cache root. There is no manifest; [`SkillRepository`] keeps that detail
//! behind a trait so another backing store can replace [`DirRepository`].

use std::fs;
use std::path::{Path, PathBuf};

use crate::types::{Result, Skill, SkillError};

/// Storage for downloaded skills.
pub trait SkillRepository {
    /// Root directory fetchers clone into
    fn root(&self) -> &Path;

    /// Whether the cache has been created yet
    fn exists(&self) -> bool;

    /// All skills, sorted by name. Empty when the cache does not exist.
    fn list(&self) -> Result<Vec<Skill>>;

    /// Whether a skill with this name is present
    fn contains(&self, name: &str) -> bool;

    /// Whether anything at all occupies this name in the cache
    fn is_occupied(&self, name: &str) -> bool;

    /// Location a skill with this name has (or would have) in the cache
    fn skill_path(&self, name: &str) -> PathBuf;

    /// Create the cache root if it is missing
    fn ensure_root(&self) -> Result<()>;

    /// Delete a skill and all of its content
    fn remove(&self, name: &str) -> Result<()>;
}

/// Returns false for names that could never be a single cache entry.
pub fn is_valid_skill_name(name: &str) -> bool {
    !name.is_empty() && name != "." && name != ".." && !name.contains(['/', '\\'])
}

/// Directory-backed skill cache.
#[derive(Debug, Clone)]
pub struct DirRepository {
    root: PathBuf,
}

impl DirRepository {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

impl SkillRepository for DirRepository {
    fn root(&self) -> &Path {
        &self.root
    }

    fn exists(&self) -> bool {
        self.root.is_dir()
    }

    fn list(&self) -> Result<Vec<Skill>> {
        if !self.root.exists() {
            return Ok(Vec::new());
        }

        let entries = fs::read_dir(&self.root).map_err(|e| SkillError::io("read skills directory", &self.root, e))?;

        let mut skills = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| SkillError::io("read skills directory", &self.root, e))?;
            let is_dir = entry.file_type().map(|t| t.is_dir()).unwrap_or(false);
            if !is_dir {
                continue;
            }

            match entry.file_name().into_string() {
                Ok(name) => skills.push(Skill { name, path: entry.path() }),
                Err(raw) => tracing::warn!(name = ?raw, "ignoring skill directory with a non UTF-8 name"),
            }
        }

        skills.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(skills)
    }

    fn contains(&self, name: &str) -> bool {
        is_valid_skill_name(name)
            && fs::symlink_metadata(self.skill_path(name))
                .map(|m| m.is_dir())
                .unwrap_or(false)
    }

    fn is_occupied(&self, name: &str) -> bool {
        fs::symlink_metadata(self.skill_path(name)).is_ok()
    }

    fn skill_path(&self, name: &str) -> PathBuf {
        self.root.join(name)
    }

    fn ensure_root(&self) -> Result<()> {
        fs::create_dir_all(&self.root).map_err(|e| SkillError::io("create skills directory", &self.root, e))
    }

    fn remove(&self, name: &str) -> Result<()> {
        if !self.contains(name) {
            return Err(SkillError::NotFound(name.to_string()));
        }

        let path = self.skill_path(name);
        fs::remove_dir_all(&path).map_err(|e| SkillError::io("remove skill directory", &path, e))?;
        tracing::info!(skill = name, path = %path.display(), "removed skill directory");
        Ok(())
    }
}
