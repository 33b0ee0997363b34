use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

/// Application directory name used under the cache, config and state roots
pub const APP_DIR_NAME: &str = "skillman";

/// Filename of the configuration document
pub const CONFIG_FILE_NAME: &str = "config.toml";

/// Prefix that marks a home-relative path in config values
pub const HOME_PREFIX: &str = "~/";

/// Canonical filesystem locations, derived from an explicit home directory.
///
/// Layout:
/// - skills cache: `<home>/.local/bin/skillman/<skill>/`
/// - config file: `<home>/.config/skillman/config.toml`
/// - log files: `<home>/.local/state/skillman/logs/`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Paths {
    home: PathBuf,
}

impl Paths {
    /// Create a resolver rooted at the given home directory
    pub fn new(home: impl Into<PathBuf>) -> Self {
        Self { home: home.into() }
    }

    /// Create a resolver from the current user's home directory
    pub fn from_env() -> Result<Self> {
        dirs::home_dir().map(Self::new).ok_or(Error::HomeResolution)
    }

    /// The home directory all other paths are derived from
    pub fn home(&self) -> &Path {
        &self.home
    }

    /// Directory holding one subdirectory per downloaded skill
    pub fn skills_cache_root(&self) -> PathBuf {
        self.home.join(".local").join("bin").join(APP_DIR_NAME)
    }

    /// Location of config.toml
    pub fn config_file(&self) -> PathBuf {
        self.home.join(".config").join(APP_DIR_NAME).join(CONFIG_FILE_NAME)
    }

    /// Directory for rolling log files
    pub fn log_dir(&self) -> PathBuf {
        self.home.join(".local").join("state").join(APP_DIR_NAME).join("logs")
    }

    /// Substitute the home directory for a leading `~/` (or a bare `~`).
    /// Any other value is returned unchanged.
    pub fn expand(&self, raw: &str) -> PathBuf {
        if raw == "~" {
            return self.home.clone();
        }
        match raw.strip_prefix(HOME_PREFIX) {
            Some(rest) => self.home.join(rest),
            None => PathBuf::from(raw),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_skills_cache_root() {
        let paths = Paths::new("/home/alice");
        assert_eq!(paths.skills_cache_root(), PathBuf::from("/home/alice/.local/bin/skillman"));
    }

    #[test]
    fn test_config_file() {
        let paths = Paths::new("/home/alice");
        assert_eq!(
            paths.config_file(),
            PathBuf::from("/home/alice/.config/skillman/config.toml")
        );
    }

    #[test]
    fn test_log_dir() {
        let paths = Paths::new("/home/alice");
        assert_eq!(paths.log_dir(), PathBuf::from("/home/alice/.local/state/skillman/logs"));
    }

    #[test]
    fn test_expand_home_prefix() {
        let paths = Paths::new("/home/alice");
        assert_eq!(paths.expand("~/.claude/skills"), PathBuf::from("/home/alice/.claude/skills"));
        assert_eq!(paths.expand("~"), PathBuf::from("/home/alice"));
    }

    #[test]
    fn test_expand_leaves_other_paths() {
        let paths = Paths::new("/home/alice");
        assert_eq!(paths.expand("/opt/skills"), PathBuf::from("/opt/skills"));
        assert_eq!(paths.expand("relative/skills"), PathBuf::from("relative/skills"));
        assert_eq!(paths.expand("~bob/skills"), PathBuf::from("~bob/skills"));
    }

    #[test]
    fn test_paths_are_deterministic() {
        let a = Paths::new("/home/alice");
        let b = Paths::new("/home/alice");
        assert_eq!(a.skills_cache_root(), b.skills_cache_root());
        assert_eq!(a.config_file(), b.config_file());
        assert_eq!(a, b);
    }

    #[test]
    fn test_from_env_uses_home_dir() {
        if let Some(home) = dirs::home_dir() {
            let paths = Paths::from_env().unwrap();
            assert_eq!(paths.home(), home.as_path());
        }
    }
}
