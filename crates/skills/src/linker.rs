//! Reconciles agent skill directories with the cache through symbolic links.
//!
//! For one skill and one agent directory the entry named after the skill is
//! in one of three states (see [`LinkState`]). Installing only ever moves
//! `Absent` to `Linked`; removing only ever moves `Linked` to `Absent`.
//! `Occupied` entries are never touched, so real files and directories that
//! happen to share a skill's name are safe.

use std::fs;
use std::io;
use std::path::Path;

use crate::repository::SkillRepository;
use crate::types::{InstallReport, LinkFailure, Result, SkillError, UnlinkReport};

/// What occupies a skill's name inside an agent directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LinkState {
    /// Nothing with that name
    Absent,
    /// A symbolic link, wherever it points
    Linked,
    /// A regular file or directory
    Occupied,
}

impl LinkState {
    /// Inspect `path` without following a link at that location.
    pub fn inspect(path: &Path) -> Self {
        match fs::symlink_metadata(path) {
            Err(_) => LinkState::Absent,
            Ok(meta) if meta.file_type().is_symlink() => LinkState::Linked,
            Ok(_) => LinkState::Occupied,
        }
    }

    pub fn is_absent(&self) -> bool {
        matches!(self, LinkState::Absent)
    }
}

/// Link every cached skill into `agent_dir`.
///
/// Existing entries are skipped and reported, never replaced. A link that
/// cannot be created is recorded as a failure and the remaining skills are
/// still processed. Running this twice creates nothing the second time.
pub fn install_links<R: SkillRepository + ?Sized>(repo: &R, agent_dir: &Path) -> Result<InstallReport> {
    if !repo.exists() {
        return Err(SkillError::NoSkillsYet(repo.root().to_path_buf()));
    }

    fs::create_dir_all(agent_dir).map_err(|e| SkillError::io("create agent skill directory", agent_dir, e))?;

    let mut report = InstallReport { agent_dir: agent_dir.to_path_buf(), ..Default::default() };

    for skill in repo.list()? {
        let link = agent_dir.join(&skill.name);

        if !LinkState::inspect(&link).is_absent() {
            tracing::debug!(skill = %skill.name, link = %link.display(), "skipping, entry already exists");
            report.skipped.push(skill.name);
            continue;
        }

        let target = std::path::absolute(&skill.path).unwrap_or(skill.path);
        match create_link(&target, &link) {
            Ok(()) => {
                tracing::debug!(
                    skill = %skill.name,
                    link = %link.display(),
                    target = %target.display(),
                    "linked skill"
                );
                report.installed.push(skill.name);
            }
            Err(e) => {
                tracing::warn!(skill = %skill.name, link = %link.display(), error = %e, "failed to create symlink");
                report.failed.push((skill.name, LinkFailure { path: link, reason: e.to_string() }));
            }
        }
    }

    tracing::info!(
        agent_dir = %agent_dir.display(),
        installed = report.installed.len(),
        skipped = report.skipped.len(),
        failed = report.failed.len(),
        "install finished"
    );
    Ok(report)
}

/// Remove the link named `skill_name` from each agent directory.
///
/// Missing entries are ignored and non-link entries are preserved. Failing
/// to remove one link does not stop the others.
pub fn remove_links<P: AsRef<Path>>(skill_name: &str, agent_dirs: &[P]) -> UnlinkReport {
    unlink_each(skill_name, agent_dirs, remove_link)
}

fn unlink_each<P, F>(skill_name: &str, agent_dirs: &[P], mut remove: F) -> UnlinkReport
where
    P: AsRef<Path>,
    F: FnMut(&Path) -> io::Result<()>,
{
    let mut report = UnlinkReport::default();

    for agent_dir in agent_dirs {
        let link = agent_dir.as_ref().join(skill_name);

        match LinkState::inspect(&link) {
            LinkState::Absent => {}
            LinkState::Occupied => {
                tracing::debug!(link = %link.display(), "not a symlink, leaving in place");
                report.preserved.push(link);
            }
            LinkState::Linked => match remove(&link) {
                Ok(()) => {
                    tracing::debug!(link = %link.display(), "removed symlink");
                    report.removed.push(link);
                }
                Err(e) => {
                    tracing::warn!(link = %link.display(), error = %e, "failed to remove symlink");
                    report.failed.push(LinkFailure { path: link, reason: e.to_string() });
                }
            },
        }
    }

    report
}

#[cfg(unix)]
fn create_link(target: &Path, link: &Path) -> io::Result<()> {
    std::os::unix::fs::symlink(target, link)
}

#[cfg(windows)]
fn create_link(target: &Path, link: &Path) -> io::Result<()> {
    std::os::windows::fs::symlink_dir(target, link)
}

#[cfg(unix)]
fn remove_link(link: &Path) -> io::Result<()> {
    fs::remove_file(link)
}

// Directory symlinks on Windows are removed like directories.
#[cfg(windows)]
fn remove_link(link: &Path) -> io::Result<()> {
    fs::remove_dir(link).or_else(|_| fs::remove_file(link))
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use crate::repository::DirRepository;
    use crate::types::Skill;
    use std::os::unix::fs::symlink;
    use std::path::PathBuf;
    use tempfile::TempDir;

    struct Fixture {
        _temp: TempDir,
        repo: DirRepository,
        agent_dir: PathBuf,
    }

    /// Cache that also lists one skill whose link lands under a missing directory
    struct UnlinkableRepository {
        inner: DirRepository,
        broken: &'static str,
    }

    impl SkillRepository for UnlinkableRepository {
        fn root(&self) -> &Path {
            self.inner.root()
        }

        fn exists(&self) -> bool {
            self.inner.exists()
        }

        fn list(&self) -> Result<Vec<Skill>> {
            let mut skills = self.inner.list()?;
            skills.push(Skill { name: self.broken.to_string(), path: self.inner.root().join("b") });
            skills.sort_by(|a, b| a.name.cmp(&b.name));
            Ok(skills)
        }

        fn contains(&self, name: &str) -> bool {
            self.inner.contains(name)
        }

        fn is_occupied(&self, name: &str) -> bool {
            self.inner.is_occupied(name)
        }

        fn skill_path(&self, name: &str) -> PathBuf {
            self.inner.skill_path(name)
        }

        fn ensure_root(&self) -> Result<()> {
            self.inner.ensure_root()
        }

        fn remove(&self, name: &str) -> Result<()> {
            self.inner.remove(name)
        }
    }

    fn fixture(skills: &[&str]) -> Fixture {
        let temp = TempDir::new().unwrap();
        let cache = temp.path().join("cache");
        fs::create_dir_all(&cache).unwrap();
        for name in skills {
            fs::create_dir(cache.join(name)).unwrap();
            fs::write(cache.join(name).join("SKILL.md"), format!("# {name}")).unwrap();
        }
        let agent_dir = temp.path().join("agent").join("skills");
        Fixture { _temp: temp, repo: DirRepository::new(cache), agent_dir }
    }

    #[test]
    fn test_inspect_states() {
        let temp = TempDir::new().unwrap();
        let dir = temp.path().join("dir");
        fs::create_dir(&dir).unwrap();
        let link = temp.path().join("link");
        symlink(&dir, &link).unwrap();
        let dangling = temp.path().join("dangling");
        symlink(temp.path().join("gone"), &dangling).unwrap();

        assert_eq!(LinkState::inspect(&temp.path().join("missing")), LinkState::Absent);
        assert_eq!(LinkState::inspect(&dir), LinkState::Occupied);
        assert_eq!(LinkState::inspect(&link), LinkState::Linked);
        assert_eq!(LinkState::inspect(&dangling), LinkState::Linked);
    }

    #[test]
    fn test_install_requires_cache() {
        let temp = TempDir::new().unwrap();
        let repo = DirRepository::new(temp.path().join("no-cache"));

        let err = install_links(&repo, &temp.path().join("agent")).unwrap_err();
        assert!(matches!(err, SkillError::NoSkillsYet(_)));
        assert!(!temp.path().join("agent").exists());
    }

    #[test]
    fn test_install_empty_cache_installs_nothing() {
        let fx = fixture(&[]);
        let report = install_links(&fx.repo, &fx.agent_dir).unwrap();

        assert!(report.is_noop());
        assert!(report.skipped.is_empty());
        assert!(fx.agent_dir.is_dir());
    }

    #[test]
    fn test_install_links_every_skill() {
        let fx = fixture(&["a", "b"]);
        let report = install_links(&fx.repo, &fx.agent_dir).unwrap();

        assert_eq!(report.installed, vec!["a", "b"]);
        assert_eq!(report.agent_dir, fx.agent_dir);
        for name in ["a", "b"] {
            let link = fx.agent_dir.join(name);
            assert_eq!(LinkState::inspect(&link), LinkState::Linked);
            assert_eq!(fs::read_link(&link).unwrap(), fx.repo.skill_path(name));
            assert!(link.join("SKILL.md").exists());
        }
    }

    #[test]
    fn test_install_is_idempotent() {
        let fx = fixture(&["a", "b"]);
        install_links(&fx.repo, &fx.agent_dir).unwrap();

        let second = install_links(&fx.repo, &fx.agent_dir).unwrap();
        assert_eq!(second.installed_count(), 0);
        assert_eq!(second.skipped, vec!["a", "b"]);
        assert!(second.failed.is_empty());
        assert_eq!(fs::read_dir(&fx.agent_dir).unwrap().count(), 2);
    }

    #[test]
    fn test_install_skips_occupied_and_foreign_links() {
        let fx = fixture(&["a", "b", "c"]);
        fs::create_dir_all(fx.agent_dir.join("a")).unwrap();
        let elsewhere = TempDir::new().unwrap();
        symlink(elsewhere.path(), fx.agent_dir.join("b")).unwrap();

        let report = install_links(&fx.repo, &fx.agent_dir).unwrap();
        assert_eq!(report.installed, vec!["c"]);
        assert_eq!(report.skipped, vec!["a", "b"]);
        assert_eq!(LinkState::inspect(&fx.agent_dir.join("a")), LinkState::Occupied);
        assert_eq!(LinkState::inspect(&fx.agent_dir.join("b")), LinkState::Linked);
        assert_eq!(fs::read_link(fx.agent_dir.join("b")).unwrap(), elsewhere.path());
    }

    #[test]
    fn test_remove_links_only_touches_symlinks() {
        let fx = fixture(&["a"]);
        let linked = fx.agent_dir.join("linked");
        let occupied = fx.agent_dir.join("occupied");
        let empty = fx.agent_dir.join("empty");
        for dir in [&linked, &occupied, &empty] {
            fs::create_dir_all(dir).unwrap();
        }
        symlink(fx.repo.skill_path("a"), linked.join("a")).unwrap();
        fs::create_dir(occupied.join("a")).unwrap();
        fs::write(occupied.join("a").join("notes.md"), "keep me").unwrap();

        let report = remove_links("a", &[&linked, &occupied, &empty, &fx.agent_dir.join("missing")]);

        assert_eq!(report.removed, vec![linked.join("a")]);
        assert_eq!(report.preserved, vec![occupied.join("a")]);
        assert!(report.failed.is_empty());
        assert!(LinkState::inspect(&linked.join("a")).is_absent());
        assert!(occupied.join("a").join("notes.md").exists());
        assert!(fx.repo.skill_path("a").is_dir());
    }

    #[test]
    fn test_install_continues_after_failed_link() {
        let fx = fixture(&["a", "c"]);
        let repo = UnlinkableRepository { inner: fx.repo.clone(), broken: "b/missing" };

        let report = install_links(&repo, &fx.agent_dir).unwrap();

        assert_eq!(report.installed, vec!["a", "c"]);
        assert!(report.skipped.is_empty());
        assert_eq!(report.failed.len(), 1);
        let (name, failure) = &report.failed[0];
        assert_eq!(name, "b/missing");
        assert_eq!(failure.path, fx.agent_dir.join("b/missing"));
        assert!(!failure.reason.is_empty());
        assert!(!report.is_noop());
        assert_eq!(LinkState::inspect(&fx.agent_dir.join("c")), LinkState::Linked);
    }

    #[test]
    fn test_remove_links_continues_after_failure() {
        let fx = fixture(&["a"]);
        let dirs: Vec<PathBuf> = ["one", "two", "three"].iter().map(|d| fx.agent_dir.join(d)).collect();
        for dir in &dirs {
            fs::create_dir_all(dir).unwrap();
            symlink(fx.repo.skill_path("a"), dir.join("a")).unwrap();
        }

        let report = unlink_each("a", &dirs, |link| {
            if link.starts_with(&dirs[1]) {
                Err(io::Error::new(io::ErrorKind::PermissionDenied, "read-only agent directory"))
            } else {
                remove_link(link)
            }
        });

        assert_eq!(report.removed, vec![dirs[0].join("a"), dirs[2].join("a")]);
        assert_eq!(report.failed.len(), 1);
        assert_eq!(report.failed[0].path, dirs[1].join("a"));
        assert_eq!(report.failed[0].reason, "read-only agent directory");
        assert_eq!(LinkState::inspect(&dirs[1].join("a")), LinkState::Linked);
        assert!(LinkState::inspect(&dirs[2].join("a")).is_absent());
    }
}
