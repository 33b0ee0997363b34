//! Skill cache management.
//!
//! Skills are repositories cloned into a local cache root and exposed to
//! agent tools by symbolic links inside each agent's skill directory.

mod fetcher;
mod linker;
mod manager;
mod reference;
mod repository;
mod types;

pub use fetcher::{GitCli, RepoFetcher};
pub use linker::{LinkState, install_links, remove_links};
pub use manager::SkillManager;
pub use reference::{KNOWN_HOST, RepoRef};
pub use repository::{DirRepository, SkillRepository, is_valid_skill_name};
pub use types::{InstallReport, LinkFailure, Result, Skill, SkillError, UnlinkReport};
