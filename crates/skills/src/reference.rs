//! Parsing of repository references such as `owner/repo` or `github.com/owner/repo`.

use std::fmt;
use std::str::FromStr;

use crate::types::{Result, SkillError};

/// The only source code host skills are fetched from
pub const KNOWN_HOST: &str = "github.com";

const HOST_PREFIX: &str = "github.com/";
const SCHEME: &str = "https://";

/// A validated `owner/name` repository reference
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RepoRef {
    owner: String,
    name: String,
}

impl RepoRef {
    /// Parse a reference of the form `[github.com/]owner/name`.
    ///
    /// The prefix may also be written as `https://github.com/`. A scheme is
    /// only accepted together with the known host. After the prefix is
    /// stripped the remainder must be exactly two non-empty segments
    /// separated by a single `/`; the second one is taken verbatim as the name.
    pub fn parse(input: &str) -> Result<Self> {
        let invalid = || SkillError::InvalidSpec(input.to_string());

        let rest = match input.strip_prefix(SCHEME) {
            Some(url) => url.strip_prefix(HOST_PREFIX).ok_or_else(invalid)?,
            None => input.strip_prefix(HOST_PREFIX).unwrap_or(input),
        };

        let mut parts = rest.split('/');
        let (Some(owner), Some(name), None) = (parts.next(), parts.next(), parts.next()) else {
            return Err(invalid());
        };

        if !is_valid_segment(owner) || !is_valid_segment(name) {
            return Err(invalid());
        }

        Ok(Self { owner: owner.to_string(), name: name.to_string() })
    }

    pub fn owner(&self) -> &str {
        &self.owner
    }

    /// Short repository name, which is also the skill name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// HTTPS clone URL on the known host
    pub fn clone_url(&self) -> String {
        format!("https://{}/{}/{}.git", KNOWN_HOST, self.owner, self.name)
    }
}

fn is_valid_segment(segment: &str) -> bool {
    !segment.trim().is_empty() && segment != "." && segment != ".." && !segment.contains('\\')
}

impl FromStr for RepoRef {
    type Err = SkillError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl fmt::Display for RepoRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.owner, self.name)
    }
}
