//! `owner/repo@version` reference parsing
//!
//! Two grammar modes share one parser:
//! - action references require an explicit `@version`
//! - repository references fall back to [`DEFAULT_BRANCH`] when it is omitted

use crate::error::ParseError;
use crate::DEFAULT_BRANCH;
use std::fmt;

/// A parsed GitHub reference
///
/// All three fields are non-empty. `version` is opaque: a tag, branch
/// name or commit SHA.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reference {
    pub owner: String,
    pub repo: String,
    pub version: String,
}

impl Reference {
    /// Resolve the version as a release tag (`refs/tags/<version>`)
    pub fn tag(&self) -> GitRef {
        GitRef::Tag(self.version.clone())
    }

    /// Resolve the version as a branch (`refs/heads/<version>`)
    pub fn branch(&self) -> GitRef {
        GitRef::Branch(self.version.clone())
    }
}

impl fmt::Display for Reference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}@{}", self.owner, self.repo, self.version)
    }
}

/// How a version is resolved on the raw-content origin
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GitRef {
    Tag(String),
    Branch(String),
}

impl GitRef {
    /// Path prefix placed between `owner/repo` and the filename
    pub fn path_prefix(&self) -> String {
        match self {
            GitRef::Tag(tag) => format!("refs/tags/{}", tag),
            GitRef::Branch(branch) => format!("refs/heads/{}", branch),
        }
    }
}

/// Parse a reference string like `owner/repo@version`.
///
/// Surrounding whitespace is ignored. If `require_version` is false and no
/// `@version` is given, `default_version` is used.
///
/// ```
/// use actionkit::parse_reference;
///
/// let r = parse_reference("owner/repo", false, "develop").unwrap();
/// assert_eq!(r.version, "develop");
/// ```
pub fn parse_reference(
    raw: &str,
    require_version: bool,
    default_version: &str,
) -> Result<Reference, ParseError> {
    let input = raw.trim();
    if input.is_empty() {
        return Err(ParseError::Empty);
    }

    let (repo_path, version) = match input.split_once('@') {
        Some((_, rest)) if rest.contains('@') => {
            return Err(ParseError::Malformed {
                input: input.to_string(),
            });
        }
        Some((repo_path, version)) => (repo_path, version),
        None if require_version => {
            return Err(ParseError::MissingVersion {
                input: input.to_string(),
            });
        }
        None => (input, default_version),
    };

    let segments: Vec<&str> = repo_path.split('/').collect();
    let [owner, repo] = segments.as_slice() else {
        return Err(ParseError::MalformedRepoPath {
            path: repo_path.to_string(),
        });
    };

    if owner.is_empty() || repo.is_empty() || version.is_empty() {
        return Err(ParseError::Incomplete {
            input: input.to_string(),
        });
    }

    let is_dot = |s: &str| s == "." || s == "..";
    if is_dot(*owner) || is_dot(*repo) || version.split('/').any(is_dot) {
        return Err(ParseError::DotSegment {
            input: input.to_string(),
        });
    }

    Ok(Reference {
        owner: owner.to_string(),
        repo: repo.to_string(),
        version: version.to_string(),
    })
}

/// Parse a GitHub Action reference; the version is mandatory.
///
/// `"actions/checkout@v5"` → `{owner: "actions", repo: "checkout", version: "v5"}`
pub fn parse_action_ref(raw: &str) -> Result<Reference, ParseError> {
    parse_reference(raw, true, "")
}

/// Parse a repository reference; the version defaults to `main`.
pub fn parse_repo_ref(raw: &str) -> Result<Reference, ParseError> {
    parse_reference(raw, false, DEFAULT_BRANCH)
}
