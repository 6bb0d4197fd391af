use core::fmt;
use core::str::FromStr;

use crate::RetrievalError;

/// Longest repository id the registry accepts.
const MAX_REPO_ID_LEN: usize = 96;

/// A validated `namespace/name` (or bare `name`) repository identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RepoId(String);

impl RepoId {
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Directory name of this repository inside the cache.
    #[must_use]
    pub fn cache_folder(&self) -> String {
        format!("models--{}", self.0.replace('/', "--"))
    }
}

impl fmt::Display for RepoId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for RepoId {
    type Err = RetrievalError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = |reason| RetrievalError::InvalidRepoId {
            repo_id: s.to_owned(),
            reason,
        };

        if s.len() > MAX_REPO_ID_LEN {
            return Err(invalid("longer than 96 characters"));
        }

        let parts: Vec<&str> = s.split('/').collect();
        if parts.len() > 2 {
            return Err(invalid("expected `namespace/name` or `name`"));
        }

        for part in parts {
            if part.is_empty() {
                return Err(invalid("empty namespace or name"));
            }
            if !part
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'))
            {
                return Err(invalid("only letters, digits, `-`, `_` and `.` are allowed"));
            }
            if part.starts_with(['-', '.']) || part.ends_with(['-', '.']) {
                return Err(invalid("must not start or end with `-` or `.`"));
            }
            if part.contains("..") || part.contains("--") {
                return Err(invalid("`..` and `--` are not allowed"));
            }
        }

        Ok(Self(s.to_owned()))
    }
}
