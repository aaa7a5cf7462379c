use crate::domain::error::DomainError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};

/// A `/`-separated path relative to the domains root.
///
/// Invariant: never absolute, never empty, no `..` segments. Enforced at
/// construction. Stored with forward slashes so rendered plans are identical
/// across platforms; converted to a native path only at the filesystem port.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct RelativePath(String);

impl RelativePath {
    /// Fallible constructor.
    pub fn try_new(path: impl Into<String>) -> Result<Self, DomainError> {
        let path = path.into().replace('\\', "/");
        if path.is_empty()
            || path.starts_with('/')
            || Path::new(&path).is_absolute()
            || path.split('/').any(|seg| seg == "..")
        {
            return Err(DomainError::AbsolutePathNotAllowed { path });
        }
        Ok(Self(path))
    }

    /// Construct from a literal known to satisfy the invariant.
    pub(crate) fn trusted(path: &str) -> Self {
        debug_assert!(Self::try_new(path).is_ok(), "invalid relative path {path}");
        Self(path.to_string())
    }

    /// Join a segment, maintaining the relative invariant.
    pub fn join(&self, segment: &str) -> Result<Self, DomainError> {
        Self::try_new(format!("{}/{}", self.0, segment.trim_start_matches("./")))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Final path segment.
    pub fn file_name(&self) -> &str {
        self.0.rsplit('/').next().unwrap_or(&self.0)
    }

    /// Native path under `root`.
    pub fn to_path(&self, root: &Path) -> PathBuf {
        self.0
            .split('/')
            .filter(|seg| !seg.is_empty() && *seg != ".")
            .fold(root.to_path_buf(), |acc, seg| acc.join(seg))
    }
}

impl AsRef<str> for RelativePath {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for RelativePath {
    type Error = DomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::try_new(value)
    }
}

impl From<RelativePath> for String {
    fn from(path: RelativePath) -> Self {
        path.0
    }
}

impl fmt::Display for RelativePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
