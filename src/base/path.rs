//! Path comparison: lexical normalization, case folding, canonical keys.

use std::ffi::OsStr;
use std::path::{Component, Path, PathBuf};

use serde::{Deserialize, Serialize};

/// How file names are compared.
///
/// Injected into the resolver instead of being read from the host OS, so a
/// Linux test can exercise Windows-style lookups.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CaseSensitivity {
    Sensitive,
    Insensitive,
}

impl CaseSensitivity {
    /// The convention of the platform this crate was compiled for.
    pub const fn host() -> Self {
        if cfg!(any(windows, target_os = "macos")) {
            CaseSensitivity::Insensitive
        } else {
            CaseSensitivity::Sensitive
        }
    }

    pub fn is_sensitive(self) -> bool {
        self == CaseSensitivity::Sensitive
    }
}

impl Default for CaseSensitivity {
    fn default() -> Self {
        Self::host()
    }
}

/// Compare two simple file names under the given case rule.
pub fn file_name_matches(a: &OsStr, b: &OsStr, case: CaseSensitivity) -> bool {
    match case {
        CaseSensitivity::Sensitive => a == b,
        CaseSensitivity::Insensitive => {
            a.to_string_lossy().to_lowercase() == b.to_string_lossy().to_lowercase()
        }
    }
}

/// Lexically normalize a path: drop `.` and fold `name/..` pairs.
///
/// Does not touch the filesystem, so symlinks are not resolved. A `..` that
/// would climb above the root is dropped; leading `..` of a relative path
/// is kept.
pub fn normalize(path: &Path) -> PathBuf {
    let mut out: Vec<Component<'_>> = Vec::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => match out.last() {
                Some(Component::Normal(_)) => {
                    out.pop();
                }
                Some(Component::RootDir) | Some(Component::Prefix(_)) => {}
                _ => out.push(component),
            },
            other => out.push(other),
        }
    }
    if out.is_empty() {
        return PathBuf::from(".");
    }
    out.iter().collect()
}

/// The comparison form of a path.
///
/// Two locations are the same file for deduplication purposes exactly when
/// their keys are equal. The input is expected to be already canonicalized
/// by the workspace (symlinks resolved where it can); the key adds case
/// folding for case-insensitive stores.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CanonicalKey(String);

impl CanonicalKey {
    pub fn new(canonical: &Path, case: CaseSensitivity) -> Self {
        let text = normalize(canonical).to_string_lossy().into_owned();
        match case {
            CaseSensitivity::Sensitive => Self(text),
            CaseSensitivity::Insensitive => Self(text.to_lowercase()),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}
