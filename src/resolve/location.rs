//! Resolution results.

use std::fmt;
use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use rustc_hash::FxHashSet;

use crate::base::CanonicalKey;

/// A header an include can refer to.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ResolvedLocation {
    /// A file at this path, as found in the store.
    File(PathBuf),
    /// A file found outside every project that a linked project resource
    /// aliases. `logical` is the path the project sees.
    Linked { logical: PathBuf, physical: PathBuf },
}

impl ResolvedLocation {
    /// The path callers should open or spell: logical for linked resources.
    pub fn path(&self) -> &Path {
        match self {
            ResolvedLocation::File(path) => path,
            ResolvedLocation::Linked { logical, .. } => logical,
        }
    }

    /// Where the bytes live.
    pub fn physical(&self) -> &Path {
        match self {
            ResolvedLocation::File(path) => path,
            ResolvedLocation::Linked { physical, .. } => physical,
        }
    }

    pub fn is_linked(&self) -> bool {
        matches!(self, ResolvedLocation::Linked { .. })
    }

    pub fn into_path(self) -> PathBuf {
        match self {
            ResolvedLocation::File(path) => path,
            ResolvedLocation::Linked { logical, .. } => logical,
        }
    }
}

impl fmt::Display for ResolvedLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResolvedLocation::File(path) => write!(f, "{}", path.display()),
            ResolvedLocation::Linked { logical, physical } => {
                write!(f, "{} -> {}", logical.display(), physical.display())
            }
        }
    }
}

/// Insertion-ordered results, first occurrence of each canonical key kept.
///
/// Also remembers the canonical physical file behind every reported hit, so
/// one file reached twice is reported once even when the first report was a
/// linked alias.
#[derive(Debug, Default)]
pub(crate) struct LocationSet {
    entries: IndexMap<CanonicalKey, ResolvedLocation>,
    physical: FxHashSet<CanonicalKey>,
}

impl LocationSet {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn insert(&mut self, key: CanonicalKey, location: ResolvedLocation) -> bool {
        if self.entries.contains_key(&key) {
            return false;
        }
        self.entries.insert(key, location);
        true
    }

    pub(crate) fn has_physical(&self, key: &CanonicalKey) -> bool {
        self.physical.contains(key)
    }

    pub(crate) fn mark_physical(&mut self, key: CanonicalKey) {
        self.physical.insert(key);
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub(crate) fn into_vec(self) -> Vec<ResolvedLocation> {
        self.entries.into_values().collect()
    }
}
