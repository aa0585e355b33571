//! The filesystem and project-metadata abstraction the resolver reads from.

use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::base::normalize;

/// Kind of a workspace resource.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ResourceKind {
    File,
    Folder,
}

/// One child of a container, as returned by [`Workspace::list_children`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ResourceEntry {
    pub name: String,
    pub kind: ResourceKind,
    /// Logical path of the resource (inside linked folders this is the
    /// project view, not the physical location).
    pub path: PathBuf,
}

impl ResourceEntry {
    pub fn is_file(&self) -> bool {
        self.kind == ResourceKind::File
    }
}

/// Read-only view of files, projects and linked resources.
///
/// Implementations must be safe for concurrent reads; the resolver holds no
/// locks of its own. A path that does not exist is `Ok(false)`, never an
/// error. Errors mean the store could not answer.
pub trait Workspace: Send + Sync {
    /// Whether any resource, file or folder, is at `path`.
    fn exists(&self, path: &Path) -> io::Result<bool>;

    /// Whether a file is at `path`. Folders are `Ok(false)`.
    fn is_file(&self, path: &Path) -> io::Result<bool>;

    /// Children of a container in a deterministic order.
    fn list_children(&self, container: &Path) -> io::Result<Vec<ResourceEntry>>;

    /// Logical paths of linked resources aliasing a physical location.
    fn linked_locations(&self, physical: &Path) -> io::Result<Vec<PathBuf>>;

    /// Root of the known project whose tree contains `path`.
    fn project_of(&self, path: &Path) -> Option<PathBuf>;

    /// Comparison form of a path. Symlinks are resolved where the store
    /// supports it; linked resources are not followed.
    fn canonicalize(&self, path: &Path) -> PathBuf {
        normalize(path)
    }

    /// Map a UNC path to a location in this store.
    fn resolve_unc(&self, unc: &str) -> io::Result<Option<PathBuf>> {
        Ok(Some(PathBuf::from(unc)))
    }
}

impl<W: Workspace + ?Sized> Workspace for &W {
    fn exists(&self, path: &Path) -> io::Result<bool> {
        (**self).exists(path)
    }

    fn is_file(&self, path: &Path) -> io::Result<bool> {
        (**self).is_file(path)
    }

    fn list_children(&self, container: &Path) -> io::Result<Vec<ResourceEntry>> {
        (**self).list_children(container)
    }

    fn linked_locations(&self, physical: &Path) -> io::Result<Vec<PathBuf>> {
        (**self).linked_locations(physical)
    }

    fn project_of(&self, path: &Path) -> Option<PathBuf> {
        (**self).project_of(path)
    }

    fn canonicalize(&self, path: &Path) -> PathBuf {
        (**self).canonicalize(path)
    }

    fn resolve_unc(&self, unc: &str) -> io::Result<Option<PathBuf>> {
        (**self).resolve_unc(unc)
    }
}

impl<W: Workspace + ?Sized> Workspace for Arc<W> {
    fn exists(&self, path: &Path) -> io::Result<bool> {
        (**self).exists(path)
    }

    fn is_file(&self, path: &Path) -> io::Result<bool> {
        (**self).is_file(path)
    }

    fn list_children(&self, container: &Path) -> io::Result<Vec<ResourceEntry>> {
        (**self).list_children(container)
    }

    fn linked_locations(&self, physical: &Path) -> io::Result<Vec<PathBuf>> {
        (**self).linked_locations(physical)
    }

    fn project_of(&self, path: &Path) -> Option<PathBuf> {
        (**self).project_of(path)
    }

    fn canonicalize(&self, path: &Path) -> PathBuf {
        (**self).canonicalize(path)
    }

    fn resolve_unc(&self, unc: &str) -> io::Result<Option<PathBuf>> {
        (**self).resolve_unc(unc)
    }
}

// ============================================================================
// LINKED RESOURCES & UNC MOUNTS
// ============================================================================

/// A project path that aliases a physical location outside the project tree.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkedResource {
    /// Path as the project sees it, e.g. `/proj/ext`.
    pub logical: PathBuf,
    /// Where the bytes live, e.g. `/opt/vendor/ext`.
    pub physical: PathBuf,
}

impl LinkedResource {
    pub fn new(logical: impl Into<PathBuf>, physical: impl Into<PathBuf>) -> Self {
        Self {
            logical: normalize(&logical.into()),
            physical: normalize(&physical.into()),
        }
    }

    /// Logical path for a physical location at or below this link.
    pub fn to_logical(&self, physical: &Path) -> Option<PathBuf> {
        let rest = normalize(physical)
            .strip_prefix(&self.physical)
            .ok()?
            .to_path_buf();
        Some(join_rest(&self.logical, &rest))
    }

    /// Physical location for a logical path at or below this link.
    pub fn to_physical(&self, logical: &Path) -> Option<PathBuf> {
        let rest = normalize(logical)
            .strip_prefix(&self.logical)
            .ok()?
            .to_path_buf();
        Some(join_rest(&self.physical, &rest))
    }
}

fn join_rest(base: &Path, rest: &Path) -> PathBuf {
    if rest.as_os_str().is_empty() {
        base.to_path_buf()
    } else {
        base.join(rest)
    }
}

/// Maps a UNC share prefix to a mount point of the local store.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct UncMount {
    /// e.g. `//fileserver/headers`; either slash style is accepted.
    pub prefix: String,
    pub mount: PathBuf,
}

impl UncMount {
    pub fn new(prefix: impl Into<String>, mount: impl Into<PathBuf>) -> Self {
        Self {
            prefix: prefix.into(),
            mount: mount.into(),
        }
    }

    /// Server and share names compare case-insensitively.
    pub fn map(&self, unc: &str) -> Option<PathBuf> {
        let unc = unc.replace('\\', "/");
        let prefix = self.prefix.replace('\\', "/");
        let prefix = prefix.trim_end_matches('/');
        let head = unc.get(..prefix.len())?;
        if !head.eq_ignore_ascii_case(prefix) {
            return None;
        }
        let rest = &unc[prefix.len()..];
        if !(rest.is_empty() || rest.starts_with('/')) {
            return None;
        }
        Some(join_rest(&self.mount, Path::new(rest.trim_start_matches('/'))))
    }
}

/// Shared bookkeeping of the two workspace implementations.
#[derive(Clone, Debug, Default)]
pub(crate) struct ProjectTable {
    pub(crate) projects: Vec<PathBuf>,
    pub(crate) links: Vec<LinkedResource>,
    pub(crate) unc_mounts: Vec<UncMount>,
}

impl ProjectTable {
    /// Innermost project containing `path`, judged on the logical path.
    pub(crate) fn project_of(&self, path: &Path) -> Option<PathBuf> {
        let path = normalize(path);
        self.projects
            .iter()
            .filter(|root| path.starts_with(root))
            .max_by_key(|root| root.components().count())
            .cloned()
    }

    /// Physical location backing a logical path, following the innermost link.
    pub(crate) fn physical(&self, path: &Path) -> PathBuf {
        let path = normalize(path);
        let linked = self
            .links
            .iter()
            .filter(|link| path.starts_with(&link.logical))
            .max_by_key(|link| link.logical.components().count())
            .and_then(|link| link.to_physical(&path));
        linked.unwrap_or(path)
    }

    pub(crate) fn linked_locations(&self, physical: &Path) -> Vec<PathBuf> {
        let mut found: Vec<PathBuf> = Vec::new();
        for logical in self.links.iter().filter_map(|link| link.to_logical(physical)) {
            if !found.contains(&logical) {
                found.push(logical);
            }
        }
        found
    }

    /// Links whose logical path is a direct child of `container`.
    pub(crate) fn links_in<'a>(
        &'a self,
        container: &'a Path,
    ) -> impl Iterator<Item = &'a LinkedResource> + 'a {
        self.links
            .iter()
            .filter(move |link| link.logical.parent() == Some(container))
    }

    pub(crate) fn resolve_unc(&self, unc: &str) -> PathBuf {
        self.unc_mounts
            .iter()
            .find_map(|mount| mount.map(unc))
            .unwrap_or_else(|| PathBuf::from(unc))
    }
}
