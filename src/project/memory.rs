//! In-memory workspace.
//!
//! Deterministic stand-in for the real filesystem: files, projects, linked
//! resources, symlinks, UNC mounts and paths whose reads fail can all be
//! declared up front. Used by the test suite and by hosts that already keep
//! a virtual file tree.

use std::collections::{BTreeMap, BTreeSet};
use std::io;
use std::path::{Path, PathBuf};

use super::workspace::{
    LinkedResource, ProjectTable, ResourceEntry, ResourceKind, UncMount, Workspace,
};
use crate::base::normalize;

const MAX_SYMLINK_HOPS: usize = 16;

#[derive(Clone, Debug, Default)]
pub struct MemoryWorkspace {
    files: BTreeSet<PathBuf>,
    dirs: BTreeSet<PathBuf>,
    /// Directory aliases: (alias, target).
    symlinks: Vec<(PathBuf, PathBuf)>,
    failing: BTreeSet<PathBuf>,
    table: ProjectTable,
}

impl MemoryWorkspace {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_file(mut self, path: impl AsRef<Path>) -> Self {
        self.add_file(path);
        self
    }

    pub fn with_dir(mut self, path: impl AsRef<Path>) -> Self {
        self.add_dir(path);
        self
    }

    pub fn with_project(mut self, root: impl AsRef<Path>) -> Self {
        let root = normalize(root.as_ref());
        self.add_dir(&root);
        self.table.projects.push(root);
        self
    }

    pub fn with_link(mut self, logical: impl Into<PathBuf>, physical: impl Into<PathBuf>) -> Self {
        self.table.links.push(LinkedResource::new(logical, physical));
        self
    }

    /// Make `alias` a symlink to the directory `target`.
    pub fn with_symlink(mut self, alias: impl AsRef<Path>, target: impl AsRef<Path>) -> Self {
        self.symlinks
            .push((normalize(alias.as_ref()), normalize(target.as_ref())));
        self
    }

    pub fn with_unc_mount(mut self, prefix: &str, mount: impl Into<PathBuf>) -> Self {
        self.table.unc_mounts.push(UncMount::new(prefix, mount));
        self
    }

    /// Every read at or below `path` fails with `PermissionDenied`.
    pub fn with_failure(mut self, path: impl AsRef<Path>) -> Self {
        self.failing.insert(normalize(path.as_ref()));
        self
    }

    pub fn add_file(&mut self, path: impl AsRef<Path>) {
        let path = normalize(path.as_ref());
        for ancestor in path.ancestors().skip(1) {
            if !ancestor.as_os_str().is_empty() {
                self.dirs.insert(ancestor.to_path_buf());
            }
        }
        self.files.insert(path);
    }

    pub fn add_dir(&mut self, path: impl AsRef<Path>) {
        let path = normalize(path.as_ref());
        for ancestor in path.ancestors() {
            if !ancestor.as_os_str().is_empty() {
                self.dirs.insert(ancestor.to_path_buf());
            }
        }
    }

    pub fn remove_file(&mut self, path: impl AsRef<Path>) -> bool {
        self.files.remove(&normalize(path.as_ref()))
    }

    fn check(&self, path: &Path) -> io::Result<()> {
        match self.failing.iter().find(|failing| path.starts_with(failing)) {
            Some(failing) => Err(io::Error::new(
                io::ErrorKind::PermissionDenied,
                format!("read denied under {}", failing.display()),
            )),
            None => Ok(()),
        }
    }

    fn follow_symlinks(&self, path: &Path) -> PathBuf {
        let mut current = normalize(path);
        for _ in 0..MAX_SYMLINK_HOPS {
            let hop = self
                .symlinks
                .iter()
                .filter(|(alias, _)| current.starts_with(alias))
                .max_by_key(|(alias, _)| alias.components().count());
            match hop {
                Some((alias, target)) => {
                    let rest = current.strip_prefix(alias).unwrap_or(Path::new(""));
                    current = if rest.as_os_str().is_empty() {
                        target.clone()
                    } else {
                        target.join(rest)
                    };
                }
                None => break,
            }
        }
        current
    }

    /// Physical, symlink-free location behind a logical path.
    fn locate(&self, path: &Path) -> io::Result<PathBuf> {
        self.check(&normalize(path))?;
        let physical = self.follow_symlinks(&self.table.physical(path));
        self.check(&physical)?;
        Ok(physical)
    }

    fn kind_of(&self, physical: &Path) -> Option<ResourceKind> {
        if self.files.contains(physical) {
            Some(ResourceKind::File)
        } else if self.dirs.contains(physical) {
            Some(ResourceKind::Folder)
        } else {
            None
        }
    }
}

impl Workspace for MemoryWorkspace {
    fn exists(&self, path: &Path) -> io::Result<bool> {
        let physical = self.locate(path)?;
        Ok(self.kind_of(&physical).is_some())
    }

    fn is_file(&self, path: &Path) -> io::Result<bool> {
        let physical = self.locate(path)?;
        Ok(self.kind_of(&physical) == Some(ResourceKind::File))
    }

    fn list_children(&self, container: &Path) -> io::Result<Vec<ResourceEntry>> {
        let container = normalize(container);
        let physical = self.locate(&container)?;
        if self.kind_of(&physical) != Some(ResourceKind::Folder) {
            return Err(io::Error::new(
                io::ErrorKind::NotFound,
                format!("no container at {}", container.display()),
            ));
        }

        let mut children: BTreeMap<String, ResourceEntry> = BTreeMap::new();
        let direct = self
            .files
            .iter()
            .map(|path| (path, ResourceKind::File))
            .chain(self.dirs.iter().map(|path| (path, ResourceKind::Folder)))
            .filter(|(path, _)| path.parent() == Some(physical.as_path()));
        for (path, kind) in direct {
            if let Some(name) = path.file_name() {
                let name = name.to_string_lossy().into_owned();
                let entry = ResourceEntry {
                    path: container.join(&name),
                    name: name.clone(),
                    kind,
                };
                children.insert(name, entry);
            }
        }

        for link in self.table.links_in(&container) {
            let Some(name) = link.logical.file_name() else {
                continue;
            };
            let target = self.follow_symlinks(&link.physical);
            let Some(kind) = self.kind_of(&target) else {
                continue;
            };
            let name = name.to_string_lossy().into_owned();
            children.insert(
                name.clone(),
                ResourceEntry {
                    name,
                    kind,
                    path: link.logical.clone(),
                },
            );
        }

        Ok(children.into_values().collect())
    }

    fn linked_locations(&self, physical: &Path) -> io::Result<Vec<PathBuf>> {
        self.check(&normalize(physical))?;
        Ok(self.table.linked_locations(physical))
    }

    fn project_of(&self, path: &Path) -> Option<PathBuf> {
        self.table.project_of(path)
    }

    fn canonicalize(&self, path: &Path) -> PathBuf {
        self.follow_symlinks(path)
    }

    fn resolve_unc(&self, unc: &str) -> io::Result<Option<PathBuf>> {
        Ok(Some(self.table.resolve_unc(unc)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn workspace() -> MemoryWorkspace {
        MemoryWorkspace::new()
            .with_project("/proj")
            .with_file("/proj/src/a.cpp")
            .with_file("/proj/src/b.h")
            .with_file("/opt/vendor/ext/ext.h")
            .with_link("/proj/ext", "/opt/vendor/ext")
            .with_symlink("/usr/include/alias", "/usr/include/real")
            .with_file("/usr/include/real/x.h")
    }

    #[test]
    fn test_exists_follows_links_and_symlinks() {
        let ws = workspace();
        assert!(ws.exists(Path::new("/proj/src/b.h")).unwrap());
        assert!(ws.exists(Path::new("/proj/ext/ext.h")).unwrap());
        assert!(ws.exists(Path::new("/usr/include/alias/x.h")).unwrap());
        assert!(!ws.exists(Path::new("/proj/src/missing.h")).unwrap());
    }

    #[test]
    fn test_is_file_rejects_folders() {
        let ws = workspace();
        assert!(ws.is_file(Path::new("/proj/src/b.h")).unwrap());
        assert!(ws.is_file(Path::new("/proj/ext/ext.h")).unwrap());
        assert!(ws.is_file(Path::new("/usr/include/alias/x.h")).unwrap());
        assert!(ws.exists(Path::new("/proj/src")).unwrap());
        assert!(!ws.is_file(Path::new("/proj/src")).unwrap());
        assert!(!ws.is_file(Path::new("/usr/include/alias")).unwrap());
        assert!(!ws.is_file(Path::new("/proj/src/missing.h")).unwrap());
    }

    #[test]
    fn test_list_children_includes_linked_folder() {
        let ws = workspace();
        let names: Vec<_> = ws
            .list_children(Path::new("/proj"))
            .unwrap()
            .into_iter()
            .map(|entry| (entry.name, entry.kind))
            .collect();
        assert_eq!(
            names,
            vec![
                ("ext".to_string(), ResourceKind::Folder),
                ("src".to_string(), ResourceKind::Folder),
            ]
        );

        let linked = ws.list_children(Path::new("/proj/ext")).unwrap();
        assert_eq!(linked[0].path, PathBuf::from("/proj/ext/ext.h"));
        assert!(linked[0].is_file());
    }

    #[test]
    fn test_failures_are_reported() {
        let ws = workspace().with_failure("/proj/src");
        let err = ws.list_children(Path::new("/proj/src")).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::PermissionDenied);
        assert!(ws.exists(Path::new("/proj/src/b.h")).is_err());
        assert!(ws.exists(Path::new("/proj/ext/ext.h")).unwrap());
    }

    #[test]
    fn test_canonicalize_and_links() {
        let ws = workspace();
        assert_eq!(
            ws.canonicalize(Path::new("/usr/include/alias/../alias/x.h")),
            PathBuf::from("/usr/include/real/x.h")
        );
        assert_eq!(
            ws.linked_locations(Path::new("/opt/vendor/ext/ext.h")).unwrap(),
            vec![PathBuf::from("/proj/ext/ext.h")]
        );
        assert_eq!(ws.project_of(Path::new("/opt/vendor/ext/ext.h")), None);
    }
}
