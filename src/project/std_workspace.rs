//! Workspace backed by the real filesystem.

use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use super::config::WorkspaceConfig;
use super::workspace::{
    LinkedResource, ProjectTable, ResourceEntry, ResourceKind, UncMount, Workspace,
};
use crate::base::normalize;

/// Reads through `std::fs`. Projects, linked resources and UNC mounts come
/// from configuration since the filesystem itself has no notion of them.
#[derive(Clone, Debug, Default)]
pub struct StdWorkspace {
    table: ProjectTable,
}

impl StdWorkspace {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_config(config: &WorkspaceConfig) -> Self {
        let mut workspace = Self::new();
        for project in &config.projects {
            workspace.table.projects.push(normalize(&project.root));
            workspace
                .table
                .links
                .extend(project.linked_resources.iter().map(|link| {
                    LinkedResource::new(&link.logical, &link.physical)
                }));
        }
        workspace
            .table
            .unc_mounts
            .extend(config.unc_mounts.iter().cloned());
        workspace
    }

    pub fn with_project(mut self, root: impl AsRef<Path>) -> Self {
        self.table.projects.push(normalize(root.as_ref()));
        self
    }

    pub fn with_link(mut self, logical: impl Into<PathBuf>, physical: impl Into<PathBuf>) -> Self {
        self.table.links.push(LinkedResource::new(logical, physical));
        self
    }

    pub fn with_unc_mount(mut self, prefix: &str, mount: impl Into<PathBuf>) -> Self {
        self.table.unc_mounts.push(UncMount::new(prefix, mount));
        self
    }

    pub fn projects(&self) -> &[PathBuf] {
        &self.table.projects
    }
}

fn is_absent(err: &io::Error) -> bool {
    matches!(
        err.kind(),
        io::ErrorKind::NotFound | io::ErrorKind::NotADirectory
    )
}

fn kind_of(metadata: &fs::Metadata) -> ResourceKind {
    if metadata.is_dir() {
        ResourceKind::Folder
    } else {
        ResourceKind::File
    }
}

impl Workspace for StdWorkspace {
    fn exists(&self, path: &Path) -> io::Result<bool> {
        match fs::metadata(self.table.physical(path)) {
            Ok(_) => Ok(true),
            Err(err) if is_absent(&err) => Ok(false),
            Err(err) => Err(err),
        }
    }

    fn is_file(&self, path: &Path) -> io::Result<bool> {
        match fs::metadata(self.table.physical(path)) {
            Ok(metadata) => Ok(metadata.is_file()),
            Err(err) if is_absent(&err) => Ok(false),
            Err(err) => Err(err),
        }
    }

    fn list_children(&self, container: &Path) -> io::Result<Vec<ResourceEntry>> {
        let container = normalize(container);
        let physical = self.table.physical(&container);

        let mut children: BTreeMap<String, ResourceEntry> = BTreeMap::new();
        for entry in fs::read_dir(&physical)? {
            let entry = entry?;
            // Follows symlinks; a dangling one is not a resource.
            let metadata = match fs::metadata(entry.path()) {
                Ok(metadata) => metadata,
                Err(err) if is_absent(&err) => continue,
                Err(err) => return Err(err),
            };
            let name = entry.file_name().to_string_lossy().into_owned();
            children.insert(
                name.clone(),
                ResourceEntry {
                    path: container.join(&name),
                    name,
                    kind: kind_of(&metadata),
                },
            );
        }

        for link in self.table.links_in(&container) {
            let Some(name) = link.logical.file_name() else {
                continue;
            };
            let metadata = match fs::metadata(&link.physical) {
                Ok(metadata) => metadata,
                Err(err) if is_absent(&err) => continue,
                Err(err) => return Err(err),
            };
            let name = name.to_string_lossy().into_owned();
            children.insert(
                name.clone(),
                ResourceEntry {
                    name,
                    kind: kind_of(&metadata),
                    path: link.logical.clone(),
                },
            );
        }

        Ok(children.into_values().collect())
    }

    fn linked_locations(&self, physical: &Path) -> io::Result<Vec<PathBuf>> {
        Ok(self.table.linked_locations(physical))
    }

    fn project_of(&self, path: &Path) -> Option<PathBuf> {
        self.table.project_of(path)
    }

    fn canonicalize(&self, path: &Path) -> PathBuf {
        fs::canonicalize(path).unwrap_or_else(|_| normalize(path))
    }

    fn resolve_unc(&self, unc: &str) -> io::Result<Option<PathBuf>> {
        Ok(Some(self.table.resolve_unc(unc)))
    }
}
