//! Open-document tracking.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use indexmap::IndexMap;
use parking_lot::RwLock;

use super::FileId;

/// Assigns stable [`FileId`]s to paths and holds the text of open documents.
///
/// Include targets are registered here too, without contents, so links and
/// diagnostics can refer to them by id.
#[derive(Debug, Default)]
pub struct FileSet {
    inner: RwLock<FileSetInner>,
}

#[derive(Debug, Default)]
struct FileSetInner {
    path_to_id: IndexMap<PathBuf, FileId>,
    id_to_path: IndexMap<FileId, PathBuf>,
    contents: IndexMap<FileId, Arc<str>>,
    next_id: u32,
}

impl FileSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get or create the FileId for a path.
    pub fn file_id(&self, path: &Path) -> FileId {
        {
            let inner = self.inner.read();
            if let Some(&id) = inner.path_to_id.get(path) {
                return id;
            }
        }

        let mut inner = self.inner.write();
        // Another writer may have won the race.
        if let Some(&id) = inner.path_to_id.get(path) {
            return id;
        }

        let id = FileId::new(inner.next_id);
        inner.next_id += 1;
        inner.path_to_id.insert(path.to_owned(), id);
        inner.id_to_path.insert(id, path.to_owned());
        id
    }

    /// Look up a FileId without assigning one.
    pub fn get(&self, path: &Path) -> Option<FileId> {
        self.inner.read().path_to_id.get(path).copied()
    }

    pub fn path(&self, file: FileId) -> Option<PathBuf> {
        self.inner.read().id_to_path.get(&file).cloned()
    }

    pub fn set_contents(&self, file: FileId, contents: impl Into<Arc<str>>) {
        self.inner.write().contents.insert(file, contents.into());
    }

    pub fn contents(&self, file: FileId) -> Option<Arc<str>> {
        self.inner.read().contents.get(&file).cloned()
    }

    /// Forget a document and its contents.
    pub fn remove(&self, file: FileId) {
        let mut inner = self.inner.write();
        if let Some(path) = inner.id_to_path.swap_remove(&file) {
            inner.path_to_id.swap_remove(&path);
        }
        inner.contents.swap_remove(&file);
    }

    pub fn len(&self) -> usize {
        self.inner.read().path_to_id.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
