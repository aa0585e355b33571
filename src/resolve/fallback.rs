//! Project-wide search by file name, used when configured paths find nothing.

use std::ffi::OsStr;
use std::path::{Path, PathBuf};

use rustc_hash::FxHashSet;

use crate::base::{Cancellable, CanonicalKey, CaseSensitivity, file_name_matches};
use crate::errors::ResolveError;
use crate::project::{ResourceKind, Workspace};

/// Linked folders can form cycles the canonical form cannot see.
const MAX_DEPTH: usize = 256;

/// Depth-first, pre-order walk of a project looking for a file named
/// `file_name`. The first match ends the walk.
pub(crate) struct ProjectWalk<'a, W: ?Sized> {
    workspace: &'a W,
    file_name: &'a OsStr,
    case: CaseSensitivity,
    cancel: &'a dyn Cancellable,
    /// Canonical folders already entered; breaks symlink cycles.
    visited: FxHashSet<CanonicalKey>,
}

impl<'a, W: Workspace + ?Sized> ProjectWalk<'a, W> {
    pub(crate) fn new(
        workspace: &'a W,
        file_name: &'a str,
        case: CaseSensitivity,
        cancel: &'a dyn Cancellable,
    ) -> Self {
        Self {
            workspace,
            file_name: OsStr::new(file_name),
            case,
            cancel,
            visited: FxHashSet::default(),
        }
    }

    pub(crate) fn find(mut self, root: &Path) -> Result<Option<PathBuf>, ResolveError> {
        if self.file_name.is_empty() {
            return Ok(None);
        }
        self.visit_container(root, 0)
    }

    fn visit_container(
        &mut self,
        container: &Path,
        depth: usize,
    ) -> Result<Option<PathBuf>, ResolveError> {
        if depth > MAX_DEPTH {
            tracing::warn!(container = %container.display(), "project walk too deep");
            return Err(ResolveError::DepthExceeded {
                path: container.to_path_buf(),
            });
        }
        let key = CanonicalKey::new(&self.workspace.canonicalize(container), self.case);
        if !self.visited.insert(key) {
            return Ok(None);
        }

        let children = self
            .workspace
            .list_children(container)
            .map_err(|e| ResolveError::workspace(container, e))?;

        for child in children {
            if self.cancel.is_cancelled() {
                return Err(ResolveError::Cancelled);
            }
            match child.kind {
                ResourceKind::File => {
                    if file_name_matches(OsStr::new(&child.name), self.file_name, self.case) {
                        return Ok(Some(child.path));
                    }
                }
                ResourceKind::Folder => {
                    if let Some(hit) = self.visit_container(&child.path, depth + 1)? {
                        return Ok(Some(hit));
                    }
                }
            }
        }
        Ok(None)
    }
}
