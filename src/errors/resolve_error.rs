//! Resolver errors.

use std::io;
use std::path::PathBuf;

/// Why an include search could not be completed.
///
/// Returning an empty result in these cases would be a false negative, so
/// the resolver propagates them instead.
#[derive(Debug, thiserror::Error)]
pub enum ResolveError {
    #[error("workspace failure at {}: {source}", .path.display())]
    Workspace {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The project walk nested deeper than the walker allows, typically
    /// through a cycle of linked folders.
    #[error("project walk exceeded maximum depth at {}", .path.display())]
    DepthExceeded { path: PathBuf },

    #[error("include search cancelled")]
    Cancelled,
}

impl ResolveError {
    pub(crate) fn workspace(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Workspace {
            path: path.into(),
            source,
        }
    }

    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled)
    }
}
