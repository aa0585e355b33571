//! Include search paths per file or project.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use indexmap::IndexMap;
use parking_lot::RwLock;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::base::normalize;

/// Snapshot of the search-path lists for one file or project.
///
/// The current directory is not stored here; it is derived from the
/// including file at resolve time.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScannerConfiguration {
    /// Searched for quoted includes only, before the system paths.
    pub local_include_paths: Vec<PathBuf>,
    /// Searched for both include styles.
    pub system_include_paths: Vec<PathBuf>,
}

impl ScannerConfiguration {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_local(mut self, path: impl Into<PathBuf>) -> Self {
        self.local_include_paths.push(path.into());
        self
    }

    pub fn with_system(mut self, path: impl Into<PathBuf>) -> Self {
        self.system_include_paths.push(path.into());
        self
    }

    /// Resolve relative entries against `base`.
    pub fn rebased(&self, base: &Path) -> Self {
        let rebase = |paths: &[PathBuf]| -> Vec<PathBuf> {
            paths
                .iter()
                .map(|path| normalize(&base.join(path)))
                .collect()
        };
        Self {
            local_include_paths: rebase(&self.local_include_paths),
            system_include_paths: rebase(&self.system_include_paths),
        }
    }
}

/// Supplies the configuration for an including file.
///
/// `None` means no configuration could be obtained; the resolver then skips
/// the configured-path stage.
pub trait ScannerConfigProvider: Send + Sync {
    fn scanner_config(&self, file: &Path) -> Option<Arc<ScannerConfiguration>>;
}

/// Provider that never has a configuration.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoScannerConfig;

impl ScannerConfigProvider for NoScannerConfig {
    fn scanner_config(&self, _file: &Path) -> Option<Arc<ScannerConfiguration>> {
        None
    }
}

/// One configuration shared by every file.
impl ScannerConfigProvider for ScannerConfiguration {
    fn scanner_config(&self, _file: &Path) -> Option<Arc<ScannerConfiguration>> {
        Some(Arc::new(self.clone()))
    }
}

/// Cache of configurations keyed by file, with per-project defaults.
///
/// A per-file entry wins; otherwise the innermost project whose root
/// contains the file supplies it.
#[derive(Debug, Default)]
pub struct ScannerConfigStore {
    files: RwLock<FxHashMap<PathBuf, Arc<ScannerConfiguration>>>,
    projects: RwLock<IndexMap<PathBuf, Arc<ScannerConfiguration>>>,
}

impl ScannerConfigStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_file_config(&self, file: impl AsRef<Path>, config: ScannerConfiguration) {
        self.files
            .write()
            .insert(normalize(file.as_ref()), Arc::new(config));
    }

    pub fn remove_file_config(&self, file: impl AsRef<Path>) -> bool {
        self.files
            .write()
            .remove(&normalize(file.as_ref()))
            .is_some()
    }

    pub fn set_project_config(&self, root: impl AsRef<Path>, config: ScannerConfiguration) {
        self.projects
            .write()
            .insert(normalize(root.as_ref()), Arc::new(config));
    }

    pub fn project_count(&self) -> usize {
        self.projects.read().len()
    }
}

impl ScannerConfigProvider for ScannerConfigStore {
    fn scanner_config(&self, file: &Path) -> Option<Arc<ScannerConfiguration>> {
        let file = normalize(file);
        if let Some(config) = self.files.read().get(&file) {
            return Some(Arc::clone(config));
        }
        self.projects
            .read()
            .iter()
            .filter(|(root, _)| file.starts_with(root))
            .max_by_key(|(root, _)| root.components().count())
            .map(|(_, config)| Arc::clone(config))
    }
}
