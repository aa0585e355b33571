//! `cinclude.toml`: projects, include paths, linked resources, resolver options.
//!
//! ```toml
//! [resolver]
//! case_sensitivity = "auto"      # "sensitive" | "insensitive"
//! project_fallback = true
//!
//! [[projects]]
//! root = "app"
//! local_include_paths = ["include"]
//! system_include_paths = ["/usr/include"]
//! linked_resources = [{ logical = "app/vendor", physical = "/opt/vendor" }]
//!
//! [[files]]
//! path = "app/src/legacy.c"
//! local_include_paths = ["legacy"]
//!
//! [[unc_mounts]]
//! prefix = "//fileserver/headers"
//! mount = "/mnt/headers"
//! ```

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::scanner_config::{ScannerConfigStore, ScannerConfiguration};
use super::workspace::{LinkedResource, UncMount};
use crate::base::{CaseSensitivity, normalize};
use crate::errors::ConfigError;

pub const CONFIG_FILE_NAME: &str = "cinclude.toml";

/// Case rule as written in the config file.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CaseMode {
    /// Follow the host platform.
    #[default]
    Auto,
    Sensitive,
    Insensitive,
}

impl CaseMode {
    pub fn effective(self) -> CaseSensitivity {
        match self {
            CaseMode::Auto => CaseSensitivity::host(),
            CaseMode::Sensitive => CaseSensitivity::Sensitive,
            CaseMode::Insensitive => CaseSensitivity::Insensitive,
        }
    }
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ResolverSection {
    pub case_sensitivity: CaseMode,
    /// Scan the project tree when configured paths find nothing. Default: true.
    pub project_fallback: Option<bool>,
}

impl ResolverSection {
    pub fn effective_project_fallback(&self) -> bool {
        self.project_fallback.unwrap_or(true)
    }
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectConfig {
    pub root: PathBuf,
    /// Relative entries are resolved against `root`.
    pub local_include_paths: Vec<PathBuf>,
    pub system_include_paths: Vec<PathBuf>,
    pub linked_resources: Vec<LinkedResource>,
}

impl ProjectConfig {
    pub fn scanner_configuration(&self) -> ScannerConfiguration {
        ScannerConfiguration {
            local_include_paths: self.local_include_paths.clone(),
            system_include_paths: self.system_include_paths.clone(),
        }
        .rebased(&self.root)
    }
}

/// Per-file override of the project's search paths.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    pub path: PathBuf,
    pub local_include_paths: Vec<PathBuf>,
    pub system_include_paths: Vec<PathBuf>,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct WorkspaceConfig {
    pub resolver: ResolverSection,
    pub projects: Vec<ProjectConfig>,
    pub files: Vec<FileConfig>,
    pub unc_mounts: Vec<UncMount>,
}

impl WorkspaceConfig {
    /// Load `cinclude.toml` from `root`. A missing file yields the defaults.
    /// Relative paths in the file are anchored at `root`.
    pub fn load(root: &Path) -> Result<Self, ConfigError> {
        let path = root.join(CONFIG_FILE_NAME);
        if !path.exists() {
            debug!(root = %root.display(), "no {CONFIG_FILE_NAME}, using defaults");
            return Ok(Self::default());
        }
        let text = fs::read_to_string(&path).map_err(|source| ConfigError::Io {
            path: path.clone(),
            source,
        })?;
        let config: Self = toml::from_str(&text).map_err(|e| ConfigError::Parse {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        let config = config.anchored(root);
        config.validate()?;
        Ok(config)
    }

    /// Parse a config from a string without anchoring relative paths.
    pub fn from_toml(toml_str: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(toml_str).map_err(|e| ConfigError::Parse {
            path: "<string>".to_string(),
            message: e.to_string(),
        })?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut seen = HashSet::new();
        for (i, project) in self.projects.iter().enumerate() {
            if project.root.as_os_str().is_empty() {
                return Err(ConfigError::Validation {
                    field: format!("projects[{i}].root"),
                    message: "must not be empty".to_string(),
                });
            }
            if !seen.insert(normalize(&project.root)) {
                return Err(ConfigError::Validation {
                    field: format!("projects[{i}].root"),
                    message: format!("duplicate project root {}", project.root.display()),
                });
            }
        }
        for (i, file) in self.files.iter().enumerate() {
            if file.path.as_os_str().is_empty() {
                return Err(ConfigError::Validation {
                    field: format!("files[{i}].path"),
                    message: "must not be empty".to_string(),
                });
            }
        }
        for (i, mount) in self.unc_mounts.iter().enumerate() {
            if !(mount.prefix.starts_with("//") || mount.prefix.starts_with("\\\\")) {
                return Err(ConfigError::Validation {
                    field: format!("unc_mounts[{i}].prefix"),
                    message: "must start with // or \\\\".to_string(),
                });
            }
        }
        Ok(())
    }

    /// Anchor relative roots, file paths and link paths at `base`.
    pub fn anchored(mut self, base: &Path) -> Self {
        let anchor = |path: &Path| normalize(&base.join(path));
        for project in &mut self.projects {
            project.root = anchor(&project.root);
            for link in &mut project.linked_resources {
                *link = LinkedResource::new(anchor(&link.logical), anchor(&link.physical));
            }
        }
        for file in &mut self.files {
            file.path = anchor(&file.path);
        }
        self
    }

    /// Scanner configurations for every declared project and file.
    pub fn scanner_store(&self) -> ScannerConfigStore {
        let store = ScannerConfigStore::new();
        for project in &self.projects {
            store.set_project_config(&project.root, project.scanner_configuration());
        }
        for file in &self.files {
            let base = file.path.parent().unwrap_or(Path::new(""));
            let base = self
                .projects
                .iter()
                .filter(|project| file.path.starts_with(&project.root))
                .max_by_key(|project| project.root.components().count())
                .map_or(base, |project| project.root.as_path());
            if !file.path.is_absolute() {
                warn!(path = %file.path.display(), "per-file config with relative path");
            }
            let config = ScannerConfiguration {
                local_include_paths: file.local_include_paths.clone(),
                system_include_paths: file.system_include_paths.clone(),
            }
            .rebased(base);
            store.set_file_config(&file.path, config);
        }
        store
    }
}
