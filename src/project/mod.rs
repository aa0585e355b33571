//! Project model: the workspace abstraction, scanner configurations and
//! the `cinclude.toml` config file.

pub mod config;
mod memory;
mod scanner_config;
mod std_workspace;
mod workspace;

pub use config::{CaseMode, WorkspaceConfig};
pub use memory::MemoryWorkspace;
pub use scanner_config::{
    NoScannerConfig, ScannerConfigProvider, ScannerConfigStore, ScannerConfiguration,
};
pub use std_workspace::StdWorkspace;
pub use workspace::{LinkedResource, ResourceEntry, ResourceKind, UncMount, Workspace};
