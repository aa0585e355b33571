//! # cinclude-base
//!
//! Include path resolution for C and C++ sources: given an `#include`
//! directive and the file it appears in, find the header files it refers to.
//!
//! ## Module Structure (dependency order)
//!
//! ```text
//! ide      → Editor features (include links, open include, diagnostics)
//!   ↓
//! resolve  → The staged resolver (explicit, configured, project walk)
//!   ↓
//! project  → Workspace access, scanner configuration, config files
//!   ↓
//! syntax   → Include directives and their extraction from source text
//!   ↓
//! base     → Primitives (FileId, spans, paths, cancellation)
//! ```
//!
//! `errors` holds the error types shared by all layers.

/// Foundation types: FileId, spans, canonical paths, cancellation
pub mod base;

/// Error types for resolution and configuration
pub mod errors;

/// IDE features: include links, open include, diagnostics, include edits
pub mod ide;

/// Workspace access and scanner configuration
pub mod project;

/// Include path resolution
pub mod resolve;

/// Include directives and the directive scanner
pub mod syntax;

// Re-export the main entry points
pub use base::{CancellationToken, CaseSensitivity, FileId, LineCol, LineIndex, TextRange, TextSize};
pub use errors::{ConfigError, ResolveError};
pub use project::{
    MemoryWorkspace, ScannerConfigProvider, ScannerConfiguration, StdWorkspace, Workspace,
    WorkspaceConfig,
};
pub use resolve::{IncludeResolver, ResolveRequest, ResolvedLocation, ResolverOptions};
pub use syntax::{IncludeDirective, IncludeStyle, NameKind};
