//! Include problems reported on a document.

use std::sync::Arc;

use crate::base::{FileId, LineIndex};
use crate::project::{ScannerConfigProvider, Workspace};
use crate::syntax::ParsedInclude;

use super::host::IncludeHost;

// ============================================================================
// DIAGNOSTIC TYPES
// ============================================================================

/// Severity level of a diagnostic.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Severity {
    Error,
    Warning,
    Info,
    Hint,
}

impl Severity {
    /// Convert to LSP severity number.
    pub fn to_lsp(&self) -> u32 {
        match self {
            Severity::Error => 1,
            Severity::Warning => 2,
            Severity::Info => 3,
            Severity::Hint => 4,
        }
    }
}

/// A diagnostic message with location.
#[derive(Clone, Debug)]
pub struct Diagnostic {
    pub file: FileId,
    /// Start line (0-indexed).
    pub start_line: u32,
    /// Start column (0-indexed).
    pub start_col: u32,
    /// End line (0-indexed).
    pub end_line: u32,
    /// End column (0-indexed).
    pub end_col: u32,
    pub severity: Severity,
    /// Diagnostic code (see [`codes`]).
    pub code: Option<Arc<str>>,
    pub message: Arc<str>,
    pub related: Vec<RelatedInfo>,
}

/// Related information for a diagnostic.
#[derive(Clone, Debug)]
pub struct RelatedInfo {
    pub file: FileId,
    pub line: u32,
    pub col: u32,
    pub message: Arc<str>,
}

impl Diagnostic {
    pub fn new(file: FileId, severity: Severity, message: impl Into<Arc<str>>) -> Self {
        Self {
            file,
            start_line: 0,
            start_col: 0,
            end_line: 0,
            end_col: 0,
            severity,
            code: None,
            message: message.into(),
            related: Vec::new(),
        }
    }

    pub fn with_span(mut self, start_line: u32, start_col: u32, end_line: u32, end_col: u32) -> Self {
        self.start_line = start_line;
        self.start_col = start_col;
        self.end_line = end_line;
        self.end_col = end_col;
        self
    }

    pub fn with_code(mut self, code: impl Into<Arc<str>>) -> Self {
        self.code = Some(code.into());
        self
    }

    pub fn with_related(mut self, info: RelatedInfo) -> Self {
        self.related.push(info);
        self
    }
}

// ============================================================================
// DIAGNOSTIC CODES
// ============================================================================

/// Diagnostic codes for include problems.
pub mod codes {
    /// No stage of the search found the header.
    pub const UNRESOLVED_INCLUDE: &str = "I0001";
    /// The include resolves to more than one header.
    pub const AMBIGUOUS_INCLUDE: &str = "I0002";
    /// The workspace failed while searching; the result is unknown.
    pub const INCLUDE_SEARCH_FAILED: &str = "I0003";
}

// ============================================================================
// COLLECTION
// ============================================================================

/// Diagnose every include of `file`.
///
/// Unlike links, a workspace failure on one include becomes a diagnostic on
/// that include and the remaining includes are still checked.
pub fn include_diagnostics<W, P>(host: &IncludeHost<W, P>, file: FileId) -> Vec<Diagnostic>
where
    W: Workspace,
    P: ScannerConfigProvider,
{
    let Some(text) = host.files().contents(file) else {
        return Vec::new();
    };
    let index = LineIndex::new(&text);
    let mut diagnostics = Vec::new();

    for include in host.includes(file) {
        let located = |severity, message: String| {
            let start = index.line_col(include.name_range.start());
            let end = index.line_col(include.name_range.end());
            Diagnostic::new(file, severity, message).with_span(start.line, start.col, end.line, end.col)
        };

        match host.resolve(file, &include.directive) {
            Ok(locations) if locations.is_empty() => diagnostics.push(
                located(Severity::Warning, unresolved_message(&include))
                    .with_code(codes::UNRESOLVED_INCLUDE),
            ),
            Ok(locations) if locations.len() > 1 => {
                let mut diagnostic = located(
                    Severity::Hint,
                    format!(
                        "'{}' resolves to {} headers",
                        include.directive.name(),
                        locations.len()
                    ),
                )
                .with_code(codes::AMBIGUOUS_INCLUDE);
                for location in &locations {
                    diagnostic = diagnostic.with_related(RelatedInfo {
                        file: host.files().file_id(location.path()),
                        line: 0,
                        col: 0,
                        message: format!("candidate {location}").into(),
                    });
                }
                diagnostics.push(diagnostic);
            }
            Ok(_) => {}
            Err(err) => diagnostics.push(
                located(
                    Severity::Error,
                    format!("cannot search for '{}': {err}", include.directive.name()),
                )
                .with_code(codes::INCLUDE_SEARCH_FAILED),
            ),
        }
    }

    diagnostics
}

fn unresolved_message(include: &ParsedInclude) -> String {
    format!("cannot find include file '{}'", include.directive.name())
}
