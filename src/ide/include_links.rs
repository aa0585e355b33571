//! Include links: clickable include names leading to the headers.

use std::borrow::Cow;

use crate::base::{FileId, LineCol, LineIndex, TextRange};
use crate::errors::ResolveError;
use crate::project::{ScannerConfigProvider, Workspace};
use crate::resolve::ResolvedLocation;
use crate::syntax::IncludeDirective;

use super::host::IncludeHost;

/// A header an include link leads to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkTarget {
    pub file: FileId,
    pub location: ResolvedLocation,
}

/// A resolved include in a document.
#[derive(Debug, Clone)]
pub struct IncludeLink {
    pub directive: IncludeDirective,
    /// The name between the delimiters.
    pub range: TextRange,
    pub start: LineCol,
    pub end: LineCol,
    /// All candidates in resolution order; more than one means ambiguous.
    pub targets: Vec<LinkTarget>,
    pub tooltip: Cow<'static, str>,
}

/// Links for every include of `file` that resolves.
///
/// Unresolved includes produce no link; see the diagnostics for those. A
/// workspace failure aborts the whole request.
pub fn include_links<W, P>(
    host: &IncludeHost<W, P>,
    file: FileId,
) -> Result<Vec<IncludeLink>, ResolveError>
where
    W: Workspace,
    P: ScannerConfigProvider,
{
    let Some(text) = host.files().contents(file) else {
        return Ok(Vec::new());
    };
    let index = LineIndex::new(&text);
    let mut links = Vec::new();

    for include in host.includes(file) {
        let locations = host.resolve(file, &include.directive)?;
        if locations.is_empty() {
            continue;
        }
        let tooltip = match locations.as_slice() {
            [only] => Cow::Owned(format!("Open {}", only.path().display())),
            many => Cow::Owned(format!(
                "Open {} ({} candidates)",
                include.directive.name(),
                many.len()
            )),
        };
        let targets = locations
            .into_iter()
            .map(|location| LinkTarget {
                file: host.files().file_id(location.path()),
                location,
            })
            .collect();
        links.push(IncludeLink {
            start: index.line_col(include.name_range.start()),
            end: index.line_col(include.name_range.end()),
            range: include.name_range,
            directive: include.directive,
            targets,
            tooltip,
        });
    }

    Ok(links)
}
