//! Open include: jump from an include directive to its header.

use crate::base::{FileId, TextSize};
use crate::errors::ResolveError;
use crate::project::{ScannerConfigProvider, Workspace};
use crate::resolve::ResolvedLocation;

use super::chooser::{HeaderChooser, pick_single};
use super::host::IncludeHost;

/// Resolve the include on the line under `offset` to a single header.
///
/// Returns `None` when the cursor is not on an include, the include does not
/// resolve, or the chooser declines an ambiguous result.
pub fn goto_include<W, P>(
    host: &IncludeHost<W, P>,
    file: FileId,
    offset: TextSize,
    chooser: &dyn HeaderChooser,
) -> Result<Option<ResolvedLocation>, ResolveError>
where
    W: Workspace,
    P: ScannerConfigProvider,
{
    let Some(include) = host
        .includes(file)
        .into_iter()
        .find(|include| include.range.contains_inclusive(offset))
    else {
        return Ok(None);
    };

    let candidates = host.resolve(file, &include.directive)?;
    Ok(pick_single(&candidates, chooser))
}
