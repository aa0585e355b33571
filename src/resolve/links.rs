//! Linked-resource substitution of raw search hits.

use std::path::PathBuf;

use super::location::ResolvedLocation;
use crate::errors::ResolveError;
use crate::project::Workspace;

/// Replace a raw hit outside every project with the logical paths of the
/// linked resources that alias it.
///
/// A hit may be aliased by several links; all of them are returned and the
/// caller disambiguates. Hits inside a project, or with no alias, are kept.
pub(crate) fn substitute_links<W: Workspace + ?Sized>(
    workspace: &W,
    raw: PathBuf,
) -> Result<Vec<ResolvedLocation>, ResolveError> {
    if workspace.project_of(&raw).is_some() {
        return Ok(vec![ResolvedLocation::File(raw)]);
    }

    // Links alias the physical target, so a hit reached through a symlinked
    // directory is looked up by its canonical path as well.
    let physical = workspace.canonicalize(&raw);
    let mut logical = workspace
        .linked_locations(&raw)
        .map_err(|e| ResolveError::workspace(&raw, e))?;
    if physical != raw {
        for alias in workspace
            .linked_locations(&physical)
            .map_err(|e| ResolveError::workspace(&physical, e))?
        {
            if !logical.contains(&alias) {
                logical.push(alias);
            }
        }
    }
    if logical.is_empty() {
        return Ok(vec![ResolvedLocation::File(raw)]);
    }

    tracing::trace!(raw = %raw.display(), aliases = logical.len(), "substituting linked resources");
    Ok(logical
        .into_iter()
        .map(|logical| ResolvedLocation::Linked {
            logical,
            physical: physical.clone(),
        })
        .collect())
}
